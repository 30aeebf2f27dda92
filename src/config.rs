//! Configuration types for the manipulation engine.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! partial TOML document only overrides what it names.
//!
//! # Example
//!
//! ```
//! # use symbol_composer::config::EditorConfig;
//! let config = EditorConfig::from_toml_str("[grid]\nsnap = true\nsize = 12.0\n").unwrap();
//! assert!(config.grid().snap());
//! assert_eq!(config.manipulation().click_threshold(), 3.0);
//! ```

use serde::Deserialize;
use std::time::Duration;

use crate::error::ComposerError;
use crate::geometry::Size;

/// Top-level configuration combining the manipulation, grid and auto-scroll
/// sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    manipulation: ManipulationConfig,

    #[serde(default)]
    grid: GridConfig,

    #[serde(default)]
    auto_scroll: AutoScrollConfig,
}

impl EditorConfig {
    pub fn new(
        manipulation: ManipulationConfig,
        grid: GridConfig,
        auto_scroll: AutoScrollConfig,
    ) -> Self {
        Self {
            manipulation,
            grid,
            auto_scroll,
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ComposerError> {
        Ok(toml::from_str(source)?)
    }

    pub fn manipulation(&self) -> &ManipulationConfig {
        &self.manipulation
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn auto_scroll(&self) -> &AutoScrollConfig {
        &self.auto_scroll
    }

    pub fn grid_mut(&mut self) -> &mut GridConfig {
        &mut self.grid
    }
}

/// Pointer interaction tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManipulationConfig {
    /// Maximum pointer travel (view units) still treated as a click.
    click_threshold: f32,
    /// Side length of resize handles and connector end handles.
    handle_size: f32,
    /// Tolerance used when hit-testing connector routes.
    hit_tolerance: f32,
    /// Width of the move panel ring along a symbol's border.
    move_panel_width: f32,
    /// Height of the headline band (the dedicated edit sub-zone).
    headline_height: f32,
    /// Side length of the auxiliary action buttons.
    action_button_size: f32,
    /// Distance below which a displaced waypoint straightens the connector.
    straighten_tolerance: f32,
    /// Distance of the bent route from a self-referencing symbol.
    self_reference_offset: f32,
    /// Fallback minimum size for symbols whose definition names none.
    min_symbol_size: Size,
}

impl Default for ManipulationConfig {
    fn default() -> Self {
        Self {
            click_threshold: 3.0,
            handle_size: 8.0,
            hit_tolerance: 4.0,
            move_panel_width: 4.0,
            headline_height: 16.0,
            action_button_size: 12.0,
            straighten_tolerance: 2.0,
            self_reference_offset: 24.0,
            min_symbol_size: Size::new(16.0, 12.0),
        }
    }
}

impl ManipulationConfig {
    pub fn click_threshold(&self) -> f32 {
        self.click_threshold
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
    }

    pub fn hit_tolerance(&self) -> f32 {
        self.hit_tolerance
    }

    pub fn move_panel_width(&self) -> f32 {
        self.move_panel_width
    }

    pub fn headline_height(&self) -> f32 {
        self.headline_height
    }

    pub fn action_button_size(&self) -> f32 {
        self.action_button_size
    }

    pub fn straighten_tolerance(&self) -> f32 {
        self.straighten_tolerance
    }

    pub fn self_reference_offset(&self) -> f32 {
        self.self_reference_offset
    }

    pub fn min_symbol_size(&self) -> Size {
        self.min_symbol_size
    }
}

/// Snap-to-grid settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    size: f32,
    snap: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            snap: false,
        }
    }
}

impl GridConfig {
    pub fn new(size: f32, snap: bool) -> Self {
        Self { size, snap }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn snap(&self) -> bool {
        self.snap
    }

    pub fn set_snap(&mut self, snap: bool) {
        self.snap = snap;
    }
}

/// Viewport auto-scrolling while dragging near an edge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Distance from the viewport edge that triggers scrolling.
    margin: f32,
    /// Scroll amount per tick.
    step: f32,
    /// Minimum time between two scroll ticks, in milliseconds.
    interval_ms: u64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            margin: 24.0,
            step: 16.0,
            interval_ms: 50,
        }
    }
}

impl AutoScrollConfig {
    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
