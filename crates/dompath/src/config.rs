//! Tunables for the scroll, clear, dropdown, grid and stability loops.
//!
//! Every struct has a `Default` matching the behaviour of the interaction
//! primitives out of the box, and can be loaded from YAML or JSON:
//!
//! ```yaml
//! scroll:
//!   step_px: 200
//! grid:
//!   final_timeout_ms: 2000
//!   scroll:
//!     step_px: 300
//! ```
//!
//! The top-level `scroll` section applies to [`ScrollElement`]s built by the
//! caller; grids only read `grid.scroll`.
//!
//! [`ScrollElement`]: crate::scroll::ScrollElement

use crate::result::{DomPathError, DomPathResult};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default scroll step in pixels
pub const DEFAULT_SCROLL_STEP_PX: i64 = 150;

/// Consecutive non-advancing steps tolerated before giving up
pub const DEFAULT_MAX_STALLS: u32 = 2;

/// Per-character clear attempts in strict mode
pub const DEFAULT_STRICT_CLEAR_TRIES: u32 = 20;

/// Per-character clear attempts in lenient mode
pub const DEFAULT_LENIENT_CLEAR_TRIES: u32 = 3;

/// Keystrokes of each kind sent by the quick clear
pub const DEFAULT_QUICK_CLEAR_LENGTH: usize = 100;

/// Upper bound on candidate rows scanned by a content search
pub const DEFAULT_ROW_SEARCH_LIMIT: usize = 10_000_000;

// =============================================================================
// SCROLL
// =============================================================================

/// Scrolling engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels per step
    pub step_px: i64,
    /// Consecutive stalled steps before `NotFound`
    pub max_stalls: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step_px: DEFAULT_SCROLL_STEP_PX,
            max_stalls: DEFAULT_MAX_STALLS,
        }
    }
}

impl ScrollConfig {
    /// Set the step size
    #[must_use]
    pub const fn with_step(mut self, step_px: i64) -> Self {
        self.step_px = step_px;
        self
    }

    /// Set the stall tolerance
    #[must_use]
    pub const fn with_max_stalls(mut self, max_stalls: u32) -> Self {
        self.max_stalls = max_stalls;
        self
    }
}

// =============================================================================
// CLEAR
// =============================================================================

/// Input clearing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearConfig {
    /// Attempts of the per-character loop when the clear must succeed
    pub strict_max_tries: u32,
    /// Attempts of the per-character loop in best-effort mode
    pub lenient_max_tries: u32,
    /// Number of BACKSPACE (and DELETE) keys sent by the quick clear
    pub quick_clear_length: usize,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            strict_max_tries: DEFAULT_STRICT_CLEAR_TRIES,
            lenient_max_tries: DEFAULT_LENIENT_CLEAR_TRIES,
            quick_clear_length: DEFAULT_QUICK_CLEAR_LENGTH,
        }
    }
}

// =============================================================================
// DROPDOWN
// =============================================================================

/// Dropdown option selection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    /// Pixels per scroll step inside the dropdown
    pub step_px: i64,
    /// Implicit timeout while scrolling
    pub lookup_timeout_ms: u64,
    /// Pause between finding the option and clicking it
    pub settle_delay_ms: u64,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            step_px: 50,
            lookup_timeout_ms: 10,
            settle_delay_ms: 100,
        }
    }
}

impl DropdownConfig {
    /// Set the settle delay; zero disables it
    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay_ms: u64) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    /// Lookup timeout as a `Duration`
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Settle delay as a `Duration`
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

// =============================================================================
// GRID
// =============================================================================

/// Implicit timeouts used around grid operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTimeouts {
    /// Timeout while scrolling, so each probe fails fast
    pub operation_timeout_ms: u64,
    /// Timeout restored once the operation is over
    pub final_timeout_ms: u64,
}

impl Default for GridTimeouts {
    fn default() -> Self {
        Self {
            operation_timeout_ms: 5,
            final_timeout_ms: 5000,
        }
    }
}

impl GridTimeouts {
    /// Operation timeout as a `Duration`
    #[must_use]
    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Final timeout as a `Duration`
    #[must_use]
    pub const fn final_timeout(&self) -> Duration {
        Duration::from_millis(self.final_timeout_ms)
    }
}

/// Grid settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Timeouts around scroll-heavy operations
    #[serde(flatten)]
    pub timeouts: GridTimeouts,
    /// Highest row index probed by `find_row_index`
    pub row_search_limit: usize,
    /// Scrolling of the grid viewports, independent of the top-level `scroll`
    pub scroll: ScrollConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            timeouts: GridTimeouts::default(),
            row_search_limit: DEFAULT_ROW_SEARCH_LIMIT,
            scroll: ScrollConfig::default(),
        }
    }
}

// =============================================================================
// STABILITY
// =============================================================================

/// Stability poller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityOptions {
    /// Pause between two observations
    pub poll_interval_ms: u64,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
        }
    }
}

impl StabilityOptions {
    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Polling interval as a `Duration`
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// AGGREGATE
// =============================================================================

/// All tunables in one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomPathConfig {
    /// Scrolling engine
    pub scroll: ScrollConfig,
    /// Input clearing
    pub clear: ClearConfig,
    /// Dropdown selection
    pub dropdown: DropdownConfig,
    /// AG-Grid navigation
    pub grid: GridConfig,
    /// Stability poller
    pub stability: StabilityOptions,
}

impl DomPathConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> DomPathResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| DomPathError::Config {
            message: e.to_string(),
        })
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> DomPathResult<Self> {
        serde_json::from_str(json).map_err(|e| DomPathError::Config {
            message: e.to_string(),
        })
    }

    /// Load from a file, choosing the format by extension (`.json`, otherwise YAML)
    pub fn from_file(path: impl AsRef<FsPath>) -> DomPathResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = DomPathConfig::default();
            assert_eq!(config.scroll.step_px, 150);
            assert_eq!(config.scroll.max_stalls, 2);
            assert_eq!(config.clear.strict_max_tries, 20);
            assert_eq!(config.clear.lenient_max_tries, 3);
            assert_eq!(config.clear.quick_clear_length, 100);
            assert_eq!(config.dropdown.step_px, 50);
            assert_eq!(config.dropdown.lookup_timeout(), Duration::from_millis(10));
            assert_eq!(config.dropdown.settle_delay(), Duration::from_millis(100));
            assert_eq!(config.grid.timeouts.operation_timeout_ms, 5);
            assert_eq!(config.grid.timeouts.final_timeout_ms, 5000);
            assert_eq!(config.grid.row_search_limit, 10_000_000);
            assert_eq!(config.grid.scroll, ScrollConfig::default());
            assert_eq!(config.stability.poll_interval_ms, 50);
        }

        #[test]
        fn test_builders() {
            let scroll = ScrollConfig::default().with_step(50).with_max_stalls(4);
            assert_eq!(scroll.step_px, 50);
            assert_eq!(scroll.max_stalls, 4);
            assert_eq!(DropdownConfig::default().with_settle_delay(0).settle_delay_ms, 0);
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = DomPathConfig::from_yaml("scroll:\n  step_px: 200\ngrid:\n  final_timeout_ms: 2000\n")
                .unwrap();
            assert_eq!(config.scroll.step_px, 200);
            assert_eq!(config.scroll.max_stalls, 2);
            assert_eq!(config.grid.timeouts.final_timeout_ms, 2000);
            assert_eq!(config.grid.timeouts.operation_timeout_ms, 5);
        }

        #[test]
        fn test_grid_scroll_is_separate() {
            let config =
                DomPathConfig::from_yaml("grid:\n  scroll:\n    step_px: 300\n").unwrap();
            assert_eq!(config.grid.scroll.step_px, 300);
            assert_eq!(config.grid.scroll.max_stalls, 2);
            assert_eq!(config.scroll.step_px, 150);
        }

        #[test]
        fn test_json() {
            let config =
                DomPathConfig::from_json(r#"{"dropdown": {"settle_delay_ms": 0}}"#).unwrap();
            assert_eq!(config.dropdown.settle_delay_ms, 0);
            assert_eq!(config.dropdown.step_px, 50);
        }

        #[test]
        fn test_invalid_yaml_is_config_error() {
            let err = DomPathConfig::from_yaml("scroll: [1, 2").unwrap_err();
            assert!(matches!(err, DomPathError::Config { .. }));
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let err = DomPathConfig::from_file("/nonexistent/dompath.yaml").unwrap_err();
            assert!(matches!(err, DomPathError::Io(_)));
        }
    }
}
