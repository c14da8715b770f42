//! dompath: composable element paths for browser tests
//!
//! Describe DOM elements as immutable values, combine them with structural
//! relations and properties, and compile them to XPath 1.0 together with a
//! human description that matches what the XPath selects.
//!
//! ```
//! use dompath::paths::{DIV, SPAN};
//! use dompath::path::property::has_class;
//!
//! let warning = SPAN.that([has_class("warning")]).inside(&DIV.with_class("form"));
//! assert_eq!(
//!     warning.to_xpath(),
//!     "//div[contains(concat(' ', normalize-space(@class), ' '), ' form ')]\
//!      //span[contains(concat(' ', normalize-space(@class), ' '), ' warning ')]"
//! );
//! assert_eq!(warning.to_string(), "span, that has class warning, inside div, that has class form");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────────────┐
//! │ Path algebra │───►│ XPath 1.0    │───►│ Browser (trait)          │
//! │ + properties │    │ + description│    │ scroll, inputs, AG-Grid, │
//! └──────────────┘    └──────────────┘    │ stability, count checks  │
//!                                         └──────────────────────────┘
//! ```
//!
//! Everything that touches a page goes through the [`Browser`] trait; an
//! in-memory [`MockBrowser`] is provided for tests.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod ag_grid;
pub mod browser;
pub mod config;
pub mod high_level;
pub mod inputs;
pub mod matchers;
pub mod path;
pub mod paths;
pub mod result;
pub mod scroll;
pub mod singleton;
pub mod wait;
pub mod xpath;

pub use ag_grid::{AgGrid, AgGridBuilder, RowSpec};
pub use browser::{
    keys, Browser, BrowserExt, ElementRef, Locate, MockBrowser, MockElement, Rect, TimeoutGuard,
};
pub use config::{
    ClearConfig, DomPathConfig, DropdownConfig, GridConfig, GridTimeouts, ScrollConfig,
    StabilityOptions,
};
pub use matchers::{CountMatcher, IsPresentNTimes};
pub use path::{
    first_occurrence_of, last_occurrence_of, occurrence_number, ElementProperty, NPath, Path,
};
pub use result::{DomPathError, DomPathResult};
pub use scroll::ScrollElement;
pub use wait::wait_until_stable;
