//! Browser capability.
//!
//! The core never talks to a driver directly; everything goes through the
//! object-safe [`Browser`] trait. Implementations take `&self` and keep any
//! mutable session state behind interior mutability.

pub mod mock;

pub use mock::{KeyBehavior, MockBrowser, MockElement, ScrollWindow};

use crate::path::Path;
use crate::result::DomPathResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// WebDriver key code points
pub mod keys {
    /// Backspace
    pub const BACKSPACE: &str = "\u{E003}";
    /// Delete
    pub const DELETE: &str = "\u{E017}";
    /// Enter
    pub const ENTER: &str = "\u{E007}";
}

// =============================================================================
// ELEMENTS AND GEOMETRY
// =============================================================================

/// Handle to an element resolved by the driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    id: String,
}

impl ElementRef {
    /// Wrap a driver element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Driver element id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Bounding box in page pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i64,
    /// Top edge
    pub y: i64,
    /// Width
    pub width: i64,
    /// Height
    pub height: i64,
}

impl Rect {
    /// Create a rect
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Right edge
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.x + self.width
    }
}

/// Scroll position of a scrollable element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollOffset {
    /// Horizontal offset
    pub x: i64,
    /// Vertical offset
    pub y: i64,
}

// =============================================================================
// BROWSER
// =============================================================================

/// Operations the core needs from a browser session
pub trait Browser {
    /// First element matching the path, waiting up to the implicit timeout
    fn find(&self, path: &Path) -> DomPathResult<ElementRef>;

    /// All elements matching the path, in document order
    fn find_all(&self, path: &Path) -> DomPathResult<Vec<ElementRef>>;

    /// Click an element
    fn click(&self, element: &ElementRef) -> DomPathResult<()>;

    /// Type keys into an element
    fn send_keys(&self, element: &ElementRef, keys: &str) -> DomPathResult<()>;

    /// Native clear of an input
    fn clear(&self, element: &ElementRef) -> DomPathResult<()>;

    /// Attribute value, `None` if absent
    fn attribute(&self, element: &ElementRef, name: &str) -> DomPathResult<Option<String>>;

    /// Bounding box
    fn rect(&self, element: &ElementRef) -> DomPathResult<Rect>;

    /// Whether the element is rendered
    fn is_displayed(&self, element: &ElementRef) -> DomPathResult<bool>;

    /// Scroll an element's content by a delta
    fn scroll_by(&self, element: &ElementRef, dx: i64, dy: i64) -> DomPathResult<()>;

    /// Scroll an element's content to an absolute position; `None` keeps the axis
    fn scroll_to(&self, element: &ElementRef, x: Option<i64>, y: Option<i64>)
        -> DomPathResult<()>;

    /// Current scroll position of an element
    fn scroll_offset(&self, element: &ElementRef) -> DomPathResult<ScrollOffset>;

    /// Set the wait applied to every lookup
    fn set_implicit_timeout(&self, timeout: Duration) -> DomPathResult<()>;

    /// Current implicit timeout
    fn implicit_timeout(&self) -> Duration;

    /// Whether at least one element matches
    fn is_present(&self, path: &Path) -> DomPathResult<bool> {
        Ok(!self.find_all(path)?.is_empty())
    }

    /// Number of matching elements
    fn count(&self, path: &Path) -> DomPathResult<usize> {
        Ok(self.find_all(path)?.len())
    }
}

// =============================================================================
// LOCATE
// =============================================================================

/// Something that resolves to a single element
pub trait Locate {
    /// Resolve against a browser
    fn locate<B: Browser + ?Sized>(&self, browser: &B) -> DomPathResult<ElementRef>;
}

impl Locate for Path {
    fn locate<B: Browser + ?Sized>(&self, browser: &B) -> DomPathResult<ElementRef> {
        browser.find(self)
    }
}

impl Locate for ElementRef {
    fn locate<B: Browser + ?Sized>(&self, _browser: &B) -> DomPathResult<ElementRef> {
        Ok(self.clone())
    }
}

/// Convenience operations on top of [`Browser`]
pub trait BrowserExt: Browser {
    /// Resolve and click; returns the clicked element
    fn click_on(&self, target: &impl Locate) -> DomPathResult<ElementRef> {
        let element = target.locate(self)?;
        self.click(&element)?;
        Ok(element)
    }

    /// Resolve and type keys; returns the element
    fn send_keys_to(&self, keys: &str, target: &impl Locate) -> DomPathResult<ElementRef> {
        let element = target.locate(self)?;
        self.send_keys(&element, keys)?;
        Ok(element)
    }

    /// Current `value` of an input, empty when unset
    fn value_of(&self, target: &impl Locate) -> DomPathResult<String> {
        let element = target.locate(self)?;
        Ok(self.attribute(&element, "value")?.unwrap_or_default())
    }
}

impl<B: Browser + ?Sized> BrowserExt for B {}

// =============================================================================
// TIMEOUT GUARD
// =============================================================================

/// Changes the implicit timeout and restores a chosen value when dropped
pub struct TimeoutGuard<'a, B: Browser + ?Sized> {
    browser: &'a B,
    restore: Duration,
}

impl<'a, B: Browser + ?Sized> TimeoutGuard<'a, B> {
    /// Use `during` until the guard drops, then set `restore_to`
    pub fn set(browser: &'a B, during: Duration, restore_to: Duration) -> DomPathResult<Self> {
        debug!(?during, ?restore_to, "overriding implicit timeout");
        browser.set_implicit_timeout(during)?;
        Ok(Self {
            browser,
            restore: restore_to,
        })
    }

    /// Use `during` until the guard drops, then put back the current value
    pub fn lower(browser: &'a B, during: Duration) -> DomPathResult<Self> {
        let previous = browser.implicit_timeout();
        Self::set(browser, during, previous)
    }
}

impl<B: Browser + ?Sized> Drop for TimeoutGuard<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.browser.set_implicit_timeout(self.restore) {
            warn!(error = %e, "failed to restore implicit timeout");
        }
    }
}

impl<B: Browser + ?Sized> fmt::Debug for TimeoutGuard<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeoutGuard")
            .field("restore", &self.restore)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{BUTTON, INPUT};

    mod rect_tests {
        use super::*;

        #[test]
        fn test_edges() {
            let rect = Rect::new(10, 20, 30, 40);
            assert_eq!(rect.bottom(), 60);
            assert_eq!(rect.right(), 40);
        }
    }

    mod guard_tests {
        use super::*;

        #[test]
        fn test_lower_restores_previous() {
            let browser = MockBrowser::new();
            browser.set_implicit_timeout(Duration::from_secs(3)).unwrap();
            {
                let _guard = TimeoutGuard::lower(&browser, Duration::from_millis(10)).unwrap();
                assert_eq!(browser.implicit_timeout(), Duration::from_millis(10));
            }
            assert_eq!(browser.implicit_timeout(), Duration::from_secs(3));
        }

        #[test]
        fn test_set_restores_configured_value_on_error_path() {
            let browser = MockBrowser::new();
            let result: DomPathResult<()> = (|| {
                let _guard = TimeoutGuard::set(
                    &browser,
                    Duration::from_millis(5),
                    Duration::from_millis(5000),
                )?;
                browser.find(&INPUT)?;
                Ok(())
            })();
            assert!(result.unwrap_err().is_not_found());
            assert_eq!(browser.implicit_timeout(), Duration::from_millis(5000));
        }
    }

    mod ext_tests {
        use super::*;

        #[test]
        fn test_click_on_path_and_element() {
            let browser = MockBrowser::new();
            let button = browser.add_element(MockElement::new("button"));
            browser.register(&BUTTON, &[button.clone()]);

            assert_eq!(browser.click_on(&BUTTON).unwrap(), button);
            browser.click_on(&button).unwrap();
            assert_eq!(browser.calls_to("click").len(), 2);
        }

        #[test]
        fn test_value_of_defaults_to_empty() {
            let browser = MockBrowser::new();
            let input = browser.add_element(MockElement::new("input"));
            assert_eq!(browser.value_of(&input).unwrap(), "");
            browser.send_keys_to("hi", &input).unwrap();
            assert_eq!(browser.value_of(&input).unwrap(), "hi");
        }

        #[test]
        fn test_presence_and_count() {
            let browser = MockBrowser::new();
            let a = browser.add_element(MockElement::new("input"));
            let b = browser.add_element(MockElement::new("input"));
            assert!(!browser.is_present(&INPUT).unwrap());
            browser.register(&INPUT, &[a, b]);
            assert!(browser.is_present(&INPUT).unwrap());
            assert_eq!(browser.count(&INPUT).unwrap(), 2);
        }
    }
}
