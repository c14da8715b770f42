//! Directional scrolling inside a container until a target shows up.
//!
//! Every search checks for the target before the first step and after each
//! step. A step that does not strictly advance the scroll offset on its axis
//! counts as a stall; after `max_stalls` consecutive stalls the content is
//! considered exhausted and the search fails with `NotFound`.

use crate::browser::{Browser, ElementRef, Locate};
use crate::config::ScrollConfig;
use crate::path::Path;
use crate::result::{DomPathError, DomPathResult};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Down,
    Right,
}

impl Axis {
    const fn name(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Right => "right",
        }
    }
}

/// Scrollable container bound to a browser
#[derive(Debug)]
pub struct ScrollElement<'a, B: Browser + ?Sized> {
    browser: &'a B,
    container: ElementRef,
    config: ScrollConfig,
}

impl<'a, B: Browser + ?Sized> ScrollElement<'a, B> {
    /// Resolve the container and use the default step
    pub fn new(browser: &'a B, container: &impl Locate) -> DomPathResult<Self> {
        Ok(Self {
            container: container.locate(browser)?,
            browser,
            config: ScrollConfig::default(),
        })
    }

    /// Replace the scroll settings
    #[must_use]
    pub const fn with_config(mut self, config: ScrollConfig) -> Self {
        self.config = config;
        self
    }

    /// Same container with a different step size
    #[must_use]
    pub const fn with_step_override(mut self, step_px: i64) -> Self {
        self.config.step_px = step_px;
        self
    }

    /// The resolved container
    #[must_use]
    pub const fn container(&self) -> &ElementRef {
        &self.container
    }

    /// Step size in pixels
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.config.step_px
    }

    /// Scroll to the top left corner
    pub fn to_top_left_corner(&self) -> DomPathResult<()> {
        self.browser.scroll_to(&self.container, Some(0), Some(0))
    }

    /// Scroll to the left edge, keeping the vertical position
    pub fn to_left_corner(&self) -> DomPathResult<()> {
        self.browser.scroll_to(&self.container, Some(0), None)
    }

    /// Scroll to the top edge, keeping the horizontal position
    pub fn to_top_corner(&self) -> DomPathResult<()> {
        self.browser.scroll_to(&self.container, None, Some(0))
    }

    /// Scroll down until `path` matches something
    pub fn down_until_element_is_present(&self, path: &Path) -> DomPathResult<ElementRef> {
        self.scroll_until(Axis::Down, path, |_| Ok(true))
    }

    /// Scroll down until an element matching `path` satisfies `predicate`
    pub fn down_until_predicate<F>(&self, path: &Path, predicate: F) -> DomPathResult<ElementRef>
    where
        F: FnMut(&ElementRef) -> DomPathResult<bool>,
    {
        self.scroll_until(Axis::Down, path, predicate)
    }

    /// Scroll right until `path` matches something
    pub fn right_until_element_is_present(&self, path: &Path) -> DomPathResult<ElementRef> {
        self.scroll_until(Axis::Right, path, |_| Ok(true))
    }

    /// Scroll right until an element matching `path` satisfies `predicate`
    pub fn right_until_predicate<F>(&self, path: &Path, predicate: F) -> DomPathResult<ElementRef>
    where
        F: FnMut(&ElementRef) -> DomPathResult<bool>,
    {
        self.scroll_until(Axis::Right, path, predicate)
    }

    fn offset(&self, axis: Axis) -> DomPathResult<i64> {
        let offset = self.browser.scroll_offset(&self.container)?;
        Ok(match axis {
            Axis::Down => offset.y,
            Axis::Right => offset.x,
        })
    }

    fn probe<F>(&self, path: &Path, predicate: &mut F) -> DomPathResult<Option<ElementRef>>
    where
        F: FnMut(&ElementRef) -> DomPathResult<bool>,
    {
        for element in self.browser.find_all(path)? {
            if predicate(&element)? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    fn scroll_until<F>(&self, axis: Axis, path: &Path, mut predicate: F) -> DomPathResult<ElementRef>
    where
        F: FnMut(&ElementRef) -> DomPathResult<bool>,
    {
        let mut stalls = 0;
        let mut steps = 0_u32;
        loop {
            if let Some(found) = self.probe(path, &mut predicate)? {
                debug!(axis = axis.name(), steps, target = %path, "scroll target found");
                return Ok(found);
            }
            if stalls >= self.config.max_stalls {
                return Err(DomPathError::not_found(format!(
                    "{path} after scrolling {} {steps} steps",
                    axis.name()
                )));
            }

            let before = self.offset(axis)?;
            match axis {
                Axis::Down => self.browser.scroll_by(&self.container, 0, self.config.step_px)?,
                Axis::Right => self.browser.scroll_by(&self.container, self.config.step_px, 0)?,
            }
            let after = self.offset(axis)?;
            steps += 1;

            if after > before {
                stalls = 0;
                trace!(axis = axis.name(), offset = after, "scrolled");
            } else {
                stalls += 1;
                debug!(axis = axis.name(), offset = after, stalls, "scroll did not advance");
            }
        }
    }
}
