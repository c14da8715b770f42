//! In-memory browser for tests.
//!
//! Queries are answered by compiled XPath: register which elements a path
//! resolves to, optionally only while a container is scrolled into a given
//! window. Every call is recorded in a history of `method:args` strings.

use super::{keys, Browser, ElementRef, Rect, ScrollOffset};
use crate::path::Path;
use crate::result::{DomPathError, DomPathResult};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ops::RangeInclusive;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// How an element's value reacts to typed keys
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyBehavior {
    /// Printable keys append, BACKSPACE removes the last character
    #[default]
    Editable,
    /// Keys are ignored
    Frozen,
    /// Each `send_keys` call replaces the value with the next scripted one,
    /// then falls back to `Editable` once the script runs out
    Scripted(VecDeque<String>),
}

/// Element definition for [`MockBrowser`]
#[derive(Debug, Clone)]
pub struct MockElement {
    tag: String,
    attributes: BTreeMap<String, String>,
    value: String,
    rect: Rect,
    displayed: bool,
    keys: KeyBehavior,
    native_clear: bool,
    scroll_extent: ScrollOffset,
    anchor: Option<String>,
}

impl MockElement {
    /// Create an element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            value: String::new(),
            rect: Rect::new(0, 0, 100, 20),
            displayed: true,
            keys: KeyBehavior::Editable,
            native_clear: true,
            scroll_extent: ScrollOffset::default(),
            anchor: None,
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the bounding box
    #[must_use]
    pub const fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Mark as not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Set the key behaviour
    #[must_use]
    pub fn with_keys(mut self, keys: KeyBehavior) -> Self {
        self.keys = keys;
        self
    }

    /// Whether the native clear empties the value
    #[must_use]
    pub const fn with_native_clear(mut self, works: bool) -> Self {
        self.native_clear = works;
        self
    }

    /// Make the element scrollable up to the given offsets
    #[must_use]
    pub const fn scrollable(mut self, max_x: i64, max_y: i64) -> Self {
        self.scroll_extent = ScrollOffset { x: max_x, y: max_y };
        self
    }

    /// Position the element relative to a scroll container's content
    #[must_use]
    pub fn anchored_to(mut self, container: &ElementRef) -> Self {
        self.anchor = Some(container.id().to_string());
        self
    }

    /// Tag name
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Scroll range of a container within which a registered query matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollWindow {
    container: String,
    x: RangeInclusive<i64>,
    y: RangeInclusive<i64>,
}

impl ScrollWindow {
    /// Match while the container's vertical offset is in `y`
    #[must_use]
    pub fn vertical(container: &ElementRef, y: RangeInclusive<i64>) -> Self {
        Self {
            container: container.id().to_string(),
            x: i64::MIN..=i64::MAX,
            y,
        }
    }

    /// Match while the container's horizontal offset is in `x`
    #[must_use]
    pub fn horizontal(container: &ElementRef, x: RangeInclusive<i64>) -> Self {
        Self {
            container: container.id().to_string(),
            x,
            y: i64::MIN..=i64::MAX,
        }
    }

    /// Narrow the vertical range
    #[must_use]
    pub const fn with_y(mut self, y: RangeInclusive<i64>) -> Self {
        self.y = y;
        self
    }
}

#[derive(Debug, Clone)]
struct QueryRule {
    elements: Vec<String>,
    window: Option<ScrollWindow>,
}

#[derive(Debug)]
struct MockState {
    elements: HashMap<String, MockElement>,
    scroll: HashMap<String, ScrollOffset>,
    queries: HashMap<String, Vec<QueryRule>>,
    implicit_timeout: Duration,
    history: Vec<String>,
}

/// Mock browser for unit and scenario tests
#[derive(Debug)]
pub struct MockBrowser {
    state: Mutex<MockState>,
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowser {
    /// Empty page with a zero implicit timeout
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                elements: HashMap::new(),
                scroll: HashMap::new(),
                queries: HashMap::new(),
                implicit_timeout: Duration::ZERO,
                history: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element to the page
    pub fn add_element(&self, element: MockElement) -> ElementRef {
        let id = Uuid::new_v4().to_string();
        self.state().elements.insert(id.clone(), element);
        ElementRef::new(id)
    }

    /// Make `path` resolve to `elements`, in addition to earlier registrations
    pub fn register(&self, path: &Path, elements: &[ElementRef]) {
        self.register_rule(path.to_xpath(), elements, None);
    }

    /// Make a raw XPath resolve to `elements`
    pub fn register_xpath(&self, xpath: impl Into<String>, elements: &[ElementRef]) {
        self.register_rule(xpath.into(), elements, None);
    }

    /// Make `path` resolve to `elements` only while `window` holds
    pub fn register_when(&self, path: &Path, elements: &[ElementRef], window: ScrollWindow) {
        self.register_rule(path.to_xpath(), elements, Some(window));
    }

    fn register_rule(&self, xpath: String, elements: &[ElementRef], window: Option<ScrollWindow>) {
        let rule = QueryRule {
            elements: elements.iter().map(|e| e.id().to_string()).collect(),
            window,
        };
        self.state().queries.entry(xpath).or_default().push(rule);
    }

    /// Forget every registration of `path`
    pub fn unregister(&self, path: &Path) {
        self.state().queries.remove(&path.to_xpath());
    }

    /// Current value of an element
    #[must_use]
    pub fn value(&self, element: &ElementRef) -> String {
        self.state()
            .elements
            .get(element.id())
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    /// Replace an element's value without recording a call
    pub fn set_value(&self, element: &ElementRef, value: impl Into<String>) {
        if let Some(e) = self.state().elements.get_mut(element.id()) {
            e.value = value.into();
        }
    }

    /// Call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Recorded calls of one method
    #[must_use]
    pub fn calls_to(&self, method: &str) -> Vec<String> {
        let prefix = format!("{method}:");
        self.state()
            .history
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        !self.calls_to(method).is_empty()
    }

    /// Drop the recorded history
    pub fn clear_history(&self) {
        self.state().history.clear();
    }
}

impl MockState {
    fn element(&self, element: &ElementRef) -> DomPathResult<&MockElement> {
        self.elements
            .get(element.id())
            .ok_or_else(|| DomPathError::driver(format!("stale element {element}")))
    }

    fn element_mut(&mut self, element: &ElementRef) -> DomPathResult<&mut MockElement> {
        self.elements
            .get_mut(element.id())
            .ok_or_else(|| DomPathError::driver(format!("stale element {element}")))
    }

    fn offset(&self, id: &str) -> ScrollOffset {
        self.scroll.get(id).copied().unwrap_or_default()
    }

    fn window_holds(&self, window: &ScrollWindow) -> bool {
        let offset = self.offset(&window.container);
        window.x.contains(&offset.x) && window.y.contains(&offset.y)
    }

    fn resolve(&self, xpath: &str) -> Vec<ElementRef> {
        let mut found: Vec<ElementRef> = Vec::new();
        for rule in self.queries.get(xpath).into_iter().flatten() {
            if rule.window.as_ref().is_some_and(|w| !self.window_holds(w)) {
                continue;
            }
            for id in &rule.elements {
                let element = ElementRef::new(id.clone());
                if !found.contains(&element) {
                    found.push(element);
                }
            }
        }
        found
    }

    fn set_scroll(&mut self, element: &ElementRef, x: i64, y: i64) -> DomPathResult<()> {
        let extent = self.element(element)?.scroll_extent;
        let clamped = ScrollOffset {
            x: x.clamp(0, extent.x.max(0)),
            y: y.clamp(0, extent.y.max(0)),
        };
        self.scroll.insert(element.id().to_string(), clamped);
        Ok(())
    }
}

fn type_keys(value: &mut String, keys_sent: &str) {
    for c in keys_sent.chars() {
        let mut buf = [0; 4];
        match &*c.encode_utf8(&mut buf) {
            keys::BACKSPACE => {
                value.pop();
            }
            // cursor stays at the end
            keys::DELETE | keys::ENTER => {}
            _ => value.push(c),
        }
    }
}

impl Browser for MockBrowser {
    fn find(&self, path: &Path) -> DomPathResult<ElementRef> {
        let xpath = path.to_xpath();
        let mut state = self.state();
        state.history.push(format!("find:{xpath}"));
        state
            .resolve(&xpath)
            .into_iter()
            .next()
            .ok_or_else(|| DomPathError::not_found(xpath))
    }

    fn find_all(&self, path: &Path) -> DomPathResult<Vec<ElementRef>> {
        let xpath = path.to_xpath();
        let mut state = self.state();
        state.history.push(format!("find_all:{xpath}"));
        Ok(state.resolve(&xpath))
    }

    fn click(&self, element: &ElementRef) -> DomPathResult<()> {
        let mut state = self.state();
        state.element(element)?;
        state.history.push(format!("click:{element}"));
        Ok(())
    }

    fn send_keys(&self, element: &ElementRef, keys_sent: &str) -> DomPathResult<()> {
        let mut state = self.state();
        state.history.push(format!("send_keys:{element}:{keys_sent}"));
        let target = state.element_mut(element)?;
        match &mut target.keys {
            KeyBehavior::Frozen => {}
            KeyBehavior::Scripted(script) => {
                if let Some(next) = script.pop_front() {
                    target.value = next;
                } else {
                    type_keys(&mut target.value, keys_sent);
                }
            }
            KeyBehavior::Editable => type_keys(&mut target.value, keys_sent),
        }
        Ok(())
    }

    fn clear(&self, element: &ElementRef) -> DomPathResult<()> {
        let mut state = self.state();
        state.history.push(format!("clear:{element}"));
        let target = state.element_mut(element)?;
        if target.native_clear {
            target.value.clear();
        }
        Ok(())
    }

    fn attribute(&self, element: &ElementRef, name: &str) -> DomPathResult<Option<String>> {
        let state = self.state();
        let target = state.element(element)?;
        if name == "value" {
            return Ok(Some(target.value.clone()));
        }
        Ok(target.attributes.get(name).cloned())
    }

    fn rect(&self, element: &ElementRef) -> DomPathResult<Rect> {
        let state = self.state();
        let target = state.element(element)?;
        let mut rect = target.rect;
        if let Some(anchor) = &target.anchor {
            let offset = state.offset(anchor);
            rect.x -= offset.x;
            rect.y -= offset.y;
        }
        Ok(rect)
    }

    fn is_displayed(&self, element: &ElementRef) -> DomPathResult<bool> {
        Ok(self.state().element(element)?.displayed)
    }

    fn scroll_by(&self, element: &ElementRef, dx: i64, dy: i64) -> DomPathResult<()> {
        let mut state = self.state();
        state.history.push(format!("scroll_by:{element}:{dx},{dy}"));
        let current = state.offset(element.id());
        state.set_scroll(element, current.x + dx, current.y + dy)
    }

    fn scroll_to(
        &self,
        element: &ElementRef,
        x: Option<i64>,
        y: Option<i64>,
    ) -> DomPathResult<()> {
        let mut state = self.state();
        state
            .history
            .push(format!("scroll_to:{element}:{x:?},{y:?}"));
        let current = state.offset(element.id());
        state.set_scroll(element, x.unwrap_or(current.x), y.unwrap_or(current.y))
    }

    fn scroll_offset(&self, element: &ElementRef) -> DomPathResult<ScrollOffset> {
        let state = self.state();
        state.element(element)?;
        Ok(state.offset(element.id()))
    }

    fn set_implicit_timeout(&self, timeout: Duration) -> DomPathResult<()> {
        let mut state = self.state();
        state
            .history
            .push(format!("set_implicit_timeout:{}", timeout.as_millis()));
        state.implicit_timeout = timeout;
        Ok(())
    }

    fn implicit_timeout(&self) -> Duration {
        self.state().implicit_timeout
    }
}
