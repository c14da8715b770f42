//! Process-wide browser for test suites that drive a single session.
//!
//! Passing a browser explicitly is preferred; this module exists for flows
//! where threading a handle through every helper is impractical. The lock is
//! released before any driver call is made.

use crate::browser::{Browser, BrowserExt, ElementRef};
use crate::path::Path;
use crate::result::{DomPathError, DomPathResult};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Shared browser handle
pub type SharedBrowser = Arc<dyn Browser + Send + Sync>;

static BROWSER: RwLock<Option<SharedBrowser>> = RwLock::new(None);

/// Install the process-wide browser, replacing any previous one
pub fn install(browser: SharedBrowser) {
    debug!("installing process-wide browser");
    *BROWSER.write().unwrap_or_else(PoisonError::into_inner) = Some(browser);
}

/// Remove the process-wide browser, returning it
pub fn teardown() -> Option<SharedBrowser> {
    debug!("tearing down process-wide browser");
    BROWSER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// The installed browser
pub fn browser() -> DomPathResult<SharedBrowser> {
    BROWSER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| DomPathError::Driver {
            message: "no browser installed; call singleton::install first".to_string(),
        })
}

/// [`Browser::find`] on the installed browser
pub fn find(path: &Path) -> DomPathResult<ElementRef> {
    browser()?.find(path)
}

/// [`Browser::find_all`] on the installed browser
pub fn find_all(path: &Path) -> DomPathResult<Vec<ElementRef>> {
    browser()?.find_all(path)
}

/// [`Browser::is_present`] on the installed browser
pub fn is_present(path: &Path) -> DomPathResult<bool> {
    browser()?.is_present(path)
}

/// [`Browser::count`] on the installed browser
pub fn count(path: &Path) -> DomPathResult<usize> {
    browser()?.count(path)
}

/// [`BrowserExt::click_on`] on the installed browser
pub fn click_on(path: &Path) -> DomPathResult<ElementRef> {
    browser()?.click_on(path)
}

/// [`BrowserExt::send_keys_to`] on the installed browser
pub fn send_keys_to(keys: &str, path: &Path) -> DomPathResult<ElementRef> {
    browser()?.send_keys_to(keys, path)
}
