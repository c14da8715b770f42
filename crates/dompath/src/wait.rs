//! Polling until an element stops moving.
//!
//! An observation is the identity and bounding box of the first match. The
//! element is stable once two consecutive observations are present and equal.

use crate::browser::{Browser, ElementRef, Rect};
use crate::config::StabilityOptions;
use crate::path::Path;
use crate::result::DomPathResult;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

type Observation = Option<(ElementRef, Rect)>;

fn observe<B: Browser + ?Sized>(browser: &B, path: &Path) -> DomPathResult<Observation> {
    let element = match browser.find(path) {
        Ok(element) => element,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };
    let rect = browser.rect(&element)?;
    Ok(Some((element, rect)))
}

/// Poll `path` until it is stable or `budget_ms` runs out.
///
/// Returns the one-based iteration at which stability was observed, or the
/// number of iterations made when the budget is exhausted.
pub fn wait_until_stable<B: Browser + ?Sized>(
    browser: &B,
    path: &Path,
    budget_ms: u64,
) -> DomPathResult<u32> {
    wait_until_stable_with(browser, path, budget_ms, &StabilityOptions::default())
}

/// [`wait_until_stable`] with an explicit poll interval
pub fn wait_until_stable_with<B: Browser + ?Sized>(
    browser: &B,
    path: &Path,
    budget_ms: u64,
    options: &StabilityOptions,
) -> DomPathResult<u32> {
    let deadline = Instant::now().checked_add(Duration::from_millis(budget_ms));
    let mut previous: Observation = None;
    let mut iteration = 0_u32;

    loop {
        iteration += 1;
        let current = observe(browser, path)?;
        if current.is_some() && current == previous {
            debug!(iteration, target = %path, "element is stable");
            return Ok(iteration);
        }
        trace!(iteration, present = current.is_some(), "element not stable yet");
        previous = current;

        let now = Instant::now();
        let pause = match deadline {
            Some(deadline) if now >= deadline => {
                debug!(iteration, target = %path, "stability budget exhausted");
                return Ok(iteration);
            }
            Some(deadline) => options.poll_interval().min(deadline - now),
            // budget beyond what the clock can represent
            None => options.poll_interval(),
        };
        thread::sleep(pause);
    }
}
