//! Count assertions tuned for the passing case.
//!
//! A passing check costs one or two presence probes on positional queries.
//! Only a failing check counts every match, to report the actual number.

use crate::browser::Browser;
use crate::path::npath::CountOp;
use crate::path::{occurrence_number, Path};
use crate::result::{DomPathError, DomPathResult};
use std::fmt;
use tracing::debug;

/// Expect a path to match `n` elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsPresentNTimes {
    n: usize,
}

impl IsPresentNTimes {
    /// # Errors
    ///
    /// `InvalidArgument` for zero; assert absence instead.
    pub fn new(n: usize) -> DomPathResult<Self> {
        if n == 0 {
            return Err(DomPathError::invalid_argument(
                "use an absence check to assert an element is not present",
            ));
        }
        Ok(Self { n })
    }

    /// Exactly `n`
    #[must_use]
    pub const fn times(self) -> CountMatcher {
        CountMatcher {
            op: CountOp::Exactly,
            n: self.n,
        }
    }

    /// `n` or more
    #[must_use]
    pub const fn times_or_more(self) -> CountMatcher {
        CountMatcher {
            op: CountOp::AtLeast,
            n: self.n,
        }
    }

    /// `n` or fewer
    #[must_use]
    pub const fn times_or_less(self) -> CountMatcher {
        CountMatcher {
            op: CountOp::AtMost,
            n: self.n,
        }
    }
}

/// A count expectation ready to check against a browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMatcher {
    op: CountOp,
    n: usize,
}

impl fmt::Display for CountMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            CountOp::Exactly => write!(f, "{} occurrences", self.n),
            op => write!(f, "{} {} occurrences", op.phrase(), self.n),
        }
    }
}

impl CountMatcher {
    /// Comparison
    #[must_use]
    pub const fn op(&self) -> CountOp {
        self.op
    }

    /// Expected count
    #[must_use]
    pub const fn count(&self) -> usize {
        self.n
    }

    fn passes_fast<B: Browser + ?Sized>(&self, browser: &B, path: &Path) -> DomPathResult<bool> {
        let nth_present = || -> DomPathResult<bool> {
            browser.is_present(&occurrence_number(self.n)?.of(path))
        };
        let next_absent = || -> DomPathResult<bool> {
            match self.n.checked_add(1) {
                Some(next) => Ok(!browser.is_present(&occurrence_number(next)?.of(path))?),
                // nothing can follow the last representable position
                None => Ok(true),
            }
        };
        match self.op {
            CountOp::AtLeast => nth_present(),
            CountOp::AtMost => next_absent(),
            CountOp::Exactly => Ok(nth_present()? && next_absent()?),
        }
    }

    /// # Errors
    ///
    /// `AssertionFailed` naming the expected and actual counts.
    pub fn check<B: Browser + ?Sized>(&self, browser: &B, path: &Path) -> DomPathResult<()> {
        if self.passes_fast(browser, path)? {
            return Ok(());
        }
        let actual = browser.count(path)?;
        debug!(expected = self.n, actual, target = %path, "count check failed fast probe");
        if self.op.holds(actual, self.n) {
            return Ok(());
        }
        Err(DomPathError::AssertionFailed {
            message: format!("expected {self} of {path}, but found {actual}"),
        })
    }
}
