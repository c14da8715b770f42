//! Counted occurrences: `exactly(2).occurrences_of(&LI)`.

use super::Path;
use std::fmt;

/// Count comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountOp {
    /// `=`
    Exactly,
    /// `>=`
    AtLeast,
    /// `<=`
    AtMost,
}

impl CountOp {
    /// XPath comparison operator
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Exactly => "=",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }

    /// Human phrase
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Exactly => "exactly",
            Self::AtLeast => "at least",
            Self::AtMost => "at most",
        }
    }

    /// Whether `actual` satisfies the comparison against `expected`
    #[must_use]
    pub const fn holds(self, actual: usize, expected: usize) -> bool {
        match self {
            Self::Exactly => actual == expected,
            Self::AtLeast => actual >= expected,
            Self::AtMost => actual <= expected,
        }
    }
}

/// Count qualifier waiting for its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    op: CountOp,
    n: usize,
}

impl Cardinality {
    /// Attach the counted path
    #[must_use]
    pub fn occurrences_of(self, path: &Path) -> NPath {
        NPath {
            op: self.op,
            n: self.n,
            path: Box::new(path.clone()),
        }
    }
}

/// `exactly n`
#[must_use]
pub const fn exactly(n: usize) -> Cardinality {
    Cardinality {
        op: CountOp::Exactly,
        n,
    }
}

/// `at least n`
#[must_use]
pub const fn at_least(n: usize) -> Cardinality {
    Cardinality {
        op: CountOp::AtLeast,
        n,
    }
}

/// `at most n`
#[must_use]
pub const fn at_most(n: usize) -> Cardinality {
    Cardinality {
        op: CountOp::AtMost,
        n,
    }
}

/// A path with a count qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NPath {
    op: CountOp,
    n: usize,
    path: Box<Path>,
}

impl NPath {
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

    /// Counted path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for NPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} occurrences of {}",
            self.op.phrase(),
            self.n,
            crate::xpath::describe_target(&self.path)
        )
    }
}
