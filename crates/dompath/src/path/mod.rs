//! Immutable element paths.
//!
//! A [`Path`] describes a set of DOM elements: a node kind (tag, any element,
//! or text node), followed by constraints kept in construction order. Every
//! combinator borrows `self` and returns a fresh value, so a path can be
//! shared and extended freely:
//!
//! ```
//! use dompath::paths::{INPUT, LABEL};
//! use dompath::high_level::has_type;
//!
//! let checkbox = INPUT.that([has_type("checkbox")]);
//! let named = checkbox.inside(&LABEL.with_text("Remember me"));
//!
//! assert_eq!(checkbox.to_xpath(), "//input[@type='checkbox']");
//! assert_eq!(named.to_xpath(), "//label[text()='Remember me']//input[@type='checkbox']");
//! ```

pub mod npath;
pub mod property;

pub use npath::{at_least, at_most, exactly, Cardinality, CountOp, NPath};
pub use property::{ElementProperty, ElementState, SiblingPosition, TextMatch, TextScope};

use crate::result::{DomPathError, DomPathResult};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// NODE KINDS
// =============================================================================

/// What a path selects before any constraint is applied
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Elements with the given tag name
    Element(Cow<'static, str>),
    /// Any element
    Any,
    /// Text nodes whose normalized content equals the string
    Text(String),
    /// Union of two paths, in document order
    Union(Box<Path>, Box<Path>),
    /// One position in the document-ordered match sequence of a path
    Occurrence(Box<Path>, Position),
}

/// Position inside a match sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// One-based position
    Nth(usize),
    /// Last match
    Last,
}

/// Structural relation between the candidate element and another path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Candidate is a descendant of the target
    Inside,
    /// Candidate has a descendant matching the target
    Containing,
    /// Candidate is the direct parent of the target
    ParentOf,
    /// Candidate is a direct child of the target
    ChildOf,
    /// Candidate follows the target in document order
    After,
    /// Candidate is a later sibling of the target
    AfterSibling,
    /// Candidate precedes the target in document order
    Before,
    /// Candidate is an earlier sibling of the target
    BeforeSibling,
    /// The target is the first element following the candidate
    ImmediatelyBefore,
    /// The target is the next sibling of the candidate
    ImmediatelyBeforeSibling,
    /// The candidate is the first element following the target
    ImmediatelyAfter,
    /// The candidate is the next sibling of the target
    ImmediatelyAfterSibling,
}

impl Relation {
    /// Phrase used when the relation was added with a path combinator
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Containing => "containing",
            Self::ParentOf => "parent of",
            Self::ChildOf => "child of",
            Self::After => "after",
            Self::AfterSibling => "after sibling",
            Self::Before => "before",
            Self::BeforeSibling => "before sibling",
            Self::ImmediatelyBefore => "immediately before",
            Self::ImmediatelyBeforeSibling => "immediately before sibling",
            Self::ImmediatelyAfter => "immediately after",
            Self::ImmediatelyAfterSibling => "immediately after sibling",
        }
    }

    /// Phrase used when the relation is an element property
    #[must_use]
    pub const fn property_phrase(self) -> &'static str {
        match self {
            Self::Inside => "has ancestor:",
            Self::Containing => "has descendant:",
            Self::ParentOf => "has child:",
            Self::ChildOf => "has parent:",
            Self::After => "is after:",
            Self::AfterSibling => "is after sibling:",
            Self::Before => "is before:",
            Self::BeforeSibling => "is before sibling:",
            Self::ImmediatelyBefore => "is immediately before:",
            Self::ImmediatelyBeforeSibling => "is immediately before sibling:",
            Self::ImmediatelyAfter => "is immediately after:",
            Self::ImmediatelyAfterSibling => "is immediately after sibling:",
        }
    }
}

/// One entry of a path's constraint list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Element property
    Property(ElementProperty),
    /// Structural relation to another path
    Relation(Relation, Path),
}

// =============================================================================
// PATH
// =============================================================================

/// Immutable description of a set of DOM elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub(crate) node: Node,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) description: Option<String>,
    pub(crate) described_upto: usize,
}

impl Path {
    /// Path selecting every element with the given tag
    #[must_use]
    pub const fn tag(name: &'static str) -> Self {
        Self::from_node(Node::Element(Cow::Borrowed(name)))
    }

    /// Path selecting any element
    #[must_use]
    pub const fn any() -> Self {
        Self::from_node(Node::Any)
    }

    /// Path selecting text nodes whose normalized content is `text`
    #[must_use]
    pub fn text_node(text: impl Into<String>) -> Self {
        Self::from_node(Node::Text(text.into()))
    }

    /// Path selecting elements with a tag outside the predefined set
    #[must_use]
    pub fn custom_element(name: impl Into<String>) -> Self {
        Self::from_node(Node::Element(Cow::Owned(name.into())))
    }

    const fn from_node(node: Node) -> Self {
        Self {
            node,
            constraints: Vec::new(),
            description: None,
            described_upto: 0,
        }
    }

    /// Node kind
    #[must_use]
    pub const fn node(&self) -> &Node {
        &self.node
    }

    /// Constraints in construction order
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Description override, if any
    #[must_use]
    pub fn description_override(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True for paths that select text nodes rather than elements
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.node, Node::Text(_))
    }

    fn with_constraint(&self, constraint: Constraint) -> Self {
        let mut next = self.clone();
        next.constraints.push(constraint);
        next
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    /// Restrict to elements satisfying all the given properties
    #[must_use]
    pub fn that(&self, props: impl IntoIterator<Item = ElementProperty>) -> Self {
        let mut next = self.clone();
        next.constraints
            .extend(props.into_iter().map(Constraint::Property));
        next
    }

    /// Restrict to elements satisfying `prop`; same as `that([prop])`
    #[must_use]
    pub fn and(&self, prop: ElementProperty) -> Self {
        self.that([prop])
    }

    /// Shorthand for `that([has_class(class)])`
    #[must_use]
    pub fn with_class(&self, class: impl Into<String>) -> Self {
        self.and(property::has_class(class))
    }

    /// Shorthand for `that([has_text(text)])`
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        self.and(property::has_text(text))
    }

    /// Union with `other`
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        Self::from_node(Node::Union(Box::new(self.clone()), Box::new(other.clone())))
    }

    /// Replace the human description of everything built so far.
    ///
    /// Constraints added afterwards are still described after the override.
    /// The compiled XPath is unaffected.
    #[must_use]
    pub fn described_by(&self, description: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.description = Some(description.into());
        next.described_upto = next.constraints.len();
        next
    }

    // -------------------------------------------------------------------------
    // Relations
    // -------------------------------------------------------------------------

    /// Descendant of some element matching `ancestor`.
    ///
    /// `p.inside(q).inside(r)` is stored as `p.inside(q.inside(r))`.
    #[must_use]
    pub fn inside(&self, ancestor: &Self) -> Self {
        let existing = self
            .constraints
            .iter()
            .position(|c| matches!(c, Constraint::Relation(Relation::Inside, _)));
        let Some(index) = existing else {
            return self.with_constraint(Constraint::Relation(Relation::Inside, ancestor.clone()));
        };

        let mut next = self.clone();
        if let Constraint::Relation(_, target) = &mut next.constraints[index] {
            *target = target.inside(ancestor);
        }
        if index < next.described_upto {
            if let Some(desc) = next.description.as_mut() {
                desc.push_str(&format!(", inside {}", crate::xpath::describe_target(ancestor)));
            }
        }
        next
    }

    /// Alias of [`Path::inside`]
    #[must_use]
    pub fn descendant_of(&self, ancestor: &Self) -> Self {
        self.inside(ancestor)
    }

    /// Has a descendant matching `descendant`
    #[must_use]
    pub fn containing(&self, descendant: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::Containing, descendant.clone()))
    }

    /// Alias of [`Path::containing`]
    #[must_use]
    pub fn ancestor_of(&self, descendant: &Self) -> Self {
        self.containing(descendant)
    }

    /// Direct parent of an element matching `child`
    #[must_use]
    pub fn parent_of(&self, child: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::ParentOf, child.clone()))
    }

    /// Direct child of an element matching `parent`
    #[must_use]
    pub fn child_of(&self, parent: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::ChildOf, parent.clone()))
    }

    /// Follows an element matching `other` in document order
    #[must_use]
    pub fn after(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::After, other.clone()))
    }

    /// Later sibling of an element matching `other`
    #[must_use]
    pub fn after_sibling(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::AfterSibling, other.clone()))
    }

    /// Precedes an element matching `other` in document order
    #[must_use]
    pub fn before(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::Before, other.clone()))
    }

    /// Earlier sibling of an element matching `other`
    #[must_use]
    pub fn before_sibling(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::BeforeSibling, other.clone()))
    }

    /// Directly precedes an element matching `other`
    #[must_use]
    pub fn immediately_before(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::ImmediatelyBefore, other.clone()))
    }

    /// Previous sibling of an element matching `other`
    #[must_use]
    pub fn immediately_before_sibling(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(
            Relation::ImmediatelyBeforeSibling,
            other.clone(),
        ))
    }

    /// Directly follows an element matching `other`
    #[must_use]
    pub fn immediately_after(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(Relation::ImmediatelyAfter, other.clone()))
    }

    /// Next sibling of an element matching `other`
    #[must_use]
    pub fn immediately_after_sibling(&self, other: &Self) -> Self {
        self.with_constraint(Constraint::Relation(
            Relation::ImmediatelyAfterSibling,
            other.clone(),
        ))
    }

    // -------------------------------------------------------------------------
    // Compilation
    // -------------------------------------------------------------------------

    /// Compile to an absolute XPath 1.0 expression
    #[must_use]
    pub fn to_xpath(&self) -> String {
        crate::xpath::compile(self)
    }

    /// Human readable description
    #[must_use]
    pub fn describe(&self) -> String {
        crate::xpath::describe(self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// =============================================================================
// POSITIONAL QUALIFIERS
// =============================================================================

/// Pending positional restriction, completed with [`Occurrence::of`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    position: Position,
}

impl Occurrence {
    /// Apply to a path
    #[must_use]
    pub fn of(self, path: &Path) -> Path {
        Path::from_node(Node::Occurrence(Box::new(path.clone()), self.position))
    }
}

/// The `k`-th match (one-based) in document order.
///
/// # Errors
///
/// `InvalidArgument` when `k` is zero.
pub fn occurrence_number(k: usize) -> DomPathResult<Occurrence> {
    if k == 0 {
        return Err(DomPathError::invalid_argument(
            "occurrence number starts at 1",
        ));
    }
    Ok(Occurrence {
        position: Position::Nth(k),
    })
}

/// First match in document order
#[must_use]
pub fn first_occurrence_of(path: &Path) -> Path {
    Occurrence {
        position: Position::Nth(1),
    }
    .of(path)
}

/// Last match in document order
#[must_use]
pub fn last_occurrence_of(path: &Path) -> Path {
    Occurrence {
        position: Position::Last,
    }
    .of(path)
}
