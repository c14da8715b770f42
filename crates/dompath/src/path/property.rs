//! Element properties: predicates on a single candidate element.
//!
//! Properties render to XPath predicate fragments evaluated with the
//! candidate as context node. Boolean combinators build trees without any
//! simplification, so `not(not(p))` prints as written.

use super::npath::NPath;
use super::{Path, Relation};
use crate::result::{DomPathError, DomPathResult};
use std::fmt;

/// Which text a text property looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextScope {
    /// The element's own text nodes
    Own,
    /// All descendant text, whitespace-normalized
    Aggregated,
}

/// How a text property compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextMatch {
    /// Whole text equals the value
    Equals,
    /// Text contains the value
    Contains,
    /// Text starts with the value
    StartsWith,
    /// Text ends with the value
    EndsWith,
    /// Glob pattern where `*` matches any run of characters
    Pattern,
}

/// Position of the element among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiblingPosition {
    /// Zero-based index among element siblings
    Nth(usize),
    /// Last element sibling
    Last,
    /// Only element child of its parent
    Only,
}

/// Boolean element state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// `checked` attribute present
    Checked,
    /// `selected` attribute present
    Selected,
    /// `disabled` attribute present
    Disabled,
    /// `disabled` attribute absent
    Enabled,
}

/// Predicate on a single DOM element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementProperty {
    /// Attribute present
    HasAttribute(String),
    /// Attribute equals value
    AttributeEquals {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
    /// Attribute, split on whitespace, contains the word
    AttributeContainsWord {
        /// Attribute name
        name: String,
        /// Word
        word: String,
    },
    /// Attribute contains the substring
    AttributeContains {
        /// Attribute name
        name: String,
        /// Substring
        value: String,
    },
    /// `id` equals value
    HasId(String),
    /// Class list contains the class
    HasClass(String),
    /// Class list contains at least one of the classes
    HasAnyClass(Vec<String>),
    /// Class list contains all of the classes
    HasClasses(Vec<String>),
    /// Some class contains the substring
    ClassContains(String),
    /// Text comparison
    Text {
        /// Own or aggregated text
        scope: TextScope,
        /// Comparison
        kind: TextMatch,
        /// Value or pattern
        value: String,
    },
    /// Position among siblings
    Sibling(SiblingPosition),
    /// Exact number of element children
    ChildCount(usize),
    /// At least one element child
    HasChildren,
    /// No element children
    NoChildren,
    /// Element state
    State(ElementState),
    /// Structural relation to another path
    Related(Relation, Box<Path>),
    /// Shares a parent with an element matching the path
    SiblingOf(Box<Path>),
    /// Counted descendants
    Occurrences(NPath),
    /// Raw fragment with its phrase
    Custom {
        /// XPath predicate fragment
        xpath: String,
        /// Human phrase
        description: String,
    },
    /// Both hold
    And(Box<Self>, Box<Self>),
    /// Either holds
    Or(Box<Self>, Box<Self>),
    /// Negation
    Not(Box<Self>),
}

impl ElementProperty {
    /// Conjunction
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Disjunction
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// XPath predicate fragment
    #[must_use]
    pub fn to_xpath(&self) -> String {
        crate::xpath::property_fragment(self)
    }

    /// Human phrase
    #[must_use]
    pub fn describe(&self) -> String {
        crate::xpath::describe_property(self)
    }
}

impl fmt::Display for ElementProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// =============================================================================
// FACTORIES
// =============================================================================

/// Negation of a property
#[must_use]
pub fn not(prop: ElementProperty) -> ElementProperty {
    ElementProperty::Not(Box::new(prop))
}

/// Attribute present
#[must_use]
pub fn has_attribute(name: impl Into<String>) -> ElementProperty {
    ElementProperty::HasAttribute(name.into())
}

/// Attribute equals value
#[must_use]
pub fn has_attribute_value(name: impl Into<String>, value: impl Into<String>) -> ElementProperty {
    ElementProperty::AttributeEquals {
        name: name.into(),
        value: value.into(),
    }
}

/// Attribute contains a whitespace-separated word
#[must_use]
pub fn has_attribute_word(name: impl Into<String>, word: impl Into<String>) -> ElementProperty {
    ElementProperty::AttributeContainsWord {
        name: name.into(),
        word: word.into(),
    }
}

/// Attribute contains a substring
#[must_use]
pub fn has_attribute_containing(
    name: impl Into<String>,
    value: impl Into<String>,
) -> ElementProperty {
    ElementProperty::AttributeContains {
        name: name.into(),
        value: value.into(),
    }
}

/// Matches the `role` attribute
#[must_use]
pub fn has_role(role: impl Into<String>) -> ElementProperty {
    has_attribute_value("role", role)
}

/// Matches the `ref` attribute
#[must_use]
pub fn has_ref(value: impl Into<String>) -> ElementProperty {
    has_attribute_value("ref", value)
}

/// `id` equals value
#[must_use]
pub fn has_id(id: impl Into<String>) -> ElementProperty {
    ElementProperty::HasId(id.into())
}

/// Has the class
#[must_use]
pub fn has_class(class: impl Into<String>) -> ElementProperty {
    ElementProperty::HasClass(class.into())
}

/// Has at least one of the classes
#[must_use]
pub fn has_any_of_classes<I, S>(classes: I) -> ElementProperty
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ElementProperty::HasAnyClass(classes.into_iter().map(Into::into).collect())
}

/// Has all of the classes
#[must_use]
pub fn has_classes<I, S>(classes: I) -> ElementProperty
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ElementProperty::HasClasses(classes.into_iter().map(Into::into).collect())
}

/// Some class contains the substring
#[must_use]
pub fn has_class_containing(fragment: impl Into<String>) -> ElementProperty {
    ElementProperty::ClassContains(fragment.into())
}

fn text(scope: TextScope, kind: TextMatch, value: impl Into<String>) -> ElementProperty {
    ElementProperty::Text {
        scope,
        kind,
        value: value.into(),
    }
}

/// Own text equals value
#[must_use]
pub fn has_text(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Own, TextMatch::Equals, value)
}

/// Own text contains value
#[must_use]
pub fn has_text_containing(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Own, TextMatch::Contains, value)
}

/// Own text starts with value
#[must_use]
pub fn has_text_starting_with(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Own, TextMatch::StartsWith, value)
}

/// Own text ends with value
#[must_use]
pub fn has_text_ending_with(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Own, TextMatch::EndsWith, value)
}

/// Aggregated text equals value
#[must_use]
pub fn has_aggregated_text_equal_to(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Aggregated, TextMatch::Equals, value)
}

/// Aggregated text contains value
#[must_use]
pub fn has_aggregated_text_containing(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Aggregated, TextMatch::Contains, value)
}

/// Aggregated text starts with value
#[must_use]
pub fn has_aggregated_text_starting_with(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Aggregated, TextMatch::StartsWith, value)
}

/// Aggregated text ends with value
#[must_use]
pub fn has_aggregated_text_ending_with(value: impl Into<String>) -> ElementProperty {
    text(TextScope::Aggregated, TextMatch::EndsWith, value)
}

fn pattern(scope: TextScope, glob: String) -> DomPathResult<ElementProperty> {
    if glob.is_empty() {
        return Err(DomPathError::invalid_argument("text pattern is empty"));
    }
    Ok(text(scope, TextMatch::Pattern, glob))
}

/// Own text matches a glob where `*` stands for any run of characters.
///
/// # Errors
///
/// `InvalidArgument` for an empty pattern.
pub fn has_text_matching(glob: impl Into<String>) -> DomPathResult<ElementProperty> {
    pattern(TextScope::Own, glob.into())
}

/// Aggregated text matches a glob where `*` stands for any run of characters.
///
/// # Errors
///
/// `InvalidArgument` for an empty pattern.
pub fn has_aggregated_text_matching(glob: impl Into<String>) -> DomPathResult<ElementProperty> {
    pattern(TextScope::Aggregated, glob.into())
}

/// Zero-based position among element siblings
#[must_use]
pub const fn is_nth_sibling(index: usize) -> ElementProperty {
    ElementProperty::Sibling(SiblingPosition::Nth(index))
}

/// Last among its element siblings
#[must_use]
pub const fn is_last_sibling() -> ElementProperty {
    ElementProperty::Sibling(SiblingPosition::Last)
}

/// Only element child of its parent
#[must_use]
pub const fn is_only_child() -> ElementProperty {
    ElementProperty::Sibling(SiblingPosition::Only)
}

/// Exactly `n` element children
#[must_use]
pub const fn has_n_children(n: usize) -> ElementProperty {
    ElementProperty::ChildCount(n)
}

/// Has element children
#[must_use]
pub const fn has_children() -> ElementProperty {
    ElementProperty::HasChildren
}

/// Has no element children
#[must_use]
pub const fn has_no_children() -> ElementProperty {
    ElementProperty::NoChildren
}

/// `checked` attribute present
#[must_use]
pub const fn is_checked() -> ElementProperty {
    ElementProperty::State(ElementState::Checked)
}

/// `selected` attribute present
#[must_use]
pub const fn is_selected() -> ElementProperty {
    ElementProperty::State(ElementState::Selected)
}

/// `disabled` attribute present
#[must_use]
pub const fn is_disabled() -> ElementProperty {
    ElementProperty::State(ElementState::Disabled)
}

/// `disabled` attribute absent
#[must_use]
pub const fn is_enabled() -> ElementProperty {
    ElementProperty::State(ElementState::Enabled)
}

fn related(relation: Relation, path: &Path) -> ElementProperty {
    ElementProperty::Related(relation, Box::new(path.clone()))
}

/// Has a descendant matching the path
#[must_use]
pub fn contains(path: &Path) -> ElementProperty {
    related(Relation::Containing, path)
}

/// Alias of [`contains`]
#[must_use]
pub fn has_descendant(path: &Path) -> ElementProperty {
    contains(path)
}

/// Has a counted number of descendants matching a path
#[must_use]
pub const fn contains_occurrences(npath: NPath) -> ElementProperty {
    ElementProperty::Occurrences(npath)
}

/// Has a direct child matching the path
#[must_use]
pub fn has_child(path: &Path) -> ElementProperty {
    related(Relation::ParentOf, path)
}

/// Has a direct parent matching the path
#[must_use]
pub fn has_parent(path: &Path) -> ElementProperty {
    related(Relation::ChildOf, path)
}

/// Has an ancestor matching the path
#[must_use]
pub fn has_ancestor(path: &Path) -> ElementProperty {
    related(Relation::Inside, path)
}

/// Follows an element matching the path
#[must_use]
pub fn is_after(path: &Path) -> ElementProperty {
    related(Relation::After, path)
}

/// Precedes an element matching the path
#[must_use]
pub fn is_before(path: &Path) -> ElementProperty {
    related(Relation::Before, path)
}

/// Later sibling of an element matching the path
#[must_use]
pub fn is_after_sibling(path: &Path) -> ElementProperty {
    related(Relation::AfterSibling, path)
}

/// Earlier sibling of an element matching the path
#[must_use]
pub fn is_before_sibling(path: &Path) -> ElementProperty {
    related(Relation::BeforeSibling, path)
}

/// Sibling, on either side, of an element matching the path
#[must_use]
pub fn is_sibling_of(path: &Path) -> ElementProperty {
    ElementProperty::SiblingOf(Box::new(path.clone()))
}

/// Raw predicate fragment with its phrase
#[must_use]
pub fn custom(xpath: impl Into<String>, description: impl Into<String>) -> ElementProperty {
    ElementProperty::Custom {
        xpath: xpath.into(),
        description: description.into(),
    }
}

/// Build a property constructor out of two value renderers.
///
/// ```
/// use dompath::path::property::create_property_generator;
/// use dompath::paths::INPUT;
///
/// let has_name = create_property_generator(
///     |v| format!("@name='{v}'"),
///     |v| format!("has name {v}"),
/// );
/// assert_eq!(INPUT.that([has_name("email")]).to_xpath(), "//input[@name='email']");
/// ```
pub fn create_property_generator<F, D>(fragment: F, phrase: D) -> impl Fn(&str) -> ElementProperty
where
    F: Fn(&str) -> String,
    D: Fn(&str) -> String,
{
    move |value| custom(fragment(value), phrase(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{DIV, INPUT};

    mod combinator_tests {
        use super::*;

        #[test]
        fn test_double_negation_is_kept() {
            let p = has_class("x");
            let twice = not(not(p.clone()));
            assert_ne!(twice, p);
            assert_ne!(twice.describe(), p.describe());
            assert_eq!(twice.describe(), "not (not (has class x))");
        }

        #[test]
        fn test_no_de_morgan() {
            let prop = not(has_class("a").and(has_class("b")));
            assert!(prop.to_xpath().starts_with("not(("));
        }

        #[test]
        fn test_pattern_rejects_empty() {
            assert!(has_text_matching("").is_err());
            assert!(has_aggregated_text_matching("a*").is_ok());
        }
    }

    mod generator_tests {
        use super::*;

        #[test]
        fn test_generator_uses_both_renderers() {
            let gen = create_property_generator(|v| format!("@lang='{v}'"), |v| format!("in {v}"));
            let prop = gen("en");
            assert_eq!(prop.to_xpath(), "@lang='en'");
            assert_eq!(prop.describe(), "in en");
        }

        #[test]
        fn test_relation_properties() {
            assert_eq!(has_child(&INPUT).to_xpath(), "child::input");
            assert_eq!(has_parent(&DIV).to_xpath(), "parent::div");
            assert_eq!(has_ancestor(&DIV).to_xpath(), "ancestor::div");
            assert_eq!(contains(&INPUT).describe(), "has descendant: input");
        }
    }
}
