//! Path constants for common HTML tags, plus short names for frequent
//! structural lookups.

use crate::path::{property, Path};

/// Any element
pub const ELEMENT: Path = Path::any();

macro_rules! tags {
    ($($name:ident => $tag:literal),* $(,)?) => {
        $(
            #[doc = concat!("`", $tag, "` elements")]
            pub const $name: Path = Path::tag($tag);
        )*
    };
}

tags! {
    DIV => "div",
    SPAN => "span",
    INPUT => "input",
    BUTTON => "button",
    LABEL => "label",
    SELECT => "select",
    OPTION => "option",
    FORM => "form",
    HTML => "html",
    BODY => "body",
    ANCHOR => "a",
    IMG => "img",
    UL => "ul",
    LI => "li",
    TABLE => "table",
    TR => "tr",
    TD => "td",
    TH => "th",
    HEADER => "header",
    FOOTER => "footer",
    SECTION => "section",
    TEXTAREA => "textarea",
    IFRAME => "iframe",
    CANVAS => "canvas",
    SVG => "svg",
    PARAGRAPH => "p",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
}

/// Text node with the given normalized content
#[must_use]
pub fn text_node(text: impl Into<String>) -> Path {
    Path::text_node(text)
}

/// Element with a tag outside the predefined set
#[must_use]
pub fn custom_element(tag: impl Into<String>) -> Path {
    Path::custom_element(tag)
}

/// The parent of an element matching `path`
#[must_use]
pub fn parent_of(path: &Path) -> Path {
    ELEMENT.parent_of(path)
}

/// A direct child of an element matching `path`
#[must_use]
pub fn child_of(path: &Path) -> Path {
    ELEMENT.child_of(path)
}

/// An ancestor of an element matching `path`
#[must_use]
pub fn ancestor_of(path: &Path) -> Path {
    ELEMENT.containing(path)
}

/// A sibling of an element matching `path`
#[must_use]
pub fn sibling_of(path: &Path) -> Path {
    ELEMENT.that([property::is_sibling_of(path)])
}
