//! Higher level paths built from the generic algebra.

use crate::path::property::create_property_generator;
use crate::path::{ElementProperty, Path};
use crate::paths::INPUT;
use crate::xpath::literal;

/// `type` attribute equals the value
#[must_use]
pub fn has_type(input_type: &str) -> ElementProperty {
    let generator = create_property_generator(
        |v| format!("@type={}", literal(v)),
        |v| format!("has type {v}"),
    );
    generator(input_type)
}

/// An input of type checkbox
#[must_use]
pub fn checkbox() -> Path {
    INPUT.that([has_type("checkbox")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_type() {
        let prop = has_type("radio");
        assert_eq!(prop.to_xpath(), "@type='radio'");
        assert_eq!(prop.describe(), "has type radio");
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(checkbox().to_xpath(), "//input[@type='checkbox']");
        assert_eq!(checkbox().to_string(), "input, that has type checkbox");
    }
}
