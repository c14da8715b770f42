//! XPath 1.0 compilation and human descriptions.
//!
//! Both outputs are produced by walking the same tree, so a path's
//! description always reflects what its XPath selects.
//!
//! A step path (tag, any element or text node) is compiled as a location
//! path. Its first relation that can be expressed as an axis step from the
//! target (`inside`, `child_of`, the document and sibling order relations)
//! becomes the prefix, everything else becomes a predicate:
//!
//! | Path | XPath |
//! |------|-------|
//! | `INPUT.inside(&LABEL)` | `//label//input` |
//! | `LABEL.containing(&INPUT)` | `//label[.//input]` |
//! | `SPAN.or(&DIV)` | `(//span \| //div)` |
//! | `last_occurrence_of(&LI)` | `(//li)[last()]` |

use crate::path::{
    Constraint, ElementProperty, ElementState, Node, Path, Position, Relation, SiblingPosition,
    TextMatch, TextScope,
};
use regex::Regex;
use std::sync::OnceLock;

// =============================================================================
// LITERALS AND NAMES
// =============================================================================

/// Quote a string as an XPath 1.0 literal.
///
/// Values holding both quote kinds are emitted as a `concat()` call.
#[must_use]
pub fn literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

fn name_pattern() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("static name pattern"))
}

/// True when `name` can be written directly as an element or attribute test
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

fn attribute(name: &str) -> String {
    if is_plain_name(name) {
        format!("@{name}")
    } else {
        format!("@*[local-name()={}]", literal(name))
    }
}

// =============================================================================
// COMPILATION
// =============================================================================

struct Step {
    test: String,
    predicates: Vec<String>,
}

fn step(node: &Node) -> Option<Step> {
    match node {
        Node::Element(name) if is_plain_name(name) => Some(Step {
            test: name.to_string(),
            predicates: Vec::new(),
        }),
        Node::Element(name) => Some(Step {
            test: "*".to_string(),
            predicates: vec![format!("local-name()={}", literal(name))],
        }),
        Node::Any => Some(Step {
            test: "*".to_string(),
            predicates: Vec::new(),
        }),
        Node::Text(text) => Some(Step {
            test: "text()".to_string(),
            predicates: vec![format!("normalize-space(.)={}", literal(text))],
        }),
        Node::Union(..) | Node::Occurrence(..) => None,
    }
}

const fn kind_test(path: &Path) -> &'static str {
    if path.is_text() {
        "text()"
    } else {
        "*"
    }
}

fn block(predicates: &[String]) -> String {
    if predicates.is_empty() {
        String::new()
    } else {
        format!("[{}]", predicates.join(" and "))
    }
}

const fn is_prefixable(relation: Relation) -> bool {
    !matches!(relation, Relation::Containing | Relation::ParentOf)
}

/// Compile a path to an absolute XPath expression
#[must_use]
pub fn compile(path: &Path) -> String {
    let Some(step) = step(&path.node) else {
        let mut predicates = Vec::new();
        for constraint in &path.constraints {
            push_constraint(&mut predicates, constraint);
        }
        let base = match &path.node {
            Node::Union(left, right) => format!("({} | {})", compile(left), compile(right)),
            Node::Occurrence(inner, position) => {
                format!("({}){}", compile(inner), position_predicate(*position))
            }
            _ => String::new(),
        };
        return format!("{base}{}", block(&predicates));
    };

    let prefix = path.constraints.iter().position(
        |c| matches!(c, Constraint::Relation(relation, _) if is_prefixable(*relation)),
    );

    let mut predicates = step.predicates;
    for (index, constraint) in path.constraints.iter().enumerate() {
        if Some(index) != prefix {
            push_constraint(&mut predicates, constraint);
        }
    }
    let tail = format!("{}{}", step.test, block(&predicates));

    let Some(Constraint::Relation(relation, target)) = prefix.map(|i| &path.constraints[i]) else {
        return format!("//{tail}");
    };
    let base = compile(target);
    let kind = kind_test(path);
    match relation {
        Relation::Inside => format!("{base}//{tail}"),
        Relation::ChildOf => format!("{base}/{tail}"),
        Relation::After => format!("{base}/following::{tail}"),
        Relation::AfterSibling => format!("{base}/following-sibling::{tail}"),
        Relation::Before => format!("{base}/preceding::{tail}"),
        Relation::BeforeSibling => format!("{base}/preceding-sibling::{tail}"),
        Relation::ImmediatelyBefore => format!("{base}/preceding::{kind}[1]/self::{tail}"),
        Relation::ImmediatelyBeforeSibling => {
            format!("{base}/preceding-sibling::{kind}[1]/self::{tail}")
        }
        Relation::ImmediatelyAfter => format!("{base}/following::{kind}[1]/self::{tail}"),
        Relation::ImmediatelyAfterSibling => {
            format!("{base}/following-sibling::{kind}[1]/self::{tail}")
        }
        Relation::Containing | Relation::ParentOf => format!("//{tail}"),
    }
}

fn position_predicate(position: Position) -> String {
    match position {
        Position::Nth(k) => format!("[{k}]"),
        Position::Last => "[last()]".to_string(),
    }
}

fn push_constraint(predicates: &mut Vec<String>, constraint: &Constraint) {
    match constraint {
        Constraint::Property(prop) => push_conjuncts(predicates, prop),
        Constraint::Relation(relation, target) => {
            predicates.push(relation_fragment(*relation, target));
        }
    }
}

// A top-level `and` joins the surrounding conjunction instead of nesting.
fn push_conjuncts(predicates: &mut Vec<String>, prop: &ElementProperty) {
    if let ElementProperty::And(left, right) = prop {
        push_conjuncts(predicates, left);
        push_conjuncts(predicates, right);
    } else {
        predicates.push(property_fragment(prop));
    }
}

/// Compile a path relative to a context node, for use after an axis
fn relative(path: &Path) -> String {
    match step(&path.node) {
        Some(step) => {
            let mut predicates = step.predicates;
            for constraint in &path.constraints {
                push_constraint(&mut predicates, constraint);
            }
            format!("{}{}", step.test, block(&predicates))
        }
        None => {
            let set = compile(path);
            format!("node()[count(.|{set})=count({set})]")
        }
    }
}

fn relation_fragment(relation: Relation, target: &Path) -> String {
    let rel = relative(target);
    let kind = kind_test(target);
    match relation {
        Relation::Inside => format!("ancestor::{rel}"),
        Relation::Containing => format!(".//{rel}"),
        Relation::ParentOf => format!("child::{rel}"),
        Relation::ChildOf => format!("parent::{rel}"),
        Relation::After => format!("preceding::{rel}"),
        Relation::AfterSibling => format!("preceding-sibling::{rel}"),
        Relation::Before => format!("following::{rel}"),
        Relation::BeforeSibling => format!("following-sibling::{rel}"),
        Relation::ImmediatelyBefore => format!("following::{kind}[1][self::{rel}]"),
        Relation::ImmediatelyBeforeSibling => {
            format!("following-sibling::{kind}[1][self::{rel}]")
        }
        Relation::ImmediatelyAfter => format!("preceding::{kind}[1][self::{rel}]"),
        Relation::ImmediatelyAfterSibling => {
            format!("preceding-sibling::{kind}[1][self::{rel}]")
        }
    }
}

fn has_word(attr: &str, word: &str) -> String {
    format!(
        "contains(concat(' ', normalize-space({attr}), ' '), {})",
        literal(&format!(" {word} "))
    )
}

fn joined(fragments: Vec<String>, op: &str, empty: &str) -> String {
    match fragments.len() {
        0 => empty.to_string(),
        1 => fragments.into_iter().collect(),
        _ => format!("({})", fragments.join(&format!(" {op} "))),
    }
}

/// Compile a property to a predicate fragment
#[must_use]
pub fn property_fragment(prop: &ElementProperty) -> String {
    match prop {
        ElementProperty::HasAttribute(name) => attribute(name),
        ElementProperty::AttributeEquals { name, value } => {
            format!("{}={}", attribute(name), literal(value))
        }
        ElementProperty::AttributeContainsWord { name, word } => has_word(&attribute(name), word),
        ElementProperty::AttributeContains { name, value } => {
            format!("contains({}, {})", attribute(name), literal(value))
        }
        ElementProperty::HasId(id) => format!("@id={}", literal(id)),
        ElementProperty::HasClass(class) => has_word("@class", class),
        ElementProperty::HasAnyClass(classes) => joined(
            classes.iter().map(|c| has_word("@class", c)).collect(),
            "or",
            "false()",
        ),
        ElementProperty::HasClasses(classes) => joined(
            classes.iter().map(|c| has_word("@class", c)).collect(),
            "and",
            "true()",
        ),
        ElementProperty::ClassContains(fragment) => {
            format!("contains(@class, {})", literal(fragment))
        }
        ElementProperty::Text { scope, kind, value } => text_fragment(*scope, *kind, value),
        ElementProperty::Sibling(SiblingPosition::Nth(index)) => {
            format!("count(preceding-sibling::*)={index}")
        }
        ElementProperty::Sibling(SiblingPosition::Last) => {
            "count(following-sibling::*)=0".to_string()
        }
        ElementProperty::Sibling(SiblingPosition::Only) => "count(../*)=1".to_string(),
        ElementProperty::ChildCount(n) => format!("count(*)={n}"),
        ElementProperty::HasChildren => "count(*)>0".to_string(),
        ElementProperty::NoChildren => "count(*)=0".to_string(),
        ElementProperty::State(state) => match state {
            ElementState::Checked => "@checked",
            ElementState::Selected => "@selected",
            ElementState::Disabled => "@disabled",
            ElementState::Enabled => "not(@disabled)",
        }
        .to_string(),
        ElementProperty::Related(relation, target) => relation_fragment(*relation, target),
        ElementProperty::SiblingOf(target) => {
            let rel = relative(target);
            format!("(preceding-sibling::{rel} or following-sibling::{rel})")
        }
        ElementProperty::Occurrences(npath) => format!(
            "count(.//{}){}{}",
            relative(npath.path()),
            npath.op().operator(),
            npath.count()
        ),
        ElementProperty::Custom { xpath, .. } => xpath.clone(),
        ElementProperty::And(left, right) => format!(
            "({} and {})",
            property_fragment(left),
            property_fragment(right)
        ),
        ElementProperty::Or(left, right) => format!(
            "({} or {})",
            property_fragment(left),
            property_fragment(right)
        ),
        ElementProperty::Not(inner) => format!("not({})", property_fragment(inner)),
    }
}

fn text_fragment(scope: TextScope, kind: TextMatch, value: &str) -> String {
    match (scope, kind) {
        (TextScope::Own, TextMatch::Equals) => format!("text()={}", literal(value)),
        (TextScope::Own, _) => format!("text()[{}]", text_condition(".", kind, value)),
        (TextScope::Aggregated, _) => {
            text_condition("normalize-space(string(.))", kind, value)
        }
    }
}

fn text_condition(subject: &str, kind: TextMatch, value: &str) -> String {
    match kind {
        TextMatch::Equals => format!("{subject}={}", literal(value)),
        TextMatch::Contains => format!("contains({subject}, {})", literal(value)),
        TextMatch::StartsWith => format!("starts-with({subject}, {})", literal(value)),
        TextMatch::EndsWith => ends_with(subject, value),
        TextMatch::Pattern => glob(subject, value),
    }
}

fn ends_with(subject: &str, suffix: &str) -> String {
    format!(
        "substring({subject}, string-length({subject}) - {} + 1)={}",
        suffix.chars().count(),
        literal(suffix)
    )
}

// `*` matches any run of characters. Segments are consumed left to right so
// each one must occur after the previous.
fn glob(subject: &str, pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('*').collect();
    if segments.len() == 1 {
        return format!("{subject}={}", literal(pattern));
    }

    let mut conditions = Vec::new();
    let mut rest = subject.to_string();
    let first = segments[0];
    if !first.is_empty() {
        conditions.push(format!("starts-with({subject}, {})", literal(first)));
        rest = format!("substring({subject}, {})", first.chars().count() + 1);
    }
    for middle in &segments[1..segments.len() - 1] {
        if middle.is_empty() {
            continue;
        }
        conditions.push(format!("contains({rest}, {})", literal(middle)));
        rest = format!("substring-after({rest}, {})", literal(middle));
    }
    let last = segments[segments.len() - 1];
    if !last.is_empty() {
        conditions.push(ends_with(&rest, last));
    }
    joined(conditions, "and", "true()")
}

// =============================================================================
// DESCRIPTIONS
// =============================================================================

/// Human readable description of a path
#[must_use]
pub fn describe(path: &Path) -> String {
    let (mut out, start) = match &path.description {
        Some(desc) => (desc.clone(), path.described_upto),
        None => (describe_node(&path.node), 0),
    };

    let mut in_properties = false;
    for constraint in &path.constraints[start.min(path.constraints.len())..] {
        match constraint {
            Constraint::Property(prop) => {
                out.push_str(if in_properties { ", and " } else { ", that " });
                out.push_str(&describe_property(prop));
                in_properties = true;
            }
            Constraint::Relation(relation, target) => {
                out.push_str(&format!(", {} {}", relation.phrase(), describe_target(target)));
                in_properties = false;
            }
        }
    }
    out
}

/// Description of a path used as the target of a relation
#[must_use]
pub fn describe_target(path: &Path) -> String {
    if path.description.is_none() && matches!(path.node, Node::Union(..)) {
        format!("({})", describe(path))
    } else {
        describe(path)
    }
}

fn describe_node(node: &Node) -> String {
    match node {
        Node::Element(name) => name.to_string(),
        Node::Any => "element".to_string(),
        Node::Text(text) => format!("text node \"{text}\""),
        Node::Union(left, right) => format!("{} or {}", describe(left), describe(right)),
        Node::Occurrence(inner, Position::Nth(1)) => {
            format!("first occurrence of {}", describe_target(inner))
        }
        Node::Occurrence(inner, Position::Nth(k)) => {
            format!("occurrence number {k} of {}", describe_target(inner))
        }
        Node::Occurrence(inner, Position::Last) => {
            format!("last occurrence of {}", describe_target(inner))
        }
    }
}

fn text_phrase(scope: TextScope, kind: TextMatch, value: &str) -> String {
    let subject = match scope {
        TextScope::Own => "text",
        TextScope::Aggregated => "aggregated text",
    };
    let verb = match kind {
        TextMatch::Equals => "",
        TextMatch::Contains => " containing",
        TextMatch::StartsWith => " starting with",
        TextMatch::EndsWith => " ending with",
        TextMatch::Pattern => " matching",
    };
    format!("has {subject}{verb} \"{value}\"")
}

/// Human phrase for a property
#[must_use]
pub fn describe_property(prop: &ElementProperty) -> String {
    match prop {
        ElementProperty::HasAttribute(name) => format!("has attribute {name}"),
        ElementProperty::AttributeEquals { name, value } => format!("has {name}: \"{value}\""),
        ElementProperty::AttributeContainsWord { name, word } => {
            format!("has {name} with word \"{word}\"")
        }
        ElementProperty::AttributeContains { name, value } => {
            format!("has {name} containing \"{value}\"")
        }
        ElementProperty::HasId(id) => format!("has id \"{id}\""),
        ElementProperty::HasClass(class) => format!("has class {class}"),
        ElementProperty::HasAnyClass(classes) => {
            format!("has at least one of the classes [{}]", classes.join(", "))
        }
        ElementProperty::HasClasses(classes) => format!("has classes [{}]", classes.join(", ")),
        ElementProperty::ClassContains(fragment) => {
            format!("has class containing \"{fragment}\"")
        }
        ElementProperty::Text { scope, kind, value } => text_phrase(*scope, *kind, value),
        ElementProperty::Sibling(SiblingPosition::Nth(index)) => {
            format!("is in place {index} among its siblings")
        }
        ElementProperty::Sibling(SiblingPosition::Last) => "is the last sibling".to_string(),
        ElementProperty::Sibling(SiblingPosition::Only) => "is the only child".to_string(),
        ElementProperty::ChildCount(n) => format!("has {n} children"),
        ElementProperty::HasChildren => "has some children".to_string(),
        ElementProperty::NoChildren => "has no children".to_string(),
        ElementProperty::State(state) => match state {
            ElementState::Checked => "is checked",
            ElementState::Selected => "is selected",
            ElementState::Disabled => "is disabled",
            ElementState::Enabled => "is enabled",
        }
        .to_string(),
        ElementProperty::Related(relation, target) => {
            format!("{} {}", relation.property_phrase(), describe_target(target))
        }
        ElementProperty::SiblingOf(target) => {
            format!("is sibling of: {}", describe_target(target))
        }
        ElementProperty::Occurrences(npath) => format!("contains {npath}"),
        ElementProperty::Custom { description, .. } => description.clone(),
        ElementProperty::And(left, right) => format!(
            "({} and {})",
            describe_property(left),
            describe_property(right)
        ),
        ElementProperty::Or(left, right) => format!(
            "({} or {})",
            describe_property(left),
            describe_property(right)
        ),
        ElementProperty::Not(inner) => format!("not ({})", describe_property(inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::high_level::has_type;
    use crate::path::property::*;
    use crate::path::{exactly, first_occurrence_of, last_occurrence_of, occurrence_number};
    use crate::paths::*;

    mod literal_tests {
        use super::*;

        #[test]
        fn test_plain_literal() {
            assert_eq!(literal("abc"), "'abc'");
            assert_eq!(literal(""), "''");
        }

        #[test]
        fn test_single_quote_switches_delimiter() {
            assert_eq!(literal("it's"), "\"it's\"");
        }

        #[test]
        fn test_both_quotes_use_concat() {
            assert_eq!(
                literal(r#"it's "x""#),
                r#"concat('it', "'", 's "x"')"#
            );
            assert_eq!(literal(r#"'""#), r#"concat('', "'", '"')"#);
        }
    }

    mod compile_tests {
        use super::*;

        #[test]
        fn test_checkbox() {
            let p = INPUT.that([has_type("checkbox")]);
            assert_eq!(p.to_xpath(), "//input[@type='checkbox']");
            assert_eq!(p.describe(), "input, that has type checkbox");
        }

        #[test]
        fn test_label_containing_input() {
            let p = LABEL.that([has_text("Name")]).containing(&INPUT);
            assert_eq!(p.to_xpath(), "//label[text()='Name' and .//input]");
        }

        #[test]
        fn test_inside_prefix_keeps_target_predicates() {
            let p = INPUT.inside(&LABEL.with_text("Name"));
            assert_eq!(p.to_xpath(), "//label[text()='Name']//input");
            assert_eq!(p.describe(), "input, inside label, that has text \"Name\"");
        }

        #[test]
        fn test_second_prefixable_relation_becomes_predicate() {
            let p = SPAN.inside(&DIV).child_of(&LI);
            assert_eq!(p.to_xpath(), "//div//span[parent::li]");
        }

        #[test]
        fn test_order_axes() {
            assert_eq!(SPAN.after(&DIV).to_xpath(), "//div/following::span");
            assert_eq!(SPAN.before(&DIV).to_xpath(), "//div/preceding::span");
            assert_eq!(
                SPAN.after_sibling(&DIV).to_xpath(),
                "//div/following-sibling::span"
            );
            assert_eq!(
                SPAN.before_sibling(&DIV).to_xpath(),
                "//div/preceding-sibling::span"
            );
        }

        #[test]
        fn test_immediate_axes() {
            assert_eq!(
                INPUT.immediately_before_sibling(&text_node("Remember")).to_xpath(),
                "//text()[normalize-space(.)='Remember']/preceding-sibling::*[1]/self::input"
            );
            assert_eq!(
                SPAN.immediately_after(&DIV).to_xpath(),
                "//div/following::*[1]/self::span"
            );
            assert_eq!(
                text_node("x").immediately_after_sibling(&DIV).to_xpath(),
                "//div/following-sibling::text()[1]/self::text()[normalize-space(.)='x']"
            );
        }

        #[test]
        fn test_immediate_predicate_form() {
            let p = DIV.containing(&SPAN).immediately_before(&INPUT).containing(&LI);
            assert_eq!(
                p.to_xpath(),
                "//input/preceding::*[1]/self::div[.//span and .//li]"
            );
            let q = DIV.that([is_before_sibling(&SPAN)]);
            assert_eq!(q.to_xpath(), "//div[following-sibling::span]");
        }

        #[test]
        fn test_union_and_positions() {
            assert_eq!(SPAN.or(&DIV).to_xpath(), "(//span | //div)");
            assert_eq!(first_occurrence_of(&LI).to_xpath(), "(//li)[1]");
            assert_eq!(last_occurrence_of(&LI).to_xpath(), "(//li)[last()]");
            assert_eq!(
                occurrence_number(3).unwrap().of(&LI.inside(&UL)).to_xpath(),
                "(//ul//li)[3]"
            );
        }

        #[test]
        fn test_union_target_uses_membership_test() {
            let p = INPUT.containing(&SPAN.or(&DIV));
            assert_eq!(
                p.to_xpath(),
                "//input[.//node()[count(.|(//span | //div))=count((//span | //div))]]"
            );
            let q = INPUT.inside(&first_occurrence_of(&FORM));
            assert_eq!(q.to_xpath(), "(//form)[1]//input");
        }

        #[test]
        fn test_union_with_constraints() {
            let p = SPAN.or(&DIV).with_class("x");
            assert_eq!(
                p.to_xpath(),
                "(//span | //div)[contains(concat(' ', normalize-space(@class), ' '), ' x ')]"
            );
        }

        #[test]
        fn test_occurrences() {
            let p = DIV.that([contains_occurrences(exactly(1).occurrences_of(&INPUT))]);
            assert_eq!(p.to_xpath(), "//div[count(.//input)=1]");
            assert_eq!(p.describe(), "div, that contains exactly 1 occurrences of input");
        }

        #[test]
        fn test_invalid_names_fall_back_to_local_name() {
            let p = custom_element("my:tag").that([has_attribute("data x")]);
            assert_eq!(
                p.to_xpath(),
                "//*[local-name()='my:tag' and @*[local-name()='data x']]"
            );
            assert_eq!(custom_element("my-widget").to_xpath(), "//my-widget");
        }
    }

    mod property_tests {
        use super::*;

        #[test]
        fn test_text_variants() {
            assert_eq!(has_text_containing("ab").to_xpath(), "text()[contains(., 'ab')]");
            assert_eq!(
                has_aggregated_text_equal_to("ab").to_xpath(),
                "normalize-space(string(.))='ab'"
            );
            assert_eq!(
                has_text_ending_with("ab").to_xpath(),
                "text()[substring(., string-length(.) - 2 + 1)='ab']"
            );
            assert_eq!(
                has_aggregated_text_starting_with("a").describe(),
                "has aggregated text starting with \"a\""
            );
        }

        #[test]
        fn test_glob() {
            assert_eq!(
                has_text_matching("ab*").unwrap().to_xpath(),
                "text()[starts-with(., 'ab')]"
            );
            assert_eq!(
                has_text_matching("a*b*c").unwrap().to_xpath(),
                "text()[(starts-with(., 'a') and contains(substring(., 2), 'b') and \
                 substring(substring-after(substring(., 2), 'b'), \
                 string-length(substring-after(substring(., 2), 'b')) - 1 + 1)='c')]"
            );
            assert_eq!(has_text_matching("*").unwrap().to_xpath(), "text()[true()]");
            assert_eq!(has_text_matching("plain").unwrap().to_xpath(), "text()[.='plain']");
        }

        #[test]
        fn test_classes() {
            assert_eq!(
                has_any_of_classes(["a", "b"]).to_xpath(),
                "(contains(concat(' ', normalize-space(@class), ' '), ' a ') or \
                 contains(concat(' ', normalize-space(@class), ' '), ' b '))"
            );
            assert_eq!(has_class_containing("btn").to_xpath(), "contains(@class, 'btn')");
            assert_eq!(has_classes(["a"]).describe(), "has classes [a]");
        }

        #[test]
        fn test_sibling_and_children() {
            assert_eq!(is_nth_sibling(3).to_xpath(), "count(preceding-sibling::*)=3");
            assert_eq!(is_nth_sibling(3).describe(), "is in place 3 among its siblings");
            assert_eq!(is_last_sibling().to_xpath(), "count(following-sibling::*)=0");
            assert_eq!(is_only_child().to_xpath(), "count(../*)=1");
            assert_eq!(has_n_children(2).to_xpath(), "count(*)=2");
            assert_eq!(has_no_children().describe(), "has no children");
        }

        #[test]
        fn test_state() {
            assert_eq!(is_enabled().to_xpath(), "not(@disabled)");
            assert_eq!(is_checked().describe(), "is checked");
        }

        #[test]
        fn test_and_splices_at_top_level_only() {
            let a = has_class("a");
            let b = has_id("b");
            assert_eq!(
                DIV.that([a.clone()]).that([b.clone()]).to_xpath(),
                DIV.that([a.clone().and(b.clone())]).to_xpath()
            );
            assert_eq!(
                DIV.that([not(a.and(b))]).to_xpath(),
                "//div[not((contains(concat(' ', normalize-space(@class), ' '), ' a ') and @id='b'))]"
            );
        }
    }

    mod describe_tests {
        use super::*;

        #[test]
        fn test_override_short_circuits() {
            let p = INPUT.inside(&FORM).described_by("the email field");
            assert_eq!(p.describe(), "the email field");
            assert_eq!(p.to_xpath(), INPUT.inside(&FORM).to_xpath());
        }

        #[test]
        fn test_override_then_more_constraints() {
            let p = INPUT.described_by("field").with_class("big");
            assert_eq!(p.describe(), "field, that has class big");
        }

        #[test]
        fn test_properties_then_relation() {
            let p = DIV.with_class("a").with_text("t").inside(&FORM).and(has_id("x"));
            assert_eq!(
                p.describe(),
                "div, that has class a, and has text \"t\", inside form, that has id \"x\""
            );
        }

        #[test]
        fn test_union_and_positional() {
            assert_eq!(SPAN.or(&DIV).describe(), "span or div");
            assert_eq!(
                first_occurrence_of(&SPAN.or(&DIV)).describe(),
                "first occurrence of (span or div)"
            );
            assert_eq!(last_occurrence_of(&LI).describe(), "last occurrence of li");
            assert_eq!(
                occurrence_number(2).unwrap().of(&LI).describe(),
                "occurrence number 2 of li"
            );
        }
    }
}
