//! Form inputs: locating fields, clearing them reliably, changing values and
//! picking options out of scrollable dropdowns.
//!
//! ## Clearing
//!
//! Custom inputs (autocompletes, masked fields) often ignore the native
//! clear, so clearing escalates through three tiers:
//!
//! 1. native clear
//! 2. one bulk send of `L` BACKSPACE followed by `L` DELETE keys
//! 3. a per-character loop, bounded by [`ClearConfig`]
//!
//! In [`ClearMode::Strict`] the loop fails when the value grows between
//! attempts or is still non-empty at the last attempt. In
//! [`ClearMode::Lenient`] leftovers are tolerated.

use crate::browser::{keys, Browser, BrowserExt, Locate, TimeoutGuard};
use crate::config::{ClearConfig, DropdownConfig};
use crate::high_level::has_type;
use crate::path::property::{
    contains, contains_occurrences, has_aggregated_text_equal_to, has_id, not,
};
use crate::path::{exactly, last_occurrence_of, Path};
use crate::paths::{parent_of, text_node, ELEMENT, INPUT, LABEL, OPTION, SELECT};
use crate::result::{DomPathError, DomPathResult};
use crate::scroll::ScrollElement;
use tracing::{debug, trace, warn};

const CLEAR_FAILED: &str =
    "clearing input does not work; is this an autocomplete or another custom input?";

/// Whether a clear must leave the field empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Fail unless the field ends up empty
    Strict,
    /// Best effort
    Lenient,
}

// =============================================================================
// LOCATING FIELDS
// =============================================================================

/// Input belonging to the label with the given text.
///
/// Uses the label's `for` attribute when present, otherwise an input nested
/// in the label.
pub fn input_for_label<B: Browser + ?Sized>(browser: &B, label_text: &str) -> DomPathResult<Path> {
    let label = LABEL.that([has_aggregated_text_equal_to(label_text.trim())]);
    let element = browser.find(&label)?;
    match browser.attribute(&element, "for")?.filter(|id| !id.is_empty()) {
        Some(id) => Ok(INPUT.that([has_id(id)])),
        None => Ok(INPUT.inside(&label)),
    }
}

/// Best guess of the input that follows a field name in a form
#[must_use]
pub fn generic_form_input_after_field(field_name: &str) -> Path {
    let field = ELEMENT
        .that([has_aggregated_text_equal_to(field_name)])
        .and(not(contains(&INPUT)));
    // keep the ancestor close to the field
    let ancestor = ELEMENT
        .after_sibling(&field)
        .that([contains_occurrences(exactly(1).occurrences_of(&INPUT))]);
    INPUT
        .inside(&ancestor)
        .or(&INPUT.after_sibling(&field))
        .described_by(format!("input following field \"{field_name}\""))
}

/// Best guess of the input that precedes a field name in a form
#[must_use]
pub fn generic_form_input_before_field(field_name: &str) -> Path {
    let field = ELEMENT.that([has_aggregated_text_equal_to(field_name)]);
    let ancestor = ELEMENT
        .immediately_before_sibling(&field)
        .that([contains_occurrences(exactly(1).occurrences_of(&INPUT))]);
    last_occurrence_of(
        &INPUT
            .inside(&ancestor)
            .or(&INPUT.immediately_before_sibling(&field)),
    )
    .described_by(format!("input before field \"{field_name}\""))
}

/// Input directly followed by a bare text node, as in `<input> Remember me`
#[must_use]
pub fn input_followed_by_unlabeled_text(text: &str) -> Path {
    INPUT.immediately_before_sibling(&text_node(text))
}

/// Restrict an input path to checkboxes
#[must_use]
pub fn checkbox_type(input: &Path) -> Path {
    input.that([has_type("checkbox")])
}

/// Restrict an input path to radio buttons
#[must_use]
pub fn radio_type(input: &Path) -> Path {
    input.that([has_type("radio")])
}

/// Select an option by visible text in the select following a label.
///
/// Returns the path of the select element.
pub fn select_in_field_with_label<B: Browser + ?Sized>(
    browser: &B,
    label_text: &str,
    option: &str,
) -> DomPathResult<Path> {
    let selector = SELECT.after(&LABEL.with_text(label_text));
    browser.click_on(&selector)?;
    browser.click_on(&OPTION.that([has_aggregated_text_equal_to(option)]).inside(&selector))?;
    Ok(selector)
}

// =============================================================================
// CLEARING
// =============================================================================

fn deletion_keys(length: usize) -> String {
    let mut keys_to_send = keys::BACKSPACE.repeat(length);
    keys_to_send.push_str(&keys::DELETE.repeat(length));
    keys_to_send
}

/// Clear a field and fail unless it ends up empty
pub fn clear_input<B: Browser + ?Sized>(browser: &B, field: &impl Locate) -> DomPathResult<()> {
    clear_input_with(browser, field, ClearMode::Strict, &ClearConfig::default())
}

/// Clear as much of a field as possible without failing on leftovers
pub fn clear_input_non_strict<B: Browser + ?Sized>(
    browser: &B,
    field: &impl Locate,
) -> DomPathResult<()> {
    clear_input_with(browser, field, ClearMode::Lenient, &ClearConfig::default())
}

/// Clear a field with explicit mode and limits.
///
/// A `Path` field is resolved again on every read, so inputs that get
/// re-rendered while typing are followed.
pub fn clear_input_with<B: Browser + ?Sized>(
    browser: &B,
    field: &impl Locate,
    mode: ClearMode,
    config: &ClearConfig,
) -> DomPathResult<()> {
    if browser.value_of(field)?.is_empty() {
        return Ok(());
    }

    let element = field.locate(browser)?;
    browser.clear(&element)?;
    let value = browser.value_of(field)?;
    if value.is_empty() {
        trace!("native clear emptied the input");
        return Ok(());
    }

    debug!(length = value.chars().count(), "native clear failed, sending deletion keys");
    browser.send_keys_to(&deletion_keys(value.chars().count()), field)?;
    if browser.value_of(field)?.is_empty() {
        return Ok(());
    }

    let max_tries = match mode {
        ClearMode::Strict => config.strict_max_tries,
        ClearMode::Lenient => config.lenient_max_tries,
    };
    let mut last_length = usize::MAX;
    for attempt in 1..=max_tries {
        let length = browser.value_of(field)?.chars().count();
        if length == 0 {
            debug!(attempt, "input cleared key by key");
            return Ok(());
        }
        if mode == ClearMode::Strict && (length > last_length || attempt == max_tries) {
            warn!(attempt, length, last_length, "giving up on clearing input");
            return Err(DomPathError::operation_failed(CLEAR_FAILED));
        }
        trace!(attempt, length, "deleting characters one by one");
        for _ in 0..length {
            browser.send_keys_to(keys::BACKSPACE, field)?;
        }
        for _ in 0..length {
            browser.send_keys_to(keys::DELETE, field)?;
        }
        last_length = length;
    }

    // only reachable in strict mode when no attempts are allowed
    if mode == ClearMode::Strict && !browser.value_of(field)?.is_empty() {
        warn!(max_tries, "no clearing attempts left for a non-empty input");
        return Err(DomPathError::operation_failed(CLEAR_FAILED));
    }
    debug!(max_tries, "input not fully cleared, continuing");
    Ok(())
}

/// Send a fixed number of deletion keys without checking the result
pub fn quick_try_clear_input<B: Browser + ?Sized>(
    browser: &B,
    field: &impl Locate,
) -> DomPathResult<()> {
    quick_try_clear_input_with(browser, field, &ClearConfig::default())
}

/// [`quick_try_clear_input`] with a custom key count
pub fn quick_try_clear_input_with<B: Browser + ?Sized>(
    browser: &B,
    field: &impl Locate,
    config: &ClearConfig,
) -> DomPathResult<()> {
    browser.send_keys_to(&deletion_keys(config.quick_clear_length), field)?;
    Ok(())
}

// =============================================================================
// CHANGING VALUES
// =============================================================================

/// Click the field, clear it strictly, then type `text`
pub fn change_input_value<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    browser.click_on(field)?;
    clear_input(browser, field)?;
    browser.send_keys_to(text, field)?;
    Ok(())
}

/// Like [`change_input_value`] but resolves the field once and reuses it
pub fn change_input_value_assuming_element_is_not_replaced<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    let element = browser.click_on(field)?;
    clear_input(browser, &element)?;
    browser.send_keys_to(text, &element)?;
    Ok(())
}

/// Like [`change_input_value`] but clears with [`quick_try_clear_input`]
pub fn change_input_value_with_quick_approximate_deletion<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    browser.click_on(field)?;
    quick_try_clear_input(browser, field)?;
    browser.send_keys_to(text, field)?;
    Ok(())
}

/// Like [`change_input_value`] but tolerates leftovers when clearing
pub fn change_input_value_non_strict_clearing<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    browser.click_on(field)?;
    clear_input_non_strict(browser, field)?;
    browser.send_keys_to(text, field)?;
    Ok(())
}

/// [`change_input_value`] followed by ENTER
pub fn change_input_value_with_enter<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    change_input_value(browser, field, text)?;
    browser.send_keys_to(keys::ENTER, field)?;
    Ok(())
}

/// [`change_input_value_with_quick_approximate_deletion`] followed by ENTER
pub fn change_input_value_with_approximate_deletion_with_enter<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    change_input_value_with_quick_approximate_deletion(browser, field, text)?;
    browser.send_keys_to(keys::ENTER, field)?;
    Ok(())
}

/// [`change_input_value_non_strict_clearing`] followed by ENTER
pub fn change_input_value_with_enter_non_strict_clearing<B: Browser + ?Sized>(
    browser: &B,
    field: &Path,
    text: &str,
) -> DomPathResult<()> {
    change_input_value_non_strict_clearing(browser, field, text)?;
    browser.send_keys_to(keys::ENTER, field)?;
    Ok(())
}

// =============================================================================
// DROPDOWNS
// =============================================================================

/// Scroll a dropdown until `option` is fully visible, then click it
pub fn select_dropdown_option<B: Browser + ?Sized>(
    browser: &B,
    dropdown_content: &Path,
    option: &Path,
) -> DomPathResult<()> {
    select_dropdown_option_with(browser, dropdown_content, option, &DropdownConfig::default())
}

/// [`select_dropdown_option`] with explicit step, timeout and settle delay
pub fn select_dropdown_option_with<B: Browser + ?Sized>(
    browser: &B,
    dropdown_content: &Path,
    option: &Path,
    config: &DropdownConfig,
) -> DomPathResult<()> {
    let dropdown = parent_of(dropdown_content);
    let scroll = ScrollElement::new(browser, &dropdown)?.with_step_override(config.step_px);
    scroll.to_top_corner()?;

    {
        let _guard = TimeoutGuard::lower(browser, config.lookup_timeout())?;
        let list = scroll.container();
        scroll.down_until_predicate(option, |el| {
            let bottom_of_list = browser.rect(list)?.bottom();
            Ok(browser.is_displayed(el)? && browser.rect(el)?.bottom() <= bottom_of_list)
        })?;
    }

    // the click is not atomic in real drivers; let the list settle first
    if config.settle_delay_ms > 0 {
        std::thread::sleep(config.settle_delay());
    }
    debug!(option = %option, "selecting dropdown option");
    browser.click_on(option)?;
    Ok(())
}
