//! Detection and naming of localized fields.
//!
//! A field is localized when its name ends with a locale code (`labelEN`).
//! Matching is purely suffix-based: `urbanFR` is read as the French value of
//! `urban`. Schemas are expected to reserve uppercase locale suffixes.

use crate::record::Fields;

/// Whether `field_name` ends with any of `locales`, ignoring ASCII case.
///
/// Empty locale codes never match.
pub fn is_localised_field<L: AsRef<str>>(field_name: &str, locales: &[L]) -> bool {
    locales
        .iter()
        .any(|locale| ends_with_code(field_name, locale.as_ref()))
}

fn ends_with_code(field_name: &str, code: &str) -> bool {
    let name = field_name.as_bytes();
    let code = code.as_bytes();

    !code.is_empty()
        && name.len() >= code.len()
        && name[name.len() - code.len()..].eq_ignore_ascii_case(code)
}

/// Strip the trailing `code_len` characters of a localized field name.
///
/// `labelEN` becomes `label`. The suffix itself is not checked, so gate calls
/// behind [`is_localised_field`]. Names no longer than `code_len` yield an
/// empty string.
pub fn generic_field_name(field_name: &str, code_len: usize) -> String {
    let count = field_name.chars().count();
    if count <= code_len {
        return String::new();
    }

    field_name.chars().take(count - code_len).collect()
}

/// Whether `fields` already holds a non-null value under the generic name of
/// `field_name`.
pub fn has_generic_localised_field(fields: &Fields, field_name: &str, code_len: usize) -> bool {
    let generic = generic_field_name(field_name, code_len);
    if generic.is_empty() {
        return false;
    }

    fields.get(&generic).is_some_and(|value| !value.is_null())
}
