//! Errors raised while building locales and locale priorities.

/// Errors that can occur when describing the locales of a site.
///
/// The field functions themselves never fail; only locale construction does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Invalid locale code '{0}': expected ASCII letters only")]
    InvalidLocale(String),

    #[error(
        "Unsupported locale format '{locale}': expected a {expected}-character code, found {found}"
    )]
    UnsupportedLocaleFormat {
        locale: String,
        expected: usize,
        found: usize,
    },

    #[error("Locale priority must contain at least one locale")]
    EmptyPriority,
}
