//! Locale codes and the priority order used to resolve localized fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::field::generic_field_name;

/// A locale code such as `en` or `fr`.
///
/// Stored lowercase. Localized Airtable columns carry it uppercased as a
/// suffix (`labelEN`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Parse a locale code, case-insensitively.
    pub fn parse(code: &str) -> Result<Self, FieldError> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FieldError::InvalidLocale(code.to_string()));
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    /// The lowercase code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the code.
    pub fn code_len(&self) -> usize {
        self.0.len()
    }

    /// The suffix form used in Airtable column names (`EN`).
    pub fn suffix(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

/// An ordered, non-empty list of locales sharing one code length.
///
/// The first locale has the highest priority: when several localized columns
/// collapse to the same generic field, the value of the earliest locale wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePriority {
    locales: Vec<Locale>,
    code_len: usize,
}

impl LocalePriority {
    /// Build a priority from locales in order. Duplicates keep their first
    /// position.
    pub fn new<I>(locales: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = Locale>,
    {
        let mut ordered: Vec<Locale> = Vec::new();
        for locale in locales {
            if !ordered.contains(&locale) {
                ordered.push(locale);
            }
        }

        let code_len = ordered
            .first()
            .map(Locale::code_len)
            .ok_or(FieldError::EmptyPriority)?;

        if let Some(odd) = ordered.iter().find(|l| l.code_len() != code_len) {
            return Err(FieldError::UnsupportedLocaleFormat {
                locale: odd.to_string(),
                expected: code_len,
                found: odd.code_len(),
            });
        }

        Ok(Self {
            locales: ordered,
            code_len,
        })
    }

    /// Parse a priority from raw codes.
    pub fn parse<S: AsRef<str>>(codes: &[S]) -> Result<Self, FieldError> {
        let locales = codes
            .iter()
            .map(|c| Locale::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(locales)
    }

    /// The active locale first, then the site default as fallback.
    pub fn for_active(active: &Locale, default: &Locale) -> Result<Self, FieldError> {
        Self::new([active.clone(), default.clone()])
    }

    /// Locales in priority order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// The highest-priority locale.
    pub fn primary(&self) -> &Locale {
        &self.locales[0]
    }

    /// Character length shared by every locale code.
    pub fn code_len(&self) -> usize {
        self.code_len
    }

    /// Generic name of a localized field, using this priority's code length.
    pub fn generic_field_name(&self, field_name: &str) -> String {
        generic_field_name(field_name, self.code_len)
    }
}
