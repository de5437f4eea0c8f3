//! Locale routing: which pages exist and which locale a request gets.

use serde::{Deserialize, Serialize};

use airkit_fields::Locale;

/// Route parameters of one generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParams {
    pub locale: String,
}

/// One statically generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPath {
    pub params: PathParams,
}

/// Every page to generate ahead of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPaths {
    pub paths: Vec<StaticPath>,

    /// Whether unknown paths are rendered on demand
    pub fallback: bool,
}

/// One page per supported locale, with no on-demand fallback.
pub fn static_paths(locales: &[Locale]) -> StaticPaths {
    StaticPaths {
        paths: locales
            .iter()
            .map(|locale| StaticPath {
                params: PathParams {
                    locale: locale.to_string(),
                },
            })
            .collect(),
        fallback: false,
    }
}

/// The requested locale if it is supported, the default one otherwise.
pub fn resolve_locale(requested: Option<&str>, supported: &[Locale], default: &Locale) -> Locale {
    requested
        .and_then(|code| Locale::parse(code).ok())
        .filter(|locale| supported.contains(locale))
        .unwrap_or_else(|| default.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locales(codes: &[&str]) -> Vec<Locale> {
        codes.iter().map(|c| Locale::parse(c).unwrap()).collect()
    }

    #[test]
    fn one_path_per_locale() {
        let paths = static_paths(&locales(&["en", "fr"]));

        let json = serde_json::to_value(&paths).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "paths": [
                    {"params": {"locale": "en"}},
                    {"params": {"locale": "fr"}},
                ],
                "fallback": false,
            })
        );
    }

    #[test]
    fn resolves_supported_locale() {
        let supported = locales(&["en", "fr"]);
        let default = Locale::parse("en").unwrap();

        assert_eq!(resolve_locale(Some("FR"), &supported, &default).as_str(), "fr");
        assert_eq!(resolve_locale(Some("de"), &supported, &default).as_str(), "en");
        assert_eq!(resolve_locale(Some("fr-CA"), &supported, &default).as_str(), "en");
        assert_eq!(resolve_locale(None, &supported, &default).as_str(), "en");
    }
}
