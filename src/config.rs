//! Viewer configuration, read once from the page URL query string.
//!
//! | key       | values                          | default  |
//! |-----------|---------------------------------|----------|
//! | `api`     | base URL prefixed to `/api/...` | same origin |
//! | `numbers` | `sigfig`, `fixed`               | `sigfig` |
//! | `log`     | `error`, `warn`, `info`, `debug`, `trace` | `info` |

use std::str::FromStr;

use crate::sidebar::NumberFormat;

pub const QUERY_KEYS: [&str; 3] = ["api", "numbers", "log"];

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub api_base: String,
    pub number_format: NumberFormat,
    pub log_level: log::Level,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            number_format: NumberFormat::default(),
            log_level: log::Level::Info,
        }
    }
}

impl ViewerConfig {
    /// Unknown keys and unparsable values are ignored; the default stays in place.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "api" => config.api_base = value.trim_end_matches('/').to_string(),
                "numbers" => {
                    if let Some(f) = NumberFormat::from_tag(value) {
                        config.number_format = f;
                    }
                }
                "log" => {
                    if let Ok(level) = log::Level::from_str(value) {
                        config.log_level = level;
                    }
                }
                _ => {}
            }
        }
        config
    }

    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
            return Self::default();
        };
        Self::from_pairs(
            QUERY_KEYS
                .iter()
                .filter_map(|k| params.get(k).map(|v| (*k, v))),
        )
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ViewerConfig::from_pairs(Vec::<(&str, &str)>::new());
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.endpoint("/api/grid"), "/api/grid");
    }

    #[test]
    fn parses_known_keys() {
        let config = ViewerConfig::from_pairs([
            ("api", "http://localhost:8000/"),
            ("numbers", "fixed"),
            ("log", "debug"),
            ("theme", "dark"),
        ]);
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.number_format, NumberFormat::FieldDecimals);
        assert_eq!(config.log_level, log::Level::Debug);
        assert_eq!(config.endpoint("/api/chat"), "http://localhost:8000/api/chat");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = ViewerConfig::from_pairs([("numbers", "roman"), ("log", "loud")]);
        assert_eq!(config.number_format, NumberFormat::SignificantFigures);
        assert_eq!(config.log_level, log::Level::Info);
    }
}
