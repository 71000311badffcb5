//! Common utility functions for lens modules
//!
//! Output format selection and JSON rendering shared by the commands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unified output format for all commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }

    /// Render `items` in one of the JSON variants
    ///
    /// `Json` and `JsonPretty` render the whole slice as an array (or the
    /// single object when there is exactly one); `JsonLine` renders one object
    /// per line. Returns `None` for non-JSON formats.
    pub fn render_json<T: Serialize>(&self, items: &[T]) -> Option<serde_json::Result<String>> {
        let single = items.len() == 1;
        match self {
            Self::Json if single => Some(serde_json::to_string(&items[0])),
            Self::Json => Some(serde_json::to_string(items)),
            Self::JsonPretty if single => Some(serde_json::to_string_pretty(&items[0])),
            Self::JsonPretty => Some(serde_json::to_string_pretty(items)),
            Self::JsonLine => Some(
                items
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<serde_json::Result<Vec<_>>>()
                    .map(|lines| lines.join("\n")),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("JSONL").unwrap(), OutputFormat::JsonLine);
        assert_eq!(OutputFormat::from_str("pipe").unwrap(), OutputFormat::Psv);
        let err = OutputFormat::from_str("xml").unwrap_err();
        assert!(err.contains("json-pretty"));
    }

    #[test]
    fn test_display_round_trips_names() {
        for name in OutputFormat::all_names() {
            let format = OutputFormat::from_str(name).unwrap();
            assert_eq!(format.to_string(), *name);
        }
    }

    #[test]
    fn test_render_json() {
        let one = [serde_json::json!({"a": 1})];
        let two = [serde_json::json!({"a": 1}), serde_json::json!({"a": 2})];

        assert_eq!(
            OutputFormat::Json.render_json(&one).unwrap().unwrap(),
            r#"{"a":1}"#
        );
        assert_eq!(
            OutputFormat::Json.render_json(&two).unwrap().unwrap(),
            r#"[{"a":1},{"a":2}]"#
        );
        assert_eq!(
            OutputFormat::JsonLine.render_json(&two).unwrap().unwrap(),
            "{\"a\":1}\n{\"a\":2}"
        );
        assert!(OutputFormat::Table.render_json(&one).is_none());
        assert!(OutputFormat::JsonPretty.is_json());
        assert!(!OutputFormat::Psv.is_json());
    }
}
