// Output formatting: the JSON report on stdout, tables on the terminal.

pub mod terminal;

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

/// At most `max_chars` characters (not bytes), with "..." appended when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Serialize a value as pretty (default) or single-line JSON.
pub fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("Failed to serialize output")
}

/// Write one JSON document, newline-terminated, to stdout.
pub fn write_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = to_json(value, compact)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_compact_json_is_one_line() {
        let value = serde_json::json!({"error": "No incidents provided"});
        let json = to_json(&value, true).unwrap();
        assert_eq!(json, r#"{"error":"No incidents provided"}"#);
        assert!(to_json(&value, false).unwrap().contains('\n'));
    }
}
