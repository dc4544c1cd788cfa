//! Terminal output for the `minicloud` binary
//!
//! Human mode prints marked lines meant for reading; JSON mode keeps stdout
//! for the single document a command prints with `print_json` and sends
//! warnings and errors to stderr as JSON objects.

use chrono::{DateTime, Utc};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Width of the label column of [`OutputFormatter::field`] lines
const LABEL_WIDTH: usize = 12;

/// Sink for command output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    /// A labelled value such as a sync time or a file path
    fn field(&self, label: &str, value: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output with status marks
pub struct HumanFormatter;

impl HumanFormatter {
    fn field_line(label: &str, value: &str) -> String {
        format!("  {:<width$} {}", format!("{label}:"), value, width = LABEL_WIDTH)
    }
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {message}");
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {message}");
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {message}");
    }
    fn info(&self, message: &str) {
        println!("  {message}");
    }
    fn field(&self, label: &str, value: &str) {
        println!("{}", Self::field_line(label, value));
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// Machine-readable output; only `print_json` writes to stdout
pub struct JsonFormatter;

impl JsonFormatter {
    fn error_object(message: &str) -> serde_json::Value {
        serde_json::json!({"success": false, "error": message})
    }

    fn warning_object(message: &str) -> serde_json::Value {
        serde_json::json!({"level": "warning", "message": message})
    }
}

impl OutputFormatter for JsonFormatter {
    fn success(&self, _message: &str) {}
    fn error(&self, message: &str) {
        eprintln!("{}", Self::error_object(message));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", Self::warning_object(message));
    }
    fn info(&self, _message: &str) {}
    // Labelled values are part of the document passed to print_json
    fn field(&self, _label: &str, _value: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

/// Formats epoch milliseconds for display; `-` when unknown
pub fn format_millis(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Formats a byte count with a binary unit
pub fn format_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return "-".to_string();
    };
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
