//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table mode shows a
//! `Field`/`Value` detail table, structured formats use serde, plain emits
//! bare values for scripting.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// One row of a single-item detail table.
#[derive(Tabled)]
pub struct DetailRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl DetailRow {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering builds its rows with `detail_fn`; plain rendering
/// uses `plain_fn`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> Vec<DetailRow>,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => render_table(&detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

/// Shorten a multi-line function body for the detail table.
pub fn preview(source: Option<&str>) -> String {
    match source {
        None => "-".into(),
        Some("") => "(empty)".into(),
        Some(source) => {
            let lines = source.lines().count();
            let first = source.lines().next().unwrap_or_default().trim();
            if lines > 1 {
                format!("{first} … ({lines} lines)")
            } else {
                first.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_marks_absent_and_empty() {
        assert_eq!(preview(None), "-");
        assert_eq!(preview(Some("")), "(empty)");
    }

    #[test]
    fn preview_summarizes_multiline_bodies() {
        let src = "function Decoder(bytes, port) {\n  return {};\n}";
        assert_eq!(
            preview(Some(src)),
            "function Decoder(bytes, port) { … (3 lines)"
        );
        assert_eq!(preview(Some("return 1;")), "return 1;");
    }

    #[test]
    fn json_compact_is_single_line() {
        let out = render_single(
            &OutputFormat::JsonCompact,
            &serde_json::json!({"app_id": "my-app"}),
            |_| Vec::new(),
            |_| String::new(),
        );
        assert_eq!(out, r#"{"app_id":"my-app"}"#);
    }
}
