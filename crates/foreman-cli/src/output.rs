//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: framed sections for humans, tab-separated rows for pipes, or
//! stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins), settled by `foreman_core::config`:
//! 1. `--format`
//! 2. `--json`
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. `output` in the user config file
//! 5. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use foreman_core::ForemanError;
use foreman_core::notify::{Toast, ToastLevel};
use foreman_core::validate::{FieldError, FormErrors};
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Tab-separated plain text for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Map the mode name settled by config resolution.
    pub fn from_resolved(raw: &str) -> anyhow::Result<Self> {
        <Self as ValueEnum>::from_str(raw, true)
            .map_err(|e| anyhow::anyhow!("unknown output mode '{raw}': {e}"))
    }

    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }
}

/// Trait implemented by any CLI result type that can be rendered in all modes.
///
/// `render_table` writes one tab-separated row in the column order of
/// `table_headers`.
pub trait Renderable {
    /// Render for human consumption.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as one self-contained JSON object.
    fn render_json(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as a single text row (no header; see [`table_headers`]).
    ///
    /// [`table_headers`]: Renderable::table_headers
    fn render_table(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Column headers for text mode.
    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Serialize `value` as compact JSON into `w`.
pub fn write_json<T: Serialize>(w: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *w, value).map_err(io::Error::from)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render a list of [`Renderable`] items to stdout.
pub fn render_list<R: Renderable>(items: &[R], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_list(&mut out, items, mode)
}

/// List rendering against any writer.
///
/// - In JSON mode, wraps items in a JSON array.
/// - In text mode, prints a header row then one row per item.
/// - In pretty mode, renders items sequentially.
pub fn write_list<R: Renderable>(
    out: &mut dyn Write,
    items: &[R],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Pretty => {
            for item in items {
                item.render_human(out)?;
            }
        }
        OutputMode::Text => {
            let headers = if items.is_empty() {
                &[] as &[&str]
            } else {
                R::table_headers()
            };
            if !headers.is_empty() {
                writeln!(out, "{}", headers.join("\t"))?;
            }
            for item in items {
                item.render_table(out)?;
            }
        }
        OutputMode::Json => {
            write!(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(out, ",")?;
                }
                writeln!(out)?;
                let mut buf = Vec::new();
                item.render_json(&mut buf)?;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                out.write_all(&buf)?;
            }
            writeln!(out, "\n]")?;
        }
    }
    Ok(())
}

/// A structured error with optional suggestion, error code and field errors.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Inline form messages, one per failing field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
            fields: Vec::new(),
        }
    }

    /// Attach the field errors of a rejected form.
    #[must_use]
    pub fn with_fields(mut self, errors: &FormErrors) -> Self {
        self.fields = errors.iter().cloned().collect();
        self
    }
}

impl From<&ForemanError> for CliError {
    fn from(err: &ForemanError) -> Self {
        Self {
            message: err.to_string(),
            suggestion: Some(err.suggestion()),
            error_code: Some(err.error_code().code().to_string()),
            fields: Vec::new(),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

pub fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            for field in &error.fields {
                writeln!(out, "  {}: {}", field.field, field.message)?;
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render a [`ForemanError`] to stderr and hand it back for propagation.
pub fn fail(mode: OutputMode, err: ForemanError) -> anyhow::Error {
    if let Err(render_err) = render_error(mode, &CliError::from(&err)) {
        tracing::warn!(error = %render_err, "could not render error");
    }
    err.into()
}

/// Print page notifications to stderr. JSON consumers read the result
/// object instead, so nothing is printed in JSON mode.
pub fn render_toasts(mode: OutputMode, toasts: &[Toast]) -> io::Result<()> {
    if mode.is_json() {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_toasts(&mut out, toasts)
}

pub fn write_toasts(out: &mut dyn Write, toasts: &[Toast]) -> io::Result<()> {
    for toast in toasts {
        let mark = match toast.level {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
            ToastLevel::Info => "·",
        };
        writeln!(out, "{mark} {}", toast.message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::model::ProjectStatus;
    use foreman_core::notify::Toasts;

    struct SimpleItem {
        name: String,
        count: u32,
    }

    impl Renderable for SimpleItem {
        fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}: {}", self.name, self.count)
        }

        fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
            write_json(w, &serde_json::json!({ "name": self.name, "count": self.count }))
        }

        fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}\t{}", self.name, self.count)
        }

        fn table_headers() -> &'static [&'static str] {
            &["NAME", "COUNT"]
        }
    }

    fn items() -> Vec<SimpleItem> {
        vec![
            SimpleItem {
                name: "Склад".into(),
                count: 1,
            },
            SimpleItem {
                name: "Мост".into(),
                count: 2,
            },
        ]
    }

    #[test]
    fn output_mode_round_trips_resolved_names() {
        for mode in [OutputMode::Pretty, OutputMode::Text, OutputMode::Json] {
            assert_eq!(OutputMode::from_resolved(mode.as_str()).unwrap(), mode);
        }
        assert!(OutputMode::from_resolved("yaml").is_err());
        assert!(OutputMode::Json.is_json());
        assert!(OutputMode::Pretty.is_pretty());
    }

    #[test]
    fn text_list_has_header_then_rows() {
        let mut buf = Vec::new();
        write_list(&mut buf, &items(), OutputMode::Text).unwrap();
        let s = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines, ["NAME\tCOUNT", "Склад\t1", "Мост\t2"]);
    }

    #[test]
    fn empty_text_list_prints_nothing() {
        let mut buf = Vec::new();
        write_list::<SimpleItem>(&mut buf, &[], OutputMode::Text).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn json_list_is_an_array() {
        let mut buf = Vec::new();
        write_list(&mut buf, &items(), OutputMode::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["name"], "Мост");

        let mut empty = Vec::new();
        write_list::<SimpleItem>(&mut empty, &[], OutputMode::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&empty).unwrap();
        assert!(value.as_array().unwrap().is_empty());
    }

    #[test]
    fn cli_error_from_foreman_error_carries_code() {
        let err = ForemanError::InvalidStatusTransition {
            from: ProjectStatus::Planning,
            to: ProjectStatus::Completed,
        };
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2003"));
        assert!(cli.message.contains("planning"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn human_error_lists_fields() {
        let mut errors = FormErrors::new();
        errors.push("email", "Неверный формат email");
        let err = CliError::from(&ForemanError::Validation { count: 1 }).with_fields(&errors);

        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Text, &err).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("error[E"));
        assert!(s.contains("  email: Неверный формат email"));
    }

    #[test]
    fn json_error_wraps_payload() {
        let mut errors = FormErrors::new();
        errors.push("name", "Название/Имя обязательно");
        let err = CliError::new("form validation failed on 1 field(s)").with_fields(&errors);

        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Json, &err).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error"]["fields"][0]["field"], "name");
        assert!(value["error"].get("error_code").is_none());
    }

    #[test]
    fn toasts_are_marked_by_level() {
        let mut toasts = Toasts::new();
        toasts.success("Клиент удален");
        toasts.error("Ошибка при удалении клиента");
        let mut buf = Vec::new();
        write_toasts(&mut buf, &toasts.drain()).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "✓ Клиент удален\n✗ Ошибка при удалении клиента\n");
    }
}
