//! # Output Renderer
//!
//! Turns rows and response bodies into the text written to stdout: aligned
//! tables, tab-separated plain lines, or indented JSON.

use crate::error::Result;
use crate::http::Response;
use crate::resources::Row;
use serde_json::{json, Value};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// Minimum number of spaces between aligned columns
pub const COLUMN_PADDING: usize = 2;

/// Output flags chosen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    pub json: bool,
    pub plain: bool,
    pub color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Space-padded columns for people
    Aligned,
    /// One tab between cells, for scripts
    Plain,
}

impl OutputMode {
    pub fn table_style(&self) -> TableStyle {
        if self.plain {
            TableStyle::Plain
        } else {
            TableStyle::Aligned
        }
    }

    /// Header row is shown unless plain output was requested
    pub fn table_headers<'a>(&self, headers: &'a [&'a str]) -> Option<&'a [&'a str]> {
        (!self.plain).then_some(headers)
    }
}

/// Widths of the padded columns in aligned output. One set is shared by all
/// pages of a streamed listing, so rows of later pages line up with the
/// header printed on the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths(Vec<usize>);

impl ColumnWidths {
    /// Widen to fit every cell except each line's last, padding included.
    /// Widths never shrink.
    fn fit(&mut self, lines: &[Vec<&str>]) {
        for line in lines {
            for (i, cell) in line.iter().enumerate().take(line.len().saturating_sub(1)) {
                let width = cell.width() + COLUMN_PADDING;
                match self.0.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => self.0.push(width),
                }
            }
        }
    }

    fn get(&self, column: usize) -> usize {
        self.0.get(column).copied().unwrap_or(0)
    }
}

/// Render `rows` (and `headers` when given) as a table
pub fn render_table(headers: Option<&[&str]>, rows: &[Row], style: TableStyle) -> String {
    render_table_with(headers, rows, style, &mut ColumnWidths::default())
}

/// Render a table whose aligned columns are at least as wide as `widths`,
/// widening `widths` to fit these rows
pub fn render_table_with(
    headers: Option<&[&str]>,
    rows: &[Row],
    style: TableStyle,
    widths: &mut ColumnWidths,
) -> String {
    let mut lines: Vec<Vec<&str>> = Vec::with_capacity(rows.len() + 1);
    if let Some(headers) = headers.filter(|h| !h.is_empty()) {
        lines.push(headers.to_vec());
    }
    lines.extend(rows.iter().map(|row| row.iter().map(String::as_str).collect()));

    let mut out = String::new();
    match style {
        TableStyle::Plain => {
            for line in &lines {
                out.push_str(&line.join("\t"));
                out.push('\n');
            }
        }
        TableStyle::Aligned => {
            widths.fit(&lines);
            for line in &lines {
                let last = line.len().saturating_sub(1);
                for (i, cell) in line.iter().enumerate() {
                    out.push_str(cell);
                    if i < last {
                        let pad = widths.get(i).saturating_sub(cell.width());
                        out.extend(std::iter::repeat(' ').take(pad));
                    }
                }
                out.push('\n');
            }
        }
    }
    out
}

pub fn write_table(
    out: &mut dyn Write,
    headers: Option<&[&str]>,
    rows: &[Row],
    style: TableStyle,
) -> Result<()> {
    write_table_with(out, headers, rows, style, &mut ColumnWidths::default())
}

pub fn write_table_with(
    out: &mut dyn Write,
    headers: Option<&[&str]>,
    rows: &[Row],
    style: TableStyle,
    widths: &mut ColumnWidths,
) -> Result<()> {
    out.write_all(render_table_with(headers, rows, style, widths).as_bytes())?;
    Ok(())
}

/// Indented (two spaces) JSON followed by a newline
pub fn render_json(value: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

pub fn write_json(out: &mut dyn Write, value: &Value) -> Result<()> {
    out.write_all(render_json(value)?.as_bytes())?;
    Ok(())
}

/// Indented body; an empty body prints nothing
pub fn write_json_body(out: &mut dyn Write, body: &[u8]) -> Result<()> {
    if body.is_empty() {
        return Ok(());
    }
    let value: Value = serde_json::from_slice(body)?;
    write_json(out, &value)
}

/// Indented body, or a status-only object when the body is empty
pub fn write_json_response(out: &mut dyn Write, response: &Response) -> Result<()> {
    if response.body.is_empty() {
        return write_json(out, &status_object(response.status, None));
    }
    write_json_body(out, &response.body)
}

pub fn status_object(status: u16, location: Option<&str>) -> Value {
    match location {
        Some(location) => json!({ "status": status, "location": location }),
        None => json!({ "status": status }),
    }
}
