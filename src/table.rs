//! Plain-text rendering of a grid, laid out the way the worksheet will look.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::address::column_address;
use crate::grid::{Cell, FIRST_DATA_ROW, Grid, HEADER_ROW};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Maximum data rows to show; `None` shows all.
    pub limit: Option<usize>,
    /// Suffix every data cell with its inferred kind.
    pub show_kinds: bool,
}

pub fn render_grid(grid: &Grid, options: RenderOptions) -> String {
    let width = grid.column_count().max(grid.headers().len());
    let shown = options.limit.unwrap_or(usize::MAX);

    let mut lines: Vec<Vec<String>> = Vec::new();
    let mut top = vec![String::new()];
    top.extend((0..width).map(|idx| column_address(idx).unwrap_or_default()));
    lines.push(top);
    if !grid.headers().is_empty() {
        lines.push(render_cells(HEADER_ROW, grid.headers(), width, false));
    }
    for (idx, cells) in grid.rows().iter().enumerate().take(shown) {
        let row = FIRST_DATA_ROW + idx as u32;
        lines.push(render_cells(row, cells, width, options.show_kinds));
    }

    let mut widths = vec![0usize; width + 1];
    for line in &lines {
        for (idx, text) in line.iter().enumerate() {
            widths[idx] = widths[idx].max(display_width(text));
        }
    }

    let mut output = String::new();
    for line in &lines {
        let _ = writeln!(output, "{}", pad_line(line, &widths));
    }
    let hidden = grid.row_count().saturating_sub(shown);
    if hidden > 0 {
        let _ = writeln!(output, "... {hidden} more row(s)");
    }
    output
}

pub fn print_grid(grid: &Grid, options: RenderOptions) {
    print!("{}", render_grid(grid, options));
}

fn render_cells(row: u32, cells: &[Cell], width: usize, show_kinds: bool) -> Vec<String> {
    let mut line = vec![String::new(); width + 1];
    line[0] = row.to_string();
    for cell in cells {
        let mut text = sanitize(&cell.value.as_display()).into_owned();
        if show_kinds {
            let _ = write!(text, " <{}>", cell.value.kind());
        }
        line[cell.column + 1] = text;
    }
    line
}

fn pad_line(values: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(value);
        let padding = widths[idx].saturating_sub(display_width(value));
        line.push_str(&" ".repeat(padding));
    }
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
