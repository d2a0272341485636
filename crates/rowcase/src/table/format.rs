//! Canonical rendering of pipe-markdown tables.

use unicode_width::UnicodeWidthStr;

use super::row::{Padding, RowKind, classify_table};

/// Re-render a markdown table canonically.
pub fn format_markdown(text: &str) -> String {
    render(&classify_table(text))
}

/// Render classified rows with every column padded to its widest cell.
///
/// Comments are written verbatim, blank rows as empty lines. Separators keep
/// their padding style. Rows shorter than the widest row are padded with
/// empty cells.
pub fn render(rows: &[RowKind]) -> String {
    let widths = column_widths(rows);
    let mut out = String::new();

    for row in rows {
        match row {
            RowKind::Comment { text } => out.push_str(text),
            RowKind::Separator { padding } => render_separator(&mut out, &widths, *padding),
            RowKind::Header { cells } | RowKind::Data { cells } => {
                if !cells.is_empty() {
                    render_cells(&mut out, &widths, cells);
                }
            }
        }
        out.push('\n');
    }

    out
}

fn column_widths(rows: &[RowKind]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for cells in rows.iter().filter_map(RowKind::cells) {
        for (i, cell) in cells.iter().enumerate() {
            let width = cell.width();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }
    // A separator cell needs at least one hyphen
    widths.iter().map(|w| (*w).max(1)).collect()
}

fn render_cells(out: &mut String, widths: &[usize], cells: &[String]) {
    out.push('|');
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.width())));
        out.push_str(" |");
    }
}

fn render_separator(out: &mut String, widths: &[usize], padding: Padding) {
    out.push('|');
    for width in widths {
        match padding {
            Padding::Padded => {
                out.push(' ');
                out.push_str(&"-".repeat(*width));
                out.push_str(" |");
            }
            Padding::Unpadded => {
                out.push_str(&"-".repeat(width + 2));
                out.push('|');
            }
        }
    }
}
