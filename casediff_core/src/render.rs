use crate::diff::{DiffRecord, DiffSide};

const COLUMN_SPACING: &str = "      ";
const STACKED_SEPARATOR: &str = "\n\t";

/// Diff line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `< left` / `> right` lines
    Unified,
    /// Two columns, stacked when wider than the wrap width
    SideBySide,
}

/// Lays out diff records with line numbers and padding
#[derive(Debug, Clone)]
pub struct DiffPrinter {
    layout: Layout,
    color: bool,
    wrap_width: usize,
}

struct Alignment {
    lineno: [usize; 2],
    left_text: usize,
    fits: bool,
}

fn lineno_width<'a>(sides: impl Iterator<Item = &'a DiffSide>) -> usize {
    sides
        .map(|s| s.line_number.to_string().len())
        .max()
        .unwrap_or(0)
}

impl DiffPrinter {
    pub fn new(layout: Layout, color: bool, wrap_width: usize) -> Self {
        Self {
            layout,
            color,
            wrap_width,
        }
    }

    fn align(&self, records: &[DiffRecord]) -> Alignment {
        let lineno = [
            lineno_width(records.iter().filter_map(|r| r.left.as_ref())),
            lineno_width(records.iter().filter_map(|r| r.right.as_ref())),
        ];
        let left_text = records.iter().map(|r| r.widths().0).max().unwrap_or(0);
        let right_text = records.iter().map(|r| r.widths().1).max().unwrap_or(0);

        let total = lineno[0] + lineno[1] + left_text + right_text + 4;
        Alignment {
            lineno,
            left_text,
            fits: total + COLUMN_SPACING.len() <= self.wrap_width,
        }
    }

    fn build(&self, side: &DiffSide, lineno_width: usize, text_width: usize) -> String {
        let pad = text_width.saturating_sub(side.width());
        format!(
            "{:>width$}: {}{}",
            side.line_number,
            side.display.render(self.color),
            " ".repeat(pad),
            width = lineno_width
        )
    }

    /// Render all records, one entry per record. Unified records with both
    /// sides span two lines. Empty input renders nothing.
    pub fn render(&self, records: &[DiffRecord]) -> Vec<String> {
        if records.is_empty() {
            return Vec::new();
        }

        let align = self.align(records);
        let left = |s: &DiffSide| self.build(s, align.lineno[0], align.left_text);
        let right = |s: &DiffSide| self.build(s, align.lineno[1], 0);
        let blank_left = " ".repeat(align.lineno[0] + 2 + align.left_text);

        records
            .iter()
            .filter_map(|record| match self.layout {
                Layout::SideBySide => {
                    let separator = if align.fits {
                        COLUMN_SPACING
                    } else {
                        STACKED_SEPARATOR
                    };
                    match (&record.left, &record.right) {
                        (Some(l), Some(r)) => Some(format!("{}{}{}", left(l), separator, right(r))),
                        (None, Some(r)) if align.fits => {
                            Some(format!("{}{}{}", blank_left, separator, right(r)))
                        }
                        (None, Some(r)) => Some(format!("\t{}", right(r))),
                        (Some(l), None) => Some(left(l)),
                        (None, None) => None,
                    }
                }
                Layout::Unified => match (&record.left, &record.right) {
                    (Some(l), Some(r)) => Some(format!("< {}\n> {}", left(l), right(r))),
                    (None, Some(r)) => Some(format!("> {}", right(r))),
                    (Some(l), None) => Some(format!("< {}", left(l))),
                    (None, None) => None,
                },
            })
            .collect()
    }
}
