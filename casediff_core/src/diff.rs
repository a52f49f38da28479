use crate::equality::lines_equal;
use crate::highlight::{format_extra_line, format_line_pair, Style, StyledText};
use casediff_common::{Case, Options};
use tracing::debug;

/// One side of a diff line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSide {
    /// 1-based line number in the source file
    pub line_number: usize,
    pub text: String,
    pub display: StyledText,
}

impl DiffSide {
    /// Width of the unstyled text
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// One aligned line position of a mismatching case. A side is `None` only
/// past the end of the shorter case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub caseno: usize,
    /// Position within the case; 0 is the header line
    pub index: usize,
    pub left: Option<DiffSide>,
    pub right: Option<DiffSide>,
}

impl DiffRecord {
    pub fn line_numbers(&self) -> (Option<usize>, Option<usize>) {
        (
            self.left.as_ref().map(|s| s.line_number),
            self.right.as_ref().map(|s| s.line_number),
        )
    }

    pub fn widths(&self) -> (usize, usize) {
        (
            self.left.as_ref().map_or(0, DiffSide::width),
            self.right.as_ref().map_or(0, DiffSide::width),
        )
    }
}

fn side(case: &Case, index: usize, display: StyledText) -> DiffSide {
    DiffSide {
        line_number: case.start_line() + index,
        text: case.lines()[index].clone(),
        display,
    }
}

/// Build the positional diff of two cases that compared unequal.
///
/// With `suppress` set, equal line pairs are dropped. Lines past the end of
/// the shorter case have no counterpart and are always kept.
pub fn make_diff(caseno: usize, a: &Case, b: &Case, options: &Options) -> Vec<DiffRecord> {
    let common = a.len().min(b.len());
    let mut records = Vec::with_capacity(a.len().max(b.len()));

    for (index, (a_line, b_line)) in a.lines().iter().zip(b.lines()).enumerate() {
        if options.suppress && lines_equal(a_line, b_line, options) {
            continue;
        }
        let (a_display, b_display) = format_line_pair(a_line, b_line, options);
        records.push(DiffRecord {
            caseno,
            index,
            left: Some(side(a, index, a_display)),
            right: Some(side(b, index, b_display)),
        });
    }

    for index in common..a.len() {
        let display = format_extra_line(&a.lines()[index], Style::Removed, options);
        records.push(DiffRecord {
            caseno,
            index,
            left: Some(side(a, index, display)),
            right: None,
        });
    }
    for index in common..b.len() {
        let display = format_extra_line(&b.lines()[index], Style::Added, options);
        records.push(DiffRecord {
            caseno,
            index,
            left: None,
            right: Some(side(b, index, display)),
        });
    }

    debug!("Case #{}: {} diff lines", caseno, records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use casediff_common::CompareMethod;

    fn case(lines: &[&str], start_line: usize) -> Case {
        Case::new("", lines.iter().map(|l| l.to_string()).collect(), start_line)
    }

    fn opts(suppress: bool) -> Options {
        Options {
            method: CompareMethod::Exact,
            suppress,
            color: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_suppress_keeps_only_mismatch() {
        let a = case(&["Case #1:", "x", "y", "z"], 1);
        let b = case(&["Case #1:", "x", "w", "z"], 1);
        let records = make_diff(1, &a, &b, &opts(true));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.index, 2);
        assert_eq!(record.left.as_ref().unwrap().text, "y");
        assert_eq!(record.right.as_ref().unwrap().text, "w");
        assert_eq!(record.line_numbers(), (Some(3), Some(3)));
    }

    #[test]
    fn test_without_suppress_all_lines() {
        let a = case(&["Case #1:", "x", "y"], 4);
        let b = case(&["Case #1:", "x", "w"], 10);
        let records = make_diff(2, &a, &b, &opts(false));

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.caseno == 2));
        assert_eq!(records[1].line_numbers(), (Some(5), Some(11)));
    }

    #[test]
    fn test_surplus_lines_one_sided() {
        let a = case(&["Case #1:", "1", "2", "3"], 1);
        let b = case(&["Case #1:", "1"], 1);
        let records = make_diff(1, &a, &b, &opts(true));

        assert_eq!(records.len(), 2);
        for (record, expected) in records.iter().zip(["2", "3"]) {
            assert!(record.right.is_none());
            assert_eq!(record.left.as_ref().unwrap().text, expected);
        }
        assert_eq!(records[1].line_numbers(), (Some(4), None));
        assert_eq!(records[1].widths(), (1, 0));
    }

    #[test]
    fn test_right_surplus() {
        let a = case(&["Case #1:"], 1);
        let b = case(&["Case #1:", "extra"], 7);
        let records = make_diff(1, &a, &b, &opts(true));

        assert_eq!(records.len(), 1);
        assert!(records[0].left.is_none());
        assert_eq!(records[0].line_numbers(), (None, Some(8)));
    }

    #[test]
    fn test_surplus_colored_whole() {
        let a = case(&["Case #1:"], 1);
        let b = case(&["Case #1:", "extra"], 1);
        let options = Options {
            color: true,
            ..opts(true)
        };
        let records = make_diff(1, &a, &b, &options);
        let display = &records[0].right.as_ref().unwrap().display;
        assert_eq!(display.spans().len(), 1);
        assert_eq!(display.spans()[0].style, Style::Added);
    }
}
