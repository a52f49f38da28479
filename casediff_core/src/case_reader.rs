use casediff_common::{Case, CaseDiffError, CaseSequence, Options};
use regex::Regex;
use std::fs;
use std::num::IntErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Splits a file into cases
#[derive(Debug, Clone)]
pub struct CaseReader {
    /// `None` reads the whole file as a single case
    pattern: Option<Regex>,
}

impl CaseReader {
    pub fn new(options: &Options) -> Result<Self, CaseDiffError> {
        if options.one_case {
            Ok(Self::single_case())
        } else {
            Self::with_pattern(&options.pattern)
        }
    }

    /// Cases start at lines matching `pattern`; its first capture group is
    /// the case number.
    pub fn with_pattern(pattern: &str) -> Result<Self, CaseDiffError> {
        let regex = Regex::new(pattern)
            .map_err(|e| CaseDiffError::InvalidPattern(e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(CaseDiffError::InvalidPattern(format!(
                "'{pattern}' has no capture group for the case number"
            )));
        }
        Ok(Self {
            pattern: Some(regex),
        })
    }

    pub fn single_case() -> Self {
        Self { pattern: None }
    }

    /// Read `path` fully, then split it.
    pub fn read_file(&self, path: &Path) -> Result<CaseSequence, CaseDiffError> {
        let text = fs::read_to_string(path).map_err(|e| CaseDiffError::io(path, e))?;
        let cases = self.parse(&text, path)?;
        info!("Read {} cases from {}", cases.len(), path.display());
        Ok(cases)
    }

    /// Split `text`; `path` is only used in error reports.
    pub fn parse(&self, text: &str, path: &Path) -> Result<CaseSequence, CaseDiffError> {
        match &self.pattern {
            None => Ok(parse_single_case(text)),
            Some(regex) => parse_cases(regex, text, path),
        }
    }
}

fn parse_single_case(text: &str) -> CaseSequence {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    match lines.first() {
        Some(first) => {
            let header = first.clone();
            CaseSequence::new(vec![Case::new(header, lines, 1)])
        }
        None => CaseSequence::default(),
    }
}

struct PendingCase {
    header: String,
    lines: Vec<String>,
    start_line: usize,
}

fn parse_cases(regex: &Regex, text: &str, path: &Path) -> Result<CaseSequence, CaseDiffError> {
    let mut cases = Vec::new();
    let mut current: Option<PendingCase> = None;

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;

        match header_match(regex, line, path, lineno)? {
            Some(header) => {
                let expected = cases.len() + usize::from(current.is_some()) + 1;
                if header.caseno != i64::try_from(expected).ok() {
                    return Err(CaseDiffError::Sequence {
                        path: path.to_path_buf(),
                        line: lineno,
                        expected,
                        actual: header.number,
                    });
                }
                if let Some(done) = current.take() {
                    cases.push(Case::new(done.header, done.lines, done.start_line));
                }
                debug!("Case #{} starts at {}:{}", expected, path.display(), lineno);
                current = Some(PendingCase {
                    header: line[header.prefix_len..].to_string(),
                    lines: vec![line.to_string()],
                    start_line: lineno,
                });
            }
            None => match current.as_mut() {
                Some(case) => case.lines.push(line.to_string()),
                None => {
                    return Err(CaseDiffError::MalformedInput {
                        path: path.to_path_buf(),
                    })
                }
            },
        }
    }

    if let Some(done) = current {
        cases.push(Case::new(done.header, done.lines, done.start_line));
    }
    Ok(CaseSequence::new(cases))
}

struct HeaderMatch {
    /// `None` when the number is too large for an `i64`
    caseno: Option<i64>,
    number: String,
    prefix_len: usize,
}

/// Matches a header at the start of `line`.
fn header_match(
    regex: &Regex,
    line: &str,
    path: &Path,
    lineno: usize,
) -> Result<Option<HeaderMatch>, CaseDiffError> {
    let Some(caps) = regex.captures(line) else {
        return Ok(None);
    };
    let Some(whole) = caps.get(0) else {
        return Ok(None);
    };
    if whole.start() != 0 {
        return Ok(None);
    }

    let group = caps.get(1).ok_or_else(|| {
        CaseDiffError::InvalidPattern(format!(
            "{}:{}: header matched without a case number",
            path.display(),
            lineno
        ))
    })?;
    let text = group.as_str().trim();
    let (caseno, number) = match text.parse::<i64>() {
        Ok(n) => (Some(n), n.to_string()),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            (None, text.to_string())
        }
        Err(_) => {
            return Err(CaseDiffError::InvalidPattern(format!(
                "{}:{}: case number '{}' is not an integer",
                path.display(),
                lineno,
                group.as_str()
            )))
        }
    };

    Ok(Some(HeaderMatch {
        caseno,
        number,
        prefix_len: whole.end(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use casediff_common::DEFAULT_PATTERN;

    fn reader() -> CaseReader {
        CaseReader::with_pattern(DEFAULT_PATTERN).unwrap()
    }

    fn parse(text: &str) -> Result<CaseSequence, CaseDiffError> {
        reader().parse(text, Path::new("test.txt"))
    }

    #[test]
    fn test_split_cases() {
        let cases = parse("Case #1: 5\n5\nCase #2: 7\nCase #3:\n1 2\n3 4\n").unwrap();
        assert_eq!(cases.len(), 3);

        let first = cases.case(1).unwrap();
        assert_eq!(first.header(), " 5");
        assert_eq!(first.lines(), ["Case #1: 5", "5"]);
        assert_eq!(first.start_line(), 1);

        let second = cases.case(2).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second.start_line(), 3);

        let third = cases.case(3).unwrap();
        assert_eq!(third.header(), "");
        assert_eq!(third.lines(), ["Case #3:", "1 2", "3 4"]);
        assert_eq!(third.start_line(), 4);
    }

    #[test]
    fn test_empty_file() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_first_line_must_be_header() {
        let err = parse("hello\nCase #1: 5\n").unwrap_err();
        assert!(matches!(err, CaseDiffError::MalformedInput { .. }));
    }

    #[test]
    fn test_out_of_sequence_header() {
        let err = parse("Case #1: 1\nCase #3: 3\n").unwrap_err();
        match err {
            CaseDiffError::Sequence {
                line,
                expected,
                actual,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(actual, "3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_case_must_be_one() {
        assert!(matches!(
            parse("Case #0: 1\n"),
            Err(CaseDiffError::Sequence { expected: 1, ref actual, .. }) if actual == "0"
        ));
    }

    #[test]
    fn test_huge_case_number_is_out_of_sequence() {
        let err = parse("Case #1: 1\nCase #99999999999999999999: 2\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "test.txt:2: expected case #2 but got #99999999999999999999"
        );
    }

    #[test]
    fn test_leading_zeros_reported_as_number() {
        let err = parse("Case #1: 1\nCase #003: 3\n").unwrap_err();
        assert_eq!(err.to_string(), "test.txt:2: expected case #2 but got #3");
    }

    #[test]
    fn test_header_must_match_at_line_start() {
        let reader = CaseReader::with_pattern(r"Case #(\d+):").unwrap();
        let cases = reader
            .parse("Case #1: a\n  Case #2: b\n", Path::new("t"))
            .unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases.case(1).unwrap().len(), 2);
    }

    #[test]
    fn test_crlf_lines() {
        let cases = parse("Case #1: 5\r\n5\r\n").unwrap();
        assert_eq!(cases.case(1).unwrap().lines(), ["Case #1: 5", "5"]);
    }

    #[test]
    fn test_single_case_mode() {
        let reader = CaseReader::single_case();
        let cases = reader
            .parse("first\nCase #7: x\nlast\n", Path::new("t"))
            .unwrap();
        assert_eq!(cases.len(), 1);
        let case = cases.case(1).unwrap();
        assert_eq!(case.header(), "first");
        assert_eq!(case.len(), 3);
        assert_eq!(case.start_line(), 1);

        assert!(reader.parse("", Path::new("t")).unwrap().is_empty());
    }

    #[test]
    fn test_only_first_line_header_yields_one_case() {
        let cases = parse("Case #1: 1\na\nb\nc\n").unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases.case(1).unwrap().len(), 4);
    }

    #[test]
    fn test_pattern_without_group_rejected() {
        assert!(matches!(
            CaseReader::with_pattern("^Case"),
            Err(CaseDiffError::InvalidPattern(_))
        ));
        assert!(matches!(
            CaseReader::with_pattern("^Case #(\\d+"),
            Err(CaseDiffError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_non_integer_case_number() {
        let reader = CaseReader::with_pattern(r"^Case #(\w+):").unwrap();
        assert!(matches!(
            reader.parse("Case #one: 1\n", Path::new("t")),
            Err(CaseDiffError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = reader()
            .read_file(Path::new("/nonexistent/casediff/output.txt"))
            .unwrap_err();
        assert!(matches!(err, CaseDiffError::Io { .. }));
    }
}
