use crate::words::Words;
use casediff_common::{Case, CaseEquality, CompareMethod, Options};

/// Parse a word as a floating point number. A single underscore between
/// two digits is accepted as a digit separator (`1_000`).
pub fn parse_number(word: &str) -> Option<f64> {
    if !word.contains('_') {
        return word.parse::<f64>().ok();
    }
    let bytes = word.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }
    word.replace('_', "").parse::<f64>().ok()
}

pub fn is_number(word: &str) -> bool {
    parse_number(word).is_some()
}

/// Two numbers are within tolerance if their absolute difference or their
/// relative difference `|a-b| / (|a|+|b|)` is at most `epsilon`.
///
/// The absolute test runs first; a zero denominator implies `a == b == 0`,
/// which the absolute test has already accepted.
pub fn within_tolerance(a: f64, b: f64, epsilon: f64) -> bool {
    let delta = (a - b).abs();
    delta <= epsilon || delta / (a.abs() + b.abs()) <= epsilon
}

/// Words are equal if identical, or if both are numbers within tolerance.
pub fn equal_numeric(a: &str, b: &str, epsilon: f64) -> bool {
    if a == b {
        return true;
    }
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => within_tolerance(x, y, epsilon),
        _ => false,
    }
}

/// Same number of words and every word pair identical
pub fn equal_lines_word(a: &str, b: &str) -> bool {
    let (a_words, b_words) = (Words::split(a), Words::split(b));
    a_words.len() == b_words.len() && a_words.iter().zip(b_words.iter()).all(|(x, y)| x == y)
}

/// Same number of words and every word pair numerically equal
pub fn equal_lines_numeric(a: &str, b: &str, epsilon: f64) -> bool {
    let (a_words, b_words) = (Words::split(a), Words::split(b));
    a_words.len() == b_words.len()
        && a_words
            .iter()
            .zip(b_words.iter())
            .all(|(x, y)| equal_numeric(x, y, epsilon))
}

/// Compare two lines with the configured method
pub fn lines_equal(a: &str, b: &str, options: &Options) -> bool {
    match options.method {
        CompareMethod::Exact => a == b,
        CompareMethod::Token => equal_lines_word(a, b),
        CompareMethod::Numeric => equal_lines_numeric(a, b, options.epsilon),
    }
}

/// Compare two cases, either by header only or positionally line by line
pub fn cases_equal(a: &Case, b: &Case, options: &Options) -> bool {
    match options.equality {
        CaseEquality::Header => lines_equal(a.header(), b.header(), options),
        CaseEquality::Body => {
            a.len() == b.len()
                && a
                    .lines()
                    .iter()
                    .zip(b.lines())
                    .all(|(x, y)| lines_equal(x, y, options))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(method: CompareMethod, epsilon: f64) -> Options {
        Options {
            method,
            epsilon,
            ..Default::default()
        }
    }

    fn case(lines: &[&str]) -> Case {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let header = lines[0].trim_start_matches("Case #1:").to_string();
        Case::new(header, lines, 1)
    }

    #[test]
    fn test_equal_numeric_tolerance() {
        assert!(equal_numeric("1.0", "1.0000001", 1e-6));
        assert!(!equal_numeric("1", "2", 0.0));
        assert!(equal_numeric("abc", "abc", 0.0));
        assert!(!equal_numeric("abc", "xyz", 1.0));
        assert!(equal_numeric("0", "0.0", 0.0));
        assert!(equal_numeric("0", "-0", 0.0));
    }

    #[test]
    fn test_equal_numeric_relative() {
        // abs diff 10, relative 10 / 2_000_010 ~ 5e-6
        assert!(equal_numeric("1000000", "1000010", 1e-5));
        assert!(!equal_numeric("1000000", "1000010", 1e-6));
        assert!(equal_numeric("3.140", "3.141", 0.01));
        assert!(!equal_numeric("3.140", "3.141", 0.0));
    }

    #[test]
    fn test_digit_separators() {
        assert_eq!(parse_number("1_000"), Some(1000.0));
        assert_eq!(parse_number("1_000.2_5"), Some(1000.25));
        assert!(equal_numeric("1_000", "1000", 0.0));
        assert_eq!(parse_number("_1"), None);
        assert_eq!(parse_number("1_"), None);
        assert_eq!(parse_number("1__0"), None);
        assert_eq!(parse_number("1_.5"), None);
        assert!(!equal_numeric("1__0", "10", 0.0));
    }

    #[test]
    fn test_mixed_numeric_and_text_unequal() {
        assert!(!equal_numeric("5", "five", 100.0));
        assert!(!equal_numeric("IMPOSSIBLE", "0", 100.0));
    }

    #[test]
    fn test_token_count_mismatch() {
        assert!(!equal_lines_word("a b", "a"));
        assert!(!equal_lines_numeric("1 2", "1", 1e9));
        assert!(equal_lines_word("a   b ", " a b"));
    }

    #[test]
    fn test_lines_equal_by_method() {
        let exact = opts(CompareMethod::Exact, 0.0);
        let token = opts(CompareMethod::Token, 0.0);
        let numeric = opts(CompareMethod::Numeric, 1e-3);

        assert!(!lines_equal("1  2", "1 2", &exact));
        assert!(lines_equal("1  2", "1 2", &token));
        assert!(!lines_equal("1.0 2", "1 2", &token));
        assert!(lines_equal("1.0 2", "1 2.0001", &numeric));
    }

    #[test]
    fn test_lines_equal_reflexive_and_symmetric() {
        let samples = ["", " ", "Case #1: 3.5", "a  b\tc", "1e300 -inf nan", "x 1 y"];
        for method in [CompareMethod::Exact, CompareMethod::Token, CompareMethod::Numeric] {
            let o = opts(method, 0.1);
            for a in samples {
                assert!(lines_equal(a, a, &o), "{method}: {a:?} not reflexive");
                for b in samples {
                    assert_eq!(lines_equal(a, b, &o), lines_equal(b, a, &o));
                }
            }
        }
    }

    #[test]
    fn test_cases_equal_body() {
        let o = opts(CompareMethod::Exact, 0.0);
        let a = case(&["Case #1: 5", "5"]);
        let b = case(&["Case #1: 5", "5"]);
        let c = case(&["Case #1: 5", "6"]);
        let d = case(&["Case #1: 5", "5", "5"]);
        assert!(cases_equal(&a, &b, &o));
        assert!(!cases_equal(&a, &c, &o));
        assert!(!cases_equal(&a, &d, &o));
    }

    #[test]
    fn test_cases_equal_header_only() {
        let o = Options {
            method: CompareMethod::Exact,
            equality: CaseEquality::Header,
            ..Default::default()
        };
        let a = case(&["Case #1: 5", "anything"]);
        let b = case(&["Case #1: 5", "else", "entirely"]);
        let c = case(&["Case #1: 6", "anything"]);
        assert!(cases_equal(&a, &b, &o));
        assert!(!cases_equal(&a, &c, &o));
    }
}
