use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Default case header: kickstart / codejam / hacker cup style
pub const DEFAULT_PATTERN: &str = r"^Case #(\d+):";

/// Side-by-side rows wider than this fall back to stacked rows
pub const DEFAULT_WRAP_WIDTH: usize = 120;

/// How two lines are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMethod {
    /// Byte-for-byte equality
    Exact,
    /// Word-by-word equality, whitespace runs ignored
    Token,
    /// Word-by-word, numbers equal within epsilon
    #[default]
    Numeric,
}

impl FromStr for CompareMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "token" => Ok(Self::Token),
            "numeric" => Ok(Self::Numeric),
            other => Err(format!(
                "unknown comparison method '{other}' (expected exact, token or numeric)"
            )),
        }
    }
}

impl fmt::Display for CompareMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Token => "token",
            Self::Numeric => "numeric",
        };
        f.write_str(name)
    }
}

/// What must match for two cases to be equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseEquality {
    /// Only the header text after the matched prefix
    Header,
    /// Every line, positionally, including the header line
    #[default]
    Body,
}

/// What gets printed for mismatching cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Unified `<` / `>` diff
    #[default]
    Normal,
    /// Two columns
    #[serde(alias = "side_by_side")]
    SideBySide,
    /// Newline separated list of mismatching case numbers
    #[serde(rename = "caseno", alias = "caseno_list")]
    CasenoList,
    /// Status only
    Brief,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "sidebyside" | "side_by_side" | "side-by-side" => Ok(Self::SideBySide),
            "caseno" | "caseno_list" => Ok(Self::CasenoList),
            "brief" => Ok(Self::Brief),
            other => Err(format!(
                "unknown formatting '{other}' (expected normal, sidebyside, caseno or brief)"
            )),
        }
    }
}

impl OutputMode {
    /// Whether this mode prints per-line diffs
    pub fn shows_diff(&self) -> bool {
        matches!(self, Self::Normal | Self::SideBySide)
    }
}

/// Immutable run configuration, built once by the entry point
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Header regex; the first capture group is the case number
    pub pattern: String,
    /// Treat each file as a single case and ignore the pattern
    pub one_case: bool,
    pub method: CompareMethod,
    /// Absolute or relative tolerance for numeric comparison
    pub epsilon: f64,
    pub equality: CaseEquality,
    pub output: OutputMode,
    /// Print `Correct: G/N (P%)` at the end
    pub summary: bool,
    /// Drop equal line pairs from the diff
    pub suppress: bool,
    pub color: bool,
    pub wrap_width: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            one_case: false,
            method: CompareMethod::default(),
            epsilon: 0.0,
            equality: CaseEquality::default(),
            output: OutputMode::default(),
            summary: false,
            suppress: false,
            color: true,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

/// One case: a header line plus the body lines up to the next header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    header: String,
    lines: Vec<String>,
    start_line: usize,
}

impl Case {
    /// `lines` must hold the header line itself as its first element.
    pub fn new(header: impl Into<String>, lines: Vec<String>, start_line: usize) -> Self {
        debug_assert!(!lines.is_empty(), "a case always contains its header line");
        Self {
            header: header.into(),
            lines,
            start_line,
        }
    }

    /// Header text without the matched prefix
    pub fn header(&self) -> &str {
        &self.header
    }

    /// All lines of the case, header line first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 1-based line number of the header in its source file
    pub fn start_line(&self) -> usize {
        self.start_line
    }
}

/// The cases of one file, numbered 1..=N in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseSequence {
    cases: Vec<Case>,
}

impl CaseSequence {
    pub fn new(cases: Vec<Case>) -> Self {
        Self { cases }
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case by its 1-based number
    pub fn case(&self, caseno: usize) -> Option<&Case> {
        caseno.checked_sub(1).and_then(|i| self.cases.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Case> {
        self.cases.iter()
    }
}

impl<'a> IntoIterator for &'a CaseSequence {
    type Item = &'a Case;
    type IntoIter = std::slice::Iter<'a, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
