use crate::case_reader::CaseReader;
use crate::diff::{make_diff, DiffRecord};
use crate::equality::cases_equal;
use crate::render::{DiffPrinter, Layout};
use casediff_common::{CaseDiffError, CaseSequence, Options, OutputMode};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Non-fatal problems found while pairing the two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    CaseCountMismatch {
        left: PathBuf,
        left_cases: usize,
        right: PathBuf,
        right_cases: usize,
    },
    NoCasesFound {
        left: PathBuf,
        right: PathBuf,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::CaseCountMismatch {
                left,
                left_cases,
                right,
                right_cases,
            } => write!(
                f,
                "different number of cases: {} ({}) vs {} ({})",
                left_cases,
                left.display(),
                right_cases,
                right.display()
            ),
            Advisory::NoCasesFound { left, right } => write!(
                f,
                "no cases found in either {} or {}",
                left.display(),
                right.display()
            ),
        }
    }
}

/// Outcome of comparing two case files
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub left_cases: usize,
    pub right_cases: usize,
    /// Equality of each compared case pair, case `i + 1` at index `i`
    pub verdicts: Vec<bool>,
    /// Diff lines of every mismatching case, in case order. Only filled
    /// for output modes that print diffs.
    pub diffs: Vec<DiffRecord>,
    pub advisories: Vec<Advisory>,
}

impl Report {
    /// Number of matching cases
    pub fn good(&self) -> usize {
        self.verdicts.iter().filter(|&&equal| equal).count()
    }

    /// Number of compared cases (the common prefix of both files)
    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    /// 1-based numbers of the mismatching cases, ascending
    pub fn mismatched_cases(&self) -> Vec<usize> {
        self.verdicts
            .iter()
            .enumerate()
            .filter(|(_, equal)| !**equal)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Every case matches, both files have the same number of cases, and
    /// there is at least one.
    pub fn passed(&self) -> bool {
        self.left_cases == self.right_cases && self.total() > 0 && self.good() == self.total()
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// `Correct: G/N (P%)`, or `None` when nothing was compared
    pub fn summary_line(&self) -> Option<String> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let good = self.good();
        let percentage = 100.0 * good as f64 / total as f64;
        Some(format!("Correct: {good}/{total} ({percentage:.1}%)"))
    }
}

/// Drives a full comparison of two case files
pub struct CaseDiffSession<'a> {
    options: &'a Options,
    reader: CaseReader,
}

impl<'a> CaseDiffSession<'a> {
    pub fn new(options: &'a Options) -> Result<Self, CaseDiffError> {
        Ok(Self {
            options,
            reader: CaseReader::new(options)?,
        })
    }

    /// Read both files, then compare them case by case.
    pub fn compare_files(&self, left: &Path, right: &Path) -> Result<Report, CaseDiffError> {
        info!("Comparing {} with {}", left.display(), right.display());
        let left_cases = self.reader.read_file(left)?;
        let right_cases = self.reader.read_file(right)?;
        Ok(self.compare_sequences(left, &left_cases, right, &right_cases))
    }

    /// Compare two already split files. Names are only used in advisories.
    pub fn compare_sequences(
        &self,
        left: &Path,
        a: &CaseSequence,
        right: &Path,
        b: &CaseSequence,
    ) -> Report {
        let mut report = Report {
            left_cases: a.len(),
            right_cases: b.len(),
            ..Default::default()
        };

        if a.len() != b.len() {
            report.advisories.push(Advisory::CaseCountMismatch {
                left: left.to_path_buf(),
                left_cases: a.len(),
                right: right.to_path_buf(),
                right_cases: b.len(),
            });
        } else if b.is_empty() {
            report.advisories.push(Advisory::NoCasesFound {
                left: left.to_path_buf(),
                right: right.to_path_buf(),
            });
        }

        let with_diff = self.options.output.shows_diff();
        for (i, (case_a, case_b)) in a.iter().zip(b.iter()).enumerate() {
            let caseno = i + 1;
            let equal = cases_equal(case_a, case_b, self.options);
            debug!("Case #{}: {}", caseno, if equal { "equal" } else { "different" });
            if !equal && with_diff {
                report
                    .diffs
                    .extend(make_diff(caseno, case_a, case_b, self.options));
            }
            report.verdicts.push(equal);
        }

        info!("{}/{} cases equal", report.good(), report.total());
        report
    }

    /// Output lines for the configured mode, followed by the summary line
    /// when requested.
    pub fn render(&self, report: &Report) -> Vec<String> {
        let mut lines = match self.options.output {
            OutputMode::CasenoList => report
                .mismatched_cases()
                .into_iter()
                .map(|caseno| caseno.to_string())
                .collect(),
            OutputMode::Normal | OutputMode::SideBySide => {
                let layout = if self.options.output == OutputMode::SideBySide {
                    Layout::SideBySide
                } else {
                    Layout::Unified
                };
                DiffPrinter::new(layout, self.options.color, self.options.wrap_width)
                    .render(&report.diffs)
            }
            OutputMode::Brief => Vec::new(),
        };

        if self.options.summary {
            lines.extend(report.summary_line());
        }
        lines
    }
}
