use casediff_common::{
    load_config, CaseDiffError, CompareMethod, OptionOverrides, Options, OutputMode,
};
use casediff_core::CaseDiffSession;
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::fmt::Display;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "casediff")]
#[command(version)]
#[command(about = "Compare two output casefiles case by case", long_about = None)]
#[command(
    after_help = "Exit status is 0 if equal, 1 if different, 2 if trouble.\n\
                  By default each case should match numerically.\n\
                  Diffs are coloured by default.\n\
                  PATTERN, EPSILON, ONECASE, METHOD and FORMATTING override built-in defaults."
)]
struct Cli {
    /// Left casefile
    #[arg(default_value = "output.txt")]
    lhs_file: PathBuf,

    /// Right casefile
    #[arg(default_value = "answer.txt")]
    rhs_file: PathBuf,

    /// Config file (defaults to casediff.toml next to the binary or in the user config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Case header regex pattern (capture group for case number)
    #[arg(short = 'P', long, value_name = "PATTERN", help_heading = "Comparison")]
    pattern: Option<String>,

    /// Treat whole thing as one case and ignore pattern
    #[arg(short = '1', long = "one", help_heading = "Comparison")]
    one_case: bool,

    /// Only headers must match
    #[arg(long, overrides_with = "equal_body", help_heading = "Comparison")]
    equal_header: bool,

    /// Everything must match
    #[arg(long, overrides_with = "equal_header", help_heading = "Comparison")]
    equal_body: bool,

    /// Compare lines byte by byte
    #[arg(long, group = "method", help_heading = "Comparison")]
    exact: bool,

    /// Compare lines token by token
    #[arg(long, group = "method", help_heading = "Comparison")]
    token: bool,

    /// Compare lines numerically
    #[arg(long, group = "method", help_heading = "Comparison")]
    numeric: bool,

    /// Precision error allowed (abs or rel)
    #[arg(short, long, value_name = "EPS", help_heading = "Comparison")]
    epsilon: Option<f64>,

    /// Output a normal diff (not side by side)
    #[arg(long, group = "formatting", help_heading = "Formatting")]
    normal: bool,

    /// Output in two columns
    #[arg(short = 'y', long, group = "formatting", help_heading = "Formatting")]
    side_by_side: bool,

    /// Output a newline-separated list of mismatching (bad) casenos
    #[arg(long, group = "formatting", help_heading = "Formatting")]
    caseno: bool,

    /// Do not output diffs, only report status
    #[arg(short = 'q', long, group = "formatting", help_heading = "Formatting")]
    brief: bool,

    /// Print a summary count of good cases at the end
    #[arg(short, long, help_heading = "Formatting")]
    summary: bool,

    /// Do not output common lines
    #[arg(long, alias = "suppress-common-lines", help_heading = "Formatting")]
    suppress: bool,

    /// Color diffs
    #[arg(long, overrides_with = "no_color", help_heading = "Formatting")]
    color: bool,

    /// Do not color diffs
    #[arg(long, overrides_with = "color", help_heading = "Formatting")]
    no_color: bool,

    /// Side-by-side rows wider than this are stacked
    #[arg(short = 'W', long, value_name = "COLUMNS", help_heading = "Formatting")]
    width: Option<usize>,
}

impl Cli {
    /// Options given explicitly on the command line
    fn overrides(&self) -> OptionOverrides {
        let method = if self.exact {
            Some(CompareMethod::Exact)
        } else if self.token {
            Some(CompareMethod::Token)
        } else if self.numeric {
            Some(CompareMethod::Numeric)
        } else {
            None
        };

        let formatting = if self.normal {
            Some(OutputMode::Normal)
        } else if self.side_by_side {
            Some(OutputMode::SideBySide)
        } else if self.caseno {
            Some(OutputMode::CasenoList)
        } else if self.brief {
            Some(OutputMode::Brief)
        } else {
            None
        };

        OptionOverrides {
            pattern: self.pattern.clone(),
            one_case: self.one_case.then_some(true),
            method,
            epsilon: self.epsilon,
            equal_header: flag_pair(self.equal_header, self.equal_body),
            formatting,
            summary: self.summary.then_some(true),
            suppress: self.suppress.then_some(true),
            color: flag_pair(self.color, self.no_color),
            wrap_width: self.width,
        }
    }
}

/// `Some(true)` / `Some(false)` for a `--x` / `--no-x` style pair
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn resolve_options(cli: &Cli) -> Result<Options, CaseDiffError> {
    let flags = cli.overrides();
    let env = OptionOverrides::from_process_env()?;
    let loaded = load_config(cli.config.as_deref())?;
    if let Some(path) = &loaded.path {
        debug!("Config file {} (exists: {})", path.display(), loaded.exists);
    }
    Options::layered(&[&flags, &env, &loaded.overrides])
}

/// Write a `casediff: ...` line to stderr. These are part of the program's
/// output and bypass the log filter.
fn diagnostic(message: impl Display) {
    let stderr = std::io::stderr();
    let mut err = stderr.lock();
    // Nowhere left to report a failing stderr
    let _ = writeln!(err, "casediff: {message}");
}

fn run(cli: &Cli) -> Result<i32, CaseDiffError> {
    let options = resolve_options(cli)?;
    debug!("Resolved options: {:?}", options);

    let session = CaseDiffSession::new(&options)?;
    let report = session.compare_files(&cli.lhs_file, &cli.rhs_file)?;

    for advisory in &report.advisories {
        diagnostic(advisory);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in session.render(&report) {
        writeln!(out, "{line}").map_err(|e| CaseDiffError::io("<stdout>", e))?;
    }
    out.flush().map_err(|e| CaseDiffError::io("<stdout>", e))?;

    Ok(report.exit_code())
}

fn main() {
    // Logs go to stderr so stdout carries only the diff
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            diagnostic(&e);
            std::process::exit(e.exit_code());
        }
    }
}
