pub mod case_reader;
pub mod diff;
pub mod equality;
pub mod highlight;
pub mod render;
pub mod session;
pub mod words;

pub use case_reader::CaseReader;
pub use diff::{make_diff, DiffRecord, DiffSide};
pub use equality::{cases_equal, equal_lines_numeric, equal_lines_word, equal_numeric, lines_equal};
pub use highlight::{format_numeric, format_text, format_token, Style, StyledText};
pub use render::{DiffPrinter, Layout};
pub use session::{Advisory, CaseDiffSession, Report};
pub use words::{WordToken, Words};
