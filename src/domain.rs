mod practice_result;
mod problem_link;
mod problem_name;

pub use practice_result::PracticeResult;
pub use problem_link::ProblemLink;
pub use problem_name::ProblemName;

/// Maximum length, in chars, of the varchar practice columns
const MAX_TEXT_LEN: usize = 255;
