mod practice;
mod practice_session;

pub use practice::Practice;
pub use practice_session::PracticeSession;
