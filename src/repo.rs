mod practice_sessions;
mod practices;

pub use practice_sessions::{PracticeSessionFields, PracticeSessionRepo};
pub use practices::{PracticeFields, PracticeRepo};

/// Largest page a client may request
pub const MAX_PAGE_SIZE: i64 = 2000;

/// A zero-based page of rows, ordered by id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    size: i64,
    offset: i64,
}

impl Page {
    pub fn new(number: i64, size: i64) -> Result<Self, String> {
        if number < 0 {
            return Err("Page number cannot be negative".into());
        }
        if size < 1 || size > MAX_PAGE_SIZE {
            return Err(format!("Page size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        let offset = number
            .checked_mul(size)
            .ok_or_else(|| "Page number too large".to_string())?;

        Ok(Self { size, offset })
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}
