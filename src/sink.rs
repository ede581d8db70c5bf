//! The physical database driver is an external collaborator (spec.md §1);
//! the kernel only needs a seam to hand statements to it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink rejected statement {index}: {message}")]
    Rejected { index: usize, message: String },
}

/// A SQL-executing sink. Production callers back this with a real driver;
/// the kernel's own tests back it with an in-memory fake.
pub trait Sink {
    fn execute(&mut self, statement: &str) -> Result<(), SinkError>;
}
