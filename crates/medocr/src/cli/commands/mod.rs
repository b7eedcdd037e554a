//! Command implementations.

pub mod health;
pub mod pdf;
pub mod scan;

use medocr_engine::ScanError;
use medocr_protocol::ErrorCode;

use crate::output::Output;

/// A failure a command reports through the response envelope.
#[derive(Debug)]
pub struct Failure {
    pub code: ErrorCode,
    pub message: String,
}

impl Failure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Print the failure and give the `Ok(false)` exit signal.
    pub fn report(&self, output: &Output) -> anyhow::Result<bool> {
        output.print_error(self.code, &self.message);
        Ok(false)
    }
}

impl From<ScanError> for Failure {
    fn from(e: ScanError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}
