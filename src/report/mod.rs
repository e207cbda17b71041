use std::io::Write;

pub mod json;

/// Everything the process hands back: one stdout body and one exit code.
/// The body is raw bytes so forwarded worker output is written unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutcome {
    pub body: Vec<u8>,
    pub exit_code: i32,
}

impl CliOutcome {
    pub fn new(body: impl Into<Vec<u8>>, exit_code: i32) -> Self {
        Self {
            body: body.into(),
            exit_code,
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(body, 0)
    }

    pub fn failed(body: impl Into<Vec<u8>>) -> Self {
        Self::new(body, 1)
    }
}

/// Writes the body to stdout and returns the exit code to use.
pub fn emit(outcome: &CliOutcome) -> i32 {
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = stdout
        .write_all(&outcome.body)
        .and_then(|_| stdout.flush())
    {
        tracing::error!(error = %err, "failed to write result");
        return 1;
    }
    outcome.exit_code
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
