//! Tool error types

use thiserror::Error;

/// Infrastructure faults raised during tool execution
///
/// These abort the run. Model-correctable problems are reported through
/// `ToolResult::error` instead.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Store query failed: {0}")]
    Store(eyre::Report),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message() {
        let err = ToolError::Store(eyre::eyre!("connection refused"));
        assert!(err.to_string().contains("connection refused"));
    }
}
