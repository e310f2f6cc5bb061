//! Result alias and logging helpers

use crate::error::VerbatimError;

/// Standard Result type for verbatim operations
pub type Result<T> = std::result::Result<T, VerbatimError>;

pub trait ResultExt<T> {
    /// Log a failure at a level matching its severity and drop it. Used where
    /// one failing input must not stop a batch, e.g. checking many files.
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self) -> Option<T> {
        let err = match self {
            Ok(value) => return Some(value),
            Err(err) => err,
        };
        if err.is_recoverable() {
            tracing::warn!(kind = ?err.kind(), "skipping: {err}");
        } else {
            tracing::error!(kind = ?err.kind(), "{err}");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_continue() {
        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.log_and_continue(), Some(3));

        let parse: Result<u8> = Err(VerbatimError::parse_error("unexpected `}`", 2, 1));
        assert_eq!(parse.log_and_continue(), None);

        let anchor: Result<u8> = Err(VerbatimError::anchor_not_found("`{`", "BlockStmt#2"));
        assert_eq!(anchor.log_and_continue(), None);
    }
}
