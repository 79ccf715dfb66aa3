use thiserror::Error;

/// Unified error type for document store operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Document not found by the given identifier
    #[error("Document not found")]
    NotFound,

    /// Unique index violation
    #[error("Unique index violation")]
    UniqueViolation {
        /// The conflicting key/value pairs, as reported by the store (if extractable)
        key_value: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Duplicate-key error code reported by MongoDB (E11000)
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Convert from mongodb::error::Error using the driver's error categorization
impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == DUPLICATE_KEY_CODE => {
                DbError::UniqueViolation {
                    key_value: extract_dup_key(&write_err.message),
                    message: write_err.message.clone(),
                }
            }
            ErrorKind::Command(command_err) if command_err.code == DUPLICATE_KEY_CODE => DbError::UniqueViolation {
                key_value: extract_dup_key(&command_err.message),
                message: command_err.message.clone(),
            },
            // All other driver errors are non-recoverable - convert to anyhow
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Extract the conflicting key/value pairs from a MongoDB duplicate-key message.
///
/// E11000 messages look like:
/// `E11000 duplicate key error collection: pokedex.pokemon index: name_1 dup key: { name: "pikachu" }`
fn extract_dup_key(message: &str) -> Option<String> {
    let start = message.find("dup key: ")? + "dup key: ".len();
    let rest = &message[start..];
    let end = rest.rfind('}')?;
    Some(rest[..=end].trim().to_string())
}

/// Type alias for document store operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_dup_key_pairs_from_driver_message() {
        let message = r#"E11000 duplicate key error collection: pokedex.pokemon index: name_1 dup key: { name: "pikachu" }"#;
        assert_eq!(extract_dup_key(message), Some(r#"{ name: "pikachu" }"#.to_string()));
    }

    #[test]
    fn dup_key_extraction_tolerates_unexpected_shapes() {
        assert_eq!(extract_dup_key("E11000 duplicate key error"), None);
        assert_eq!(extract_dup_key("dup key: no braces here"), None);
    }
}
