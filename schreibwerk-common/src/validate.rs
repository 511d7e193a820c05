use thiserror::Error;

/// A required field was absent from a write request body.
///
/// Carries the wire name of the first missing field; required fields are
/// always checked in their declared order so the reported field is
/// deterministic.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
#[error("Missing `{0}` in request body")]
pub struct MissingFieldError(pub &'static str);

impl MissingFieldError {
    #[must_use]
    pub fn field(self) -> &'static str {
        self.0
    }
}
