use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope code signalling success. Any other value is a business failure
/// and `data` must not be trusted.
pub const CODE_OK: i64 = 200;

/// Envelope code the backend uses for operations on unknown identifiers.
pub const CODE_NOT_FOUND: i64 = 404;

/// The `{code, message, data}` wrapper every non-binary response carries.
///
/// `data` stays an untyped [`Value`] here; the gateway unwraps it into the
/// concrete response type only after checking `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}
