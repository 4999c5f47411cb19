//! Content-derived identity for actions
//!
//! Report sheets carry no identifier, so an action is recognised across days
//! by hashing its normalized descriptive fields. Any edit to those fields,
//! including a typo fix in the work description, yields a new action.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use super::text::fold;
use super::types::ActionFields;

/// Separator between fields in the hashed payload
const KEY_SEPARATOR: &str = "||";

/// Stable fingerprint of an action (lowercase hex SHA-1)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

impl ActionKey {
    /// Derive the key from the seven descriptive fields
    pub fn from_fields(fields: &ActionFields) -> Self {
        Self::from_parts(fields.values())
    }

    /// Derive the key from field values given in key order
    pub fn from_parts(parts: [&str; 7]) -> Self {
        let payload = parts
            .iter()
            .map(|p| fold(p))
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR);
        Self(sha1_hex(payload.as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint of the uploaded workbook bytes, recorded in run metadata
pub fn source_fingerprint(bytes: &[u8]) -> String {
    sha1_hex(bytes)
}

pub(crate) fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
