use serde::{Deserialize, Serialize};

/// A district official, registered by username.
///
/// Authentication happens upstream of this service; the record only has to
/// exist for the official to own elections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    /// Unique username, also used as the document ID.
    #[serde(rename = "_id")]
    pub username: String,
    /// Display name.
    pub name: String,
}
