use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::db::Official;

/// A request to register a district official.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficialSpec {
    pub username: String,
    pub name: String,
}

impl OfficialSpec {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::BadRequest("username is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::BadRequest("name is required".to_string()));
        }
        Ok(())
    }
}

impl From<OfficialSpec> for Official {
    fn from(spec: OfficialSpec) -> Self {
        Self {
            username: spec.username,
            name: spec.name,
        }
    }
}

/// The requester identity attached to lifecycle and tally requests.
///
/// Authentication is out of scope for this service; callers are trusted to
/// have established the identity upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficialIdentity {
    pub official_id: String,
}
