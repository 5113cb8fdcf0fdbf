use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// States in the election lifecycle.
///
/// Transitions only ever move forwards: `NotStarted` → `Active` → `Closed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    /// Created, but not yet opened for voting.
    NotStarted,
    /// Open: ballots may be cast.
    Active,
    /// Closed for good; ready to tally.
    Closed,
}

impl From<ElectionStatus> for Bson {
    fn from(status: ElectionStatus) -> Self {
        to_bson(&status).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialise_as_snake_case_strings() {
        // Database filters match on these exact strings.
        assert_eq!(
            Bson::from(ElectionStatus::NotStarted),
            Bson::String("not_started".to_string())
        );
        assert_eq!(
            Bson::from(ElectionStatus::Active),
            Bson::String("active".to_string())
        );
        assert_eq!(
            Bson::from(ElectionStatus::Closed),
            Bson::String("closed".to_string())
        );
    }
}
