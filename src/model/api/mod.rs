//! Request and response types for the HTTP API.

mod ballot;
pub use ballot::{BallotReceipt, BallotSpec, Selection};

mod election;
pub use election::{
    CandidateDescription, CandidateSpec, ElectionDescription, ElectionSpec, ElectionSummary,
    PositionDescription, PositionSpec, MIN_CANDIDATES, MIN_POSITIONS,
};

mod official;
pub use official::{OfficialIdentity, OfficialSpec};

mod results;
pub use results::{CandidateResult, ElectionResults, PositionResult};
