//! DB-compatible (e.g. de/serialisable) types, and the decision logic that
//! operates on them.

mod election;
pub use election::{Candidate, Election, ElectionMetadata, Position};

mod official;
pub use official::Official;

mod vote;
pub use vote::Vote;
