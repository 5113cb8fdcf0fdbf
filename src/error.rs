use rocket::{http::Status, response::Responder, Request};
use thiserror::Error;

use crate::model::common::{CandidateId, PositionId};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while serving a request.
///
/// The variants follow the error taxonomy of the service: validation errors
/// (caught before any database access), not-found errors, authorization
/// errors, state errors (the operation is invalid for the election's current
/// lifecycle status), and conflicts (constraint violations detected by the
/// database).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Not authorized: {0}")]
    NotAuthorized(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("an election must have at least 3 positions")]
    TooFewPositions,
    #[error("position '{0}' must have at least 2 candidates")]
    TooFewCandidates(String),
    #[error("election is already active")]
    AlreadyActive,
    #[error("election is already closed")]
    AlreadyClosed,
    #[error("invalid election status for this operation: {0}")]
    InvalidStatus(&'static str),
    #[error("election must be closed before tallying results")]
    ElectionNotClosed,
    #[error("ballot must include at least one selection")]
    BallotEmpty,
    #[error("election is not open for voting")]
    ElectionNotActive,
    #[error("position {0} does not belong to this election")]
    PositionNotInElection(PositionId),
    #[error("position {0} appears more than once in the ballot")]
    DuplicatePositionPick(PositionId),
    #[error("candidate {candidate} does not belong to position {position}")]
    CandidateNotInPosition {
        position: PositionId,
        candidate: CandidateId,
    },
    #[error("voter has already voted for this position")]
    DuplicateVote,
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'o> {
        warn!("{self}");
        Err(match self {
            Self::Db(_) | Self::Internal(_) => Status::InternalServerError,
            Self::BadRequest(_)
            | Self::TooFewPositions
            | Self::TooFewCandidates(_)
            | Self::BallotEmpty
            | Self::PositionNotInElection(_)
            | Self::DuplicatePositionPick(_)
            | Self::CandidateNotInPosition { .. } => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::NotAuthorized(_) => Status::Forbidden,
            Self::AlreadyActive
            | Self::AlreadyClosed
            | Self::InvalidStatus(_)
            | Self::ElectionNotClosed
            | Self::ElectionNotActive
            | Self::Conflict(_)
            | Self::DuplicateVote => Status::Conflict,
        })
    }
}
