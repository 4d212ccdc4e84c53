//! # Core Types for the Team Voting Backend
//!
//! This module defines the persistent entities owned by the ledger and the
//! value types returned from its operations.
//!
//! ## Type Categories
//!
//! ### Persistent Entities
//! - [`Team`]: a roster entry with a stable id and a vote tally
//! - [`VoterRecord`]: one record per successful vote, keyed by fingerprint
//!
//! ### Operation Results
//! - [`VoteReceipt`]: confirmation of an accepted vote
//! - [`TeamStanding`]: one row of the public results view
//! - [`FullResults`]: administrative view including voter identities
//! - [`ResetReport`]: summary of a completed full reset
//!
//! ## Privacy Note
//!
//! [`VoterRecord`] retains the plaintext `student_id` and `name` next to the
//! fingerprint because the administrative full-results view displays them.
//! The store is therefore pseudonymous rather than anonymous; access control
//! for that view is the transport boundary's responsibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Fingerprint;

/// A team that can receive votes
///
/// Teams are created only when the roster is seeded (initially or by a full
/// reset). Ids are assigned sequentially from 1 by the ledger's own counter
/// and are stable for the lifetime of the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable sequential id, starting at 1
    pub id: u32,

    /// Display name ("Team {n}" for seeded rosters)
    pub name: String,

    /// Non-negative vote tally, starts at 0
    pub votes: u64,
}

impl Team {
    /// Create a fresh team with zero votes
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            votes: 0,
        }
    }
}

/// Record of one successful vote, keyed by voter fingerprint
///
/// Created exactly once per unique fingerprint at the moment a vote is
/// accepted, never mutated, and deleted only by a full reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    /// Unique fingerprint derived from the submitted identity pair
    pub fingerprint: Fingerprint,

    /// Plaintext student id, retained for the administrative view
    pub student_id: String,

    /// Plaintext name, retained for the administrative view
    pub name: String,

    /// When the vote was accepted
    pub voted_at: DateTime<Utc>,
}

/// Confirmation returned for an accepted vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Unique receipt identifier
    pub receipt_id: Uuid,

    /// Id of the team the vote was applied to
    pub team_id: u32,

    /// Name of the team the vote was applied to
    pub team_name: String,

    /// When the vote was accepted
    pub cast_at: DateTime<Utc>,
}

/// One row of the public results view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub name: String,
    pub votes: u64,
}

/// Plaintext identity pair as shown in the administrative view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterIdentity {
    pub student_id: String,
    pub name: String,
}

/// Administrative view: ranked teams plus plaintext voter identities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullResults {
    pub teams: Vec<TeamStanding>,
    pub voters: Vec<VoterIdentity>,
}

/// Summary of a completed full reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    /// Number of teams in the reseeded roster
    pub teams_seeded: u32,

    /// Number of voter records that were erased
    pub voters_cleared: u64,

    /// When the reset completed
    pub reset_at: DateTime<Utc>,
}
