//! Vote ledger with integrated duplicate-vote prevention
//!
//! The ledger owns the two persistent collections (teams, voter records) and
//! enforces the central invariant of the system:
//! 1. At most one successful vote per fingerprint
//! 2. Tally increment and voter-record insert commit as one unit
//! 3. Full reset restores the canonical roster and the id counter
//! 4. Sum of team tallies always equals the number of voter records

use crate::config::RosterConfig;
use crate::identity::{self, Fingerprint};
use crate::storage::Snapshot;
use crate::types::{
    FullResults, ResetReport, Team, TeamStanding, VoteReceipt, VoterIdentity, VoterRecord,
};
use crate::{Result, storage_error};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Result of a cast-vote attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CastResult {
    /// Vote applied - tally incremented and voter record written
    Accepted(VoteReceipt),

    /// Blocked because this fingerprint has already voted
    AlreadyVoted { existing: VoterRecord },

    /// Blocked because the referenced team does not exist
    UnknownTeam { team_id: u32 },
}

impl CastResult {
    /// Whether the vote was applied
    pub fn is_accepted(&self) -> bool {
        matches!(self, CastResult::Accepted(_))
    }

    /// Human-readable outcome message for the transport boundary
    pub fn message(&self) -> String {
        match self {
            CastResult::Accepted(receipt) => {
                format!("Voted for {} (team {}).", receipt.team_name, receipt.team_id)
            }
            CastResult::AlreadyVoted { existing } => {
                format!("Already voted at {}.", existing.voted_at)
            }
            CastResult::UnknownTeam { team_id } => {
                format!("Team {team_id} does not exist.")
            }
        }
    }
}

/// Mutable ledger state guarded by a single lock
///
/// The write lock makes every check-then-write sequence atomic: two racing
/// casts for the same fingerprint can never both pass the uniqueness check.
struct LedgerState {
    teams: Vec<Team>,
    voters: HashMap<Fingerprint, VoterRecord>,
    /// Monotonic team id generator, owned by the ledger rather than any
    /// storage-engine autoincrement. Reset to 1 by `reset_all`.
    next_team_id: u32,
}

impl LedgerState {
    fn empty() -> Self {
        Self {
            teams: Vec::new(),
            voters: HashMap::new(),
            next_team_id: 1,
        }
    }

    /// Replace the roster with the canonical seeded set
    fn seed_roster(&mut self, roster: &RosterConfig) {
        self.teams.clear();
        self.next_team_id = 1;
        for n in 1..=roster.team_count {
            let id = self.next_team_id;
            self.next_team_id += 1;
            self.teams.push(Team::new(id, format!("{} {}", roster.name_prefix, n)));
        }
    }

    fn standings(&self) -> Vec<TeamStanding> {
        let mut teams = self.teams.clone();
        // Stable sort: insertion order is the tie-break
        teams.sort_by(|a, b| b.votes.cmp(&a.votes));
        teams
            .into_iter()
            .map(|team| TeamStanding {
                name: team.name,
                votes: team.votes,
            })
            .collect()
    }
}

/// The vote ledger service
///
/// All mutating operations (`cast_vote`, `reset_all`, `restore`) serialize on
/// the write lock; reads share the read lock. Lock poisoning surfaces as a
/// storage error rather than a panic.
pub struct VoteLedger {
    state: RwLock<LedgerState>,
    roster: RosterConfig,
}

impl VoteLedger {
    /// Create a ledger seeded with the canonical roster
    pub fn new(roster: RosterConfig) -> Self {
        let mut state = LedgerState::empty();
        state.seed_roster(&roster);

        tracing::info!(
            "📋 Roster seeded: {} teams (\"{} 1\"..\"{} {}\")",
            roster.team_count,
            roster.name_prefix,
            roster.name_prefix,
            roster.team_count
        );

        Self {
            state: RwLock::new(state),
            roster,
        }
    }

    /// Create for testing with the default roster
    pub fn for_testing() -> Self {
        Self::new(RosterConfig::for_testing())
    }

    /// All teams in id order; empty only if the roster was never seeded
    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger read lock poisoned"))?;

        Ok(state.teams.clone())
    }

    /// True iff no voter record exists for this fingerprint. Read-only.
    pub fn check_eligibility(&self, fingerprint: &Fingerprint) -> Result<bool> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger read lock poisoned"))?;

        Ok(!state.voters.contains_key(fingerprint))
    }

    /// Eligibility check from a raw identity pair (validates, then hashes)
    pub fn can_vote(&self, student_id: &str, name: &str) -> Result<bool> {
        require_field(student_id, "student_id")?;
        require_field(name, "name")?;

        self.check_eligibility(&identity::fingerprint(student_id, name))
    }

    /// Cast a vote for a team on behalf of an identity pair
    ///
    /// The uniqueness check, tally increment, and voter-record insert all
    /// happen under one write lock, so concurrent casts with the same
    /// fingerprint produce exactly one `Accepted` and one `AlreadyVoted`.
    pub fn cast_vote(&self, team_id: u32, student_id: &str, name: &str) -> Result<CastResult> {
        require_field(student_id, "student_id")?;
        require_field(name, "name")?;

        let fingerprint = identity::fingerprint(student_id, name);

        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Ledger write lock poisoned"))?;

        if let Some(existing) = state.voters.get(&fingerprint) {
            tracing::info!("🚫 Duplicate vote rejected: voter={}", fingerprint.short());
            return Ok(CastResult::AlreadyVoted {
                existing: existing.clone(),
            });
        }

        let Some(team) = state.teams.iter_mut().find(|team| team.id == team_id) else {
            tracing::info!(
                "🚫 Vote for unknown team rejected: team={}, voter={}",
                team_id,
                fingerprint.short()
            );
            return Ok(CastResult::UnknownTeam { team_id });
        };

        team.votes += 1;
        let team_name = team.name.clone();
        let cast_at = Utc::now();

        state.voters.insert(
            fingerprint.clone(),
            VoterRecord {
                fingerprint: fingerprint.clone(),
                student_id: student_id.to_string(),
                name: name.to_string(),
                voted_at: cast_at,
            },
        );

        tracing::info!(
            "🗳️  Vote accepted: team={} ({}), voter={}",
            team_id,
            team_name,
            fingerprint.short()
        );

        Ok(CastResult::Accepted(VoteReceipt {
            receipt_id: Uuid::new_v4(),
            team_id,
            team_name,
            cast_at,
        }))
    }

    /// Public results: teams ranked by votes descending, ties in roster order
    pub fn results(&self) -> Result<Vec<TeamStanding>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger read lock poisoned"))?;

        Ok(state.standings())
    }

    /// Administrative view: ranked teams plus plaintext voter identities
    ///
    /// Exposes who voted. Access control belongs to the transport boundary;
    /// this layer only produces the view.
    pub fn full_results(&self) -> Result<FullResults> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger read lock poisoned"))?;

        let mut records: Vec<&VoterRecord> = state.voters.values().collect();
        records.sort_by_key(|record| record.voted_at);

        Ok(FullResults {
            teams: state.standings(),
            voters: records
                .into_iter()
                .map(|record| VoterIdentity {
                    student_id: record.student_id.clone(),
                    name: record.name.clone(),
                })
                .collect(),
        })
    }

    /// Erase everything and reseed the canonical roster
    ///
    /// Destructive and irreversible from within the system: all voter records
    /// are deleted (every fingerprint becomes eligible again), the id counter
    /// restarts at 1, and the roster comes back with zero votes. Holds the
    /// write lock for the full duration, so no other operation interleaves.
    pub fn reset_all(&self) -> Result<ResetReport> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Ledger write lock poisoned"))?;

        let voters_cleared = state.voters.len() as u64;
        state.voters.clear();
        state.seed_roster(&self.roster);

        let report = ResetReport {
            teams_seeded: self.roster.team_count,
            voters_cleared,
            reset_at: Utc::now(),
        };

        tracing::info!(
            "♻️  Ledger reset: {} voters cleared, {} teams reseeded",
            report.voters_cleared,
            report.teams_seeded
        );

        Ok(report)
    }

    /// Point-in-time copy of the full ledger state for persistence
    pub fn snapshot(&self) -> Result<Snapshot> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger read lock poisoned"))?;

        let mut voters: Vec<VoterRecord> = state.voters.values().cloned().collect();
        voters.sort_by_key(|record| record.voted_at);

        Ok(Snapshot::new(state.teams.clone(), voters))
    }

    /// Replace the live state with a previously saved snapshot
    ///
    /// The id counter resumes after the highest team id in the snapshot.
    pub fn restore(&self, snapshot: Snapshot) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Ledger write lock poisoned"))?;

        let next_team_id = snapshot
            .teams
            .iter()
            .map(|team| team.id)
            .max()
            .unwrap_or(0)
            + 1;

        state.teams = snapshot.teams;
        state.voters = snapshot
            .voters
            .into_iter()
            .map(|record| (record.fingerprint.clone(), record))
            .collect();
        state.next_team_id = next_team_id;

        tracing::info!(
            "💾 Ledger restored: {} teams, {} voters",
            state.teams.len(),
            state.voters.len()
        );

        Ok(())
    }

    /// Get statistics about the ledger
    pub fn get_stats(&self) -> Result<LedgerStats> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger read lock poisoned"))?;

        Ok(LedgerStats {
            team_count: state.teams.len(),
            voter_count: state.voters.len(),
            total_votes: state.teams.iter().map(|team| team.votes).sum(),
        })
    }
}

/// Statistics about the ledger
///
/// `total_votes == voter_count` holds after any sequence of operations;
/// a mismatch means the store was tampered with externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub team_count: usize,
    pub voter_count: usize,
    pub total_votes: u64,
}

/// Reject empty or whitespace-only identity fields before hashing
fn require_field(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::validation(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_roster_seeding() {
        let ledger = VoteLedger::for_testing();
        let teams = ledger.list_teams().unwrap();

        assert_eq!(teams.len(), 11);
        for (index, team) in teams.iter().enumerate() {
            assert_eq!(team.id, index as u32 + 1);
            assert_eq!(team.name, format!("Team {}", index + 1));
            assert_eq!(team.votes, 0);
        }
    }

    #[test]
    fn test_cast_and_duplicate() {
        let ledger = VoteLedger::for_testing();

        let first = ledger.cast_vote(3, "S1", "Alice").unwrap();
        assert!(first.is_accepted());

        // Identical identity pair is blocked, tally unchanged
        let second = ledger.cast_vote(3, "S1", "Alice").unwrap();
        match second {
            CastResult::AlreadyVoted { existing } => {
                assert_eq!(existing.student_id, "S1");
                assert_eq!(existing.name, "Alice");
            }
            other => panic!("expected AlreadyVoted, got {other:?}"),
        }

        let teams = ledger.list_teams().unwrap();
        assert_eq!(teams[2].votes, 1);

        // Same voter cannot switch teams either
        let third = ledger.cast_vote(5, "S1", "Alice").unwrap();
        assert!(matches!(third, CastResult::AlreadyVoted { .. }));
        assert_eq!(ledger.get_stats().unwrap().total_votes, 1);
    }

    #[test]
    fn test_unknown_team_rejected_without_record() {
        let ledger = VoteLedger::for_testing();

        let result = ledger.cast_vote(99, "S1", "Alice").unwrap();
        assert_eq!(result, CastResult::UnknownTeam { team_id: 99 });
        assert!(result.message().contains("99"));

        // No voter record was written, so the voter can still vote
        assert!(ledger.can_vote("S1", "Alice").unwrap());
        assert_eq!(ledger.get_stats().unwrap().voter_count, 0);
    }

    #[test]
    fn test_eligibility_flips_after_vote() {
        let ledger = VoteLedger::for_testing();
        let fp = identity::fingerprint("S1", "Alice");

        assert!(ledger.check_eligibility(&fp).unwrap());
        ledger.cast_vote(1, "S1", "Alice").unwrap();
        assert!(!ledger.check_eligibility(&fp).unwrap());
        assert!(!ledger.can_vote("S1", "Alice").unwrap());
    }

    #[test]
    fn test_input_validation_before_hashing() {
        let ledger = VoteLedger::for_testing();

        let err = ledger.cast_vote(1, "", "Alice").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field } if field == "student_id"));

        let err = ledger.cast_vote(1, "S1", "   ").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field } if field == "name"));

        assert!(ledger.can_vote("", "").is_err());
        assert_eq!(ledger.get_stats().unwrap().voter_count, 0);
    }

    #[test]
    fn test_results_ordering_with_ties() {
        let ledger = VoteLedger::for_testing();

        // Team 1: 3 votes, Team 2: 5 votes, Team 3: 0, Team 4: 3 votes
        for i in 0..3 {
            ledger.cast_vote(1, &format!("A{i}"), "voter").unwrap();
        }
        for i in 0..5 {
            ledger.cast_vote(2, &format!("B{i}"), "voter").unwrap();
        }
        for i in 0..3 {
            ledger.cast_vote(4, &format!("D{i}"), "voter").unwrap();
        }

        let standings = ledger.results().unwrap();
        assert_eq!(standings[0].name, "Team 2");
        assert_eq!(standings[0].votes, 5);
        // Tied at 3 votes: roster order breaks the tie
        assert_eq!(standings[1].name, "Team 1");
        assert_eq!(standings[2].name, "Team 4");
        // Zero-vote teams keep roster order at the bottom
        assert_eq!(standings[3].name, "Team 3");
        assert_eq!(standings.last().unwrap().votes, 0);
    }

    #[test]
    fn test_full_results_exposes_identities() {
        let ledger = VoteLedger::for_testing();
        ledger.cast_vote(1, "S1", "Alice").unwrap();
        ledger.cast_vote(2, "S2", "Bob").unwrap();

        let full = ledger.full_results().unwrap();
        assert_eq!(full.voters.len(), 2);
        assert!(full.voters.iter().any(|v| v.student_id == "S1" && v.name == "Alice"));
        assert!(full.voters.iter().any(|v| v.student_id == "S2" && v.name == "Bob"));
    }

    #[test]
    fn test_reset_completeness() {
        let ledger = VoteLedger::for_testing();
        ledger.cast_vote(1, "S1", "Alice").unwrap();
        ledger.cast_vote(2, "S2", "Bob").unwrap();

        let report = ledger.reset_all().unwrap();
        assert_eq!(report.voters_cleared, 2);
        assert_eq!(report.teams_seeded, 11);

        let teams = ledger.list_teams().unwrap();
        assert_eq!(teams.len(), 11);
        assert!(teams.iter().all(|team| team.votes == 0));
        assert_eq!(teams[0].id, 1);

        // Previously ineligible fingerprints are eligible again
        assert!(ledger.can_vote("S1", "Alice").unwrap());
        assert!(ledger.full_results().unwrap().voters.is_empty());

        // Repeated resets keep ids starting at 1
        ledger.reset_all().unwrap();
        assert_eq!(ledger.list_teams().unwrap()[0].id, 1);
    }

    #[test]
    fn test_tally_consistency() {
        let ledger = VoteLedger::for_testing();

        for i in 0u32..20 {
            ledger
                .cast_vote((i % 11) + 1, &format!("S{i}"), "voter")
                .unwrap();
        }
        // Duplicates and unknown teams must not disturb the invariant
        ledger.cast_vote(1, "S0", "voter").unwrap();
        ledger.cast_vote(42, "fresh", "voter").unwrap();

        let stats = ledger.get_stats().unwrap();
        assert_eq!(stats.total_votes, stats.voter_count as u64);
        assert_eq!(stats.total_votes, 20);
    }
}
