//! # Finalization Tally
//!
//! Computes the per-module vote standings for a course's voting round
//! and selects the winning syllabus.
//!
//! ## Determinism
//!
//! Vote counts can legitimately collide, so the ordering must be total
//! and stable: standings sort by distinct-student vote count descending,
//! then by module `order_index` ascending. The first-authored module
//! wins every tie, and re-running the tally over the same rows always
//! produces the same selection.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use courseflow_core::{ModuleId, StudentId, REQUIRED_TOPICS};

/// A module eligible in the voting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateModule {
    /// The module's identifier.
    pub id: ModuleId,
    /// The module's dense, zero-based authoring position.
    pub order_index: u32,
}

/// One stored (student, module) vote fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVote {
    /// The voting student.
    pub student: StudentId,
    /// The module voted for.
    pub module: ModuleId,
}

/// A module's standing after the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStanding {
    /// The module's identifier.
    pub module_id: ModuleId,
    /// The module's authoring position (the tie-break key).
    pub order_index: u32,
    /// Number of distinct students who voted for the module.
    pub votes: usize,
}

/// The selection finalization applies: winners in standing order,
/// everything else rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationOutcome {
    /// Modules to mark selected, best standing first.
    pub selected: Vec<ModuleId>,
    /// Modules to mark unselected.
    pub rejected: Vec<ModuleId>,
}

/// Tally the voting round: distinct voting students per module, sorted
/// by count descending then `order_index` ascending.
///
/// Vote rows referencing modules outside `modules` are ignored (they
/// can only appear if a module was deleted mid-round; the tally is over
/// the candidate set as it stands at finalization). Duplicate
/// (student, module) rows count once.
pub fn tally_standings(modules: &[CandidateModule], votes: &[CastVote]) -> Vec<ModuleStanding> {
    let candidates: HashMap<ModuleId, u32> =
        modules.iter().map(|m| (m.id, m.order_index)).collect();

    let mut distinct: HashSet<(StudentId, ModuleId)> = HashSet::with_capacity(votes.len());
    let mut counts: HashMap<ModuleId, usize> = HashMap::with_capacity(modules.len());
    for vote in votes {
        if !candidates.contains_key(&vote.module) {
            continue;
        }
        if distinct.insert((vote.student, vote.module)) {
            *counts.entry(vote.module).or_insert(0) += 1;
        }
    }

    let mut standings: Vec<ModuleStanding> = modules
        .iter()
        .map(|m| ModuleStanding {
            module_id: m.id,
            order_index: m.order_index,
            votes: counts.get(&m.id).copied().unwrap_or(0),
        })
        .collect();

    standings.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then(a.order_index.cmp(&b.order_index))
    });
    standings
}

/// Split standings into the top-`REQUIRED_TOPICS` winners and the rest.
///
/// Assumes `standings` is already in tally order. Courses reach voting
/// with at least `MIN_TOPICS_FOR_COURSE >= REQUIRED_TOPICS` modules, so
/// the winner set is normally full; a shorter candidate list selects
/// everything.
pub fn select_top(standings: &[ModuleStanding]) -> FinalizationOutcome {
    let cut = REQUIRED_TOPICS.min(standings.len());
    FinalizationOutcome {
        selected: standings[..cut].iter().map(|s| s.module_id).collect(),
        rejected: standings[cut..].iter().map(|s| s.module_id).collect(),
    }
}
