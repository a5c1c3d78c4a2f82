//! Conversation record model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::message::{Turn, TurnRole};
use crate::problem::{ProblemIdentity, ProblemInfo};

/// Full persisted mapping, ordered by key so iteration is deterministic.
pub type ConversationMap = BTreeMap<ProblemIdentity, ConversationRecord>;

/// The transcript kept for one problem.
///
/// Turns are append-only: nothing in the public API removes or reorders them,
/// and a system turn can only ever sit at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Info captured when the record was created.
    pub problem_info: ProblemInfo,
    turns: Vec<Turn>,
}

impl ConversationRecord {
    /// Creates a record seeded with a system turn and a welcome turn.
    pub fn seeded(problem_info: ProblemInfo, system_prompt: String, welcome: String) -> Self {
        Self {
            problem_info,
            turns: vec![Turn::system(system_prompt), Turn::assistant(welcome)],
        }
    }

    /// Rebuilds a record from stored parts.
    ///
    /// System turns found after index 0 are demoted to assistant turns so the
    /// ordering invariant holds for data written by older builds.
    pub fn from_parts(problem_info: ProblemInfo, turns: Vec<Turn>) -> Self {
        let turns = turns
            .into_iter()
            .enumerate()
            .map(|(index, turn)| {
                if index > 0 && turn.is_system() {
                    Turn::new(TurnRole::Assistant, turn.content)
                } else {
                    turn
                }
            })
            .collect();
        Self {
            problem_info,
            turns,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn system_turn(&self) -> Option<&Turn> {
        self.turns.first().filter(|turn| turn.is_system())
    }

    /// Turns shown to the user when the transcript is replayed.
    pub fn visible_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|turn| !turn.is_system())
    }

    /// Appends a user or assistant turn.
    ///
    /// A system turn is only accepted as the very first turn; later ones are
    /// stored with the assistant role.
    pub fn append(&mut self, turn: Turn) {
        if turn.is_system() && !self.turns.is_empty() {
            self.turns.push(Turn::new(TurnRole::Assistant, turn.content));
        } else {
            self.turns.push(turn);
        }
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
