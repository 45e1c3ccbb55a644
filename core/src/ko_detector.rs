// SPDX-License-Identifier: MIT OR Apache-2.0

//! Position history and repetition detection

use crate::rules::KoRule;
use crate::Color;
use std::collections::HashMap;

/// One entry per board position: the stone configuration and who moves next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PositionRecord {
    hash: u64,
    to_move: Color,
}

/// Tracks every board position of the game so repetitions can be refused
#[derive(Debug, Clone, Default)]
pub struct KoDetector {
    /// Indexed by board position; entry 0 is the starting position
    positions: Vec<PositionRecord>,
    /// Number of positions in `positions` with a given hash
    occurrences: HashMap<u64, usize>,
}

impl KoDetector {
    /// Start a history with the initial position
    pub fn new(initial_hash: u64, to_move: Color) -> Self {
        let mut detector = Self::default();
        detector.push(initial_hash, to_move);
        detector
    }

    /// Number of positions recorded
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no position has been recorded
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Record the position reached by the next move
    pub fn push(&mut self, hash: u64, to_move: Color) {
        self.positions.push(PositionRecord { hash, to_move });
        *self.occurrences.entry(hash).or_insert(0) += 1;
    }

    /// Forget every position after board position `index`
    pub fn truncate(&mut self, index: usize) {
        while self.positions.len() > index + 1 {
            if let Some(record) = self.positions.pop() {
                if let Some(count) = self.occurrences.get_mut(&record.hash) {
                    *count -= 1;
                    if *count == 0 {
                        self.occurrences.remove(&record.hash);
                    }
                }
            }
        }
    }

    /// Overwrite who moves next at the last recorded position
    pub fn set_last_to_move(&mut self, to_move: Color) {
        if let Some(last) = self.positions.last_mut() {
            last.to_move = to_move;
        }
    }

    /// Whether a move made from board position `current` that produces
    /// `next_hash`, after which `next_to_move` has the turn, repeats an
    /// earlier position in the sense of `rule`.
    pub fn repeats(&self, rule: KoRule, current: usize, next_hash: u64, next_to_move: Color) -> bool {
        let history = &self.positions[..=current.min(self.positions.len().saturating_sub(1))];
        match rule {
            KoRule::SimpleKo => current
                .checked_sub(1)
                .and_then(|previous| history.get(previous))
                .is_some_and(|record| record.hash == next_hash),
            KoRule::PositionalSuperko => {
                if history.len() == self.positions.len() {
                    self.occurrences.contains_key(&next_hash)
                } else {
                    history.iter().any(|record| record.hash == next_hash)
                }
            }
            KoRule::SituationalSuperko => history
                .iter()
                .any(|record| record.hash == next_hash && record.to_move == next_to_move),
        }
    }
}
