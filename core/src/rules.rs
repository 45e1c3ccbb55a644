// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule sets and move validation

use crate::board::Board;
use crate::ko_detector::KoDetector;
use crate::region::RegionId;
use crate::{Color, GameError, IllegalMoveReason, Vertex};
use serde::{Deserialize, Serialize};

/// Which earlier positions a move may not recreate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KoRule {
    /// The position before the opponent's last move
    SimpleKo,
    /// Any earlier position
    PositionalSuperko,
    /// Any earlier position with the same player to move
    SituationalSuperko,
}

/// How the final score is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSystem {
    /// Stones on the board plus surrounded territory
    AreaScoring,
    /// Surrounded territory plus prisoners
    TerritoryScoring,
}

/// How many consecutive passes end the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeAndDeathSettlingRule {
    TwoPasses,
    ThreePasses,
}

impl LifeAndDeathSettlingRule {
    /// Consecutive passes required to end the game
    pub fn passes(self) -> usize {
        match self {
            LifeAndDeathSettlingRule::TwoPasses => 2,
            LifeAndDeathSettlingRule::ThreePasses => 3,
        }
    }
}

/// Who moves after play is resumed to settle life and death disputes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeResolutionRule {
    /// Players keep alternating
    AlternatingPlay,
    /// Either player may make several moves in a row
    NonAlternatingPlay,
}

/// Meaning of four consecutive passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FourPassesRule {
    /// The game ends for good; play cannot be resumed
    FourPassesEndTheGame,
    /// Only the life and death settling rule decides
    FourPassesHaveNoSpecialMeaning,
}

/// Named rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesPreset {
    Chinese,
    Japanese,
    Aga,
    NewZealand,
}

/// The complete rule configuration of a game.
///
/// Every combination of options is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub ko_rule: KoRule,
    pub scoring_system: ScoringSystem,
    pub life_and_death_settling_rule: LifeAndDeathSettlingRule,
    pub dispute_resolution_rule: DisputeResolutionRule,
    pub four_passes_rule: FourPassesRule,
    /// Multi-stone suicide removes the player's own group instead of being refused
    pub allow_suicide: bool,
}

impl RuleSet {
    /// Rules for a preset
    pub fn preset(preset: RulesPreset) -> Self {
        match preset {
            RulesPreset::Chinese => Self {
                ko_rule: KoRule::PositionalSuperko,
                scoring_system: ScoringSystem::AreaScoring,
                life_and_death_settling_rule: LifeAndDeathSettlingRule::TwoPasses,
                dispute_resolution_rule: DisputeResolutionRule::AlternatingPlay,
                four_passes_rule: FourPassesRule::FourPassesHaveNoSpecialMeaning,
                allow_suicide: false,
            },
            RulesPreset::Japanese => Self {
                ko_rule: KoRule::SimpleKo,
                scoring_system: ScoringSystem::TerritoryScoring,
                life_and_death_settling_rule: LifeAndDeathSettlingRule::TwoPasses,
                dispute_resolution_rule: DisputeResolutionRule::NonAlternatingPlay,
                four_passes_rule: FourPassesRule::FourPassesHaveNoSpecialMeaning,
                allow_suicide: false,
            },
            RulesPreset::Aga => Self {
                ko_rule: KoRule::SituationalSuperko,
                scoring_system: ScoringSystem::AreaScoring,
                life_and_death_settling_rule: LifeAndDeathSettlingRule::TwoPasses,
                dispute_resolution_rule: DisputeResolutionRule::AlternatingPlay,
                four_passes_rule: FourPassesRule::FourPassesEndTheGame,
                allow_suicide: false,
            },
            RulesPreset::NewZealand => Self {
                ko_rule: KoRule::SituationalSuperko,
                scoring_system: ScoringSystem::AreaScoring,
                life_and_death_settling_rule: LifeAndDeathSettlingRule::TwoPasses,
                dispute_resolution_rule: DisputeResolutionRule::AlternatingPlay,
                four_passes_rule: FourPassesRule::FourPassesHaveNoSpecialMeaning,
                allow_suicide: true,
            },
        }
    }

    /// Every combination of the enumerated options
    pub fn all_combinations() -> Vec<RuleSet> {
        let mut combinations = Vec::new();
        for ko_rule in [KoRule::SimpleKo, KoRule::PositionalSuperko, KoRule::SituationalSuperko] {
            for scoring_system in [ScoringSystem::AreaScoring, ScoringSystem::TerritoryScoring] {
                for life_and_death_settling_rule in
                    [LifeAndDeathSettlingRule::TwoPasses, LifeAndDeathSettlingRule::ThreePasses]
                {
                    for dispute_resolution_rule in [
                        DisputeResolutionRule::AlternatingPlay,
                        DisputeResolutionRule::NonAlternatingPlay,
                    ] {
                        for four_passes_rule in [
                            FourPassesRule::FourPassesEndTheGame,
                            FourPassesRule::FourPassesHaveNoSpecialMeaning,
                        ] {
                            for allow_suicide in [false, true] {
                                combinations.push(RuleSet {
                                    ko_rule,
                                    scoring_system,
                                    life_and_death_settling_rule,
                                    dispute_resolution_rule,
                                    four_passes_rule,
                                    allow_suicide,
                                });
                            }
                        }
                    }
                }
            }
        }
        combinations
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::preset(RulesPreset::Chinese)
    }
}

/// What a legal play will do to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayPreview {
    /// Opponent groups left without liberties
    pub captures: Vec<RegionId>,
    /// The player's own group will be removed (only with `allow_suicide`)
    pub suicide: bool,
    /// Position hash once the move and its captures are applied
    pub resulting_hash: u64,
}

/// Decides whether a play is legal without touching the board
pub struct RuleValidator<'a> {
    board: &'a Board,
    rules: &'a RuleSet,
    history: &'a KoDetector,
    /// Board position the move is made from
    position: usize,
}

impl<'a> RuleValidator<'a> {
    /// Create a validator for moves made from board position `position`
    pub fn new(board: &'a Board, rules: &'a RuleSet, history: &'a KoDetector, position: usize) -> Self {
        Self {
            board,
            rules,
            history,
            position,
        }
    }

    /// Check a play by `color` at `vertex`
    pub fn check_play(&self, vertex: Vertex, color: Color) -> Result<PlayPreview, GameError> {
        let index = self.board.index_of(vertex);
        if self.board.color_at(index).is_some() {
            return Err(GameError::IllegalMove {
                vertex,
                reason: IllegalMoveReason::Occupied,
            });
        }

        let mut captures: Vec<RegionId> = Vec::new();
        let mut friendly: Vec<RegionId> = Vec::new();
        let mut has_liberty = false;

        for n in self.board.neighbors_of(index) {
            let id = self.board.region_id_at(n);
            match self.board.color_at(n) {
                None => has_liberty = true,
                Some(c) if c == color => {
                    // the group keeps a liberty other than the point being filled
                    if self.board.region_by_id(id).liberties() > 1 {
                        has_liberty = true;
                    }
                    if !friendly.contains(&id) {
                        friendly.push(id);
                    }
                }
                Some(_) => {
                    if self.board.region_by_id(id).liberties() == 1 && !captures.contains(&id) {
                        captures.push(id);
                    }
                }
            }
        }

        let mut resulting_hash = self.board.position_hash() ^ self.board.zobrist_key(index, color);
        for &id in &captures {
            for &point in &self.board.region_by_id(id).points {
                resulting_hash ^= self.board.zobrist_key(point, color.opposite());
            }
        }

        let suicide = captures.is_empty() && !has_liberty;
        if suicide {
            if !self.rules.allow_suicide || friendly.is_empty() {
                return Err(GameError::IllegalMove {
                    vertex,
                    reason: IllegalMoveReason::Suicide,
                });
            }
            // the new stone and every group it joins leave the board
            resulting_hash ^= self.board.zobrist_key(index, color);
            for &id in &friendly {
                for &point in &self.board.region_by_id(id).points {
                    resulting_hash ^= self.board.zobrist_key(point, color);
                }
            }
        }

        if self
            .history
            .repeats(self.rules.ko_rule, self.position, resulting_hash, color.opposite())
        {
            tracing::debug!(%vertex, rule = ?self.rules.ko_rule, "Ko violation detected");
            return Err(GameError::KoViolation {
                vertex,
                rule: self.rules.ko_rule,
            });
        }

        Ok(PlayPreview {
            captures,
            suicide,
            resulting_hash,
        })
    }
}
