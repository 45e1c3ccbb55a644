// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game configuration

use crate::handicap::max_handicap;
use crate::rules::RuleSet;
use crate::vertex::BoardSize;
use crate::GameError;
use serde::{Deserialize, Serialize};

/// Who is sitting behind a colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    #[default]
    Human,
    /// Moves arrive from an external engine through [`crate::engine::PlayerBackend`]
    Computer,
}

/// Everything needed to set up a new game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: BoardSize,
    /// Points added to White's score
    pub komi: f32,
    /// Number of handicap stones for Black; 0 for an even game
    pub handicap: u8,
    pub rules: RuleSet,
    pub black_player: PlayerKind,
    pub white_player: PlayerKind,
    /// Marking a group dead also marks the friendly groups it shares empty space with
    pub mark_dead_stones_intelligently: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BoardSize::default(),
            komi: default_komi(),
            handicap: 0,
            rules: RuleSet::default(),
            black_player: PlayerKind::Human,
            white_player: PlayerKind::Human,
            mark_dead_stones_intelligently: true,
        }
    }
}

fn default_komi() -> f32 {
    7.5
}

impl GameConfig {
    /// Default configuration for a board size
    pub fn with_size(board_size: BoardSize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    /// Reject settings the engine cannot play with
    pub fn validate(&self) -> Result<(), GameError> {
        if !self.komi.is_finite() || (self.komi * 2.0).fract() != 0.0 {
            return Err(GameError::InvalidConfiguration(format!(
                "komi must be a multiple of 0.5, got {}",
                self.komi
            )));
        }
        let max = max_handicap(self.board_size);
        if self.handicap == 1 || self.handicap > max {
            return Err(GameError::InvalidConfiguration(format!(
                "handicap must be 0 or between 2 and {} on {}, got {}",
                max, self.board_size, self.handicap
            )));
        }
        Ok(())
    }

    /// Kind of player for a colour
    pub fn player(&self, color: crate::Color) -> PlayerKind {
        match color {
            crate::Color::Black => self.black_player,
            crate::Color::White => self.white_player,
        }
    }
}
