// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goban Core - Go board position engine
//!
//! This crate provides:
//! - the coordinate system and the point grid of a Go board
//! - incremental maintenance of stone groups, empty areas and liberties
//! - move validation, captures, ko and superko, passes and resignation
//! - board position history that can be stepped through without replaying
//! - territory and area scoring with dead stone and seki marking

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod config;
pub mod engine;
pub mod game;
pub mod handicap;
pub mod ko_detector;
pub mod region;
pub mod rules;
pub mod scoring;
pub mod shared;
pub mod vertex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use board::Board;
pub use config::{GameConfig, PlayerKind};
pub use game::{Game, GameEndReason, GameState, Move, MoveKind, MoveRequest};
pub use region::{Region, RegionChanges, RegionId};
pub use rules::{KoRule, RuleSet, RulesPreset, ScoringSystem};
pub use scoring::{GameResult, MarkedGroup, Score, StoneStatus, TerritoryColor};
pub use shared::SharedGame;
pub use vertex::{BoardSize, Direction, Vertex};

/// Player color in a Go game (Black or White)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Black player (traditionally goes first)
    Black,
    /// White player
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// Why a play was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IllegalMoveReason {
    /// The intersection already holds a stone
    #[error("intersection is occupied")]
    Occupied,
    /// The stone would have no liberties and capture nothing
    #[error("move would be suicide")]
    Suicide,
}

/// Errors that can occur during game play
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The label or coordinates do not name an intersection
    #[error("Invalid vertex: {0}")]
    InvalidVertex(String),

    /// The board dimension is not supported
    #[error("Invalid board size: {0}")]
    InvalidBoardSize(u8),

    /// The play breaks a basic rule
    #[error("Illegal move at {vertex}: {reason}")]
    IllegalMove {
        vertex: Vertex,
        reason: IllegalMoveReason,
    },

    /// The play would repeat an earlier position
    #[error("Move at {vertex} violates the ko rule ({rule:?})")]
    KoViolation { vertex: Vertex, rule: KoRule },

    /// The operation is not possible in the current game state
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(&'static str),

    /// Komi or handicap settings are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Dead or seki marking was requested on an empty intersection
    #[error("No stone group at {0}")]
    NoStoneGroup(Vertex),
}

/// Changes reported by game operations, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A stone was placed
    StonePlayed {
        move_number: usize,
        color: Color,
        vertex: Vertex,
        /// Region bookkeeping caused by the stone and its captures
        regions: RegionChanges,
    },
    /// Stones left the board
    StonesCaptured {
        /// Color of the removed stones
        color: Color,
        vertices: Vec<Vertex>,
    },
    /// A player passed
    Passed { move_number: usize, color: Color },
    /// Moves after the current board position were thrown away
    MovesDiscarded { count: usize },
    /// The board now shows another position of the game
    BoardPositionChanged { from: usize, to: usize },
    /// The game has ended
    GameEnded { reason: GameEndReason },
    /// A resignation was taken back
    ResignationReverted,
    /// Play continues after the game ended by passes
    PlayResumed,
    /// The player to move was changed without a move
    NextMoveColorSwitched { color: Color },
    /// The board was rebuilt with another dimension
    BoardSizeChanged { size: BoardSize },
    ScoringModeEntered,
    ScoringModeExited,
    /// Dead or seki marks changed
    StoneGroupsMarked { groups: Vec<MarkedGroup> },
    /// The score was recomputed
    ScoreChanged { score: Score },
}
