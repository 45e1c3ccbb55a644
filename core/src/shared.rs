// SPDX-License-Identifier: MIT OR Apache-2.0

//! A game shared between threads

use crate::game::Game;
use crate::{GameConfig, GameError};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to a game behind a read-write lock.
///
/// Every operation on the game takes the write lock for its whole duration,
/// so other threads never observe a half-applied move.
#[derive(Debug, Clone)]
pub struct SharedGame {
    inner: Arc<RwLock<Game>>,
}

impl SharedGame {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Ok(Self::from_game(Game::new(config)?))
    }

    pub fn from_game(game: Game) -> Self {
        Self {
            inner: Arc::new(RwLock::new(game)),
        }
    }

    /// Run `f` with shared access
    pub fn read<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access
    pub fn write<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Copy of the game as it is now
    pub fn snapshot(&self) -> Game {
        self.inner.read().clone()
    }
}
