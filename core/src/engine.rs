// SPDX-License-Identifier: MIT OR Apache-2.0

//! Player backends that produce moves for a game

use crate::game::{Game, GameState, MoveRequest};
use crate::{GameError, GameEvent};

/// Source of moves for one side of a game
pub trait PlayerBackend {
    /// Get the next move from this player for the current board position
    fn next_move(&mut self, game: &Game) -> MoveRequest;
}

/// Ask `backend` for a move and apply it.
///
/// A backend may resign for its own side even when that side is configured
/// as a computer player. Returns `Ok(None)` when the game has ended and no
/// move was requested.
pub fn play_turn<B: PlayerBackend + ?Sized>(
    game: &mut Game,
    backend: &mut B,
) -> Result<Option<Vec<GameEvent>>, GameError> {
    if matches!(game.state(), GameState::Ended(_)) && game.is_at_last_position() {
        return Ok(None);
    }
    let request = backend.next_move(game);
    tracing::debug!(color = %game.next_move_color(), ?request, "Backend move");
    let events = match request {
        MoveRequest::Resign => game.concede()?,
        request => game.apply(request)?,
    };
    Ok(Some(events))
}

/// Backend that always passes
#[derive(Debug, Default, Clone, Copy)]
pub struct PassingPlayer;

impl PlayerBackend for PassingPlayer {
    fn next_move(&mut self, _game: &Game) -> MoveRequest {
        MoveRequest::Pass
    }
}

/// Backend that replays a fixed list of requests, then passes
#[derive(Debug, Default, Clone)]
pub struct ScriptedPlayer {
    requests: std::collections::VecDeque<MoveRequest>,
}

impl ScriptedPlayer {
    pub fn new(requests: impl IntoIterator<Item = MoveRequest>) -> Self {
        Self {
            requests: requests.into_iter().collect(),
        }
    }
}

impl PlayerBackend for ScriptedPlayer {
    fn next_move(&mut self, _game: &Game) -> MoveRequest {
        self.requests.pop_front().unwrap_or(MoveRequest::Pass)
    }
}
