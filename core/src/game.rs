// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game state machine: moves, passes, resignation, position history and scoring mode

use crate::board::Board;
use crate::config::{GameConfig, PlayerKind};
use crate::handicap::handicap_vertices;
use crate::ko_detector::KoDetector;
use crate::rules::{DisputeResolutionRule, FourPassesRule, LifeAndDeathSettlingRule, RuleSet, RuleValidator};
use crate::scoring::{GameResult, Score, ScoreInputs, ScoringSession, StoneStatus, TerritoryColor};
use crate::{BoardSize, Color, GameError, GameEvent, Vertex};
use serde::{Deserialize, Serialize};

/// Why a game is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    TwoPasses,
    ThreePasses,
    /// Four consecutive passes under a rule set where they are final
    FourPasses,
    /// The given color resigned
    Resigned(Color),
}

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No move has been played yet
    NotStarted,
    InProgress,
    Ended(GameEndReason),
}

/// What a move did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Play {
        vertex: Vertex,
        /// Stones removed by the move; the player's own stones for a suicide
        captured: Vec<Vertex>,
        suicide: bool,
    },
    Pass,
}

/// A move recorded in the game history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub color: Color,
    pub kind: MoveKind,
}

impl Move {
    pub fn is_pass(&self) -> bool {
        matches!(self.kind, MoveKind::Pass)
    }

    /// Placed stone, if any
    pub fn vertex(&self) -> Option<Vertex> {
        match self.kind {
            MoveKind::Play { vertex, .. } => Some(vertex),
            MoveKind::Pass => None,
        }
    }

    /// Stones this move took off the board
    pub fn captured(&self) -> &[Vertex] {
        match &self.kind {
            MoveKind::Play { captured, .. } => captured,
            MoveKind::Pass => &[],
        }
    }

    /// Player credited with the captured stones
    fn capturer(&self) -> Color {
        match self.kind {
            MoveKind::Play { suicide: true, .. } => self.color.opposite(),
            _ => self.color,
        }
    }
}

/// A move requested by a player, before it is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRequest {
    Play(Vertex),
    Pass,
    Resign,
}

/// A Go game: the board, its history and the rules that govern it
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    handicap: Vec<Vertex>,
    moves: Vec<Move>,
    /// Board position shown on `board`; position `i` follows move `i`
    current: usize,
    state: GameState,
    state_before_resignation: Option<GameState>,
    /// Player to move at the last board position
    next_color: Color,
    /// Number of moves when play was last resumed
    resumed_at: Option<usize>,
    history: KoDetector,
    scoring: Option<ScoringSession>,
}

impl Game {
    /// Set up a new game, placing handicap stones if any
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut board = Board::new(config.board_size);
        let handicap = handicap_vertices(config.board_size, config.handicap)?;
        for &vertex in &handicap {
            let index = board.index_of(vertex);
            board.set_color(index, Some(Color::Black));
        }
        let first_color = if handicap.is_empty() {
            Color::Black
        } else {
            Color::White
        };
        let history = KoDetector::new(board.position_hash(), first_color);

        tracing::info!(
            size = %config.board_size,
            komi = config.komi,
            handicap = config.handicap,
            rules = ?config.rules,
            "New game"
        );

        Ok(Self {
            config,
            board,
            handicap,
            moves: Vec::new(),
            current: 0,
            state: GameState::NotStarted,
            state_before_resignation: None,
            next_color: first_color,
            resumed_at: None,
            history,
            scoring: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.config.rules
    }

    /// The board at the current board position
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Every move of the game, including those after the current board position
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn handicap_vertices(&self) -> &[Vertex] {
        &self.handicap
    }

    /// Whether play was resumed after the game ended by passes
    pub fn is_resumed(&self) -> bool {
        self.resumed_at.is_some()
    }

    pub fn is_scoring(&self) -> bool {
        self.scoring.is_some()
    }

    /// Dead, seki and territory marks while in scoring mode
    pub fn scoring_session(&self) -> Option<&ScoringSession> {
        self.scoring.as_ref()
    }

    /// Number of board positions, the starting position included
    pub fn board_position_count(&self) -> usize {
        self.moves.len() + 1
    }

    pub fn current_board_position(&self) -> usize {
        self.current
    }

    pub fn is_at_last_position(&self) -> bool {
        self.current == self.moves.len()
    }

    /// Player whose move follows the current board position
    pub fn next_move_color(&self) -> Color {
        match self.moves.get(self.current) {
            Some(next) => next.color,
            None => self.next_color,
        }
    }

    /// Stones captured by `color` up to the current board position
    pub fn captures(&self, color: Color) -> usize {
        self.moves[..self.current]
            .iter()
            .filter(|m| m.capturer() == color)
            .map(|m| m.captured().len())
            .sum()
    }

    /// Consecutive passes at the end of the move list
    pub fn consecutive_passes(&self) -> usize {
        self.moves.iter().rev().take_while(|m| m.is_pass()).count()
    }

    /// Outcome once the game has ended, scored on the last board position
    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            GameState::Ended(GameEndReason::Resigned(color)) => Some(GameResult::Resignation {
                winner: color.opposite(),
            }),
            GameState::Ended(_) if self.is_at_last_position() => Some(self.current_score().result()),
            GameState::Ended(_) => {
                let mut last = self.clone();
                last.scoring = None;
                last.set_current_board_position(self.moves.len()).ok()?;
                Some(last.current_score().result())
            }
            _ => None,
        }
    }

    /// Rebuild the game on a board of another size; only before the first move
    pub fn change_board_size(&mut self, size: BoardSize) -> Result<Vec<GameEvent>, GameError> {
        if self.state != GameState::NotStarted || !self.moves.is_empty() {
            return Err(GameError::InvalidStateTransition(
                "board size can only change before the first move",
            ));
        }
        let mut config = self.config.clone();
        config.board_size = size;
        *self = Game::new(config)?;
        Ok(vec![GameEvent::BoardSizeChanged { size }])
    }

    /// Dispatch a move request from a player
    pub fn apply(&mut self, request: MoveRequest) -> Result<Vec<GameEvent>, GameError> {
        match request {
            MoveRequest::Play(vertex) => self.play(vertex),
            MoveRequest::Pass => self.pass(),
            MoveRequest::Resign => self.resign(),
        }
    }

    /// Place a stone for the player to move.
    ///
    /// Made from an earlier board position, the move replaces every later move.
    /// On error the game is unchanged.
    pub fn play(&mut self, vertex: Vertex) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_on_board(vertex)?;
        self.ensure_can_move()?;
        let color = self.next_move_color();
        let preview = RuleValidator::new(&self.board, &self.config.rules, &self.history, self.current)
            .check_play(vertex, color)?;

        let mut events = self.discard_future_moves();

        let index = self.board.index_of(vertex);
        let mut regions = self.board.set_color(index, Some(color));
        let mut removed = Vec::new();
        for &id in &preview.captures {
            removed.extend(self.board.clear_region(id, &mut regions));
        }
        let captured_color = if preview.suicide {
            let own = self.board.region_id_at(index);
            removed = self.board.clear_region(own, &mut regions);
            color
        } else {
            color.opposite()
        };
        debug_assert_eq!(self.board.position_hash(), preview.resulting_hash);

        let captured: Vec<Vertex> = removed.iter().map(|&i| self.board.vertex_of(i)).collect();
        tracing::debug!(
            %color,
            %vertex,
            captured = captured.len(),
            suicide = preview.suicide,
            "Stone played"
        );

        self.moves.push(Move {
            color,
            kind: MoveKind::Play {
                vertex,
                captured: captured.clone(),
                suicide: preview.suicide,
            },
        });
        self.current = self.moves.len();
        self.next_color = color.opposite();
        self.history.push(self.board.position_hash(), self.next_color);
        self.state = GameState::InProgress;

        events.push(GameEvent::StonePlayed {
            move_number: self.moves.len(),
            color,
            vertex,
            regions,
        });
        if !captured.is_empty() {
            events.push(GameEvent::StonesCaptured {
                color: captured_color,
                vertices: captured,
            });
        }
        Ok(events)
    }

    /// Pass for the player to move; may end the game
    pub fn pass(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_can_move()?;
        let color = self.next_move_color();
        let mut events = self.discard_future_moves();

        self.moves.push(Move {
            color,
            kind: MoveKind::Pass,
        });
        self.current = self.moves.len();
        self.next_color = color.opposite();
        self.history.push(self.board.position_hash(), self.next_color);
        self.state = GameState::InProgress;
        tracing::debug!(%color, passes = self.consecutive_passes(), "Pass");

        events.push(GameEvent::Passed {
            move_number: self.moves.len(),
            color,
        });
        if let Some(reason) = self.pass_end_reason() {
            tracing::info!(?reason, "Game ended by passes");
            self.state = GameState::Ended(reason);
            events.push(GameEvent::GameEnded { reason });
        }
        Ok(events)
    }

    /// The player to move gives up; only at the last board position.
    ///
    /// Refused for a computer player, which resigns through
    /// [`play_turn`](crate::engine::play_turn) instead.
    pub fn resign(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.config.player(self.next_color) == PlayerKind::Computer {
            return Err(GameError::InvalidStateTransition("only a human player can resign"));
        }
        self.concede()
    }

    /// Resignation by whichever player is to move
    pub(crate) fn concede(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.scoring.is_some() {
            return Err(GameError::InvalidStateTransition("cannot resign while scoring"));
        }
        if matches!(self.state, GameState::Ended(_)) {
            return Err(GameError::InvalidStateTransition("the game has already ended"));
        }
        if !self.is_at_last_position() {
            return Err(GameError::InvalidStateTransition(
                "resignation is only possible at the last board position",
            ));
        }
        let color = self.next_color;
        self.state_before_resignation = Some(self.state);
        let reason = GameEndReason::Resigned(color);
        self.state = GameState::Ended(reason);
        tracing::info!(%color, "Resigned");
        Ok(vec![GameEvent::GameEnded { reason }])
    }

    /// Take back a resignation, restoring the state it interrupted
    pub fn revert_resignation(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if !matches!(self.state, GameState::Ended(GameEndReason::Resigned(_))) {
            return Err(GameError::InvalidStateTransition("the game was not resigned"));
        }
        let fallback = if self.moves.is_empty() {
            GameState::NotStarted
        } else {
            GameState::InProgress
        };
        self.state = self.state_before_resignation.take().unwrap_or(fallback);
        tracing::info!("Resignation reverted");
        Ok(vec![GameEvent::ResignationReverted])
    }

    /// Continue playing after the game ended by passes, to settle disputes
    pub fn resume_play(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.scoring.is_some() {
            return Err(GameError::InvalidStateTransition("cannot resume play while scoring"));
        }
        match self.state {
            GameState::Ended(GameEndReason::TwoPasses | GameEndReason::ThreePasses) => {}
            GameState::Ended(_) => {
                return Err(GameError::InvalidStateTransition("the game cannot be resumed"));
            }
            _ => return Err(GameError::InvalidStateTransition("the game has not ended")),
        }
        if !self.is_at_last_position() {
            return Err(GameError::InvalidStateTransition(
                "play can only be resumed at the last board position",
            ));
        }
        self.resumed_at = Some(self.moves.len());
        self.state = GameState::InProgress;
        tracing::info!(moves = self.moves.len(), "Play resumed");
        Ok(vec![GameEvent::PlayResumed])
    }

    /// Give the move to the other player; only in resumed non-alternating play
    pub fn switch_next_move_color(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.config.rules.dispute_resolution_rule != DisputeResolutionRule::NonAlternatingPlay
            || self.resumed_at.is_none()
        {
            return Err(GameError::InvalidStateTransition(
                "the player to move can only be switched in resumed non-alternating play",
            ));
        }
        if self.state != GameState::InProgress || self.scoring.is_some() || !self.is_at_last_position() {
            return Err(GameError::InvalidStateTransition(
                "the player to move cannot be switched now",
            ));
        }
        self.next_color = self.next_color.opposite();
        self.history.set_last_to_move(self.next_color);
        Ok(vec![GameEvent::NextMoveColorSwitched {
            color: self.next_color,
        }])
    }

    /// Step through the history without changing it
    pub fn set_current_board_position(&mut self, position: usize) -> Result<Vec<GameEvent>, GameError> {
        if self.scoring.is_some() {
            return Err(GameError::InvalidStateTransition(
                "board position cannot change while scoring",
            ));
        }
        if position > self.moves.len() {
            return Err(GameError::InvalidStateTransition("no such board position"));
        }
        let from = self.current;
        while self.current > position {
            undo(&mut self.board, &self.moves[self.current - 1]);
            self.current -= 1;
        }
        while self.current < position {
            redo(&mut self.board, &self.moves[self.current]);
            self.current += 1;
        }
        if from == position {
            return Ok(Vec::new());
        }
        tracing::debug!(from, to = position, "Board position changed");
        Ok(vec![GameEvent::BoardPositionChanged { from, to: position }])
    }

    /// Freeze the board and start marking dead stones
    pub fn enter_scoring_mode(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.scoring.is_some() {
            return Err(GameError::InvalidStateTransition("scoring mode is already active"));
        }
        if matches!(self.state, GameState::Ended(GameEndReason::Resigned(_))) {
            return Err(GameError::InvalidStateTransition("a resigned game is not scored"));
        }
        let inputs = self.score_inputs();
        let mut session = ScoringSession::new(&self.board);
        let score = session.evaluate(&self.board, &inputs);
        self.scoring = Some(session);
        tracing::info!(margin = score.margin(), "Scoring mode entered");
        Ok(vec![
            GameEvent::ScoringModeEntered,
            GameEvent::ScoreChanged { score },
        ])
    }

    /// Leave scoring mode, dropping every mark
    pub fn exit_scoring_mode(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.scoring.take().is_none() {
            return Err(GameError::InvalidStateTransition("scoring mode is not active"));
        }
        tracing::info!("Scoring mode exited");
        Ok(vec![GameEvent::ScoringModeExited])
    }

    /// Toggle the group at `vertex` between alive and dead
    pub fn toggle_dead_at(&mut self, vertex: Vertex) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_on_board(vertex)?;
        let inputs = self.score_inputs();
        let intelligent = self.config.mark_dead_stones_intelligently;
        let session = self
            .scoring
            .as_mut()
            .ok_or(GameError::InvalidStateTransition("scoring mode is not active"))?;
        let groups = session.toggle_dead(&self.board, vertex, intelligent)?;
        let score = session.evaluate(&self.board, &inputs);
        tracing::debug!(%vertex, groups = groups.len(), "Dead stones toggled");
        Ok(vec![
            GameEvent::StoneGroupsMarked { groups },
            GameEvent::ScoreChanged { score },
        ])
    }

    /// Toggle the group at `vertex` between alive and seki
    pub fn toggle_seki_at(&mut self, vertex: Vertex) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_on_board(vertex)?;
        let inputs = self.score_inputs();
        let session = self
            .scoring
            .as_mut()
            .ok_or(GameError::InvalidStateTransition("scoring mode is not active"))?;
        let groups = session.toggle_seki(&self.board, vertex)?;
        let score = session.evaluate(&self.board, &inputs);
        tracing::debug!(%vertex, groups = groups.len(), "Seki toggled");
        Ok(vec![
            GameEvent::StoneGroupsMarked { groups },
            GameEvent::ScoreChanged { score },
        ])
    }

    /// Status of the stone at `vertex`; every stone is alive outside scoring mode
    pub fn stone_status_at(&self, vertex: Vertex) -> Option<StoneStatus> {
        if !self.board.contains(vertex) {
            return None;
        }
        match &self.scoring {
            Some(session) => session.status_at(&self.board, vertex),
            None => self.board.get(vertex).map(|_| StoneStatus::Alive),
        }
    }

    /// Territory owner of `vertex` in scoring mode
    pub fn territory_at(&self, vertex: Vertex) -> Option<TerritoryColor> {
        if !self.board.contains(vertex) {
            return None;
        }
        self.scoring
            .as_ref()
            .and_then(|session| session.territory_at(&self.board, vertex))
    }

    /// Score of the current board position with the current marks
    pub fn current_score(&self) -> Score {
        let mut session = self
            .scoring
            .clone()
            .unwrap_or_else(|| ScoringSession::new(&self.board));
        session.evaluate(&self.board, &self.score_inputs())
    }

    fn score_inputs(&self) -> ScoreInputs {
        ScoreInputs {
            scoring_system: self.config.rules.scoring_system,
            komi: self.config.komi,
            handicap: self.config.handicap,
            captured_by_black: self.captures(Color::Black),
            captured_by_white: self.captures(Color::White),
        }
    }

    fn ensure_on_board(&self, vertex: Vertex) -> Result<(), GameError> {
        if self.board.contains(vertex) {
            Ok(())
        } else {
            Err(GameError::InvalidVertex(format!(
                "{} is not on a {} board",
                vertex,
                self.board.size()
            )))
        }
    }

    fn ensure_can_move(&self) -> Result<(), GameError> {
        if self.scoring.is_some() {
            return Err(GameError::InvalidStateTransition("moves cannot be made while scoring"));
        }
        match self.state {
            GameState::Ended(GameEndReason::Resigned(_)) => Err(GameError::InvalidStateTransition(
                "the game has ended by resignation",
            )),
            GameState::Ended(_) if self.is_at_last_position() => {
                Err(GameError::InvalidStateTransition("the game has ended"))
            }
            _ => Ok(()),
        }
    }

    /// Drop the moves after the current board position
    fn discard_future_moves(&mut self) -> Vec<GameEvent> {
        if self.is_at_last_position() {
            return Vec::new();
        }
        let count = self.moves.len() - self.current;
        self.next_color = self.moves[self.current].color;
        self.moves.truncate(self.current);
        self.history.truncate(self.current);
        self.history.set_last_to_move(self.next_color);
        if self.resumed_at.is_some_and(|at| at > self.current) {
            self.resumed_at = None;
        }
        self.state = if self.moves.is_empty() {
            GameState::NotStarted
        } else {
            GameState::InProgress
        };
        tracing::debug!(count, "Moves discarded");
        vec![GameEvent::MovesDiscarded { count }]
    }

    fn pass_end_reason(&self) -> Option<GameEndReason> {
        let trailing = self.consecutive_passes();
        if self.config.rules.four_passes_rule == FourPassesRule::FourPassesEndTheGame && trailing >= 4 {
            return Some(GameEndReason::FourPasses);
        }
        let since_resume = match self.resumed_at {
            Some(at) => self.moves[at..].iter().rev().take_while(|m| m.is_pass()).count(),
            None => trailing,
        };
        let rule = self.config.rules.life_and_death_settling_rule;
        if since_resume >= rule.passes() {
            Some(match rule {
                LifeAndDeathSettlingRule::TwoPasses => GameEndReason::TwoPasses,
                LifeAndDeathSettlingRule::ThreePasses => GameEndReason::ThreePasses,
            })
        } else {
            None
        }
    }
}

/// Take a recorded move back off the board
fn undo(board: &mut Board, mv: &Move) {
    if let MoveKind::Play {
        vertex,
        captured,
        suicide,
    } = &mv.kind
    {
        let captured_color = if *suicide { mv.color } else { mv.color.opposite() };
        for &v in captured {
            let index = board.index_of(v);
            board.set_color(index, Some(captured_color));
        }
        let index = board.index_of(*vertex);
        board.set_color(index, None);
    }
}

/// Put a recorded move back on the board
fn redo(board: &mut Board, mv: &Move) {
    if let MoveKind::Play { vertex, captured, .. } = &mv.kind {
        let index = board.index_of(*vertex);
        let mut changes = board.set_color(index, Some(mv.color));
        let mut groups = Vec::new();
        for &v in captured {
            let id = board.region_id_at(board.index_of(v));
            if !groups.contains(&id) {
                groups.push(id);
            }
        }
        for id in groups {
            board.clear_region(id, &mut changes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{KoRule, RulesPreset};

    fn game(size: u8) -> Game {
        Game::new(GameConfig::with_size(BoardSize::new(size).unwrap())).unwrap()
    }

    fn v(game: &Game, label: &str) -> Vertex {
        Vertex::from_label(label, game.board().size()).unwrap()
    }

    fn play_all(game: &mut Game, labels: &[&str]) {
        for label in labels {
            let vertex = v(game, label);
            game.play(vertex).unwrap();
        }
    }

    #[test]
    fn first_move_starts_the_game() {
        let mut game = game(9);
        assert_eq!(game.state(), GameState::NotStarted);
        assert_eq!(game.next_move_color(), Color::Black);
        let e5 = v(&game, "E5");
        let events = game.play(e5).unwrap();
        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(game.next_move_color(), Color::White);
        assert!(matches!(events[0], GameEvent::StonePlayed { move_number: 1, color: Color::Black, .. }));
    }

    #[test]
    fn capture_is_recorded_and_credited() {
        let mut game = game(9);
        play_all(&mut game, &["B1", "A1", "A2"]);
        assert_eq!(game.board().get(v(&game, "A1")), None);
        assert_eq!(game.captures(Color::Black), 1);
        assert_eq!(game.moves()[2].captured(), &[v(&game, "A1")]);
    }

    #[test]
    fn two_passes_end_the_game_under_chinese_rules() {
        let mut game = game(9);
        game.pass().unwrap();
        let events = game.pass().unwrap();
        assert_eq!(game.state(), GameState::Ended(GameEndReason::TwoPasses));
        assert!(events.contains(&GameEvent::GameEnded {
            reason: GameEndReason::TwoPasses
        }));
        let e5 = v(&game, "E5");
        assert!(matches!(game.play(e5), Err(GameError::InvalidStateTransition(_))));
    }

    #[test]
    fn resumed_play_needs_new_passes() {
        let mut game = game(9);
        game.pass().unwrap();
        game.pass().unwrap();
        game.resume_play().unwrap();
        assert_eq!(game.state(), GameState::InProgress);
        game.pass().unwrap();
        assert_eq!(game.state(), GameState::InProgress);
        game.pass().unwrap();
        assert_eq!(game.state(), GameState::Ended(GameEndReason::TwoPasses));
    }

    #[test]
    fn four_passes_can_end_the_game_for_good() {
        let mut config = GameConfig::with_size(BoardSize::NINE);
        config.rules = RuleSet::preset(RulesPreset::Aga);
        let mut game = Game::new(config).unwrap();
        game.pass().unwrap();
        game.pass().unwrap();
        game.resume_play().unwrap();
        game.pass().unwrap();
        game.pass().unwrap();
        assert_eq!(game.state(), GameState::Ended(GameEndReason::FourPasses));
        assert!(game.resume_play().is_err());
    }

    #[test]
    fn non_alternating_play_lets_a_player_move_twice() {
        let mut config = GameConfig::with_size(BoardSize::NINE);
        config.rules = RuleSet::preset(RulesPreset::Japanese);
        let mut game = Game::new(config).unwrap();
        assert!(game.switch_next_move_color().is_err());
        game.pass().unwrap();
        game.pass().unwrap();
        game.resume_play().unwrap();
        assert_eq!(game.next_move_color(), Color::Black);
        game.switch_next_move_color().unwrap();
        assert_eq!(game.next_move_color(), Color::White);
        let e5 = v(&game, "E5");
        game.play(e5).unwrap();
        game.switch_next_move_color().unwrap();
        let d5 = v(&game, "D5");
        game.play(d5).unwrap();
        assert_eq!(game.board().get(d5), Some(Color::White));
    }

    #[test]
    fn resignation_can_be_reverted() {
        let mut game = game(9);
        let e5 = v(&game, "E5");
        game.play(e5).unwrap();
        game.resign().unwrap();
        assert_eq!(game.state(), GameState::Ended(GameEndReason::Resigned(Color::White)));
        assert_eq!(
            game.result(),
            Some(GameResult::Resignation { winner: Color::Black })
        );
        assert!(game.enter_scoring_mode().is_err());
        game.revert_resignation().unwrap();
        assert_eq!(game.state(), GameState::InProgress);
        assert!(game.revert_resignation().is_err());
    }

    #[test]
    fn computer_cannot_resign() {
        let mut config = GameConfig::with_size(BoardSize::NINE);
        config.black_player = PlayerKind::Computer;
        let mut game = Game::new(config).unwrap();
        assert!(game.resign().is_err());
    }

    #[test]
    fn result_scores_the_last_position() {
        let mut game = game(9);
        play_all(&mut game, &["E5", "D4"]);
        game.pass().unwrap();
        game.pass().unwrap();
        let expected = game.result();
        assert_eq!(expected, Some(GameResult::WhiteWins { margin: 7.5 }));
        game.set_current_board_position(1).unwrap();
        assert_eq!(game.result(), expected);
    }

    #[test]
    fn off_board_vertex_from_json_is_refused() {
        let mut game = game(9);
        assert!(serde_json::from_str::<MoveRequest>(r#"{"Play":{"x":0,"y":1}}"#).is_err());
        let request: MoveRequest = serde_json::from_str(r#"{"Play":{"x":19,"y":19}}"#).unwrap();
        assert!(matches!(game.apply(request), Err(GameError::InvalidVertex(_))));
        assert!(game.moves().is_empty());
    }

    #[test]
    fn navigation_restores_captured_stones() {
        let mut game = game(9);
        play_all(&mut game, &["B1", "A1", "A2"]);
        let a1 = v(&game, "A1");
        game.set_current_board_position(2).unwrap();
        assert_eq!(game.board().get(a1), Some(Color::White));
        assert_eq!(game.captures(Color::Black), 0);
        assert_eq!(game.next_move_color(), Color::Black);
        game.set_current_board_position(3).unwrap();
        assert_eq!(game.board().get(a1), None);
        game.board().verify_integrity().unwrap();
        assert!(game.set_current_board_position(4).is_err());
    }

    #[test]
    fn playing_in_the_past_discards_later_moves() {
        let mut game = game(9);
        play_all(&mut game, &["E5", "D5", "C5"]);
        game.set_current_board_position(1).unwrap();
        let f5 = v(&game, "F5");
        let events = game.play(f5).unwrap();
        assert_eq!(events[0], GameEvent::MovesDiscarded { count: 2 });
        assert_eq!(game.moves().len(), 2);
        assert_eq!(game.board().get(v(&game, "D5")), None);
        assert_eq!(game.board().get(f5), Some(Color::White));
    }

    #[test]
    fn game_ended_by_passes_continues_when_history_is_rewritten() {
        let mut game = game(9);
        play_all(&mut game, &["E5"]);
        game.pass().unwrap();
        game.pass().unwrap();
        game.set_current_board_position(1).unwrap();
        let d5 = v(&game, "D5");
        game.play(d5).unwrap();
        assert_eq!(game.state(), GameState::InProgress);
    }

    #[test]
    fn failed_play_leaves_the_game_untouched() {
        let mut config = GameConfig::with_size(BoardSize::NINE);
        config.rules.ko_rule = KoRule::SimpleKo;
        let mut game = Game::new(config).unwrap();
        play_all(&mut game, &["E5"]);
        let before = game.board().partition();
        let e5 = v(&game, "E5");
        assert!(game.play(e5).is_err());
        assert_eq!(game.board().partition(), before);
        assert_eq!(game.moves().len(), 1);
        assert_eq!(game.next_move_color(), Color::White);
    }

    #[test]
    fn vertex_from_a_larger_board_is_rejected() {
        let mut game = game(9);
        let k10 = Vertex::from_label("K10", BoardSize::NINETEEN).unwrap();
        assert!(matches!(game.play(k10), Err(GameError::InvalidVertex(_))));
        assert_eq!(game.territory_at(k10), None);
        assert_eq!(game.state(), GameState::NotStarted);
    }

    #[test]
    fn handicap_stones_give_white_the_first_move() {
        let mut config = GameConfig::with_size(BoardSize::NINETEEN);
        config.handicap = 4;
        let game = Game::new(config).unwrap();
        assert_eq!(game.board().stone_count(Color::Black), 4);
        assert_eq!(game.next_move_color(), Color::White);
        assert_eq!(game.handicap_vertices().len(), 4);
    }

    #[test]
    fn board_size_changes_only_before_play() {
        let mut game = game(19);
        game.change_board_size(BoardSize::THIRTEEN).unwrap();
        assert_eq!(game.board().size(), BoardSize::THIRTEEN);
        let e5 = v(&game, "E5");
        game.play(e5).unwrap();
        assert!(game.change_board_size(BoardSize::NINE).is_err());
    }

    #[test]
    fn events_serialise_to_json() {
        let mut game = game(9);
        play_all(&mut game, &["B1", "A1", "A2"]);
        let events = game.set_current_board_position(1).unwrap();
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);

        game.set_current_board_position(3).unwrap();
        let events = game.enter_scoring_mode().unwrap();
        let json = serde_json::to_string(&events).unwrap();
        assert!(json.contains("ScoreChanged"));
        assert_eq!(serde_json::to_string(game.moves()).unwrap().matches("Play").count(), 3);
    }

    #[test]
    fn scoring_mode_blocks_moves_and_navigation() {
        let mut game = game(9);
        play_all(&mut game, &["E5"]);
        game.enter_scoring_mode().unwrap();
        let d5 = v(&game, "D5");
        assert!(game.play(d5).is_err());
        assert!(game.set_current_board_position(0).is_err());
        let events = game.toggle_dead_at(v(&game, "E5")).unwrap();
        assert!(matches!(events[1], GameEvent::ScoreChanged { .. }));
        assert_eq!(game.stone_status_at(v(&game, "E5")), Some(StoneStatus::Dead));
        game.exit_scoring_mode().unwrap();
        assert_eq!(game.stone_status_at(v(&game, "E5")), Some(StoneStatus::Alive));
        assert!(game.toggle_dead_at(d5).is_err());
    }
}
