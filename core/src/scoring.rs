// SPDX-License-Identifier: MIT OR Apache-2.0

//! Territory, dead stones, seki and final score

use crate::board::Board;
use crate::region::RegionId;
use crate::rules::ScoringSystem;
use crate::{Color, GameError, Vertex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Life and death classification of a stone group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StoneStatus {
    #[default]
    Alive,
    /// Removed for scoring; its points count for the opponent
    Dead,
    /// Alive without territory; empty points next to it are dame
    Seki,
}

/// Owner of an empty (or dead) intersection when scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerritoryColor {
    Black,
    White,
    /// Dame: bordered by both colours, by none, or by a seki group
    Neutral,
    /// Bordered by a single colour that also has dead stones inside
    Inconsistent,
}

impl TerritoryColor {
    fn owned_by(color: Color) -> Self {
        match color {
            Color::Black => TerritoryColor::Black,
            Color::White => TerritoryColor::White,
        }
    }
}

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameResult {
    BlackWins { margin: f32 },
    WhiteWins { margin: f32 },
    Draw,
    Resignation { winner: Color },
}

/// Counts outside the board position that enter the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub scoring_system: ScoringSystem,
    pub komi: f32,
    pub handicap: u8,
    /// White stones captured by Black during play
    pub captured_by_black: usize,
    /// Black stones captured by White during play
    pub captured_by_white: usize,
}

/// Full score breakdown.
///
/// Komi is added to White's total, lowering Black's margin by the same amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub scoring_system: ScoringSystem,
    pub komi: f32,
    /// Compensation White receives for Black's handicap stones
    pub handicap_compensation: f32,
    pub captured_by_black: usize,
    pub captured_by_white: usize,
    pub dead_black: usize,
    pub dead_white: usize,
    pub alive_black: usize,
    pub alive_white: usize,
    pub seki_black: usize,
    pub seki_white: usize,
    pub territory_black: usize,
    pub territory_white: usize,
    pub dame: usize,
    pub total_black: f32,
    pub total_white: f32,
}

impl Score {
    /// Black's total minus White's total
    pub fn margin(&self) -> f32 {
        self.total_black - self.total_white
    }

    /// Winner and margin by points
    pub fn result(&self) -> GameResult {
        let margin = self.margin();
        if margin > 0.0 {
            GameResult::BlackWins { margin }
        } else if margin < 0.0 {
            GameResult::WhiteWins { margin: -margin }
        } else {
            GameResult::Draw
        }
    }
}

/// A group whose classification changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedGroup {
    pub color: Color,
    pub vertices: Vec<Vertex>,
    pub status: StoneStatus,
}

/// Life and death marks and the territory they imply for a frozen position
#[derive(Debug, Clone)]
pub struct ScoringSession {
    /// Per point; only meaningful for stones
    statuses: Vec<StoneStatus>,
    /// Per point; `None` for living stones
    territory: Vec<Option<TerritoryColor>>,
}

impl ScoringSession {
    /// Start with every stone alive
    pub fn new(board: &Board) -> Self {
        let count = board.size().point_count();
        Self {
            statuses: vec![StoneStatus::Alive; count],
            territory: vec![None; count],
        }
    }

    /// Classification of the stone at a vertex; `None` for empty points
    pub fn status_at(&self, board: &Board, vertex: Vertex) -> Option<StoneStatus> {
        let index = board.index_of(vertex);
        board.color_at(index).map(|_| self.statuses[index])
    }

    /// Territory owner of a vertex as of the last evaluation
    pub fn territory_at(&self, board: &Board, vertex: Vertex) -> Option<TerritoryColor> {
        self.territory[board.index_of(vertex)]
    }

    /// Toggle the group at `vertex` between alive and dead.
    ///
    /// A seki group becomes dead. With `intelligent` marking the same new
    /// status is given to every friendly group reachable through empty space
    /// without crossing opponent stones, and a group marked dead brings
    /// adjacent dead opponent groups back to life.
    pub fn toggle_dead(
        &mut self,
        board: &Board,
        vertex: Vertex,
        intelligent: bool,
    ) -> Result<Vec<MarkedGroup>, GameError> {
        let start = self.stone_group(board, vertex)?;
        let index = board.index_of(vertex);
        let status = if self.statuses[index] == StoneStatus::Dead {
            StoneStatus::Alive
        } else {
            StoneStatus::Dead
        };

        let (groups, opponents) = if intelligent {
            connected_groups(board, start)
        } else {
            (vec![start], Vec::new())
        };

        let mut marked = Vec::new();
        for id in groups {
            if let Some(group) = self.mark(board, id, status) {
                marked.push(group);
            }
        }
        if status == StoneStatus::Dead {
            for id in opponents {
                let first = board.region_by_id(id).points[0];
                if self.statuses[first] == StoneStatus::Dead {
                    if let Some(group) = self.mark(board, id, StoneStatus::Alive) {
                        marked.push(group);
                    }
                }
            }
        }
        Ok(marked)
    }

    /// Toggle the group at `vertex` between seki and alive; a dead group becomes seki
    pub fn toggle_seki(&mut self, board: &Board, vertex: Vertex) -> Result<Vec<MarkedGroup>, GameError> {
        let id = self.stone_group(board, vertex)?;
        let index = board.index_of(vertex);
        let status = if self.statuses[index] == StoneStatus::Seki {
            StoneStatus::Alive
        } else {
            StoneStatus::Seki
        };
        Ok(self.mark(board, id, status).into_iter().collect())
    }

    fn stone_group(&self, board: &Board, vertex: Vertex) -> Result<RegionId, GameError> {
        let index = board.index_of(vertex);
        if board.color_at(index).is_none() {
            return Err(GameError::NoStoneGroup(vertex));
        }
        Ok(board.region_id_at(index))
    }

    fn mark(&mut self, board: &Board, id: RegionId, status: StoneStatus) -> Option<MarkedGroup> {
        let region = board.region_by_id(id);
        let color = region.color()?;
        if region.points.iter().all(|&p| self.statuses[p] == status) {
            return None;
        }
        for &point in &region.points {
            self.statuses[point] = status;
        }
        Some(MarkedGroup {
            color,
            vertices: board.region_vertices(id),
            status,
        })
    }

    /// Recompute territory and the score from the current marks
    pub fn evaluate(&mut self, board: &Board, inputs: &ScoreInputs) -> Score {
        let count = board.size().point_count();
        let open = |index: usize, statuses: &[StoneStatus]| {
            board.color_at(index).is_none() || statuses[index] == StoneStatus::Dead
        };

        let mut territory = vec![None; count];
        let mut visited = vec![false; count];
        for start in 0..count {
            if visited[start] || !open(start, &self.statuses) {
                continue;
            }

            let mut area = vec![start];
            let mut queue = VecDeque::from([start]);
            visited[start] = true;
            let mut borders_black = false;
            let mut borders_white = false;
            let mut borders_seki = false;
            let mut dead_inside = [false; 2];

            while let Some(current) = queue.pop_front() {
                if let Some(color) = board.color_at(current) {
                    dead_inside[color_slot(color)] = true;
                }
                for n in board.neighbors_of(current) {
                    if open(n, &self.statuses) {
                        if !visited[n] {
                            visited[n] = true;
                            area.push(n);
                            queue.push_back(n);
                        }
                        continue;
                    }
                    match (board.color_at(n), self.statuses[n]) {
                        (_, StoneStatus::Seki) => borders_seki = true,
                        (Some(Color::Black), _) => borders_black = true,
                        (Some(Color::White), _) => borders_white = true,
                        (None, _) => {}
                    }
                }
            }

            let owner = match (borders_black, borders_white) {
                _ if borders_seki => TerritoryColor::Neutral,
                (true, false) if dead_inside[color_slot(Color::Black)] => TerritoryColor::Inconsistent,
                (true, false) => TerritoryColor::owned_by(Color::Black),
                (false, true) if dead_inside[color_slot(Color::White)] => TerritoryColor::Inconsistent,
                (false, true) => TerritoryColor::owned_by(Color::White),
                _ => TerritoryColor::Neutral,
            };
            for point in area {
                territory[point] = Some(owner);
            }
        }
        self.territory = territory;

        let mut score = Score {
            scoring_system: inputs.scoring_system,
            komi: inputs.komi,
            handicap_compensation: 0.0,
            captured_by_black: inputs.captured_by_black,
            captured_by_white: inputs.captured_by_white,
            dead_black: 0,
            dead_white: 0,
            alive_black: 0,
            alive_white: 0,
            seki_black: 0,
            seki_white: 0,
            territory_black: 0,
            territory_white: 0,
            dame: 0,
            total_black: 0.0,
            total_white: 0.0,
        };

        for index in 0..count {
            if let Some(color) = board.color_at(index) {
                let counter = match (color, self.statuses[index]) {
                    (Color::Black, StoneStatus::Alive) => &mut score.alive_black,
                    (Color::White, StoneStatus::Alive) => &mut score.alive_white,
                    (Color::Black, StoneStatus::Dead) => &mut score.dead_black,
                    (Color::White, StoneStatus::Dead) => &mut score.dead_white,
                    (Color::Black, StoneStatus::Seki) => &mut score.seki_black,
                    (Color::White, StoneStatus::Seki) => &mut score.seki_white,
                };
                *counter += 1;
            }
            match self.territory[index] {
                Some(TerritoryColor::Black) => score.territory_black += 1,
                Some(TerritoryColor::White) => score.territory_white += 1,
                Some(TerritoryColor::Neutral) | Some(TerritoryColor::Inconsistent) => score.dame += 1,
                None => {}
            }
        }

        match inputs.scoring_system {
            ScoringSystem::AreaScoring => {
                score.handicap_compensation = inputs.handicap as f32;
                score.total_black = (score.alive_black + score.seki_black + score.territory_black) as f32;
                score.total_white = (score.alive_white + score.seki_white + score.territory_white) as f32
                    + score.handicap_compensation
                    + inputs.komi;
            }
            ScoringSystem::TerritoryScoring => {
                score.total_black = (score.territory_black + score.captured_by_black + score.dead_white) as f32;
                score.total_white = (score.territory_white + score.captured_by_white + score.dead_black) as f32
                    + inputs.komi;
            }
        }
        score
    }
}

/// Friendly groups reachable from `start` through empty regions, plus the
/// opponent groups met on the way
fn connected_groups(board: &Board, start: RegionId) -> (Vec<RegionId>, Vec<RegionId>) {
    let color = board.region_by_id(start).color();
    let mut friendly = vec![start];
    let mut opponents = Vec::new();
    let mut seen = vec![start];
    let mut queue = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        for other in board.adjacent_regions(id) {
            if seen.contains(&other) {
                continue;
            }
            seen.push(other);
            match board.region_by_id(other).color() {
                None => queue.push_back(other),
                c if c == color => {
                    friendly.push(other);
                    queue.push_back(other);
                }
                Some(_) => opponents.push(other),
            }
        }
    }
    (friendly, opponents)
}

fn color_slot(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardSize;

    /// Build a 7x7 board from rows given top row first
    fn board_from(rows: &[&str]) -> Board {
        let size = BoardSize::new(rows.len() as u8).unwrap();
        let mut board = Board::new(size);
        for (r, row) in rows.iter().enumerate() {
            let y = rows.len() - r;
            for (x, ch) in row.chars().filter(|c| !c.is_whitespace()).enumerate() {
                let color = match ch {
                    'X' => Some(Color::Black),
                    'O' => Some(Color::White),
                    _ => None,
                };
                if color.is_some() {
                    let vertex = Vertex::new(x as u8 + 1, y as u8, size).unwrap();
                    board.set_color(board.index_of(vertex), color);
                }
            }
        }
        board
    }

    fn inputs(system: ScoringSystem) -> ScoreInputs {
        ScoreInputs {
            scoring_system: system,
            komi: 6.5,
            handicap: 0,
            captured_by_black: 0,
            captured_by_white: 0,
        }
    }

    fn v(board: &Board, label: &str) -> Vertex {
        Vertex::from_label(label, board.size()).unwrap()
    }

    const SPLIT_BOARD: [&str; 7] = [
        ". . X O . . .",
        ". . X O . . .",
        ". . X O . . .",
        ". . X O . . .",
        ". . X O . . .",
        ". . X O . . .",
        ". . X O . . .",
    ];

    #[test]
    fn split_board_territory() {
        let board = board_from(&SPLIT_BOARD);
        let mut session = ScoringSession::new(&board);
        let score = session.evaluate(&board, &inputs(ScoringSystem::AreaScoring));
        assert_eq!(score.territory_black, 14);
        assert_eq!(score.territory_white, 21);
        assert_eq!(score.alive_black, 7);
        assert_eq!(score.total_black, 21.0);
        assert_eq!(score.total_white, 28.0 + 6.5);
        assert_eq!(score.result(), GameResult::WhiteWins { margin: 13.5 });
        assert_eq!(session.territory_at(&board, v(&board, "A1")), Some(TerritoryColor::Black));
        assert_eq!(session.territory_at(&board, v(&board, "C1")), None);
    }

    #[test]
    fn komi_counts_for_white() {
        let board = board_from(&SPLIT_BOARD);
        let mut session = ScoringSession::new(&board);
        let mut no_komi = inputs(ScoringSystem::TerritoryScoring);
        no_komi.komi = 0.0;
        let even = session.evaluate(&board, &no_komi);
        let score = session.evaluate(&board, &inputs(ScoringSystem::TerritoryScoring));
        assert_eq!(score.total_black, even.total_black);
        assert_eq!(score.total_white, even.total_white + 6.5);
        assert_eq!(score.margin(), even.margin() - 6.5);
    }

    #[test]
    fn dead_stone_becomes_opponent_territory() {
        let mut rows = SPLIT_BOARD;
        rows[3] = ". . X O . X .";
        let board = board_from(&rows);
        let mut session = ScoringSession::new(&board);

        let before = session.evaluate(&board, &inputs(ScoringSystem::AreaScoring));
        assert_eq!(before.territory_white, 0);
        assert_eq!(before.dame, 20);

        let marked = session.toggle_dead(&board, v(&board, "F4"), false).unwrap();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].status, StoneStatus::Dead);

        let after = session.evaluate(&board, &inputs(ScoringSystem::AreaScoring));
        assert_eq!(after.territory_white, 21);
        assert_eq!(after.alive_black, 7);
        assert_eq!(after.dead_black, 1);

        let territory = session.evaluate(&board, &inputs(ScoringSystem::TerritoryScoring));
        assert_eq!(territory.total_white, 21.0 + 1.0 + 6.5);
        assert_eq!(territory.total_black, 14.0);
    }

    #[test]
    fn seki_group_makes_neighbouring_space_dame() {
        let board = board_from(&SPLIT_BOARD);
        let mut session = ScoringSession::new(&board);
        session.toggle_seki(&board, v(&board, "C4")).unwrap();
        let score = session.evaluate(&board, &inputs(ScoringSystem::AreaScoring));
        assert_eq!(score.seki_black, 7);
        assert_eq!(score.territory_black, 0);
        assert_eq!(score.dame, 14);
        assert_eq!(score.total_black, 7.0);

        session.toggle_seki(&board, v(&board, "C4")).unwrap();
        assert_eq!(session.status_at(&board, v(&board, "C1")), Some(StoneStatus::Alive));
    }

    #[test]
    fn dead_stones_next_to_their_own_living_stones_are_inconsistent() {
        let mut rows = SPLIT_BOARD;
        rows[3] = "X . X O . . .";
        let board = board_from(&rows);
        let mut session = ScoringSession::new(&board);
        session.toggle_dead(&board, v(&board, "A4"), false).unwrap();

        let score = session.evaluate(&board, &inputs(ScoringSystem::AreaScoring));
        assert_eq!(session.territory_at(&board, v(&board, "A1")), Some(TerritoryColor::Inconsistent));
        assert_eq!(score.territory_black, 0);
        assert_eq!(score.territory_white, 21);
        assert_eq!(score.dame, 14);
    }

    #[test]
    fn toggling_twice_restores_the_group() {
        let board = board_from(&SPLIT_BOARD);
        let mut session = ScoringSession::new(&board);
        let vertex = v(&board, "D5");
        session.toggle_dead(&board, vertex, false).unwrap();
        assert_eq!(session.status_at(&board, vertex), Some(StoneStatus::Dead));
        session.toggle_dead(&board, vertex, false).unwrap();
        assert_eq!(session.status_at(&board, vertex), Some(StoneStatus::Alive));
    }

    #[test]
    fn intelligent_marking_spreads_through_empty_space() {
        let board = board_from(&[
            ". . . . . . .",
            ". O . . O . .",
            ". . . . . . .",
            "X X X X X X X",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ]);
        let mut session = ScoringSession::new(&board);
        let marked = session.toggle_dead(&board, v(&board, "B6"), true).unwrap();
        assert_eq!(marked.len(), 2);
        assert_eq!(session.status_at(&board, v(&board, "E6")), Some(StoneStatus::Dead));
        assert_eq!(session.status_at(&board, v(&board, "A4")), Some(StoneStatus::Alive));

        let score = session.evaluate(&board, &inputs(ScoringSystem::AreaScoring));
        assert_eq!(score.territory_black, 42);
        assert_eq!(score.dead_white, 2);
    }

    #[test]
    fn empty_point_has_no_group() {
        let board = board_from(&SPLIT_BOARD);
        let mut session = ScoringSession::new(&board);
        let vertex = v(&board, "A1");
        assert_eq!(session.toggle_dead(&board, vertex, true), Err(GameError::NoStoneGroup(vertex)));
    }
}
