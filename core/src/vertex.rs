// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coordinate system: vertices, vertex labels and board neighbourhoods
//!
//! Vertices are 1-based. Column 1 is the leftmost column ("A") and row 1 is
//! the bottom row, so "A1" is the lower-left corner of the board.

use crate::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board dimensions the engine accepts
pub const SUPPORTED_BOARD_SIZES: [u8; 7] = [7, 9, 11, 13, 15, 17, 19];

/// Column letters used in vertex labels; "I" is left out to avoid confusion with "1"
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// A validated board dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(u8);

impl BoardSize {
    /// 9x9 board
    pub const NINE: BoardSize = BoardSize(9);
    /// 13x13 board
    pub const THIRTEEN: BoardSize = BoardSize(13);
    /// 19x19 board
    pub const NINETEEN: BoardSize = BoardSize(19);

    /// Validate a board dimension
    pub fn new(size: u8) -> Result<Self, GameError> {
        if SUPPORTED_BOARD_SIZES.contains(&size) {
            Ok(Self(size))
        } else {
            Err(GameError::InvalidBoardSize(size))
        }
    }

    /// Number of lines in each direction
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of intersections on the board
    pub fn point_count(self) -> usize {
        self.0 as usize * self.0 as usize
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::NINETEEN
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> u8 {
        size.0
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// The four cardinal directions, in the order neighbours are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards higher row numbers
    Up,
    /// Towards later column letters
    Right,
    /// Towards lower row numbers
    Down,
    /// Towards earlier column letters
    Left,
}

impl Direction {
    /// Visiting order used everywhere neighbours are enumerated
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
        }
    }
}

/// A board intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawVertex")]
pub struct Vertex {
    x: u8,
    y: u8,
}

/// Unchecked wire form of a [`Vertex`]
#[derive(Deserialize)]
struct RawVertex {
    x: u8,
    y: u8,
}

impl TryFrom<RawVertex> for Vertex {
    type Error = GameError;

    // Bounded by the largest board; the game checks the actual board size.
    fn try_from(raw: RawVertex) -> Result<Self, Self::Error> {
        Vertex::new(raw.x, raw.y, BoardSize::NINETEEN)
    }
}

impl Vertex {
    /// Create a vertex from 1-based column and row numbers
    pub fn new(x: u8, y: u8, size: BoardSize) -> Result<Self, GameError> {
        if x == 0 || y == 0 || x > size.get() || y > size.get() {
            return Err(GameError::InvalidVertex(format!("({}, {})", x, y)));
        }
        Ok(Self { x, y })
    }

    /// Parse a label such as "D4" (case-insensitive)
    pub fn from_label(label: &str, size: BoardSize) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidVertex(label.to_string());
        let trimmed = label.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let column = COLUMN_LETTERS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(invalid)?;

        let row_text = chars.as_str();
        if row_text.is_empty() || !row_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: u8 = row_text.parse().map_err(|_| invalid())?;

        Self::new(column as u8 + 1, row, size).map_err(|_| invalid())
    }

    /// Label of this vertex, e.g. "D4"
    pub fn label(self) -> String {
        format!("{}{}", self.column_letter(), self.y)
    }

    /// Column letter of this vertex
    pub fn column_letter(self) -> char {
        COLUMN_LETTERS[self.x as usize - 1] as char
    }

    /// 1-based column
    pub fn x(self) -> u8 {
        self.x
    }

    /// 1-based row
    pub fn y(self) -> u8 {
        self.y
    }

    /// The adjacent vertex in `direction`, or `None` at the board edge
    pub fn neighbor(self, direction: Direction, size: BoardSize) -> Option<Vertex> {
        let (dx, dy) = direction.offset();
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        let max = size.get() as i16;
        if x < 1 || y < 1 || x > max || y > max {
            return None;
        }
        Some(Vertex { x: x as u8, y: y as u8 })
    }

    /// All on-board neighbours in Up, Right, Down, Left order
    pub fn neighbors(self, size: BoardSize) -> impl Iterator<Item = Vertex> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.neighbor(direction, size))
    }

    /// Next vertex in left-to-right, bottom-to-top order
    pub fn next(self, size: BoardSize) -> Option<Vertex> {
        if self.x < size.get() {
            Some(Vertex { x: self.x + 1, y: self.y })
        } else if self.y < size.get() {
            Some(Vertex { x: 1, y: self.y + 1 })
        } else {
            None
        }
    }

    /// Previous vertex in left-to-right, bottom-to-top order
    pub fn previous(self, size: BoardSize) -> Option<Vertex> {
        if self.x > 1 {
            Some(Vertex { x: self.x - 1, y: self.y })
        } else if self.y > 1 {
            Some(Vertex { x: size.get(), y: self.y - 1 })
        } else {
            None
        }
    }

    /// Every vertex of the board exactly once, starting at "A1"
    pub fn all(size: BoardSize) -> impl Iterator<Item = Vertex> {
        std::iter::successors(Some(Vertex { x: 1, y: 1 }), move |v| v.next(size))
    }

    /// Offset of this vertex in row-major storage
    pub(crate) fn index(self, size: BoardSize) -> usize {
        (self.y as usize - 1) * size.get() as usize + (self.x as usize - 1)
    }

    /// Inverse of [`Vertex::index`]
    pub(crate) fn from_index(index: usize, size: BoardSize) -> Vertex {
        let n = size.get() as usize;
        Vertex {
            x: (index % n) as u8 + 1,
            y: (index / n) as u8 + 1,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.y)
    }
}
