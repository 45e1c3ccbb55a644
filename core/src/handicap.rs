// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed handicap stone placement

use crate::vertex::{BoardSize, Vertex};
use crate::GameError;

/// Largest handicap that has fixed placements on a board
pub fn max_handicap(size: BoardSize) -> u8 {
    if size.get() == 7 {
        4
    } else {
        9
    }
}

/// Star points for `count` handicap stones, in the customary order
/// (lower-left and upper-right corners first, then the remaining corners,
/// side points and the centre).
pub fn handicap_vertices(size: BoardSize, count: u8) -> Result<Vec<Vertex>, GameError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if count == 1 || count > max_handicap(size) {
        return Err(GameError::InvalidConfiguration(format!(
            "no fixed placement for {} handicap stones on {}",
            count, size
        )));
    }

    let n = size.get();
    let edge = if n >= 13 { 4 } else { 3 };
    let low = edge;
    let high = n + 1 - edge;
    let mid = (n + 1) / 2;

    let corners = [(low, low), (high, high), (low, high), (high, low)];
    let mut points: Vec<(u8, u8)> = corners.iter().take(count.min(4) as usize).copied().collect();
    let sides_left_right = [(low, mid), (high, mid)];
    let sides_bottom_top = [(mid, low), (mid, high)];
    match count {
        5 => points.push((mid, mid)),
        6 => points.extend(sides_left_right),
        7 => {
            points.extend(sides_left_right);
            points.push((mid, mid));
        }
        8 => {
            points.extend(sides_left_right);
            points.extend(sides_bottom_top);
        }
        9 => {
            points.extend(sides_left_right);
            points.extend(sides_bottom_top);
            points.push((mid, mid));
        }
        _ => {}
    }

    points.into_iter().map(|(x, y)| Vertex::new(x, y, size)).collect()
}
