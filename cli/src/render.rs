// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use goban_core::handicap::{handicap_vertices, max_handicap};
use goban_core::{BoardSize, Color, Game, StoneStatus, TerritoryColor, Vertex};

/// Render the board at the current position, highest row on top.
///
/// In scoring mode dead stones are drawn as `x` and territory as `▪` (Black)
/// or `▫` (White).
pub fn render_board(game: &Game) -> String {
    let size = game.board().size();
    let stars = star_points(size);
    let mut output = String::new();

    push_column_labels(&mut output, size);
    for y in (1..=size.get()).rev() {
        output.push_str(&format!("{:2} ", y));
        for x in 1..=size.get() {
            let vertex = match Vertex::new(x, y, size) {
                Ok(vertex) => vertex,
                Err(_) => continue,
            };
            let symbol = match (game.board().get(vertex), game.stone_status_at(vertex)) {
                (Some(_), Some(StoneStatus::Dead)) => "x",
                (Some(Color::Black), _) => "●",
                (Some(Color::White), _) => "○",
                (None, _) => match game.territory_at(vertex) {
                    Some(TerritoryColor::Black) => "▪",
                    Some(TerritoryColor::White) => "▫",
                    _ if stars.contains(&vertex) => "+",
                    _ => "·",
                },
            };
            output.push_str(&format!(" {}", symbol));
        }
        output.push_str(&format!(" {}", y));
        output.push('\n');
    }
    push_column_labels(&mut output, size);

    output
}

/// One-line summary of whose turn it is and the prisoners so far
pub fn render_status(game: &Game) -> String {
    format!(
        "Move {}/{} - {} to play - captures: Black {} White {} - {:?}",
        game.current_board_position(),
        game.board_position_count() - 1,
        game.next_move_color(),
        game.captures(Color::Black),
        game.captures(Color::White),
        game.state(),
    )
}

fn push_column_labels(output: &mut String, size: BoardSize) {
    output.push_str("   ");
    for x in 1..=size.get() {
        if let Ok(vertex) = Vertex::new(x, 1, size) {
            output.push_str(&format!(" {}", vertex.column_letter()));
        }
    }
    output.push('\n');
}

/// Star points are the points a full handicap would occupy
fn star_points(size: BoardSize) -> Vec<Vertex> {
    handicap_vertices(size, max_handicap(size)).unwrap_or_default()
}
