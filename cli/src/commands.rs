// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text commands understood by the interactive prompt

use crate::render;
use anyhow::{anyhow, Context, Result};
use goban_core::{BoardSize, Game, GameEvent, Vertex};
use std::io::Write;

pub const HELP: &str = "\
Commands:
  <vertex>          play a stone, e.g. D4
  pass              pass
  resign            resign for the player to move
  revert            take back a resignation
  resume            resume play after the game ended by passes
  switch            give the move to the other player (resumed non-alternating play)
  score             enter scoring mode
  dead <vertex>     toggle the group at <vertex> dead or alive
  seki <vertex>     toggle the group at <vertex> in seki
  done              leave scoring mode
  goto <n>          show board position n
  back / forward    step through the game
  size <n>          change the board size before the first move
  board             show the board
  help              show this help
  quit              leave";

/// A parsed prompt line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Vertex),
    Pass,
    Resign,
    RevertResignation,
    Resume,
    SwitchColor,
    Score,
    Dead(Vertex),
    Seki(Vertex),
    Done,
    Goto(usize),
    Back,
    Forward,
    Size(BoardSize),
    Board,
    Help,
    Quit,
}

/// Whether the prompt keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse a prompt line for a board of `size`
pub fn parse_command(line: &str, size: BoardSize) -> Result<Command> {
    let mut words = line.split_whitespace();
    let head = words
        .next()
        .ok_or_else(|| anyhow!("empty command"))?
        .to_lowercase();
    let argument = words.next();

    let vertex = |argument: Option<&str>| -> Result<Vertex> {
        let label = argument.ok_or_else(|| anyhow!("'{}' needs a vertex such as D4", head))?;
        Ok(Vertex::from_label(label, size)?)
    };

    let command = match head.as_str() {
        "pass" => Command::Pass,
        "resign" => Command::Resign,
        "revert" => Command::RevertResignation,
        "resume" => Command::Resume,
        "switch" => Command::SwitchColor,
        "score" => Command::Score,
        "dead" => Command::Dead(vertex(argument)?),
        "seki" => Command::Seki(vertex(argument)?),
        "done" => Command::Done,
        "back" => Command::Back,
        "forward" => Command::Forward,
        "board" => Command::Board,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "goto" => {
            let position = argument.ok_or_else(|| anyhow!("'goto' needs a position"))?;
            Command::Goto(
                position
                    .parse()
                    .with_context(|| format!("invalid board position '{}'", position))?,
            )
        }
        "size" => {
            let value = argument.ok_or_else(|| anyhow!("'size' needs a board size"))?;
            let value: u8 = value
                .parse()
                .with_context(|| format!("invalid board size '{}'", value))?;
            Command::Size(BoardSize::new(value)?)
        }
        _ => Command::Play(
            Vertex::from_label(&head, size)
                .map_err(|_| anyhow!("unknown command '{}', try 'help'", head))?,
        ),
    };
    Ok(command)
}

/// Run a command against the game and report what happened to `out`
pub fn execute(game: &mut Game, command: Command, out: &mut dyn Write) -> Result<Flow> {
    let events = match command {
        Command::Play(vertex) => game.play(vertex)?,
        Command::Pass => game.pass()?,
        Command::Resign => game.resign()?,
        Command::RevertResignation => game.revert_resignation()?,
        Command::Resume => game.resume_play()?,
        Command::SwitchColor => game.switch_next_move_color()?,
        Command::Score => game.enter_scoring_mode()?,
        Command::Dead(vertex) => game.toggle_dead_at(vertex)?,
        Command::Seki(vertex) => game.toggle_seki_at(vertex)?,
        Command::Done => game.exit_scoring_mode()?,
        Command::Goto(position) => game.set_current_board_position(position)?,
        Command::Back => {
            let position = game
                .current_board_position()
                .checked_sub(1)
                .ok_or_else(|| anyhow!("already at the first board position"))?;
            game.set_current_board_position(position)?
        }
        Command::Forward => game.set_current_board_position(game.current_board_position() + 1)?,
        Command::Size(size) => game.change_board_size(size)?,
        Command::Board => Vec::new(),
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(Flow::Continue);
        }
        Command::Quit => return Ok(Flow::Quit),
    };

    for event in &events {
        tracing::debug!(?event, "Game event");
        if let Some(line) = describe(event) {
            writeln!(out, "{}", line)?;
        }
    }
    write!(out, "\n{}", render::render_board(game))?;
    writeln!(out, "{}", render::render_status(game))?;
    Ok(Flow::Continue)
}

/// Human readable line for an event
pub fn describe(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::StonePlayed {
            move_number,
            color,
            vertex,
            ..
        } => format!("{}. {} {}", move_number, color, vertex),
        GameEvent::StonesCaptured { color, vertices } => {
            format!("{} {} stone(s) captured", vertices.len(), color)
        }
        GameEvent::Passed { move_number, color } => format!("{}. {} passes", move_number, color),
        GameEvent::MovesDiscarded { count } => format!("{} later move(s) discarded", count),
        GameEvent::GameEnded { reason } => format!("Game over: {:?}", reason),
        GameEvent::ResignationReverted => "Resignation reverted".to_string(),
        GameEvent::PlayResumed => "Play resumed".to_string(),
        GameEvent::NextMoveColorSwitched { color } => format!("{} to play", color),
        GameEvent::BoardSizeChanged { size } => format!("Board size is now {}", size),
        GameEvent::ScoringModeEntered => "Scoring: mark dead stones with 'dead <vertex>'".to_string(),
        GameEvent::ScoringModeExited => "Scoring finished".to_string(),
        GameEvent::ScoreChanged { score } => format!(
            "Black {} - White {} ({:?})",
            score.total_black,
            score.total_white,
            score.result()
        ),
        GameEvent::BoardPositionChanged { .. } | GameEvent::StoneGroupsMarked { .. } => return None,
    };
    Some(line)
}
