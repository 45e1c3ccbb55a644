// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goban CLI - play and score Go games at a text prompt

use anyhow::Result;
use clap::{Parser, ValueEnum};
use goban_cli::commands::{self, Flow};
use goban_cli::{config, render};
use goban_core::{BoardSize, Game, GameConfig, RuleSet, RulesPreset};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(name = "goban", about = "Play and score Go games in the terminal", version)]
struct Args {
    /// Settings file (TOML)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Board size: 7, 9, 11, 13, 15, 17 or 19
    #[clap(short, long)]
    size: Option<u8>,

    /// Points added to White's score
    #[clap(short, long, allow_negative_numbers = true)]
    komi: Option<f32>,

    /// Number of handicap stones for Black
    #[clap(long)]
    handicap: Option<u8>,

    /// Rules preset
    #[clap(short, long, value_enum)]
    rules: Option<Preset>,

    /// Enable debug logging
    #[clap(long)]
    debug: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Preset {
    Chinese,
    Japanese,
    Aga,
    NewZealand,
}

impl From<Preset> for RulesPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Chinese => RulesPreset::Chinese,
            Preset::Japanese => RulesPreset::Japanese,
            Preset::Aga => RulesPreset::Aga,
            Preset::NewZealand => RulesPreset::NewZealand,
        }
    }
}

fn game_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(preset) = args.rules {
        config.rules = RuleSet::preset(preset.into());
    }
    if let Some(size) = args.size {
        config.board_size = BoardSize::new(size)?;
    }
    if let Some(komi) = args.komi {
        config.komi = komi;
    }
    if let Some(handicap) = args.handicap {
        config.handicap = handicap;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut game = Game::new(game_config(&args)?)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", render::render_board(&game))?;
    writeln!(out, "{}", render::render_status(&game))?;
    writeln!(out, "Type 'help' for commands.")?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match commands::parse_command(&line, game.board().size()) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Invalid command: {:#}", e);
                continue;
            }
        };
        match commands::execute(&mut game, command, &mut out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{:#}", e),
        }
        out.flush()?;
    }

    Ok(())
}
