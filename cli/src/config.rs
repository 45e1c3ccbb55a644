// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game settings read from a TOML file

use anyhow::{Context, Result};
use goban_core::{GameConfig, RuleSet, RulesPreset};
use serde::Deserialize;
use std::path::Path;

/// Layout of the settings file.
///
/// Every field is optional; `preset` picks the base rules and an explicit
/// `[rules]` table replaces them.
///
/// ```toml
/// board_size = 9
/// komi = 6.5
/// preset = "japanese"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub preset: Option<RulesPreset>,
    pub rules: Option<RuleSet>,
    pub board_size: Option<u8>,
    pub komi: Option<f32>,
    pub handicap: Option<u8>,
    pub black_player: Option<goban_core::PlayerKind>,
    pub white_player: Option<goban_core::PlayerKind>,
    pub mark_dead_stones_intelligently: Option<bool>,
}

impl FileConfig {
    /// Apply the file's settings on top of `config`
    pub fn apply(self, config: &mut GameConfig) -> Result<()> {
        if let Some(preset) = self.preset {
            config.rules = RuleSet::preset(preset);
        }
        if let Some(rules) = self.rules {
            config.rules = rules;
        }
        if let Some(size) = self.board_size {
            config.board_size = goban_core::BoardSize::new(size)?;
        }
        if let Some(komi) = self.komi {
            config.komi = komi;
        }
        if let Some(handicap) = self.handicap {
            config.handicap = handicap;
        }
        if let Some(kind) = self.black_player {
            config.black_player = kind;
        }
        if let Some(kind) = self.white_player {
            config.white_player = kind;
        }
        if let Some(intelligent) = self.mark_dead_stones_intelligently {
            config.mark_dead_stones_intelligently = intelligent;
        }
        Ok(())
    }
}

/// Parse a settings file
pub fn parse_config(text: &str) -> Result<FileConfig> {
    toml::from_str(text).context("invalid settings file")
}

/// Read a settings file and apply it to the defaults
pub fn load_config(path: &Path) -> Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut config = GameConfig::default();
    parse_config(&text)
        .with_context(|| format!("in {}", path.display()))?
        .apply(&mut config)?;
    config.validate()?;
    tracing::info!(path = %path.display(), "Loaded game settings");
    Ok(config)
}
