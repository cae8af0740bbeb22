/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::Difficulty;

/// Timings, difficulty bounds, and engine settings.
///
/// Every field is optional in the TOML file; anything left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blink period for moves, undo, and the promotion menu.
    pub blink_ms: u64,

    /// Blink period once the game ends in checkmate.
    pub checkmate_blink_ms: u64,

    /// Delay between frames of the startup animation.
    pub startup_step_ms: u64,

    /// How long all LEDs stay lit after a difficulty is chosen or the board is set up.
    pub setup_pause_ms: u64,

    /// How long all four buttons must be held before the game resets.
    pub reset_hold_ms: u64,

    /// How long all LEDs stay lit before the reset happens.
    pub reset_pause_ms: u64,

    pub min_difficulty: u8,
    pub max_difficulty: u8,
    pub default_difficulty: u8,

    pub engine: EngineConfig,
}

impl Config {
    /// Reads a config file, falling back to defaults for anything it does not set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;

        Self::parse(&text).with_context(|| format!("Invalid config file {path:?}"))
    }

    /// Parses config text in TOML format.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_difficulty..=self.max_difficulty).contains(&self.default_difficulty) {
            bail!(
                "Default difficulty {} must be within [{}, {}]",
                self.default_difficulty,
                self.min_difficulty,
                self.max_difficulty
            );
        }
        if self.max_difficulty > 8 {
            bail!("Difficulty is shown on 8 LEDs; max_difficulty must be at most 8");
        }
        if self.blink_ms == 0 || self.checkmate_blink_ms == 0 {
            bail!("Blink periods must be non-zero");
        }
        Ok(())
    }

    pub fn blink(&self) -> Duration {
        Duration::from_millis(self.blink_ms)
    }

    pub fn checkmate_blink(&self) -> Duration {
        Duration::from_millis(self.checkmate_blink_ms)
    }

    pub fn startup_step(&self) -> Duration {
        Duration::from_millis(self.startup_step_ms)
    }

    pub fn setup_pause(&self) -> Duration {
        Duration::from_millis(self.setup_pause_ms)
    }

    pub fn reset_hold(&self) -> Duration {
        Duration::from_millis(self.reset_hold_ms)
    }

    pub fn reset_pause(&self) -> Duration {
        Duration::from_millis(self.reset_pause_ms)
    }

    pub fn default_difficulty(&self) -> Difficulty {
        Difficulty::new(self.default_difficulty)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blink_ms: 500,
            checkmate_blink_ms: 200,
            startup_step_ms: 50,
            setup_pause_ms: 1000,
            reset_hold_ms: 0,
            reset_pause_ms: 2000,
            min_difficulty: 0,
            max_difficulty: 8,
            default_difficulty: 1,
            engine: EngineConfig::default(),
        }
    }
}

/// Settings for the external UCI engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the engine binary.
    pub path: Option<PathBuf>,

    /// Thinking time per move.
    pub movetime_ms: u64,

    /// Sent to the engine as `setoption` commands at start-up.
    pub options: BTreeMap<String, toml::Value>,
}

impl EngineConfig {
    pub fn movetime(&self) -> Duration {
        Duration::from_millis(self.movetime_ms)
    }

    /// The configured options as `(name, value)` text pairs.
    pub fn uci_options(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let options = [
            ("Write Debug Log", toml::Value::from(false)),
            ("Contempt", 0.into()),
            ("Min Split Depth", 0.into()),
            ("Threads", 1.into()),
            ("Ponder", false.into()),
            ("Hash", 16.into()),
            ("MultiPV", 1.into()),
            ("Skill Level", 20.into()),
            ("Move Overhead", 30.into()),
            ("Minimum Thinking Time", 20.into()),
            ("Slow Mover", 80.into()),
            ("UCI_Chess960", false.into()),
            ("UCI_LimitStrength", false.into()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        Self {
            path: None,
            movetime_ms: 1000,
            options,
        }
    }
}
