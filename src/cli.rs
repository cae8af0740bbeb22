/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{path::PathBuf, str::FromStr};

use clap::Parser;

use crate::{Button, Config, Move, Square};

/// Plays chess on a reed-sensor LED board against a UCI engine.
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Path to a UCI engine binary. Overrides the config file.
    ///
    /// Without an engine, only human vs. human games can be played.
    #[arg(short, long)]
    pub engine: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Confirm moves as soon as the board shows them finished.
    #[arg(short, long, default_value = "false")]
    pub auto_confirm: bool,

    /// Log detector and history decisions, and render the board on failed confirmations.
    #[arg(short, long, default_value = "false")]
    pub debug: bool,

    /// Publish every move as JSON to this URL.
    #[arg(long)]
    pub notify_url: Option<String>,

    /// Engine thinking time per move, in milliseconds. Overrides the config file.
    #[arg(long)]
    pub movetime: Option<u64>,
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.engine {
            config.engine.path = Some(path.clone());
        }
        if let Some(movetime) = self.movetime {
            config.engine.movetime_ms = movetime;
        }
    }
}

/// A command typed into the console stand-in for the board.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    rename_all = "lower",
    override_usage("<COMMAND>")
)]
pub enum ConsoleCommand {
    /// Flip the sensor reading of each square, as if a piece was lifted or set down.
    #[command(alias = "t")]
    Toggle {
        #[arg(required = true)]
        squares: Vec<Square>,
    },

    /// Lift whatever stands on a square.
    Lift { square: Square },

    /// Set a piece down on a square.
    Place { square: Square },

    /// Carry a piece from one square to another in a single step.
    #[command(aliases = ["m", "move"])]
    Play { mv: Move },

    /// Put every piece in its starting square.
    Setup,

    /// Remove every piece from the board.
    Clear,

    /// Press the button closest to White.
    #[command(alias = "w")]
    White,

    /// Press the button closest to Black.
    #[command(alias = "b")]
    Black,

    /// Press the confirm button.
    #[command(alias = "c")]
    Confirm,

    /// Press the back button.
    #[command(aliases = ["x", "undo"])]
    Back,

    /// Hold all four buttons until the game resets.
    Reset,

    /// Show the sensor grid, the lit LEDs, and the current phase.
    #[command(alias = "d")]
    Display,

    /// Quit.
    #[command(aliases = ["q", "exit"])]
    Quit,
}

impl ConsoleCommand {
    /// The button this command presses, if it presses one.
    pub fn button(&self) -> Option<Button> {
        match self {
            Self::White => Some(Button::White),
            Self::Black => Some(Button::Black),
            Self::Confirm => Some(Button::Confirm),
            Self::Back => Some(Button::Back),
            _ => None,
        }
    }
}

impl FromStr for ConsoleCommand {
    type Err = clap::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
