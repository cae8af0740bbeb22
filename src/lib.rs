/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Squares, sensor readings, LEDs, and the interface to the board's hardware.
mod board;

/// Command-line arguments and the console command grammar.
mod cli;

/// Timings, difficulty bounds, and engine settings.
mod config;

/// Terminal stand-in for the hardware.
mod console;

/// Turns sensor changes into candidate moves.
mod detector;

/// The interface to the chess engine, and its implementations.
mod engine;

/// Accepted moves and the readings taken after them.
mod history;

/// Moves in coordinate notation.
mod moves;

/// Optional channel for publishing moves.
mod notify;

/// The turn protocol.
mod session;

pub use board::*;
pub use cli::*;
pub use config::*;
pub use console::*;
pub use detector::*;
pub use engine::*;
pub use history::*;
pub use moves::*;
pub use notify::*;
pub use session::*;
