/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::Move;

/// Rules and mate detection, backed by the `chessie` move generator.
mod referee;

/// A chess engine running as a separate process, spoken to over UCI.
mod uci;

pub use referee::*;
pub use uci::*;

/// The session's view of a chess engine.
///
/// Legality and evaluation are authoritative: the session never second-guesses them.
/// Every method that takes a `position` expects the full list of moves played from the
/// standard starting position.
pub trait Engine {
    /// Returns `true` if `mv` may be played after `position`.
    fn is_legal(&mut self, mv: &Move, position: &[Move]) -> bool;

    /// Asks the engine what it would play after `position`.
    fn best_move(&mut self, position: &[Move]) -> Result<Move>;

    /// Describes the position reached after `position`.
    fn evaluate(&mut self, position: &[Move]) -> Result<Evaluation>;

    /// Tells the engine which moves have been played so far.
    fn set_position(&mut self, moves: &[Move]) -> Result<()>;

    /// Sets the playing strength.
    fn configure(&mut self, difficulty: Difficulty) -> Result<()>;

    /// Forgets the current game, returning to the starting position.
    fn new_game(&mut self) -> Result<()>;

    /// The current position in Forsyth-Edwards Notation.
    fn fen(&self) -> String;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn is_legal(&mut self, mv: &Move, position: &[Move]) -> bool {
        (**self).is_legal(mv, position)
    }

    fn best_move(&mut self, position: &[Move]) -> Result<Move> {
        (**self).best_move(position)
    }

    fn evaluate(&mut self, position: &[Move]) -> Result<Evaluation> {
        (**self).evaluate(position)
    }

    fn set_position(&mut self, moves: &[Move]) -> Result<()> {
        (**self).set_position(moves)
    }

    fn configure(&mut self, difficulty: Difficulty) -> Result<()> {
        (**self).configure(difficulty)
    }

    fn new_game(&mut self) -> Result<()> {
        (**self).new_game()
    }

    fn fen(&self) -> String {
        (**self).fen()
    }
}

/// What the engine has to say about a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Evaluation {
    /// The side to move has been checkmated.
    pub checkmate: bool,

    /// The side to move has no legal moves but is not in check.
    pub stalemate: bool,

    /// The side to move is in check.
    pub in_check: bool,

    /// White is the side to move.
    pub white_to_move: bool,
}

impl Evaluation {
    /// Returns `true` if the game cannot continue.
    #[inline(always)]
    pub const fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate
    }
}

/// The engine's playing strength.
///
/// Level `0` leaves the engine's strength unconstrained (at its lowest skill level).
/// Every level above that caps it at a rating of `level * 100 + 600`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(u8);

impl Difficulty {
    #[inline(always)]
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    #[inline(always)]
    pub const fn level(&self) -> u8 {
        self.0
    }

    /// The rating cap for this level, or `None` if strength should not be limited.
    ///
    /// # Example
    /// ```
    /// # use reedchess::Difficulty;
    /// assert_eq!(Difficulty::new(0).elo(), None);
    /// assert_eq!(Difficulty::new(3).elo(), Some(900));
    /// ```
    pub const fn elo(&self) -> Option<u16> {
        match self.0 {
            0 => None,
            level => Some(level as u16 * 100 + 600),
        }
    }

    /// One level up, stopping at `max`.
    pub fn raise(self, max: u8) -> Self {
        Self(self.0.saturating_add(1).min(max))
    }

    /// One level down, stopping at `min`.
    pub fn lower(self, min: u8) -> Self {
        Self(self.0.saturating_sub(1).max(min))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elo() {
            Some(elo) => write!(f, "level {} (elo {elo})", self.0),
            None => write!(f, "level {} (unlimited)", self.0),
        }
    }
}

/// Rules from a [`Referee`], moves from an external [`UciProcess`].
///
/// Both halves are kept on the same position.
#[derive(Debug)]
pub struct Adapter {
    referee: Referee,
    player: UciProcess,
}

impl Adapter {
    pub fn new(player: UciProcess) -> Self {
        Self {
            referee: Referee::default(),
            player,
        }
    }
}

impl Engine for Adapter {
    fn is_legal(&mut self, mv: &Move, position: &[Move]) -> bool {
        self.referee.is_legal(mv, position)
    }

    fn best_move(&mut self, position: &[Move]) -> Result<Move> {
        self.player.best_move(position)
    }

    fn evaluate(&mut self, position: &[Move]) -> Result<Evaluation> {
        self.referee.evaluate(position)
    }

    fn set_position(&mut self, moves: &[Move]) -> Result<()> {
        self.referee.set_position(moves)?;
        self.player.set_position(moves)
    }

    fn configure(&mut self, difficulty: Difficulty) -> Result<()> {
        self.player.configure(difficulty)
    }

    fn new_game(&mut self) -> Result<()> {
        self.referee.new_game()?;
        self.player.new_game()
    }

    fn fen(&self) -> String {
        self.referee.fen()
    }
}
