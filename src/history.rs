/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Result;
use tracing::debug;

use crate::{Engine, Move, Snapshot};

/// The accepted moves of a game, alongside the sensor reading taken after each of them.
///
/// The first snapshot is the board as it stood after setup, so there is always exactly one more
/// snapshot than there are moves. Both lists only ever change together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    moves: Vec<Move>,
    snapshots: Vec<Snapshot>,
}

impl History {
    /// Starts a new history from the board as it stands after setup.
    pub fn new(setup: Snapshot) -> Self {
        Self {
            moves: Vec::with_capacity(128),
            snapshots: vec![setup],
        }
    }

    /// Forgets every move and starts over from `setup`.
    pub fn reset(&mut self, setup: Snapshot) {
        self.moves.clear();
        self.snapshots.clear();
        self.snapshots.push(setup);
    }

    /// Every accepted move, oldest first.
    #[inline(always)]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Every recorded sensor reading, oldest first.
    #[inline(always)]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// The most recently accepted move.
    #[inline(always)]
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// The reading recorded after the most recent move (or after setup).
    #[inline(always)]
    pub fn current(&self) -> Snapshot {
        // There is always at least one snapshot
        self.snapshots[self.snapshots.len() - 1]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Records `mv` and the reading taken once it was carried out.
    pub fn commit(&mut self, mv: Move, snapshot: Snapshot) {
        self.moves.push(mv);
        self.snapshots.push(snapshot);
        debug!("committed {mv}: {} moves played", self.moves.len());
    }

    /// The reading the board must return to for the last move to be taken back.
    ///
    /// Returns `None` if no move has been played.
    pub fn begin_undo(&self) -> Option<Snapshot> {
        self.snapshots.len().checked_sub(2).map(|i| self.snapshots[i])
    }

    /// Takes back the last move if `observed` matches [`History::begin_undo`].
    ///
    /// On a match, the last move and reading are dropped and `engine` is told about the shorter
    /// move list. Otherwise nothing changes and `Ok(false)` is returned.
    pub fn confirm_undo(&mut self, observed: Snapshot, engine: &mut impl Engine) -> Result<bool> {
        if self.begin_undo() != Some(observed) {
            debug!("undo target not reached:\n{observed}");
            return Ok(false);
        }

        self.snapshots.pop();
        if let Some(mv) = self.moves.pop() {
            debug!("took back {mv}: {} moves played", self.moves.len());
        }
        engine.set_position(&self.moves)?;

        Ok(true)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Snapshot::SETUP)
    }
}
