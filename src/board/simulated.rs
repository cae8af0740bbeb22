/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::VecDeque, thread, time::Duration};

use super::{BoardIo, Button, Leds, Snapshot, Square};
use crate::Move;

/// A single change a person makes to the board between two readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Lift(Square),
    Place(Square),
}

/// An in-memory board.
///
/// Pieces are moved by toggling squares, and buttons are queued presses. Pauses are accumulated
/// rather than slept, and every LED update is recorded so it can be inspected afterwards.
/// A board built [`SimulatedBoard::in_real_time`] sleeps through its pauses and keeps no log.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBoard {
    snapshot: Snapshot,
    leds: Leds,
    led_log: Vec<Leds>,
    buttons: VecDeque<Button>,
    held: bool,
    paused: Duration,
    real_time: bool,
}

impl SimulatedBoard {
    /// Creates a board with the provided sensor readings and all LEDs off.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    /// Makes [`BoardIo::pause`] actually sleep, and stops recording LED updates.
    pub fn in_real_time(mut self) -> Self {
        self.real_time = true;
        self
    }

    /// Creates a board with every piece in its starting square.
    pub fn with_setup() -> Self {
        Self::new(Snapshot::SETUP)
    }

    #[inline(always)]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
    }

    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    /// Toggles the piece presence at the given square.
    pub fn toggle(&mut self, square: Square) {
        self.snapshot.toggle(square);
    }

    /// Removes whatever stands on `square`.
    pub fn lift(&mut self, square: Square) {
        self.snapshot = self.snapshot.with(square, false);
    }

    /// Puts a piece down on `square`.
    pub fn place(&mut self, square: Square) {
        self.snapshot = self.snapshot.with(square, true);
    }

    /// The steps that carry out `mv` by hand, one sensor change each.
    ///
    /// On a capture the victim comes off the board before the attacker is lifted.
    pub fn steps(&self, mv: &Move) -> Vec<Step> {
        if self.snapshot.is_occupied(mv.to()) {
            vec![
                Step::Lift(mv.to()),
                Step::Lift(mv.from()),
                Step::Place(mv.to()),
            ]
        } else {
            vec![Step::Lift(mv.from()), Step::Place(mv.to())]
        }
    }

    pub fn apply(&mut self, step: Step) {
        match step {
            Step::Lift(square) => self.lift(square),
            Step::Place(square) => self.place(square),
        }
    }

    /// Queues a button press for the next poll.
    pub fn press(&mut self, button: Button) {
        self.buttons.push_back(button);
    }

    /// Holds (or releases) all four buttons at once.
    pub fn hold_all(&mut self, held: bool) {
        self.held = held;
    }

    /// The LEDs currently lit.
    #[inline(always)]
    pub fn leds(&self) -> Leds {
        self.leds
    }

    /// Every LED pattern written so far, oldest first.
    ///
    /// Always empty on a board running [`SimulatedBoard::in_real_time`].
    pub fn led_log(&self) -> &[Leds] {
        &self.led_log
    }

    /// Total time spent in blocking UI holds.
    pub fn paused(&self) -> Duration {
        self.paused
    }
}

impl BoardIo for SimulatedBoard {
    fn read_snapshot(&mut self) -> Snapshot {
        self.snapshot
    }

    fn set_leds(&mut self, leds: Leds) {
        self.leds = leds;
        if !self.real_time {
            self.led_log.push(leds);
        }
    }

    fn poll_button(&mut self) -> Option<Button> {
        self.buttons.pop_front()
    }

    fn all_buttons_held(&mut self) -> bool {
        self.held
    }

    fn pause(&mut self, duration: Duration) {
        self.paused += duration;
        if self.real_time {
            thread::sleep(duration);
        }
    }
}
