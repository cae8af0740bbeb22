/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, time::Duration};

use super::{Leds, Snapshot};

/// One of the four push buttons along the edge of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Closest to White's side.
    White,
    /// Middle, close to White's side.
    Confirm,
    /// Middle, close to Black's side.
    Back,
    /// Closest to Black's side.
    Black,
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::White => "white",
            Self::Confirm => "confirm",
            Self::Back => "back",
            Self::Black => "black",
        };
        write!(f, "{name}")
    }
}

/// The sensor and LED hardware, as seen by the turn session.
///
/// Implementations own debouncing and register access; every method here must return promptly
/// except [`BoardIo::pause`], which is an intentional blocking hold.
pub trait BoardIo {
    /// Captures the current reading of all 64 square sensors.
    fn read_snapshot(&mut self) -> Snapshot;

    /// Replaces the lit LEDs with `leds`.
    fn set_leds(&mut self, leds: Leds);

    /// Returns the next debounced button press, if one occurred since the last poll.
    fn poll_button(&mut self) -> Option<Button>;

    /// Returns `true` while all four buttons are physically held down.
    fn all_buttons_held(&mut self) -> bool;

    /// Blocks for `duration`. Used only for fixed UI holds, never inside normal polling.
    fn pause(&mut self, duration: Duration);
}
