/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Interface to the sensor and LED hardware.
mod io;

/// The 16 indicator LEDs and the patterns shown on them.
mod leds;

/// In-memory stand-in for the hardware.
mod simulated;

/// 64-square occupancy readings.
mod snapshot;

/// Files, ranks, and squares.
mod square;

pub use io::*;
pub use leds::*;
pub use simulated::*;
pub use snapshot::*;
pub use square::*;
