/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{File, Rank, Square};

/// An instantaneous reading of all 64 square sensors.
///
/// A set bit means the square reads *occupied* (a magnet is over the reed switch),
/// a cleared bit means it reads *vacant*. Bit `n` belongs to the square with index `n`,
/// so the first rank lives in the low byte:
/// ```text
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 11111111
/// ```
///
/// Two snapshots are equal iff every one of the 64 readings matches.
/// A snapshot says nothing about whether a move is finished; a piece may be mid-air.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Snapshot(pub(crate) u64);

impl Snapshot {
    /// No pieces on the board.
    pub const EMPTY: Self = Self(0);

    /// Occupancy of the standard starting position: ranks 1, 2, 7, and 8 are occupied.
    pub const SETUP: Self = Self(0xFFFF_0000_0000_FFFF);

    /// Constructs a new [`Snapshot`] from a raw bit pattern.
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Constructs a [`Snapshot`] where only the provided squares are occupied.
    pub fn from_squares(squares: impl IntoIterator<Item = Square>) -> Self {
        squares
            .into_iter()
            .fold(Self::EMPTY, |snapshot, square| snapshot.with(square, true))
    }

    /// Returns the raw bit pattern of this [`Snapshot`].
    #[inline(always)]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Returns `true` if `square` reads occupied.
    #[inline(always)]
    pub const fn is_occupied(&self, square: Square) -> bool {
        self.0 & (1 << square.index()) != 0
    }

    /// Returns `true` if `square` reads vacant.
    #[inline(always)]
    pub const fn is_vacant(&self, square: Square) -> bool {
        !self.is_occupied(square)
    }

    /// Returns a copy of this [`Snapshot`] with `square` set to the provided reading.
    #[inline(always)]
    pub const fn with(self, square: Square, occupied: bool) -> Self {
        if occupied {
            Self(self.0 | 1 << square.index())
        } else {
            Self(self.0 & !(1 << square.index()))
        }
    }

    /// Flips the reading of `square`, as though a piece was lifted or set down.
    #[inline(always)]
    pub fn toggle(&mut self, square: Square) {
        self.0 ^= 1 << square.index();
    }

    /// Returns the number of squares reading occupied.
    #[inline(always)]
    pub const fn population(&self) -> u32 {
        self.0.count_ones()
    }

    /// Finds the square whose reading differs between `self` and `other`.
    ///
    /// Squares are scanned file by file (`a1, a2, ..., a8, b1, ...`) and the *last* differing
    /// square in that order is reported, so at most one change is surfaced per call.
    ///
    /// # Example
    /// ```
    /// # use reedchess::{Snapshot, Square};
    /// let after = Snapshot::SETUP.with("e2".parse().unwrap(), false);
    /// assert_eq!(Snapshot::SETUP.last_difference(&after), Some("e2".parse().unwrap()));
    /// assert_eq!(Snapshot::SETUP.last_difference(&Snapshot::SETUP), None);
    /// ```
    pub fn last_difference(&self, other: &Self) -> Option<Square> {
        let diff = self.0 ^ other.0;
        if diff == 0 {
            return None;
        }

        File::iter()
            .flat_map(|file| Rank::iter().map(move |rank| Square::new(file, rank)))
            .filter(|square| diff & (1 << square.index()) != 0)
            .last()
    }

    /// Returns `true` if every reading matches [`Snapshot::SETUP`].
    #[inline(always)]
    pub fn matches_setup(&self) -> bool {
        *self == Self::SETUP
    }

    /// Returns `true` if every square of `file` matches its reading in [`Snapshot::SETUP`].
    pub fn file_matches_setup(&self, file: File) -> bool {
        Rank::iter().all(|rank| {
            let square = Square::new(file, rank);
            self.is_occupied(square) == Self::SETUP.is_occupied(square)
        })
    }
}

impl fmt::Display for Snapshot {
    /// Renders the sensor grid with White at the bottom; `x` marks an occupied square.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for file in File::iter() {
            write!(f, " {file}  ")?;
        }
        writeln!(f)?;
        writeln!(f, "+---+---+---+---+---+---+---+---+")?;

        for rank in Rank::iter().rev() {
            write!(f, "|")?;
            for file in File::iter() {
                let occupant = if self.is_occupied(Square::new(file, rank)) {
                    'x'
                } else {
                    ' '
                };
                write!(f, " {occupant} |")?;
            }
            writeln!(f, " {rank}")?;
            writeln!(f, "+---+---+---+---+---+---+---+---+")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot({:#018X})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_setup_occupancy() {
        for square in Square::iter() {
            let expected = matches!(square.rank().char(), '1' | '2' | '7' | '8');
            assert_eq!(Snapshot::SETUP.is_occupied(square), expected, "{square}");
        }
        assert_eq!(Snapshot::SETUP.population(), 32);
        assert!(Snapshot::SETUP.matches_setup());
    }

    #[test]
    fn test_equality_is_total() {
        let a = Snapshot::SETUP;
        let b = Snapshot::new(Snapshot::SETUP.bits());
        assert_eq!(a, b);

        // Any single differing square breaks equality
        for square in Square::iter() {
            let mut c = a;
            c.toggle(square);
            assert_ne!(a, c, "{square}");
            assert!(!c.matches_setup());
        }
    }

    #[test]
    fn test_last_difference_reports_one_square() {
        let before = Snapshot::SETUP;
        let mut after = before;
        after.toggle(sq("e2"));
        assert_eq!(before.last_difference(&after), Some(sq("e2")));

        // With several changes, the last in file-major order wins
        after.toggle(sq("a4"));
        after.toggle(sq("d8"));
        assert_eq!(before.last_difference(&after), Some(sq("e2")));

        after.toggle(sq("h1"));
        assert_eq!(before.last_difference(&after), Some(sq("h1")));

        // Within a single file, the highest rank is last
        let mut file_only = before;
        file_only.toggle(sq("c2"));
        file_only.toggle(sq("c5"));
        assert_eq!(before.last_difference(&file_only), Some(sq("c5")));
    }

    #[test]
    fn test_file_matches_setup() {
        let mut snapshot = Snapshot::SETUP;
        snapshot.toggle(sq("d7"));
        snapshot.toggle(sq("f4"));

        let matching = File::iter()
            .filter(|&file| snapshot.file_matches_setup(file))
            .map(|file| file.char())
            .collect::<String>();
        assert_eq!(matching, "abcegh");
    }

    #[test]
    fn test_with_and_from_squares() {
        let snapshot = Snapshot::from_squares([sq("a1"), sq("h8")]);
        assert!(snapshot.is_occupied(sq("a1")));
        assert!(snapshot.is_occupied(sq("h8")));
        assert!(snapshot.is_vacant(sq("e4")));
        assert_eq!(snapshot.with(sq("a1"), false).population(), 1);
        assert_eq!(snapshot.with(sq("a1"), true), snapshot);
    }

    #[test]
    fn test_display_marks_occupied_squares() {
        let rendered = Snapshot::from_squares([sq("a8")]).to_string();
        let eighth = rendered.lines().nth(2).unwrap();
        assert_eq!(eighth, "| x |   |   |   |   |   |   |   | 8");
    }
}
