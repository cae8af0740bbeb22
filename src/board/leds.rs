/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::bail;

use super::{File, Rank, Snapshot, Square};
use crate::{Move, Promotion};

/// The board's 16 indicator LEDs: one beside each file and one beside each rank.
///
/// A square is indicated by lighting both its file and its rank LED.
/// Bits `0..8` hold files `a..h` and bits `8..16` hold ranks `1..8`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Leds(u16);

impl Leds {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0xFFFF);

    /// Mode selection: human vs. engine.
    pub const MODE_ENGINE: Self = Self::rank(Rank::FOUR);
    /// Mode selection: human vs. human.
    pub const MODE_HUMAN: Self = Self::rank(Rank::FIVE);

    /// Color selection: the human plays White.
    pub const COLOR_WHITE: Self = Self::rank(Rank::ONE).union(Self::rank(Rank::TWO));
    /// Color selection: the human plays Black.
    pub const COLOR_BLACK: Self = Self::rank(Rank::SEVEN).union(Self::rank(Rank::EIGHT));

    /// The four files used as the promotion menu.
    const PROMOTION_MENU: Self = Self(0b0000_1111);

    #[inline(always)]
    pub const fn file(file: File) -> Self {
        Self(1 << file.0)
    }

    #[inline(always)]
    pub const fn rank(rank: Rank) -> Self {
        Self(1 << (rank.0 + 8))
    }

    /// Lights the file and rank LEDs of `square`.
    #[inline(always)]
    pub const fn square(square: Square) -> Self {
        Self::file(square.file()).union(Self::rank(square.rank()))
    }

    #[inline(always)]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline(always)]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[inline(always)]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Difficulty bar: ranks `1..=level` are lit.
    pub fn difficulty(level: u8) -> Self {
        Rank::iter()
            .take(level as usize)
            .fold(Self::NONE, |leds, rank| leds.union(Self::rank(rank)))
    }

    /// Lights every file whose squares already match the starting arrangement.
    pub fn setup(snapshot: &Snapshot) -> Self {
        File::iter()
            .filter(|&file| snapshot.file_matches_setup(file))
            .fold(Self::NONE, |leds, file| leds.union(Self::file(file)))
    }

    /// One frame of a blinking move: the origin alone when `on`, both endpoints otherwise.
    pub fn move_blink(mv: &Move, on: bool) -> Self {
        if on {
            Self::square(mv.from())
        } else {
            Self::square(mv.from()).union(Self::square(mv.to()))
        }
    }

    /// Indicates a finished move by lighting its destination.
    pub fn move_done(mv: &Move) -> Self {
        Self::square(mv.to())
    }

    /// One frame of the promotion menu: files `a..d` lit, with the selected piece's file dark when `on`.
    pub fn promotion_menu(choice: Promotion, on: bool) -> Self {
        if on {
            Self::PROMOTION_MENU.without(Self::file(choice.menu_file()))
        } else {
            Self::PROMOTION_MENU
        }
    }

    /// The start-up animation: ranks grow outward from the middle, then files fill from `a` to `h`.
    pub fn startup_sequence() -> Vec<Self> {
        let mut frames = vec![Self::NONE];

        let mut ranks = Self::NONE;
        for (low, high) in [(3, 4), (2, 5), (1, 6), (0, 7)] {
            ranks = ranks
                .union(Self::rank(Rank(low)))
                .union(Self::rank(Rank(high)));
            frames.push(ranks);
        }

        let mut lit = ranks;
        for file in File::iter() {
            lit = lit.union(Self::file(file));
            frames.push(lit);
        }

        frames
    }
}

impl FromStr for Leds {
    type Err = anyhow::Error;
    /// Parses a string of LED labels, such as `"e2"` or `"12345678abcdefgh"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut leds = Self::NONE;
        for c in s.chars() {
            leds = match c {
                'a'..='h' | 'A'..='H' => leds.union(Self::file(File::from_char(c)?)),
                '1'..='8' => leds.union(Self::rank(Rank::from_char(c)?)),
                c if c.is_whitespace() => leds,
                _ => bail!("Invalid LED label {c:?} in {s:?}"),
            };
        }
        Ok(leds)
    }
}

impl fmt::Display for Leds {
    /// Lists the lit LEDs as labels, files first: `"e2"`, `"abcd"`, `""`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in File::iter() {
            if self.contains(Self::file(file)) {
                write!(f, "{file}")?;
            }
        }
        for rank in Rank::iter() {
            if self.contains(Self::rank(rank)) {
                write!(f, "{rank}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Leds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Leds({:?})", self.to_string())
    }
}
