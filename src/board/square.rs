/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

/// Represents one of the 64 squares of the physical board.
///
/// Internally, squares are stored as `rank * 8 + file`, so `a1` is `0` and `h8` is `63`.
///
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    pub const A1: Self = Self::new(File::A, Rank::ONE);
    pub const C1: Self = Self::new(File::C, Rank::ONE);
    pub const D1: Self = Self::new(File::D, Rank::ONE);
    pub const E1: Self = Self::new(File::E, Rank::ONE);
    pub const F1: Self = Self::new(File::F, Rank::ONE);
    pub const G1: Self = Self::new(File::G, Rank::ONE);
    pub const H1: Self = Self::new(File::H, Rank::ONE);

    pub const A8: Self = Self::new(File::A, Rank::EIGHT);
    pub const C8: Self = Self::new(File::C, Rank::EIGHT);
    pub const D8: Self = Self::new(File::D, Rank::EIGHT);
    pub const E8: Self = Self::new(File::E, Rank::EIGHT);
    pub const F8: Self = Self::new(File::F, Rank::EIGHT);
    pub const G8: Self = Self::new(File::G, Rank::EIGHT);
    pub const H8: Self = Self::new(File::H, Rank::EIGHT);

    pub const COUNT: usize = 64;

    /// Creates a new [`Square`] from the provided [`File`] and [`Rank`].
    ///
    /// # Example
    /// ```
    /// # use reedchess::{Square, File, Rank};
    /// let e1 = Square::new(File::E, Rank::ONE);
    /// assert_eq!(e1, Square::E1);
    /// ```
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file.0 | rank.0 << 3)
    }

    /// Returns an iterator over all squares, from `a1` to `h8`.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Fetches the [`File`] of this [`Square`].
    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 & 0b111)
    }

    /// Fetches the [`Rank`] of this [`Square`].
    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Obtain the inner value as a `usize`, for indexing.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Creates a [`Square`] from its two-character coordinate text, such as `"e2"`.
    ///
    /// # Example
    /// ```
    /// # use reedchess::Square;
    /// assert_eq!(Square::from_uci("e8").unwrap(), Square::E8);
    /// assert!(Square::from_uci("z0").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid Square string: must contain exactly 2 characters. Got {square:?}");
        };

        Ok(Self::new(File::from_char(file)?, Rank::from_char(rank)?))
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

/// Represents one of the eight files (columns) of the board, `a` through `h`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct File(pub(crate) u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    pub const COUNT: usize = 8;

    /// Returns an iterator over all files, `a` through `h`.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    pub fn from_char(file: char) -> Result<Self> {
        match file {
            'a'..='h' => Ok(Self(file as u8 - b'a')),
            'A'..='H' => Ok(Self(file as u8 - b'A')),
            _ => bail!("Invalid char for File: Must be between [a, h]. Got {file:?}"),
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'a') as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Represents one of the eight ranks (rows) of the board, `1` through `8`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Rank(pub(crate) u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    pub const COUNT: usize = 8;

    /// Returns an iterator over all ranks, `1` through `8`.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    pub fn from_char(rank: char) -> Result<Self> {
        let rank_int = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .context(format!(
                "Invalid char for Rank: Must be between [1, 8]. Got {rank:?}"
            ))?;

        Ok(Self(rank_int as u8 - 1))
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'1') as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
