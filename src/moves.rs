/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use crate::{File, Square};

/// The piece a pawn is promoted to.
///
/// Variants are declared in the order the promotion menu cycles through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Bishop,
    Knight,
    Rook,
}

impl Promotion {
    pub const ALL: [Self; 4] = [Self::Queen, Self::Bishop, Self::Knight, Self::Rook];

    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            'r' => Ok(Self::Rook),
            _ => bail!("Invalid promotion piece {c:?}: must be one of [q, b, n, r]"),
        }
    }

    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Queen => 'q',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Rook => 'r',
        }
    }

    /// The next choice in the menu, wrapping from Rook back to Queen.
    pub const fn next(self) -> Self {
        match self {
            Self::Queen => Self::Bishop,
            Self::Bishop => Self::Knight,
            Self::Knight => Self::Rook,
            Self::Rook => Self::Queen,
        }
    }

    /// The previous choice in the menu, wrapping from Queen back to Rook.
    pub const fn prev(self) -> Self {
        match self {
            Self::Queen => Self::Rook,
            Self::Bishop => Self::Queen,
            Self::Knight => Self::Bishop,
            Self::Rook => Self::Knight,
        }
    }

    /// The file LED that stands for this piece in the promotion menu.
    pub const fn menu_file(&self) -> File {
        match self {
            Self::Queen => File::D,
            Self::Bishop => File::C,
            Self::Knight => File::B,
            Self::Rook => File::A,
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A move in coordinate notation: `from`, `to`, and an optional promotion piece (`e7e8q`).
///
/// Nothing about a [`Move`] says it is legal; that is for the engine to decide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
}

impl Move {
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Copies `self` with the provided promotion piece appended.
    #[inline(always)]
    pub const fn with_promotion(self, promotion: Promotion) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// The two-square footprint of this move, with any promotion dropped.
    #[inline(always)]
    pub const fn base(self) -> Self {
        Self::new(self.from, self.to)
    }

    /// The same two squares traveled in the opposite direction.
    ///
    /// # Example
    /// ```
    /// # use reedchess::Move;
    /// let mv: Move = "a2a4".parse().unwrap();
    /// assert_eq!(mv.reversed().to_string(), "a4a2");
    /// ```
    #[inline(always)]
    pub const fn reversed(self) -> Self {
        Self::new(self.to, self.from)
    }

    /// Parses a move in coordinate notation, such as `e2e4` or `e7e8q`.
    pub fn from_uci(uci: &str) -> Result<Self> {
        let from = uci
            .get(0..2)
            .ok_or(anyhow!("Move str must contain a `from` square. Got {uci:?}"))?;
        let to = uci
            .get(2..4)
            .ok_or(anyhow!("Move str must contain a `to` square. Got {uci:?}"))?;

        let mv = Self::new(from.parse()?, to.parse()?);

        let mut rest = uci[4..].chars();
        match (rest.next(), rest.next()) {
            (None, _) => Ok(mv),
            (Some(c), None) => Ok(mv.with_promotion(Promotion::from_char(c)?)),
            _ => bail!("Move str must be 4 or 5 characters long. Got {uci:?}"),
        }
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
