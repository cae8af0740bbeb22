/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::debug;

use crate::{Move, Promotion, Snapshot, Square};

/// What the [`Detector`] made of the latest sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Nothing changed since the previous reading.
    NoChange,

    /// A square changed with nothing pending; it is now the origin of a new candidate.
    Origin(Square),

    /// A second square changed and one ordering of the two squares is legal.
    Candidate(Move),

    /// The pending candidate was discarded: no ordering was legal, or the origin was restored.
    Cleared,

    /// A square changed while a full candidate was already pending.
    Ignored(Square),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Origin(Square),
    Move(Move),
}

/// Turns successive sensor readings into a candidate move.
///
/// Only one changed square is considered per reading (see [`Snapshot::last_difference`]).
/// The first change marks the origin; the second forms a two-square candidate, which is
/// resolved against the engine by trying both orderings, each with and without a queen
/// promotion appended.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    prev: Snapshot,
    pending: Option<Pending>,
}

impl Detector {
    /// Creates a new [`Detector`] with `snapshot` as the reference reading and nothing pending.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            prev: snapshot,
            pending: None,
        }
    }

    /// Replaces the reference reading and drops anything pending.
    pub fn reset(&mut self, snapshot: Snapshot) {
        *self = Self::new(snapshot);
    }

    /// Drops anything pending, keeping the reference reading.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// The reading every new snapshot is compared against.
    #[inline(always)]
    pub fn previous(&self) -> Snapshot {
        self.prev
    }

    /// The origin square, if only one square has been resolved so far.
    pub fn origin(&self) -> Option<Square> {
        match self.pending {
            Some(Pending::Origin(square)) => Some(square),
            _ => None,
        }
    }

    /// The full two-square candidate, if one has been resolved.
    pub fn candidate(&self) -> Option<Move> {
        match self.pending {
            Some(Pending::Move(mv)) => Some(mv),
            _ => None,
        }
    }

    /// Returns `true` if anything, even just an origin, is pending.
    #[inline(always)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feeds a fresh reading into the detector.
    ///
    /// `is_legal` is consulted for each ordering of a two-square candidate. The candidate that
    /// is stored never carries a promotion; whether it needs one is decided at confirmation.
    pub fn observe(
        &mut self,
        curr: Snapshot,
        mut is_legal: impl FnMut(&Move) -> bool,
    ) -> Detection {
        let Some(square) = self.prev.last_difference(&curr) else {
            return Detection::NoChange;
        };
        self.prev = curr;

        let pending = self.pending;
        let detection = match pending {
            None => {
                self.pending = Some(Pending::Origin(square));
                Detection::Origin(square)
            }

            // The lifted piece was set back down
            Some(Pending::Origin(origin)) if origin == square => {
                self.pending = None;
                Detection::Cleared
            }

            Some(Pending::Origin(origin)) => {
                let direct = Move::new(origin, square);
                let opposite = direct.reversed();

                let mut legal =
                    |mv: Move| is_legal(&mv) || is_legal(&mv.with_promotion(Promotion::Queen));

                if legal(direct) {
                    self.pending = Some(Pending::Move(direct));
                    Detection::Candidate(direct)
                } else if legal(opposite) {
                    self.pending = Some(Pending::Move(opposite));
                    Detection::Candidate(opposite)
                } else {
                    self.pending = None;
                    Detection::Cleared
                }
            }

            Some(Pending::Move(_)) => Detection::Ignored(square),
        };

        debug!("field changed: {square} -> {detection:?}");
        detection
    }
}

/// King home square, king destination, and the squares that must read (vacant, occupied, occupied, vacant).
const CASTLES: [(Square, Square, [Square; 4]); 4] = [
    (Square::E1, Square::G1, [Square::E1, Square::F1, Square::G1, Square::H1]),
    (Square::E1, Square::C1, [Square::E1, Square::D1, Square::C1, Square::A1]),
    (Square::E8, Square::G8, [Square::E8, Square::F8, Square::G8, Square::H8]),
    (Square::E8, Square::C8, [Square::E8, Square::D8, Square::C8, Square::A8]),
];

fn castle_pattern(mv: &Move, history: &[Move]) -> Option<[Square; 4]> {
    CASTLES
        .iter()
        .find(|(from, to, _)| mv.from() == *from && mv.to() == *to)
        .filter(|(king, _, _)| history.iter().all(|prior| prior.from() != *king))
        .map(|(_, _, pattern)| *pattern)
}

/// Returns `true` if `mv` travels between a king's home square and one of its castling squares,
/// and no earlier move in `history` left that home square.
///
/// # Example
/// ```
/// # use reedchess::{is_castle, Move};
/// let castle: Move = "e1g1".parse().unwrap();
/// assert!(is_castle(&castle, &[]));
/// assert!(!is_castle(&castle, &["e2e4".parse().unwrap(), "e1e2".parse().unwrap()]));
/// ```
pub fn is_castle(mv: &Move, history: &[Move]) -> bool {
    castle_pattern(mv, history).is_some()
}

/// Returns `true` if `snapshot` shows `mv` as physically carried out.
///
/// An ordinary move is complete once its origin reads vacant and its destination reads occupied.
/// A castle needs its four squares in the exact post-castle arrangement: king home vacant,
/// rook destination occupied, king destination occupied, rook home vacant.
pub fn is_complete(mv: &Move, snapshot: &Snapshot, history: &[Move]) -> bool {
    match castle_pattern(mv, history) {
        Some([king_home, rook_to, king_to, rook_home]) => {
            snapshot.is_vacant(king_home)
                && snapshot.is_occupied(rook_to)
                && snapshot.is_occupied(king_to)
                && snapshot.is_vacant(rook_home)
        }
        None => snapshot.is_vacant(mv.from()) && snapshot.is_occupied(mv.to()),
    }
}
