/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{bail, Context, Result};
use chessie::Game;

use super::{Difficulty, Engine, Evaluation};
use crate::Move;

/// Converts one of our moves into a legal `chessie` move on `game`, if there is one.
fn legal_move(game: &Game, mv: &Move) -> Option<chessie::Move> {
    let parsed = chessie::Move::from_uci(game, &mv.to_string()).ok()?;
    game.get_legal_moves()
        .into_iter()
        .any(|legal| legal == parsed)
        .then_some(parsed)
}

/// Plays `moves` one-by-one from the standard starting position.
fn replay(moves: &[Move]) -> Result<Game> {
    let mut game = Game::default();

    for (ply, mv) in moves.iter().enumerate() {
        let Some(legal) = legal_move(&game, mv) else {
            bail!("Move {mv} (ply {ply}) is illegal in position {:?}", game.to_fen());
        };
        game.make_move(legal);
    }

    Ok(game)
}

/// Knows the rules but does not play.
///
/// Legality and mate detection come from `chessie`. Asking a [`Referee`] for a move
/// is an error; pair it with a [`super::UciProcess`] through an [`super::Adapter`].
#[derive(Debug, Clone, Default)]
pub struct Referee {
    /// The position after `moves`.
    game: Game,

    /// Every move played since the start of the game.
    moves: Vec<Move>,
}

impl Referee {
    /// The moves this referee was last told about.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The position after `position`, reusing the cached game when it is the same list.
    fn game_after(&self, position: &[Move]) -> Result<Game> {
        if position == self.moves.as_slice() {
            Ok(self.game)
        } else {
            replay(position)
        }
    }
}

impl Engine for Referee {
    fn is_legal(&mut self, mv: &Move, position: &[Move]) -> bool {
        self.game_after(position)
            .is_ok_and(|game| legal_move(&game, mv).is_some())
    }

    fn best_move(&mut self, _position: &[Move]) -> Result<Move> {
        bail!("The referee does not search for moves; attach a UCI engine")
    }

    fn evaluate(&mut self, position: &[Move]) -> Result<Evaluation> {
        let game = self.game_after(position)?;
        let in_check = game.is_in_check();
        let no_moves = game.get_legal_moves().is_empty();

        Ok(Evaluation {
            checkmate: no_moves && in_check,
            stalemate: no_moves && !in_check,
            in_check,
            white_to_move: game.side_to_move().is_white(),
        })
    }

    fn set_position(&mut self, moves: &[Move]) -> Result<()> {
        self.game = replay(moves).context("Failed to set referee position")?;
        self.moves = moves.to_vec();
        Ok(())
    }

    fn configure(&mut self, _difficulty: Difficulty) -> Result<()> {
        Ok(())
    }

    fn new_game(&mut self) -> Result<()> {
        *self = Self::default();
        Ok(())
    }

    fn fen(&self) -> String {
        self.game.to_fen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(s: &str) -> Vec<Move> {
        s.split_ascii_whitespace()
            .map(|m| m.parse().unwrap())
            .collect()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_legality_from_start() {
        let mut referee = Referee::default();
        assert!(referee.is_legal(&mv("e2e4"), &[]));
        assert!(referee.is_legal(&mv("g1f3"), &[]));
        assert!(!referee.is_legal(&mv("e2e5"), &[]));
        assert!(!referee.is_legal(&mv("e4e2"), &[]));
        assert!(!referee.is_legal(&mv("e7e5"), &[]));
        assert!(referee.is_legal(&mv("e7e5"), &moves("e2e4")));
    }

    #[test]
    fn test_promotion_needs_a_piece() {
        let position = moves("a2a4 b7b5 a4b5 a7a6 b5a6 c8b7 a6a7 b7c6");
        let mut referee = Referee::default();
        assert!(!referee.is_legal(&mv("a7b8"), &position));
        assert!(referee.is_legal(&mv("a7b8q"), &position));
        assert!(referee.is_legal(&mv("a7b8n"), &position));
    }

    #[test]
    fn test_castling() {
        let position = moves("e2e4 e7e5 g1f3 b8c6 f1c4 g8f6");
        let mut referee = Referee::default();
        assert!(referee.is_legal(&mv("e1g1"), &position));
        assert!(!referee.is_legal(&mv("e1c1"), &position));
    }

    #[test]
    fn test_checkmate_detection() {
        let mut referee = Referee::default();
        let mate = moves("f2f3 e7e5 g2g4 d8h4");
        referee.set_position(&mate).unwrap();

        let eval = referee.evaluate(&mate).unwrap();
        assert!(eval.checkmate);
        assert!(eval.in_check);
        assert!(eval.white_to_move);

        let eval = referee.evaluate(&mate[..3]).unwrap();
        assert!(!eval.is_game_over());
        assert!(!eval.white_to_move);
    }

    #[test]
    fn test_set_position_rejects_illegal_lists() {
        let mut referee = Referee::default();
        assert!(referee.set_position(&moves("e2e4 e2e4")).is_err());
        assert!(referee.moves().is_empty());

        referee.set_position(&moves("d2d4")).unwrap();
        assert!(referee
            .fen()
            .starts_with("rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq"));
        referee.new_game().unwrap();
        assert!(referee.moves().is_empty());
    }
}
