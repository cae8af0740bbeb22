/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use reedchess::{
    BoardIo, Button, Config, Difficulty, Engine, Evaluation, Leds, Move, Notifier, Phase,
    RecordingNotifier, Referee, Session, SimulatedBoard, Snapshot, Square,
};

/// Rules from a [`Referee`], moves from a fixed script.
#[derive(Debug, Default)]
struct ScriptedEngine {
    referee: Referee,
    replies: VecDeque<Move>,
    difficulty: Option<Difficulty>,
    new_games: usize,
}

impl Engine for ScriptedEngine {
    fn is_legal(&mut self, mv: &Move, position: &[Move]) -> bool {
        self.referee.is_legal(mv, position)
    }

    fn best_move(&mut self, _position: &[Move]) -> Result<Move> {
        self.replies.pop_front().context("Script has run out of moves")
    }

    fn evaluate(&mut self, position: &[Move]) -> Result<Evaluation> {
        self.referee.evaluate(position)
    }

    fn set_position(&mut self, moves: &[Move]) -> Result<()> {
        self.referee.set_position(moves)
    }

    fn configure(&mut self, difficulty: Difficulty) -> Result<()> {
        self.difficulty = Some(difficulty);
        Ok(())
    }

    fn new_game(&mut self) -> Result<()> {
        self.new_games += 1;
        self.referee.new_game()
    }

    fn fen(&self) -> String {
        self.referee.fen()
    }
}

/// A notification endpoint that is always down.
#[derive(Debug, Default)]
struct UnreachableNotifier {
    attempts: usize,
}

impl Notifier for UnreachableNotifier {
    fn publish(&mut self, event: &str, _payload: &str) -> Result<()> {
        self.attempts += 1;
        bail!("Connection refused while publishing {event:?}")
    }
}

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

struct Harness<N = RecordingNotifier> {
    session: Session<ScriptedEngine, N>,
    board: SimulatedBoard,
    now: Instant,
}

impl Harness {
    fn new(replies: &[&str]) -> Self {
        Self::with_notifier(replies, RecordingNotifier::default())
    }
}

impl<N: Notifier> Harness<N> {
    fn with_notifier(replies: &[&str], notifier: N) -> Self {
        let engine = ScriptedEngine {
            replies: replies.iter().map(|m| mv(m)).collect(),
            ..Default::default()
        };

        Self {
            session: Session::new(Config::default(), engine, notifier),
            board: SimulatedBoard::with_setup(),
            now: Instant::now(),
        }
    }

    fn auto_confirm(mut self) -> Self {
        self.session = self.session.with_auto_confirm(true);
        self
    }

    fn tick(&mut self) {
        self.now += Duration::from_millis(10);
        self.session.tick(&mut self.board, self.now);
    }

    fn press(&mut self, button: Button) {
        self.board.press(button);
        self.tick();
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Walks the menus and sets the board up, ending in [`Phase::HumanMove`].
    fn start(&mut self, against_engine: bool, human_is_white: bool, level: u8) {
        self.tick();
        assert_eq!(self.phase(), Phase::Mode);

        if !against_engine {
            self.press(Button::White);
            self.press(Button::Confirm);
        } else {
            self.press(Button::Confirm);
            assert_eq!(self.phase(), Phase::HumanColor);

            if !human_is_white {
                self.press(Button::Black);
            }
            self.press(Button::Confirm);
            assert_eq!(self.phase(), Phase::Difficulty);

            let default = self.session.difficulty().level();
            for _ in default..level {
                self.press(Button::Black);
            }
            self.press(Button::Confirm);
        }
        assert_eq!(self.phase(), Phase::Setup);

        self.tick();
        assert_eq!(self.phase(), Phase::HumanMove);
        self.tick();
    }

    /// Physically carries out `mv` the way a person would, one square per tick.
    fn move_piece(&mut self, mv: &Move) {
        if self.board.snapshot().is_occupied(mv.to()) {
            // Capture: the victim comes off the board first
            self.board.lift(mv.to());
            self.tick();
            self.board.lift(mv.from());
            self.tick();
            self.board.place(mv.to());
        } else {
            self.board.lift(mv.from());
            self.tick();
            self.board.place(mv.to());
        }
        self.tick();
    }

    /// A human move, carried out and confirmed.
    fn human_plays(&mut self, s: &str) {
        self.move_piece(&mv(s));
        self.press(Button::White);
    }

    /// Carries out the move the session is showing, then confirms it.
    fn follow_engine(&mut self) {
        let shown = self.session.engine_move().expect("no engine move shown");
        self.move_piece(&shown);
        self.press(Button::White);
    }

    fn moves(&self) -> Vec<String> {
        self.session
            .history()
            .moves()
            .iter()
            .map(|m| m.to_string())
            .collect()
    }
}

#[test]
fn test_end_to_end_against_engine() {
    let mut h = Harness::new(&["e7e5"]);
    h.start(true, true, 3);

    assert!(h.session.human_vs_engine());
    assert!(h.session.human_is_white());
    assert_eq!(h.session.engine().difficulty, Some(Difficulty::new(3)));
    assert_eq!(h.session.engine().new_games, 1);
    assert!(h.session.history().is_empty());

    // Lift e2, set it down on e4
    h.board.lift(sq("e2"));
    h.tick();
    assert_eq!(h.board.leds(), Leds::square(sq("e2")));
    h.board.place(sq("e4"));
    h.tick();
    assert_eq!(h.session.candidate(), Some(mv("e2e4")));

    h.press(Button::White);
    assert_eq!(h.moves(), ["e2e4"]);
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("e7e5")));

    h.tick();
    h.follow_engine();
    assert_eq!(h.moves(), ["e2e4", "e7e5"]);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.board.leds(), Leds::square(sq("e5")));

    let history = h.session.history();
    assert_eq!(history.snapshots().len(), history.moves().len() + 1);
    assert_eq!(history.current(), h.board.snapshot());

    // Start position, then one event per move
    assert_eq!(h.session.notifier().events.len(), 3);
    assert!(h.session.notifier().events.iter().all(|(event, _)| event == "move"));
    assert_eq!(h.session.notifier().events[2].1, h.session.engine().fen());
}

#[test]
fn test_failing_notifications_do_not_stop_play() {
    let mut h = Harness::with_notifier(&["e7e5"], UnreachableNotifier::default());
    h.start(true, true, 3);
    assert_eq!(h.session.notifier().attempts, 1);

    h.human_plays("e2e4");
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("e7e5")));

    h.tick();
    h.follow_engine();
    assert_eq!(h.moves(), ["e2e4", "e7e5"]);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.notifier().attempts, 3);
}

#[test]
fn test_incomplete_move_is_not_committed() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    h.board.lift(sq("g1"));
    h.tick();
    h.board.place(sq("f3"));
    h.tick();
    assert_eq!(h.session.candidate(), Some(mv("g1f3")));

    // The knight was picked up again before confirming
    h.board.lift(sq("f3"));
    h.tick();
    h.press(Button::White);
    assert!(h.session.history().is_empty());
    assert_eq!(h.phase(), Phase::HumanMove);

    h.board.place(sq("f3"));
    h.tick();
    h.press(Button::Black);
    assert_eq!(h.moves(), ["g1f3"]);
}

#[test]
fn test_illegal_candidate_is_cleared() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    h.board.lift(sq("e2"));
    h.tick();
    h.board.place(sq("e5"));
    h.tick();
    assert_eq!(h.session.candidate(), None);
    assert_eq!(h.board.leds(), Leds::NONE);
    assert_eq!(h.phase(), Phase::HumanMove);
}

#[test]
fn test_undo_round_trip() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    h.human_plays("d2d4");
    h.human_plays("g8f6");
    let before = h.session.history().clone();
    h.human_plays("c2c4");
    assert_eq!(h.session.history().len(), 3);

    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::Undo);
    h.tick();
    assert_eq!(h.session.undo_move(), Some(mv("c4c2")));

    // Confirming before the board matches changes nothing
    h.press(Button::White);
    assert_eq!(h.phase(), Phase::Undo);
    assert_eq!(h.session.history().len(), 3);

    h.board.lift(sq("c4"));
    h.board.place(sq("c2"));
    h.press(Button::White);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.history(), &before);
    assert_eq!(h.session.engine().referee.moves(), before.moves());
    assert_eq!(h.board.leds(), Leds::square(sq("f6")));

    // And the game carries on from there
    h.tick();
    h.human_plays("c2c3");
    assert_eq!(h.moves(), ["d2d4", "g8f6", "c2c3"]);
}

#[test]
fn test_undo_cancelled() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);
    h.human_plays("e2e4");

    h.press(Button::Back);
    h.tick();
    assert_eq!(h.phase(), Phase::Undo);
    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.moves(), ["e2e4"]);
}

#[test]
fn test_back_drops_unfinished_move() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);
    h.human_plays("e2e4");
    h.tick();

    h.board.lift(sq("e7"));
    h.tick();
    h.board.place(sq("e5"));
    h.tick();
    assert_eq!(h.session.candidate(), Some(mv("e7e5")));

    h.press(Button::Back);
    h.tick();
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.candidate(), None);
    assert_eq!(h.moves(), ["e2e4"]);
}

#[test]
fn test_undo_with_no_moves() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    h.press(Button::Back);
    h.tick();
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.board.leds(), Leds::NONE);
}

#[test]
fn test_human_promotion() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    for m in ["a2a4", "b7b5", "a4b5", "a7a6", "b5a6", "c8b7", "a6a7", "b7c6"] {
        h.human_plays(m);
        h.tick();
    }
    assert_eq!(h.session.history().len(), 8);

    // Only legal with a promotion piece attached
    h.human_plays("a7b8");
    assert_eq!(h.phase(), Phase::PawnPromotion);
    assert_eq!(h.session.history().len(), 8);

    h.tick();
    assert_eq!(h.session.promotion(), Some(mv("a7b8q")));

    h.press(Button::Black);
    h.press(Button::Black);
    assert_eq!(h.session.promotion(), Some(mv("a7b8n")));
    h.press(Button::White);
    assert_eq!(h.session.promotion(), Some(mv("a7b8b")));
    h.press(Button::White);
    h.press(Button::White);
    assert_eq!(h.session.promotion(), Some(mv("a7b8r")));

    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.history().last_move(), Some(&mv("a7b8r")));
    assert_eq!(h.session.history().len(), 9);
}

#[test]
fn test_promotion_back_returns_to_source() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    for m in ["h2h4", "g7g5", "h4g5", "h7h6", "g5h6", "f8g7", "h6h7", "g7f6"] {
        h.human_plays(m);
        h.tick();
    }

    h.human_plays("h7g8");
    assert_eq!(h.phase(), Phase::PawnPromotion);
    h.tick();

    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.promotion(), None);
    assert_eq!(h.session.history().len(), 8);
}

#[test]
fn test_engine_promotion_shows_its_choice() {
    let mut h = Harness::new(&["g7g5", "h7h6", "f8g7", "g7f6", "h7g8n"]);
    h.start(true, true, 1);

    for m in ["h2h4", "h4g5", "g5h6", "h6h7"] {
        h.human_plays(m);
        assert_eq!(h.phase(), Phase::EngineMove);
        h.tick();
        h.follow_engine();
        h.tick();
    }

    // Ask for a hint: the engine suggests an underpromotion
    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("h7g8n")));

    h.tick();
    h.press(Button::White);
    assert_eq!(h.phase(), Phase::PawnPromotion);
    h.tick();

    // The engine's choice cannot be changed
    h.press(Button::Black);
    assert_eq!(h.session.promotion(), Some(mv("h7g8n")));

    h.move_piece(&mv("h7g8"));
    h.press(Button::Confirm);
    assert_eq!(h.session.history().last_move(), Some(&mv("h7g8n")));
}

#[test]
fn test_setup_gating() {
    let mut h = Harness::new(&[]);
    h.board.lift(sq("e2"));
    h.board.lift(sq("d8"));

    h.tick();
    h.press(Button::White);
    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::Setup);

    for _ in 0..5 {
        h.tick();
        assert_eq!(h.phase(), Phase::Setup);
    }
    assert_eq!(h.board.leds(), "abcfgh".parse().unwrap());

    h.board.place(sq("e2"));
    h.tick();
    assert_eq!(h.board.leds(), "abcefgh".parse().unwrap());
    h.tick();
    assert_eq!(h.phase(), Phase::Setup);

    // A stray piece in the middle keeps it in setup too
    h.board.place(sq("d8"));
    h.board.place(sq("d5"));
    for _ in 0..3 {
        h.tick();
    }
    assert_eq!(h.phase(), Phase::Setup);

    h.board.lift(sq("d5"));
    h.tick();
    h.tick();
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.history().snapshots(), &[Snapshot::SETUP]);
}

#[test]
fn test_setup_back_navigation() {
    let mut h = Harness::new(&[]);
    h.board.set_snapshot(Snapshot::EMPTY);
    h.tick();

    // Human vs. human goes straight back to mode selection
    h.press(Button::Black);
    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::Setup);
    h.tick();
    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::Mode);

    // Against the engine, back to difficulty
    h.press(Button::Confirm);
    h.press(Button::Confirm);
    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::Setup);
    h.tick();
    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::Difficulty);
    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::HumanColor);
    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::Mode);
}

#[test]
fn test_menu_leds() {
    let mut h = Harness::new(&[]);
    h.tick();

    h.tick();
    assert_eq!(h.board.leds(), Leds::MODE_ENGINE);
    h.press(Button::White);
    assert_eq!(h.board.leds(), Leds::MODE_HUMAN);
    h.press(Button::White);
    assert_eq!(h.board.leds(), Leds::MODE_ENGINE);

    h.press(Button::Confirm);
    h.tick();
    assert_eq!(h.board.leds(), Leds::COLOR_WHITE);
    h.press(Button::Black);
    assert_eq!(h.board.leds(), Leds::COLOR_BLACK);

    h.press(Button::Confirm);
    h.tick();
    assert_eq!(h.board.leds(), "1".parse().unwrap());
    for _ in 0..12 {
        h.press(Button::Black);
    }
    assert_eq!(h.session.difficulty(), Difficulty::new(8));
    assert_eq!(h.board.leds(), "12345678".parse().unwrap());
    for _ in 0..12 {
        h.press(Button::White);
    }
    assert_eq!(h.session.difficulty(), Difficulty::new(0));
    assert_eq!(h.board.leds(), Leds::NONE);
}

#[test]
fn test_startup_animation() {
    let mut h = Harness::new(&[]);
    h.tick();

    // Two passes of 13 frames outward and 13 back in
    let log = h.board.led_log();
    assert_eq!(log.len(), 2 * 2 * 13);
    assert_eq!(log[12], Leds::ALL);
    assert_eq!(log[13], Leds::ALL);
    assert_eq!(log[25], Leds::NONE);
    assert_eq!(h.board.paused(), Duration::from_millis(2 * (2 * 13 + 2) * 50));
}

#[test]
fn test_engine_opens_when_human_is_black() {
    let mut h = Harness::new(&["e2e4", "g1f3"]);
    h.start(true, false, 1);

    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("e2e4")));

    h.follow_engine();
    assert_eq!(h.phase(), Phase::HumanMove);
    h.tick();

    h.human_plays("c7c5");
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.moves(), ["e2e4", "c7c5"]);
}

#[test]
fn test_hint_is_shown_not_played() {
    let mut h = Harness::new(&["d2d4"]);
    h.start(false, true, 1);

    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("d2d4")));
    assert!(h.session.history().is_empty());

    // The hint must still be carried out
    h.tick();
    h.press(Button::White);
    assert!(h.session.history().is_empty());

    h.follow_engine();
    assert_eq!(h.moves(), ["d2d4"]);
    assert_eq!(h.phase(), Phase::HumanMove);
}

#[test]
fn test_engine_failure_keeps_session_alive() {
    let mut h = Harness::new(&[]);
    h.start(true, true, 1);

    h.human_plays("e2e4");
    assert_eq!(h.moves(), ["e2e4"]);
    assert_eq!(h.phase(), Phase::HumanMove);
}

#[test]
fn test_auto_confirm() {
    let mut h = Harness::new(&["e7e5"]).auto_confirm();
    h.start(true, true, 1);

    h.move_piece(&mv("e2e4"));
    h.tick();
    assert_eq!(h.moves(), ["e2e4"]);
    assert_eq!(h.phase(), Phase::EngineMove);

    h.tick();
    h.move_piece(&mv("e7e5"));
    h.tick();
    assert_eq!(h.moves(), ["e2e4", "e7e5"]);
    assert_eq!(h.phase(), Phase::HumanMove);
}

#[test]
fn test_castling_on_the_board() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);
    for m in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"] {
        h.human_plays(m);
        h.tick();
    }

    // King first, then the rook
    h.board.lift(sq("e1"));
    h.tick();
    h.board.place(sq("g1"));
    h.tick();
    assert_eq!(h.session.candidate(), Some(mv("e1g1")));

    // Rook still on h1
    h.press(Button::White);
    assert_eq!(h.session.history().len(), 6);

    h.board.lift(sq("h1"));
    h.tick();
    h.board.place(sq("f1"));
    h.tick();
    h.press(Button::White);
    assert_eq!(h.session.history().last_move(), Some(&mv("e1g1")));
}

#[test]
fn test_checkmate_and_restart() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);

    for m in ["f2f3", "e7e5", "g2g4"] {
        h.human_plays(m);
        h.tick();
    }
    h.human_plays("d8h4");
    assert_eq!(h.phase(), Phase::Checkmate);

    h.tick();
    assert_eq!(h.board.leds(), Leds::ALL);
    h.now += Duration::from_millis(200);
    h.tick();
    assert_eq!(h.board.leds(), Leds::NONE);

    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::Init);
    h.tick();
    assert_eq!(h.phase(), Phase::Mode);
    assert!(h.session.history().is_empty());
    assert_eq!(h.session.engine().new_games, 2);
}

#[test]
fn test_global_reset() {
    let mut h = Harness::new(&[]);
    h.start(false, true, 1);
    h.human_plays("e2e4");

    let paused = h.board.paused();
    h.board.hold_all(true);
    h.tick();
    assert_eq!(h.phase(), Phase::Init);
    assert_eq!(h.board.leds(), Leds::ALL);
    assert_eq!(h.board.paused() - paused, Duration::from_millis(2000));

    // Still held: no second reset
    h.tick();
    assert_eq!(h.phase(), Phase::Mode);
    h.tick();
    assert_eq!(h.phase(), Phase::Mode);
    assert!(h.session.history().is_empty());

    h.board.hold_all(false);
    h.tick();
    assert_eq!(h.phase(), Phase::Mode);
}

#[test]
fn test_reset_needs_sustained_hold() {
    let config = Config {
        reset_hold_ms: 500,
        ..Default::default()
    };
    let mut session = Session::new(config, ScriptedEngine::default(), RecordingNotifier::default());
    let mut board = SimulatedBoard::with_setup();
    let start = Instant::now();

    session.tick(&mut board, start);
    session.tick(&mut board, start);
    assert_eq!(session.phase(), Phase::Mode);

    board.hold_all(true);
    session.tick(&mut board, start + Duration::from_millis(100));
    session.tick(&mut board, start + Duration::from_millis(400));
    assert_eq!(session.phase(), Phase::Mode);

    // Let go and start again: the clock restarts
    board.hold_all(false);
    session.tick(&mut board, start + Duration::from_millis(500));
    board.hold_all(true);
    session.tick(&mut board, start + Duration::from_millis(600));
    session.tick(&mut board, start + Duration::from_millis(1000));
    assert_eq!(session.phase(), Phase::Mode);

    session.tick(&mut board, start + Duration::from_millis(1100));
    assert_eq!(session.phase(), Phase::Init);
    assert!(board.all_buttons_held());
}

#[test]
fn test_engine_reopens_after_its_first_move_is_undone() {
    let mut h = Harness::new(&["e2e4", "d2d4"]);
    h.start(true, false, 1);
    assert_eq!(h.session.engine_move(), Some(mv("e2e4")));
    h.follow_engine();
    assert_eq!(h.moves(), ["e2e4"]);

    h.press(Button::Back);
    assert_eq!(h.phase(), Phase::Undo);
    h.tick();
    h.board.lift(sq("e4"));
    h.board.place(sq("e2"));
    h.press(Button::White);
    assert!(h.session.history().is_empty());
    assert_eq!(h.phase(), Phase::HumanMove);

    h.tick();
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("d2d4")));
}

#[test]
fn test_undo_later_in_the_game_waits_for_the_human() {
    let mut h = Harness::new(&["e7e5", "g8f6"]);
    h.start(true, true, 1);
    h.human_plays("e2e4");
    h.tick();
    h.follow_engine();

    // Take back the engine's reply
    h.press(Button::Back);
    h.tick();
    h.board.lift(sq("e5"));
    h.board.place(sq("e7"));
    h.press(Button::White);
    assert_eq!(h.moves(), ["e2e4"]);

    h.tick();
    h.tick();
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.session.engine().replies.len(), 1);
}

#[test]
fn test_discarded_engine_move_is_not_requested_again() {
    // The first reply repeats White's own move, which Black cannot play
    let mut h = Harness::new(&["e2e4", "e7e5"]);
    h.start(true, true, 1);

    h.human_plays("e2e4");
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("e2e4")));

    // The board already shows e2 empty and e4 taken, so it reads as done
    h.tick();
    h.press(Button::White);
    assert_eq!(h.phase(), Phase::HumanMove);
    assert_eq!(h.moves(), ["e2e4"]);

    for _ in 0..5 {
        h.tick();
        assert_eq!(h.phase(), Phase::HumanMove);
    }
    assert_eq!(h.session.engine().replies.len(), 1);

    // A hint asks again
    h.press(Button::Confirm);
    assert_eq!(h.phase(), Phase::EngineMove);
    assert_eq!(h.session.engine_move(), Some(mv("e7e5")));
    h.tick();
    h.follow_engine();
    assert_eq!(h.moves(), ["e2e4", "e7e5"]);
}
