/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{
    is_complete, BoardIo, Button, Config, Detection, Detector, Difficulty, Engine, Evaluation,
    History, Leds, Move, Notifier, NullNotifier, Promotion, Snapshot, MOVE_EVENT,
};

/// One of the ten phases of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    Mode,
    HumanColor,
    Difficulty,
    Setup,
    HumanMove,
    EngineMove,
    PawnPromotion,
    Undo,
    Checkmate,
}

impl Phase {
    pub const ALL: [Self; 10] = [
        Self::Init,
        Self::Mode,
        Self::HumanColor,
        Self::Difficulty,
        Self::Setup,
        Self::HumanMove,
        Self::EngineMove,
        Self::PawnPromotion,
        Self::Undo,
        Self::Checkmate,
    ];

    /// Returns `true` if a session in `self` may move on to `next`.
    ///
    /// Every phase but [`Phase::Init`] may return to [`Phase::Init`] through the reset gesture.
    pub const fn can_transition_to(self, next: Self) -> bool {
        if matches!(next, Self::Init) {
            return !matches!(self, Self::Init);
        }

        match self {
            Self::Init => matches!(next, Self::Mode),
            Self::Mode => matches!(next, Self::HumanColor | Self::Setup),
            Self::HumanColor => matches!(next, Self::Difficulty | Self::Mode),
            Self::Difficulty => matches!(next, Self::Setup | Self::HumanColor),
            Self::Setup => matches!(next, Self::HumanMove | Self::Difficulty | Self::Mode),
            Self::HumanMove => matches!(
                next,
                Self::HumanMove
                    | Self::EngineMove
                    | Self::PawnPromotion
                    | Self::Undo
                    | Self::Checkmate
            ),
            Self::EngineMove => matches!(
                next,
                Self::HumanMove | Self::Checkmate | Self::PawnPromotion | Self::Undo
            ),
            Self::PawnPromotion => {
                matches!(next, Self::HumanMove | Self::EngineMove | Self::Checkmate)
            }
            Self::Undo => matches!(next, Self::HumanMove),
            Self::Checkmate => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Mode => "mode",
            Self::HumanColor => "human color",
            Self::Difficulty => "difficulty",
            Self::Setup => "setup",
            Self::HumanMove => "human move",
            Self::EngineMove => "engine move",
            Self::PawnPromotion => "pawn promotion",
            Self::Undo => "undo",
            Self::Checkmate => "checkmate",
        };
        write!(f, "{name}")
    }
}

/// A square-wave timer for blinking LEDs, driven by timestamps rather than sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    period: Duration,
    last: Instant,
    on: bool,
}

impl Blink {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            last: now,
            on: true,
        }
    }

    /// Starts over from the `on` half of the cycle.
    pub fn restart(&mut self, period: Duration, now: Instant) {
        *self = Self::new(period, now);
    }

    #[inline(always)]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Flips the phase once a full period has passed since the last flip.
    ///
    /// Returns the new phase if it flipped.
    pub fn tick(&mut self, now: Instant) -> Option<bool> {
        if now.saturating_duration_since(self.last) < self.period {
            return None;
        }
        self.on = !self.on;
        self.last = now;
        Some(self.on)
    }
}

/// A promotion waiting for its piece to be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPromotion {
    /// The two-square move of the pawn.
    base: Move,
    choice: Promotion,
    /// Where to return to if the promotion is backed out of.
    source: Phase,
}

impl PendingPromotion {
    /// Only a human chooses; an engine's choice is shown as-is.
    fn is_human(&self) -> bool {
        self.source == Phase::HumanMove
    }

    fn mv(&self) -> Move {
        self.base.with_promotion(self.choice)
    }
}

/// A game on the board, from mode selection to checkmate and back again.
///
/// The session runs as a polling loop: every call to [`Session::tick`] reads the board once and
/// takes at most one action. Time only enters through the `now` argument, so blinking is
/// driven by the caller's clock. The only blocking waits are the short, deliberate holds
/// made through [`BoardIo::pause`].
#[derive(Debug)]
pub struct Session<E, N = NullNotifier> {
    config: Config,
    auto_confirm: bool,

    engine: E,
    notifier: N,

    phase: Phase,
    previous: Phase,

    /// Set on every transition; cleared once the new phase's entry actions have run.
    entering: bool,

    human_vs_engine: bool,
    human_is_white: bool,
    difficulty: Difficulty,

    detector: Detector,
    history: History,

    /// The engine's move (or hint) waiting to be carried out.
    engine_move: Option<Move>,
    promotion: Option<PendingPromotion>,
    /// The last move, reversed, while it is being taken back.
    undo: Option<Move>,
    /// Set once an engine move is discarded; the engine is not asked again until a hint is.
    engine_held: bool,

    blink: Blink,

    /// When all four buttons were first seen held.
    reset_held_since: Option<Instant>,
    /// Set after a reset until the buttons are released.
    reset_latched: bool,
}

impl<E: Engine, N: Notifier> Session<E, N> {
    /// Creates a session that will start in [`Phase::Init`] on the first tick.
    pub fn new(config: Config, engine: E, notifier: N) -> Self {
        let now = Instant::now();
        Self {
            auto_confirm: false,
            engine,
            notifier,
            phase: Phase::Init,
            previous: Phase::Init,
            entering: true,
            human_vs_engine: true,
            human_is_white: true,
            difficulty: config.default_difficulty(),
            detector: Detector::default(),
            history: History::default(),
            engine_move: None,
            promotion: None,
            undo: None,
            engine_held: false,
            blink: Blink::new(config.blink(), now),
            reset_held_since: None,
            reset_latched: false,
            config,
        }
    }

    /// Confirm moves as soon as the board shows them finished, without a button press.
    pub fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    #[inline(always)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The phase the session was in before the current one.
    #[inline(always)]
    pub fn previous(&self) -> Phase {
        self.previous
    }

    #[inline(always)]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline(always)]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline(always)]
    pub fn human_vs_engine(&self) -> bool {
        self.human_vs_engine
    }

    #[inline(always)]
    pub fn human_is_white(&self) -> bool {
        self.human_is_white
    }

    /// The human's candidate move, once both of its squares are known.
    pub fn candidate(&self) -> Option<Move> {
        self.detector.candidate()
    }

    /// The engine move currently being shown.
    #[inline(always)]
    pub fn engine_move(&self) -> Option<Move> {
        self.engine_move
    }

    /// The promotion move as it would be played with the current choice.
    pub fn promotion(&self) -> Option<Move> {
        self.promotion.map(|p| p.mv())
    }

    /// The reversed move being blinked while a move is taken back.
    #[inline(always)]
    pub fn undo_move(&self) -> Option<Move> {
        self.undo
    }

    #[inline(always)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline(always)]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one iteration of the loop.
    pub fn tick(&mut self, io: &mut impl BoardIo, now: Instant) {
        if self.entering {
            self.entering = false;
            info!("STATE: {}", self.phase);
            let phase = self.phase;
            self.enter(io, now);

            // Entry actions may have moved on already
            if self.phase != phase {
                self.check_reset(io, now);
                return;
            }
        }

        match self.phase {
            Phase::Init => {}
            Phase::Mode => self.mode(io),
            Phase::HumanColor => self.human_color(io),
            Phase::Difficulty => self.choose_difficulty(io),
            Phase::Setup => self.setup(io),
            Phase::HumanMove => self.human_move(io, now),
            Phase::EngineMove => self.engine_move_phase(io, now),
            Phase::PawnPromotion => self.pawn_promotion(io, now),
            Phase::Undo => self.undo_phase(io, now),
            Phase::Checkmate => self.checkmate(io, now),
        }

        self.check_reset(io, now);
    }

    fn transition(&mut self, next: Phase) {
        if !self.phase.can_transition_to(next) {
            warn!("Refusing transition from {} to {next}", self.phase);
            return;
        }
        debug!("{} -> {next}", self.phase);
        self.previous = self.phase;
        self.phase = next;
        self.entering = true;
    }

    /// Entry actions, run on the first tick spent in a phase.
    fn enter(&mut self, io: &mut impl BoardIo, now: Instant) {
        match self.phase {
            Phase::Init => self.init(io),

            Phase::Mode => {
                self.human_vs_engine = true;
                io.set_leds(Leds::MODE_ENGINE);
            }

            Phase::HumanColor => {
                self.human_is_white = true;
                io.set_leds(Leds::COLOR_WHITE);
            }

            Phase::Difficulty => io.set_leds(Leds::difficulty(self.difficulty.level())),

            Phase::Setup => {
                let snapshot = io.read_snapshot();
                self.detector.reset(snapshot);
                io.set_leds(Leds::setup(&snapshot));
            }

            Phase::HumanMove => {
                self.detector.clear();
                self.blink.restart(self.config.blink(), now);

                // Taking back the engine's move leaves the human to retake theirs, unless it
                // was the engine's opening move
                let after_undo = self.previous == Phase::Undo && !self.history.is_empty();
                if self.engine_held {
                    debug!("engine held back after a discarded move; confirm asks again");
                } else if !after_undo && self.is_engine_turn() {
                    self.request_engine_move(io);
                }
            }

            Phase::EngineMove => {
                self.blink.restart(self.config.blink(), now);
                match self.engine_move {
                    Some(mv) => io.set_leds(Leds::move_blink(&mv, true)),
                    None => {
                        warn!("No engine move to show");
                        self.transition(Phase::HumanMove);
                    }
                }
            }

            Phase::PawnPromotion => {
                self.blink.restart(self.config.blink(), now);
                match self.promotion {
                    Some(promotion) => {
                        io.set_leds(Leds::promotion_menu(promotion.choice, true));
                    }
                    None => self.transition(Phase::HumanMove),
                }
            }

            Phase::Undo => self.enter_undo(io, now),

            Phase::Checkmate => {
                self.blink.restart(self.config.checkmate_blink(), now);
                io.set_leds(Leds::ALL);
            }
        }
    }

    /// Clears everything about the previous game and plays the start-up animation.
    fn init(&mut self, io: &mut impl BoardIo) {
        if let Err(e) = self.engine.new_game() {
            warn!("Failed to start a new engine game: {e:#}");
        }

        let snapshot = io.read_snapshot();
        self.history.reset(snapshot);
        self.detector.reset(snapshot);
        self.engine_move = None;
        self.promotion = None;
        self.undo = None;
        self.engine_held = false;

        let step = self.config.startup_step();
        let frames = Leds::startup_sequence();
        for _ in 0..2 {
            for &frame in frames.iter() {
                io.set_leds(frame);
                io.pause(step);
            }
            io.pause(step);

            for &frame in frames.iter().rev() {
                io.set_leds(frame);
                io.pause(step);
            }
            io.pause(step);
        }

        self.transition(Phase::Mode);
    }

    fn mode(&mut self, io: &mut impl BoardIo) {
        match io.poll_button() {
            Some(Button::White | Button::Black) => {
                self.human_vs_engine = !self.human_vs_engine;
                debug!("human vs engine: {}", self.human_vs_engine);
                io.set_leds(if self.human_vs_engine {
                    Leds::MODE_ENGINE
                } else {
                    Leds::MODE_HUMAN
                });
            }
            Some(Button::Confirm) if self.human_vs_engine => self.transition(Phase::HumanColor),
            Some(Button::Confirm) => self.transition(Phase::Setup),
            _ => {}
        }
    }

    fn human_color(&mut self, io: &mut impl BoardIo) {
        match io.poll_button() {
            Some(Button::White | Button::Black) => {
                self.human_is_white = !self.human_is_white;
                debug!("human is white: {}", self.human_is_white);
                io.set_leds(if self.human_is_white {
                    Leds::COLOR_WHITE
                } else {
                    Leds::COLOR_BLACK
                });
            }
            Some(Button::Confirm) => self.transition(Phase::Difficulty),
            Some(Button::Back) => self.transition(Phase::Mode),
            None => {}
        }
    }

    fn choose_difficulty(&mut self, io: &mut impl BoardIo) {
        match io.poll_button() {
            Some(Button::Confirm) => {
                io.set_leds(Leds::ALL);
                io.pause(self.config.setup_pause());

                debug!("using {}", self.difficulty);
                if let Err(e) = self.engine.configure(self.difficulty) {
                    warn!("Failed to set engine difficulty: {e:#}");
                }

                io.set_leds(Leds::NONE);
                self.transition(Phase::Setup);
            }
            Some(Button::Black) => {
                self.difficulty = self.difficulty.raise(self.config.max_difficulty);
                debug!("difficulty up: {}", self.difficulty.level());
                io.set_leds(Leds::difficulty(self.difficulty.level()));
            }
            Some(Button::White) => {
                self.difficulty = self.difficulty.lower(self.config.min_difficulty);
                debug!("difficulty down: {}", self.difficulty.level());
                io.set_leds(Leds::difficulty(self.difficulty.level()));
            }
            Some(Button::Back) => self.transition(Phase::HumanColor),
            None => {}
        }
    }

    fn setup(&mut self, io: &mut impl BoardIo) {
        let snapshot = io.read_snapshot();

        if snapshot != self.detector.previous() {
            self.detector.reset(snapshot);
            io.set_leds(Leds::setup(&snapshot));
        } else if snapshot.matches_setup() {
            debug!("board is set up");
            io.set_leds(Leds::ALL);
            io.pause(self.config.setup_pause());
            io.set_leds(Leds::NONE);

            self.history.reset(snapshot);
            self.detector.reset(snapshot);
            if let Err(e) = self.engine.set_position(&[]) {
                warn!("Failed to reset engine position: {e:#}");
            }
            self.publish();

            self.transition(Phase::HumanMove);
        } else if io.poll_button() == Some(Button::Back) {
            self.transition(if self.human_vs_engine {
                Phase::Difficulty
            } else {
                Phase::Mode
            });
        }
    }

    fn human_move(&mut self, io: &mut impl BoardIo, now: Instant) {
        if let Some(candidate) = self.detector.candidate() {
            if let Some(on) = self.blink.tick(now) {
                io.set_leds(Leds::move_blink(&candidate, on));
            }
        }

        let snapshot = io.read_snapshot();
        let (engine, moves) = (&mut self.engine, self.history.moves());
        let detection = self
            .detector
            .observe(snapshot, |mv| engine.is_legal(mv, moves));

        match detection {
            Detection::NoChange => {}
            Detection::Origin(square) => {
                io.set_leds(Leds::square(square));
                return;
            }
            Detection::Candidate(candidate) => {
                self.blink.restart(self.config.blink(), now);
                io.set_leds(Leds::move_blink(&candidate, false));
                return;
            }
            Detection::Cleared => {
                io.set_leds(Leds::NONE);
                return;
            }
            Detection::Ignored(_) => return,
        }

        let candidate = self.detector.candidate();
        match (io.poll_button(), candidate) {
            (Some(Button::White | Button::Black), Some(mv)) => self.confirm_human_move(io, mv),
            (Some(Button::Confirm), _) => {
                debug!("hint requested");
                self.detector.clear();
                self.request_engine_move(io);
            }
            (Some(Button::Back), _) => self.transition(Phase::Undo),
            (None, Some(mv)) if self.auto_confirm => self.confirm_human_move(io, mv),
            _ => {}
        }
    }

    fn confirm_human_move(&mut self, io: &mut impl BoardIo, mv: Move) {
        let snapshot = io.read_snapshot();
        if !is_complete(&mv, &snapshot, self.history.moves()) {
            if !self.auto_confirm {
                debug!("move {mv} not done:\n{snapshot}");
            }
            return;
        }

        if self.engine.is_legal(&mv, self.history.moves()) {
            let eval = self.commit(io, mv, snapshot);
            if eval.checkmate {
                self.transition(Phase::Checkmate);
            } else if self.human_vs_engine {
                self.request_engine_move(io);
            }
        } else if self
            .engine
            .is_legal(&mv.with_promotion(Promotion::Queen), self.history.moves())
        {
            self.promotion = Some(PendingPromotion {
                base: mv,
                choice: Promotion::Queen,
                source: Phase::HumanMove,
            });
            self.transition(Phase::PawnPromotion);
        } else {
            debug!("move {mv} is not legal");
            self.detector.clear();
            io.set_leds(Leds::NONE);
        }
    }

    /// Returns `true` if the engine plays the side to move.
    fn is_engine_turn(&self) -> bool {
        let white_to_move = self.history.len() % 2 == 0;
        self.human_vs_engine && white_to_move != self.human_is_white
    }

    /// Asks the engine for a move and shows it. Stays put if the engine fails.
    fn request_engine_move(&mut self, io: &mut impl BoardIo) {
        self.engine_held = false;
        io.set_leds(Leds::NONE);
        match self.engine.best_move(self.history.moves()) {
            Ok(mv) => {
                self.engine_move = Some(mv);
                self.transition(Phase::EngineMove);
            }
            Err(e) => warn!("Engine failed to provide a move: {e:#}"),
        }
    }

    fn engine_move_phase(&mut self, io: &mut impl BoardIo, now: Instant) {
        let Some(mv) = self.engine_move else {
            self.transition(Phase::HumanMove);
            return;
        };

        if let Some(on) = self.blink.tick(now) {
            io.set_leds(Leds::move_blink(&mv, on));
        }

        let confirmed = match io.poll_button() {
            Some(Button::White | Button::Black) => true,
            Some(Button::Back) => {
                self.transition(Phase::Undo);
                return;
            }
            _ => {
                self.auto_confirm
                    && is_complete(&mv.base(), &io.read_snapshot(), self.history.moves())
            }
        };
        if !confirmed {
            return;
        }

        if let Some(choice) = mv.promotion() {
            self.promotion = Some(PendingPromotion {
                base: mv.base(),
                choice,
                source: Phase::EngineMove,
            });
            self.transition(Phase::PawnPromotion);
            return;
        }

        let snapshot = io.read_snapshot();
        if !is_complete(&mv, &snapshot, self.history.moves()) {
            debug!("move {mv} not done:\n{snapshot}");
            return;
        }

        if !self.engine.is_legal(&mv, self.history.moves()) {
            warn!("Engine move {mv} is not legal here; discarding it");
            self.engine_move = None;
            self.engine_held = true;
            io.set_leds(Leds::NONE);
            self.transition(Phase::HumanMove);
            return;
        }

        self.engine_move = None;
        let eval = self.commit(io, mv, snapshot);
        self.transition(if eval.checkmate {
            Phase::Checkmate
        } else {
            Phase::HumanMove
        });
    }

    fn pawn_promotion(&mut self, io: &mut impl BoardIo, now: Instant) {
        let Some(mut promotion) = self.promotion else {
            self.transition(Phase::HumanMove);
            return;
        };

        if let Some(on) = self.blink.tick(now) {
            io.set_leds(Leds::promotion_menu(promotion.choice, on));
        }

        match io.poll_button() {
            Some(Button::Black) if promotion.is_human() => {
                promotion.choice = promotion.choice.next();
                debug!("promotion: {}", promotion.choice);
            }
            Some(Button::White) if promotion.is_human() => {
                promotion.choice = promotion.choice.prev();
                debug!("promotion: {}", promotion.choice);
            }
            Some(Button::Confirm) => {
                let snapshot = io.read_snapshot();
                let mv = promotion.mv();

                if !is_complete(&promotion.base, &snapshot, self.history.moves()) {
                    debug!("move {mv} not done:\n{snapshot}");
                } else if !self.engine.is_legal(&mv, self.history.moves()) {
                    debug!("move {mv} is not legal");
                } else {
                    self.promotion = None;
                    self.engine_move = None;
                    let eval = self.commit(io, mv, snapshot);
                    self.transition(if eval.checkmate {
                        Phase::Checkmate
                    } else {
                        Phase::HumanMove
                    });
                }
                return;
            }
            Some(Button::Back) => {
                debug!("promotion cancelled");
                self.promotion = None;
                io.set_leds(Leds::NONE);
                self.transition(promotion.source);
                return;
            }
            _ => return,
        }

        io.set_leds(Leds::promotion_menu(promotion.choice, self.blink.is_on()));
        self.promotion = Some(promotion);
    }

    fn enter_undo(&mut self, io: &mut impl BoardIo, now: Instant) {
        self.engine_move = None;
        self.promotion = None;
        self.undo = None;

        // An unfinished move is simply dropped
        if self.detector.is_pending() {
            debug!("cancelled unfinished move");
            self.detector.clear();
            self.show_last_move(io);
            self.transition(Phase::HumanMove);
            return;
        }

        match self.history.last_move() {
            Some(last) => {
                let reversed = last.base().reversed();
                self.undo = Some(reversed);
                self.blink.restart(self.config.blink(), now);
                io.set_leds(Leds::move_blink(&reversed, true));
            }
            None => {
                io.set_leds(Leds::NONE);
                self.transition(Phase::HumanMove);
            }
        }
    }

    fn undo_phase(&mut self, io: &mut impl BoardIo, now: Instant) {
        let Some(reversed) = self.undo else {
            self.transition(Phase::HumanMove);
            return;
        };

        if let Some(on) = self.blink.tick(now) {
            io.set_leds(Leds::move_blink(&reversed, on));
        }

        let confirmed = match io.poll_button() {
            Some(Button::White | Button::Black) => true,
            Some(Button::Back) => {
                debug!("undo cancelled");
                self.undo = None;
                self.show_last_move(io);
                self.transition(Phase::HumanMove);
                return;
            }
            _ => self.auto_confirm,
        };
        if !confirmed {
            return;
        }

        let snapshot = io.read_snapshot();
        let played = self.history.len();
        if let Err(e) = self.history.confirm_undo(snapshot, &mut self.engine) {
            warn!("Failed to update engine after undo: {e:#}");
        }

        if self.history.len() < played {
            debug!("took back {reversed}");
            self.undo = None;
            self.detector.reset(snapshot);
            self.show_last_move(io);
            self.publish();
            self.transition(Phase::HumanMove);
        } else if !self.auto_confirm {
            debug!("board does not match the position before {reversed}:\n{snapshot}");
        }
    }

    fn checkmate(&mut self, io: &mut impl BoardIo, now: Instant) {
        if let Some(on) = self.blink.tick(now) {
            // Starts lit, so the first flip turns everything off
            io.set_leds(if on { Leds::ALL } else { Leds::NONE });
        }

        if io.poll_button().is_some() {
            self.transition(Phase::Init);
        }
    }

    /// Records a move the board shows as done and the engine accepts.
    fn commit(&mut self, io: &mut impl BoardIo, mv: Move, snapshot: Snapshot) -> Evaluation {
        self.history.commit(mv, snapshot);
        self.detector.reset(snapshot);
        io.set_leds(Leds::move_done(&mv));

        if let Err(e) = self.engine.set_position(self.history.moves()) {
            warn!("Failed to update engine position: {e:#}");
        }
        self.publish();

        match self.engine.evaluate(self.history.moves()) {
            Ok(eval) => {
                debug!("after {mv}: {eval:?}");
                eval
            }
            Err(e) => {
                warn!("Failed to evaluate position: {e:#}");
                Evaluation::default()
            }
        }
    }

    /// Lights the destination of the latest move, or nothing before the first move.
    fn show_last_move(&self, io: &mut impl BoardIo) {
        io.set_leds(
            self.history
                .last_move()
                .map_or(Leds::NONE, Leds::move_done),
        );
    }

    fn publish(&mut self) {
        let fen = self.engine.fen();
        if let Err(e) = self.notifier.publish(MOVE_EVENT, &fen) {
            warn!("Notification failed: {e:#}");
        }
    }

    /// Returns to [`Phase::Init`] once all four buttons have been held long enough.
    fn check_reset(&mut self, io: &mut impl BoardIo, now: Instant) {
        if !io.all_buttons_held() {
            self.reset_held_since = None;
            self.reset_latched = false;
            return;
        }
        if self.reset_latched || self.phase == Phase::Init {
            return;
        }

        let since = *self.reset_held_since.get_or_insert(now);
        if now.saturating_duration_since(since) >= self.config.reset_hold() {
            debug!("resetting");
            io.set_leds(Leds::ALL);
            io.pause(self.config.reset_pause());

            self.reset_held_since = None;
            self.reset_latched = true;
            self.transition(Phase::Init);
        }
    }
}
