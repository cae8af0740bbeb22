/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::VecDeque,
    io,
    sync::mpsc::{channel, Receiver, Sender, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use tracing::{error, info};

use crate::{ConsoleCommand, Engine, Notifier, Phase, Session, SimulatedBoard, Snapshot, Step};

/// How long the loop sleeps between iterations.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Drives a [`Session`] from the terminal, with a [`SimulatedBoard`] standing in for the hardware.
///
/// Typed commands are read on a separate thread and applied to the board between iterations.
/// A played move is carried out one square per iteration, and no further command is taken
/// until it is done. Every change of the LEDs is logged.
pub struct Console<E, N> {
    session: Session<E, N>,
    board: SimulatedBoard,

    /// One half of a channel, responsible for sending commands typed into the console.
    sender: Sender<ConsoleCommand>,

    /// One half of a channel, responsible for receiving commands typed into the console.
    receiver: Receiver<ConsoleCommand>,

    /// Board changes still to be made for a played move.
    steps: VecDeque<Step>,

    /// Set while all four buttons are held for a reset.
    resetting: bool,
}

impl<E: Engine, N: Notifier> Console<E, N> {
    pub fn new(session: Session<E, N>, board: SimulatedBoard) -> Self {
        let (sender, receiver) = channel();
        Self {
            session,
            board,
            sender,
            receiver,
            steps: VecDeque::new(),
            resetting: false,
        }
    }

    /// Runs the session until `quit` is typed or input ends.
    pub fn run(&mut self) -> Result<()> {
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                error!("Input handler thread stopping after fatal error: {err:#}");
            }
        });

        let mut leds = self.board.leds();
        loop {
            if self.steps.is_empty() {
                match self.receiver.try_recv() {
                    Ok(ConsoleCommand::Quit) => break,
                    Ok(cmd) => self.apply(cmd),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => break,
                }
            }

            self.step(Instant::now());

            if self.board.leds() != leds {
                leds = self.board.leds();
                info!("LEDs: [{leds}]");
            }

            thread::sleep(POLL_INTERVAL);
        }

        Ok(())
    }

    /// Makes the next pending board change, if any, then runs one iteration of the session.
    fn step(&mut self, now: Instant) {
        if let Some(step) = self.steps.pop_front() {
            self.board.apply(step);
        }

        self.session.tick(&mut self.board, now);

        // A reset was honoured; let go of the buttons
        if self.resetting && self.session.phase() == Phase::Init {
            self.board.hold_all(false);
            self.resetting = false;
        }
    }

    /// Applies a single command to the board.
    fn apply(&mut self, cmd: ConsoleCommand) {
        if let Some(button) = cmd.button() {
            self.board.press(button);
            return;
        }

        match cmd {
            ConsoleCommand::Toggle { squares } => {
                for square in squares {
                    self.board.toggle(square);
                }
            }
            ConsoleCommand::Lift { square } => self.board.lift(square),
            ConsoleCommand::Place { square } => self.board.place(square),
            ConsoleCommand::Play { mv } => self.steps.extend(self.board.steps(&mv)),
            ConsoleCommand::Setup => self.board.set_snapshot(Snapshot::SETUP),
            ConsoleCommand::Clear => self.board.set_snapshot(Snapshot::EMPTY),
            ConsoleCommand::Reset => {
                self.board.hold_all(true);
                self.resetting = true;
            }
            ConsoleCommand::Display => self.display(),
            _ => {}
        }
    }

    fn display(&self) {
        println!("{}", self.board.snapshot());
        println!("LEDs:  [{}]", self.board.leds());
        println!("Phase: {}", self.session.phase());

        let moves = self.session.history().moves();
        if !moves.is_empty() {
            let moves = moves.iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
            println!("Moves: {}", moves.join(" "));
        }
        if let Some(mv) = self.session.candidate().or(self.session.engine_move()) {
            println!("Showing: {mv}");
        }
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<ConsoleCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line from console")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(ConsoleCommand::Quit)
                .context("Failed to send 'quit' command after receiving empty input")?;

            bail!("Console received input of 0 bytes and is quitting");
        }

        let buf = buffer.trim();
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<ConsoleCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to the board")?,

            Err(err) => eprintln!("{err}"),
        }
    }
}
