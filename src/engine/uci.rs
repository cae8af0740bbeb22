/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    io::{BufRead, BufReader, Write},
    path::Path,
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, trace, warn};

use super::Difficulty;
use crate::Move;

/// How long the engine gets to exit on its own after `quit`.
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// A command sent to the engine process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciCommand<'a> {
    Uci,
    IsReady,
    UciNewGame,
    SetOption { name: &'a str, value: &'a str },
    Position(&'a [Move]),
    Go { movetime: Duration },
    Quit,
}

impl fmt::Display for UciCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uci => write!(f, "uci"),
            Self::IsReady => write!(f, "isready"),
            Self::UciNewGame => write!(f, "ucinewgame"),
            Self::SetOption { name, value } => write!(f, "setoption name {name} value {value}"),
            Self::Position(moves) => {
                write!(f, "position startpos")?;
                if !moves.is_empty() {
                    write!(f, " moves")?;
                    for mv in moves.iter() {
                        write!(f, " {mv}")?;
                    }
                }
                Ok(())
            }
            Self::Go { movetime } => write!(f, "go movetime {}", movetime.as_millis()),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// Pulls the move out of a `bestmove` line.
///
/// Returns `None` for any other line, and an error if the engine had no move to give.
pub fn parse_bestmove(line: &str) -> Option<Result<Move>> {
    let mut tokens = line.split_ascii_whitespace();
    if tokens.next() != Some("bestmove") {
        return None;
    }

    let parsed = match tokens.next() {
        Some("(none)") | Some("0000") => Err(anyhow!("Engine has no legal move to play")),
        Some(mv) => mv.parse(),
        None => Err(anyhow!("Engine sent `bestmove` without a move")),
    };
    Some(parsed)
}

/// An external chess engine, spoken to over the Universal Chess Interface.
#[derive(Debug)]
pub struct UciProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,

    /// How long the engine may think about each move.
    movetime: Duration,

    /// The moves last sent with `position`.
    moves: Vec<Move>,
}

impl UciProcess {
    /// Launches the engine at `path` and waits for it to finish its handshake.
    ///
    /// Every pair in `options` is sent as a `setoption` before the engine is used.
    pub fn spawn<'a>(
        path: impl AsRef<Path>,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
        movetime: Duration,
    ) -> Result<Self> {
        let path = path.as_ref();
        let child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch engine at {path:?}"))?;

        let mut engine = Self::from_child(child, movetime)?;
        engine.send(UciCommand::Uci)?;
        engine.read_until(|line| line == "uciok")?;

        for (name, value) in options {
            engine.send(UciCommand::SetOption { name, value })?;
        }
        engine.sync()?;

        debug!("engine at {path:?} is ready");
        Ok(engine)
    }

    /// Takes over the piped stdio of an already running engine.
    fn from_child(mut child: Child, movetime: Duration) -> Result<Self> {
        let stdin = child
            .stdin
            .take()
            .context("Engine process has no stdin")?;
        let stdout = child
            .stdout
            .take()
            .context("Engine process has no stdout")?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            movetime,
            moves: Vec::with_capacity(128),
        })
    }

    /// Sends a single command.
    fn send(&mut self, command: UciCommand) -> Result<()> {
        trace!("> {command}");
        writeln!(self.stdin, "{command}")
            .and_then(|_| self.stdin.flush())
            .with_context(|| format!("Failed to send {command:?} to engine"))
    }

    /// Reads lines until one satisfies `pred`, returning that line.
    fn read_until(&mut self, mut pred: impl FnMut(&str) -> bool) -> Result<String> {
        let mut buffer = String::with_capacity(256);
        loop {
            buffer.clear();
            let bytes = self
                .stdout
                .read_line(&mut buffer)
                .context("Failed to read from engine")?;

            if bytes == 0 {
                bail!("Engine closed its output");
            }

            let line = buffer.trim();
            trace!("< {line}");
            if pred(line) {
                return Ok(line.to_string());
            }
        }
    }

    /// Blocks until the engine has processed everything sent so far.
    fn sync(&mut self) -> Result<()> {
        self.send(UciCommand::IsReady)?;
        self.read_until(|line| line == "readyok")?;
        Ok(())
    }

    /// Searches for `movetime` on the position after `position` and returns the engine's choice.
    pub fn best_move(&mut self, position: &[Move]) -> Result<Move> {
        self.set_position(position)?;
        self.send(UciCommand::Go {
            movetime: self.movetime,
        })?;

        let line = self.read_until(|line| line.starts_with("bestmove"))?;
        let mv = parse_bestmove(&line).context("Expected a `bestmove` line")??;

        debug!("engine suggests {mv}");
        Ok(mv)
    }

    pub fn set_position(&mut self, moves: &[Move]) -> Result<()> {
        self.send(UciCommand::Position(moves))?;
        self.moves = moves.to_vec();
        Ok(())
    }

    /// Limits (or unlimits) the engine's strength.
    pub fn configure(&mut self, difficulty: Difficulty) -> Result<()> {
        match difficulty.elo() {
            Some(elo) => {
                let elo = elo.to_string();
                self.send(UciCommand::SetOption {
                    name: "UCI_LimitStrength",
                    value: "true",
                })?;
                self.send(UciCommand::SetOption {
                    name: "UCI_Elo",
                    value: &elo,
                })?;
            }
            None => {
                self.send(UciCommand::SetOption {
                    name: "UCI_LimitStrength",
                    value: "false",
                })?;
                self.send(UciCommand::SetOption {
                    name: "Skill Level",
                    value: "0",
                })?;
            }
        }

        debug!("engine set to {difficulty}");
        self.sync()
    }

    pub fn new_game(&mut self) -> Result<()> {
        self.send(UciCommand::UciNewGame)?;
        self.moves.clear();
        self.sync()
    }

    /// The moves last sent to the engine.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
}

impl Drop for UciProcess {
    fn drop(&mut self) {
        if let Err(e) = self.send(UciCommand::Quit) {
            warn!("{e:#}");
        }

        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!("engine exited: {status}");
                    return;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to wait for engine: {e}");
                    break;
                }
            }
        }

        warn!("Engine ignored `quit`; killing it");
        if let Err(e) = self.child.kill().and_then(|_| self.child.wait()) {
            warn!("Failed to kill engine: {e}");
        }
    }
}
