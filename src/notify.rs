/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

/// Event name published after every committed move.
pub const MOVE_EVENT: &str = "move";

/// A best-effort channel for telling the outside world about the game.
///
/// Failures are returned to the caller, which logs and ignores them.
pub trait Notifier {
    fn publish(&mut self, event: &str, payload: &str) -> Result<()>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn publish(&mut self, event: &str, payload: &str) -> Result<()> {
        (**self).publish(event, payload)
    }
}

/// Publishes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&mut self, _event: &str, _payload: &str) -> Result<()> {
        Ok(())
    }
}

/// Keeps every published event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub events: Vec<(String, String)>,
}

impl Notifier for RecordingNotifier {
    fn publish(&mut self, event: &str, payload: &str) -> Result<()> {
        self.events.push((event.to_string(), payload.to_string()));
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    event: &'a str,
    data: &'a str,
}

/// POSTs each event as JSON (`{"event": .., "data": ..}`) to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Notifier for HttpNotifier {
    fn publish(&mut self, event: &str, payload: &str) -> Result<()> {
        self.client
            .post(&self.url)
            .json(&Message {
                event,
                data: payload,
            })
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to publish {event:?} to {}", self.url))?;
        Ok(())
    }
}
