/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Result;
use clap::Parser;
use reedchess::{
    Adapter, Cli, Config, Console, Engine, HttpNotifier, Notifier, NullNotifier, Referee,
    Session, SimulatedBoard, UciProcess,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --debug
    let level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);

    let engine: Box<dyn Engine> = match &config.engine.path {
        Some(path) => {
            let options = config.engine.uci_options();
            let player = UciProcess::spawn(
                path,
                options.iter().map(|(name, value)| (name.as_str(), value.as_str())),
                config.engine.movetime(),
            )?;
            info!("using engine at {path:?}");
            Box::new(Adapter::new(player))
        }
        None => {
            warn!("No engine configured; only human vs. human games can be played");
            Box::new(Referee::default())
        }
    };

    let notifier: Box<dyn Notifier> = match &cli.notify_url {
        Some(url) => Box::new(HttpNotifier::new(url.as_str())?),
        None => Box::new(NullNotifier),
    };

    let session = Session::new(config, engine, notifier).with_auto_confirm(cli.auto_confirm);
    let board = SimulatedBoard::default().in_real_time();

    info!(
        "{} {} ready; type `help` for commands",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    Console::new(session, board).run()
}
