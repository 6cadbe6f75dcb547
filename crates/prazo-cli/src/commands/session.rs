//! Interactive tracking session.
//!
//! Reads line commands from stdin, applies them to an in-memory tracker and
//! prints the resulting view as JSON. The overdue monitor runs alongside and
//! its warnings are written to stderr.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use prazo_core::tracker::{self, SharedTracker};
use prazo_core::{
    ChannelNotifier, Config, FilterMode, LogNotifier, Notifier, OverdueMonitor, Tracker,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::line::{SessionCommand, HELP};

#[derive(Args)]
pub struct SessionArgs {
    /// Seconds between overdue checks (overrides monitor.interval_secs)
    #[arg(long)]
    pub interval_secs: Option<u64>,
    /// Initial task filter: all, completed, pending or overdue
    #[arg(long)]
    pub filter: Option<FilterMode>,
    /// Do not run the overdue monitor
    #[arg(long)]
    pub no_monitor: bool,
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(args, config))?;
    Ok(())
}

async fn session(args: SessionArgs, config: Config) -> prazo_core::Result<()> {
    let mut tracker = Tracker::new();
    tracker.set_filter_mode(args.filter.unwrap_or(config.view.default_filter));
    let shared = tracker.into_shared();

    let (channel, mut alerts) = ChannelNotifier::new();
    let notifier: Arc<dyn Notifier> = if config.notifications.enabled {
        Arc::new(channel)
    } else {
        Arc::new(LogNotifier)
    };

    let period = args
        .interval_secs
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.monitor_period());
    let mut monitor = (config.monitor.enabled && !args.no_monitor)
        .then(|| OverdueMonitor::new(period).start(Arc::clone(&shared), notifier));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => apply(&shared, command)?,
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Some(alert) = alerts.recv() => {
                eprintln!("{}: {}", alert.heading(), alert.message());
            }
        }
    }

    if let Some(handle) = monitor.as_mut() {
        handle.stop();
    }
    debug!("session ended");
    Ok(())
}

fn apply(shared: &SharedTracker, command: SessionCommand) -> prazo_core::Result<()> {
    let mut guard = tracker::lock(shared);
    let view = match command {
        SessionCommand::Add(draft) => guard.add(&draft),
        SessionCommand::Remove(id) => guard.remove(id),
        SessionCommand::Toggle(id) => guard.toggle_complete(id),
        SessionCommand::Save(task) => guard.update(*task),
        SessionCommand::Cancel => guard.cancel_edit(),
        SessionCommand::Filter(mode) => guard.set_filter_mode(mode),
        SessionCommand::Show => guard.view(),
        SessionCommand::Edit(id) => {
            match guard.begin_edit(id) {
                Some(task) => println!("{}", serde_json::to_string(&task)?),
                None => eprintln!("no task with id {id}"),
            }
            return Ok(());
        }
        SessionCommand::Help => {
            println!("{HELP}");
            return Ok(());
        }
        SessionCommand::Quit => return Ok(()),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
