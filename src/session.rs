//! Interactive session: the foreground container and the home-screen widget
//! running side by side on one store and one bus.
//!
//! Commands (one per line):
//!
//! | input       | effect                                        |
//! |-------------|-----------------------------------------------|
//! | `+` / `-`   | press the app's increase / decrease button    |
//! | `w+` / `w-` | tap the widget's plus / minus region          |
//! | `bg` / `fg` | send the app to background / bring it back    |
//! | `set N`     | external write of `N` straight to the store   |
//! | `sync`      | handle broadcasts already delivered to the app|
//! | `q`         | quit                                          |

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::bridge::BridgeLayer;
use crate::channel::{BroadcastBus, BroadcastMessage};
use crate::config::Config;
use crate::reconcile::ReconcileOutcome;
use crate::store::{CounterValue, StoreService};
use crate::ui::app::ForegroundApp;
use crate::ui::counter::{CommandOutcome, CounterCommand};
use crate::ui::events::AppState;
use crate::widget::{HomeWidgetProvider, TapRegion, WidgetHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Press(CounterCommand),
    Tap(TapRegion),
    AppState(AppState),
    ExternalSet(CounterValue),
    Sync,
    Quit,
}

enum Step {
    Input(std::io::Result<Option<String>>),
    Bus(Option<BroadcastMessage>),
}

fn parse_command(line: &str) -> Option<SessionCommand> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let command = match head {
        "+" => SessionCommand::Press(CounterCommand::Increase),
        "-" => SessionCommand::Press(CounterCommand::Decrease),
        "w+" => SessionCommand::Tap(TapRegion::Plus),
        "w-" => SessionCommand::Tap(TapRegion::Minus),
        "bg" => SessionCommand::AppState(AppState::Background),
        "fg" => SessionCommand::AppState(AppState::Active),
        "sync" => SessionCommand::Sync,
        "q" | "quit" => SessionCommand::Quit,
        "set" => {
            let value = parts.next()?.parse::<u32>().ok()?;
            SessionCommand::ExternalSet(CounterValue::new(value))
        }
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

/// Run a session until `q` or end of input.
pub async fn run_session<R, H, W>(
    config: &Config,
    store: StoreService,
    input: R,
    host: H,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    H: WidgetHost + 'static,
    W: Write,
{
    let bus = BroadcastBus::new(config.broadcast.capacity);

    let (bridge, bridge_server) = BridgeLayer::new();
    let bridge_task = scopeguard::guard(
        tokio::spawn(bridge_server.run(store.clone(), bus.clone())),
        |task| task.abort(),
    );

    let provider = HomeWidgetProvider::new(store.clone(), bus.clone(), host);
    let refresh_every = match config.widget.refresh_interval_seconds {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let widget_task = scopeguard::guard(
        tokio::spawn(provider.run(bus.subscribe("widget"), refresh_every)),
        |task| task.abort(),
    );

    let mut app = ForegroundApp::mount(bridge, &bus, config.foreground.clone())
        .await
        .context("Failed to mount foreground container")?;
    writeln!(out, "app: count {}", app.displayed())?;

    let mut lines = input.lines();
    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Input(line),
            message = app.next_broadcast() => Step::Bus(message),
        };

        let line = match step {
            Step::Input(line) => line.context("Failed to read session input")?,
            Step::Bus(Some(message)) => {
                if let Ok(Some(outcome)) = app.on_broadcast(message).await {
                    report_outcome(out, &outcome)?;
                }
                continue;
            }
            Step::Bus(None) => continue,
        };

        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = parse_command(&line) else {
            writeln!(out, "error: unknown command '{}'", line.trim())?;
            continue;
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Press(command) => match app.press(command).await {
                Ok(CommandOutcome::Applied(value)) => writeln!(out, "app: count {}", value)?,
                Ok(_) => writeln!(out, "app: count {} (unchanged)", app.displayed())?,
                Err(e) => writeln!(out, "app: {} rejected ({})", command.name(), e.code())?,
            },
            SessionCommand::Tap(region) => {
                bus.publish(region.action().message());
            }
            SessionCommand::AppState(state) => match app.on_app_state_change(state).await {
                Ok(Some(outcome)) => report_outcome(out, &outcome)?,
                Ok(None) => writeln!(out, "app: {}", state.as_str())?,
                Err(e) => writeln!(out, "app: resume skipped ({})", e.code())?,
            },
            SessionCommand::ExternalSet(value) => {
                store.set(value).await.context("External store write failed")?;
                writeln!(out, "store: {}", value)?;
            }
            SessionCommand::Sync => match app.poll_broadcasts().await {
                Ok(Some(outcome)) => report_outcome(out, &outcome)?,
                Ok(None) => writeln!(out, "app: nothing delivered")?,
                Err(e) => writeln!(out, "app: sync skipped ({})", e.code())?,
            },
        }
    }

    let final_count = app.displayed();
    app.unmount();
    writeln!(out, "app: unmounted at {}", final_count)?;

    drop(widget_task);
    drop(bridge_task);
    Ok(())
}

fn report_outcome<W: Write>(out: &mut W, outcome: &ReconcileOutcome) -> std::io::Result<()> {
    match outcome {
        ReconcileOutcome::InSync { value } => writeln!(out, "app: in sync at {}", value),
        ReconcileOutcome::Replayed { from, to, replay } => writeln!(
            out,
            "app: reconciled {} -> {} ({} commands)",
            from, to, replay.commands
        ),
        ReconcileOutcome::Diverged {
            expected, observed, ..
        } => writeln!(out, "app: diverged, store {} view {}", expected, observed),
    }
}
