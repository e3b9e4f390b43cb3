//! Foreground container.
//!
//! Hosts the embedded counter view, writes user-driven changes through the
//! bridge, and reconciles the view against the store on mount, on every
//! resume and (optionally) when the home-screen widget announces a change.

use tokio::sync::mpsc;

use crate::bridge::{BridgeClient, BridgeError};
use crate::channel::{BroadcastBus, BroadcastMessage, Subscription};
use crate::config::ForegroundConfig;
use crate::reconcile::{
    drive_to_target, ReconcileOutcome, ReconcileTrigger, ReconciliationState,
};
use crate::store::CounterValue;
use crate::ui::counter::{ChangeEvents, CommandOutcome, CounterCommand, EmbeddedCounter};
use crate::ui::events::{AppEvent, AppState};

pub struct ForegroundApp {
    bridge: BridgeClient,
    config: ForegroundConfig,
    view: EmbeddedCounter,
    events: ChangeEvents,
    sync: ReconciliationState,
    displayed: CounterValue,
    app_state: AppState,
    subscription: Subscription,
}

enum Step {
    Inbox(Option<AppEvent>),
    Bus(Option<BroadcastMessage>),
}

impl ForegroundApp {
    /// Mount the container.
    ///
    /// Subscribes to the bus, reads the shared count, creates and attaches
    /// the embedded view, then runs the mount-time reconciliation pass. Only
    /// the initial read can fail the mount; the subscription acquired before
    /// it is released on that path.
    pub async fn mount(
        bridge: BridgeClient,
        bus: &BroadcastBus,
        config: ForegroundConfig,
    ) -> Result<Self, BridgeError> {
        let subscription = bus.subscribe("foreground");
        let initial = bridge.get_shared_count().await?;

        let (view, events) = EmbeddedCounter::create(initial);
        let mut app = Self {
            bridge,
            config,
            view,
            events,
            sync: ReconciliationState::new(initial),
            displayed: initial,
            app_state: AppState::Active,
            subscription,
        };

        app.view.attach();
        if let Some(value) = app.drain_confirmations() {
            // The attach announcement is what the view shows; it is not a
            // user change and must not overwrite the store.
            app.sync.last_known = value;
            app.displayed = value;
        }
        tracing::info!(count = %app.displayed, "Foreground mounted");

        // Failure is logged inside; state stays as initialized.
        let _ = app.reconcile(ReconcileTrigger::Mount).await;
        Ok(app)
    }

    /// Count currently shown to the user.
    pub fn displayed(&self) -> CounterValue {
        self.displayed
    }

    pub fn last_known(&self) -> CounterValue {
        self.sync.last_known
    }

    /// Count held by the embedded view.
    pub fn view_count(&self) -> CounterValue {
        self.view.count()
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    /// The decrease button is disabled at zero.
    pub fn can_decrease(&self) -> bool {
        !self.displayed.is_zero()
    }

    /// User pressed a button: command the view and write the result through.
    ///
    /// If the write fails the view is stepped back with the inverse command
    /// so the visible count stays where it was, and the error is returned.
    pub async fn press(&mut self, command: CounterCommand) -> Result<CommandOutcome, BridgeError> {
        let outcome = self.view.receive_command(command);
        let Some(value) = self.drain_confirmations() else {
            return Ok(outcome);
        };

        if let Err(e) = self.bridge.set_shared_count(value).await {
            tracing::warn!(
                command = command.name(),
                code = e.code(),
                error = %e,
                "Store write failed, reverting view"
            );
            self.view.receive_command(command.inverse());
            self.drain_confirmations();
            return Err(e);
        }

        self.sync.last_known = value;
        self.displayed = value;
        Ok(outcome)
    }

    /// One reconciliation pass.
    ///
    /// On a failed store read the reconciliation state is left untouched and
    /// the error returned; the next resume retries.
    pub async fn reconcile(
        &mut self,
        trigger: ReconcileTrigger,
    ) -> Result<ReconcileOutcome, BridgeError> {
        let authoritative = match self.bridge.get_shared_count().await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    trigger = trigger.as_str(),
                    code = e.code(),
                    error = %e,
                    "Reconciliation skipped, will retry on next resume"
                );
                return Err(e);
            }
        };

        let from = self.sync.last_known;
        if from == authoritative {
            tracing::debug!(trigger = trigger.as_str(), count = %from, "Already in sync");
            return Ok(ReconcileOutcome::InSync { value: from });
        }

        // Replay events are confirmations only: consumed step by step,
        // never written back to the store.
        let mut target = ReplayTarget::new(&mut self.view, &mut self.events);
        let replay = drive_to_target(
            &mut target,
            from,
            authoritative,
            |target| target.step(CounterCommand::Increase),
            |target| target.step(CounterCommand::Decrease),
        );
        let observed = target.observed.unwrap_or(from);
        self.displayed = observed;

        if observed != authoritative {
            tracing::warn!(
                trigger = trigger.as_str(),
                expected = %authoritative,
                observed = %observed,
                commands = replay.commands,
                "View diverged from store after replay"
            );
            self.sync.last_known = observed;
            return Ok(ReconcileOutcome::Diverged {
                expected: authoritative,
                observed,
                replay,
            });
        }

        self.sync.last_known = authoritative;
        tracing::info!(
            trigger = trigger.as_str(),
            from = %from,
            to = %authoritative,
            commands = replay.commands,
            "Reconciled"
        );
        Ok(ReconcileOutcome::Replayed {
            from,
            to: authoritative,
            replay,
        })
    }

    /// Visibility change. Every transition to `Active` is a resume and
    /// triggers a reconciliation pass.
    pub async fn on_app_state_change(
        &mut self,
        state: AppState,
    ) -> Result<Option<ReconcileOutcome>, BridgeError> {
        let previous = self.app_state;
        self.app_state = state;
        tracing::debug!(from = previous.as_str(), to = state.as_str(), "App state changed");

        if state != AppState::Active {
            return Ok(None);
        }
        self.reconcile(ReconcileTrigger::Resume).await.map(Some)
    }

    /// Handle one bus message. Only value announcements matter here; the
    /// payload is a hint and the store is re-read.
    pub async fn on_broadcast(
        &mut self,
        message: BroadcastMessage,
    ) -> Result<Option<ReconcileOutcome>, BridgeError> {
        match message {
            BroadcastMessage::ValueChanged(broadcast) if self.config.reconcile_on_broadcast => {
                tracing::debug!(hint = %broadcast.value, "Value change announced");
                self.reconcile(ReconcileTrigger::Broadcast).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Wait for the next bus message addressed to this container.
    pub async fn next_broadcast(&mut self) -> Option<BroadcastMessage> {
        self.subscription.recv().await
    }

    /// Handle everything already delivered on the bus.
    ///
    /// Several queued announcements collapse into a single pass.
    pub async fn poll_broadcasts(&mut self) -> Result<Option<ReconcileOutcome>, BridgeError> {
        let mut latest = None;
        while let Some(message) = self.subscription.try_recv() {
            if matches!(message, BroadcastMessage::ValueChanged(_)) {
                latest = Some(message);
            }
        }
        match latest {
            Some(message) => self.on_broadcast(message).await,
            None => Ok(None),
        }
    }

    /// Dispatch loop: user input, visibility changes and bus messages.
    ///
    /// Returns on `Unmount` or when the inbox closes; the container is
    /// unmounted on the way out.
    pub async fn run(mut self, mut inbox: mpsc::Receiver<AppEvent>) {
        let mut bus_open = true;
        loop {
            let step = tokio::select! {
                event = inbox.recv() => Step::Inbox(event),
                message = self.next_broadcast(), if bus_open => Step::Bus(message),
            };

            match step {
                Step::Inbox(None) | Step::Inbox(Some(AppEvent::Unmount)) => break,
                Step::Inbox(Some(AppEvent::Press(command))) => {
                    // Rejections are logged in `press`.
                    let _ = self.press(command).await;
                }
                Step::Inbox(Some(AppEvent::AppStateChange(state))) => {
                    let _ = self.on_app_state_change(state).await;
                }
                Step::Bus(Some(message)) => {
                    let _ = self.on_broadcast(message).await;
                }
                Step::Bus(None) => bus_open = false,
            }
        }
        self.unmount();
    }

    /// Detach the view now. The bus subscription is released when `self`
    /// is dropped at the end of this call.
    pub fn unmount(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if !self.view.is_attached() {
            return;
        }
        self.view.detach();
        tracing::info!(count = %self.displayed, "Foreground unmounted");
    }

    fn drain_confirmations(&mut self) -> Option<CounterValue> {
        let mut last = None;
        while let Ok(event) = self.events.try_recv() {
            last = Some(event.value);
        }
        last
    }
}

impl Drop for ForegroundApp {
    fn drop(&mut self) {
        self.detach();
    }
}

/// View plus its event stream during a replay.
///
/// Each step's confirmation is consumed right away, so at most one event is
/// ever buffered no matter how long the replay is.
struct ReplayTarget<'a> {
    view: &'a mut EmbeddedCounter,
    events: &'a mut ChangeEvents,
    observed: Option<CounterValue>,
}

impl<'a> ReplayTarget<'a> {
    fn new(view: &'a mut EmbeddedCounter, events: &'a mut ChangeEvents) -> Self {
        Self {
            view,
            events,
            observed: None,
        }
    }

    fn step(&mut self, command: CounterCommand) {
        self.view.receive_command(command);
        while let Ok(event) = self.events.try_recv() {
            self.observed = Some(event.value);
        }
    }
}
