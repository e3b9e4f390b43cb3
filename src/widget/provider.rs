use std::time::Duration;

use thiserror::Error;

use crate::channel::{BroadcastBus, BroadcastMessage, Subscription};
use crate::store::{CounterValue, StoreError, StoreService};

use super::view::{WidgetAction, WidgetInstanceId, WidgetView};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Widget instance {instance} no longer exists")]
    InstanceGone { instance: WidgetInstanceId },

    #[error("Failed to render widget instance {instance}: {reason}")]
    Failed {
        instance: WidgetInstanceId,
        reason: String,
    },
}

/// Where widget views end up (launcher, console, test recorder).
pub trait WidgetHost: Send {
    /// Currently placed instances.
    fn instance_ids(&self) -> Vec<WidgetInstanceId>;

    fn render(&mut self, view: &WidgetView) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapPhase {
    #[default]
    Idle,
    Processing(WidgetAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Periodic,
    StoreChanged,
}

/// Result of redrawing every instance.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub count: CounterValue,
    pub rendered: Vec<WidgetInstanceId>,
    pub failed: Vec<(WidgetInstanceId, RenderError)>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Home-screen widget provider.
///
/// Lives independently of the foreground container: it talks to the store
/// directly and announces every commit on the bus.
pub struct HomeWidgetProvider<H> {
    store: StoreService,
    bus: BroadcastBus,
    host: H,
    phase: TapPhase,
}

impl<H: WidgetHost> HomeWidgetProvider<H> {
    pub fn new(store: StoreService, bus: BroadcastBus, host: H) -> Self {
        Self {
            store,
            bus,
            host,
            phase: TapPhase::Idle,
        }
    }

    pub fn phase(&self) -> TapPhase {
        self.phase
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Read-modify-write the store, announce the new value, redraw.
    ///
    /// The read and the write are separate store operations; a concurrent
    /// writer in between is overwritten (last write wins).
    pub async fn on_tap(&mut self, action: WidgetAction) -> Result<RenderReport, StoreError> {
        self.phase = TapPhase::Processing(action);
        let committed = commit(&self.store, action).await;
        self.phase = TapPhase::Idle;

        let value = committed?;
        self.bus.publish(BroadcastMessage::value_changed(value));
        Ok(self.redraw(value))
    }

    /// Redraw from the store without mutating it.
    pub async fn on_refresh(&mut self, trigger: RefreshTrigger) -> Result<RenderReport, StoreError> {
        let value = self.store.get().await?;
        tracing::trace!(?trigger, count = %value, "Widget refresh");
        Ok(self.redraw(value))
    }

    /// Dispatch one bus message. Value announcements (including our own) are
    /// ignored.
    pub async fn on_receive(
        &mut self,
        message: BroadcastMessage,
    ) -> Result<Option<RenderReport>, StoreError> {
        match message {
            BroadcastMessage::IncrementRequested => {
                self.on_tap(WidgetAction::Increment).await.map(Some)
            }
            BroadcastMessage::DecrementRequested => {
                self.on_tap(WidgetAction::Decrement).await.map(Some)
            }
            BroadcastMessage::RefreshRequested => {
                self.on_refresh(RefreshTrigger::StoreChanged).await.map(Some)
            }
            BroadcastMessage::ValueChanged(_) => Ok(None),
        }
    }

    /// Event loop: bus messages plus the optional periodic refresh.
    ///
    /// The first periodic tick fires immediately, which draws freshly placed
    /// instances. Returns when the bus closes.
    pub async fn run(mut self, mut subscription: Subscription, refresh_every: Option<Duration>) {
        let mut ticker = refresh_every.map(tokio::time::interval);

        loop {
            let message = tokio::select! {
                message = subscription.recv() => message,
                _ = tick(&mut ticker) => {
                    if let Err(e) = self.on_refresh(RefreshTrigger::Periodic).await {
                        tracing::warn!(error = %e, "Periodic widget refresh failed");
                    }
                    continue;
                }
            };

            let Some(message) = message else {
                break;
            };
            if let Err(e) = self.on_receive(message).await {
                tracing::warn!(action = message.action_id(), error = %e, "Widget action failed");
            }
        }
        tracing::debug!("Widget provider stopped");
    }

    /// Redraw every instance; one failure does not stop the others.
    fn redraw(&mut self, count: CounterValue) -> RenderReport {
        let mut report = RenderReport {
            count,
            ..RenderReport::default()
        };

        for instance in self.host.instance_ids() {
            let view = WidgetView::build(instance, count);
            match self.host.render(&view) {
                Ok(()) => report.rendered.push(instance),
                Err(e) => {
                    tracing::warn!(%instance, error = %e, "Widget instance redraw failed");
                    report.failed.push((instance, e));
                }
            }
        }
        report
    }
}

/// Read, apply, write. Not atomic across the two store calls.
async fn commit(store: &StoreService, action: WidgetAction) -> Result<CounterValue, StoreError> {
    let current = store.get().await?;
    let next = action.apply(current);
    store.set(next).await?;
    tracing::debug!(count = %next, action = action.action_id(), "Widget count updated");
    Ok(next)
}

async fn tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
