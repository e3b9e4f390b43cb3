//! Query surface the foreground container uses to reach the shared record.
//!
//! The container never touches the store directly: it sends
//! `getSharedCount` / `setSharedCount` requests to a [`BridgeServer`] task
//! that owns the store handle, and awaits the reply with a timeout. A
//! rejected request carries an identifying code (`GET_COUNT_ERROR`,
//! `SET_COUNT_ERROR`) that callers can surface or ignore.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::channel::{BroadcastBus, BroadcastMessage};
use crate::store::{CounterValue, StoreError, StoreService};

const BRIDGE_BUFFER: usize = 16;
const BRIDGE_TIMEOUT: Duration = Duration::from_secs(2);

pub const GET_COUNT_ERROR: &str = "GET_COUNT_ERROR";
pub const SET_COUNT_ERROR: &str = "SET_COUNT_ERROR";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{code}: {source}")]
    Rejected {
        code: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Bridge channel disconnected")]
    Disconnected,

    #[error("Bridge request timed out")]
    Timeout,
}

impl BridgeError {
    /// Identifying code reported to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Rejected { code, .. } => *code,
            BridgeError::Disconnected => "BRIDGE_DISCONNECTED",
            BridgeError::Timeout => "BRIDGE_TIMEOUT",
        }
    }
}

pub enum BridgeCommand {
    GetSharedCount {
        respond_to: oneshot::Sender<Result<CounterValue, StoreError>>,
    },
    SetSharedCount {
        value: CounterValue,
        respond_to: oneshot::Sender<Result<(), StoreError>>,
    },
}

pub struct BridgeLayer;

impl BridgeLayer {
    pub fn new() -> (BridgeClient, BridgeServer) {
        let (sender, receiver) = mpsc::channel(BRIDGE_BUFFER);
        (BridgeClient { sender }, BridgeServer { receiver })
    }
}

#[derive(Clone)]
pub struct BridgeClient {
    sender: mpsc::Sender<BridgeCommand>,
}

impl BridgeClient {
    pub async fn get_shared_count(&self) -> Result<CounterValue, BridgeError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(BridgeCommand::GetSharedCount { respond_to })
            .await
            .map_err(|_| BridgeError::Disconnected)?;

        recv_with_timeout(receiver)
            .await?
            .map_err(|source| BridgeError::Rejected {
                code: GET_COUNT_ERROR,
                source,
            })
    }

    pub async fn set_shared_count(&self, value: CounterValue) -> Result<(), BridgeError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(BridgeCommand::SetSharedCount { value, respond_to })
            .await
            .map_err(|_| BridgeError::Disconnected)?;

        recv_with_timeout(receiver)
            .await?
            .map_err(|source| BridgeError::Rejected {
                code: SET_COUNT_ERROR,
                source,
            })
    }
}

pub struct BridgeServer {
    receiver: mpsc::Receiver<BridgeCommand>,
}

impl BridgeServer {
    /// Serve requests until every client is dropped.
    ///
    /// A successful `setSharedCount` asks the home-screen widget to redraw.
    pub async fn run(mut self, store: StoreService, bus: BroadcastBus) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                BridgeCommand::GetSharedCount { respond_to } => {
                    let result = store.get().await;
                    if let Err(e) = &result {
                        tracing::warn!(code = GET_COUNT_ERROR, error = %e, "getSharedCount rejected");
                    }
                    if respond_to.send(result).is_err() {
                        tracing::trace!("Bridge: getSharedCount response dropped (caller gone)");
                    }
                }
                BridgeCommand::SetSharedCount { value, respond_to } => {
                    let result = store.set(value).await;
                    match &result {
                        Ok(()) => {
                            bus.publish(BroadcastMessage::RefreshRequested);
                        }
                        Err(e) => {
                            tracing::warn!(code = SET_COUNT_ERROR, %value, error = %e, "setSharedCount rejected");
                        }
                    }
                    if respond_to.send(result).is_err() {
                        tracing::trace!("Bridge: setSharedCount response dropped (caller gone)");
                    }
                }
            }
        }
    }
}

async fn recv_with_timeout<T>(receiver: oneshot::Receiver<T>) -> Result<T, BridgeError> {
    match tokio::time::timeout(BRIDGE_TIMEOUT, receiver).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => Err(BridgeError::Disconnected),
        Err(_) => Err(BridgeError::Timeout),
    }
}
