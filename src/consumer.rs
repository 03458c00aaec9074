use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};

use crate::client::QueueClient;
use crate::errors::ConsumerError;
use crate::message::Message;
use crate::shutdown::ShutdownSignal;

mod config;
mod handler;

pub use config::{ConsumerConfig, DEFAULT_HEALTH_PORT, DEFAULT_REGION, ReceiveSettings};
pub use handler::{HandlerFn, MessageHandler};

/// Lifecycle of the consumption loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Stopped,
    Running,
}

/// Shared view of whether [`Consumer::run`] is currently looping.
///
/// Clones observe the same flag, so a handle taken before the consumer is
/// moved into a task keeps reporting its state.
#[derive(Debug, Clone, Default)]
pub struct RunningFlag {
    running: Arc<AtomicBool>,
}

impl RunningFlag {
    pub fn state(&self) -> ConsumerState {
        if self.running.load(Ordering::SeqCst) {
            ConsumerState::Running
        } else {
            ConsumerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == ConsumerState::Running
    }

    fn set(&self, state: ConsumerState) {
        self.running
            .store(state == ConsumerState::Running, Ordering::SeqCst);
    }
}

/// Marks the flag stopped however `run` exits, including when its future is
/// dropped by an aborted task.
struct StopOnDrop<'a>(&'a RunningFlag);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set(ConsumerState::Stopped);
    }
}

/// Result of a single receive → handle → delete iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The long-poll returned without a message.
    Empty,
    /// The handler succeeded and the delivery was deleted.
    Acknowledged { receipt_handle: String },
    /// The handler failed; the message stays in the queue.
    HandlerFailed,
}

/// Receives one message at a time, hands it to a [`MessageHandler`] and
/// deletes it once the handler succeeds.
///
/// # Type Parameters
///
/// * `Q` - The queue collaborator, usually `aws_sdk_sqs::Client`
/// * `H` - The business logic applied to each message
pub struct Consumer<Q, H>
where
    Q: QueueClient,
    H: MessageHandler,
{
    client: Q,
    handler: H,
    queue_url: Option<String>,
    settings: ReceiveSettings,
    running: RunningFlag,
}

impl<Q, H> Consumer<Q, H>
where
    Q: QueueClient,
    H: MessageHandler,
{
    /// Creates a consumer for `queue_url` with the default receive settings.
    ///
    /// # Arguments
    ///
    /// * `client` - The queue collaborator
    /// * `handler` - The message handler
    /// * `queue_url` - The queue to poll, passed to the client as-is
    pub fn new(client: Q, handler: H, queue_url: Option<String>) -> Self {
        Consumer {
            client,
            handler,
            queue_url,
            settings: ReceiveSettings::default(),
            running: RunningFlag::default(),
        }
    }

    /// Creates a consumer for the queue named in `config`.
    pub fn from_config(client: Q, handler: H, config: &ConsumerConfig) -> Self {
        Consumer::new(client, handler, config.queue_url.clone())
    }

    pub fn queue_url(&self) -> Option<&str> {
        self.queue_url.as_deref()
    }

    pub fn state(&self) -> ConsumerState {
        self.running.state()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Returns a handle that keeps observing the state after `self` moves.
    pub fn running_flag(&self) -> RunningFlag {
        self.running.clone()
    }

    /// Long-polls for at most one message.
    ///
    /// Returns `Ok(None)` when the queue answered without messages. Transport
    /// errors are returned unchanged; there is no retry.
    pub async fn receive_one(&self) -> Result<Option<Message>, ConsumerError> {
        let messages = self
            .client
            .receive(self.queue_url.as_deref(), &self.settings)
            .await?;

        Ok(messages.and_then(|messages| messages.into_iter().next()))
    }

    /// Deletes `message` using its receipt handle.
    pub async fn acknowledge(&self, message: &Message) -> Result<(), ConsumerError> {
        let receipt_handle = message.receipt_handle.as_deref().ok_or_else(|| {
            ConsumerError::MissingReceiptHandle {
                message_id: message.id_or_unknown().to_string(),
            }
        })?;

        self.client
            .delete(self.queue_url.as_deref(), receipt_handle)
            .await
    }

    /// Runs one receive → handle → delete iteration.
    pub async fn poll_once(&self) -> Result<PollOutcome, ConsumerError> {
        let received = self.receive_one().await;
        self.after_receive(received).await
    }

    /// Polls until `shutdown` fires or the queue collaborator fails.
    ///
    /// Handler failures are logged and never end the loop. A shutdown request
    /// interrupts a pending long-poll but not a running handler. The state is
    /// `Running` for the duration of the call.
    pub async fn run(&self, mut shutdown: ShutdownSignal) -> Result<(), ConsumerError> {
        self.running.set(ConsumerState::Running);
        let _stopped = StopOnDrop(&self.running);
        info!(queue_url = ?self.queue_url, "Consumer started");

        let result = loop {
            if shutdown.is_shutdown() {
                break Ok(());
            }

            let received = tokio::select! {
                _ = shutdown.wait() => break Ok(()),
                received = self.receive_one() => received,
            };

            if let Err(e) = self.after_receive(received).await {
                break Err(e);
            }
        };

        if result.is_ok() {
            info!("Consumer stopped");
        }
        result
    }

    async fn after_receive(
        &self,
        received: Result<Option<Message>, ConsumerError>,
    ) -> Result<PollOutcome, ConsumerError> {
        match received? {
            Some(message) => self.dispatch(message).await,
            None => {
                debug!("No messages received");
                Ok(PollOutcome::Empty)
            }
        }
    }

    async fn dispatch(&self, message: Message) -> Result<PollOutcome, ConsumerError> {
        if let Err(e) = self.handler.handle(&message).await {
            error!(
                message_id = message.id_or_unknown(),
                error = %e,
                "Failed to handle message"
            );
            return Ok(PollOutcome::HandlerFailed);
        }

        self.acknowledge(&message).await?;
        let receipt_handle = message.receipt_handle.clone().unwrap_or_default();
        debug!(
            message_id = message.id_or_unknown(),
            receipt_handle = %receipt_handle,
            "Deleted message"
        );

        Ok(PollOutcome::Acknowledged { receipt_handle })
    }
}
