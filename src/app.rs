use std::net::SocketAddr;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::client::QueueClient;
use crate::consumer::{Consumer, MessageHandler};
use crate::errors::ConsumerError;
use crate::health::run_health_server;
use crate::shutdown::ShutdownSignal;

/// Starts `consumer.run` on its own task.
///
/// The terminal result is logged here and also returned through the handle.
/// Nothing else observes it, the health endpoint included.
pub fn spawn_consumer<Q, H>(
    consumer: Consumer<Q, H>,
    shutdown: ShutdownSignal,
) -> JoinHandle<Result<(), ConsumerError>>
where
    Q: QueueClient + 'static,
    H: MessageHandler + 'static,
{
    tokio::spawn(async move {
        let result = consumer.run(shutdown).await;
        if let Err(e) = &result {
            error!(error = %e, "Consumer loop terminated");
        }
        result
    })
}

/// Runs the consumer in the background and serves the health endpoint on
/// the current task until `shutdown` fires.
///
/// Returns an error only when the health server fails. A consumer that died
/// on a transport error has already been logged by then.
pub async fn run_app<Q, H>(
    consumer: Consumer<Q, H>,
    health_addr: SocketAddr,
    shutdown: ShutdownSignal,
) -> Result<(), ConsumerError>
where
    Q: QueueClient + 'static,
    H: MessageHandler + 'static,
{
    let consumer_task = spawn_consumer(consumer, shutdown.clone());

    let served = run_health_server(health_addr, shutdown).await;
    if served.is_err() {
        consumer_task.abort();
    }

    match consumer_task.await {
        Ok(_) => {}
        Err(e) if e.is_cancelled() => info!("Consumer task cancelled"),
        Err(e) => error!(error = %e, "Consumer task panicked"),
    }

    served.map_err(ConsumerError::from)
}
