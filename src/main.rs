use async_trait::async_trait;
use sqs_health_consumer::app::run_app;
use sqs_health_consumer::client::create_sqs_client;
use sqs_health_consumer::consumer::{Consumer, ConsumerConfig, MessageHandler};
use sqs_health_consumer::errors::{ConsumerError, HandlerError};
use sqs_health_consumer::message::Message;
use sqs_health_consumer::shutdown::{shutdown_channel, wait_for_signal};
use tracing::{error, info};

/// Logs each body. Messages without a body are rejected and left in the queue.
struct LogBodyHandler;

#[async_trait]
impl MessageHandler for LogBodyHandler {
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        let body = message
            .body
            .as_deref()
            .ok_or_else(|| HandlerError::InvalidMessage("message has no body".to_string()))?;

        info!(message_id = message.id_or_unknown(), body, "Processed message");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), ConsumerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ConsumerConfig::from_env()?;
    info!(
        queue_url = ?config.queue_url,
        region = %config.region,
        static_credentials = config.access_key_id.is_some(),
        "Starting SQS consumer"
    );

    let client = create_sqs_client(&config).await;
    let (controller, shutdown) = shutdown_channel();

    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(_) => controller.shutdown(),
            Err(e) => {
                // Dropping the controller would count as a shutdown request.
                error!(error = %e, "Failed to register signal handlers; running until killed");
                std::future::pending::<()>().await;
                drop(controller);
            }
        }
    });

    let consumer = Consumer::from_config(client, LogBodyHandler, &config);
    run_app(consumer, config.health_addr, shutdown).await?;

    info!("Shut down cleanly");
    Ok(())
}
