//! # SQS Health Consumer
//!
//! A minimal AWS SQS consumer. It long-polls for one message at a time, hands
//! it to a user-supplied handler, deletes it once the handler succeeds, and
//! serves a static health check while the loop runs in the background.
//!
//! ## Behavior
//!
//! - One message in flight at a time (`MaxNumberOfMessages = 1`)
//! - 20 second long-poll, visibility timeout of zero
//! - Handler failures are logged and the message is left for redelivery
//! - Queue failures end the loop; the health endpoint keeps answering `Ok`
//! - A shared shutdown signal stops both the loop and the server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_health_consumer::{
//!     app::run_app,
//!     client::create_sqs_client,
//!     consumer::{Consumer, ConsumerConfig, HandlerFn},
//!     errors::HandlerError,
//!     message::Message,
//!     shutdown::shutdown_channel,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConsumerConfig::from_env()?;
//!     let client = create_sqs_client(&config).await;
//!
//!     let handler = HandlerFn::new(
//!         |message: Message, prefix: String| async move {
//!             println!("{prefix}: {:?}", message.body);
//!             Ok::<(), HandlerError>(())
//!         },
//!         "received".to_string(),
//!     );
//!
//!     let (_controller, shutdown) = shutdown_channel();
//!     let consumer = Consumer::from_config(client, handler, &config);
//!     run_app(consumer, config.health_addr, shutdown).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod consumer;
pub mod errors;
pub mod health;
pub mod message;
pub mod shutdown;
