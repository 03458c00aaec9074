use crate::errors::HandlerError;
use crate::message::Message;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// Business logic applied to each received message.
///
/// Returning `Ok(())` means the message is fully processed and may be
/// deleted. Returning an error leaves it in the queue for redelivery.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Processes one message.
    ///
    /// # Arguments
    ///
    /// * `message` - The received message, including its receipt handle
    async fn handle(&self, message: &Message) -> Result<(), HandlerError>;
}

#[async_trait]
impl<F, Fut, TShared> MessageHandler for HandlerFn<F, Fut, TShared>
where
    F: Fn(Message, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        (self.handler_fn)(message.clone(), self.shared_resources.clone()).await
    }
}

/// Adapts an async closure and a set of shared resources into a
/// [`MessageHandler`].
///
/// The shared resources are cloned into every call, so they are usually an
/// `Arc` or a handle type such as a database pool.
///
/// # Type Parameters
///
/// * `F` - The message handler function type
/// * `Fut` - The future returned by the handler function
/// * `TShared` - The type of shared resources passed to the handler
pub struct HandlerFn<F, Fut, TShared>
where
    F: Fn(Message, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    handler_fn: F,
    shared_resources: TShared,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut, TShared> HandlerFn<F, Fut, TShared>
where
    F: Fn(Message, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    /// Creates a handler from a function and the resources it shares
    /// between calls.
    pub fn new(handler_fn: F, shared_resources: TShared) -> Self {
        HandlerFn {
            handler_fn,
            shared_resources,
            _future: PhantomData,
        }
    }
}
