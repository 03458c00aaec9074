#![allow(dead_code)]

use async_trait::async_trait;
use sqs_health_consumer::client::QueueClient;
use sqs_health_consumer::consumer::{MessageHandler, ReceiveSettings};
use sqs_health_consumer::errors::{ConsumerError, HandlerError};
use sqs_health_consumer::message::Message;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the scripted queue does once its responses run out.
#[derive(Clone, Copy)]
pub enum WhenExhausted {
    /// Fail the receive, which ends `Consumer::run`.
    Fail,
    /// Block like a long-poll that never returns.
    Pending,
}

struct QueueState {
    responses: VecDeque<Option<Vec<Message>>>,
    receive_calls: Vec<(Option<String>, ReceiveSettings)>,
    deletes: Vec<(Option<String>, String)>,
    fail_deletes: bool,
    when_exhausted: WhenExhausted,
}

/// In-memory stand-in for SQS that replays a fixed list of responses.
#[derive(Clone)]
pub struct ScriptedQueue {
    state: Arc<Mutex<QueueState>>,
}

impl ScriptedQueue {
    pub fn new(responses: Vec<Option<Vec<Message>>>, when_exhausted: WhenExhausted) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                responses: responses.into(),
                receive_calls: Vec::new(),
                deletes: Vec::new(),
                fail_deletes: false,
                when_exhausted,
            })),
        }
    }

    pub fn failing_deletes(self) -> Self {
        self.state.lock().unwrap().fail_deletes = true;
        self
    }

    pub fn receive_count(&self) -> usize {
        self.state.lock().unwrap().receive_calls.len()
    }

    pub fn receive_calls(&self) -> Vec<(Option<String>, ReceiveSettings)> {
        self.state.lock().unwrap().receive_calls.clone()
    }

    pub fn deletes(&self) -> Vec<(Option<String>, String)> {
        self.state.lock().unwrap().deletes.clone()
    }
}

#[async_trait]
impl QueueClient for ScriptedQueue {
    async fn receive(
        &self,
        queue_url: Option<&str>,
        settings: &ReceiveSettings,
    ) -> Result<Option<Vec<Message>>, ConsumerError> {
        let (next, when_exhausted) = {
            let mut state = self.state.lock().unwrap();
            state
                .receive_calls
                .push((queue_url.map(str::to_string), settings.clone()));
            (state.responses.pop_front(), state.when_exhausted)
        };

        tokio::task::yield_now().await;

        match (next, when_exhausted) {
            (Some(response), _) => Ok(response),
            (None, WhenExhausted::Fail) => Err(ConsumerError::ReceiveError(
                "connection refused".to_string(),
            )),
            (None, WhenExhausted::Pending) => std::future::pending().await,
        }
    }

    async fn delete(
        &self,
        queue_url: Option<&str>,
        receipt_handle: &str,
    ) -> Result<(), ConsumerError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(ConsumerError::DeleteError("access denied".to_string()));
        }
        state
            .deletes
            .push((queue_url.map(str::to_string), receipt_handle.to_string()));
        Ok(())
    }
}

/// Records every body it sees and fails on the bodies it was told to.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    failing_bodies: Vec<String>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    pub fn failing_on(bodies: &[&str]) -> Self {
        Self {
            failing_bodies: bodies.iter().map(|b| b.to_string()).collect(),
            seen: Arc::default(),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        let body = message.body.clone().unwrap_or_default();
        self.seen.lock().unwrap().push(body.clone());

        if self.failing_bodies.contains(&body) {
            return Err(HandlerError::Processing(format!("cannot process {body}")));
        }
        Ok(())
    }
}

pub const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/jobs";

pub fn one(body: &str, receipt_handle: &str) -> Option<Vec<Message>> {
    Some(vec![Message::new(body, receipt_handle)])
}
