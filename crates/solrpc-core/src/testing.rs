//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::RpcTransport;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(String),
    Fail(String),
}

impl Reply {
    pub(crate) fn body(body: &str) -> Self {
        Self::Body(body.to_string())
    }

    pub(crate) fn fail(msg: &str) -> Self {
        Self::Fail(msg.to_string())
    }
}

/// Plays back scripted replies in order, repeating the last one, and
/// records every request it receives.
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Value>>,
    latency: Duration,
}

impl MockTransport {
    pub(crate) fn scripted(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "mock needs at least one reply");
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    pub(crate) fn replying(body: &str) -> Self {
        Self::scripted(vec![Reply::body(body)])
    }

    pub(crate) fn failing(msg: &str) -> Self {
        Self::scripted(vec![Reply::fail(msg)])
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock();
        if replies.len() > 1 {
            replies.pop_front().expect("non-empty")
        } else {
            replies.front().cloned().expect("non-empty")
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        let request = serde_json::from_slice(&body).expect("client sent invalid JSON");
        self.requests.lock().push(request);
        let reply = self.next_reply();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match reply {
            Reply::Body(body) => Ok(body.into_bytes()),
            Reply::Fail(msg) => Err(ClientError::Transport(msg)),
        }
    }

    fn url(&self) -> &str {
        "mock://node"
    }
}
