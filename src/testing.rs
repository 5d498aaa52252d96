//! Fakes shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{oneshot, watch};

use crate::errors::LintError;
use crate::schema::validate::LintRequest;
use crate::service::LintTransport;
use crate::ui::Notifier;

type Reply = Result<Value, LintError>;

enum Script {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Transport whose replies are scripted per request `code`.
///
/// Unscripted codes fail with a network error.
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<LintRequest>>,
    calls: watch::Sender<usize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        let (calls, _) = watch::channel(0);
        Self {
            scripts: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            calls,
        }
    }

    pub fn respond(&self, code: &str, reply: Reply) {
        self.scripts
            .lock()
            .unwrap()
            .insert(code.to_string(), Script::Ready(reply));
    }

    /// The request for `code` stays pending until the returned sender fires.
    pub fn gate(&self, code: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.scripts
            .lock()
            .unwrap()
            .insert(code.to_string(), Script::Gated(rx));
        tx
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    pub fn requests(&self) -> Vec<LintRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.calls.subscribe();
        rx.wait_for(|calls| *calls >= count).await.unwrap();
    }
}

#[async_trait]
impl LintTransport for ScriptedTransport {
    async fn send(&self, request: &LintRequest) -> Result<Value, LintError> {
        let script = self.scripts.lock().unwrap().remove(&request.code);
        self.requests.lock().unwrap().push(request.clone());
        self.calls.send_modify(|calls| *calls += 1);

        match script {
            Some(Script::Ready(reply)) => reply,
            Some(Script::Gated(rx)) => rx.await.unwrap_or_else(|_| Err(LintError::network())),
            None => Err(LintError::network()),
        }
    }
}

/// Records every message it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
}
