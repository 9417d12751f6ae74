//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kubedash::kubectl::KubectlError;
use kubedash::{CommandOutput, CommandRunner, StreamEvent};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Command runner that replays queued outputs and records every invocation
#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<VecDeque<CommandOutput>>,
    stream_lines: Vec<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<Vec<String>>>,
    streamed: Mutex<Vec<Vec<String>>>,
    launched: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output of the next `run` call
    pub fn respond(self, output: CommandOutput) -> Self {
        self.responses.lock().unwrap().push_back(output);
        self
    }

    pub fn respond_json(self, document: Value) -> Self {
        self.respond(CommandOutput::ok(document.to_string()))
    }

    /// Lines every `stream` call emits before exiting with status 0
    pub fn with_stream(mut self, lines: &[&str]) -> Self {
        self.stream_lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Make every `run` call take this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Most `run` calls that were ever in progress at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn streamed(&self) -> Vec<Vec<String>> {
        self.streamed.lock().unwrap().clone()
    }

    pub fn launched(&self) -> Vec<Vec<String>> {
        self.launched.lock().unwrap().clone()
    }

    /// Nothing was run, streamed or launched
    pub fn untouched(&self) -> bool {
        self.calls().is_empty() && self.streamed().is_empty() && self.launched().is_empty()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, KubectlError> {
        self.calls.lock().unwrap().push(args.to_vec());
        let response = self.responses.lock().unwrap().pop_front();
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(response.unwrap_or_else(|| CommandOutput::failed(1, "no response queued")))
    }

    fn stream(&self, args: &[String]) -> Result<mpsc::UnboundedReceiver<StreamEvent>, KubectlError> {
        self.streamed.lock().unwrap().push(args.to_vec());
        let (tx, rx) = mpsc::unbounded_channel();
        for line in &self.stream_lines {
            let _ = tx.send(StreamEvent::Line(line.clone()));
        }
        let _ = tx.send(StreamEvent::Exited(Some(0)));
        Ok(rx)
    }

    fn launch(&self, argv: &[String]) -> Result<(), KubectlError> {
        self.launched.lock().unwrap().push(argv.to_vec());
        Ok(())
    }

    fn command_line(&self, args: &[String]) -> Vec<String> {
        std::iter::once("kubectl".to_string())
            .chain(args.iter().cloned())
            .collect()
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn pod(name: &str, namespace: &str, phase: &str) -> Value {
    json!({
        "kind": "Pod",
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"nodeName": "node-a", "containers": [{"name": "app"}]},
        "status": {
            "phase": phase,
            "podIP": "10.0.0.1",
            "containerStatuses": [{"name": "app", "ready": phase == "Running", "restartCount": 0}]
        }
    })
}

pub fn list(items: Vec<Value>) -> Value {
    json!({"apiVersion": "v1", "kind": "List", "items": items})
}
