//! Line protocol spoken on stdin/stdout by `flowdeck run`.
//!
//! One request per line:
//!
//! - a JSON command object → acknowledgement JSON
//! - `state` → snapshot JSON
//! - `config` → config JSON
//! - `quit` → end the session
//!
//! A request with a string `action` is acknowledged as triggered even if the
//! action turns out to be unknown or malformed; those are dropped later and
//! logged. Only requests without an action, and commands the full queue
//! cannot take, get an error acknowledgement.

use std::sync::Arc;

use flowdeck_config::AppConfig;
use flowdeck_control::{
    Acknowledgement, CommandQueue, ControlCommand, SnapshotAssembler, Submission,
};

/// What to do with a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to send (blank line).
    Silent,
    /// Send this line.
    Line(String),
    /// End the session.
    Quit,
}

/// Request handling for one control client.
pub struct Session {
    queue: CommandQueue,
    assembler: SnapshotAssembler,
    config: Arc<AppConfig>,
}

impl Session {
    /// Session feeding commands to `queue` and answering queries from
    /// `assembler` and `config`.
    pub fn new(queue: CommandQueue, assembler: SnapshotAssembler, config: Arc<AppConfig>) -> Self {
        Self {
            queue,
            assembler,
            config,
        }
    }

    /// Answer one request line.
    pub fn handle_line(&self, line: &str) -> Reply {
        match line.trim() {
            "" => Reply::Silent,
            "quit" => Reply::Quit,
            "state" => Reply::Line(self.state_json()),
            "config" => Reply::Line(
                serde_json::to_string(self.config.as_ref())
                    .unwrap_or_else(|e| ack_json(&Acknowledgement::error(e.to_string()))),
            ),
            request => Reply::Line(ack_json(&self.handle_command(request))),
        }
    }

    /// Current snapshot as JSON.
    pub fn state_json(&self) -> String {
        let snapshot = self.assembler.assemble();
        serde_json::to_string(&snapshot)
            .unwrap_or_else(|e| ack_json(&Acknowledgement::error(e.to_string())))
    }

    /// Commands dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    /// Let queued commands finish.
    pub fn finish(self) {
        self.queue.shutdown();
    }

    fn handle_command(&self, request: &str) -> Acknowledgement {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(request) else {
            tracing::debug!(request, "request is not JSON");
            return Acknowledgement::error("Invalid request");
        };
        let Some(action) = value
            .get("action")
            .and_then(serde_json::Value::as_str)
            .filter(|a| !a.is_empty())
        else {
            return Acknowledgement::error("Invalid request");
        };

        match ControlCommand::from_json(&value) {
            Ok(command) => match self.queue.submit(command) {
                Submission::Accepted => Acknowledgement::success(action),
                Submission::Dropped => Acknowledgement::error("Command queue full"),
            },
            Err(e) => {
                tracing::debug!(action, error = %e, "dropping command");
                Acknowledgement::success(action)
            }
        }
    }
}

fn ack_json(ack: &Acknowledgement) -> String {
    serde_json::to_string(ack)
        .unwrap_or_else(|_| r#"{"status":"error","message":"internal error"}"#.to_string())
}
