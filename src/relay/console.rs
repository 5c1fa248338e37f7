use super::Artifact;
use crate::error::ByteccError;
use crate::model_catalog::{self, ModelDescriptor};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsoleSnapshot {
    pub turns: Vec<ChatTurn>,
    pub selected_model: &'static str,
    pub busy: bool,
}

struct ConsoleState {
    turns: Vec<ChatTurn>,
    selected_model: &'static ModelDescriptor,
}

/// Reply recorded when a relayed message is abandoned before the completion arrives.
pub const CANCELLED_REPLY: &str = "Request cancelled before a reply arrived.";

/// Append-only transcript plus the Idle/Sending flag of one console view.
///
/// Sending is entered through [`try_begin`](Self::try_begin); while the returned guard lives,
/// further attempts get `None`. The guard resets the flag on drop, including when the request
/// future is dropped mid-flight; a user turn left unanswered at that point gets
/// [`CANCELLED_REPLY`] so turns keep alternating.
pub struct ConsoleSession {
    state: Mutex<ConsoleState>,
    busy: AtomicBool,
}

impl ConsoleSession {
    pub fn new(welcome_message: &str) -> Self {
        let console = Self {
            state: Mutex::new(ConsoleState {
                turns: Vec::new(),
                selected_model: model_catalog::default_model(),
            }),
            busy: AtomicBool::new(false),
        };
        console.push(Role::System, welcome_message.to_string(), None, Vec::new());
        console
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Idle -> Sending. `None` if a message is already in flight.
    pub fn try_begin(&self) -> Option<SendingGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendingGuard {
                console: self,
                awaiting_reply: false,
            })
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        let state = self.lock();
        ConsoleSnapshot {
            turns: state.turns.clone(),
            selected_model: state.selected_model.key,
            busy: self.is_busy(),
        }
    }

    pub fn selected_model(&self) -> &'static ModelDescriptor {
        self.lock().selected_model
    }

    pub fn select_model(&self, key: &str) -> Result<&'static ModelDescriptor, ByteccError> {
        let model =
            model_catalog::lookup(key).ok_or_else(|| ByteccError::UnknownModel(key.to_string()))?;
        self.lock().selected_model = model;
        Ok(model)
    }

    fn push(
        &self,
        role: Role,
        content: String,
        model: Option<&'static str>,
        artifacts: Vec<Artifact>,
    ) -> ChatTurn {
        let mut state = self.lock();
        let now = Utc::now();
        // Keep timestamps non-decreasing even if the wall clock steps back.
        let timestamp = state
            .turns
            .last()
            .map_or(now, |last| last.timestamp.max(now));
        let turn = ChatTurn {
            id: state.turns.len() as u64 + 1,
            role,
            content,
            timestamp,
            model,
            artifacts,
        };
        state.turns.push(turn.clone());
        turn
    }
}

/// Proof that the console is in the Sending state.
pub struct SendingGuard<'a> {
    console: &'a ConsoleSession,
    awaiting_reply: bool,
}

impl SendingGuard<'_> {
    pub fn push_user(&mut self, content: String) -> ChatTurn {
        self.awaiting_reply = true;
        self.console.push(Role::User, content, None, Vec::new())
    }

    /// Transcript as it stands now (including the user turn just pushed).
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.console.lock().turns.clone()
    }

    /// Sending -> Idle, appending the assistant reply.
    pub fn finish(
        mut self,
        reply: String,
        model: &'static ModelDescriptor,
        artifacts: Vec<Artifact>,
    ) -> ChatTurn {
        self.awaiting_reply = false;
        self.console
            .push(Role::Assistant, reply, Some(model.name), artifacts)
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        if self.awaiting_reply {
            self.console
                .push(Role::Assistant, CANCELLED_REPLY.to_string(), None, Vec::new());
        }
        self.console.busy.store(false, Ordering::Release);
    }
}
