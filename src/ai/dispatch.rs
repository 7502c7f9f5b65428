//! Non-blocking dispatch of villager speech requests.
//!
//! The frame loop must never wait on the generation service. Requests are
//! spawned onto a tokio runtime and the loop polls a oneshot channel each
//! tick. Only the newest request matters: starting another aborts the task of
//! the previous one.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::ai::{GreetingGenerator, GreetingSource, SpokenLine};
use crate::game::{EntityId, Npc};

/// A finished line of villager speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingReply {
    /// Villager who spoke
    pub npc_id: EntityId,
    /// Name shown in the dialogue box
    pub speaker: String,
    /// Generated or fallback text
    pub text: String,
    /// Whether `text` is a canned line standing in for the service
    pub fallback: bool,
}

enum RequestKind {
    Greeting,
    Response(String),
}

struct PendingRequest {
    ticket: u64,
    npc_id: EntityId,
    speaker: String,
    task: JoinHandle<()>,
    reply: oneshot::Receiver<SpokenLine>,
}

/// Runs generation requests off the frame loop, one at a time.
pub struct GreetingDispatcher {
    runtime: Handle,
    generator: Arc<GreetingGenerator>,
    pending: Option<PendingRequest>,
    next_ticket: u64,
}

impl GreetingDispatcher {
    /// Creates a dispatcher spawning onto `runtime`.
    pub fn new(runtime: Handle, generator: Arc<GreetingGenerator>) -> Self {
        Self {
            runtime,
            generator,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Name of the villager whose reply is outstanding.
    pub fn pending_speaker(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.speaker.as_str())
    }

    /// Ticket of the outstanding request. Tickets increase with every request.
    pub fn pending_ticket(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    fn dispatch(&mut self, npc: &Npc, kind: RequestKind) -> u64 {
        if let Some(old) = self.pending.take() {
            debug!(
                "Request #{} to {} superseded by a request to {}",
                old.ticket, old.speaker, npc.name
            );
            old.task.abort();
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let (tx, rx) = oneshot::channel();
        let generator = Arc::clone(&self.generator);
        let name = npc.name.clone();
        let role = npc.role;

        let task = self.runtime.spawn(async move {
            let line = match kind {
                RequestKind::Greeting => generator.greeting_line(&name, role).await,
                RequestKind::Response(utterance) => {
                    generator.respond_line(&name, role, &utterance).await
                }
            };
            // The receiver is gone if the request was cancelled meanwhile.
            let _ = tx.send(line);
        });

        debug!("Request #{} dispatched to {}", ticket, npc.name);
        self.pending = Some(PendingRequest {
            ticket,
            npc_id: npc.id,
            speaker: npc.name.clone(),
            task,
            reply: rx,
        });
        ticket
    }
}

impl GreetingSource for GreetingDispatcher {
    fn request_greeting(&mut self, npc: &Npc) {
        self.dispatch(npc, RequestKind::Greeting);
    }

    fn request_response(&mut self, npc: &Npc, utterance: &str) {
        self.dispatch(npc, RequestKind::Response(utterance.to_string()));
    }

    fn poll(&mut self) -> Option<GreetingReply> {
        let pending = self.pending.as_mut()?;
        let line = match pending.reply.try_recv() {
            Ok(line) => line,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => {
                warn!(
                    "Request #{} to {} ended without a reply, using fallback",
                    pending.ticket, pending.speaker
                );
                SpokenLine::fallback()
            }
        };

        let pending = self.pending.take()?;
        Some(GreetingReply {
            npc_id: pending.npc_id,
            speaker: pending.speaker,
            text: line.text,
            fallback: line.fallback,
        })
    }

    fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                debug!("Request #{} to {} cancelled", pending.ticket, pending.speaker);
                pending.task.abort();
                true
            }
            None => false,
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for GreetingDispatcher {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
