//! Response generation
//!
//! Records the user turn, asks the model for a reply using the prior turns as
//! context, and records the reply. Failures never escape: the caller always
//! gets text back, either the model's answer or an in-character excuse.

#[path = "responder_tests.rs"]
mod responder_tests;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use llm_gemini::{ChatRequest, GeminiClient, GeminiError};
use rand::Rng;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};
use turco_types::{HistoryEntry, Role, SessionKey};

use crate::history::HistoryStore;
use crate::persona;

/// Something that can continue a conversation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// `history` holds the prior turns only; `message` is the live user turn.
    async fn reply(&self, history: &[HistoryEntry], message: &str) -> Result<String, GeminiError>;
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn reply(&self, history: &[HistoryEntry], message: &str) -> Result<String, GeminiError> {
        self.generate(&ChatRequest {
            system_instruction: Some(persona::SYSTEM_INSTRUCTION),
            history,
            message,
            generation: persona::GENERATION,
            safety_settings: &persona::SAFETY_SETTINGS,
        })
        .await
    }
}

/// Chooses which fallback reply to show.
pub trait FallbackPicker: Send + Sync {
    /// Return an index in `0..choices`. `choices` is never zero.
    fn pick(&self, choices: usize) -> usize;
}

/// Uniform random choice.
pub struct RandomPicker;

impl FallbackPicker for RandomPicker {
    fn pick(&self, choices: usize) -> usize {
        rand::thread_rng().gen_range(0..choices)
    }
}

/// Per-session async mutexes, so one user's turns hit the history in order
/// while different sessions proceed independently.
#[derive(Default)]
struct SessionLocks {
    locks: Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, key: &SessionKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(key.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the entry for `key` when nobody else is holding or waiting on it.
    async fn release(&self, key: &SessionKey) {
        let mut locks = self.locks.lock().await;
        if locks.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

pub struct Responder {
    model: Arc<dyn ChatModel>,
    history: Arc<dyn HistoryStore>,
    picker: Box<dyn FallbackPicker>,
    fallbacks: &'static [&'static str],
    locks: SessionLocks,
}

impl Responder {
    pub fn new(model: Arc<dyn ChatModel>, history: Arc<dyn HistoryStore>) -> Self {
        Self::with_picker(model, history, Box::new(RandomPicker))
    }

    pub fn with_picker(
        model: Arc<dyn ChatModel>,
        history: Arc<dyn HistoryStore>,
        picker: Box<dyn FallbackPicker>,
    ) -> Self {
        Self {
            model,
            history,
            picker,
            fallbacks: &persona::FALLBACK_REPLIES,
            locks: SessionLocks::default(),
        }
    }

    /// Produce the bot's reply to `message` in session `key`.
    pub async fn respond(&self, key: &SessionKey, message: &str) -> String {
        let guard = self.locks.acquire(key).await;
        let reply = self.respond_locked(key, message).await;
        drop(guard);
        self.locks.release(key).await;
        reply
    }

    /// Forget session `key`, waiting for any reply in flight on it so a
    /// half-recorded exchange is never left behind.
    pub async fn clear(&self, key: &SessionKey) {
        let guard = self.locks.acquire(key).await;
        self.history.clear(key).await;
        drop(guard);
        self.locks.release(key).await;
    }

    async fn respond_locked(&self, key: &SessionKey, message: &str) -> String {
        self.history.append(key, Role::User, message).await;

        // Everything but the turn just recorded; it travels as the live message.
        let mut context = self.history.snapshot(key).await;
        context.pop();

        match self.model.reply(&context, message).await {
            Ok(reply) => {
                self.history.append(key, Role::Model, &reply).await;
                debug!(
                    session = %key,
                    context_turns = context.len(),
                    reply_chars = reply.chars().count(),
                    "Generated reply"
                );
                reply
            }
            Err(e) => {
                warn!(session = %key, error = %e, "Gemini call failed, answering with fallback");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> String {
        let idx = self.picker.pick(self.fallbacks.len()) % self.fallbacks.len();
        self.fallbacks[idx].to_string()
    }
}
