//! Question lifecycle manager.
//!
//! Owns the question state machine (pending → answered | error, with
//! deletion only out of pending from the caller's point of view) and the
//! registry of in-flight simulated processing units. One unit is spawned per
//! submitted question; the unit sleeps for the configured delay, re-checks
//! cancellation, and records its result over a fresh pooled connection.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use docqa_core::defaults::ANSWER_DELAY_SECS;
use docqa_core::{
    CreateQuestionRequest, DocumentRepository, Error, Question, QuestionRepository, Result,
};

use crate::registry::{TaskRegistry, UnitHandle};

/// Configuration for the lifecycle manager.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Simulated answer-generation delay.
    pub answer_delay: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            answer_delay: Duration::from_secs(ANSWER_DELAY_SECS),
        }
    }
}

impl LifecycleConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `ANSWER_DELAY_SECS` | `5` | Simulated processing delay |
    pub fn from_env() -> Self {
        let answer_delay_secs = std::env::var("ANSWER_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(ANSWER_DELAY_SECS);

        Self {
            answer_delay: Duration::from_secs(answer_delay_secs),
        }
    }

    /// Set the simulated answer delay.
    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = delay;
        self
    }
}

/// Compose the deterministic placeholder answer for a question.
pub fn compose_answer(question: &str) -> String {
    format!("This is a generated answer to your question: {}", question)
}

/// Manager for question state transitions and their background units.
///
/// Created once at service startup; the API layer holds a clone in shared
/// state. All clones share one [`TaskRegistry`].
#[derive(Clone)]
pub struct QuestionLifecycle {
    documents: Arc<dyn DocumentRepository>,
    questions: Arc<dyn QuestionRepository>,
    registry: TaskRegistry,
    config: LifecycleConfig,
}

impl QuestionLifecycle {
    /// Create a new lifecycle manager with an empty registry.
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        questions: Arc<dyn QuestionRepository>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            documents,
            questions,
            registry: TaskRegistry::new(),
            config,
        }
    }

    /// Submit a question against a document.
    ///
    /// Verifies the document exists, persists the question in pending
    /// status, spawns its background unit, and returns immediately without
    /// waiting for processing. A failure to start the unit is logged but
    /// never surfaced: the question stays pending (fire-and-forget policy).
    pub async fn submit(&self, document_id: i64, req: CreateQuestionRequest) -> Result<Question> {
        req.validate()?;

        if !self.documents.exists(document_id).await? {
            return Err(Error::DocumentNotFound(document_id));
        }

        let question = self.questions.insert(document_id, &req.question).await?;

        self.spawn_unit(question.id, question.question.clone());
        info!(
            subsystem = "tasks",
            component = "lifecycle",
            op = "submit",
            document_id,
            question_id = question.id,
            "Question submitted for processing"
        );

        Ok(question)
    }

    /// Read a question's current state. No side effects.
    pub async fn get(&self, question_id: i64) -> Result<Question> {
        self.questions.fetch(question_id).await
    }

    /// List a document's questions, newest first.
    pub async fn list_for_document(&self, document_id: i64) -> Result<Vec<Question>> {
        if !self.documents.exists(document_id).await? {
            return Err(Error::DocumentNotFound(document_id));
        }
        self.questions.list_for_document(document_id).await
    }

    /// Cancel any in-flight unit for a question and delete its row.
    ///
    /// Cancellation is cooperative: a unit already past its checkpoint may
    /// still attempt a write, which the fenced repository update turns into
    /// a no-op.
    pub async fn cancel_and_delete(&self, question_id: i64) -> Result<()> {
        if !self.questions.exists(question_id).await? {
            return Err(Error::QuestionNotFound(question_id));
        }

        if self.registry.cancel(question_id) {
            info!(
                subsystem = "tasks",
                component = "lifecycle",
                op = "cancel",
                question_id,
                "Cancelled background unit before deletion"
            );
        }

        self.questions.delete(question_id).await?;
        info!(
            subsystem = "tasks",
            component = "lifecycle",
            op = "delete",
            question_id,
            "Question deleted"
        );
        Ok(())
    }

    /// Delete a document, cancelling units for its pending questions first.
    /// The question rows themselves go with the document via the FK cascade.
    pub async fn delete_document(&self, document_id: i64) -> Result<()> {
        if !self.documents.exists(document_id).await? {
            return Err(Error::DocumentNotFound(document_id));
        }

        for question in self.questions.list_for_document(document_id).await? {
            self.registry.cancel(question.id);
        }

        self.documents.delete(document_id).await?;
        info!(
            subsystem = "tasks",
            component = "lifecycle",
            op = "delete_document",
            document_id,
            "Document deleted with cascade"
        );
        Ok(())
    }

    /// Number of in-flight background units (reported by `/health`).
    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }

    /// Question ids currently being processed (reported by `/metrics`).
    pub fn in_flight_ids(&self) -> Vec<i64> {
        self.registry.ids()
    }

    /// Cancel and clear every in-flight unit (service shutdown).
    pub fn shutdown(&self) {
        let in_flight = self.registry.len();
        if in_flight > 0 {
            info!(
                subsystem = "tasks",
                component = "lifecycle",
                op = "shutdown",
                in_flight,
                "Cancelling in-flight units at shutdown"
            );
        }
        self.registry.clear();
    }

    /// Spawn the simulated processing unit for a question and register its
    /// cancel handle.
    fn spawn_unit(&self, question_id: i64, question_text: String) {
        let (handle, cancel_rx) = UnitHandle::new();
        let questions = self.questions.clone();
        let registry = self.registry.clone();
        let delay = self.config.answer_delay;

        // Register before spawning so the unit can always find (and clear)
        // its own entry.
        self.registry.register(question_id, handle);

        tokio::spawn(process_question(
            questions,
            registry,
            question_id,
            question_text,
            delay,
            cancel_rx,
        ));
    }
}

/// The background unit: one simulated answer generation for one question.
async fn process_question(
    questions: Arc<dyn QuestionRepository>,
    registry: TaskRegistry,
    question_id: i64,
    question_text: String,
    delay: Duration,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    debug!(
        subsystem = "tasks",
        component = "unit",
        op = "process",
        question_id,
        "Starting background processing"
    );

    // Simulated inference: the only suspension point before the commit.
    tokio::select! {
        _ = &mut cancel_rx => {
            debug!(
                subsystem = "tasks",
                component = "unit",
                question_id,
                "Cancelled during simulated processing"
            );
            registry.deregister(question_id);
            return;
        }
        _ = sleep(delay) => {}
    }

    // Cancellation checkpoint: a cancel that raced the end of the sleep is
    // honored before any write.
    if cancel_rx.try_recv().is_ok() {
        debug!(
            subsystem = "tasks",
            component = "unit",
            question_id,
            "Cancelled at commit checkpoint"
        );
        registry.deregister(question_id);
        return;
    }

    let answer = compose_answer(&question_text);

    match questions.mark_answered(question_id, &answer).await {
        Ok(true) => {
            info!(
                subsystem = "tasks",
                component = "unit",
                op = "process",
                question_id,
                success = true,
                "Question answered"
            );
        }
        Ok(false) => {
            // Deleted (or already terminal) while we slept; nothing to do.
            warn!(
                subsystem = "tasks",
                component = "unit",
                question_id,
                "Question no longer pending; answer discarded"
            );
        }
        Err(e) => {
            error!(
                subsystem = "tasks",
                component = "unit",
                question_id,
                error = %e,
                "Failed to record answer"
            );
            // Best-effort second pass; a secondary failure leaves the
            // question stuck in pending, which is only logged.
            match questions.mark_error(question_id).await {
                Ok(_) => {}
                Err(e2) => {
                    error!(
                        subsystem = "tasks",
                        component = "unit",
                        question_id,
                        error = %e2,
                        "Failed to record error status"
                    );
                }
            }
        }
    }

    registry.deregister(question_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_answer_contains_question() {
        let answer = compose_answer("What is C?");
        assert_eq!(
            answer,
            "This is a generated answer to your question: What is C?"
        );
    }

    #[test]
    fn test_lifecycle_config_default() {
        let config = LifecycleConfig::default();
        assert_eq!(config.answer_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_lifecycle_config_builder() {
        let config = LifecycleConfig::default().with_answer_delay(Duration::from_millis(50));
        assert_eq!(config.answer_delay, Duration::from_millis(50));
    }
}
