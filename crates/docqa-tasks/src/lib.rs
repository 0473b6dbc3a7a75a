//! # docqa-tasks
//!
//! Question lifecycle management for docqa.
//!
//! This crate provides:
//! - The question state machine (pending → answered | error)
//! - An in-flight registry mapping question ids to cancellable units
//! - The simulated answer-generation unit (fixed delay, canned answer)
//!
//! There is deliberately no queue, no retry, and no durability here: a unit
//! exists only while its question is pending and the process is alive.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docqa_tasks::{LifecycleConfig, QuestionLifecycle};
//! use docqa_core::CreateQuestionRequest;
//!
//! let lifecycle = QuestionLifecycle::new(
//!     Arc::new(db.documents.clone()),
//!     Arc::new(db.questions.clone()),
//!     LifecycleConfig::from_env(),
//! );
//!
//! let question = lifecycle
//!     .submit(doc_id, CreateQuestionRequest { question: "What is C?".into() })
//!     .await?;
//! // ... poll lifecycle.get(question.id) until answered
//! ```

pub mod lifecycle;
pub mod registry;

pub use lifecycle::{compose_answer, LifecycleConfig, QuestionLifecycle};
pub use registry::{TaskRegistry, UnitHandle};
