//! Macro evaluation.
//!
//! # Core Components
//!
//! ## Evaluator
//! Owns the collaborators and is the entry point for every evaluation. It is
//! shared between threads; all per-call state lives in an
//! [`EvaluationContext`].
//!
//! ## Dispatcher
//! Walks the payloads of an encoded text, copies text through and routes each
//! macro to its handler by macro code. Macros without a handler, and macros
//! whose handler fails, are copied through unchanged.
//!
//! ## Expression Resolution
//! Resolves macro operands to numbers, booleans or appended text. Operands
//! may themselves be encoded text containing macros, which are evaluated
//! recursively into the same output.
//!
//! ## Handlers
//! One function per macro code, grouped by family (control flow, identity,
//! style, numbers, letter case, sheet extraction, nouns, geometry and the
//! `fixed` formatters).
//!
//! # Evaluation Pipeline
//!
//! 1. Text without macros is returned as is
//! 2. A builder is rented from the evaluator's pool
//! 3. Each payload is copied or dispatched into the builder
//! 4. The builder's content becomes the result and the builder goes back to
//!    the pool

pub mod context;
mod dispatch;
pub mod evaluator;
mod expression;
mod handlers;

pub use context::EvaluationContext;
pub use dispatch::is_handled;
pub use evaluator::{Evaluator, EvaluatorBuilder, ACT_STR_ADDON, OBJ_STR_ADDON};
