//! # seval: encoded game text evaluation
//!
//! Game text is stored as encoded strings: runs of literal text interleaved
//! with macros (conditionals, number formatting, sheet lookups, links,
//! colors, ...). This crate evaluates such strings against game data and
//! live state, producing encoded text in the same format with every macro it
//! understands resolved and everything else passed through untouched.
//!
//! ## Building Blocks
//!
//! - Encoded text model and macro-string notation ([`text`])
//! - Output accumulation with color and link stacks ([`builder`], [`pool`])
//! - Game data and live state collaborators ([`provider`], [`sheets`])
//! - Evaluation ([`eval`])
//!
//! ## Evaluation
//!
//! ```text
//! EncodedText → Dispatcher → Handler → Expression Resolution → OutputBuilder → EncodedText
//!                   ↑                            │
//!                   └──── nested evaluation ─────┘
//! ```
//!
//! A handler that cannot resolve its macro never fails the evaluation; the
//! macro is copied to the output as it was.
//!
//! ## Derived Lookups
//!
//! [`Evaluator`] also evaluates rows of the `Addon`, `Lobby` and `LogMessage`
//! sheets by id, and resolves action and object display names, which are
//! cached per language for the lifetime of the evaluator ([`cache`]).
//!
//! ```
//! use std::sync::Arc;
//!
//! use seval::provider::InMemorySheets;
//! use seval::Evaluator;
//!
//! let evaluator = Evaluator::new(Arc::new(InMemorySheets::new()));
//! let text = evaluator
//!     .evaluate_macro_string("<kilo(lnum1,\\,)> gil", &[1234567u32.into()], None)
//!     .unwrap();
//! assert_eq!(text.extract_text(), "1,234,567 gil");
//! ```

pub mod builder;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod eval;
pub mod kinds;
pub mod language;
pub mod pool;
pub mod provider;
pub mod sheets;
pub mod text;
pub mod thread_safety;

// Re-exports
pub use error::*;
pub use eval::*;
pub use language::ClientLanguage;
pub use text::{EncodedText, Expression, LocalParameter, MacroCode, Payload};
