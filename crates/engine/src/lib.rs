//! A streaming, longest-match tokenizer with disambiguation by look-ahead
//! verification and scoped token dictionaries.
//!
//! Feed the engine a vocabulary of single- and multi-element tokens (over
//! any `T: Clone + PartialEq`, typically a byte, a UTF-16 code unit, or a
//! `char`), install an input slice with [`Engine::init_string`], and drive
//! it with repeated calls to [`Engine::continue_execution`] until it
//! returns [`ParseEvent::StopAndFinalOnTokenProcessed`]. Each non-`None`
//! return exposes one finalized token together with the free text
//! immediately before and after it (its *leading* and *trailing*), via the
//! read-only accessors on [`Engine`].
//!
//! Invariants the engine upholds (see `DESIGN.md` for the full ledger):
//! - Coverage: concatenating every emitted `leading`, token, and `trailing`
//!   in order reproduces the input exactly.
//! - Ordering: emitted token anchors are strictly increasing.
//! - Longest match: when two specs both match at a position, the longer
//!   one wins; equal-length matches are broken by declaration order.
//! - Scope isolation: entering a [`TokenLimit`] via
//!   [`Engine::enter_token_limit`] replaces the active vocabulary until the
//!   matching [`Engine::exit_token_limit`]; already in-flight candidates
//!   for now-out-of-scope specs are unaffected and simply expire on
//!   mismatch.
//!
//! An `Engine` is bound to one caller at a time; it is not `Sync`-friendly
//! by design (§5: single-threaded and cooperative).

mod build_up;
mod config;
mod emission;
mod engine;
mod future_token;
mod span;
mod verify;
mod vocab;

pub use config::{EngineConfig, TokenLimitBuilder, VocabularyBuilder};
pub use emission::{EmittedToken, ParseEvent};
pub use engine::Engine;
pub use span::Span;
pub use vocab::{MultiElementToken, SingleElementToken, TokenId, TokenLimit, Vocabulary};
