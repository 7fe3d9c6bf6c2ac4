//! Verification engine (C4): holds the one candidate match whose winner is
//! not yet decided, and the triggers that could still override it.
//!
//! §4.4 describes `ActiveVerifyTokens` as a list. This reimplementation
//! narrows that to a single slot: the only producer of a second concurrent
//! verification the protocol names is the "trigger victory" rechain (a
//! trigger finishes and has its own longer siblings), and that path always
//! cancels the current verify token before opening the replacement, so
//! arity never exceeds one on any path this engine implements. Two
//! genuinely unrelated ambiguities racing at once is a documented
//! limitation — see DESIGN.md.

use crate::build_up::BuildUp;
use crate::future_token::FutureTokenKey;
use crate::vocab::TokenId;

/// A finished candidate held pending while its triggers decide whether a
/// longer or equal-reach candidate might still override it.
#[derive(Debug)]
pub(crate) struct VerifyToken<T> {
    pub id: TokenId,
    pub anchor: usize,
    pub len: usize,
    pub triggers: Vec<Option<FutureTokenKey>>,
    pub trigger_starts: Vec<usize>,
    pub trailing_build_up: BuildUp<T>,
}

impl<T: Clone> VerifyToken<T> {
    pub(crate) fn new(id: TokenId, anchor: usize, len: usize, triggers: Vec<FutureTokenKey>) -> Self {
        let trigger_starts = triggers.iter().map(|k| k.anchor).collect();
        Self {
            id,
            anchor,
            len,
            triggers: triggers.into_iter().map(Some).collect(),
            trigger_starts,
            trailing_build_up: BuildUp::default(),
        }
    }

    /// Number of triggers that haven't yet been ruled out. Zero means this
    /// candidate's every possible overrider has died, so it has won.
    pub(crate) fn trigger_count(&self) -> usize {
        self.triggers.iter().filter(|t| t.is_some()).count()
    }

    /// Null out the trigger slot matching `key`, per §4.4 "on trigger death".
    pub(crate) fn clear_trigger(&mut self, key: FutureTokenKey) {
        for slot in &mut self.triggers {
            if *slot == Some(key) {
                *slot = None;
            }
        }
    }

    pub(crate) fn push_trailing(&mut self, element: T) {
        self.trailing_build_up.push(element);
    }
}
