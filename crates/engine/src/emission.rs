//! Emission queue (C5): a one-deep delay so every emitted token is reported
//! together with both its leading and trailing free text.

use crate::span::Span;
use crate::vocab::TokenId;

/// One finalized token occupying a slot in the emission queue.
#[derive(Clone, Debug)]
pub struct EmittedToken<T> {
    pub id: TokenId,
    pub elements: Vec<T>,
    pub span: Span,
}

/// Driver return value (C6), mirroring the original protocol's wire values
/// 0..=3 (see [`ParseEvent::wire_value`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseEvent {
    None,
    StopAndFinalOnTokenProcessed,
    BeforeTokenProcessed,
    OnThenBeforeTokenProcessed,
}

impl ParseEvent {
    pub fn wire_value(self) -> u8 {
        match self {
            ParseEvent::None => 0,
            ParseEvent::StopAndFinalOnTokenProcessed => 1,
            ParseEvent::BeforeTokenProcessed => 2,
            ParseEvent::OnThenBeforeTokenProcessed => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EmissionQueue<T> {
    pub(crate) before_token: Option<EmittedToken<T>>,
    pub(crate) on_token: Option<EmittedToken<T>>,
    pub(crate) on_token_previous: Option<EmittedToken<T>>,
    pub(crate) on_token_leading: Vec<T>,
    pub(crate) on_token_trailing: Vec<T>,
}

impl<T> Default for EmissionQueue<T> {
    fn default() -> Self {
        Self {
            before_token: None,
            on_token: None,
            on_token_previous: None,
            on_token_leading: Vec::new(),
            on_token_trailing: Vec::new(),
        }
    }
}

impl<T: Clone> EmissionQueue<T> {
    pub(crate) fn reset(&mut self) {
        self.before_token = None;
        self.on_token = None;
        self.on_token_previous = None;
        self.on_token_leading.clear();
        self.on_token_trailing.clear();
    }

    /// Shift a newly finalized token into the queue (§4.5 steps 2,3,5,6).
    /// `trailing` is the text between the token now leaving the
    /// `before_token` slot and `token`'s own anchor; the previous trailing
    /// becomes the next leading, per step 2.
    pub(crate) fn push(&mut self, token: EmittedToken<T>, trailing: Vec<T>) -> ParseEvent {
        let leading = std::mem::replace(&mut self.on_token_trailing, trailing);
        self.on_token_leading = leading;
        self.on_token_previous = self.on_token.take();
        self.on_token = self.before_token.take();
        let was_empty = self.on_token.is_none();
        self.before_token = Some(token);
        if was_empty {
            ParseEvent::BeforeTokenProcessed
        } else {
            ParseEvent::OnThenBeforeTokenProcessed
        }
    }
}
