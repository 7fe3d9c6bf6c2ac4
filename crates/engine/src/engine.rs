//! Main driver (C6) and limit stack (C7): steps the cursor across the
//! installed input, orchestrates the future-token table, build-up buffer,
//! verification engine and emission queue, and yields control to the caller
//! on every boundary event (§4.1).

use crate::build_up::BuildUp;
use crate::config::EngineConfig;
use crate::emission::{EmissionQueue, EmittedToken, ParseEvent};
use crate::future_token::{FutureTokenEvent, FutureTokenKey, FutureTokenSlot, FutureTokenTable};
use crate::span::Span;
use crate::vocab::TokenId;
use crate::verify::VerifyToken;

const TRACE_TARGET: &str = "tokenizer.engine";

/// The resumable tokenizer. Owns every allocation it needs; one instance is
/// driven by one caller at a time (§5).
pub struct Engine<T, U> {
    config: EngineConfig<T, U>,
    limit_stack: Vec<usize>,
    text: Vec<T>,
    cursor: usize,
    future_tokens: FutureTokenTable<T>,
    build_up: BuildUp<T>,
    current_verify: Option<VerifyToken<T>>,
    /// Set once a trigger disable has dropped `current_verify`'s trigger
    /// count to zero but the call that discovered it must still return the
    /// emission; checked at the top of the next `continue_execution` call
    /// as a safety net matching §4.1 step 2 (a no-op given the single-slot
    /// simplification: the same call always finishes the drain).
    finalizing: bool,
    /// The element that caused entry into finalize-mode; §4.4's draining
    /// appends it to the build-up only once the drain completes.
    pending_append: Option<T>,
    disposal: Vec<VerifyToken<T>>,
    emission: EmissionQueue<T>,
    initialized: bool,
    /// Set within a single `process_char` call when it creates a fresh
    /// `current_verify` (verification newly entered or rechained onto a
    /// winning trigger, §4.4). The element that triggered the transition
    /// is already part of that candidate's own matched span, so phase (f)
    /// must not also append it to the new verify token's trailing build-up
    /// - doing so would duplicate that element into the eventual trailing
    /// text.
    just_started_verify: bool,
}

impl<T, U> Engine<T, U>
where
    T: Clone + PartialEq,
    U: Clone + PartialEq,
{
    pub fn new(config: EngineConfig<T, U>) -> Self {
        Self {
            config,
            limit_stack: Vec::new(),
            text: Vec::new(),
            cursor: 0,
            future_tokens: FutureTokenTable::default(),
            build_up: BuildUp::default(),
            current_verify: None,
            finalizing: false,
            pending_append: None,
            disposal: Vec::new(),
            emission: EmissionQueue::default(),
            initialized: false,
            just_started_verify: false,
        }
    }

    /// Install input for the next parse. Working buffers grow iff `text` is
    /// longer than any previously installed input; smaller inputs reuse
    /// existing capacity (§5, Testable Property 7).
    pub fn init_string(&mut self, text: &[T]) {
        self.text.clear();
        self.text.extend_from_slice(text);
        self.future_tokens.ensure_capacity(text.len());
        self.future_tokens.reset();
        self.build_up.reset_for_input(text.len());
        self.current_verify = None;
        self.disposal.clear();
        self.emission.reset();
        self.limit_stack.clear();
        self.cursor = 0;
        self.finalizing = false;
        self.pending_append = None;
        self.initialized = true;
    }

    /// Step until the next boundary event (§4.1).
    pub fn continue_execution(&mut self) -> ParseEvent {
        assert!(
            self.initialized,
            "continue_execution called before init_string"
        );

        if self.finalizing {
            if let Some(event) = self.drain_verify_token() {
                return event;
            }
        }

        while self.cursor < self.text.len() {
            let pos = self.cursor;
            let ch = self.text[pos].clone();
            self.cursor += 1;
            if let Some(event) = self.process_char(pos, ch) {
                return event;
            }
        }

        self.limit_stack.clear();
        match self.emission.before_token.take() {
            Some(before) => {
                let trailing = self.build_up.as_slice().to_vec();
                self.build_up.clear();
                self.emission.on_token_leading =
                    std::mem::replace(&mut self.emission.on_token_trailing, trailing);
                self.emission.on_token_previous = self.emission.on_token.take();
                self.emission.on_token = Some(before);
                ParseEvent::StopAndFinalOnTokenProcessed
            }
            // No token was ever recognized; there is nothing left to flush.
            None => ParseEvent::None,
        }
    }

    /// Push `name` onto the limit stack if it names a configured limit
    /// (§4.6); an unknown name is a no-op, matching the reference tokenizer's
    /// own lenient `EnterTokenLimit`.
    pub fn enter_token_limit(&mut self, name: &[U]) {
        if let Some(idx) = self
            .config
            .limits
            .iter()
            .position(|limit| limit.name_matches(name))
        {
            self.limit_stack.push(idx);
            log::trace!(target: TRACE_TARGET, "enter_token_limit -> limit #{idx}");
        }
    }

    /// Pop the limit stack. A contract violation (not a reported error, §7)
    /// to call with an empty stack.
    pub fn exit_token_limit(&mut self) {
        let popped = self.limit_stack.pop();
        debug_assert!(
            popped.is_some(),
            "exit_token_limit called with an empty limit stack"
        );
        log::trace!(target: TRACE_TARGET, "exit_token_limit -> {popped:?}");
    }

    /// Release verify tokens cancelled during the last parse (§4.4
    /// cancellation, §5 resource model).
    pub fn dispose_data_for_next_parse(&mut self) {
        self.disposal.clear();
    }

    pub fn before_token_processed(&self) -> Option<&EmittedToken<T>> {
        self.emission.before_token.as_ref()
    }

    pub fn on_token_processed(&self) -> Option<&EmittedToken<T>> {
        self.emission.on_token.as_ref()
    }

    pub fn on_token_processed_previous(&self) -> Option<&EmittedToken<T>> {
        self.emission.on_token_previous.as_ref()
    }

    pub fn on_token_processed_leading(&self) -> &[T] {
        &self.emission.on_token_leading
    }

    pub fn on_token_processed_trailing(&self) -> &[T] {
        &self.emission.on_token_trailing
    }

    /// Rows currently allocated in the future-token table; exposed only to
    /// tests so they can check Testable Property 7 (no growth when a parse
    /// is no longer than a prior one) without a public counter.
    #[cfg(test)]
    pub(crate) fn future_token_row_capacity(&self) -> usize {
        self.future_tokens.row_capacity()
    }

    // ---- §4.2 process_char and its phases -------------------------------

    fn process_char(&mut self, pos: usize, ch: T) -> Option<ParseEvent> {
        self.just_started_verify = false;

        // (a) Extend live candidates; open candidates transition to
        // Finished or Disabled here.
        let events = self.future_tokens.advance(pos, &ch);

        let mut finished_multi = Vec::new();
        let mut trigger_exhausted = false;
        for event in events {
            match event {
                FutureTokenEvent::Disabled(key) => {
                    if let Some(vt) = &mut self.current_verify {
                        vt.clear_trigger(key);
                        if vt.trigger_count() == 0 {
                            trigger_exhausted = true;
                        }
                    }
                }
                FutureTokenEvent::Finished(key) => finished_multi.push(key),
            }
        }

        // (b) Open new candidates for every multi-element spec starting
        // with `ch`.
        let vocab = self.config.active(&self.limit_stack);
        for spec in vocab.multis() {
            if spec.elements[0] == ch {
                self.future_tokens.open(pos, spec.id, spec.elements.clone());
            }
        }

        if trigger_exhausted {
            // §4.4 "on trigger death": the pending candidate's every
            // overrider has died, so it has won. `ch` is not assigned
            // anywhere yet; the drain appends it once it completes (§4.2e).
            self.finalizing = true;
            self.pending_append = Some(ch);
            return self.drain_verify_token();
        }

        // (c) Resolve finished candidates, multi-element first.
        for key in finished_multi {
            if let Some(event) = self.resolve_finished_multi(key, pos) {
                return Some(event);
            }
        }

        // (d) Resolve single-element tokens.
        let vocab = self.config.active(&self.limit_stack);
        let matching_singles: Vec<(TokenId, T)> = vocab
            .singles()
            .iter()
            .filter(|single| single.element == ch)
            .map(|single| (single.id, single.element.clone()))
            .collect();
        for (id, element) in matching_singles {
            if let Some(event) = self.resolve_single(id, element, pos) {
                return Some(event);
            }
        }

        // (f) Append to whichever build-up is live right now. Skip it
        // entirely if a verify token was just created this same call: `ch`
        // is already part of that candidate's own matched span (it's what
        // made the candidate finish), not trailing text.
        if !self.just_started_verify {
            match &mut self.current_verify {
                Some(vt) => vt.push_trailing(ch),
                None => self.build_up.push(ch),
            }
        }

        None
    }

    /// §4.3 `PrepareMultiCharForVerification` plus the "currently verifying"
    /// branch of §4.2(c) that routes through §4.4's trigger-victory check.
    fn resolve_finished_multi(&mut self, key: FutureTokenKey, pos: usize) -> Option<ParseEvent> {
        let slot = self.future_tokens.get(key).clone();
        if let Some(current) = &self.current_verify {
            if current.triggers.iter().any(|t| *t == Some(key)) {
                return self.resolve_trigger_victory(key, &slot);
            }
        }
        self.prepare_multi_for_verification(key, &slot, pos)
    }

    /// §4.4 "on trigger victory": the trigger that was watched for itself
    /// just finished, beating the pending verify token.
    fn resolve_trigger_victory(
        &mut self,
        key: FutureTokenKey,
        slot: &FutureTokenSlot<T>,
    ) -> Option<ParseEvent> {
        let siblings = self.future_tokens.longer_siblings(key);
        let cancelled = self
            .current_verify
            .take()
            .expect("trigger victory requires an active verify token");

        if !siblings.is_empty() {
            // A longer sibling of the winning trigger could still override
            // it in turn; chain into a fresh verification around it instead
            // of emitting yet.
            log::trace!(
                target: TRACE_TARGET,
                "rechain verify token at {} onto trigger at {} ({} longer siblings)",
                cancelled.anchor,
                slot.anchor,
                siblings.len()
            );
            self.disposal.push(cancelled);
            self.current_verify = Some(VerifyToken::new(slot.token_id, slot.anchor, slot.matched, siblings));
            self.just_started_verify = true;
            return None;
        }

        // The trigger wins, not `cancelled` itself: its own matched span is
        // read straight from `text` by `finalize_candidate`, and whatever
        // `cancelled` accumulated into its trailing build-up while the race
        // was live falls entirely inside the trigger's own (longer) span
        // rather than following it, so it's discarded along with `cancelled`.
        // The correct leading-up text is the global build-up exactly as it
        // stood the moment verification began - untouched since, as every
        // element seen during the race was routed into `cancelled`'s
        // trailing build-up instead (§4.2f).
        let source = self.build_up.as_slice().to_vec();
        self.disposal.push(cancelled);
        Some(self.finalize_candidate(slot.token_id, slot.anchor, slot.matched, &source))
    }

    fn prepare_multi_for_verification(
        &mut self,
        key: FutureTokenKey,
        slot: &FutureTokenSlot<T>,
        _pos: usize,
    ) -> Option<ParseEvent> {
        let elements = self.text[slot.anchor..slot.anchor + slot.matched].to_vec();
        let mut triggers =
            self.future_tokens
                .containing_live_candidates(slot.anchor, slot.matched, &elements);
        triggers.retain(|candidate| *candidate != key);

        if triggers.is_empty() {
            let source = self.build_up.as_slice().to_vec();
            return Some(self.finalize_candidate(slot.token_id, slot.anchor, slot.matched, &source));
        }

        debug_assert!(
            self.current_verify.is_none(),
            "a second, unrelated verify token would overwrite the pending one"
        );
        log::trace!(
            target: TRACE_TARGET,
            "start_verify multi token {:?} at {} ({} triggers)",
            slot.token_id,
            slot.anchor,
            triggers.len()
        );
        self.current_verify = Some(VerifyToken::new(slot.token_id, slot.anchor, slot.matched, triggers));
        self.just_started_verify = true;
        None
    }

    /// §4.2(d) `PrepareSingleCharForVerification`.
    fn resolve_single(&mut self, id: TokenId, element: T, pos: usize) -> Option<ParseEvent> {
        let triggers =
            self.future_tokens
                .containing_live_candidates(pos, 1, std::slice::from_ref(&element));

        if triggers.is_empty() {
            let source = self.build_up.as_slice().to_vec();
            return Some(self.finalize_candidate(id, pos, 1, &source));
        }

        debug_assert!(
            self.current_verify.is_none(),
            "a second, unrelated verify token would overwrite the pending one"
        );
        log::trace!(
            target: TRACE_TARGET,
            "start_verify single token {:?} at {} ({} triggers)",
            id,
            pos,
            triggers.len()
        );
        self.current_verify = Some(VerifyToken::new(id, pos, 1, triggers));
        // `ch` (== `element`) is this candidate's own matched element, not
        // trailing text; phase (f) must not push it into the fresh verify
        // token's trailing build-up (mirrors the multi-element path above).
        self.just_started_verify = true;
        None
    }

    /// §4.4 draining: pop the (single) pending verify token once its
    /// trigger count has reached zero and finalize it.
    fn drain_verify_token(&mut self) -> Option<ParseEvent> {
        let Some(vt) = &self.current_verify else {
            self.finalizing = false;
            if let Some(ch) = self.pending_append.take() {
                self.build_up.push(ch);
            }
            return None;
        };
        if vt.trigger_count() != 0 {
            // Still waiting on another trigger; nothing to drain this call.
            return None;
        }

        let vt = self.current_verify.take().unwrap();
        let (id, anchor, len) = (vt.id, vt.anchor, vt.len);
        // The winner here is the verify token itself, so the correct source
        // for its own leading-up text is the *global* build-up exactly as it
        // stood when verification began (see `finalize_candidate`), not its
        // own `trailing_build_up` - that instead holds genuine post-token
        // text accumulated while its triggers were still live, and gets
        // carried forward into the build-up below once finalization clears
        // it, rather than being folded into this finalize's own trailing.
        let finalize_source = self.build_up.as_slice().to_vec();
        let carry_forward = vt.trailing_build_up.as_slice().to_vec();
        log::trace!(
            target: TRACE_TARGET,
            "finalize_next_verify_token {:?} anchor={} len={} trigger_starts={:?}",
            id,
            anchor,
            len,
            vt.trigger_starts
        );
        self.disposal.push(vt);
        self.finalizing = false;
        let event = self.finalize_candidate(id, anchor, len, &finalize_source);
        self.build_up.extend(&carry_forward);
        if let Some(ch) = self.pending_append.take() {
            self.build_up.push(ch);
        }
        Some(event)
    }

    /// §4.5 finalization: builds the `EmittedToken` from the installed text
    /// and shifts it into the emission queue. `build_up_source` is the
    /// buffer that held the text accumulated since the previous token; only
    /// its first `trailing_len` elements - the gap between the previous
    /// token's end and this one's anchor - are genuine leading-up text
    /// (`PrepareLeadingAndTrailing`'s anchor arithmetic in the original
    /// tokenizer). Anything past that belongs to this token's own span or to
    /// a race that was settled in its favor, and is dropped.
    fn finalize_candidate(&mut self, id: TokenId, anchor: usize, len: usize, build_up_source: &[T]) -> ParseEvent {
        let previous_end = self
            .emission
            .before_token
            .as_ref()
            .map(|t| t.span.end)
            .unwrap_or(0);
        let trailing_len = anchor.saturating_sub(previous_end).min(build_up_source.len());
        let trailing = build_up_source[..trailing_len].to_vec();
        let elements = self.text[anchor..anchor + len].to_vec();
        self.build_up.clear();
        log::trace!(
            target: TRACE_TARGET,
            "finalize {:?} anchor={} len={} trailing_len={}",
            id,
            anchor,
            len,
            trailing.len()
        );
        let token = EmittedToken {
            id,
            elements,
            span: Span::new(anchor, anchor + len),
        };
        self.emission.push(token, trailing)
    }
}
