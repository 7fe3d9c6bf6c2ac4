//! Future-token table (C2): tracks every multi-element candidate currently
//! being matched, keyed by the position where it began.

use crate::vocab::TokenId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FutureTokenStatus {
    Live,
    Finished,
    Disabled,
}

/// One in-flight multi-element candidate. `elements` is the spec's full
/// sequence, copied from the vocabulary that was active at `open()` time -
/// not re-resolved against whichever vocabulary happens to be active later.
/// A candidate opened under the root vocabulary can still be live after a
/// token limit has been entered (§4.6: "already-open candidates for
/// now-out-of-scope specs remain live until mismatch"), at which point its
/// originating spec may not even exist in the now-active vocabulary, and
/// `token_id` alone is only unique within the vocabulary that assigned it,
/// never across the whole `EngineConfig`.
#[derive(Clone, Debug)]
pub(crate) struct FutureTokenSlot<T> {
    pub token_id: TokenId,
    pub elements: Vec<T>,
    pub anchor: usize,
    pub matched: usize,
    pub status: FutureTokenStatus,
}

impl<T> FutureTokenSlot<T> {
    fn spec_len(&self) -> usize {
        self.elements.len()
    }
}

/// Stable reference to one future-token slot, usable as a verify-token
/// trigger even after intervening rows have been opened or retired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FutureTokenKey {
    pub(crate) anchor: usize,
    pub(crate) slot: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FutureTokenEvent {
    Finished(FutureTokenKey),
    Disabled(FutureTokenKey),
}

/// Rows indexed by anchor position. `head` is the lowest anchor that might
/// still hold a live candidate; rows below it are dead and ignored.
#[derive(Clone, Debug)]
pub(crate) struct FutureTokenTable<T> {
    rows: Vec<Vec<FutureTokenSlot<T>>>,
    head: usize,
}

impl<T> Default for FutureTokenTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            head: 0,
        }
    }
}

impl<T: Clone + PartialEq> FutureTokenTable<T> {
    /// Grow row storage so every position up to `text_len` has a row,
    /// reusing existing capacity. Per the Design Notes, reallocation only
    /// happens when the new input is longer than any previously seen.
    pub(crate) fn ensure_capacity(&mut self, text_len: usize) {
        if self.rows.len() < text_len + 1 {
            self.rows.resize_with(text_len + 1, Vec::new);
        }
    }

    pub(crate) fn reset(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
        self.head = 0;
    }

    pub(crate) fn open(&mut self, anchor: usize, token_id: TokenId, elements: Vec<T>) {
        debug_assert!(
            elements.len() >= 2,
            "only multi-element specs open future tokens"
        );
        let row = &mut self.rows[anchor];
        row.push(FutureTokenSlot {
            token_id,
            elements,
            anchor,
            matched: 1,
            status: FutureTokenStatus::Live,
        });
    }

    /// Advance every live candidate in `[head, cursor]` against `element`,
    /// the element just read at `cursor`. Returns finish/disable events in
    /// slot-visitation order (anchor ascending, then declaration order).
    pub(crate) fn advance(&mut self, cursor: usize, element: &T) -> Vec<FutureTokenEvent> {
        let mut events = Vec::new();
        for anchor in self.head..=cursor {
            let row = &mut self.rows[anchor];
            for (slot_idx, slot) in row.iter_mut().enumerate() {
                if slot.status != FutureTokenStatus::Live {
                    continue;
                }
                if slot.elements[slot.matched] == *element {
                    slot.matched += 1;
                    if slot.matched == slot.elements.len() {
                        slot.status = FutureTokenStatus::Finished;
                        events.push(FutureTokenEvent::Finished(FutureTokenKey {
                            anchor,
                            slot: slot_idx,
                        }));
                    }
                } else {
                    slot.status = FutureTokenStatus::Disabled;
                    events.push(FutureTokenEvent::Disabled(FutureTokenKey {
                        anchor,
                        slot: slot_idx,
                    }));
                }
            }
        }
        self.advance_head();
        events
    }

    fn advance_head(&mut self) {
        while self.head < self.rows.len()
            && self.rows[self.head]
                .iter()
                .all(|s| s.status != FutureTokenStatus::Live)
        {
            self.head += 1;
        }
    }

    pub(crate) fn get(&self, key: FutureTokenKey) -> &FutureTokenSlot<T> {
        &self.rows[key.anchor][key.slot]
    }

    /// Number of allocated rows; used by tests to check the reallocation
    /// threshold (Testable Property 7) without a public growth counter.
    #[cfg(test)]
    pub(crate) fn row_capacity(&self) -> usize {
        self.rows.len()
    }

    /// Other still-live candidates sharing `key`'s anchor that are strictly
    /// longer than it — used when a trigger itself finishes and a longer
    /// sibling must now be re-verified (§4.4). Only *live* siblings count: a
    /// disabled one is dead, and a finished one would already have gone
    /// through its own resolution.
    pub(crate) fn longer_siblings(&self, key: FutureTokenKey) -> Vec<FutureTokenKey> {
        let me_len = self.get(key).spec_len();
        self.rows[key.anchor]
            .iter()
            .enumerate()
            .filter(|(idx, s)| {
                *idx != key.slot && s.spec_len() > me_len && s.status == FutureTokenStatus::Live
            })
            .map(|(idx, _)| FutureTokenKey {
                anchor: key.anchor,
                slot: idx,
            })
            .collect()
    }

    /// Live candidates anchored at or before `finished_anchor` whose matched
    /// sequence contains the just-finished candidate at its finishing
    /// position — the containment check behind §4.3. Only candidates still
    /// in *live* status are triggers; a disabled one is dead and a finished
    /// one has already resolved on its own.
    pub(crate) fn containing_live_candidates(
        &self,
        finished_anchor: usize,
        finished_len: usize,
        finished_elements: &[T],
    ) -> Vec<FutureTokenKey> {
        let mut out = Vec::new();
        for anchor in self.head..=finished_anchor {
            let row = &self.rows[anchor];
            for (slot_idx, slot) in row.iter().enumerate() {
                if slot.status != FutureTokenStatus::Live || slot.spec_len() < finished_len {
                    continue;
                }
                let offset = finished_anchor - anchor;
                if offset + finished_len > slot.spec_len() {
                    continue;
                }
                if slot.elements[offset..offset + finished_len] == *finished_elements {
                    out.push(FutureTokenKey {
                        anchor,
                        slot: slot_idx,
                    });
                }
            }
        }
        out
    }
}
