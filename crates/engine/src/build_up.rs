//! Build-up buffer (C3): pending elements between the last emitted boundary
//! and the cursor.

/// An append-only buffer of elements not yet assigned to an emitted token.
/// Capacity is grown, never shrunk, across `reset_for_input` calls (Design
/// Notes, reallocation-on-growth-only).
#[derive(Clone, Debug, Default)]
pub(crate) struct BuildUp<T> {
    elements: Vec<T>,
}

impl<T: Clone> BuildUp<T> {
    pub(crate) fn reset_for_input(&mut self, capacity_hint: usize) {
        self.elements.clear();
        if self.elements.capacity() < capacity_hint {
            self.elements.reserve(capacity_hint - self.elements.capacity());
        }
    }

    pub(crate) fn push(&mut self, element: T) {
        self.elements.push(element);
    }

    /// Append every element of `source` in order; used to carry text
    /// accumulated during a verification race forward into the build-up for
    /// whatever comes after the token that just won it.
    pub(crate) fn extend(&mut self, source: &[T]) {
        self.elements.extend_from_slice(source);
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub(crate) fn clear(&mut self) {
        self.elements.clear();
    }
}
