//! Immutable vocabulary model: token specs and scoped limits (C1).

/// Identity of a configured token, assigned by declaration order inside its
/// vocabulary. Used to report which spec matched and to break ties between
/// specs that finish at the same position (lower id wins, see
/// [`crate::engine::Engine::continue_execution`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

/// One declared single-element token.
#[derive(Clone, Debug)]
pub struct SingleElementToken<T> {
    pub id: TokenId,
    pub element: T,
}

/// One declared multi-element token. `elements.len() >= 2`.
#[derive(Clone, Debug)]
pub struct MultiElementToken<T> {
    pub id: TokenId,
    pub elements: Vec<T>,
}

/// An immutable, ordered set of single- and multi-element tokens.
///
/// Order is semantically significant: when two specs of equal length both
/// match at the same position, the one declared first wins (Testable
/// Property 4).
#[derive(Clone, Debug)]
pub struct Vocabulary<T> {
    pub(crate) singles: Vec<SingleElementToken<T>>,
    pub(crate) multis: Vec<MultiElementToken<T>>,
}

impl<T> Vocabulary<T> {
    pub fn singles(&self) -> &[SingleElementToken<T>] {
        &self.singles
    }

    pub fn multis(&self) -> &[MultiElementToken<T>] {
        &self.multis
    }
}

/// A named, scoped sub-vocabulary that can be pushed onto the limit stack
/// (C7) to temporarily replace the active vocabulary.
#[derive(Clone, Debug)]
pub struct TokenLimit<T, U> {
    pub(crate) name: Vec<U>,
    pub(crate) vocabulary: Vocabulary<T>,
}

impl<T, U> TokenLimit<T, U> {
    pub fn vocabulary(&self) -> &Vocabulary<T> {
        &self.vocabulary
    }
}

impl<T, U: PartialEq> TokenLimit<T, U> {
    pub(crate) fn name_matches(&self, name: &[U]) -> bool {
        self.name.len() == name.len() && self.name.iter().zip(name).all(|(a, b)| a == b)
    }
}
