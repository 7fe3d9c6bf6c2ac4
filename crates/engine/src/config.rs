//! Configuration builder (C8): compiles declared tokens and limits into the
//! immutable [`Vocabulary`]/[`TokenLimit`] tables the engine consumes.
//!
//! This mirrors `TokenizerConfig`'s role in a resumable tokenizer: a plain
//! data-holding value handed to the engine at construction, built up with
//! `with_*` methods rather than validated at every call site.

use crate::vocab::{MultiElementToken, SingleElementToken, TokenId, TokenLimit, Vocabulary};

/// Accumulates single- and multi-element token specs in declaration order
/// and compiles them into an immutable [`Vocabulary`].
#[derive(Clone, Debug)]
pub struct VocabularyBuilder<T> {
    singles: Vec<T>,
    multis: Vec<Vec<T>>,
}

impl<T> Default for VocabularyBuilder<T> {
    fn default() -> Self {
        Self {
            singles: Vec::new(),
            multis: Vec::new(),
        }
    }
}

impl<T> VocabularyBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a single-element token. Declaration order determines
    /// tie-break priority against other single-element tokens.
    pub fn single(mut self, element: T) -> Self {
        self.singles.push(element);
        self
    }

    /// Declare a multi-element token. `elements` must have at least 2
    /// entries; shorter sequences are rejected at build time.
    pub fn multi(mut self, elements: Vec<T>) -> Self {
        self.multis.push(elements);
        self
    }

    pub fn build(self) -> Vocabulary<T> {
        // Ids are assigned from one shared counter across both lists so a
        // `TokenId` uniquely identifies a spec regardless of its kind;
        // callers that only see an `EmittedToken`'s id can't otherwise tell
        // single-element token #0 apart from multi-element token #0.
        let single_count = self.singles.len();
        let singles = self
            .singles
            .into_iter()
            .enumerate()
            .map(|(i, element)| SingleElementToken {
                id: TokenId(i as u32),
                element,
            })
            .collect();
        let multis = self
            .multis
            .into_iter()
            .enumerate()
            .map(|(i, elements)| {
                assert!(
                    elements.len() >= 2,
                    "multi-element token must have at least 2 elements"
                );
                MultiElementToken {
                    id: TokenId((single_count + i) as u32),
                    elements,
                }
            })
            .collect();
        Vocabulary { singles, multis }
    }
}

/// Builds one named [`TokenLimit`] scope.
#[derive(Clone, Debug)]
pub struct TokenLimitBuilder<T, U> {
    name: Vec<U>,
    vocabulary: VocabularyBuilder<T>,
}

impl<T, U> TokenLimitBuilder<T, U> {
    pub fn new(name: Vec<U>) -> Self {
        Self {
            name,
            vocabulary: VocabularyBuilder::new(),
        }
    }

    pub fn single(mut self, element: T) -> Self {
        self.vocabulary = self.vocabulary.single(element);
        self
    }

    pub fn multi(mut self, elements: Vec<T>) -> Self {
        self.vocabulary = self.vocabulary.multi(elements);
        self
    }

    pub fn build(self) -> TokenLimit<T, U> {
        TokenLimit {
            name: self.name,
            vocabulary: self.vocabulary.build(),
        }
    }
}

/// Root configuration: the always-active root vocabulary plus zero or more
/// named limits the caller may enter with
/// [`Engine::enter_token_limit`](crate::engine::Engine::enter_token_limit).
#[derive(Clone, Debug)]
pub struct EngineConfig<T, U> {
    pub root: Vocabulary<T>,
    pub limits: Vec<TokenLimit<T, U>>,
}

impl<T, U> EngineConfig<T, U> {
    pub fn new(root: Vocabulary<T>, limits: Vec<TokenLimit<T, U>>) -> Self {
        Self { root, limits }
    }

    /// The vocabulary in effect given the current limit stack: the top
    /// entry's vocabulary, or `root` when the stack is empty (C7).
    pub(crate) fn active(&self, limit_stack: &[usize]) -> &Vocabulary<T> {
        match limit_stack.last() {
            Some(&idx) => &self.limits[idx].vocabulary,
            None => &self.root,
        }
    }
}
