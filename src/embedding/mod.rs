//! Incrementally maintained connected subgraphs of a host graph.
//!
//! An [`Embedding`] is an ordered list of words (vertex ids or edge ids,
//! depending on the [`Induction`]) plus the elements derived from them. Each
//! word records how many derived elements it introduced so the last word can
//! be undone by truncation.

pub mod canonical;
pub mod connectivity;
pub mod edge;
pub mod modification;
pub mod vertex;

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use anyhow::{Result, bail};
use indexmap::IndexSet;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, HostGraph, VertexId};
use crate::pattern::{CanonicalLabeler, Pattern};

pub use canonical::CanonicalityChecker;
pub use connectivity::ConnectivityOracle;
pub use edge::EdgeInduced;
pub use modification::{
    Modification, ModificationEnumerator, ModificationPolicy, ModificationSet,
};
pub use vertex::VertexInduced;

pub type Word = u32;

pub type VertexEmbedding<'g, G> = Embedding<'g, G, VertexInduced>;
pub type EdgeEmbedding<'g, G> = Embedding<'g, G, EdgeInduced>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InductionKind {
    Vertex,
    Edge,
}

impl FromStr for InductionKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "vertex" => Ok(Self::Vertex),
            "edge" => Ok(Self::Edge),
            other => bail!("Unknown induction kind: {other} (expected vertex or edge)"),
        }
    }
}

impl fmt::Display for InductionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::VertexInduced {}
    impl Sealed for super::EdgeInduced {}
}

/// Variant-specific rules of an embedding: what a word is, when two words
/// touch, and how derived elements follow from the word list.
pub trait Induction: sealed::Sealed + Send + Sync + 'static {
    const KIND: InductionKind;

    fn universe_size<G: HostGraph>(graph: &G) -> usize;

    fn are_words_adjacent<G: HostGraph>(graph: &G, a: Word, b: Word) -> bool;

    /// Inserts every word adjacent to `word` into `out`.
    fn collect_extensions<G: HostGraph>(graph: &G, word: Word, out: &mut IndexSet<Word>);

    /// Derives the elements contributed by the last word of `state` and
    /// records their count.
    fn derive_last<G: HostGraph>(graph: &G, state: &mut WordState);

    /// Removes the word at `index`, leaving `state` consistent and connected.
    fn remove_at<G: HostGraph>(
        graph: &G,
        state: &mut WordState,
        index: usize,
        oracle: &mut ConnectivityOracle,
    );

    fn vertices(state: &WordState) -> &[VertexId];

    fn edges(state: &WordState) -> &[EdgeId];
}

/// Words, derived elements and the per-word delta, kept in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordState {
    pub(crate) words: Vec<Word>,
    pub(crate) derived: Vec<u32>,
    pub(crate) derived_per_word: Vec<usize>,
}

impl WordState {
    fn clear(&mut self) {
        self.words.clear();
        self.derived.clear();
        self.derived_per_word.clear();
    }

    /// Re-derives everything by adding `order` word by word.
    pub(crate) fn rebuild<I: Induction, G: HostGraph>(&mut self, graph: &G, order: Vec<Word>) {
        self.clear();
        for word in order {
            self.words.push(word);
            I::derive_last(graph, self);
        }
    }
}

#[derive(Debug, Clone)]
struct WordCache {
    words: IndexSet<Word>,
    dirty: bool,
}

impl Default for WordCache {
    fn default() -> Self {
        Self {
            words: IndexSet::new(),
            dirty: true,
        }
    }
}

/// Legal extension words of an embedding.
#[derive(Debug, Clone, Copy)]
pub enum Extensions<'a> {
    /// The embedding is empty: any of the first `n` words may be added.
    Universe(usize),
    Words(&'a IndexSet<Word>),
}

impl Extensions<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Universe(n) => *n,
            Self::Words(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, word: Word) -> bool {
        match self {
            Self::Universe(n) => (word as usize) < *n,
            Self::Words(words) => words.contains(&word),
        }
    }
}

pub struct Embedding<'g, G: HostGraph, I: Induction> {
    graph: &'g G,
    state: WordState,
    extensions: WordCache,
    contractions: WordCache,
    pattern: Option<Pattern>,
    oracle: ConnectivityOracle,
    _induction: PhantomData<I>,
}

impl<'g, G: HostGraph, I: Induction> Embedding<'g, G, I> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            state: WordState::default(),
            extensions: WordCache::default(),
            contractions: WordCache::default(),
            pattern: None,
            oracle: ConnectivityOracle::new(),
            _induction: PhantomData,
        }
    }

    /// Builds an embedding by adding `words` in order.
    pub fn from_words(graph: &'g G, words: &[Word]) -> Self {
        let mut embedding = Self::new(graph);
        for &word in words {
            embedding.add_word(word);
        }
        embedding
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn kind(&self) -> InductionKind {
        I::KIND
    }

    pub fn universe_size(&self) -> usize {
        I::universe_size(self.graph)
    }

    pub fn words(&self) -> &[Word] {
        &self.state.words
    }

    pub fn num_words(&self) -> usize {
        self.state.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.words.is_empty()
    }

    pub fn contains(&self, word: Word) -> bool {
        self.state.words.contains(&word)
    }

    pub fn last_word(&self) -> Option<Word> {
        self.state.words.last().copied()
    }

    pub fn vertices(&self) -> &[VertexId] {
        I::vertices(&self.state)
    }

    pub fn edges(&self) -> &[EdgeId] {
        I::edges(&self.state)
    }

    pub fn derived_per_word(&self) -> &[usize] {
        &self.state.derived_per_word
    }

    fn invalidate(&mut self) {
        self.extensions.dirty = true;
        self.contractions.dirty = true;
        self.pattern = None;
    }

    /// Appends `word`, which must not be present yet.
    pub fn add_word(&mut self, word: Word) {
        debug_assert!(
            !self.state.words.contains(&word),
            "word {word} is already in the embedding"
        );
        self.state.words.push(word);
        I::derive_last(self.graph, &mut self.state);
        self.invalidate();
    }

    pub fn remove_last_word(&mut self) {
        let Some(count) = self.state.derived_per_word.pop() else {
            return;
        };
        let keep = self.state.derived.len() - count;
        self.state.derived.truncate(keep);
        self.state.words.pop();
        self.invalidate();
    }

    /// Removes `word` from anywhere in the embedding.
    ///
    /// If the remaining words no longer form one connected piece, only the
    /// component holding the first remaining word survives.
    ///
    /// # Panics
    ///
    /// Panics if `word` is not part of the embedding.
    pub fn remove_word(&mut self, word: Word) {
        let Some(index) = self.state.words.iter().position(|&w| w == word) else {
            panic!("word {word} is not in the embedding");
        };
        if self.state.words.len() == 1 {
            self.reset();
            return;
        }
        I::remove_at(self.graph, &mut self.state, index, &mut self.oracle);
        self.invalidate();
    }

    pub fn reset(&mut self) {
        self.state.clear();
        self.invalidate();
    }

    /// Words adjacent to the embedding that are not part of it yet.
    pub fn extensions(&mut self) -> Extensions<'_> {
        if self.state.words.is_empty() {
            return Extensions::Universe(I::universe_size(self.graph));
        }
        if self.extensions.dirty {
            let cache = &mut self.extensions.words;
            cache.clear();
            for &word in &self.state.words {
                I::collect_extensions(self.graph, word, cache);
            }
            let present = &self.state.words;
            cache.retain(|word| !present.contains(word));
            self.extensions.dirty = false;
        }
        Extensions::Words(&self.extensions.words)
    }

    /// Words whose removal keeps the embedding connected.
    pub fn contractions(&mut self) -> &IndexSet<Word> {
        if self.contractions.dirty {
            let cache = &mut self.contractions.words;
            cache.clear();
            let words = &self.state.words;
            let graph = self.graph;
            let cut = self.oracle.cut_elements(words.len(), |a, b| {
                I::are_words_adjacent(graph, words[a], words[b])
            });
            for (idx, &is_cut) in cut.iter().enumerate() {
                if !is_cut {
                    cache.insert(words[idx]);
                }
            }
            self.contractions.dirty = false;
        }
        &self.contractions.words
    }

    pub fn is_canonical_with_word(&self, word: Word) -> bool {
        CanonicalityChecker::is_canonical_with_word::<G, I>(self.graph, &self.state.words, word)
    }

    /// Canonical pattern of the embedding, computed once per structure.
    pub fn pattern<L: CanonicalLabeler>(&mut self, labeler: &L) -> Result<&Pattern> {
        let pattern = match self.pattern.take() {
            Some(pattern) => pattern,
            None => labeler.canonical_label(self.graph, self.vertices(), self.edges())?,
        };
        Ok(&*self.pattern.insert(pattern))
    }

    /// Sorted words present in both embeddings.
    pub fn shared_words(&self, other: &Self) -> Vec<Word> {
        let mut shared: Vec<Word> = self
            .state
            .words
            .iter()
            .copied()
            .filter(|word| other.state.words.contains(word))
            .collect();
        shared.sort_unstable();
        shared
    }

    pub fn same_edges(&self, other: &Self) -> bool {
        let mut mine = self.edges().to_vec();
        let mut theirs = other.edges().to_vec();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }

    /// Overwrites `self` with the contents of `other`.
    pub fn set_from(&mut self, other: &Self) {
        self.graph = other.graph;
        self.state.clone_from(&other.state);
        self.extensions.clone_from(&other.extensions);
        self.contractions.clone_from(&other.contractions);
        self.pattern.clone_from(&other.pattern);
    }

    /// The embedding as a standalone graph: node weights are vertex labels,
    /// edge weights are host edge ids.
    pub fn to_petgraph(&self) -> UnGraph<u32, EdgeId> {
        let vertices = self.vertices();
        let mut graph = UnGraph::with_capacity(vertices.len(), self.edges().len());
        for &vertex in vertices {
            graph.add_node(self.graph.vertex_label(vertex));
        }
        let position = |vertex: VertexId| vertices.iter().position(|&v| v == vertex);
        for &edge in self.edges() {
            let (src, dst) = self.graph.edge(edge);
            if let (Some(a), Some(b)) = (position(src), position(dst)) {
                graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), edge);
            }
        }
        graph
    }
}

impl<G: HostGraph, I: Induction> Clone for Embedding<'_, G, I> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            state: self.state.clone(),
            extensions: self.extensions.clone(),
            contractions: self.contractions.clone(),
            pattern: self.pattern.clone(),
            oracle: ConnectivityOracle::new(),
            _induction: PhantomData,
        }
    }
}

impl<G: HostGraph, I: Induction> fmt::Debug for Embedding<'_, G, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedding")
            .field("kind", &I::KIND)
            .field("words", &self.state.words)
            .field("derived", &self.state.derived)
            .field("derived_per_word", &self.state.derived_per_word)
            .finish()
    }
}

impl<G: HostGraph, I: Induction> fmt::Display for Embedding<'_, G, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match I::KIND {
            InductionKind::Vertex => {
                for (idx, vertex) in self.vertices().iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{vertex}")?;
                }
            }
            InductionKind::Edge => {
                for (idx, &edge) in self.edges().iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    let (src, dst) = self.graph.edge(edge);
                    write!(f, "{src}-{dst}")?;
                }
            }
        }
        Ok(())
    }
}
