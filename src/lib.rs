pub mod aggregation;
pub mod config;
pub mod datasets;
pub mod embedding;
pub mod graph;
pub mod hooks;
pub mod pattern;
pub mod pipeline;
pub mod sampling;
pub mod wl;

pub use aggregation::{
    AggregationSink, AggregationStorage, EdgeClasses, PatternRecord, SupportStorage,
};
pub use config::{MiningConfig, MiningTask};
pub use datasets::DatasetLoader;
pub use embedding::{
    CanonicalityChecker, ConnectivityOracle, EdgeEmbedding, EdgeInduced, Embedding, Extensions,
    Induction, InductionKind, Modification, ModificationEnumerator, ModificationPolicy,
    ModificationSet, VertexEmbedding, VertexInduced, Word,
};
pub use graph::{EdgeId, GraphLoader, HostGraph, MainGraph, VertexId};
pub use hooks::ExplorationHooks;
pub use pattern::{CanonicalLabeler, Pattern, WlCanonicalLabeler};
pub use pipeline::{Explorer, MiningReport, MiningStats, MiningSummary, MiningWorkflow};
pub use sampling::{GroupFactorEstimator, MhSampler, SfSampler, StepOutcome, WalkStats};
