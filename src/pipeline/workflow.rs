use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregation::{AggregationStorage, PatternRecord, SupportStorage};
use crate::config::{MiningConfig, MiningTask};
use crate::embedding::{
    EdgeInduced, Induction, InductionKind, ModificationPolicy, VertexInduced, Word,
};
use crate::graph::HostGraph;
use crate::hooks::ExplorationHooks;
use crate::pattern::WlCanonicalLabeler;
use crate::pipeline::explore::Explorer;
use crate::pipeline::tasks::{
    DenseSubgraphs, EdgeClassSupport, MotifCounting, SampleWeight, WalkSampling,
};
use crate::sampling::{GroupFactorEstimator, MhSampler, SfSampler, WalkStats, random_seed};

/// Runs one mining task over a host graph, one partition per rayon task.
///
/// Exhaustive tasks split the start words round-robin across partitions;
/// walk tasks split `sample_size` walkers. Each partition owns its own
/// embedding, sampler and storage; results are merged at the end.
pub struct MiningWorkflow {
    config: MiningConfig,
    labeler: WlCanonicalLabeler,
}

impl MiningWorkflow {
    pub fn new(config: MiningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            labeler: WlCanonicalLabeler::default(),
        })
    }

    pub fn with_labeler(mut self, labeler: WlCanonicalLabeler) -> Self {
        self.labeler = labeler;
        self
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    pub fn execute<G: HostGraph>(&self, graph: &G) -> Result<MiningSummary> {
        let start = Instant::now();
        let partitions = self.config.partitions();
        info!(
            "Running {} ({}-induced, max size {}) over {} partitions",
            self.config.task, self.config.induction, self.config.max_size, partitions
        );

        let accumulator = match self.config.induction {
            InductionKind::Vertex => self.run_partitions::<G, VertexInduced>(graph, partitions)?,
            InductionKind::Edge => self.run_partitions::<G, EdgeInduced>(graph, partitions)?,
        };

        let mut aggregation = accumulator.aggregation;
        aggregation.merge(accumulator.supports.into_aggregation());
        let mut outputs = accumulator.outputs;
        outputs.sort();
        let duration = start.elapsed();
        info!(
            "Finished {}: {} patterns, {} outputs in {:.2?}",
            self.config.task,
            aggregation.len(),
            outputs.len(),
            duration
        );

        Ok(MiningSummary {
            aggregation,
            outputs,
            stats: MiningStats {
                partitions,
                visited: accumulator.visited,
                reported: accumulator.reported,
                walks: accumulator.walks,
            },
            duration,
        })
    }

    fn run_partitions<G: HostGraph, I: Induction>(
        &self,
        graph: &G,
        partitions: usize,
    ) -> Result<PartitionAccumulator> {
        (0..partitions)
            .into_par_iter()
            .map(|partition| self.run_partition::<G, I>(graph, partition, partitions))
            .try_reduce(PartitionAccumulator::default, |left, right| {
                Ok(left.combine(right))
            })
    }

    fn run_partition<G: HostGraph, I: Induction>(
        &self,
        graph: &G,
        partition: usize,
        partitions: usize,
    ) -> Result<PartitionAccumulator> {
        let config = &self.config;
        let mut acc = PartitionAccumulator::default();

        match config.task {
            MiningTask::Motifs => {
                let mut hooks = MotifCounting::new(&self.labeler, config.max_size);
                acc.visited = explore::<G, I, _>(graph, partition, partitions, &mut hooks)?;
                acc.reported = hooks.reported();
                acc.aggregation = hooks.into_storage();
            }
            MiningTask::Gec => {
                let mut hooks = EdgeClassSupport::new(&self.labeler, config.max_size);
                acc.visited = explore::<G, I, _>(graph, partition, partitions, &mut hooks)?;
                acc.reported = hooks.reported();
                acc.supports = hooks.into_supports();
            }
            MiningTask::Density => {
                let mut hooks = DenseSubgraphs::new(config.max_size, config.max_missing_edges);
                acc.visited = explore::<G, I, _>(graph, partition, partitions, &mut hooks)?;
                acc.outputs = hooks.into_outputs();
                acc.reported = acc.outputs.len();
            }
            MiningTask::MhMotifs => {
                let policy = ModificationPolicy::Bounded {
                    max_size: config.max_size,
                };
                let mut sampler: MhSampler<'_, G, I> =
                    MhSampler::for_partition(graph, policy, config.seed.unwrap_or(0), partition);
                let mut hooks = WalkSampling::new(
                    &self.labeler,
                    config.max_step,
                    config.agg_step,
                    config.max_size,
                    SampleWeight::Unit,
                );
                for _ in 0..walkers_for(config.sample_size, partition, partitions) {
                    if !sampler.seed_random_word() {
                        break;
                    }
                    sampler.run(&mut hooks)?;
                }
                acc.walks = sampler.stats().clone();
                acc.visited = acc.walks.visited;
                acc.reported = hooks.reported();
                acc.aggregation = hooks.into_storage();
            }
            MiningTask::SfMotifs | MiningTask::SfMajority => {
                let seed = match config.seed {
                    Some(seed) => seed.wrapping_add(partition as u64),
                    None => random_seed().wrapping_add(partition as u64),
                };
                let mut sampler: SfSampler<'_, G, I> =
                    SfSampler::with_seed(graph, config.max_size, seed);
                let mut hooks = WalkSampling::new(
                    &self.labeler,
                    config.max_step,
                    config.agg_step,
                    config.max_size,
                    SampleWeight::GroupFactor(GroupFactorEstimator::new()),
                );
                if config.task == MiningTask::SfMajority {
                    hooks = hooks.majority_only();
                }
                for _ in 0..walkers_for(config.sample_size, partition, partitions) {
                    if !sampler.seed_random_word() {
                        break;
                    }
                    sampler.run(&mut hooks)?;
                }
                acc.walks = sampler.stats().clone();
                acc.visited = acc.walks.visited;
                acc.reported = hooks.reported();
                acc.aggregation = hooks.into_storage();
            }
        }

        debug!(
            "Partition {}/{}: visited {}, reported {}",
            partition, partitions, acc.visited, acc.reported
        );
        Ok(acc)
    }
}

fn explore<G, I, H>(
    graph: &G,
    partition: usize,
    partitions: usize,
    hooks: &mut H,
) -> Result<usize>
where
    G: HostGraph,
    I: Induction,
    H: ExplorationHooks<G, I>,
{
    let mut explorer: Explorer<'_, G, I> = Explorer::new(graph);
    let universe = I::universe_size(graph);
    for start in (partition..universe).step_by(partitions) {
        explorer.explore_from(start as Word, hooks)?;
    }
    Ok(explorer.visited())
}

/// Walkers assigned to `partition`; the remainder goes to the first ones.
fn walkers_for(sample_size: usize, partition: usize, partitions: usize) -> usize {
    sample_size / partitions + usize::from(partition < sample_size % partitions)
}

#[derive(Debug, Default)]
struct PartitionAccumulator {
    aggregation: AggregationStorage,
    supports: SupportStorage,
    outputs: Vec<Vec<Word>>,
    visited: usize,
    reported: usize,
    walks: WalkStats,
}

impl PartitionAccumulator {
    fn combine(mut self, other: Self) -> Self {
        self.aggregation.merge(other.aggregation);
        self.supports.merge(other.supports);
        self.outputs.extend(other.outputs);
        self.visited += other.visited;
        self.reported += other.reported;
        self.walks.merge(&other.walks);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MiningStats {
    pub partitions: usize,
    pub visited: usize,
    pub reported: usize,
    pub walks: WalkStats,
}

#[derive(Debug, Clone)]
pub struct MiningSummary {
    pub aggregation: AggregationStorage,
    pub outputs: Vec<Vec<Word>>,
    pub stats: MiningStats,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct MiningReport {
    pub config: MiningConfig,
    pub patterns: Vec<PatternRecord>,
    pub outputs: Vec<Vec<Word>>,
    pub stats: MiningStats,
    pub duration_ms: u128,
}

impl MiningSummary {
    pub fn report(&self, config: &MiningConfig) -> MiningReport {
        MiningReport {
            config: config.clone(),
            patterns: self.aggregation.to_records(),
            outputs: self.outputs.clone(),
            stats: self.stats.clone(),
            duration_ms: self.duration.as_millis(),
        }
    }
}
