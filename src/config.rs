use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::embedding::InductionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiningTask {
    /// Exhaustive motif counting.
    Motifs,
    /// Exhaustive search for near-cliques.
    Density,
    /// Edge-induced motifs supported by edge-overlap classes.
    Gec,
    MhMotifs,
    SfMotifs,
    /// SF sampling restricted to label-dominated embeddings.
    SfMajority,
}

impl MiningTask {
    pub fn is_sampling(self) -> bool {
        matches!(self, Self::MhMotifs | Self::SfMotifs | Self::SfMajority)
    }
}

impl FromStr for MiningTask {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "motifs" => Ok(Self::Motifs),
            "density" => Ok(Self::Density),
            "gec" => Ok(Self::Gec),
            "mh-motifs" => Ok(Self::MhMotifs),
            "sf-motifs" => Ok(Self::SfMotifs),
            "sf-majority" => Ok(Self::SfMajority),
            other => bail!("Unknown task: {other}"),
        }
    }
}

impl fmt::Display for MiningTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Motifs => "motifs",
            Self::Density => "density",
            Self::Gec => "gec",
            Self::MhMotifs => "mh-motifs",
            Self::SfMotifs => "sf-motifs",
            Self::SfMajority => "sf-majority",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MiningConfig {
    pub task: MiningTask,
    pub induction: InductionKind,
    /// Number of walkers across all partitions.
    pub sample_size: usize,
    pub max_size: usize,
    pub max_step: usize,
    /// First walk step whose embeddings are reported.
    pub agg_step: usize,
    pub max_missing_edges: usize,
    pub partitions: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            task: MiningTask::Motifs,
            induction: InductionKind::Vertex,
            sample_size: 100,
            max_size: 4,
            max_step: 10,
            agg_step: 5,
            max_missing_edges: 2,
            partitions: None,
            seed: None,
        }
    }
}

impl MiningConfig {
    /// Defaults overridden by a flat key/value mapping.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            config.set(key, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim() {
            "task" => self.task = value.parse()?,
            "induction" => self.induction = value.parse()?,
            "sample_size" => self.sample_size = parse_value(key, value)?,
            "max_size" => self.max_size = parse_value(key, value)?,
            "max_step" => self.max_step = parse_value(key, value)?,
            "agg_step" => self.agg_step = parse_value(key, value)?,
            "max_missing_edges" => self.max_missing_edges = parse_value(key, value)?,
            "partitions" => self.partitions = Some(parse_value(key, value)?),
            "seed" => self.seed = Some(parse_value(key, value)?),
            other => bail!("Unknown configuration key: {other}"),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            bail!("max_size must be greater than zero");
        }
        if self.partitions == Some(0) {
            bail!("partitions must be greater than zero");
        }
        if self.task.is_sampling() && self.sample_size == 0 {
            bail!("sample_size must be greater than zero for {}", self.task);
        }
        if self.task == MiningTask::Density && self.induction != InductionKind::Vertex {
            bail!("density only supports vertex induction");
        }
        if self.task == MiningTask::Gec && self.induction != InductionKind::Edge {
            bail!("gec only supports edge induction");
        }
        if self.agg_step > self.max_step && self.task.is_sampling() {
            bail!(
                "agg_step {} exceeds max_step {}, nothing would be reported",
                self.agg_step,
                self.max_step
            );
        }
        Ok(())
    }

    pub fn partitions(&self) -> usize {
        self.partitions
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("Invalid value for {key}: {value:?}"))
}
