pub mod explore;
pub mod tasks;
pub mod workflow;

pub use explore::Explorer;
pub use workflow::{MiningReport, MiningStats, MiningSummary, MiningWorkflow};
