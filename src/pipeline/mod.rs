//! Folder sweep pipeline: walk thread → bounded work queue → worker pool → hit stream, with
//! per-path errors collected in an [`ErrorLog`].

pub mod aggregator;
pub mod context;
pub mod orchestrator;
pub mod walk;
pub mod workers;

pub use aggregator::{ErrorLog, log_skipped_paths, summarize};
pub use context::{
    PipelineChannels, PipelineContext, PipelineHandles, PipelineTuning, WorkerContext,
    create_pipeline_channels,
};
pub use orchestrator::{collect_report, resolve_root_device, run_pipeline};
pub use walk::{WalkOutcome, WalkSummary, run_walk_loop, spawn_walk_thread, to_outcome_walkdir};
pub use workers::{process_path, spawn_workers};
