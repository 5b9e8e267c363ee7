pub mod item_ctx;
pub mod item_flow;
pub mod stage_runner;

pub use item_ctx::ItemCtx;
pub use item_flow::{ItemOutcome, StageFailure, StepCounter, UnitItemFlow};
pub use stage_runner::{LlmStageRunner, StageRunner, UnitStage};
