//! Section workflow core: the generate/evaluate/refine state machine and
//! the driver that bridges it to persistence.

mod driver;
mod machine;
mod state;

pub use driver::{build_context_summary, CycleOutcome, CycleRequest, WorkflowDriver, WorkflowError};
pub use machine::{route_after_evaluate, Route, SectionWorkflow, WorkflowConfig};
pub use state::{Feedback, WorkflowState};
