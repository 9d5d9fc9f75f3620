//! Routing orchestration: the event router and its dispatch report.

pub(crate) mod report;
pub(crate) mod router;

pub use report::{DispatchReport, PublishFailure};
pub use router::EventRouter;
