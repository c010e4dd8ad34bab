#![warn(missing_docs)]
//! Authoring session state machine, scan event bus, and replay.

pub mod bus;
pub mod replay;
pub mod session;
pub mod workflow;

pub use bus::{ScanBus, ScanSubscription};
pub use replay::ReplayEngine;
pub use session::{
    AnchorSession, SessionError, SessionState, SurfaceFeedback, SCANNER_LATERAL_OFFSET_M,
};
pub use workflow::{Workflow, WorkflowFeedback, WorkflowMode};
