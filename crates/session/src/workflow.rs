//! End-to-end capture/restore workflow driver.
//!
//! Owns an authoring session, its repository, and its bus subscription for
//! the lifetime of one run. Dropping the workflow revokes the subscription,
//! so scans are never delivered to a torn-down session.

use anyhow::Result;
use tracing::{info, warn};

use shelfmark_core::{ScanEvent, TrackingState};
use shelfmark_store::{ItemStore, Repository};
use shelfmark_tracking::Frame;

use crate::bus::{ScanBus, ScanSubscription};
use crate::replay::ReplayEngine;
use crate::session::{AnchorSession, SessionError, SessionState, SurfaceFeedback};

/// Which workflow the session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowMode {
    /// Record a new planogram.
    Capture,
    /// Restore a previously saved planogram.
    Restore,
}

/// User-facing outcomes produced while pumping scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowFeedback {
    /// Section anchor established.
    SectionPlaced {
        /// Scanned section code.
        key: String,
    },
    /// Item recorded against the active section.
    ItemPlaced {
        /// Scanned item code.
        upc: String,
    },
    /// Stored layout materialized under the fresh section anchor.
    Replayed {
        /// Number of placed child nodes.
        count: usize,
    },
    /// No surface along the scanner ray; re-aim and rescan.
    PlacementFailed {
        /// The code whose placement failed.
        code: String,
    },
}

/// Drives one capture or restore run.
pub struct Workflow<S> {
    mode: WorkflowMode,
    session: AnchorSession,
    repository: Repository<S>,
    subscription: ScanSubscription,
    restored: ReplayEngine,
}

impl<S: ItemStore> Workflow<S> {
    /// Start a workflow; restore mode loads the planogram record up front.
    pub fn new(
        mode: WorkflowMode,
        session: AnchorSession,
        repository: Repository<S>,
        bus: &ScanBus,
    ) -> Self {
        let restored = match mode {
            WorkflowMode::Restore => {
                let engine = ReplayEngine::new(repository.read_planogram());
                let sections: Vec<&str> = engine.section_keys().collect();
                info!(items = engine.item_count(), ?sections, "restored planogram record");
                engine
            }
            WorkflowMode::Capture => ReplayEngine::default(),
        };
        Self {
            mode,
            session,
            repository,
            subscription: bus.subscribe(),
            restored,
        }
    }

    /// The workflow's mode.
    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    /// Borrow the authoring session.
    pub fn session(&self) -> &AnchorSession {
        &self.session
    }

    /// Mutably borrow the authoring session.
    pub fn session_mut(&mut self) -> &mut AnchorSession {
        &mut self.session
    }

    /// Borrow the repository.
    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    /// Drain pending scans and apply each to the session in arrival order.
    /// Each scan runs to completion before the next is handled.
    pub fn pump(&mut self, frame: &dyn Frame) -> Vec<WorkflowFeedback> {
        let mut feedback = Vec::new();
        while let Some(event) = self.subscription.try_recv() {
            self.handle_scan(frame, &event, &mut feedback);
        }
        feedback
    }

    fn handle_scan(
        &mut self,
        frame: &dyn Frame,
        event: &ScanEvent,
        feedback: &mut Vec<WorkflowFeedback>,
    ) {
        match self.session.state() {
            SessionState::Idle => match self.session.on_section_scan(frame, &event.data) {
                Ok(node) => {
                    feedback.push(WorkflowFeedback::SectionPlaced {
                        key: event.data.clone(),
                    });
                    if self.mode == WorkflowMode::Restore {
                        let nodes = self.restored.replay_all(&mut self.session, node);
                        feedback.push(WorkflowFeedback::Replayed { count: nodes.len() });
                    }
                }
                Err(SessionError::PlacementFailed) => {
                    warn!(code = %event.data, "section placement failed");
                    feedback.push(WorkflowFeedback::PlacementFailed {
                        code: event.data.clone(),
                    });
                }
                Err(err) => warn!(%err, code = %event.data, "section scan rejected"),
            },
            SessionState::SectionActive => match self.session.on_item_scan(frame, &event.data) {
                Ok(_) => feedback.push(WorkflowFeedback::ItemPlaced {
                    upc: event.data.clone(),
                }),
                Err(SessionError::PlacementFailed) => {
                    warn!(code = %event.data, "item placement failed");
                    feedback.push(WorkflowFeedback::PlacementFailed {
                        code: event.data.clone(),
                    });
                }
                Err(err) => warn!(%err, code = %event.data, "item scan rejected"),
            },
        }
    }

    /// Per-tick surface feedback passthrough.
    pub fn tick(&mut self, state: TrackingState, frame: &dyn Frame) -> Option<SurfaceFeedback> {
        self.session.on_scene_update(state, frame)
    }

    /// Persist pending items and reset for the next section.
    ///
    /// The store rewrite and the planogram file write both complete before
    /// in-memory session state is cleared, so a failed write leaves the
    /// scene and pending list intact for retry.
    pub fn save(&mut self) -> Result<()> {
        info!(items = self.session.pending_items().len(), "saving planogram");
        self.repository.delete_all();
        for item in self.session.pending_items() {
            self.repository.insert(item.clone());
        }
        self.repository.write_planogram()?;
        self.session.clear();
        Ok(())
    }
}
