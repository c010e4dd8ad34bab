//! Workflow save/restore integration test
//!
//! Drives the full loop through the event bus: capture scans, save,
//! then restore into a second workflow sharing only the export file.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use shelfmark_core::{ItemDefaults, ScanEvent, TrackingState};
use shelfmark_session::{
    AnchorSession, ScanBus, SurfaceFeedback, Workflow, WorkflowFeedback, WorkflowMode,
};
use shelfmark_store::{ExportStore, MemoryStore, Repository};
use shelfmark_testkit::{
    plane_hit, shelf_camera, vertical_plane_facing, FakeFrame, ScriptedTracking,
};

fn temp_dir(tag: &str) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    env::temp_dir().join(format!("shelfmark_workflow_{tag}_{timestamp}"))
}

fn repository(dir: &PathBuf) -> Repository<MemoryStore> {
    let export = ExportStore::new(dir).expect("Failed to create export store");
    Repository::new(MemoryStore::new(), export)
}

fn frame_with_hit(position: Vec3) -> FakeFrame {
    let plane = vertical_plane_facing(Vec3::new(0.0, 1.5, 0.0), Vec3::Z, 4.0);
    let mut frame = FakeFrame::with_camera(shelf_camera());
    frame.push_ray_hit(plane_hit(1.0, position, plane.clone()));
    frame.push_screen_hit(plane_hit(1.0, Vec3::new(0.0, 1.5, 0.0), plane));
    frame
}

#[test]
fn capture_save_restore_roundtrip() {
    let dir = temp_dir("roundtrip");
    let bus = ScanBus::new();

    // Capture run: one section, two items.
    let mut capture = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );

    assert_eq!(
        capture.tick(TrackingState::Tracking, &frame_with_hit(Vec3::ZERO)),
        Some(SurfaceFeedback::SurfaceFound)
    );

    bus.publish(ScanEvent::new("55500011", "EAN8"));
    let feedback = capture.pump(&frame_with_hit(Vec3::new(0.0, 1.5, 0.0)));
    assert_eq!(
        feedback,
        vec![WorkflowFeedback::SectionPlaced {
            key: "55500011".to_owned()
        }]
    );

    bus.publish(ScanEvent::new("012345678905", "EAN13"));
    capture.pump(&frame_with_hit(Vec3::new(0.6, 1.5, 0.0)));
    bus.publish(ScanEvent::new("036000291452", "EAN13"));
    capture.pump(&frame_with_hit(Vec3::new(-0.4, 1.2, 0.0)));

    assert_eq!(capture.session().pending_items().len(), 2);
    capture.save().unwrap();

    // Save persisted both items and reset the session.
    assert_eq!(capture.repository().store().len(), 2);
    assert!(capture.session().pending_items().is_empty());
    assert!(capture.session().graph().is_empty());

    // Restore run in a "new physical session": fresh store, same export
    // dir, section anchor found somewhere else in the world.
    drop(capture);
    let mut restore = Workflow::new(
        WorkflowMode::Restore,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );

    let restore_anchor = Vec3::new(4.0, 1.1, -2.0);
    bus.publish(ScanEvent::new("55500011", "EAN8"));
    let feedback = restore.pump(&frame_with_hit(restore_anchor));

    assert!(feedback.contains(&WorkflowFeedback::SectionPlaced {
        key: "55500011".to_owned()
    }));
    assert!(feedback.contains(&WorkflowFeedback::Replayed { count: 2 }));

    // Every replayed child sits at anchor + stored offset.
    let session = restore.session();
    let anchor = session.section_node().unwrap();
    let anchor_world = session.graph().world_position(anchor).unwrap();
    let mut replayed = 0;
    for (id, node) in session.graph().iter() {
        if id == anchor {
            continue;
        }
        let world = session.graph().world_position(id).unwrap();
        let offset = world - anchor_world;
        assert!(offset.z.abs() < 1e-5);
        let label = node.banner.as_ref().map(|b| b.text.as_str());
        assert!(label == Some("012345678905") || label == Some("036000291452"));
        replayed += 1;
    }
    assert_eq!(replayed, 2);
}

#[test]
fn placement_failure_is_reported_not_fatal() {
    let dir = temp_dir("failure");
    let bus = ScanBus::new();
    let mut workflow = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );

    let empty_frame = FakeFrame::with_camera(shelf_camera());
    bus.publish(ScanEvent::new("55500011", "EAN8"));
    let feedback = workflow.pump(&empty_frame);
    assert_eq!(
        feedback,
        vec![WorkflowFeedback::PlacementFailed {
            code: "55500011".to_owned()
        }]
    );

    // The very next scan with a valid hit succeeds.
    bus.publish(ScanEvent::new("55500011", "EAN8"));
    let feedback = workflow.pump(&frame_with_hit(Vec3::ZERO));
    assert_eq!(
        feedback,
        vec![WorkflowFeedback::SectionPlaced {
            key: "55500011".to_owned()
        }]
    );
}

#[test]
fn dropping_a_workflow_revokes_its_subscription() {
    let dir = temp_dir("teardown");
    let bus = ScanBus::new();
    let workflow = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );
    assert_eq!(bus.subscriber_count(), 1);
    drop(workflow);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn tracking_loss_feedback_follows_scripted_states() {
    let dir = temp_dir("tracking_loss");
    let bus = ScanBus::new();
    let mut workflow = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );

    let frame = frame_with_hit(Vec3::new(0.0, 1.5, 0.0));
    let mut script = ScriptedTracking::new(vec![
        TrackingState::Tracking,
        TrackingState::Tracking,
        TrackingState::Paused(None),
        TrackingState::Tracking,
    ]);

    let mut feedback = Vec::new();
    for _ in 0..4 {
        feedback.push(workflow.tick(script.next_state(), &frame));
    }

    assert_eq!(
        feedback,
        vec![
            Some(SurfaceFeedback::SurfaceFound),
            None,
            Some(SurfaceFeedback::TrackingLost(TrackingState::Paused(None))),
            Some(SurfaceFeedback::SurfaceFound),
        ]
    );
}

#[test]
fn failed_save_keeps_pending_items_for_retry() {
    let dir = temp_dir("failed_save");
    let bus = ScanBus::new();
    let mut workflow = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );

    bus.publish(ScanEvent::new("55500011", "EAN8"));
    workflow.pump(&frame_with_hit(Vec3::new(0.0, 1.5, 0.0)));
    bus.publish(ScanEvent::new("012345678905", "EAN13"));
    workflow.pump(&frame_with_hit(Vec3::new(0.6, 1.5, 0.0)));
    assert_eq!(workflow.session().pending_items().len(), 1);

    // Yank the export directory out from under the repository so the
    // planogram write fails.
    std::fs::remove_dir_all(&dir).unwrap();
    assert!(workflow.save().is_err());

    // The session survives the failed write: pending list and scene intact.
    assert_eq!(workflow.session().pending_items().len(), 1);
    assert!(workflow.session().section_node().is_some());

    // Once the directory is back, the retry goes through and resets.
    std::fs::create_dir_all(&dir).unwrap();
    workflow.save().unwrap();
    assert!(workflow.session().pending_items().is_empty());
    assert_eq!(workflow.repository().read_planogram().len(), 1);
}

#[test]
fn save_with_no_items_still_writes_a_record() {
    let dir = temp_dir("empty_save");
    let bus = ScanBus::new();
    let mut workflow = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(ItemDefaults::default()),
        repository(&dir),
        &bus,
    );
    workflow.save().unwrap();
    assert!(workflow.repository().read_planogram().is_empty());
    assert!(workflow.repository().store().is_empty());
}
