use super::*;
use crate::broadcast::{LocalEvent, StateBroadcast};
use crate::document::{SimulatedContainer, SimulatedDocument};
use autoscroll_protocols::{PageEvent, PageNotice};
use tokio::sync::{broadcast, mpsc};

struct Harness {
    controller: ScrollController,
    container: Arc<SimulatedContainer>,
    notices: mpsc::UnboundedReceiver<PageNotice>,
    events: broadcast::Receiver<LocalEvent>,
}

fn harness_with(scroll: ScrollConfig, visible: f64, total: f64) -> Harness {
    let container = SimulatedContainer::new(visible, total);
    let document = SimulatedDocument::new(container.clone());
    let (tx, notices) = mpsc::unbounded_channel();
    let local = StateBroadcast::new();
    let events = local.subscribe();
    let publisher = StatePublisher::new(PageId::new(1), tx, local);
    Harness {
        controller: ScrollController::new(scroll, document, publisher),
        container,
        notices,
        events,
    }
}

fn harness(visible: f64, total: f64) -> Harness {
    harness_with(ScrollConfig::default(), visible, total)
}

fn drain_states(notices: &mut mpsc::UnboundedReceiver<PageNotice>) -> Vec<ScrollState> {
    let mut states = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        if let PageEvent::StateUpdate { payload } = notice.event {
            states.push(payload);
        }
    }
    states
}

fn bottom_notices(notices: &mut mpsc::UnboundedReceiver<PageNotice>) -> Vec<bool> {
    let mut hits = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        if let PageEvent::ReachedBottom { suspected_infinite } = notice.event {
            hits.push(suspected_infinite);
        }
    }
    hits
}

#[test]
fn test_new_controller_is_idle() {
    let h = harness(500.0, 10_000.0);
    assert_eq!(h.controller.phase(), ScrollPhase::Idle);
    assert_eq!(h.controller.state(), ScrollState::idle(600.0));
    assert!(!h.controller.is_frame_armed());
    assert_eq!(h.controller.page(), PageId::new(1));
}

#[test]
fn test_default_speed_is_clamped() {
    let scroll = ScrollConfig {
        default_speed: 9000.0,
        ..ScrollConfig::default()
    };
    let h = harness_with(scroll, 500.0, 10_000.0);
    assert_eq!(h.controller.state().speed, 4000.0);
}

#[test]
fn test_set_speed_clamps() {
    let mut h = harness(500.0, 10_000.0);
    for (input, expected) in [
        (0.0, 50.0),
        (49.0, 50.0),
        (50.0, 50.0),
        (1234.5, 1234.5),
        (4000.0, 4000.0),
        (4001.0, 4000.0),
        (-300.0, 50.0),
    ] {
        h.controller.set_speed(input);
        assert_eq!(h.controller.state().speed, expected, "input {}", input);
    }
}

#[test]
fn test_adjust_speed() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.adjust_speed(50.0);
    assert_eq!(h.controller.state().speed, 650.0);
    h.controller.adjust_speed(-10_000.0);
    assert_eq!(h.controller.state().speed, 50.0);
}

#[test]
fn test_set_speed_publishes_in_any_state() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.set_speed(800.0);
    let states = drain_states(&mut h.notices);
    assert_eq!(states, vec![ScrollState::idle(800.0)]);
}

#[test]
fn test_start_publishes_and_arms() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.start();

    assert_eq!(h.controller.phase(), ScrollPhase::Scrolling);
    assert!(h.controller.is_frame_armed());
    let states = drain_states(&mut h.notices);
    assert_eq!(states.len(), 1);
    assert!(states[0].is_scrolling);
    assert!(!states[0].is_paused);
    assert_eq!(
        h.events.try_recv().unwrap(),
        LocalEvent::State(h.controller.state())
    );
}

#[test]
fn test_toggle_start_stop_is_its_own_inverse() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.toggle_start_stop();
    assert!(h.controller.state().is_scrolling);
    h.controller.toggle_start_stop();
    assert!(!h.controller.state().is_scrolling);
    assert_eq!(h.controller.phase(), ScrollPhase::Idle);
}

#[test]
fn test_toggle_pause_resume_when_idle_is_noop() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.toggle_pause_resume();
    assert_eq!(h.controller.phase(), ScrollPhase::Idle);
    assert!(drain_states(&mut h.notices).is_empty());
}

#[test]
fn test_pause_and_resume_transitions() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.pause();
    assert_eq!(h.controller.phase(), ScrollPhase::Idle);

    h.controller.start();
    h.controller.toggle_pause_resume();
    assert_eq!(h.controller.phase(), ScrollPhase::Paused);
    let state = h.controller.state();
    assert!(state.is_scrolling && state.is_paused);

    h.controller.pause();
    assert_eq!(h.controller.phase(), ScrollPhase::Paused);

    h.controller.toggle_pause_resume();
    assert_eq!(h.controller.phase(), ScrollPhase::Scrolling);

    h.controller.resume();
    assert_eq!(h.controller.phase(), ScrollPhase::Scrolling);
}

#[test]
fn test_stop_from_paused() {
    let mut h = harness(500.0, 10_000.0);
    h.controller.start();
    h.controller.pause();
    h.controller.stop();
    assert_eq!(h.controller.state(), ScrollState::idle(600.0));
    assert_eq!(h.controller.session().last_tick_timestamp(), None);
}

#[test]
fn test_paused_implies_scrolling_across_commands() {
    let mut h = harness(500.0, 10_000.0);
    let commands = [
        Command::TogglePauseResume,
        Command::Start,
        Command::Pause,
        Command::SetSpeed { speed: 100.0 },
        Command::Stop,
        Command::Resume,
        Command::ToggleStartStop,
        Command::TogglePauseResume,
        Command::AdjustSpeed { delta: 25.0 },
        Command::ToggleStartStop,
        Command::Pause,
        Command::ScrollToTop,
    ];
    for command in commands {
        h.controller.apply(command);
        assert!(h.controller.state().is_consistent(), "after {:?}", command);
    }
    for state in drain_states(&mut h.notices) {
        assert!(state.is_consistent());
    }
}

#[test]
fn test_one_frame_advances_speed_times_dt() {
    let mut h = harness(500.0, 100_000.0);
    h.controller.start();

    let first = h.controller.tick(1000.0).unwrap();
    assert_eq!(first.advanced, 0.0);

    let second = h.controller.tick(1500.0).unwrap();
    assert_eq!(second.advanced, 300.0);
    assert_eq!(h.container.geometry().offset, 300.0);
}

#[test]
fn test_upward_direction() {
    let scroll = ScrollConfig {
        direction: ScrollDirection::Up,
        ..ScrollConfig::default()
    };
    let mut h = harness_with(scroll, 500.0, 100_000.0);
    h.container.set_scroll_offset(1000.0);
    h.controller.start();
    h.controller.tick(0.0);
    h.controller.tick(500.0);
    assert_eq!(h.container.geometry().offset, 700.0);
}

#[test]
fn test_tick_rearms_only_while_scrolling() {
    let mut h = harness(500.0, 100_000.0);
    assert!(h.controller.tick(0.0).is_none());
    assert!(!h.controller.is_frame_armed());

    h.controller.start();
    assert!(h.controller.tick(0.0).is_some());
    assert!(h.controller.is_frame_armed());

    h.controller.pause();
    assert!(h.controller.tick(16.0).is_none());
    assert!(!h.controller.is_frame_armed());

    h.controller.resume();
    assert!(h.controller.is_frame_armed());
    h.controller.stop();
    assert!(h.controller.tick(32.0).is_none());
    assert!(!h.controller.is_frame_armed());
}

#[test]
fn test_stop_does_not_move_container() {
    let mut h = harness(500.0, 100_000.0);
    h.controller.start();
    h.controller.tick(0.0);
    h.controller.tick(100.0);
    let offset = h.container.geometry().offset;
    h.controller.stop();
    assert!(h.controller.tick(1000.0).is_none());
    assert_eq!(h.container.geometry().offset, offset);
}

#[test]
fn test_resume_after_gap_does_not_jump() {
    let mut h = harness(500.0, 100_000.0);
    h.controller.start();
    h.controller.tick(0.0);
    h.controller.tick(16.0);
    h.controller.pause();
    let offset = h.container.geometry().offset;

    h.controller.resume();
    let report = h.controller.tick(2016.0).unwrap();
    assert_eq!(report.advanced, 0.0);
    assert_eq!(h.container.geometry().offset, offset);

    let report = h.controller.tick(2116.0).unwrap();
    assert!((report.advanced - 60.0).abs() < 1e-9);
}

#[test]
fn test_start_while_scrolling_is_idempotent() {
    let mut h = harness(500.0, 1000.0);
    h.controller.start();
    h.container.set_scroll_offset(500.0);
    h.controller.tick(0.0);
    h.controller.tick(16.0);
    let hits = h.controller.session().bottom_hit_count();
    let container = h.controller.session().container().cloned().unwrap();
    drain_states(&mut h.notices);

    h.controller.start();
    assert_eq!(h.controller.session().bottom_hit_count(), hits);
    assert!(Arc::ptr_eq(
        h.controller.session().container().unwrap(),
        &container
    ));
    assert!(drain_states(&mut h.notices).is_empty());

    h.controller.pause();
    h.controller.start();
    assert_eq!(h.controller.phase(), ScrollPhase::Paused);
    assert_eq!(h.controller.session().bottom_hit_count(), hits);
}

#[test]
fn test_bottom_notification_every_qualifying_frame() {
    let mut h = harness(500.0, 1000.0);
    h.controller.start();
    h.container.set_scroll_offset(500.0);

    for ts in [0.0, 16.0, 32.0] {
        let report = h.controller.tick(ts).unwrap();
        assert!(report.at_bottom);
    }
    assert_eq!(bottom_notices(&mut h.notices), vec![false, false, false]);
}

#[test]
fn test_infinite_scroll_detection_scenario() {
    let mut h = harness(500.0, 1000.0);
    h.controller.start();
    h.container.set_scroll_offset(500.0);

    for ts in [0.0, 16.0, 32.0] {
        let report = h.controller.tick(ts).unwrap();
        assert!(report.at_bottom);
        assert!(!report.suspected_infinite);
    }
    assert_eq!(h.controller.session().bottom_hit_count(), 3);

    h.container.set_total_extent(1050.0);
    let report = h.controller.tick(132.0).unwrap();
    assert!(report.at_bottom);
    assert!(report.suspected_infinite);
    assert_eq!(h.controller.session().bottom_hit_count(), 4);

    for ts in [148.0, 164.0, 180.0] {
        let report = h.controller.tick(ts).unwrap();
        assert!(report.suspected_infinite);
    }

    // The 4th frame's notice was sent before detection ran on it.
    let hits = bottom_notices(&mut h.notices);
    assert_eq!(hits, vec![false, false, false, false, true, true, true]);
}

#[test]
fn test_restart_resets_infinite_flag() {
    let mut h = harness(500.0, 1000.0);
    h.controller.start();
    h.container.set_scroll_offset(500.0);
    h.controller.tick(0.0);
    h.container.set_total_extent(1100.0);
    h.controller.tick(200.0);
    assert!(h.controller.session().suspected_infinite());

    h.controller.stop();
    h.controller.start();
    assert!(!h.controller.session().suspected_infinite());
    assert_eq!(h.controller.session().bottom_hit_count(), 0);
}

#[test]
fn test_missing_container_scrolls_without_effect() {
    let (tx, mut notices) = mpsc::unbounded_channel();
    let publisher = StatePublisher::new(PageId::new(9), tx, StateBroadcast::new());
    let mut controller = ScrollController::new(
        ScrollConfig::default(),
        SimulatedDocument::without_scrolling_element(),
        publisher,
    );

    controller.start();
    assert!(controller.state().is_scrolling);
    let report = controller.tick(0.0).unwrap();
    assert_eq!(report.advanced, 0.0);
    let report = controller.tick(1000.0).unwrap();
    assert_eq!(report.advanced, 0.0);
    assert!(!report.at_bottom);
    assert!(controller.is_frame_armed());
    assert!(bottom_notices(&mut notices).is_empty());

    controller.scroll_to_top();
    assert!(!controller.state().is_scrolling);
}

#[test]
fn test_scroll_to_top() {
    let mut h = harness(500.0, 10_000.0);
    h.container.set_scroll_offset(4000.0);
    h.controller.apply(Command::ScrollToTop);
    assert_eq!(h.container.geometry().offset, 0.0);

    h.controller.start();
    h.controller.tick(0.0);
    h.controller.tick(1000.0);
    h.controller.apply(Command::ScrollToTop);
    assert_eq!(h.controller.phase(), ScrollPhase::Idle);
    assert_eq!(h.container.geometry().offset, 0.0);
}

#[test]
fn test_bottom_reaches_local_observers() {
    let mut h = harness(500.0, 1000.0);
    h.controller.start();
    h.container.set_scroll_offset(500.0);
    h.controller.tick(0.0);

    let mut saw_bottom = false;
    while let Ok(event) = h.events.try_recv() {
        if let LocalEvent::ReachedBottom { suspected_infinite } = event {
            assert!(!suspected_infinite);
            saw_bottom = true;
        }
    }
    assert!(saw_bottom);
}
