use super::*;
use crate::document::SimulatedContainer;

fn session_on(container: &Arc<SimulatedContainer>) -> EngineSession {
    let mut session = EngineSession::new(4.0, 10.0);
    session.begin(Some(container.clone() as Arc<dyn ScrollContainer>));
    session
}

#[test]
fn test_bottom_predicate_boundary() {
    let container = SimulatedContainer::new(500.0, 1000.0);

    container.set_scroll_offset(496.0);
    assert!(is_at_bottom(container.as_ref(), 4.0));

    container.set_scroll_offset(495.0);
    assert!(!is_at_bottom(container.as_ref(), 4.0));
}

#[test]
fn test_first_frame_has_zero_elapsed() {
    let mut session = EngineSession::new(4.0, 10.0);
    assert_eq!(session.elapsed_secs(5000.0), 0.0);
    assert_eq!(session.last_tick_timestamp(), Some(5000.0));
    assert_eq!(session.elapsed_secs(5500.0), 0.5);
}

#[test]
fn test_elapsed_never_negative() {
    let mut session = EngineSession::new(4.0, 10.0);
    session.elapsed_secs(2000.0);
    assert_eq!(session.elapsed_secs(1500.0), 0.0);
    assert_eq!(session.last_tick_timestamp(), Some(1500.0));
}

#[test]
fn test_reset_timestamp() {
    let mut session = EngineSession::new(4.0, 10.0);
    session.elapsed_secs(1000.0);
    session.reset_timestamp();
    assert_eq!(session.elapsed_secs(9000.0), 0.0);
}

#[test]
fn test_advance_without_container_is_noop() {
    let session = EngineSession::new(4.0, 10.0);
    assert_eq!(session.advance(300.0), 0.0);
    assert!(!session.is_at_bottom());
}

#[test]
fn test_advance_reports_clamped_movement() {
    let container = SimulatedContainer::new(500.0, 1000.0);
    let session = session_on(&container);

    assert_eq!(session.advance(300.0), 300.0);
    assert_eq!(session.advance(300.0), 200.0);
    assert!(session.is_at_bottom());
}

#[test]
fn test_detection_ignores_frames_above_bottom() {
    let container = SimulatedContainer::new(500.0, 1000.0);
    let mut session = session_on(&container);

    assert!(!session.detect_infinite_scroll());
    assert_eq!(session.bottom_hit_count(), 0);
    assert_eq!(session.last_scrollable_extent(), None);
}

#[test]
fn test_growth_within_margin_is_noise() {
    let container = SimulatedContainer::new(500.0, 1000.0);
    let mut session = session_on(&container);
    container.set_scroll_offset(500.0);

    session.detect_infinite_scroll();
    container.append_content(10.0);
    container.set_scroll_offset(510.0);
    assert!(!session.detect_infinite_scroll());
    assert_eq!(session.bottom_hit_count(), 2);
    assert_eq!(session.last_scrollable_extent(), Some(1010.0));
}

#[test]
fn test_growth_beyond_margin_is_sticky() {
    let container = SimulatedContainer::new(500.0, 1000.0);
    let mut session = session_on(&container);
    container.set_scroll_offset(500.0);

    session.detect_infinite_scroll();
    container.append_content(50.0);
    container.set_scroll_offset(550.0);
    assert!(session.detect_infinite_scroll());

    session.detect_infinite_scroll();
    assert!(session.suspected_infinite());
}

#[test]
fn test_begin_resets_detection() {
    let container = SimulatedContainer::new(500.0, 1000.0);
    let mut session = session_on(&container);
    container.set_scroll_offset(500.0);
    session.detect_infinite_scroll();
    container.append_content(100.0);
    container.set_scroll_offset(600.0);
    session.detect_infinite_scroll();
    session.elapsed_secs(100.0);
    assert!(session.suspected_infinite());

    session.begin(Some(container.clone() as Arc<dyn ScrollContainer>));
    assert!(!session.suspected_infinite());
    assert_eq!(session.bottom_hit_count(), 0);
    assert_eq!(session.last_scrollable_extent(), None);
    assert_eq!(session.last_tick_timestamp(), None);
    assert_eq!(session.threshold(), 4.0);
}
