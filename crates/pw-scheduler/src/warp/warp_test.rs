use super::*;

#[test]
fn starts_idle() {
    let tracker = WarpTracker::new();
    assert_eq!(tracker.state(Tid::new(1)), WarpState::Idle);
}

#[test]
fn moves_through_the_protocol() {
    let mut tracker = WarpTracker::new();
    let tid = Tid::new(1);
    let dst = NodeId::new("n2");

    tracker.begin(tid);
    assert_eq!(tracker.state(tid), WarpState::Serializing);

    tracker.sent(tid, dst.clone());
    assert_eq!(tracker.state(tid), WarpState::AwaitingAck { dst_nid: dst.clone() });
    assert!(!tracker.timed_out(tid));

    tracker.acknowledged(tid, dst.clone());
    assert_eq!(tracker.state(tid), WarpState::Done { dst_nid: dst });
}

#[test]
fn clear_returns_to_idle() {
    let mut tracker = WarpTracker::new();
    let tid = Tid::new(1);
    tracker.begin(tid);
    tracker.clear(tid);
    assert_eq!(tracker.state(tid), WarpState::Idle);
}

#[test]
fn page_manifest_collects_pushed_pages() {
    let mut manifest = PageManifest::new();
    manifest.push(Vaddr::new(0x1000), vec![1, 2, 3]);
    assert_eq!(manifest.pages.len(), 1);
    assert_eq!(manifest.pages[0].bytes, vec![1, 2, 3]);
}
