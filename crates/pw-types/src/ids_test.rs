use super::*;

#[test]
fn node_id_broadcast() {
    let b = NodeId::broadcast();
    assert!(b.is_broadcast());
    assert_eq!(format!("{b}"), "<broadcast>");

    let n = NodeId::new("node-a");
    assert!(!n.is_broadcast());
    assert_eq!(n.as_str(), "node-a");
}

#[test]
fn pid_display() {
    let p = Pid::new("proc-1");
    assert_eq!(format!("{p}"), "proc-1");
}

#[test]
fn tid_all_thread_sentinel() {
    assert!(Tid::ALL_THREAD.is_all());
    assert_eq!(Tid::ALL_THREAD.as_u64(), 0);
    assert!(!Tid::new(42).is_all());
}
