use super::*;

#[test]
fn new_seeds_the_root_thread_owner() {
    let info = ProcessInfo::new(Pid::new("p1"), "proc", Tid::new(1), NodeId::new("n1"));
    assert_eq!(info.root_nid(), Some(&NodeId::new("n1")));
}

#[test]
fn root_nid_is_none_once_the_entry_is_removed() {
    let mut info = ProcessInfo::new(Pid::new("p1"), "proc", Tid::new(1), NodeId::new("n1"));
    info.threads.remove(&Tid::new(1));
    assert_eq!(info.root_nid(), None);
}
