use super::*;
use crate::command::CommandContent;

fn pid() -> Pid {
    Pid::new("p1")
}

#[test]
fn activate_registers_root_thread_owner() {
    let mut sched = Scheduler::new(NodeId::new("n1"));
    let proc_addr = Vaddr::new(0x2000);
    let packet = CommandPacket::new(
        pid(),
        Module::Scheduler,
        NodeId::new("n2"),
        NodeId::new("n1"),
        CommandContent::Activate { proc_addr },
    );
    sched.recv_command(&packet);

    let root_tid = Tid::new(proc_addr.as_u64());
    assert_eq!(
        sched.get_dst_nid(&pid(), Module::Vm, RouteTarget::Thread(root_tid)),
        NodeId::new("n2")
    );
}

#[test]
fn unknown_thread_routes_to_broadcast() {
    let sched = Scheduler::new(NodeId::new("n1"));
    assert_eq!(
        sched.get_dst_nid(&pid(), Module::Vm, RouteTarget::Thread(Tid::new(1))),
        NodeId::broadcast()
    );
}

#[test]
fn warp_ack_moves_thread_ownership() {
    let mut sched = Scheduler::new(NodeId::new("n1"));
    sched.register_process(ProcessInfo::new(pid(), "proc", Tid::new(1), NodeId::new("n1")));

    let ack = CommandPacket::new(
        pid(),
        Module::Scheduler,
        NodeId::new("n2"),
        NodeId::new("n1"),
        CommandContent::WarpThreadAck { tid: Tid::new(1) },
    );
    sched.recv_command(&ack);

    assert_eq!(
        sched.get_dst_nid(&pid(), Module::Vm, RouteTarget::Thread(Tid::new(1))),
        NodeId::new("n2")
    );
}

#[test]
fn stale_heartbeat_demotes_owner_to_broadcast() {
    let mut sched = Scheduler::new(NodeId::new("n1"));
    sched.register_process(ProcessInfo::new(pid(), "proc", Tid::new(1), NodeId::new("n2")));
    // n2 has never heartbeated from n1's perspective, so it is not live.
    assert_eq!(
        sched.get_dst_nid(&pid(), Module::Vm, RouteTarget::Thread(Tid::new(1))),
        NodeId::broadcast()
    );
}

#[test]
fn require_processes_info_summarizes_known_processes() {
    let mut sched = Scheduler::new(NodeId::new("n1"));
    sched.register_process(ProcessInfo::new(pid(), "proc", Tid::new(1), NodeId::new("n1")));
    let packet = CommandPacket::new(
        pid(),
        Module::Scheduler,
        NodeId::new("n2"),
        NodeId::new("n1"),
        CommandContent::RequireProcessesInfo,
    );
    let reply = sched.recv_command(&packet).unwrap();
    match reply {
        CommandContent::ProcessesInfo { processes } => {
            assert_eq!(processes.len(), 1);
            assert_eq!(processes[0].pid, pid());
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[test]
fn scheduler_module_routes_locally() {
    let sched = Scheduler::new(NodeId::new("n1"));
    assert_eq!(
        sched.get_dst_nid(&pid(), Module::Scheduler, RouteTarget::None),
        NodeId::new("n1")
    );
}
