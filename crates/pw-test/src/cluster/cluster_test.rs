use super::*;
use pw_types::{Opcode, Pid, encode};

#[test]
fn resolve_fault_fetches_page_from_known_owner() {
    let mut cluster = TestCluster::new([NodeId::new("n1"), NodeId::new("n2")]);
    let addr = cluster.allocate(0, 8);
    cluster.vmem(0).write(addr, 7i64).unwrap();

    assert!(!cluster.vmem(1).resident(addr));
    cluster.resolve_fault(1, addr);
    assert!(cluster.vmem(1).resident(addr));
    assert_eq!(cluster.vmem(1).read::<i64>(addr).unwrap(), 7);
}

#[test]
fn run_to_finish_resolves_cross_node_reads() {
    let mut cluster = TestCluster::new([NodeId::new("n1"), NodeId::new("n2")]);

    let entry = Vaddr::new(0x1000);
    let lhs = cluster.allocate(0, 8);
    cluster.vmem(0).write(lhs, 2i64).unwrap();
    let rhs = cluster.allocate(1, 8);
    cluster.vmem(1).write(rhs, 3i64).unwrap();

    let mut types = TypeRegistry::new();
    types.define_function(
        entry,
        pw_vm::Function::Normal {
            code: vec![encode(Opcode::Add, 0, 0), encode(Opcode::Return, 0, 0)],
        },
    );

    let pid = Pid::new("p1");
    let mut process = Process::new(pid, entry, entry, NodeId::new("n1"));
    let tid = process.root_tid;
    {
        let frame = process.thread_mut(tid).unwrap().current_frame_mut().unwrap();
        frame.output_slot = Some(lhs);
        frame.value_slot = Some(rhs);
    }

    let interpreter = Interpreter::new(4);
    let builtins = BuiltinTable::new();
    let code = cluster.run_to_finish(0, &mut process, tid, &interpreter, &types, &builtins);
    assert_eq!(code, 5);
}
