use super::*;

#[test]
fn require_roundtrips_through_json() {
    let packet = CommandPacket::new(
        Pid::new("p1"),
        Module::Memory,
        NodeId::new("n1"),
        NodeId::new("n2"),
        CommandContent::Require { addr: Vaddr::new(0x1000), writable: true },
    );
    let json = serde_json::to_string(&packet).unwrap();
    let back: CommandPacket = serde_json::from_str(&json).unwrap();
    assert_eq!(back.pid, packet.pid);
    assert_eq!(back.module, packet.module);
    match back.content {
        CommandContent::Require { addr, writable } => {
            assert_eq!(addr, Vaddr::new(0x1000));
            assert!(writable);
        }
        other => panic!("unexpected content: {other:?}"),
    }
}

#[test]
fn command_tag_matches_snake_case() {
    let packet = CommandPacket::new(
        Pid::new("p1"),
        Module::Scheduler,
        NodeId::new("n1"),
        NodeId::new("n2"),
        CommandContent::HeartbeatVm,
    );
    let json = serde_json::to_string(&packet).unwrap();
    assert!(json.contains("\"command\":\"heartbeat_vm\""));
}
