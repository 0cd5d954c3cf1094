use super::*;
use pw_types::{Module, NodeId, Pid};
use pw_scheduler::CommandContent;

#[tokio::test]
async fn send_delivers_through_the_channel() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut transport = ChannelTransport::new(tx);

    transport.send(CommandPacket::new(
        Pid::new("p1"),
        Module::Scheduler,
        NodeId::new("n1"),
        NodeId::new("n2"),
        CommandContent::HeartbeatVm,
    ));

    let received = rx.recv().await.unwrap();
    assert_eq!(received.dst_nid, NodeId::new("n2"));
}

#[tokio::test]
async fn send_after_receiver_drop_does_not_panic() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut transport = ChannelTransport::new(tx);
    transport.send(CommandPacket::new(
        Pid::new("p1"),
        Module::Scheduler,
        NodeId::new("n1"),
        NodeId::new("n2"),
        CommandContent::HeartbeatVm,
    ));
}
