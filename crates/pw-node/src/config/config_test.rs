use super::*;

#[test]
fn loads_minimal_config() {
    let dir = std::env::temp_dir().join(format!("pw-node-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("node.toml");
    std::fs::write(&path, "nid = \"n1\"\n").unwrap();

    let config = NodeConfig::load(&path).unwrap();
    assert_eq!(config.node_id(), NodeId::new("n1"));
    assert!(config.peers.is_empty());

    std::fs::remove_file(&path).ok();
}

#[test]
fn loads_peers() {
    let dir = std::env::temp_dir().join(format!("pw-node-test-peers-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("node.toml");
    std::fs::write(
        &path,
        "nid = \"n1\"\nlisten = \"127.0.0.1:9000\"\n\n[[peers]]\nnid = \"n2\"\naddr = \"127.0.0.1:9001\"\n",
    )
    .unwrap();

    let config = NodeConfig::load(&path).unwrap();
    assert_eq!(config.listen.as_deref(), Some("127.0.0.1:9000"));
    assert_eq!(config.peers.len(), 1);
    assert_eq!(config.peers[0].nid, "n2");

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_errors() {
    let path = std::path::Path::new("/nonexistent/pw-node-config.toml");
    assert!(NodeConfig::load(path).is_err());
}
