//! Node configuration, loaded from a TOML file. Grounded on the ambient
//! `serde` + `toml` stack the distilled spec omits but a real node process
//! needs the same way any configured service does.
#[cfg(test)]
mod config_test;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pw_types::NodeId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeerConfig {
    pub nid: String,
    pub addr: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    pub nid: String,
    #[serde(default)]
    pub listen: Option<String>,
    #[serde(default)]
    pub peers: Vec<PeerConfig>,
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config at {}", path.display()))?;
        Ok(config)
    }

    #[must_use]
    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.nid.clone())
    }
}
