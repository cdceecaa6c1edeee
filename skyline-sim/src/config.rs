//! Simulator configuration

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use skyline_core::{ClickGesture, NodeConfig};

/// Whole simulation setup, loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Settings shared by every node
    pub node: NodeConfig,
    /// Number of receiver nodes
    pub receivers: usize,
    /// Simulation length in ticks
    pub ticks: u32,
    /// Simulated time per tick
    pub tick_ms: u32,
    /// Drop every Nth datagram on air (0 = lossless)
    pub loss_every: u32,
    /// Operator input over time
    pub script: Vec<ScriptStep>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            receivers: 2,
            ticks: 50,
            tick_ms: 20,
            loss_every: 0,
            script: Vec::new(),
        }
    }
}

/// Operator action taking effect at `at_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u32,
    #[serde(default)]
    pub level: Option<u16>,
    #[serde(default)]
    pub brightness: Option<u8>,
    #[serde(default)]
    pub click: Option<Gesture>,
}

/// Button gesture as written in the script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Single,
    Double,
    Long,
}

impl From<Gesture> for ClickGesture {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::Single => ClickGesture::Single,
            Gesture::Double => ClickGesture::Double,
            Gesture::Long => ClickGesture::Long,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        config.script.sort_by_key(|step| step.at_ms);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.node.validate() {
            bail!("invalid node settings: {:?}", e);
        }
        if self.receivers > skyline_core::ESP_NOW_PEER_MAX {
            bail!(
                "{} receivers requested, the peer list holds {}",
                self.receivers,
                skyline_core::ESP_NOW_PEER_MAX
            );
        }
        if self.tick_ms == 0 {
            bail!("tick_ms must be non-zero");
        }
        Ok(())
    }
}
