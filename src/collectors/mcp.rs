use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Collector;
use crate::cache::ttl::MCP_SERVERS;
use crate::error::{Result, StatuslineError};

/// MCP servers declared for the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServers {
    pub names: Vec<String>,
}

#[derive(Deserialize)]
struct McpFile {
    #[serde(rename = "mcpServers", default)]
    servers: BTreeMap<String, serde_json::Value>,
}

/// Reads `.mcp.json`; an absent or malformed file means "not configured".
pub struct McpCollector {
    path: PathBuf,
}

impl McpCollector {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Collector for McpCollector {
    type Output = McpServers;

    fn name(&self) -> &'static str {
        "mcp"
    }

    fn cache_key(&self) -> Option<&'static str> {
        Some(MCP_SERVERS)
    }

    fn collect(&self) -> Result<McpServers> {
        if !self.path.exists() {
            return Err(StatuslineError::NotConfigured(self.path.display().to_string()));
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let file: McpFile = serde_json::from_str(&contents)?;
        Ok(McpServers {
            names: file.servers.into_keys().collect(),
        })
    }

    fn sentinel(&self) -> McpServers {
        McpServers::default()
    }
}
