// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub aggregator: AggregatorConfig,

    #[serde(default)]
    pub probe: ProbeConfig,
}

/// How individual client statuses are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// `true`: every client must agree. `false`: one agreeing client is enough.
    #[serde(default = "default_check_status_for_all", alias = "checkStatusForAll")]
    pub check_status_for_all: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            check_status_for_all: default_check_status_for_all(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_probe_port")]
    pub port: u16,

    #[serde(default = "default_health_path", alias = "healthPath")]
    pub health_path: String,

    #[serde(default = "default_ready_path", alias = "readyPath")]
    pub ready_path: String,

    #[serde(default = "default_status_path", alias = "statusPath")]
    pub status_path: String,
}

impl ProbeConfig {
    pub fn addr(&self) -> SocketAddr {
        ([0, 0, 0, 0], self.port).into()
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_probe_port(),
            health_path: default_health_path(),
            ready_path: default_ready_path(),
            status_path: default_status_path(),
        }
    }
}

fn default_check_status_for_all() -> bool {
    true
}

fn default_probe_port() -> u16 {
    3000
}

fn default_health_path() -> String {
    "/-/healthz".to_string()
}

fn default_ready_path() -> String {
    "/-/ready".to_string()
}

fn default_status_path() -> String {
    "/-/status".to_string()
}
