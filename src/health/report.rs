// src/health/report.rs
use super::policy::AggregationPolicy;
use crate::status::{ClientRole, ClientStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of every tracked client, as served on the status probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub ready: bool,
    pub policy: AggregationPolicy,
    pub clients: Vec<ClientReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientReport {
    pub id: String,
    pub role: ClientRole,
    pub healthy: bool,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition: Option<DateTime<Utc>>,
}

impl From<&ClientStatus> for ClientReport {
    fn from(client: &ClientStatus) -> Self {
        let (status, last_transition) = client.snapshot();
        Self {
            id: client.client_id().to_string(),
            role: client.role(),
            healthy: status.healthy,
            ready: status.ready,
            last_transition,
        }
    }
}

impl HealthReport {
    /// Builds a report whose verdicts agree with the per-client rows it carries.
    pub fn collect(clients: &[ClientStatus], policy: AggregationPolicy) -> Self {
        let clients: Vec<ClientReport> = clients.iter().map(ClientReport::from).collect();

        Self {
            healthy: policy.evaluate(clients.iter().map(|c| c.healthy)),
            ready: policy.evaluate(clients.iter().map(|c| c.ready)),
            policy,
            clients,
        }
    }
}
