// src/health/policy.rs
use crate::config::AggregatorConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Every tracked client must agree.
    #[default]
    All,
    /// One agreeing client is enough.
    Any,
}

impl AggregationPolicy {
    /// Folds per-client flags into one answer. An empty set never agrees.
    pub fn evaluate<I>(&self, flags: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        let mut flags = flags.into_iter().peekable();
        if flags.peek().is_none() {
            return false;
        }

        match self {
            AggregationPolicy::All => flags.all(|flag| flag),
            AggregationPolicy::Any => flags.any(|flag| flag),
        }
    }
}

impl From<&AggregatorConfig> for AggregationPolicy {
    fn from(config: &AggregatorConfig) -> Self {
        if config.check_status_for_all {
            AggregationPolicy::All
        } else {
            AggregationPolicy::Any
        }
    }
}
