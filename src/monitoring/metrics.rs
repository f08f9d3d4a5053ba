// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use prometheus::{IntCounter, IntGauge, Registry};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Lookups started.
    pub lookups_started_total: IntCounter,
    /// Lookups that completed with a result.
    pub lookups_completed_total: IntCounter,
    /// Lookups that failed (not found, empty table, cancelled).
    pub lookups_failed_total: IntCounter,

    /// Individual find RPCs issued by lookups.
    pub lookup_rpcs_total: IntCounter,
    /// Find RPCs that errored or timed out.
    pub lookup_rpc_errors_total: IntCounter,
    /// Peers blacklisted for protocol violations.
    pub peers_blacklisted_total: IntCounter,

    /// RPCs currently in flight across running lookups.
    pub lookup_pending: IntGauge,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let lookups_started_total =
            IntCounter::new("kadmos_lookups_started_total", "Lookups started")
                .map_err(|_| MetricsError::Prom)?;
        let lookups_completed_total = IntCounter::new(
            "kadmos_lookups_completed_total",
            "Lookups completed with a result",
        )
        .map_err(|_| MetricsError::Prom)?;
        let lookups_failed_total =
            IntCounter::new("kadmos_lookups_failed_total", "Lookups failed")
                .map_err(|_| MetricsError::Prom)?;

        let lookup_rpcs_total =
            IntCounter::new("kadmos_lookup_rpcs_total", "Find RPCs issued")
                .map_err(|_| MetricsError::Prom)?;
        let lookup_rpc_errors_total = IntCounter::new(
            "kadmos_lookup_rpc_errors_total",
            "Find RPCs that errored or timed out",
        )
        .map_err(|_| MetricsError::Prom)?;
        let peers_blacklisted_total = IntCounter::new(
            "kadmos_peers_blacklisted_total",
            "Peers blacklisted for protocol violations",
        )
        .map_err(|_| MetricsError::Prom)?;

        let lookup_pending =
            IntGauge::new("kadmos_lookup_pending", "Find RPCs currently in flight")
                .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(lookups_started_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(lookups_completed_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(lookups_failed_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(lookup_rpcs_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(lookup_rpc_errors_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(peers_blacklisted_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(lookup_pending.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            lookups_started_total,
            lookups_completed_total,
            lookups_failed_total,
            lookup_rpcs_total,
            lookup_rpc_errors_total,
            peers_blacklisted_total,
            lookup_pending,
        })
    }
}
