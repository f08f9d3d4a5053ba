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

//! The lookup driver.
//!
//! A lookup converges on the K nodes nearest a target id by issuing up to α
//! concurrent find requests over the transport seam, folding every reply
//! back into the shortlist. The driver owns the pending request set;
//! responses are handled in arrival order, and no more than α requests are
//! ever in flight. Cancellation (explicit, or the deadline) drops every
//! pending request and surfaces [`LookupError::Cancelled`].
//!
//! Lookup traffic feeds the routing table: responders are re-added (which
//! resets their failure count), transient failures are charged against the
//! contact's failure budget, and protocol violations blacklist the peer.

use crate::core::clock::Clock;
use crate::core::constants::{LOOKUP_TIMEOUT, RPC_TIMEOUT};
use crate::core::key::NetworkId;
use crate::core::lookup::state::LookupState;
use crate::core::routing::contact::Contact;
use crate::core::routing::table::RoutingTable;
use crate::monitoring::metrics::Metrics;
use crate::networking::rpc::{FindKind, FindResponse, RpcError, Transport, ValueMessage};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Lookup failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The routing table offered no seed contacts.
    #[error("routing table has no seed contacts")]
    RoutingTableEmpty,
    /// A FIND_VALUE lookup exhausted the shortlist without a value.
    #[error("no value found for key {0}")]
    ValueNotFound(NetworkId),
    /// The lookup was cancelled, explicitly or by its deadline.
    #[error("lookup cancelled")]
    Cancelled,
}

/// A successful lookup result.
#[derive(Clone, Debug)]
pub enum LookupOutcome {
    /// FIND_NODE: the closest contacted nodes, closest first.
    Nodes(Vec<Contact>),
    /// FIND_VALUE: the value stored under the target key.
    Value(ValueMessage),
}

/// Snapshot handed to the progress hook after every handled event.
#[derive(Clone, Debug)]
pub struct LookupProgress {
    /// Peers contacted so far.
    pub contacted: usize,
    /// Requests currently in flight.
    pub pending: usize,
    /// Current shortlist length.
    pub shortlist: usize,
    /// Closest peer seen so far.
    pub nearest: NetworkId,
}

/// Cancels a running lookup. Dropping the canceller without calling
/// [`cancel`](LookupCanceller::cancel) leaves the lookup running.
pub struct LookupCanceller {
    tx: oneshot::Sender<()>,
}

impl LookupCanceller {
    /// Cancel the lookup. Idempotence comes for free: the handle is consumed
    /// and a lookup that already finished ignores the signal.
    pub fn cancel(self) {
        let _ = self.tx.send(());
    }
}

/// What the driver does after an event has been folded into the state.
enum Advance {
    /// Issue more requests (up to α) and keep waiting.
    Pump,
    /// The nearest node did not improve: wait for in-flight requests, or
    /// terminate / force-contact the remainder once none are left.
    Hold,
    /// The lookup is complete.
    Done(LookupOutcome),
}

type PendingRpc = BoxFuture<'static, (u64, Contact, Result<FindResponse, RpcError>)>;

type ProgressFn = Box<dyn Fn(&LookupProgress) + Send>;

/// One iterative lookup for a target key. Created per query, consumed by
/// [`run`](Lookup::run).
pub struct Lookup {
    target: NetworkId,
    kind: FindKind,
    state: LookupState,
    table: Arc<Mutex<RoutingTable>>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    metrics: Arc<Metrics>,
    timeout: Duration,
    rpc_timeout: Duration,
    next_request_id: u64,
    cancel_rx: Option<oneshot::Receiver<()>>,
    progress: Option<ProgressFn>,
}

impl Lookup {
    /// Set up a lookup for `target`, seeding the shortlist from the routing
    /// table (excluding the local node). The seed bucket is touched unless
    /// the target is the local id. Fails with
    /// [`LookupError::RoutingTableEmpty`] when no seeds are known.
    pub fn new(
        target: NetworkId,
        kind: FindKind,
        table: Arc<Mutex<RoutingTable>>,
        local_id: NetworkId,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        metrics: Arc<Metrics>,
    ) -> Result<Self, LookupError> {
        let seeds = {
            let mut guard = match table.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let seeds = guard.find_close_nodes(&target, Some(&local_id));
            if target != local_id {
                guard.touch_bucket(&target);
            }
            seeds
        };
        let state =
            LookupState::new(target.clone(), seeds).ok_or(LookupError::RoutingTableEmpty)?;
        metrics.lookups_started_total.inc();
        Ok(Self {
            target,
            kind,
            state,
            table,
            transport,
            clock,
            metrics,
            timeout: Duration::from_secs_f64(LOOKUP_TIMEOUT),
            rpc_timeout: Duration::from_secs_f64(RPC_TIMEOUT),
            next_request_id: 0,
            cancel_rx: None,
            progress: None,
        })
    }

    /// Override the lookup deadline (defaults to LOOKUP_TIMEOUT).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the per-request timeout (defaults to RPC_TIMEOUT).
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Install a progress hook, called after every handled event.
    pub fn on_progress(mut self, hook: impl Fn(&LookupProgress) + Send + 'static) -> Self {
        self.progress = Some(Box::new(hook));
        self
    }

    /// Obtain a handle that cancels this lookup from elsewhere. A later call
    /// replaces the earlier handle.
    pub fn canceller(&mut self) -> LookupCanceller {
        let (tx, rx) = oneshot::channel();
        self.cancel_rx = Some(rx);
        LookupCanceller { tx }
    }

    /// Drive the lookup to completion.
    pub async fn run(mut self) -> Result<LookupOutcome, LookupError> {
        let result = self.drive().await;
        match &result {
            Ok(_) => self.metrics.lookups_completed_total.inc(),
            Err(_) => self.metrics.lookups_failed_total.inc(),
        }
        result
    }

    async fn drive(&mut self) -> Result<LookupOutcome, LookupError> {
        let mut pending: FuturesUnordered<PendingRpc> = FuturesUnordered::new();
        let cancelled = wait_cancelled(self.cancel_rx.take());
        tokio::pin!(cancelled);
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        self.pump(&mut pending);
        loop {
            if pending.is_empty() {
                // Nothing in flight and nothing left to contact.
                return self.finish();
            }
            tokio::select! {
                _ = &mut deadline => {
                    debug!(key = %self.target, "lookup deadline reached");
                    self.drain(&mut pending);
                    return Err(LookupError::Cancelled);
                }
                _ = &mut cancelled => {
                    debug!(key = %self.target, "lookup cancelled");
                    self.drain(&mut pending);
                    return Err(LookupError::Cancelled);
                }
                Some((request_id, contact, result)) = pending.next() => {
                    self.metrics.lookup_pending.dec();
                    let advance = match result {
                        Ok(response) => self.on_response(contact, response),
                        Err(err) => {
                            debug!(request = request_id, err = %err, "find rpc failed");
                            self.on_error(&contact);
                            Advance::Pump
                        }
                    };
                    self.report_progress(pending.len());
                    match advance {
                        Advance::Done(outcome) => {
                            self.drain(&mut pending);
                            return Ok(outcome);
                        }
                        Advance::Pump => self.pump(&mut pending),
                        Advance::Hold => {
                            if pending.is_empty() {
                                if self.state.fully_contacted() {
                                    return self.finish();
                                }
                                // Closest candidates are exhausted; force the
                                // remaining shortlist members to be contacted.
                                self.pump(&mut pending);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Issue requests to the closest uncontacted shortlist members, keeping
    /// the number in flight at or below α.
    fn pump(&mut self, pending: &mut FuturesUnordered<PendingRpc>) {
        for contact in self.state.next_batch(pending.len()) {
            let request_id = self.next_request_id;
            self.next_request_id += 1;
            let rpc = self
                .transport
                .send_find(&contact, &self.target, self.kind);
            let rpc_timeout = self.rpc_timeout;
            self.metrics.lookup_rpcs_total.inc();
            self.metrics.lookup_pending.inc();
            debug!(request = request_id, peer = %contact.network_id, "issuing find rpc");
            pending.push(Box::pin(async move {
                match tokio::time::timeout(rpc_timeout, rpc).await {
                    Ok(result) => (request_id, contact, result),
                    Err(_) => (request_id, contact, Err(RpcError::Timeout)),
                }
            }));
        }
    }

    fn on_response(&mut self, contact: Contact, response: FindResponse) -> Advance {
        match response {
            FindResponse::Value(value) => {
                if self.kind != FindKind::Value {
                    // A value for a FIND_NODE request is a protocol violation.
                    self.blacklist(&contact);
                    return Advance::Pump;
                }
                if value.key != self.target {
                    self.blacklist(&contact);
                    return Advance::Pump;
                }
                if value.is_expired(self.clock.now()) {
                    // Not misbehaviour: the responder simply held a stale
                    // copy. Drop it from the shortlist and carry on.
                    debug!(peer = %contact.network_id, "expired value; continuing");
                    self.state.remove(&contact.network_id);
                    return Advance::Pump;
                }
                // Remove the responder so the closest non-returning node is
                // discoverable by callers implementing store-to-caching.
                self.state.remove(&contact.network_id);
                self.record_success(contact);
                Advance::Done(LookupOutcome::Value(value))
            }
            FindResponse::Nodes(nodes) => {
                self.record_success(contact);
                self.state.merge_nodes(nodes.nodes);
                if self.state.reassess_nearest() {
                    Advance::Pump
                } else {
                    Advance::Hold
                }
            }
        }
    }

    /// Transient failure: drop the responder from the shortlist and charge
    /// its failure budget (eviction happens at the threshold). No blacklist.
    fn on_error(&mut self, contact: &Contact) {
        self.metrics.lookup_rpc_errors_total.inc();
        self.state.remove(&contact.network_id);
        self.with_table(|table| table.remove_contact(&contact.network_id, false));
    }

    fn blacklist(&mut self, contact: &Contact) {
        warn!(peer = %contact.network_id, "protocol violation; blacklisting responder");
        self.metrics.peers_blacklisted_total.inc();
        self.state.remove(&contact.network_id);
        self.with_table(|table| table.blacklist(contact));
    }

    /// A peer answered: refresh it in the routing table, which also resets
    /// its failure count.
    fn record_success(&mut self, mut contact: Contact) {
        contact.last_seen = self.clock.now();
        self.with_table(|table| table.add_contact(contact));
    }

    fn finish(&mut self) -> Result<LookupOutcome, LookupError> {
        match self.kind {
            FindKind::Node => Ok(LookupOutcome::Nodes(self.state.shortlist().to_vec())),
            FindKind::Value => Err(LookupError::ValueNotFound(self.target.clone())),
        }
    }

    /// Cancel every in-flight request (dropping the futures aborts them).
    fn drain(&mut self, pending: &mut FuturesUnordered<PendingRpc>) {
        self.metrics.lookup_pending.sub(pending.len() as i64);
        pending.clear();
    }

    fn report_progress(&self, pending: usize) {
        if let Some(hook) = &self.progress {
            hook(&LookupProgress {
                contacted: self.state.contacted_len(),
                pending,
                shortlist: self.state.shortlist().len(),
                nearest: self.state.nearest().clone(),
            });
        }
    }

    fn with_table<R>(&self, f: impl FnOnce(&mut RoutingTable) -> R) -> R {
        let mut guard = match self.table.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

/// Resolves only when the canceller fires. A dropped or absent canceller
/// never resolves.
async fn wait_cancelled(rx: Option<oneshot::Receiver<()>>) {
    if let Some(rx) = rx {
        if rx.await.is_ok() {
            return;
        }
    }
    futures::future::pending::<()>().await
}
