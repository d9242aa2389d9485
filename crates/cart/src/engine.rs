//! The identity transition controller.
//!
//! `CartEngine` owns the live cart state and token. UI mutations go
//! through [`CartEngine::dispatch`]; identity changes go through
//! [`CartEngine::observe_identity`], which issues at most one server
//! reconciliation per transition and replaces local state with the
//! server's authoritative answer.
//!
//! Reconciliations are numbered. A response is applied only while its
//! number is still the newest issued, so a slow response from a
//! superseded transition can never overwrite the result of a newer one.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rbos_client::CartGateway;
use rbos_primitives::cart::CartState;
use rbos_primitives::conflict::ConflictReport;
use rbos_primitives::identity::IdentityKey;
use rbos_primitives::server::{CartMergeRequest, CartMergeResponse, MergeItem};
use rbos_primitives::token::CartToken;
use rbos_store::CartStorage;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::banners::project_banners;
use crate::reducer::{reduce, CartAction};

pub struct CartEngine<G, S> {
    gateway: G,
    storage: S,
    inner: Mutex<EngineInner>,
    state_tx: watch::Sender<CartState>,
}

struct EngineInner {
    state: CartState,
    token: Option<CartToken>,
    /// The observation the last completed reconciliation was for; `None`
    /// until one completes. A failed reconciliation leaves this alone so
    /// the next observation retries.
    reconciled: Option<Option<IdentityKey>>,
    /// Number of the newest reconciliation issued.
    seq: u64,
}

/// What to do with the response's line list.
enum ReplacePolicy {
    /// Merge responses are authoritative, even when empty.
    Always,
    /// An anonymous fetch that returns no cart keeps the local one.
    KeepLocalWhenEmpty,
}

enum Plan {
    Skip,
    Fetch {
        seq: u64,
        token: Option<CartToken>,
    },
    Merge {
        seq: u64,
        request: CartMergeRequest,
    },
    PersistOnly {
        state: CartState,
        token: Option<CartToken>,
    },
}

impl<G, S> CartEngine<G, S>
where
    G: CartGateway,
    S: CartStorage,
{
    /// Restore the engine from storage. Missing or corrupt data starts
    /// an empty cart; this never fails.
    pub async fn restore(gateway: G, storage: S) -> Self {
        let (state, token) = storage.load().await;
        let (state_tx, _rx) = watch::channel(state.clone());

        Self {
            gateway,
            storage,
            inner: Mutex::new(EngineInner {
                state,
                token,
                reconciled: None,
                seq: 0,
            }),
            state_tx,
        }
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<CartToken> {
        self.lock().token.clone()
    }

    /// Watch the cart state. The receiver sees every committed change,
    /// including server reconciliations.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state_tx.subscribe()
    }

    /// Run a cart action and persist the result.
    pub async fn dispatch(&self, action: CartAction) {
        let clears_token = matches!(action, CartAction::ClearCart);

        let (state, token) = {
            let mut inner = self.lock();
            inner.state = reduce(&inner.state, action);
            if clears_token {
                inner.token = None;
            }
            (inner.state.clone(), inner.token.clone())
        };

        let _ignored = self.state_tx.send_replace(state.clone());
        self.persist(&state, token.as_ref()).await;
    }

    /// Clear all notice banners and persist.
    pub async fn dismiss_banners(&self) {
        let (state, token) = {
            let mut inner = self.lock();
            inner.state.banners.clear();
            (inner.state.clone(), inner.token.clone())
        };

        let _ignored = self.state_tx.send_replace(state.clone());
        self.persist(&state, token.as_ref()).await;
    }

    /// Feed the currently authenticated identity (or `None` for
    /// anonymous) into the engine.
    ///
    /// Each distinct identity value triggers exactly one reconciliation:
    /// a fetch for an anonymous cold start, a merge for any login or
    /// account switch. Logout keeps the cart as the device's anonymous
    /// cart without a server call. Re-observing an unchanged identity is
    /// free. Local quantities sent in a merge are proposals; the server's
    /// answer replaces local state wholesale.
    pub async fn observe_identity(&self, identity: Option<IdentityKey>) {
        let plan = {
            let mut inner = self.lock();

            if inner.reconciled.as_ref() == Some(&identity) {
                Plan::Skip
            } else if identity.is_some() {
                inner.seq += 1;
                let items = inner.state.lines.iter().map(MergeItem::from).collect();
                Plan::Merge {
                    seq: inner.seq,
                    request: CartMergeRequest::new(inner.token.clone(), items),
                }
            } else if inner.reconciled.is_none() {
                inner.seq += 1;
                Plan::Fetch {
                    seq: inner.seq,
                    token: inner.token.clone(),
                }
            } else {
                // Logout. No server call, but bump the sequence so an
                // in-flight merge for the previous user cannot land on
                // the now-anonymous cart.
                inner.seq += 1;
                inner.reconciled = Some(None);
                Plan::PersistOnly {
                    state: inner.state.clone(),
                    token: inner.token.clone(),
                }
            }
        };

        match plan {
            Plan::Skip => {}
            Plan::PersistOnly { state, token } => {
                debug!("logout observed; cart becomes this device's anonymous cart");
                self.persist(&state, token.as_ref()).await;
            }
            Plan::Fetch { seq, token } => {
                debug!(seq, "rehydrating anonymous cart");
                match self.gateway.fetch_cart(token.as_ref()).await {
                    Ok(response) => {
                        self.apply(identity, seq, response, ReplacePolicy::KeepLocalWhenEmpty)
                            .await;
                    }
                    Err(err) => warn!(%err, "cart fetch failed; keeping local state"),
                }
            }
            Plan::Merge { seq, request } => {
                debug!(
                    identity = ?identity,
                    seq,
                    items = request.items.len(),
                    "merging cart for identity transition"
                );
                match self.gateway.merge_cart(&request).await {
                    Ok(response) => {
                        self.apply(identity, seq, response, ReplacePolicy::Always)
                            .await;
                    }
                    Err(err) => warn!(%err, "cart merge failed; keeping local state"),
                }
            }
        }
    }

    /// Commit a reconciliation response, unless it has gone stale.
    async fn apply(
        &self,
        identity: Option<IdentityKey>,
        seq: u64,
        response: CartMergeResponse,
        policy: ReplacePolicy,
    ) {
        if self.lock().seq != seq {
            debug!(seq, "discarding stale reconciliation response");
            return;
        }

        let pending = self
            .storage
            .take_pending_conflicts()
            .await
            .unwrap_or_default();
        let mut report = pending.clone();
        report.merge(response.conflicts.clone().unwrap_or_default());

        if !report.is_empty() {
            // Stage the report before touching state, so an interruption
            // between here and the final persist cannot lose it.
            if let Err(err) = self.storage.stash_pending_conflicts(&report).await {
                warn!(%err, "failed to stage pending conflicts");
            }
        }

        let replace_lines = match policy {
            ReplacePolicy::Always => true,
            ReplacePolicy::KeepLocalWhenEmpty => !response.items.is_empty(),
        };

        let applied = {
            let mut inner = self.lock();

            if seq != inner.seq {
                None
            } else {
                let mut banners = inner.state.banners.clone();
                banners.extend(project_banners(&report));

                let incoming = if replace_lines {
                    CartState {
                        lines: response.items,
                        banners,
                        ..CartState::default()
                    }
                } else {
                    CartState {
                        lines: inner.state.lines.clone(),
                        banners,
                        ..CartState::default()
                    }
                };

                inner.state = reduce(&inner.state, CartAction::ReplaceState(incoming));
                if let Some(token) = response.cart_token {
                    inner.token = Some(token);
                }
                inner.reconciled = Some(identity);

                Some((inner.state.clone(), inner.token.clone()))
            }
        };

        let Some((state, token)) = applied else {
            debug!(seq, "discarding stale reconciliation response");
            self.restore_pending(&report, &pending).await;
            return;
        };

        let _ignored = self.state_tx.send_replace(state.clone());
        self.persist(&state, token.as_ref()).await;

        // The report is now rendered into persisted banners; drop the
        // staged copy.
        if !report.is_empty() {
            let _consumed = self.storage.take_pending_conflicts().await;
        }
    }

    /// A response went stale after its conflicts were staged: put the
    /// slot back to what it held before, dropping only the stale
    /// response's own entries.
    async fn restore_pending(&self, staged: &ConflictReport, pending: &ConflictReport) {
        if staged.is_empty() {
            return;
        }

        if pending.is_empty() {
            let _staged = self.storage.take_pending_conflicts().await;
        } else if let Err(err) = self.storage.stash_pending_conflicts(pending).await {
            warn!(%err, "failed to restore pending conflicts");
        }
    }

    async fn persist(&self, state: &CartState, token: Option<&CartToken>) {
        if let Err(err) = self.storage.save(state, token).await {
            warn!(%err, "failed to persist cart");
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<G, S> fmt::Debug for CartEngine<G, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartEngine").finish_non_exhaustive()
    }
}
