//! Startup and configuration-update handling.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use jobpulse_client::{MetricsSource, SessionContext, SessionToken};
use jobpulse_core::Threshold;

use crate::control::{ControlMessage, ControlReply};
use crate::document::DocumentHost;
use crate::enricher::{Enricher, ScanPass, ScanTrigger};
use crate::store::{ConfigStore, LIMIT_KEY, SESSION_TOKEN_KEY};
use crate::watcher::WatcherHandle;

/// Outcome of a limit update.
#[derive(Debug)]
pub struct LimitUpdate {
    pub threshold: Threshold,
    /// Indicators removed before the re-scan.
    pub removed: usize,
    pub pass: ScanPass,
}

/// Ties the configuration store to the enricher.
///
/// Reads the session token and the threshold from the store, runs the
/// initial load, and redraws everything when the limit changes.
pub struct ConfigUpdateHandler<D, S, C> {
    enricher: Enricher<D, S>,
    store: Arc<C>,
    session: SessionContext,
}

impl<D, S, C> ConfigUpdateHandler<D, S, C>
where
    D: DocumentHost,
    S: MetricsSource,
    C: ConfigStore,
{
    /// `session` must be the context the metrics source reads from.
    pub fn new(enricher: Enricher<D, S>, store: Arc<C>, session: SessionContext) -> Self {
        Self {
            enricher,
            store,
            session,
        }
    }

    pub fn enricher(&self) -> &Enricher<D, S> {
        &self.enricher
    }

    /// Current threshold from the store, or the default.
    pub async fn resolve_threshold(&self) -> Threshold {
        match self.store.get(LIMIT_KEY).await {
            Ok(value) => Threshold::from_stored(value.as_ref()),
            Err(err) => {
                warn!(error = %err, "could not read limit; using default");
                Threshold::DEFAULT
            }
        }
    }

    /// Re-read the session token from the store. Returns whether it is set.
    pub async fn refresh_session(&self) -> bool {
        let token = match self.store.get(SESSION_TOKEN_KEY).await {
            Ok(Some(Value::String(raw))) => SessionToken::new(raw),
            Ok(Some(_)) => {
                warn!("stored session token is not a string; ignoring");
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "could not read session token");
                None
            }
        };

        if self.session.update(token) {
            debug!(available = self.session.is_available(), "session token changed");
        }
        self.session.is_available()
    }

    /// Initial load: refresh the session, read the threshold, scan once and
    /// attach the change watcher.
    pub async fn start(&self) -> (Threshold, ScanPass, WatcherHandle) {
        self.refresh_session().await;
        let threshold = self.resolve_threshold().await;
        info!(%threshold, "starting enrichment");
        let (pass, watcher) = self.enricher.start(threshold);
        (threshold, pass, watcher)
    }

    /// Re-read the limit, drop every indicator and re-scan.
    ///
    /// Cached records are kept, so entries already fetched redraw without
    /// remote calls. A running watcher keeps the threshold it started with.
    pub async fn update_limit(&self) -> LimitUpdate {
        self.refresh_session().await;
        let threshold = self.resolve_threshold().await;
        let removed = self.enricher.document().remove_all_indicators();
        info!(%threshold, removed, "limit updated; redrawing indicators");
        let pass = self.enricher.scan_with(threshold, ScanTrigger::LimitUpdate);
        LimitUpdate {
            threshold,
            removed,
            pass,
        }
    }

    /// Handle a typed control message.
    pub async fn handle(&self, message: &ControlMessage) -> ControlReply {
        match message {
            ControlMessage::UpdateLimit => {
                let update = self.update_limit().await;
                ControlReply::limit_updated(update.threshold)
            }
        }
    }

    /// Handle a raw JSON control message. Unknown messages get no reply.
    pub async fn handle_json(&self, raw: &Value) -> Option<Value> {
        let Some(message) = ControlMessage::from_json(raw) else {
            debug!(message = %raw, "ignoring unknown control message");
            return None;
        };
        let reply = self.handle(&message).await;
        match serde_json::to_value(&reply) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "could not encode control reply");
                None
            }
        }
    }
}
