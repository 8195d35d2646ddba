//! Provisioning: turns an "add room" request into a ready-to-show room.
//!
//! DESIGN
//! ======
//! A request waits out the debounce window first; a newer request arriving in
//! that window supersedes it. The surviving request becomes the single
//! in-flight request: it fetches photo metadata, falls back to the next
//! placeholder on any provider failure, and preloads the image before handing
//! the room back. Requests arriving while one is in flight are rejected.
//!
//! Bookkeeping lives behind a std mutex that is never held across an
//! `.await`. Cancelling clears the in-flight ticket, so the result of the
//! cancelled fetch is discarded as stale when it eventually arrives. A
//! placeholder is only taken while the ticket is still in flight; a stale
//! request never advances the fallback sequence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use carousel::fallback::FallbackSequence;
use carousel::rooms::{Room, RoomDraft};
use tracing::{debug, info, warn};

use crate::config::GalleryConfig;
use crate::provider::preload::HttpPreloader;
use crate::provider::unsplash::UnsplashClient;
use crate::provider::{ImagePreloader, ImageSource, PhotoMeta, ProviderError};

/// Where a provisioned room's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOrigin {
    Provider,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The room is preloaded and can be appended.
    Ready { room: Room, origin: RoomOrigin },
    /// A newer request arrived inside the debounce window.
    Debounced,
    /// Another request was already in flight.
    Busy,
    /// The request was cancelled while fetching; its result was dropped.
    Stale,
}

// =============================================================================
// PROVISIONER
// =============================================================================

#[derive(Clone)]
pub struct Provisioner {
    source: Arc<dyn ImageSource>,
    preloader: Arc<dyn ImagePreloader>,
    debounce: Duration,
    inner: Arc<Mutex<ProvisionerInner>>,
}

struct ProvisionerInner {
    next_ticket: u64,
    /// Latest request still inside its debounce window.
    waiting: Option<u64>,
    /// Request currently fetching or preloading.
    in_flight: Option<u64>,
    fallback: FallbackSequence,
}

impl Provisioner {
    #[must_use]
    pub fn new(source: Arc<dyn ImageSource>, preloader: Arc<dyn ImagePreloader>, debounce: Duration) -> Self {
        Self {
            source,
            preloader,
            debounce,
            inner: Arc::new(Mutex::new(ProvisionerInner {
                next_ticket: 0,
                waiting: None,
                in_flight: None,
                fallback: FallbackSequence::new(),
            })),
        }
    }

    /// Wire the HTTP provider and preloader from config.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] if an HTTP client fails to build.
    pub fn from_config(config: &GalleryConfig) -> Result<Self, ProviderError> {
        let source = UnsplashClient::new(config.provider_base_url.clone(), config.access_key.clone(), config.timeouts)?;
        let preloader = HttpPreloader::new(config.timeouts)?;
        Ok(Self::new(Arc::new(source), Arc::new(preloader), Duration::from_millis(config.debounce_ms)))
    }

    /// Produce one new room, or report why this request produced none.
    pub async fn request_new_room(&self) -> ProvisionOutcome {
        let ticket = {
            let mut inner = self.lock();
            if inner.in_flight.is_some() {
                debug!("provision request rejected; another is in flight");
                return ProvisionOutcome::Busy;
            }
            inner.next_ticket += 1;
            let ticket = inner.next_ticket;
            inner.waiting = Some(ticket);
            ticket
        };

        tokio::time::sleep(self.debounce).await;

        {
            let mut inner = self.lock();
            if inner.waiting != Some(ticket) {
                debug!(ticket, "provision request superseded");
                return ProvisionOutcome::Debounced;
            }
            inner.waiting = None;
            inner.in_flight = Some(ticket);
        }

        let Some((draft, origin)) = self.fetch_draft(ticket).await else {
            return Self::stale(ticket);
        };
        let Some((draft, origin)) = self.preload_draft(ticket, draft, origin).await else {
            return Self::stale(ticket);
        };

        let mut inner = self.lock();
        if inner.in_flight != Some(ticket) {
            drop(inner);
            return Self::stale(ticket);
        }
        inner.in_flight = None;
        drop(inner);

        let room = Room::from_draft(draft);
        info!(room_id = %room.id, ?origin, title = %room.title, "room provisioned");
        ProvisionOutcome::Ready { room, origin }
    }

    /// True from the moment a request is accepted until it resolves.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        let inner = self.lock();
        inner.waiting.is_some() || inner.in_flight.is_some()
    }

    /// True while a request is fetching or preloading.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Drop the in-flight and debouncing requests. Returns whether anything
    /// was cancelled.
    pub fn cancel_in_flight(&self) -> bool {
        let mut inner = self.lock();
        let had_fetch = inner.in_flight.take().is_some();
        let had_wait = inner.waiting.take().is_some();
        let cancelled = had_fetch || had_wait;
        if cancelled {
            debug!("provision request cancelled");
        }
        cancelled
    }

    /// Position of the next placeholder the fallback path will use.
    #[must_use]
    pub fn fallback_position(&self) -> usize {
        self.lock().fallback.position()
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// `None` when the ticket was cancelled during the fetch.
    async fn fetch_draft(&self, ticket: u64) -> Option<(RoomDraft, RoomOrigin)> {
        match self.source.random_photo().await.and_then(PhotoMeta::into_draft) {
            Ok(draft) => Some((draft, RoomOrigin::Provider)),
            Err(e) => {
                let fallback = self.fallback_for(ticket)?;
                warn!(error = %e, "image provider unavailable; using placeholder");
                Some((fallback, RoomOrigin::Fallback))
            }
        }
    }

    /// `None` when the ticket was cancelled before a placeholder was needed.
    async fn preload_draft(&self, ticket: u64, draft: RoomDraft, origin: RoomOrigin) -> Option<(RoomDraft, RoomOrigin)> {
        match self.preloader.preload(&draft.image_source).await {
            Ok(bytes) => {
                debug!(source = %draft.image_source, bytes, "image preloaded");
                Some((draft, origin))
            }
            Err(e) if origin == RoomOrigin::Provider => {
                let fallback = self.fallback_for(ticket)?;
                warn!(error = %e, source = %draft.image_source, "image preload failed; using placeholder");
                if let Err(e) = self.preloader.preload(&fallback.image_source).await {
                    warn!(error = %e, source = %fallback.image_source, "placeholder preload failed");
                }
                Some((fallback, RoomOrigin::Fallback))
            }
            Err(e) => {
                warn!(error = %e, source = %draft.image_source, "placeholder preload failed");
                Some((draft, origin))
            }
        }
    }

    /// Next placeholder, but only while `ticket` still owns the request.
    fn fallback_for(&self, ticket: u64) -> Option<RoomDraft> {
        let mut inner = self.lock();
        if inner.in_flight != Some(ticket) {
            return None;
        }
        Some(inner.fallback.next_draft())
    }

    fn stale(ticket: u64) -> ProvisionOutcome {
        debug!(ticket, "discarding stale provision result");
        ProvisionOutcome::Stale
    }

    fn lock(&self) -> MutexGuard<'_, ProvisionerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "provision_test.rs"]
mod tests;
