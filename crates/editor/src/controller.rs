//! The editor controller: session lifecycle and service orchestration.
//!
//! One controller presents at most one [`EditorSession`] at a time. The
//! session itself is pure and synchronous; everything async — fetching
//! configurations, fetching photos, saving — happens here, at the I/O
//! boundary. Results of in-flight photo fetches are committed only if the
//! session that requested them is still current, enforced by the session
//! generation counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use salesdesk_core::cart::CartLine;
use salesdesk_core::services::{CartService, ConfigurationSource, PhotoSource, ServiceError};
use salesdesk_core::session::{EditorSession, EditorView, PhotoFetchState};
use salesdesk_core::types::{DbId, PricingContext, ProductSummary};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Errors surfaced by the controller. Each maps to one UI reaction: a
/// toast and close, a disabled save button, or a toast with the session
/// kept open for retry.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("No editor session is open")]
    NoActiveSession,

    /// The configuration fetch failed. Fatal: without group data no valid
    /// configuration can be built, so no session is opened.
    #[error("Could not load product configuration: {0}")]
    ConfigurationUnavailable(#[source] ServiceError),

    /// A mandatory group has no selection; save is blocked.
    #[error("Select all required configurations")]
    IncompleteConfiguration,

    /// The cart service rejected the save. The session stays open so the
    /// user can adjust and retry.
    #[error("Saving the cart line failed: {0}")]
    SaveFailed(#[source] ServiceError),
}

/// Result of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The session is gone (or none was open).
    Closed,
    /// Unsaved changes exist; the caller must confirm the discard and call
    /// [`EditorController::close`] again with `force`.
    ConfirmationRequired,
}

pub struct EditorController {
    catalog: Arc<dyn ConfigurationSource>,
    photos: Arc<dyn PhotoSource>,
    cart: Arc<dyn CartService>,
    ctx: PricingContext,
    session: Arc<Mutex<Option<EditorSession>>>,
    /// Monotonic across sessions; each open claims the next value. Photo
    /// results carrying an older generation are discarded on arrival.
    generations: Arc<AtomicU64>,
}

impl EditorController {
    pub fn new(
        catalog: Arc<dyn ConfigurationSource>,
        photos: Arc<dyn PhotoSource>,
        cart: Arc<dyn CartService>,
        ctx: PricingContext,
    ) -> Self {
        Self {
            catalog,
            photos,
            cart,
            ctx,
            session: Arc::new(Mutex::new(None)),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Switch the customer/project context. Configuration prices depend on
    /// it, so any open session is discarded; the next open re-fetches.
    pub async fn set_context(&mut self, ctx: PricingContext) {
        self.ctx = ctx;
        self.session.lock().await.take();
    }

    pub fn context(&self) -> &PricingContext {
        &self.ctx
    }

    // -- opening -------------------------------------------------------------

    /// Open the editor to add `product` to the cart.
    pub async fn open_add(&self, product: ProductSummary) -> Result<(), EditorError> {
        let generation = self.next_generation();
        let config = self.fetch_configuration(product.id).await?;
        let session = EditorSession::open_add(product, &config, generation);
        self.session.lock().await.replace(session);
        Ok(())
    }

    /// Open the editor for an existing cart line, resolving its saved
    /// selections against freshly fetched group definitions.
    pub async fn open_edit(
        &self,
        product: ProductSummary,
        line: CartLine,
    ) -> Result<(), EditorError> {
        let generation = self.next_generation();
        let config = self.fetch_configuration(product.id).await?;
        let session = EditorSession::open_edit(product, &config, &line, generation);
        self.session.lock().await.replace(session);
        Ok(())
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fetch_configuration(
        &self,
        product_id: DbId,
    ) -> Result<salesdesk_core::configuration::ProductConfiguration, EditorError> {
        self.catalog
            .get_configurations(product_id, &self.ctx)
            .await
            .map_err(|e| {
                tracing::error!(product_id, error = %e, "Configuration fetch failed");
                EditorError::ConfigurationUnavailable(e)
            })
    }

    // -- edits ---------------------------------------------------------------

    pub async fn toggle(&self, group_name: &str, item_id: &str) -> Result<(), EditorError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(EditorError::NoActiveSession)?;
        session.toggle(group_name, item_id);
        Ok(())
    }

    pub async fn set_quantity(&self, quantity: u32) -> Result<(), EditorError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(EditorError::NoActiveSession)?;
        session.set_quantity(quantity);
        Ok(())
    }

    pub async fn set_unit(&self, unit: &str) -> Result<(), EditorError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(EditorError::NoActiveSession)?;
        session.set_unit(unit);
        Ok(())
    }

    // -- photo orchestration -------------------------------------------------

    /// Make a group's tab the active one, spawning its photo fetch on
    /// first view. Returns the fetch task's handle when one was spawned
    /// (tests await it; production callers let it run detached).
    ///
    /// A failed fetch is non-fatal: the group silently keeps its existing
    /// photos and the UI falls back to placeholder icons. A result arriving
    /// after the session was replaced is discarded, not applied.
    pub async fn activate_tab(&self, group_name: &str) -> Option<JoinHandle<()>> {
        let request = {
            let mut guard = self.session.lock().await;
            guard.as_mut()?.activate_tab(group_name)?
        };

        let photos = Arc::clone(&self.photos);
        let session = Arc::clone(&self.session);
        let project_id = self.ctx.project_id;

        Some(tokio::spawn(async move {
            let result = photos
                .get_group_photos(request.group_id, &request.group_name, project_id)
                .await;

            let mut guard = session.lock().await;
            let Some(session) = guard.as_mut() else {
                return; // editor closed while the fetch was in flight
            };
            match result {
                Ok(item_photos) => {
                    session.apply_group_photos(
                        request.generation,
                        &request.group_name,
                        &item_photos,
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        group = %request.group_name,
                        error = %e,
                        "Photo fetch failed; keeping placeholders",
                    );
                    session.photo_fetch_failed(request.generation, &request.group_name);
                }
            }
        }))
    }

    /// Photo loading state of a group, for spinner rendering.
    pub async fn photo_state(&self, group_name: &str) -> Option<PhotoFetchState> {
        let guard = self.session.lock().await;
        guard.as_ref().map(|s| s.photo_state(group_name))
    }

    // -- save / close --------------------------------------------------------

    /// Persist the session through the cart service.
    ///
    /// Blocked while a mandatory group is unsatisfied. On success the
    /// session closes; on rejection it stays open for retry. There is no
    /// save-and-keep-editing.
    pub async fn save(&self) -> Result<(), EditorError> {
        let (payload, line_id) = {
            let guard = self.session.lock().await;
            let session = guard.as_ref().ok_or(EditorError::NoActiveSession)?;
            let payload = session
                .save_payload()
                .map_err(|_| EditorError::IncompleteConfiguration)?;
            (payload, session.line_id())
        };

        let result = match line_id {
            Some(line_id) => self.cart.update_item(line_id, &payload).await,
            None => self.cart.add_item(&payload).await,
        };

        match result {
            Ok(()) => {
                self.session.lock().await.take();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cart save rejected");
                Err(EditorError::SaveFailed(e))
            }
        }
    }

    /// Close the editor. Without `force`, unsaved changes turn the request
    /// into [`CloseOutcome::ConfirmationRequired`] and the session stays.
    pub async fn close(&self, force: bool) -> CloseOutcome {
        let mut guard = self.session.lock().await;
        match guard.as_ref() {
            None => CloseOutcome::Closed,
            Some(session) if session.has_changes() && !force => CloseOutcome::ConfirmationRequired,
            Some(_) => {
                guard.take();
                CloseOutcome::Closed
            }
        }
    }

    // -- presentation --------------------------------------------------------

    /// Snapshot of the session's derived values, or `None` when no editor
    /// is open.
    pub async fn view(&self) -> Option<EditorView> {
        let guard = self.session.lock().await;
        guard.as_ref().map(|s| s.view())
    }
}
