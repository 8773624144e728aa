//! Paged view over the remote collection.
//!
//! Every fetch is tagged with a sequence number when it is issued. Only the
//! completion carrying the latest number may touch state; older completions
//! are dropped, so rapid page switches can never show the wrong page.

use std::sync::{Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{HeroId, Superhero},
    protocol::{HeroFields, PageWindow},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    draft::UpdateRequest,
    error::FetchError,
    pagination::{compute_display_model, DisplayModel, DEFAULT_MIN_SLOTS},
    CollectionApi, ImageUpload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// New records are assumed to sort onto the first page, so the view jumps
    /// back to page 1. Servers with a different default order will see the new
    /// record elsewhere.
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { page: u32 },
    /// A later request was issued before this one completed.
    Superseded,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page: u32,
    pub page_size: u32,
    pub window: PageWindow<Superhero>,
    pub busy: bool,
    pub last_error: Option<FetchError>,
}

impl ViewState {
    pub fn items(&self) -> &[Superhero] {
        &self.window.items
    }

    pub fn total_pages(&self) -> u32 {
        self.window.total_pages
    }

    pub fn total(&self) -> u64 {
        self.window.total
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(ViewState),
    LoadFailed(FetchError),
}

struct ControllerState {
    page: u32,
    page_size: u32,
    window: PageWindow<Superhero>,
    busy: bool,
    last_error: Option<FetchError>,
    latest_seq: u64,
}

impl ControllerState {
    fn snapshot(&self) -> ViewState {
        ViewState {
            page: self.page,
            page_size: self.page_size,
            window: self.window.clone(),
            busy: self.busy,
            last_error: self.last_error.clone(),
        }
    }
}

/// Which page a new request targets.
enum PageRequest {
    /// `page` only changes once the fetch succeeds.
    Page(u32),
    Current,
    /// Move `page` immediately, then fetch it.
    JumpTo(u32),
}

struct Ticket {
    seq: u64,
    page: u32,
    page_size: u32,
}

pub struct PagedCollectionController<A: CollectionApi> {
    api: A,
    min_slots: u32,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl<A: CollectionApi> PagedCollectionController<A> {
    pub fn new(api: A, page_size: u32) -> Self {
        Self::with_min_slots(api, page_size, DEFAULT_MIN_SLOTS)
    }

    pub fn with_settings(api: A, settings: &Settings) -> Self {
        Self::with_min_slots(api, settings.page_size, settings.min_slots)
    }

    pub fn with_min_slots(api: A, page_size: u32, min_slots: u32) -> Self {
        let page_size = page_size.max(1);
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            min_slots,
            inner: Mutex::new(ControllerState {
                page: 1,
                page_size,
                window: PageWindow::empty(page_size),
                busy: false,
                last_error: None,
                latest_seq: 0,
            }),
            events,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn view(&self) -> ViewState {
        self.state().snapshot()
    }

    pub fn page(&self) -> u32 {
        self.state().page
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    pub fn display_model(&self) -> DisplayModel {
        let state = self.state();
        compute_display_model(state.page, state.window.total_pages, self.min_slots)
    }

    pub async fn load_page(&self, page: u32) -> Result<LoadOutcome, FetchError> {
        if page == 0 {
            warn!("page 0 requested; loading page 1");
        }
        let ticket = self.issue(PageRequest::Page(page.max(1)));
        let result = self.fetch(&ticket).await;
        self.settle(ticket, result)
    }

    pub async fn reconcile_after_mutation(
        &self,
        kind: MutationKind,
    ) -> Result<LoadOutcome, FetchError> {
        debug!(?kind, "reconciling after mutation");
        match kind {
            MutationKind::Created => {
                let ticket = self.issue(PageRequest::JumpTo(1));
                let result = self.fetch(&ticket).await;
                self.settle(ticket, result)
            }
            MutationKind::Updated => {
                let ticket = self.issue(PageRequest::Current);
                let result = self.fetch(&ticket).await;
                self.settle(ticket, result)
            }
            MutationKind::Deleted => {
                let ticket = self.issue(PageRequest::Current);
                match self.fetch(&ticket).await {
                    Ok(window) if window.is_empty() && ticket.page > 1 => {
                        let Some(back) = self.step_back(&ticket) else {
                            return Ok(LoadOutcome::Superseded);
                        };
                        let result = self.fetch(&back).await;
                        self.settle(back, result)
                    }
                    result => self.settle(ticket, result),
                }
            }
        }
    }

    pub async fn submit_create(
        &self,
        fields: HeroFields,
        files: Vec<ImageUpload>,
    ) -> Result<Superhero, FetchError> {
        let hero = self.api.create(fields, files).await?;
        info!(id = %hero.id, nickname = %hero.nickname, "superhero created");
        let _ = self.reconcile_after_mutation(MutationKind::Created).await;
        Ok(hero)
    }

    pub async fn submit_update(&self, request: UpdateRequest) -> Result<Superhero, FetchError> {
        let hero = self
            .api
            .update(
                &request.id,
                request.patch,
                request.files,
                request.keep_images,
            )
            .await?;
        info!(id = %hero.id, "superhero updated");
        let _ = self.reconcile_after_mutation(MutationKind::Updated).await;
        Ok(hero)
    }

    pub async fn submit_delete(&self, id: &HeroId) -> Result<(), FetchError> {
        self.api.delete(id).await?;
        info!(%id, "superhero deleted");
        let _ = self.reconcile_after_mutation(MutationKind::Deleted).await;
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(&self, request: PageRequest) -> Ticket {
        let (ticket, snapshot) = {
            let mut state = self.state();
            let page = match request {
                PageRequest::Page(page) => page,
                PageRequest::Current => state.page,
                PageRequest::JumpTo(page) => {
                    state.page = page;
                    page
                }
            };
            state.latest_seq += 1;
            state.busy = true;
            let ticket = Ticket {
                seq: state.latest_seq,
                page,
                page_size: state.page_size,
            };
            (ticket, state.snapshot())
        };
        debug!(seq = ticket.seq, page = ticket.page, "issued page request");
        let _ = self.events.send(ControllerEvent::StateChanged(snapshot));
        ticket
    }

    /// Page-back after a delete emptied a trailing page. Returns `None` when
    /// `ticket` has been superseded in the meantime.
    fn step_back(&self, ticket: &Ticket) -> Option<Ticket> {
        let (back, snapshot) = {
            let mut state = self.state();
            if state.latest_seq != ticket.seq {
                debug!(seq = ticket.seq, latest = state.latest_seq, "dropping stale delete refresh");
                return None;
            }
            state.page = ticket.page - 1;
            state.latest_seq += 1;
            let back = Ticket {
                seq: state.latest_seq,
                page: state.page,
                page_size: state.page_size,
            };
            (back, state.snapshot())
        };
        info!(from = ticket.page, to = back.page, "page emptied by delete; stepping back");
        let _ = self.events.send(ControllerEvent::StateChanged(snapshot));
        Some(back)
    }

    async fn fetch(&self, ticket: &Ticket) -> Result<PageWindow<Superhero>, FetchError> {
        self.api.list(ticket.page, ticket.page_size).await
    }

    fn settle(
        &self,
        ticket: Ticket,
        result: Result<PageWindow<Superhero>, FetchError>,
    ) -> Result<LoadOutcome, FetchError> {
        let mut state = self.state();
        if state.latest_seq != ticket.seq {
            debug!(
                seq = ticket.seq,
                latest = state.latest_seq,
                page = ticket.page,
                "discarding stale page response"
            );
            return Ok(LoadOutcome::Superseded);
        }

        state.busy = false;
        match result {
            Ok(window) => {
                debug!(
                    seq = ticket.seq,
                    page = ticket.page,
                    items = window.items.len(),
                    total_pages = window.total_pages,
                    "applied page"
                );
                state.window = window;
                state.page = ticket.page;
                state.last_error = None;
                let snapshot = state.snapshot();
                drop(state);
                let _ = self.events.send(ControllerEvent::StateChanged(snapshot));
                Ok(LoadOutcome::Applied { page: ticket.page })
            }
            Err(err) => {
                warn!(seq = ticket.seq, page = ticket.page, error = %err, "page request failed");
                state.last_error = Some(err.clone());
                let snapshot = state.snapshot();
                drop(state);
                let _ = self.events.send(ControllerEvent::StateChanged(snapshot));
                let _ = self.events.send(ControllerEvent::LoadFailed(err.clone()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
