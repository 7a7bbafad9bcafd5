use std::sync::Arc;

use tracing::{debug, info};

use crate::models::experience::{DraftRating, EntryStamp, ExperienceDraft, ExperienceEntry};
use crate::models::reputation::ReputationRecord;
use crate::models::view::ViewType;
use crate::services::insight_service::InsightService;
use crate::services::reputation_service::ReputationService;
use crate::services::view_state::{reduce, Effect, Event, ViewState};

/// Sole owner of the application state.
///
/// Synchronous effects (reputation lookup) are run inline by [`dispatch`]. The
/// insight request is handed back to the caller as a record so it can be awaited
/// without holding the controller, then fed in with [`complete_search`].
///
/// [`dispatch`]: AppController::dispatch
/// [`complete_search`]: AppController::complete_search
pub struct AppController {
    state: ViewState,
    reputation: ReputationService,
    insights: Arc<InsightService>,
}

impl AppController {
    pub fn new(reputation: ReputationService, insights: Arc<InsightService>) -> Self {
        Self::with_state(ViewState::default(), reputation, insights)
    }

    pub fn with_state(
        state: ViewState,
        reputation: ReputationService,
        insights: Arc<InsightService>,
    ) -> Self {
        Self {
            state,
            reputation,
            insights,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn insights(&self) -> Arc<InsightService> {
        Arc::clone(&self.insights)
    }

    /// Applies an event and runs any lookup it triggers. Returns the record
    /// whose insight still has to be fetched, if any.
    pub fn dispatch(&mut self, event: Event) -> Option<ReputationRecord> {
        let mut pending = Some(event);
        while let Some(event) = pending.take() {
            let state = std::mem::replace(&mut self.state, ViewState::vacant());
            let transition = reduce(state, event);
            self.state = transition.state;

            match transition.effect {
                None => {}
                Some(Effect::LookupCustomer(phone)) => {
                    pending = self.reputation.lookup(&phone).map(Event::CustomerLoaded);
                    if pending.is_none() {
                        // Lookup declined the input, release the loading flag.
                        self.state.loading = false;
                    }
                }
                Some(Effect::FetchInsight(record)) => {
                    debug!(target: "app::view", phone = %record.phone, "insight pending");
                    return Some(record);
                }
            }
        }

        None
    }

    pub fn select_view(&mut self, view: ViewType) {
        self.dispatch(Event::SelectView(view));
    }

    pub fn set_search_input(&mut self, value: impl Into<String>) {
        self.dispatch(Event::SearchInputChanged(value.into()));
    }

    /// Starts a search for `phone`. `None` means nothing to fetch: blank input
    /// or a search already in flight.
    pub fn begin_search(&mut self, phone: impl Into<String>) -> Option<ReputationRecord> {
        if self.state.loading {
            return None;
        }
        self.set_search_input(phone);
        self.dispatch(Event::SearchSubmitted)
    }

    pub fn complete_search(&mut self, insight: impl Into<String>) {
        self.dispatch(Event::InsightResolved(insight.into()));
    }

    /// Runs a whole search, awaiting the insight while holding the controller.
    pub async fn search(&mut self, phone: impl Into<String>) -> Option<ReputationRecord> {
        let record = self.begin_search(phone)?;
        let insight = self.insights.insight_for(&record).await;
        self.complete_search(insight);
        info!(
            target: "app::view",
            success_rate = record.success_rate(),
            "search completed"
        );
        Some(record)
    }

    pub fn open_add_entry(&mut self) {
        self.dispatch(Event::OpenAddEntry);
    }

    pub fn close_add_entry(&mut self) {
        self.dispatch(Event::CloseAddEntry);
    }

    pub fn update_draft(&mut self, draft: ExperienceDraft) {
        self.dispatch(Event::DraftPhoneChanged(draft.phone));
        self.dispatch(Event::DraftRatingChanged(draft.rating));
        self.dispatch(Event::DraftCommentChanged(draft.comment));
    }

    pub fn set_draft_rating(&mut self, rating: DraftRating) {
        self.dispatch(Event::DraftRatingChanged(rating));
    }

    /// Submits the current draft. Returns the new entry, or `None` when the
    /// draft was incomplete and the form stays open.
    pub fn submit_entry(&mut self) -> Option<ExperienceEntry> {
        self.submit_entry_with(EntryStamp::now())
    }

    pub fn submit_entry_with(&mut self, stamp: EntryStamp) -> Option<ExperienceEntry> {
        let id = stamp.id.clone();
        self.dispatch(Event::SubmitEntry(stamp));
        self.state
            .ledger
            .network_feed()
            .first()
            .filter(|entry| entry.id == id)
            .cloned()
    }

    pub fn my_entries(&self) -> Vec<ExperienceEntry> {
        self.state.ledger.my_entries()
    }

    pub fn network_feed(&self) -> &[ExperienceEntry] {
        self.state.ledger.network_feed()
    }
}
