//! Pure state transitions for the single-screen application.
//!
//! [`reduce`] takes the current [`ViewState`] and an [`Event`] and returns the
//! next state together with at most one [`Effect`] for the caller to run. It
//! performs no I/O, so every transition can be exercised without a renderer.

use serde::Serialize;
use tracing::debug;

use crate::models::experience::{DraftRating, EntryStamp, ExperienceDraft, MY_STORE_MARKER};
use crate::models::reputation::ReputationRecord;
use crate::models::view::ViewType;
use crate::services::ledger_service::ExperienceLedger;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub active_view: ViewType,
    pub search_input: String,
    pub current_customer: Option<ReputationRecord>,
    pub insight: Option<String>,
    pub loading: bool,
    pub show_add_entry: bool,
    pub draft: ExperienceDraft,
    pub form_error: Option<String>,
    pub ledger: ExperienceLedger,
}

impl ViewState {
    /// Stand-in left behind while the real state is moved through [`reduce`].
    /// Holds an empty ledger so swapping it in allocates nothing.
    pub(crate) fn vacant() -> Self {
        Self {
            active_view: ViewType::default(),
            search_input: String::new(),
            current_customer: None,
            insight: None,
            loading: false,
            show_add_entry: false,
            draft: ExperienceDraft::default(),
            form_error: None,
            ledger: ExperienceLedger::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectView(ViewType),
    SearchInputChanged(String),
    SearchSubmitted,
    CustomerLoaded(ReputationRecord),
    InsightResolved(String),
    OpenAddEntry,
    CloseAddEntry,
    DraftPhoneChanged(String),
    DraftRatingChanged(DraftRating),
    DraftCommentChanged(String),
    SubmitEntry(EntryStamp),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LookupCustomer(String),
    FetchInsight(ReputationRecord),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn idle(state: ViewState) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    fn with_effect(state: ViewState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

pub fn reduce(mut state: ViewState, event: Event) -> Transition {
    match event {
        Event::SelectView(view) => {
            debug!(target: "app::view", view = view.as_str(), "tab selected");
            state.active_view = view;
            Transition::idle(state)
        }
        Event::SearchInputChanged(value) => {
            state.search_input = value;
            Transition::idle(state)
        }
        Event::SearchSubmitted => {
            let phone = state.search_input.trim().to_string();
            if phone.is_empty() || state.loading {
                debug!(
                    target: "app::view",
                    loading = state.loading,
                    "search ignored"
                );
                return Transition::idle(state);
            }

            state.loading = true;
            state.insight = None;
            Transition::with_effect(state, Effect::LookupCustomer(phone))
        }
        Event::CustomerLoaded(record) => {
            state.current_customer = Some(record.clone());
            Transition::with_effect(state, Effect::FetchInsight(record))
        }
        Event::InsightResolved(text) => {
            state.insight = Some(text);
            state.loading = false;
            Transition::idle(state)
        }
        Event::OpenAddEntry => {
            state.show_add_entry = true;
            Transition::idle(state)
        }
        Event::CloseAddEntry => {
            state.show_add_entry = false;
            state.form_error = None;
            Transition::idle(state)
        }
        Event::DraftPhoneChanged(value) => {
            state.draft.phone = value;
            Transition::idle(state)
        }
        Event::DraftRatingChanged(rating) => {
            state.draft.rating = rating;
            Transition::idle(state)
        }
        Event::DraftCommentChanged(value) => {
            state.draft.comment = value;
            Transition::idle(state)
        }
        Event::SubmitEntry(stamp) => {
            match state.ledger.append(MY_STORE_MARKER, &state.draft, stamp) {
                Ok(_) => {
                    state.show_add_entry = false;
                    state.draft = ExperienceDraft::default();
                    state.form_error = None;
                }
                Err(error) => {
                    state.form_error = Some(error.to_string());
                }
            }
            Transition::idle(state)
        }
    }
}
