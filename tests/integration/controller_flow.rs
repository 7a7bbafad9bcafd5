use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use trustshield_app_lib::error::{AppError, AppResult, InsightErrorCode};
use trustshield_app_lib::models::experience::{
    DraftRating, EntryStamp, ExperienceDraft, Rating, MY_STORE_MARKER,
};
use trustshield_app_lib::models::insight::FALLBACK_INSIGHT;
use trustshield_app_lib::models::reputation::{success_rate, ReputationRecord, RiskLevel};
use trustshield_app_lib::models::view::ViewType;
use trustshield_app_lib::services::controller::AppController;
use trustshield_app_lib::services::insight_service::{InsightProvider, InsightService};
use trustshield_app_lib::services::reputation_service::ReputationService;

struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl InsightProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, record: &ReputationRecord) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{} is {}.", record.phone, record.risk_level().label()))
    }
}

struct OutageProvider;

#[async_trait]
impl InsightProvider for OutageProvider {
    fn name(&self) -> &str {
        "outage"
    }

    async fn generate(&self, _record: &ReputationRecord) -> AppResult<String> {
        Err(AppError::insight(
            InsightErrorCode::ProviderUnavailable,
            "simulated downstream failure",
        ))
    }
}

fn controller_with(provider: Arc<dyn InsightProvider>) -> AppController {
    let insights = InsightService::with_provider(provider, StdDuration::from_secs(2));
    AppController::new(ReputationService::seeded(2024), Arc::new(insights))
}

#[tokio::test]
async fn known_number_search_shows_stored_history_and_insight() {
    let provider = Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    });
    let mut controller = controller_with(provider.clone());

    let record = controller.search("01711223344").await.expect("search should run");

    assert_eq!(record.success_count, 45);
    assert_eq!(record.return_count, 2);
    assert_eq!(record.success_rate(), 95.7);
    assert_eq!(record.risk_level(), RiskLevel::SafeProfile);

    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.current_customer.as_ref(), Some(&record));
    assert_eq!(state.insight.as_deref(), Some("01711223344 is Safe Profile."));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_number_uses_its_own_synthesized_counts() {
    let mut controller = controller_with(Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    }));

    let record = controller.search("01555000111").await.expect("search should run");

    assert_eq!(record.phone, "01555000111");
    assert_eq!(record.last_order_date, "N/A");
    assert_eq!(
        record.success_rate(),
        success_rate(record.success_count, record.return_count)
    );
}

#[tokio::test]
async fn downstream_failure_surfaces_fallback_sentence() {
    let mut controller = controller_with(Arc::new(OutageProvider));

    controller.search("01911223344").await.expect("search should run");

    let state = controller.state();
    assert_eq!(state.insight.as_deref(), Some(FALLBACK_INSIGHT));
    assert!(!state.loading);
    assert_eq!(
        state.current_customer.as_ref().map(|r| r.risk_level()),
        Some(RiskLevel::HighRisk)
    );
}

#[tokio::test]
async fn split_search_blocks_reentry_until_resolved() {
    let provider = Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    });
    let mut controller = controller_with(provider.clone());

    let pending = controller.begin_search("01711223344").expect("lookup should start");
    assert!(controller.state().loading);
    assert!(controller.begin_search("01911223344").is_none());

    let insight = controller.insights().insight_for(&pending).await;
    controller.complete_search(insight);
    assert!(!controller.state().loading);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    assert!(controller.begin_search("01911223344").is_some());
}

#[tokio::test]
async fn submitted_entry_appears_in_both_projections() {
    let mut controller = controller_with(Arc::new(OutageProvider));
    let feed_before = controller.network_feed().len();

    controller.select_view(ViewType::MyEntries);
    controller.open_add_entry();
    controller.update_draft(ExperienceDraft {
        phone: "01822334455".to_string(),
        rating: DraftRating::Positive,
        comment: "Paid on arrival".to_string(),
    });
    controller.set_draft_rating(DraftRating::Negative);

    let entry = controller
        .submit_entry_with(EntryStamp::new("local-1", "2024-06-01, 11:15 AM"))
        .expect("complete draft should be accepted");

    assert_eq!(entry.rating, Rating::Negative);
    assert_eq!(entry.merchant_name, MY_STORE_MARKER);
    assert_eq!(entry.display_date(), "2024-06-01");
    assert_eq!(controller.network_feed().len(), feed_before + 1);
    assert_eq!(controller.network_feed()[0], entry);
    assert_eq!(controller.my_entries(), vec![entry]);

    let state = controller.state();
    assert!(!state.show_add_entry);
    assert_eq!(state.draft, ExperienceDraft::default());
    assert_eq!(state.active_view, ViewType::MyEntries);
}
