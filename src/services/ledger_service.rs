use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::experience::{
    EntryStamp, ExperienceDraft, ExperienceEntry, Rating, MY_STORE_MARKER,
};

/// Append-only list of community experience reports, newest first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExperienceLedger {
    entries: Vec<ExperienceEntry>,
}

impl ExperienceLedger {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Ledger preloaded with the community reports every install starts with.
    pub fn seeded() -> Self {
        Self {
            entries: vec![
                ExperienceEntry {
                    id: "1".to_string(),
                    merchant_name: "Shopify Pro".to_string(),
                    customer_phone: "01911223344".to_string(),
                    rating: Rating::Negative,
                    comment: "Always makes excuses after arrival. Beware.".to_string(),
                    timestamp: "2023-11-25 10:30 AM".to_string(),
                },
                ExperienceEntry {
                    id: "2".to_string(),
                    merchant_name: "Gadget BD".to_string(),
                    customer_phone: "01711223344".to_string(),
                    rating: Rating::Positive,
                    comment: "Excellent customer, prompt payment.".to_string(),
                    timestamp: "2023-11-24 02:15 PM".to_string(),
                },
            ],
        }
    }

    /// Records a new entry posted by `merchant_name` and returns it.
    pub fn append(
        &mut self,
        merchant_name: &str,
        draft: &ExperienceDraft,
        stamp: EntryStamp,
    ) -> AppResult<ExperienceEntry> {
        let phone = draft.phone.trim();
        let comment = draft.comment.trim();

        let mut missing = Vec::new();
        if phone.is_empty() {
            missing.push("phone");
        }
        if comment.is_empty() {
            missing.push("comment");
        }
        if !missing.is_empty() {
            return Err(AppError::validation_with_details(
                "required fields are missing",
                json!({ "missingFields": missing }),
            ));
        }

        let entry = ExperienceEntry {
            id: stamp.id,
            merchant_name: merchant_name.to_string(),
            customer_phone: phone.to_string(),
            rating: draft.rating.into(),
            comment: comment.to_string(),
            timestamp: stamp.timestamp,
        };

        info!(
            target: "app::ledger",
            id = %entry.id,
            merchant = %entry.merchant_name,
            rating = entry.rating.as_str(),
            "experience entry recorded"
        );

        self.entries.insert(0, entry.clone());
        Ok(entry)
    }

    pub fn authored_by<'a>(
        &'a self,
        marker: &'a str,
    ) -> impl Iterator<Item = &'a ExperienceEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.is_authored_by(marker))
    }

    pub fn my_entries(&self) -> Vec<ExperienceEntry> {
        self.authored_by(MY_STORE_MARKER).cloned().collect()
    }

    pub fn network_feed(&self) -> &[ExperienceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExperienceLedger {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::experience::DraftRating;

    fn draft(phone: &str, comment: &str) -> ExperienceDraft {
        ExperienceDraft {
            phone: phone.to_string(),
            rating: DraftRating::Negative,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn seeded_ledger_has_no_local_entries() {
        let ledger = ExperienceLedger::seeded();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.my_entries().is_empty());
        assert_eq!(ledger.network_feed()[0].merchant_name, "Shopify Pro");
    }

    #[test]
    fn append_prepends_and_marks_authorship() {
        let mut ledger = ExperienceLedger::seeded();
        let before = ledger.network_feed().len();

        let entry = ledger
            .append(
                MY_STORE_MARKER,
                &draft(" 01811111111 ", " Refused at the door "),
                EntryStamp::new("abc", "2024-01-01, 09:00 AM"),
            )
            .unwrap();

        assert_eq!(ledger.network_feed().len(), before + 1);
        assert_eq!(ledger.network_feed()[0], entry);
        assert_eq!(entry.customer_phone, "01811111111");
        assert_eq!(entry.comment, "Refused at the door");
        assert_eq!(entry.rating, Rating::Negative);
        assert_eq!(entry.merchant_name, MY_STORE_MARKER);
        assert_eq!(ledger.my_entries(), vec![entry]);
    }

    #[test]
    fn my_entries_filter_by_marker_only() {
        let mut ledger = ExperienceLedger::empty();
        ledger
            .append(MY_STORE_MARKER, &draft("1", "a"), EntryStamp::new("a", "t1"))
            .unwrap();
        ledger
            .append(MY_STORE_MARKER, &draft("2", "b"), EntryStamp::new("b", "t2"))
            .unwrap();

        assert_eq!(ledger.authored_by("Gadget BD").count(), 0);
        let ids: Vec<_> = ledger.my_entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn foreign_marker_reaches_feed_but_not_my_entries() {
        let mut ledger = ExperienceLedger::seeded();
        let before = ledger.len();

        let entry = ledger
            .append(
                "Gadget BD",
                &draft("01822334455", "Paid in full"),
                EntryStamp::new("g1", "2024-02-02, 08:00 PM"),
            )
            .unwrap();

        assert_eq!(ledger.len(), before + 1);
        assert_eq!(ledger.network_feed()[0], entry);
        assert_eq!(entry.merchant_name, "Gadget BD");
        assert!(ledger.my_entries().is_empty());
        assert_eq!(ledger.authored_by("Gadget BD").next(), Some(&entry));
    }

    #[test]
    fn blank_fields_are_rejected_without_mutation() {
        let mut ledger = ExperienceLedger::seeded();
        let error = ledger
            .append(MY_STORE_MARKER, &draft("  ", ""), EntryStamp::new("x", "t"))
            .unwrap_err();

        match error {
            AppError::Validation { details, .. } => {
                assert_eq!(
                    details.unwrap()["missingFields"],
                    json!(["phone", "comment"])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ledger.len(), 2);
    }
}
