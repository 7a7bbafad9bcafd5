use std::collections::HashMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::models::reputation::ReputationRecord;

const SYNTHETIC_SUCCESS_RANGE: Range<u32> = 0..20;
const SYNTHETIC_RETURN_RANGE: Range<u32> = 0..5;
const UNKNOWN_LAST_ORDER: &str = "N/A";

struct KnownHistory {
    success_count: u32,
    return_count: u32,
    last_order_date: &'static str,
}

static KNOWN_HISTORY: Lazy<HashMap<&'static str, KnownHistory>> = Lazy::new(|| {
    HashMap::from([
        (
            "01711223344",
            KnownHistory {
                success_count: 45,
                return_count: 2,
                last_order_date: "2023-11-20",
            },
        ),
        (
            "01911223344",
            KnownHistory {
                success_count: 5,
                return_count: 8,
                last_order_date: "2023-11-15",
            },
        ),
    ])
});

/// Resolves a phone number to its delivery reputation.
///
/// Numbers in the static table return their stored history. Anything else gets
/// a synthesized history drawn from the service's random source, which can be
/// seeded for reproducible results.
pub struct ReputationService {
    rng: StdRng,
}

impl ReputationService {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Returns `None` for blank input, in which case no lookup happens.
    pub fn lookup(&mut self, phone: &str) -> Option<ReputationRecord> {
        let phone = phone.trim();
        if phone.is_empty() {
            return None;
        }

        if let Some(record) = known_record(phone) {
            debug!(target: "app::reputation", phone, "known history");
            return Some(record);
        }

        let success_count = self.rng.gen_range(SYNTHETIC_SUCCESS_RANGE);
        let return_count = self.rng.gen_range(SYNTHETIC_RETURN_RANGE);
        debug!(
            target: "app::reputation",
            phone,
            success_count,
            return_count,
            "synthesized history"
        );

        Some(ReputationRecord::new(
            phone,
            success_count,
            return_count,
            UNKNOWN_LAST_ORDER,
        ))
    }
}

impl Default for ReputationService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn known_record(phone: &str) -> Option<ReputationRecord> {
    KNOWN_HISTORY.get(phone).map(|history| {
        ReputationRecord::new(
            phone,
            history.success_count,
            history.return_count,
            history.last_order_date,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reputation::success_rate;

    #[test]
    fn known_number_returns_stored_record() {
        let mut service = ReputationService::seeded(7);
        let record = service.lookup("01711223344").unwrap();

        assert_eq!(record.phone, "01711223344");
        assert_eq!(record.success_count, 45);
        assert_eq!(record.return_count, 2);
        assert_eq!(record.success_rate(), 95.7);
        assert_eq!(record.last_order_date, "2023-11-20");
    }

    #[test]
    fn second_known_number_reports_formula_rate() {
        let record = known_record("01911223344").unwrap();
        assert_eq!(record.success_count, 5);
        assert_eq!(record.return_count, 8);
        assert_eq!(record.success_rate(), 38.5);
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut service = ReputationService::seeded(1);
        assert!(service.lookup("").is_none());
        assert!(service.lookup("   ").is_none());
    }

    #[test]
    fn input_is_trimmed_before_matching() {
        let mut service = ReputationService::seeded(1);
        let record = service.lookup("  01711223344 ").unwrap();
        assert_eq!(record.success_count, 45);
        assert_eq!(record.phone, "01711223344");
    }

    #[test]
    fn unknown_number_gets_bounded_counts_and_consistent_rate() {
        let mut service = ReputationService::seeded(42);

        for attempt in 0..200 {
            let phone = format!("0155{attempt:07}");
            let record = service.lookup(&phone).unwrap();

            assert_eq!(record.phone, phone);
            assert!(record.success_count < 20);
            assert!(record.return_count < 5);
            assert_eq!(record.last_order_date, "N/A");
            assert_eq!(
                record.success_rate(),
                success_rate(record.success_count, record.return_count)
            );
        }
    }

    #[test]
    fn same_seed_reproduces_synthesized_records() {
        let mut first = ReputationService::seeded(99);
        let mut second = ReputationService::seeded(99);

        for _ in 0..10 {
            assert_eq!(first.lookup("01800000000"), second.lookup("01800000000"));
        }
    }
}
