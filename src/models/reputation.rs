use serde::{Deserialize, Serialize};

/// Success rate at or above which a customer is shown as a safe profile.
pub const SAFE_PROFILE_THRESHOLD: f64 = 80.0;

/// Delivery reputation of a single phone number.
///
/// `success_rate` is derived from the two counters and is never set on its own;
/// the only way to build a record is [`ReputationRecord::new`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReputationRecord {
    pub phone: String,
    pub success_count: u32,
    pub return_count: u32,
    success_rate: f64,
    pub last_order_date: String,
}

impl ReputationRecord {
    pub fn new(
        phone: impl Into<String>,
        success_count: u32,
        return_count: u32,
        last_order_date: impl Into<String>,
    ) -> Self {
        Self {
            phone: phone.into(),
            success_count,
            return_count,
            success_rate: success_rate(success_count, return_count),
            last_order_date: last_order_date.into(),
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_rate(self.success_rate)
    }
}

impl<'de> Deserialize<'de> for ReputationRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Any incoming rate is discarded and recomputed from the counts.
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            phone: String,
            success_count: u32,
            return_count: u32,
            last_order_date: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(ReputationRecord::new(
            raw.phone,
            raw.success_count,
            raw.return_count,
            raw.last_order_date,
        ))
    }
}

/// Percentage of successful deliveries rounded to one decimal, `0.0` when there
/// is no history at all.
pub fn success_rate(success_count: u32, return_count: u32) -> f64 {
    let total = u64::from(success_count) + u64::from(return_count);
    if total == 0 {
        return 0.0;
    }

    let rate = success_count as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    SafeProfile,
    HighRisk,
}

impl RiskLevel {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= SAFE_PROFILE_THRESHOLD {
            RiskLevel::SafeProfile
        } else {
            RiskLevel::HighRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::SafeProfile => "Safe Profile",
            RiskLevel::HighRisk => "High Risk",
        }
    }
}
