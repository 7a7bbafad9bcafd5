use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Merchant name carried by every entry posted from this device.
pub const MY_STORE_MARKER: &str = "My Store";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d, %I:%M %p";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Negative,
    Neutral,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Positive => "positive",
            Rating::Negative => "negative",
            Rating::Neutral => "neutral",
        }
    }
}

/// The two outcomes a merchant can pick in the submission form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DraftRating {
    #[default]
    Positive,
    Negative,
}

impl From<DraftRating> for Rating {
    fn from(value: DraftRating) -> Self {
        match value {
            DraftRating::Positive => Rating::Positive,
            DraftRating::Negative => Rating::Negative,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub merchant_name: String,
    pub customer_phone: String,
    pub rating: Rating,
    pub comment: String,
    pub timestamp: String,
}

impl ExperienceEntry {
    /// Date part of the timestamp, i.e. everything before the first comma.
    pub fn display_date(&self) -> &str {
        self.timestamp
            .split(',')
            .next()
            .unwrap_or(self.timestamp.as_str())
    }

    /// Phone number as shown on the network feed: first five characters then `***`.
    pub fn masked_phone(&self) -> String {
        let prefix: String = self.customer_phone.chars().take(5).collect();
        format!("{prefix}***")
    }

    pub fn is_authored_by(&self, marker: &str) -> bool {
        self.merchant_name == marker
    }
}

/// Contents of the add-entry form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceDraft {
    pub phone: String,
    pub rating: DraftRating,
    pub comment: String,
}

impl ExperienceDraft {
    pub fn is_complete(&self) -> bool {
        !self.phone.trim().is_empty() && !self.comment.trim().is_empty()
    }
}

/// Identity and creation time assigned to a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStamp {
    pub id: String,
    pub timestamp: String,
}

impl EntryStamp {
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
