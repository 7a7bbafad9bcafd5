use serde::{Deserialize, Serialize};

/// Top-level tabs of the application.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
    #[default]
    FraudCheck,
    MyEntries,
    RecentActivity,
}

impl ViewType {
    pub const ALL: [ViewType; 3] = [
        ViewType::FraudCheck,
        ViewType::MyEntries,
        ViewType::RecentActivity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewType::FraudCheck => "fraud-check",
            ViewType::MyEntries => "my-entries",
            ViewType::RecentActivity => "recent-activity",
        }
    }
}
