use serde::{Deserialize, Serialize};

/// Aggregate counts from `GET /admin/overview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    #[serde(default)]
    pub total_courts: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_members: u64,
    #[serde(default)]
    pub total_bookings: u64,
}
