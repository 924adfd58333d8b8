use serde::{Deserialize, Serialize};

use crate::domain::PackageId;

/// Envelope returned by `GET /api/user/{username}`. The backend reports
/// application failures in-band: `success` is false (or absent) and `error`
/// carries the message, regardless of HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStats {
    pub username: String,
    pub tier: String,
    pub daily_rate: f64,
    pub total_referrals: u32,
    pub total_earnings: f64,
    pub affiliate_link: String,
    #[serde(default)]
    pub referrals: Vec<ReferralSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralSummary {
    pub name: String,
    pub username: String,
    pub joined: String,
    pub tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub username: String,
    pub earnings: f64,
    pub referrals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageCatalogResponse {
    pub packages: Vec<PackageSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSummary {
    pub id: PackageId,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub package_id: PackageId,
    pub referrer: String,
}

/// A checkout session was created when `checkout_url` is present; a
/// well-formed body without one means the backend declined the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}
