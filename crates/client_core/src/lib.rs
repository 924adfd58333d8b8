use reqwest::Client;
use shared::{
    domain::Identity,
    protocol::{
        AccountStats, CheckoutRequest, CheckoutResponse, LeaderboardEntry, LeaderboardResponse,
        PackageCatalogResponse, PackageSummary, UserStatsResponse,
    },
};

mod dashboard;
pub mod error;
mod landing;
pub mod query;
pub mod render;
pub mod view;

pub use dashboard::DashboardController;
pub use error::FetchError;
pub use landing::LandingController;

use crate::view::CheckoutSelection;

/// Typed client for the affiliate backend's JSON endpoints.
///
/// Holds a connection-pooling HTTP client, so one instance should be reused
/// for the lifetime of a page rather than rebuilt per request.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the backend origin, e.g. `http://127.0.0.1:5000`. A
    /// trailing slash is tolerated and stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the account record behind an identity.
    ///
    /// The backend reports lookup failures in-band (a non-2xx status with a
    /// JSON body carrying `error`), so the body is decoded regardless of
    /// status. An account is returned only when the status is 2xx, the
    /// success flag is set, and the user payload is present; anything else
    /// is a rejection carrying the server's message when it sent one.
    pub async fn fetch_user_stats(&self, identity: &Identity) -> Result<AccountStats, FetchError> {
        let response = self
            .http
            .get(format!("{}/api/user/{}", self.base_url, identity))
            .send()
            .await?;
        let status = response.status();
        let body: UserStatsResponse = response.json().await?;

        if status.is_success() && body.success {
            if let Some(user) = body.user {
                return Ok(user);
            }
        }
        Err(FetchError::Rejected {
            message: body.error,
        })
    }

    pub async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, FetchError> {
        let body: LeaderboardResponse = self
            .http
            .get(format!("{}/api/leaderboard", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.leaderboard)
    }

    /// Fetches the package catalog. A response without a `packages` array
    /// fails to decode and surfaces as a transport error.
    pub async fn fetch_packages(&self) -> Result<Vec<PackageSummary>, FetchError> {
        let body: PackageCatalogResponse = self
            .http
            .get(format!("{}/api/packages", self.base_url))
            .send()
            .await?
            .json()
            .await?;
        Ok(body.packages)
    }

    /// Starts a checkout session for a package selection.
    ///
    /// The status line is deliberately ignored: the backend signals a
    /// declined session by omitting `checkout_url` from the body, and the
    /// caller decides what to do with the absence.
    pub async fn create_checkout_session(
        &self,
        selection: &CheckoutSelection,
    ) -> Result<CheckoutResponse, FetchError> {
        let body: CheckoutResponse = self
            .http
            .post(format!("{}/api/create-checkout-session", self.base_url))
            .json(&CheckoutRequest {
                package_id: selection.package_id.clone(),
                referrer: selection.referrer.clone(),
            })
            .send()
            .await?
            .json()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
