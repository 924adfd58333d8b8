use std::{sync::Arc, time::Duration};

use tracing::{error, warn};

use shared::domain::Identity;
use storage::IdentityStore;

use crate::{error::FetchError, query::PageQuery, render, view::DashboardSurface, ApiClient};

const VERIFICATION_NOTICE_TTL: Duration = Duration::from_secs(5);

pub const DASHBOARD_LOAD_FALLBACK_ALERT: &str =
    "Failed to load dashboard. Please check your username.";
pub const NETWORK_ERROR_ALERT: &str = "Network error. Please try again.";

/// Drives the dashboard page: resolves which account to show, fetches its
/// stats, and renders them through the injected surface. Failures are
/// consumed here; no page operation returns an error to the caller.
pub struct DashboardController {
    api: ApiClient,
    identity_store: Arc<dyn IdentityStore>,
    surface: Arc<dyn DashboardSurface>,
}

impl DashboardController {
    pub fn new(
        api: ApiClient,
        identity_store: Arc<dyn IdentityStore>,
        surface: Arc<dyn DashboardSurface>,
    ) -> Self {
        Self {
            api,
            identity_store,
            surface,
        }
    }

    /// Page-load entry point. Shows the email-verification notice for a few
    /// seconds when the query flag is set, then loads the dashboard with no
    /// form input.
    pub async fn open(&self, query: &PageQuery) {
        if query.verified {
            self.surface.set_verification_notice(true);
            let surface = Arc::clone(&self.surface);
            tokio::spawn(async move {
                tokio::time::sleep(VERIFICATION_NOTICE_TTL).await;
                surface.set_verification_notice(false);
            });
        }
        self.load(None).await;
    }

    /// Loads and renders the account behind the resolved identity.
    /// `form_input` carries the login form's field value when the visitor
    /// submitted one; otherwise the remembered identity is used.
    pub async fn load(&self, form_input: Option<&str>) {
        let Some(identity) = self.resolve_identity(form_input).await else {
            self.surface.show_login_prompt();
            return;
        };

        match self.api.fetch_user_stats(&identity).await {
            Ok(stats) => {
                // Remember the identity only once the server has vouched
                // for it; a failed write is not worth interrupting the page.
                if let Err(err) = self.identity_store.save(&identity).await {
                    warn!(error = %err, "failed to remember identity");
                }
                self.surface
                    .show_dashboard(render::stat_panel(&stats), render::referral_rows(&stats.referrals));
            }
            Err(FetchError::Rejected { message }) => {
                let message = message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DASHBOARD_LOAD_FALLBACK_ALERT.to_owned());
                self.surface.show_alert(&message);
                self.surface.show_login_prompt();
            }
            Err(FetchError::Transport(err)) => {
                error!(error = %err, username = %identity, "dashboard load failed");
                self.surface.show_alert(NETWORK_ERROR_ALERT);
                self.surface.show_login_prompt();
            }
        }
    }

    /// Form input outranks the remembered identity. A store read failure
    /// degrades to no remembered identity rather than surfacing.
    async fn resolve_identity(&self, form_input: Option<&str>) -> Option<Identity> {
        if let Some(identity) = form_input.and_then(Identity::parse) {
            return Some(identity);
        }
        match self.identity_store.load().await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "failed to read remembered identity");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
