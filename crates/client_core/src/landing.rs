use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    query::PageQuery,
    render,
    view::{CheckoutSelection, LandingSurface},
    ApiClient,
};

const LEADERBOARD_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub const LEADERBOARD_FAILURE_TEXT: &str = "Failed to load leaderboard.";
pub const PACKAGES_FAILURE_TEXT: &str = "Failed to load packages. Please refresh the page.";
pub const CHECKOUT_DECLINED_ALERT: &str = "Error creating checkout session. Please try again.";

/// Drives the landing page: the public leaderboard, the package catalog,
/// and checkout initiation. Failures are consumed here and rendered through
/// the surface.
pub struct LandingController {
    api: ApiClient,
    surface: Arc<dyn LandingSurface>,
    load_generation: AtomicU64,
    rendered_generation: AtomicU64,
}

impl LandingController {
    pub fn new(api: ApiClient, surface: Arc<dyn LandingSurface>) -> Self {
        Self {
            api,
            surface,
            load_generation: AtomicU64::new(0),
            rendered_generation: AtomicU64::new(0),
        }
    }

    /// Page-load entry point: the leaderboard and the catalog load
    /// concurrently, and this returns once both have settled. The periodic
    /// leaderboard refresh is started separately via
    /// `spawn_leaderboard_refresh`.
    pub async fn open(&self, query: &PageQuery) {
        tokio::join!(self.load_leaderboard(), self.load_packages(&query.referrer));
    }

    /// Fetches the leaderboard and re-renders it wholesale. Loads under the
    /// periodic refresh can complete out of order; only an outcome newer
    /// than everything already rendered may touch the surface.
    pub async fn load_leaderboard(&self) {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.api.fetch_leaderboard().await {
            Ok(entries) => {
                if !self.claim_render(generation) {
                    return;
                }
                self.surface
                    .replace_leaderboard(render::leaderboard_rows(&entries));
                self.surface.clear_leaderboard_loading();
            }
            Err(err) => {
                if !self.claim_render(generation) {
                    return;
                }
                error!(error = %err, "leaderboard load failed");
                self.surface.fail_leaderboard_loading(LEADERBOARD_FAILURE_TEXT);
            }
        }
    }

    /// Marks `generation` as rendered if it is newer than the current
    /// high-water mark; a false return means a newer load already rendered.
    fn claim_render(&self, generation: u64) -> bool {
        let mut rendered = self.rendered_generation.load(Ordering::SeqCst);
        loop {
            if generation <= rendered {
                return false;
            }
            match self.rendered_generation.compare_exchange(
                rendered,
                generation,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(actual) => rendered = actual,
            }
        }
    }

    /// Renders the package grid. The referrer is baked into every card's
    /// selection action; a failure replaces the whole grid with an error
    /// message, never a partial card list.
    pub async fn load_packages(&self, referrer: &str) {
        match self.api.fetch_packages().await {
            Ok(packages) => {
                self.surface
                    .replace_packages(render::package_cards(&packages, referrer));
            }
            Err(err) => {
                error!(error = %err, "package catalog load failed");
                self.surface.fail_packages(PACKAGES_FAILURE_TEXT);
            }
        }
    }

    /// Starts a checkout session for the selection and hands the visitor to
    /// the returned payment URL. A declined or failed attempt alerts and
    /// stays on the page; nothing is retried.
    pub async fn select_package(&self, selection: &CheckoutSelection) {
        match self.api.create_checkout_session(selection).await {
            Ok(response) => match response.checkout_url {
                Some(url) => {
                    if let Some(session_id) = response.session_id.as_deref() {
                        info!(session_id, "checkout session created");
                    }
                    self.surface.navigate(&url);
                }
                None => {
                    warn!(package_id = %selection.package_id, "checkout response carried no redirect URL");
                    self.surface.show_alert(CHECKOUT_DECLINED_ALERT);
                }
            },
            Err(err) => {
                error!(error = %err, package_id = %selection.package_id, "checkout session request failed");
                self.surface.show_alert(&format!("Error: {err}"));
            }
        }
    }

    /// Re-fetches the leaderboard once a minute for the page's lifetime.
    /// Each tick detaches its load so a slow response never delays the next
    /// tick; the guard in `load_leaderboard` keeps whatever lands late from
    /// clobbering a newer render.
    pub fn spawn_leaderboard_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(LEADERBOARD_REFRESH_INTERVAL);
            // The first tick completes immediately; the page-load fetch
            // already covers it.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    controller.load_leaderboard().await;
                });
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/landing_tests.rs"]
mod tests;
