use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    query::PageQuery,
    view::{
        CheckoutSelection, DashboardSurface, LandingSurface, PackageCard, RegionContent, StatPanel,
    },
    ApiClient, DashboardController, LandingController,
};
use shared::domain::PackageId;
use storage::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
use tracing::warn;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    /// Backend origin; overrides portal.toml and environment settings.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the affiliate dashboard.
    Dashboard {
        /// Look up this username instead of the remembered one.
        #[arg(long)]
        username: Option<String>,
        /// Page URL whose query string carries flags like `verified`.
        #[arg(long)]
        page_url: Option<String>,
    },
    /// Show the landing page: leaderboard and package catalog.
    Landing {
        /// Page URL whose query string carries the `ref` referrer.
        #[arg(long)]
        page_url: Option<String>,
        /// Stay open and refresh the leaderboard periodically.
        #[arg(long)]
        watch: bool,
    },
    /// Start a checkout session for a package.
    Checkout {
        #[arg(long)]
        package_id: String,
        /// Page URL whose query string carries the `ref` referrer.
        #[arg(long)]
        page_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let api = ApiClient::new(settings.server_url);

    match args.command {
        Command::Dashboard { username, page_url } => {
            let controller =
                DashboardController::new(api, identity_store(), Arc::new(TerminalSurface));
            match username {
                Some(username) => controller.load(Some(&username)).await,
                None => controller.open(&page_query(page_url.as_deref())).await,
            }
        }
        Command::Landing { page_url, watch } => {
            let controller = Arc::new(LandingController::new(api, Arc::new(TerminalSurface)));
            controller.open(&page_query(page_url.as_deref())).await;
            if watch {
                let refresh = controller.spawn_leaderboard_refresh();
                tokio::signal::ctrl_c().await?;
                refresh.abort();
            }
        }
        Command::Checkout {
            package_id,
            page_url,
        } => {
            let controller = LandingController::new(api, Arc::new(TerminalSurface));
            let selection = CheckoutSelection {
                package_id: PackageId(package_id),
                referrer: page_query(page_url.as_deref()).referrer,
            };
            controller.select_package(&selection).await;
        }
    }

    Ok(())
}

fn page_query(page_url: Option<&str>) -> PageQuery {
    page_url.map(PageQuery::from_url).unwrap_or_default()
}

fn identity_store() -> Arc<dyn IdentityStore> {
    match FileIdentityStore::open_default() {
        Some(store) => Arc::new(store),
        None => {
            warn!("no writable data directory; the identity will not be remembered");
            Arc::new(MemoryIdentityStore::new())
        }
    }
}

/// Renders page output as plain terminal lines.
struct TerminalSurface;

impl TerminalSurface {
    fn print_region(&self, content: &RegionContent) {
        match content {
            RegionContent::Rows(rows) => {
                for row in rows {
                    let marker = if row.decorated { "* " } else { "  " };
                    println!("{marker}{} | {}", row.heading, row.detail);
                }
            }
            RegionContent::Placeholder(text) => println!("  {text}"),
        }
    }
}

impl DashboardSurface for TerminalSurface {
    fn show_login_prompt(&self) {
        println!("Please log in with your username to see your dashboard.");
    }

    fn show_dashboard(&self, stats: StatPanel, referrals: RegionContent) {
        println!("{} ({} tier)", stats.username, stats.tier);
        println!("Daily rate: {}", stats.daily_rate);
        println!("Total referrals: {}", stats.total_referrals);
        println!("Total earnings: {}", stats.total_earnings);
        println!("Affiliate link: {}", stats.affiliate_link);
        println!("Referrals:");
        self.print_region(&referrals);
    }

    fn show_alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn set_verification_notice(&self, visible: bool) {
        if visible {
            println!("Your email has been verified.");
        }
    }
}

impl LandingSurface for TerminalSurface {
    fn replace_leaderboard(&self, content: RegionContent) {
        println!("Leaderboard:");
        self.print_region(&content);
    }

    fn clear_leaderboard_loading(&self) {}

    fn fail_leaderboard_loading(&self, message: &str) {
        println!("  {message}");
    }

    fn replace_packages(&self, cards: Vec<PackageCard>) {
        println!("Packages:");
        for card in cards {
            println!("  {}", card.title);
            for feature in card.features {
                println!("    - {feature}");
            }
            println!("    [{}]", card.action_label);
        }
    }

    fn fail_packages(&self, message: &str) {
        println!("  {message}");
    }

    fn show_alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn navigate(&self, url: &str) {
        println!("Continue to checkout: {url}");
    }
}
