use chrono::{DateTime, NaiveDate, NaiveDateTime};

use shared::protocol::{AccountStats, LeaderboardEntry, PackageSummary, ReferralSummary};

use crate::view::{CheckoutSelection, PackageCard, RegionContent, Row, StatPanel};

pub const EMPTY_REFERRALS_PLACEHOLDER: &str =
    "No referrals yet. Share your affiliate link to start earning!";
pub const EMPTY_LEADERBOARD_PLACEHOLDER: &str = "No leaderboard data yet. Be the first!";

/// Marketing bullets shown on every package card.
pub const PACKAGE_FEATURES: &[&str] = &[
    "Premium domain space rental",
    "Subdomain access on RizzosAI.com",
    "Affiliate link & commission system",
    "Dashboard access",
    "Leaderboard tracking",
    "Email support",
];

const JOIN_DATE_FORMAT: &str = "%b %-d, %Y";

/// Money fields keep the server's value verbatim behind a `$` prefix; no
/// client-side rounding.
pub fn stat_panel(stats: &AccountStats) -> StatPanel {
    StatPanel {
        username: stats.username.clone(),
        tier: stats.tier.to_uppercase(),
        daily_rate: format!("${}", stats.daily_rate),
        total_referrals: stats.total_referrals,
        total_earnings: format!("${}", stats.total_earnings),
        affiliate_link: stats.affiliate_link.clone(),
    }
}

pub fn referral_rows(referrals: &[ReferralSummary]) -> RegionContent {
    if referrals.is_empty() {
        return RegionContent::Placeholder(EMPTY_REFERRALS_PLACEHOLDER.to_string());
    }
    RegionContent::Rows(
        referrals
            .iter()
            .map(|referral| Row {
                heading: format!("{} (@{})", referral.name, referral.username),
                detail: format!(
                    "Joined: {} | Tier: {}",
                    format_join_date(&referral.joined),
                    referral.tier.to_uppercase()
                ),
                decorated: false,
            })
            .collect(),
    )
}

/// Entries render in server order; ranking is the server's call. Exactly the
/// first row is decorated.
pub fn leaderboard_rows(entries: &[LeaderboardEntry]) -> RegionContent {
    if entries.is_empty() {
        return RegionContent::Placeholder(EMPTY_LEADERBOARD_PLACEHOLDER.to_string());
    }
    RegionContent::Rows(
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Row {
                heading: format!("{} (@{})", entry.name, entry.username),
                detail: format!("${}/day | {} referrals", entry.earnings, entry.referrals),
                decorated: index == 0,
            })
            .collect(),
    )
}

/// The referrer is captured once at render time and baked into every card's
/// selection action.
pub fn package_cards(packages: &[PackageSummary], referrer: &str) -> Vec<PackageCard> {
    packages
        .iter()
        .map(|package| PackageCard {
            title: format!("{} (${}/day)", package.name, package.price),
            features: PACKAGE_FEATURES,
            action_label: format!("Select {}", package.name),
            action: CheckoutSelection {
                package_id: package.id.clone(),
                referrer: referrer.to_string(),
            },
        })
        .collect()
}

/// Join dates arrive in whatever shape the backend stored; anything
/// unrecognized is shown verbatim (the backend sends "N/A" for unknown).
pub fn format_join_date(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format(JOIN_DATE_FORMAT).to_string();
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return timestamp.format(JOIN_DATE_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(JOIN_DATE_FORMAT).to_string();
    }
    raw.to_string()
}
