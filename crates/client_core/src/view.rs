use shared::domain::PackageId;

/// One rendered display row of a list region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub heading: String,
    pub detail: String,
    /// Set on exactly one row per region at most (the leaderboard leader).
    pub decorated: bool,
}

/// Complete replacement content for a list region; regions are swapped
/// wholesale, never merged with prior content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionContent {
    Rows(Vec<Row>),
    Placeholder(String),
}

impl RegionContent {
    pub fn row_count(&self) -> usize {
        match self {
            RegionContent::Rows(rows) => rows.len(),
            RegionContent::Placeholder(_) => 0,
        }
    }
}

/// The dashboard's headline account figures, pre-rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatPanel {
    pub username: String,
    pub tier: String,
    pub daily_rate: String,
    pub total_referrals: u32,
    pub total_earnings: String,
    pub affiliate_link: String,
}

/// What a package card's select action submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSelection {
    pub package_id: PackageId,
    pub referrer: String,
}

/// One selectable package card. The feature bullets are fixed marketing
/// copy, not derived from the catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCard {
    pub title: String,
    pub features: &'static [&'static str],
    pub action_label: String,
    pub action: CheckoutSelection,
}

/// Side-effecting half of the dashboard page. The controller computes full
/// region contents and hands them over; implementations only display.
pub trait DashboardSurface: Send + Sync {
    /// Login prompt visible, dashboard hidden.
    fn show_login_prompt(&self);
    /// Dashboard visible with the given stats and referral region, login
    /// prompt hidden.
    fn show_dashboard(&self, stats: StatPanel, referrals: RegionContent);
    fn show_alert(&self, message: &str);
    fn set_verification_notice(&self, visible: bool);
}

/// Side-effecting half of the landing page.
pub trait LandingSurface: Send + Sync {
    fn replace_leaderboard(&self, content: RegionContent);
    /// Hides the loading indicator; called only after a successful render.
    fn clear_leaderboard_loading(&self);
    /// Swaps the loading indicator's text for a failure message without
    /// changing its visibility; prior list content stays untouched.
    fn fail_leaderboard_loading(&self, message: &str);
    fn replace_packages(&self, cards: Vec<PackageCard>);
    /// Replaces the package grid with a single error message.
    fn fail_packages(&self, message: &str);
    fn show_alert(&self, message: &str);
    /// Full-page redirect to the given URL.
    fn navigate(&self, url: &str);
}
