use url::Url;

/// The two query-string parameters the pages consume. An unparseable page
/// URL collapses to the defaults rather than failing the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageQuery {
    /// True only for the literal value `verified=true`.
    pub verified: bool,
    /// Referrer identifier from `ref=...`; empty string when absent, never
    /// omitted downstream.
    pub referrer: String,
}

impl PageQuery {
    pub fn from_url(page_url: &str) -> Self {
        let Ok(url) = Url::parse(page_url) else {
            return Self::default();
        };

        // First occurrence wins for repeated parameters.
        let mut verified = None;
        let mut referrer = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "verified" if verified.is_none() => verified = Some(value.into_owned()),
                "ref" if referrer.is_none() => referrer = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            verified: verified.as_deref() == Some("true"),
            referrer: referrer.unwrap_or_default(),
        }
    }
}
