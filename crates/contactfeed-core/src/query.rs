//! Translation of command parameters into feed queries.
//!
//! [`build`] turns a [`QueryParameters`] into a [`QuerySpec`]: the feed URL plus
//! an ordered list of query parameters. Unset fields never appear in the
//! output. The order is fixed so that built queries compare equal in tests.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use url::Url;

use crate::entry::FeedKind;
use crate::error::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://www.google.com/m8/feeds/";
pub const DEFAULT_PROJECTION: &str = "thin";

/// Which feed to talk to and through which projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTarget {
    pub kind: FeedKind,
    pub base_url: String,
    pub projection: String,
}

impl FeedTarget {
    pub fn new(kind: FeedKind, base_url: impl Into<String>, projection: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            projection: projection.into(),
        }
    }

    /// `<base>/<contacts|groups>/default/<projection>`
    pub fn feed_url(&self) -> String {
        format!(
            "{}/{}/default/{}",
            self.base_url.trim_end_matches('/'),
            self.kind.path_segment(),
            self.projection
        )
    }

    /// Map an entry id (which always names the `base` projection) onto the
    /// projection this target reads through. A bare id is resolved against
    /// the feed URL.
    pub fn entry_url(&self, id: &str) -> String {
        if id.contains("://") {
            id.replace("/base/", &format!("/{}/", self.projection))
        } else {
            format!("{}/{}", self.feed_url(), id.trim_start_matches('/'))
        }
    }
}

impl Default for FeedTarget {
    fn default() -> Self {
        Self::new(FeedKind::Contact, DEFAULT_BASE_URL, DEFAULT_PROJECTION)
    }
}

/// Filters for a feed query. `None` means "not requested".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pub target: FeedTarget,
    pub updated_min: Option<String>,
    pub max_results: Option<i64>,
    pub start_index: Option<i64>,
    pub show_deleted: Option<bool>,
    pub require_all_deleted: Option<bool>,
    pub sort_order: Option<String>,
    pub order_by: Option<String>,
    pub group: Option<String>,
}

/// A query ready to execute against a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub kind: FeedKind,
    pub feed_url: String,
    pub params: Vec<(String, String)>,
}

impl QuerySpec {
    /// The whole feed, no filters.
    pub fn unfiltered(target: &FeedTarget) -> Self {
        Self {
            kind: target.kind,
            feed_url: target.feed_url(),
            params: Vec::new(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full URL including the encoded query string.
    pub fn url(&self) -> Result<Url, ValidationError> {
        let mut url = Url::parse(&self.feed_url).map_err(|e| ValidationError::InvalidValue {
            field: "base-url".into(),
            message: e.to_string(),
        })?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url)
    }
}

/// Build a query from parameters. No caching; every call is a fresh spec.
pub fn build(params: &QueryParameters) -> Result<QuerySpec, ValidationError> {
    let mut out: Vec<(String, String)> = Vec::new();
    let mut push = |key: &str, value: String| out.push((key.to_string(), value));

    if let Some(ref raw) = params.updated_min {
        let ts = parse_timestamp("updated-min", raw)?;
        push("updated-min", ts.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Some(n) = params.max_results {
        push("max-results", non_negative("max-results", n)?.to_string());
    }
    if let Some(n) = params.start_index {
        push("start-index", non_negative("start-index", n)?.to_string());
    }
    if let Some(b) = params.show_deleted {
        push("showdeleted", b.to_string());
    }
    if let Some(b) = params.require_all_deleted {
        push("requirealldeleted", b.to_string());
    }
    for (key, value) in [
        ("sortorder", &params.sort_order),
        ("orderby", &params.order_by),
        ("group", &params.group),
    ] {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            push(key, v.to_string());
        }
    }

    Ok(QuerySpec {
        kind: params.target.kind,
        feed_url: params.target.feed_url(),
        params: out,
    })
}

fn non_negative(field: &str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC), or a
/// bare date.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }
    Err(ValidationError::InvalidTimestamp {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
