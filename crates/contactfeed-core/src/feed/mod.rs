//! Boundary to the remote feed service.
//!
//! [`FeedService`] is the black box the dispatcher talks to; [`GDataClient`]
//! implements it over HTTP with an authenticated [`crate::auth::Session`].

pub mod client;
pub mod codec;

pub use client::GDataClient;

use async_trait::async_trait;

use crate::entry::{AttachmentRef, Entry, FeedKind};
use crate::error::Result;
use crate::query::QuerySpec;

#[async_trait]
pub trait FeedService: Send + Sync {
    /// Run a query and return the entries of the resulting feed page.
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<Entry>>;

    /// Fetch one entry. `Ok(None)` when the server has no such entry.
    async fn get_entry(&self, kind: FeedKind, url: &str) -> Result<Option<Entry>>;

    /// Insert a new entry; the returned entry carries server-assigned id, links and ETag.
    async fn insert(&self, feed_url: &str, entry: &Entry) -> Result<Entry>;

    /// Submit an entry fetched earlier. A stale ETag fails with `CoreError::Conflict`.
    async fn update(&self, entry: &Entry) -> Result<Entry>;

    async fn delete(&self, entry: &Entry) -> Result<()>;

    /// Download the binary content behind an attachment link.
    async fn fetch_media(&self, link: &AttachmentRef) -> Result<Vec<u8>>;
}
