//! HTTP implementation of [`FeedService`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::codec;
use super::FeedService;
use crate::auth::Session;
use crate::entry::{AttachmentRef, Entry, FeedKind};
use crate::error::{AuthError, CoreError, Result, ValidationError};
use crate::query::QuerySpec;

const ALT_JSON: (&str, &str) = ("alt", "json");
const MEDIA_PREALLOC_LIMIT: u64 = 1 << 20;

/// Feed client over an authenticated session.
pub struct GDataClient {
    session: Session,
}

impl GDataClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        Ok(self.session.request(method, url)?)
    }

    async fn json(&self, builder: RequestBuilder, url: &str) -> Result<Value> {
        let resp = check_status(builder.send().await?, url).await?;
        Ok(resp.json().await?)
    }

    fn if_match(builder: RequestBuilder, entry: &Entry) -> RequestBuilder {
        match entry.meta().etag.as_deref() {
            Some(etag) => builder.header("If-Match", etag),
            None => builder,
        }
    }
}

/// Map non-success statuses onto the error taxonomy.
pub async fn check_status(resp: Response, url: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(%url, %status, %body, "request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::Rejected {
            status: status.as_u16(),
            message: body,
        }
        .into(),
        StatusCode::NOT_FOUND => CoreError::NotFound(url.to_string()),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => CoreError::Conflict {
            url: url.to_string(),
            message: body,
        },
        StatusCode::GONE => CoreError::TransientUnavailable(body),
        _ => CoreError::Remote {
            status: status.as_u16(),
            body,
        },
    })
}

#[async_trait]
impl FeedService for GDataClient {
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<Entry>> {
        let mut url = spec.url()?;
        url.query_pairs_mut().append_pair(ALT_JSON.0, ALT_JSON.1);
        tracing::debug!(url = %url, "querying feed");

        let doc = self.json(self.request(Method::GET, url.as_str())?, url.as_str()).await?;
        if let Some(title) = codec::feed_title(&doc) {
            tracing::debug!(%title, "feed");
        }
        codec::decode_feed(spec.kind, &doc)
    }

    async fn get_entry(&self, kind: FeedKind, url: &str) -> Result<Option<Entry>> {
        tracing::debug!(%url, "fetching entry");
        let builder = self.request(Method::GET, url)?.query(&[ALT_JSON]);
        match self.json(builder, url).await {
            Ok(doc) => codec::decode_entry_document(kind, &doc).map(Some),
            Err(CoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn insert(&self, feed_url: &str, entry: &Entry) -> Result<Entry> {
        tracing::debug!(%feed_url, kind = entry.kind().as_str(), "inserting entry");
        let builder = self
            .request(Method::POST, feed_url)?
            .query(&[ALT_JSON])
            .json(&codec::encode_entry(entry));
        let doc = self.json(builder, feed_url).await?;
        codec::decode_entry_document(entry.kind(), &doc)
    }

    async fn update(&self, entry: &Entry) -> Result<Entry> {
        let href = entry.editable_href()?.to_string();
        tracing::debug!(%href, etag = ?entry.meta().etag, "updating entry");
        let builder = self
            .request(Method::PUT, &href)?
            .query(&[ALT_JSON])
            .json(&codec::encode_entry(entry));
        let doc = self.json(Self::if_match(builder, entry), &href).await?;
        codec::decode_entry_document(entry.kind(), &doc)
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        let href = entry.editable_href()?.to_string();
        tracing::debug!(%href, etag = ?entry.meta().etag, "deleting entry");
        let builder = Self::if_match(self.request(Method::DELETE, &href)?, entry);
        check_status(builder.send().await?, &href).await?;
        Ok(())
    }

    async fn fetch_media(&self, link: &AttachmentRef) -> Result<Vec<u8>> {
        if link.etag.is_none() {
            return Err(ValidationError::InvalidValue {
                field: "photo".into(),
                message: format!("no content uploaded at {}", link.href),
            }
            .into());
        }
        tracing::debug!(href = %link.href, "downloading attachment");
        let builder = self
            .request(Method::GET, &link.href)?
            .header(reqwest::header::ACCEPT, link.content_type.as_str());
        let mut resp = check_status(builder.send().await?, &link.href).await?;

        // Content-Length is only a hint from the server.
        let hint = resp.content_length().unwrap_or(0).min(MEDIA_PREALLOC_LIMIT);
        let mut bytes = Vec::with_capacity(usize::try_from(hint).unwrap_or(0));
        while let Some(chunk) = resp.chunk().await? {
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}
