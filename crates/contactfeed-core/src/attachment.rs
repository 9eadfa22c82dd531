//! Photo download pipeline.
//!
//! A contact's photo link is always present; only a link ETag means there is
//! content to fetch. Downloaded bytes are written to
//! `<dir>/<last segment of the contact's self link>`, overwriting any file
//! already there.

use std::path::{Path, PathBuf};

use crate::entry::{AttachmentRef, Entry};
use crate::error::{CoreError, Result};
use crate::feed::FeedService;

/// An attachment that was downloaded and written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAttachment {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Downloads attachments into a fixed directory.
#[derive(Debug, Clone)]
pub struct AttachmentFetcher {
    dir: PathBuf,
}

impl AttachmentFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for an attachment named after `self_link_segment`.
    pub fn path_for(&self, self_link_segment: &str) -> PathBuf {
        self.dir.join(self_link_segment)
    }

    /// Fetch and persist `link`. `Ok(None)` without any request when the
    /// link has no ETag.
    pub async fn fetch<S: FeedService + ?Sized>(
        &self,
        service: &S,
        link: &AttachmentRef,
        self_link_segment: &str,
    ) -> Result<Option<SavedAttachment>> {
        if !link.has_content() {
            tracing::debug!(href = %link.href, "no photo uploaded");
            return Ok(None);
        }

        let bytes = service.fetch_media(link).await?;
        let path = self.path_for(self_link_segment);
        std::fs::write(&path, &bytes).map_err(|source| CoreError::Storage {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), size = bytes.len(), "saved photo");

        Ok(Some(SavedAttachment { path, bytes }))
    }

    /// Fetch the photo of a contact entry. Groups and contacts without a
    /// photo link or self link yield `Ok(None)`.
    pub async fn fetch_for_entry<S: FeedService + ?Sized>(
        &self,
        service: &S,
        entry: &Entry,
    ) -> Result<Option<SavedAttachment>> {
        let Entry::Contact(contact) = entry else {
            return Ok(None);
        };
        let (Some(photo), Some(segment)) = (contact.photo.as_ref(), entry.self_link_segment()) else {
            return Ok(None);
        };
        self.fetch(service, photo, segment).await
    }
}

impl Default for AttachmentFetcher {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}
