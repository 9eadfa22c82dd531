//! Routes one parsed command to the feed service.
//!
//! Each [`Dispatcher::dispatch`] call is self-contained: it performs exactly
//! the requested action and reports what happened as an [`Outcome`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::attachment::AttachmentFetcher;
use crate::element::ElementDesc;
use crate::entry::{Entry, FeedKind};
use crate::error::{CoreError, Result, ValidationError};
use crate::feed::FeedService;
use crate::merge;
use crate::query::{self, QueryParameters, QuerySpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Query,
    Add,
    Delete,
    Update,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::List,
        Action::Query,
        Action::Add,
        Action::Delete,
        Action::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Query => "query",
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Update => "update",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "action".into(),
                message: format!("unknown action {s:?}, expected one of list, query, add, delete, update"),
            })
    }
}

/// A fully parsed command.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub action: Option<Action>,
    pub params: QueryParameters,
    /// Entry id for delete/update.
    pub id: Option<String>,
    pub element: ElementDesc,
}

impl ActionRequest {
    pub fn kind(&self) -> FeedKind {
        self.params.target.kind
    }

    fn require_id(&self) -> std::result::Result<&str, ValidationError> {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingField("id".into()))
    }
}

/// Result of post-processing one entry's photo during a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentReport {
    Saved { entry_id: String, path: PathBuf, size: usize },
    Failed { entry_id: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listed {
        entries: Vec<Entry>,
        attachments: Vec<AttachmentReport>,
    },
    Queried(Vec<Entry>),
    /// The server no longer holds every deleted-entry placeholder the query
    /// asked for.
    PlaceholdersExpired,
    Added(Entry),
    Deleted { id: String },
    /// Delete or update named an entry the server does not have.
    NotFound { kind: FeedKind, id: String },
    Updated(Entry),
}

pub struct Dispatcher<'a, S: FeedService + ?Sized> {
    service: &'a S,
    attachments: Option<AttachmentFetcher>,
}

impl<'a, S: FeedService + ?Sized> Dispatcher<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            attachments: None,
        }
    }

    /// Download contact photos after listing.
    pub fn with_attachments(mut self, fetcher: AttachmentFetcher) -> Self {
        self.attachments = Some(fetcher);
        self
    }

    pub async fn dispatch(&self, request: &ActionRequest) -> Result<Outcome> {
        let action = request.action.ok_or_else(|| ValidationError::MissingField("action".into()))?;
        tracing::debug!(%action, kind = request.kind().as_str(), "dispatching");

        match action {
            Action::List => self.list(request).await,
            Action::Query => self.query(request).await,
            Action::Add => self.add(request).await,
            Action::Delete => self.delete(request).await,
            Action::Update => self.update(request).await,
        }
    }

    async fn list(&self, request: &ActionRequest) -> Result<Outcome> {
        let entries = self
            .service
            .query(&QuerySpec::unfiltered(&request.params.target))
            .await?;
        tracing::info!(count = entries.len(), "listed entries");

        let mut attachments = Vec::new();
        if let Some(fetcher) = &self.attachments {
            for entry in &entries {
                let entry_id = entry.id().unwrap_or_default().to_string();
                match fetcher.fetch_for_entry(self.service, entry).await {
                    Ok(Some(saved)) => attachments.push(AttachmentReport::Saved {
                        entry_id,
                        size: saved.bytes.len(),
                        path: saved.path,
                    }),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(%entry_id, error = %e, "photo download failed");
                        attachments.push(AttachmentReport::Failed {
                            entry_id,
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Outcome::Listed {
            entries,
            attachments,
        })
    }

    async fn query(&self, request: &ActionRequest) -> Result<Outcome> {
        let spec = query::build(&request.params)?;
        match self.service.query(&spec).await {
            Ok(entries) => {
                tracing::info!(count = entries.len(), "query returned");
                Ok(Outcome::Queried(entries))
            }
            Err(CoreError::TransientUnavailable(message)) => {
                tracing::info!(%message, "deleted-entry placeholders expired");
                Ok(Outcome::PlaceholdersExpired)
            }
            Err(e) => Err(e),
        }
    }

    async fn add(&self, request: &ActionRequest) -> Result<Outcome> {
        let entry = request.element.build(request.kind())?;
        let feed_url = request.params.target.feed_url();
        let created = self.service.insert(&feed_url, &entry).await?;
        tracing::info!(id = created.id().unwrap_or_default(), "added entry");
        Ok(Outcome::Added(created))
    }

    /// Fetch the canonical entry named by the request id.
    async fn canonical(&self, request: &ActionRequest) -> Result<(String, Option<Entry>)> {
        let id = request.require_id()?;
        let url = request.params.target.entry_url(id);
        let entry = self.service.get_entry(request.kind(), &url).await?;
        if entry.is_none() {
            tracing::info!(%id, kind = request.kind().as_str(), "no entry found");
        }
        Ok((id.to_string(), entry))
    }

    async fn delete(&self, request: &ActionRequest) -> Result<Outcome> {
        let (id, canonical) = self.canonical(request).await?;
        let Some(entry) = canonical else {
            return Ok(Outcome::NotFound {
                kind: request.kind(),
                id,
            });
        };
        self.service.delete(&entry).await?;
        tracing::info!(%id, "deleted entry");
        Ok(Outcome::Deleted { id })
    }

    async fn update(&self, request: &ActionRequest) -> Result<Outcome> {
        let patch = request.element.build(request.kind())?;
        let (id, canonical) = self.canonical(request).await?;
        let Some(canonical) = canonical else {
            return Ok(Outcome::NotFound {
                kind: request.kind(),
                id,
            });
        };
        let merged = merge::merge(canonical, &patch)?;
        let updated = self.service.update(&merged).await?;
        tracing::info!(%id, "updated entry");
        Ok(Outcome::Updated(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_str() {
        assert_eq!("list".parse::<Action>().unwrap(), Action::List);
        assert_eq!("UPDATE".parse::<Action>().unwrap(), Action::Update);
        assert!(matches!(
            "purge".parse::<Action>(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_require_id() {
        let mut request = ActionRequest::default();
        assert_eq!(
            request.require_id(),
            Err(ValidationError::MissingField("id".into()))
        );
        request.id = Some("  ".into());
        assert!(request.require_id().is_err());
        request.id = Some("abc".into());
        assert_eq!(request.require_id(), Ok("abc"));
    }
}
