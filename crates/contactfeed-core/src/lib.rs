//! # Contactfeed Core Library
//!
//! This library provides the core logic for `contactfeed`, a command-line
//! client that keeps address-book contacts and contact groups in sync with a
//! remote feed-based directory service. The CLI binary is a thin layer that
//! parses flags and renders the [`Outcome`] of each action.
//!
//! ## Architecture
//!
//! - **Credentials**: a service-account key is exchanged once for an access
//!   token wrapped in a [`Session`]
//! - **Queries**: [`query::build`] turns filter parameters into an ordered
//!   feed query
//! - **Merge**: [`merge::merge`] applies a partial update onto the entry the
//!   server returned
//! - **Dispatch**: [`Dispatcher`] routes list/query/add/delete/update to a
//!   [`FeedService`]
//! - **Attachments**: [`AttachmentFetcher`] downloads contact photos
//!
//! ## Key Components
//!
//! - [`GDataClient`]: HTTP implementation of [`FeedService`]
//! - [`Entry`]: contact or group with server-owned metadata
//! - [`Config`]: application configuration management

pub mod attachment;
pub mod auth;
pub mod dispatch;
pub mod element;
pub mod entry;
pub mod error;
pub mod feed;
pub mod merge;
pub mod query;
pub mod render;
pub mod storage;
pub mod telemetry;

pub use attachment::{AttachmentFetcher, SavedAttachment};
pub use auth::{authenticate, AuthConfig, Credential, ServiceAccountKey, Session};
pub use dispatch::{Action, ActionRequest, AttachmentReport, Dispatcher, Outcome};
pub use element::ElementDesc;
pub use entry::{ContactEntry, Entry, FeedKind, GroupEntry, SystemGroup};
pub use error::{AuthError, ConfigError, CoreError, ValidationError};
pub use feed::{FeedService, GDataClient};
pub use query::{FeedTarget, QueryParameters, QuerySpec};
pub use storage::Config;
