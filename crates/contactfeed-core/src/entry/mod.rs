//! Address-book entries as exchanged with the remote feed.
//!
//! An [`Entry`] is either a contact or a group. Both carry the same
//! server-owned metadata ([`EntryMeta`]): identifier, ETag and links are
//! assigned by the service and are never taken from locally built entries.

mod contact;
mod group;

pub use contact::{
    ContactEntry, Email, GroupMembership, Im, Name, Organization, PhoneNumber, PostalAddress,
    Website,
};
pub use group::{GroupEntry, SystemGroup};

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

pub const REL_SELF: &str = "self";
pub const REL_EDIT: &str = "edit";
pub const REL_PHOTO: &str = "http://schemas.google.com/contacts/2008/rel#photo";

/// A link element on an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub rel: String,
    pub content_type: Option<String>,
    pub href: String,
}

/// A binary attachment (contact photo) referenced from an entry.
///
/// The link is always present on contacts; only an ETag says there is
/// content behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub href: String,
    pub content_type: String,
    pub etag: Option<String>,
}

impl AttachmentRef {
    pub fn has_content(&self) -> bool {
        self.etag.is_some()
    }
}

/// Extended property payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Value(String),
    XmlBlob(String),
}

/// Name/value pair attached to an entry. Names are unique within an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedProperty {
    pub name: String,
    pub value: PropertyValue,
}

impl ExtendedProperty {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PropertyValue::Value(value.into()),
        }
    }

    pub fn xml_blob(name: impl Into<String>, blob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PropertyValue::XmlBlob(blob.into()),
        }
    }
}

/// Reject a property list in which two properties share a name.
pub fn check_unique_properties(props: &[ExtendedProperty]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for prop in props {
        if !seen.insert(prop.name.as_str()) {
            return Err(ValidationError::DuplicateExtendedProperty(prop.name.clone()));
        }
    }
    Ok(())
}

/// Server-owned metadata shared by every entry kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMeta {
    /// URL-shaped identifier, e.g. `https://www.google.com/m8/feeds/contacts/default/base/1a2b`.
    pub id: Option<String>,
    pub etag: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    /// Set on placeholders returned with `showdeleted`.
    pub deleted: bool,
    pub links: Vec<Link>,
}

impl EntryMeta {
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }

    pub fn self_link(&self) -> Option<&Link> {
        self.link(REL_SELF)
    }

    pub fn edit_link(&self) -> Option<&Link> {
        self.link(REL_EDIT)
    }
}

/// Which feed an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Contact,
    Group,
}

impl FeedKind {
    /// Resolve the `--contactfeed` / `--groupfeed` pair. Contacts are the default.
    pub fn from_flags(contact: bool, group: bool) -> Result<Self, ValidationError> {
        match (contact, group) {
            (true, true) => Err(ValidationError::ConflictingFeedKinds),
            (_, true) => Ok(FeedKind::Group),
            _ => Ok(FeedKind::Contact),
        }
    }

    /// Path segment of the feed URL.
    pub fn path_segment(&self) -> &'static str {
        match self {
            FeedKind::Contact => "contacts",
            FeedKind::Group => "groups",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Contact => "contact",
            FeedKind::Group => "group",
        }
    }
}

/// A contact or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Contact(ContactEntry),
    Group(GroupEntry),
}

impl Entry {
    pub fn kind(&self) -> FeedKind {
        match self {
            Entry::Contact(_) => FeedKind::Contact,
            Entry::Group(_) => FeedKind::Group,
        }
    }

    pub fn meta(&self) -> &EntryMeta {
        match self {
            Entry::Contact(c) => &c.meta,
            Entry::Group(g) => &g.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut EntryMeta {
        match self {
            Entry::Contact(c) => &mut c.meta,
            Entry::Group(g) => &mut g.meta,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.meta().id.as_deref()
    }

    pub fn title(&self) -> &str {
        match self {
            Entry::Contact(c) => &c.title,
            Entry::Group(g) => &g.title,
        }
    }

    pub fn extended_properties(&self) -> &[ExtendedProperty] {
        match self {
            Entry::Contact(c) => &c.extended_properties,
            Entry::Group(g) => &g.extended_properties,
        }
    }

    pub fn is_system_group(&self) -> bool {
        matches!(self, Entry::Group(g) if g.system_group.is_some())
    }

    /// Edit link href, if this entry may be submitted for update or delete.
    pub fn editable_href(&self) -> Result<&str, ValidationError> {
        let id = || self.id().unwrap_or("(unsaved)").to_string();
        if self.is_system_group() {
            return Err(ValidationError::NotEditable(id()));
        }
        self.meta()
            .edit_link()
            .map(|l| l.href.as_str())
            .ok_or_else(|| ValidationError::NotEditable(id()))
    }

    /// Last path segment of the self link; names the attachment file.
    pub fn self_link_segment(&self) -> Option<&str> {
        let href = &self.meta().self_link()?.href;
        href.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(rel: &str, href: &str) -> Link {
        Link {
            rel: rel.into(),
            content_type: Some("application/atom+xml".into()),
            href: href.into(),
        }
    }

    #[test]
    fn test_feed_kind_from_flags() {
        assert_eq!(FeedKind::from_flags(false, false), Ok(FeedKind::Contact));
        assert_eq!(FeedKind::from_flags(true, false), Ok(FeedKind::Contact));
        assert_eq!(FeedKind::from_flags(false, true), Ok(FeedKind::Group));
        assert_eq!(
            FeedKind::from_flags(true, true),
            Err(ValidationError::ConflictingFeedKinds)
        );
    }

    #[test]
    fn test_self_link_segment() {
        let mut contact = ContactEntry::default();
        contact.meta.links.push(link(
            REL_SELF,
            "https://www.google.com/m8/feeds/contacts/default/thin/3f2a",
        ));
        assert_eq!(Entry::Contact(contact).self_link_segment(), Some("3f2a"));
    }

    #[test]
    fn test_system_group_is_not_editable() {
        let mut group = GroupEntry::default();
        group.meta.id = Some("https://www.google.com/m8/feeds/groups/default/base/6".into());
        group.system_group = Some(SystemGroup::MyContacts);
        group.meta.links.push(link(REL_EDIT, "https://example.test/edit/6"));

        let entry = Entry::Group(group);
        assert!(matches!(
            entry.editable_href(),
            Err(ValidationError::NotEditable(_))
        ));
    }

    #[test]
    fn test_editable_href_requires_edit_link() {
        let entry = Entry::Contact(ContactEntry::default());
        assert!(entry.editable_href().is_err());

        let mut contact = ContactEntry::default();
        contact.meta.links.push(link(REL_EDIT, "https://example.test/edit/1"));
        assert_eq!(
            Entry::Contact(contact).editable_href(),
            Ok("https://example.test/edit/1")
        );
    }

    #[test]
    fn test_duplicate_extended_properties_rejected() {
        let props = vec![
            ExtendedProperty::value("sync", "1"),
            ExtendedProperty::xml_blob("sync", "<a/>"),
        ];
        assert_eq!(
            check_unique_properties(&props),
            Err(ValidationError::DuplicateExtendedProperty("sync".into()))
        );
    }
}
