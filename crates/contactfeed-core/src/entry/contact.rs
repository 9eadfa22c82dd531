use super::{AttachmentRef, EntryMeta, ExtendedProperty};

/// Structured name. `full_name` mirrors the entry title on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    pub full_name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub address: String,
    pub rel: Option<String>,
    pub label: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    pub number: String,
    pub rel: Option<String>,
    pub label: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Im {
    pub address: String,
    pub protocol: Option<String>,
    pub rel: Option<String>,
    pub label: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub name: String,
    pub title: Option<String>,
    pub rel: Option<String>,
    pub label: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub formatted: String,
    pub rel: Option<String>,
    pub label: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Website {
    pub href: String,
    pub rel: Option<String>,
    pub label: Option<String>,
    pub primary: bool,
}

/// Membership in a contact group, referenced by the group's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembership {
    pub href: String,
    pub deleted: bool,
}

/// A contact. Each structured field is one *kind*: a single optional value
/// or a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEntry {
    pub meta: EntryMeta,
    pub title: String,
    /// Free-text notes.
    pub content: String,
    pub name: Option<Name>,
    pub nickname: Option<String>,
    pub birthday: Option<String>,
    pub emails: Vec<Email>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub ims: Vec<Im>,
    pub organizations: Vec<Organization>,
    pub postal_addresses: Vec<PostalAddress>,
    pub websites: Vec<Website>,
    pub group_memberships: Vec<GroupMembership>,
    pub extended_properties: Vec<ExtendedProperty>,
    /// Photo link; server-owned.
    pub photo: Option<AttachmentRef>,
}
