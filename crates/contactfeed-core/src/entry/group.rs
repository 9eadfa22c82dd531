use std::fmt;

use super::{EntryMeta, ExtendedProperty};
use crate::error::ValidationError;

/// Predefined groups every account has. They cannot be edited or deleted
/// and the server gives them no edit link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemGroup {
    MyContacts,
    Friends,
    Family,
    Coworkers,
}

impl SystemGroup {
    pub const ALL: [SystemGroup; 4] = [
        SystemGroup::MyContacts,
        SystemGroup::Friends,
        SystemGroup::Family,
        SystemGroup::Coworkers,
    ];

    /// Identifier used by the remote service.
    pub fn id(&self) -> &'static str {
        match self {
            SystemGroup::MyContacts => "Contacts",
            SystemGroup::Friends => "Friends",
            SystemGroup::Family => "Family",
            SystemGroup::Coworkers => "Coworkers",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SystemGroup::MyContacts => "My Contacts",
            SystemGroup::Friends => "Friends",
            SystemGroup::Family => "Family",
            SystemGroup::Coworkers => "Coworkers",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|g| g.id() == id)
            .ok_or_else(|| ValidationError::UnknownSystemGroup(id.to_string()))
    }
}

impl fmt::Display for SystemGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A contact group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEntry {
    pub meta: EntryMeta,
    pub title: String,
    pub content: String,
    pub extended_properties: Vec<ExtendedProperty>,
    /// Server-owned; `Some` marks a non-editable system group.
    pub system_group: Option<SystemGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_group_lookup() {
        assert_eq!(SystemGroup::from_id("Contacts"), Ok(SystemGroup::MyContacts));
        assert_eq!(SystemGroup::from_id("Coworkers"), Ok(SystemGroup::Coworkers));
        assert_eq!(SystemGroup::MyContacts.to_string(), "My Contacts");
    }

    #[test]
    fn test_system_group_unknown_id_fails() {
        assert_eq!(
            SystemGroup::from_id("Neighbours"),
            Err(ValidationError::UnknownSystemGroup("Neighbours".into()))
        );
        // Lookup is by id, not display name.
        assert!(SystemGroup::from_id("My Contacts").is_err());
    }
}
