//! Partial-update semantics for UPDATE.
//!
//! The patch is the full desired title and content, but a sparse description
//! of structured fields: any kind present in the patch replaces *all* of
//! canonical's values of that kind, and kinds absent from the patch are left
//! alone. Extended properties are cleared and refilled from the patch.
//! Server-owned metadata always stays canonical's.

use crate::entry::{ContactEntry, Entry, GroupEntry};
use crate::error::ValidationError;

/// Apply `patch` onto `canonical`, returning the entry to submit.
pub fn merge(canonical: Entry, patch: &Entry) -> Result<Entry, ValidationError> {
    match (canonical, patch) {
        (Entry::Contact(mut c), Entry::Contact(p)) => {
            merge_contact(&mut c, p);
            Ok(Entry::Contact(c))
        }
        (Entry::Group(mut g), Entry::Group(p)) => {
            merge_group(&mut g, p);
            Ok(Entry::Group(g))
        }
        (canonical, patch) => Err(ValidationError::KindMismatch {
            canonical: canonical.kind().as_str(),
            patch: patch.kind().as_str(),
        }),
    }
}

fn replace_single<T: Clone>(target: &mut Option<T>, patch: &Option<T>) {
    if patch.is_some() {
        target.clone_from(patch);
    }
}

fn replace_kind<T: Clone>(target: &mut Vec<T>, patch: &[T]) {
    if !patch.is_empty() {
        target.clear();
        target.extend_from_slice(patch);
    }
}

fn merge_contact(canonical: &mut ContactEntry, patch: &ContactEntry) {
    canonical.title.clone_from(&patch.title);
    canonical.content.clone_from(&patch.content);

    replace_single(&mut canonical.name, &patch.name);
    replace_single(&mut canonical.nickname, &patch.nickname);
    replace_single(&mut canonical.birthday, &patch.birthday);

    replace_kind(&mut canonical.emails, &patch.emails);
    replace_kind(&mut canonical.phone_numbers, &patch.phone_numbers);
    replace_kind(&mut canonical.ims, &patch.ims);
    replace_kind(&mut canonical.organizations, &patch.organizations);
    replace_kind(&mut canonical.postal_addresses, &patch.postal_addresses);
    replace_kind(&mut canonical.websites, &patch.websites);
    replace_kind(&mut canonical.group_memberships, &patch.group_memberships);

    canonical.extended_properties.clear();
    canonical
        .extended_properties
        .extend_from_slice(&patch.extended_properties);
}

fn merge_group(canonical: &mut GroupEntry, patch: &GroupEntry) {
    canonical.title.clone_from(&patch.title);
    canonical.content.clone_from(&patch.content);

    canonical.extended_properties.clear();
    canonical
        .extended_properties
        .extend_from_slice(&patch.extended_properties);
}
