//! Plain-text rendering of entries and action outcomes.

use std::fmt::Write;

use crate::dispatch::{AttachmentReport, Outcome};
use crate::entry::{ContactEntry, Entry, EntryMeta, ExtendedProperty, GroupEntry, PropertyValue};

fn rel_or_label(rel: &Option<String>, label: &Option<String>) -> String {
    let kind = label
        .as_deref()
        .or_else(|| rel.as_deref().map(|r| r.rsplit('#').next().unwrap_or(r)))
        .unwrap_or("other");
    kind.to_string()
}

fn primary(flag: bool) -> &'static str {
    if flag {
        " (primary)"
    } else {
        ""
    }
}

fn write_meta(out: &mut String, meta: &EntryMeta) {
    if let Some(updated) = meta.updated {
        let _ = writeln!(out, "Last updated: {}", updated.to_rfc3339());
    }
    if meta.deleted {
        let _ = writeln!(out, "Deleted: yes");
    }
}

fn write_links(out: &mut String, meta: &EntryMeta) {
    if let Some(link) = meta.self_link() {
        let _ = writeln!(out, "Self link: {}", link.href);
    }
    if let Some(link) = meta.edit_link() {
        let _ = writeln!(out, "Edit link: {}", link.href);
    }
    if let Some(etag) = &meta.etag {
        let _ = writeln!(out, "ETag: {etag}");
    }
}

fn write_properties(out: &mut String, props: &[ExtendedProperty]) {
    for prop in props {
        match &prop.value {
            PropertyValue::Value(v) => {
                let _ = writeln!(out, "Extended property {}: {v}", prop.name);
            }
            PropertyValue::XmlBlob(blob) => {
                let _ = writeln!(out, "Extended property {}: (xml) {blob}", prop.name);
            }
        }
    }
}

fn write_contact(out: &mut String, c: &ContactEntry) {
    if let Some(name) = &c.name {
        if let Some(full) = &name.full_name {
            let _ = writeln!(out, "Name: {full}");
        }
        if let Some(given) = &name.given_name {
            let _ = writeln!(out, "Given name: {given}");
        }
        if let Some(family) = &name.family_name {
            let _ = writeln!(out, "Family name: {family}");
        }
    }
    if let Some(nickname) = &c.nickname {
        let _ = writeln!(out, "Nickname: {nickname}");
    }
    if let Some(birthday) = &c.birthday {
        let _ = writeln!(out, "Birthday: {birthday}");
    }
    if !c.content.is_empty() {
        let _ = writeln!(out, "Notes: {}", c.content);
    }
    for e in &c.emails {
        let _ = writeln!(out, "Email ({}): {}{}", rel_or_label(&e.rel, &e.label), e.address, primary(e.primary));
    }
    for p in &c.phone_numbers {
        let _ = writeln!(out, "Phone ({}): {}{}", rel_or_label(&p.rel, &p.label), p.number, primary(p.primary));
    }
    for im in &c.ims {
        let protocol = im
            .protocol
            .as_deref()
            .map(|p| p.rsplit('#').next().unwrap_or(p))
            .unwrap_or("unknown");
        let _ = writeln!(out, "IM ({protocol}): {}{}", im.address, primary(im.primary));
    }
    for org in &c.organizations {
        match &org.title {
            Some(title) => {
                let _ = writeln!(out, "Organization: {}, {title}{}", org.name, primary(org.primary));
            }
            None => {
                let _ = writeln!(out, "Organization: {}{}", org.name, primary(org.primary));
            }
        }
    }
    for addr in &c.postal_addresses {
        let _ = writeln!(
            out,
            "Postal address ({}): {}{}",
            rel_or_label(&addr.rel, &addr.label),
            addr.formatted,
            primary(addr.primary)
        );
    }
    for site in &c.websites {
        let _ = writeln!(out, "Website ({}): {}", rel_or_label(&site.rel, &site.label), site.href);
    }
    for membership in &c.group_memberships {
        let deleted = if membership.deleted { " (deleted)" } else { "" };
        let _ = writeln!(out, "Group: {}{deleted}", membership.href);
    }
    if let Some(photo) = &c.photo {
        let _ = writeln!(out, "Photo link: {}", photo.href);
        if let Some(etag) = &photo.etag {
            let _ = writeln!(out, "Photo ETag: {etag}");
        }
    }
}

fn write_group(out: &mut String, g: &GroupEntry) {
    if !g.content.is_empty() {
        let _ = writeln!(out, "Description: {}", g.content);
    }
    match g.system_group {
        Some(system) => {
            let _ = writeln!(out, "System group: {system}");
        }
        None => {
            let _ = writeln!(out, "(Not a system group)");
        }
    }
}

/// Multi-line block describing one entry.
pub fn render_entry(entry: &Entry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Id: {}", entry.id().unwrap_or("(none)"));
    let _ = writeln!(out, "Title: {}", entry.title());
    write_meta(&mut out, entry.meta());
    match entry {
        Entry::Contact(c) => write_contact(&mut out, c),
        Entry::Group(g) => write_group(&mut out, g),
    }
    write_properties(&mut out, entry.extended_properties());
    write_links(&mut out, entry.meta());
    out
}

fn render_entries(out: &mut String, entries: &[Entry]) {
    for entry in entries {
        out.push_str(&render_entry(entry));
        out.push('\n');
    }
    let _ = writeln!(out, "Total: {} entries found", entries.len());
}

pub fn render_outcome(outcome: &Outcome) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::Listed {
            entries,
            attachments,
        } => {
            render_entries(&mut out, entries);
            for report in attachments {
                match report {
                    AttachmentReport::Saved { entry_id, path, size } => {
                        let _ = writeln!(out, "Photo for {entry_id} saved to {} ({size} bytes)", path.display());
                    }
                    AttachmentReport::Failed { entry_id, message } => {
                        let _ = writeln!(out, "Photo for {entry_id} not saved: {message}");
                    }
                }
            }
        }
        Outcome::Queried(entries) => render_entries(&mut out, entries),
        Outcome::PlaceholdersExpired => {
            let _ = writeln!(out, "Not all placeholders of deleted entries are available");
        }
        Outcome::Added(entry) => {
            let _ = writeln!(out, "Added {}:", entry.kind().as_str());
            out.push_str(&render_entry(entry));
        }
        Outcome::Deleted { id } => {
            let _ = writeln!(out, "Deleted: {id}");
        }
        Outcome::NotFound { kind, id } => {
            let _ = writeln!(out, "No {} found with id: {id}", kind.as_str());
        }
        Outcome::Updated(entry) => {
            let _ = writeln!(out, "Updated {}:", entry.kind().as_str());
            out.push_str(&render_entry(entry));
        }
    }
    out
}
