//! Encoding/decoding between entries and the feed's JSON rendition.
//!
//! Text nodes are `{"$t": ...}` objects, namespaced elements are keyed
//! `gd$...` / `gContact$...`, and boolean attributes are the strings
//! `"true"` / `"false"`.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::entry::{
    AttachmentRef, ContactEntry, Email, Entry, EntryMeta, ExtendedProperty, FeedKind,
    GroupEntry, GroupMembership, Im, Link, Name, Organization, PhoneNumber, PostalAddress,
    PropertyValue, SystemGroup, Website, REL_PHOTO,
};
use crate::error::{CoreError, Result};

// ============================================================================
// Decoding
// ============================================================================

fn text(v: &Value) -> Option<String> {
    v.get("$t").and_then(Value::as_str).map(String::from)
}

fn attr(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(String::from)
}

fn flag(v: &Value, key: &str) -> bool {
    match v.get(key) {
        Some(Value::String(s)) => s == "true",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

fn items<'a>(v: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    v.get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter())
        .into_iter()
        .flatten()
}

fn malformed(message: impl Into<String>) -> CoreError {
    CoreError::Malformed(message.into())
}

fn decode_meta(v: &Value) -> Result<(EntryMeta, Option<AttachmentRef>)> {
    let updated = match v.get("updated").and_then(text) {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(&raw)
                .map_err(|_| malformed(format!("invalid updated timestamp {raw}")))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let mut links = Vec::new();
    let mut photo = None;
    for l in items(v, "link") {
        let rel = attr(l, "rel").unwrap_or_default();
        let href = attr(l, "href").ok_or_else(|| malformed("link without href"))?;
        let content_type = attr(l, "type");
        if rel == REL_PHOTO {
            photo = Some(AttachmentRef {
                href,
                content_type: content_type.unwrap_or_else(|| "image/*".to_string()),
                etag: attr(l, "gd$etag"),
            });
        } else {
            links.push(Link {
                rel,
                content_type,
                href,
            });
        }
    }

    let meta = EntryMeta {
        id: v.get("id").and_then(text),
        etag: attr(v, "gd$etag"),
        updated,
        deleted: v.get("gd$deleted").is_some(),
        links,
    };
    Ok((meta, photo))
}

fn decode_properties(v: &Value) -> Vec<ExtendedProperty> {
    items(v, "gd$extendedProperty")
        .filter_map(|p| {
            let name = attr(p, "name")?;
            let value = match attr(p, "value") {
                Some(value) => PropertyValue::Value(value),
                None => PropertyValue::XmlBlob(text(p).unwrap_or_default()),
            };
            Some(ExtendedProperty { name, value })
        })
        .collect()
}

fn decode_contact(v: &Value) -> Result<ContactEntry> {
    let (meta, photo) = decode_meta(v)?;

    let name = v.get("gd$name").map(|n| Name {
        full_name: n.get("gd$fullName").and_then(text),
        given_name: n.get("gd$givenName").and_then(text),
        family_name: n.get("gd$familyName").and_then(text),
    });

    Ok(ContactEntry {
        meta,
        title: v.get("title").and_then(text).unwrap_or_default(),
        content: v.get("content").and_then(text).unwrap_or_default(),
        name,
        nickname: v.get("gContact$nickname").and_then(text),
        birthday: v.get("gContact$birthday").and_then(|b| attr(b, "when")),
        emails: items(v, "gd$email")
            .filter_map(|e| {
                Some(Email {
                    address: attr(e, "address")?,
                    rel: attr(e, "rel"),
                    label: attr(e, "label"),
                    primary: flag(e, "primary"),
                })
            })
            .collect(),
        phone_numbers: items(v, "gd$phoneNumber")
            .filter_map(|p| {
                Some(PhoneNumber {
                    number: text(p)?,
                    rel: attr(p, "rel"),
                    label: attr(p, "label"),
                    primary: flag(p, "primary"),
                })
            })
            .collect(),
        ims: items(v, "gd$im")
            .filter_map(|i| {
                Some(Im {
                    address: attr(i, "address")?,
                    protocol: attr(i, "protocol"),
                    rel: attr(i, "rel"),
                    label: attr(i, "label"),
                    primary: flag(i, "primary"),
                })
            })
            .collect(),
        organizations: items(v, "gd$organization")
            .filter_map(|o| {
                Some(Organization {
                    name: o.get("gd$orgName").and_then(text)?,
                    title: o.get("gd$orgTitle").and_then(text),
                    rel: attr(o, "rel"),
                    label: attr(o, "label"),
                    primary: flag(o, "primary"),
                })
            })
            .collect(),
        postal_addresses: items(v, "gd$structuredPostalAddress")
            .filter_map(|a| {
                Some(PostalAddress {
                    formatted: a.get("gd$formattedAddress").and_then(text)?,
                    rel: attr(a, "rel"),
                    label: attr(a, "label"),
                    primary: flag(a, "primary"),
                })
            })
            .collect(),
        websites: items(v, "gContact$website")
            .filter_map(|w| {
                Some(Website {
                    href: attr(w, "href")?,
                    rel: attr(w, "rel"),
                    label: attr(w, "label"),
                    primary: flag(w, "primary"),
                })
            })
            .collect(),
        group_memberships: items(v, "gContact$groupMembershipInfo")
            .filter_map(|g| {
                Some(GroupMembership {
                    href: attr(g, "href")?,
                    deleted: flag(g, "deleted"),
                })
            })
            .collect(),
        extended_properties: decode_properties(v),
        photo,
    })
}

fn decode_group(v: &Value) -> Result<GroupEntry> {
    let (meta, _) = decode_meta(v)?;
    let system_group = match v.get("gContact$systemGroup") {
        Some(sg) => {
            let id = attr(sg, "id").ok_or_else(|| malformed("system group without id"))?;
            Some(SystemGroup::from_id(&id)?)
        }
        None => None,
    };

    Ok(GroupEntry {
        meta,
        title: v.get("title").and_then(text).unwrap_or_default(),
        content: v.get("content").and_then(text).unwrap_or_default(),
        extended_properties: decode_properties(v),
        system_group,
    })
}

/// Decode one entry object.
pub fn decode_entry(kind: FeedKind, v: &Value) -> Result<Entry> {
    match kind {
        FeedKind::Contact => decode_contact(v).map(Entry::Contact),
        FeedKind::Group => decode_group(v).map(Entry::Group),
    }
}

/// Decode a response document holding a single `entry`.
pub fn decode_entry_document(kind: FeedKind, doc: &Value) -> Result<Entry> {
    let entry = doc
        .get("entry")
        .ok_or_else(|| malformed("response has no entry"))?;
    decode_entry(kind, entry)
}

/// Decode a `feed` document into its entries. A feed without entries is empty.
pub fn decode_feed(kind: FeedKind, doc: &Value) -> Result<Vec<Entry>> {
    let feed = doc
        .get("feed")
        .ok_or_else(|| malformed("response has no feed"))?;
    items(feed, "entry").map(|e| decode_entry(kind, e)).collect()
}

/// Feed title, if the document carries one.
pub fn feed_title(doc: &Value) -> Option<String> {
    doc.get("feed")?.get("title").and_then(text)
}

// ============================================================================
// Encoding
// ============================================================================

fn text_node(s: &str) -> Value {
    json!({ "$t": s })
}

fn with_rel(mut obj: Map<String, Value>, rel: &Option<String>, label: &Option<String>, primary: bool) -> Value {
    match (rel, label) {
        (_, Some(label)) => {
            obj.insert("label".into(), json!(label));
        }
        (Some(rel), None) => {
            obj.insert("rel".into(), json!(rel));
        }
        (None, None) => {}
    }
    if primary {
        obj.insert("primary".into(), json!("true"));
    }
    Value::Object(obj)
}

fn object(pairs: Vec<(&str, Value)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn encode_properties(props: &[ExtendedProperty]) -> Value {
    Value::Array(
        props
            .iter()
            .map(|p| match &p.value {
                PropertyValue::Value(v) => json!({ "name": p.name, "value": v }),
                PropertyValue::XmlBlob(blob) => json!({ "name": p.name, "$t": blob }),
            })
            .collect(),
    )
}

fn encode_contact(c: &ContactEntry, body: &mut Map<String, Value>) {
    if let Some(ref name) = c.name {
        let mut n = Map::new();
        for (key, value) in [
            ("gd$fullName", &name.full_name),
            ("gd$givenName", &name.given_name),
            ("gd$familyName", &name.family_name),
        ] {
            if let Some(v) = value {
                n.insert(key.into(), text_node(v));
            }
        }
        body.insert("gd$name".into(), Value::Object(n));
    }
    if let Some(ref nick) = c.nickname {
        body.insert("gContact$nickname".into(), text_node(nick));
    }
    if let Some(ref when) = c.birthday {
        body.insert("gContact$birthday".into(), json!({ "when": when }));
    }

    let mut list = |key: &str, values: Vec<Value>| {
        if !values.is_empty() {
            body.insert(key.into(), Value::Array(values));
        }
    };
    list(
        "gd$email",
        c.emails
            .iter()
            .map(|e| with_rel(object(vec![("address", json!(e.address))]), &e.rel, &e.label, e.primary))
            .collect(),
    );
    list(
        "gd$phoneNumber",
        c.phone_numbers
            .iter()
            .map(|p| with_rel(object(vec![("$t", json!(p.number))]), &p.rel, &p.label, p.primary))
            .collect(),
    );
    list(
        "gd$im",
        c.ims
            .iter()
            .map(|i| {
                let mut obj = object(vec![("address", json!(i.address))]);
                if let Some(ref protocol) = i.protocol {
                    obj.insert("protocol".into(), json!(protocol));
                }
                with_rel(obj, &i.rel, &i.label, i.primary)
            })
            .collect(),
    );
    list(
        "gd$organization",
        c.organizations
            .iter()
            .map(|o| {
                let mut obj = object(vec![("gd$orgName", text_node(&o.name))]);
                if let Some(ref title) = o.title {
                    obj.insert("gd$orgTitle".into(), text_node(title));
                }
                with_rel(obj, &o.rel, &o.label, o.primary)
            })
            .collect(),
    );
    list(
        "gd$structuredPostalAddress",
        c.postal_addresses
            .iter()
            .map(|a| {
                with_rel(
                    object(vec![("gd$formattedAddress", text_node(&a.formatted))]),
                    &a.rel,
                    &a.label,
                    a.primary,
                )
            })
            .collect(),
    );
    list(
        "gContact$website",
        c.websites
            .iter()
            .map(|w| with_rel(object(vec![("href", json!(w.href))]), &w.rel, &w.label, w.primary))
            .collect(),
    );
    list(
        "gContact$groupMembershipInfo",
        c.group_memberships
            .iter()
            .map(|g| json!({ "href": g.href, "deleted": g.deleted.to_string() }))
            .collect(),
    );
}

/// Encode an entry as a write body: `{"entry": {...}}`.
///
/// Server-owned fields are left out, except the id and ETag an update must
/// echo back. Links, photo and system-group tags are never sent.
pub fn encode_entry(entry: &Entry) -> Value {
    let mut body = Map::new();
    let meta = entry.meta();
    if let Some(ref id) = meta.id {
        body.insert("id".into(), text_node(id));
    }
    if let Some(ref etag) = meta.etag {
        body.insert("gd$etag".into(), json!(etag));
    }

    let (title, content) = match entry {
        Entry::Contact(c) => (&c.title, &c.content),
        Entry::Group(g) => (&g.title, &g.content),
    };
    body.insert("title".into(), text_node(title));
    body.insert("content".into(), text_node(content));

    if let Entry::Contact(c) = entry {
        encode_contact(c, &mut body);
    }

    let props = entry.extended_properties();
    if !props.is_empty() {
        body.insert("gd$extendedProperty".into(), encode_properties(props));
    }

    json!({ "entry": Value::Object(body) })
}
