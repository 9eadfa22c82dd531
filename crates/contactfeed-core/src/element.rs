//! Candidate entries built from per-field command values.
//!
//! Repeatable fields take `value[;key=val|;flag]*`, e.g.
//! `ada@example.test;rel=work;primary` or `+44 20 7946 0000;label=lab`.
//! Known keys are `rel`, `label`, `primary`, `protocol` (IMs) and `title`
//! (organizations). A bare `rel` such as `home` expands to the service's
//! well-known relation URI.
//!
//! Extended properties are `name=value`; a value starting with `<` is sent
//! as an XML blob.

use crate::entry::{
    check_unique_properties, ContactEntry, Email, Entry, ExtendedProperty, FeedKind, GroupEntry,
    GroupMembership, Im, Name, Organization, PhoneNumber, PostalAddress, Website,
};
use crate::error::ValidationError;

const REL_PREFIX: &str = "http://schemas.google.com/g/2005#";

/// Field values supplied for add/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDesc {
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nickname: Option<String>,
    pub birthday: Option<String>,
    pub notes: Option<String>,
    /// Group title.
    pub title: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub ims: Vec<String>,
    pub organizations: Vec<String>,
    pub postal_addresses: Vec<String>,
    pub websites: Vec<String>,
    pub groups: Vec<String>,
    pub extended_properties: Vec<String>,
}

/// One parsed `value;key=val;flag` item.
#[derive(Debug, Default)]
struct Item {
    value: String,
    rel: Option<String>,
    label: Option<String>,
    primary: bool,
    protocol: Option<String>,
    title: Option<String>,
}

fn expand_rel(rel: &str) -> String {
    if rel.contains('#') || rel.contains("://") {
        rel.to_string()
    } else {
        format!("{REL_PREFIX}{rel}")
    }
}

fn parse_item(field: &str, raw: &str) -> Result<Item, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    };

    let mut parts = raw.split(';');
    let value = parts.next().unwrap_or_default().trim();
    if value.is_empty() {
        return Err(invalid(format!("empty value in {raw:?}")));
    }

    let mut item = Item {
        value: value.to_string(),
        ..Default::default()
    };
    for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
        let (key, val) = match part.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim().to_string())),
            None => (part, None),
        };
        match (key, val) {
            ("primary", None) => item.primary = true,
            ("primary", Some(v)) => {
                item.primary = v
                    .parse()
                    .map_err(|_| invalid(format!("primary must be true or false, got {v:?}")))?
            }
            ("rel", Some(v)) => item.rel = Some(expand_rel(&v)),
            ("label", Some(v)) => item.label = Some(v),
            ("protocol", Some(v)) => item.protocol = Some(v),
            ("title", Some(v)) => item.title = Some(v),
            (other, _) => return Err(invalid(format!("unknown attribute {other:?}"))),
        }
    }
    Ok(item)
}

fn parse_all<T>(
    field: &str,
    values: &[String],
    f: impl Fn(Item) -> T,
) -> Result<Vec<T>, ValidationError> {
    values
        .iter()
        .map(|raw| parse_item(field, raw).map(&f))
        .collect()
}

fn parse_property(raw: &str) -> Result<ExtendedProperty, ValidationError> {
    let (name, value) = raw
        .split_once('=')
        .map(|(n, v)| (n.trim(), v.trim()))
        .filter(|(n, _)| !n.is_empty())
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "extended-property".into(),
            message: format!("expected name=value, got {raw:?}"),
        })?;
    Ok(if value.starts_with('<') {
        ExtendedProperty::xml_blob(name, value)
    } else {
        ExtendedProperty::value(name, value)
    })
}

impl ElementDesc {
    fn properties(&self) -> Result<Vec<ExtendedProperty>, ValidationError> {
        let props = self
            .extended_properties
            .iter()
            .map(|raw| parse_property(raw))
            .collect::<Result<Vec<_>, _>>()?;
        check_unique_properties(&props)?;
        Ok(props)
    }

    /// Build a fresh, client-side contact.
    pub fn build_contact(&self) -> Result<ContactEntry, ValidationError> {
        let name = if self.name.is_some() || self.given_name.is_some() || self.family_name.is_some() {
            let full_name = self.name.clone().or_else(|| {
                let joined = [self.given_name.as_deref(), self.family_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(joined).filter(|s| !s.is_empty())
            });
            Some(Name {
                full_name,
                given_name: self.given_name.clone(),
                family_name: self.family_name.clone(),
            })
        } else {
            None
        };

        Ok(ContactEntry {
            title: name
                .as_ref()
                .and_then(|n| n.full_name.clone())
                .unwrap_or_default(),
            content: self.notes.clone().unwrap_or_default(),
            name,
            nickname: self.nickname.clone(),
            birthday: self.birthday.clone(),
            emails: parse_all("email", &self.emails, |i| Email {
                address: i.value,
                rel: i.rel,
                label: i.label,
                primary: i.primary,
            })?,
            phone_numbers: parse_all("phone", &self.phones, |i| PhoneNumber {
                number: i.value,
                rel: i.rel,
                label: i.label,
                primary: i.primary,
            })?,
            ims: parse_all("im", &self.ims, |i| Im {
                address: i.value,
                protocol: i.protocol.map(|p| expand_rel(&p)),
                rel: i.rel,
                label: i.label,
                primary: i.primary,
            })?,
            organizations: parse_all("organization", &self.organizations, |i| Organization {
                name: i.value,
                title: i.title,
                rel: i.rel,
                label: i.label,
                primary: i.primary,
            })?,
            postal_addresses: parse_all("postal", &self.postal_addresses, |i| PostalAddress {
                formatted: i.value,
                rel: i.rel,
                label: i.label,
                primary: i.primary,
            })?,
            websites: parse_all("website", &self.websites, |i| Website {
                href: i.value,
                rel: i.rel,
                label: i.label,
                primary: i.primary,
            })?,
            group_memberships: parse_all("group", &self.groups, |i| GroupMembership {
                href: i.value,
                deleted: false,
            })?,
            extended_properties: self.properties()?,
            ..Default::default()
        })
    }

    /// Build a fresh, client-side group.
    pub fn build_group(&self) -> Result<GroupEntry, ValidationError> {
        Ok(GroupEntry {
            title: self
                .title
                .clone()
                .or_else(|| self.name.clone())
                .unwrap_or_default(),
            content: self.notes.clone().unwrap_or_default(),
            extended_properties: self.properties()?,
            ..Default::default()
        })
    }

    pub fn build(&self, kind: FeedKind) -> Result<Entry, ValidationError> {
        Ok(match kind {
            FeedKind::Contact => Entry::Contact(self.build_contact()?),
            FeedKind::Group => Entry::Group(self.build_group()?),
        })
    }
}

/// Help text describing the field flags.
pub fn usage() -> &'static str {
    concat!(
        "             --name=<full name> [--given-name=<given>] [--family-name=<family>]\n",
        "             --nickname=<nickname> --birthday=<YYYY-MM-DD>\n",
        "             --notes=<notes> (contact notes, group description)\n",
        "             --title=<group title>\n",
        "             --email=<address>[;rel=<rel>|;label=<label>][;primary]\n",
        "             --phone=<number>[;rel=<rel>|;label=<label>][;primary]\n",
        "             --im=<address>[;protocol=<protocol>][;rel=<rel>][;primary]\n",
        "             --organization=<name>[;title=<job title>][;rel=<rel>][;primary]\n",
        "             --postal=<formatted address>[;rel=<rel>][;primary]\n",
        "             --website=<url>[;rel=<rel>][;primary]\n",
        "             --group=<group id>\n",
        "             --extended-property=<name>=<value or xml blob>\n",
        "             (repeatable fields may be given more than once; rel may be\n",
        "              a short name such as home, work, mobile, other)\n",
    )
}
