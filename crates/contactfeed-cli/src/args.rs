use std::path::PathBuf;

use clap::{Args, Parser};
use contactfeed_core::{
    Action, ActionRequest, Config, ElementDesc, FeedKind, QueryParameters, ValidationError,
};

#[derive(Parser, Debug)]
#[command(
    name = "contactfeed",
    version,
    about = "Sync contacts and contact groups with a remote contacts feed"
)]
pub struct Cli {
    /// Read one command per line from FILE
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Configuration file (default: ~/.config/contactfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub account: AccountArgs,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Overrides for the `[account]` and `[feed]` config sections.
#[derive(Args, Debug, Clone, Default)]
pub struct AccountArgs {
    /// Service-account key (JSON key file or PEM private key)
    #[arg(long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    /// Service account id; defaults to the key file's client_email
    #[arg(long, value_name = "ID")]
    pub service_account: Option<String>,

    /// User whose address book is accessed
    #[arg(long, value_name = "USER")]
    pub impersonate: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub application_name: Option<String>,

    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Feed projection (thin, full, ...)
    #[arg(long, value_name = "PROJECTION")]
    pub projection: Option<String>,
}

impl AccountArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.key_file {
            config.account.key_file = Some(v.clone());
        }
        if let Some(v) = &self.service_account {
            config.account.service_account = Some(v.clone());
        }
        if let Some(v) = &self.impersonate {
            config.account.impersonated_user = Some(v.clone());
        }
        if let Some(v) = &self.application_name {
            config.account.application_name = v.clone();
        }
        if let Some(v) = &self.base_url {
            config.feed.base_url = v.clone();
        }
        if let Some(v) = &self.projection {
            config.feed.projection = v.clone();
        }
    }
}

/// Flags describing one action. Script lines use the same set.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Operate on the contacts feed (default)
    #[arg(long)]
    pub contactfeed: bool,

    /// Operate on the groups feed
    #[arg(long)]
    pub groupfeed: bool,

    /// list, query, add, delete or update
    #[arg(long)]
    pub action: Option<Action>,

    // Query filters
    /// Only entries updated since this timestamp
    #[arg(long, value_name = "TIMESTAMP", help_heading = "Query")]
    pub updated_min: Option<String>,

    #[arg(long, allow_negative_numbers = true, help_heading = "Query")]
    pub max_results: Option<i64>,

    #[arg(long, allow_negative_numbers = true, help_heading = "Query")]
    pub start_index: Option<i64>,

    /// Include deleted entries
    #[arg(long, help_heading = "Query")]
    pub showdeleted: bool,

    #[arg(long, value_name = "BOOL", help_heading = "Query")]
    pub require_all_deleted: Option<bool>,

    /// ascending or descending
    #[arg(long, help_heading = "Query")]
    pub sortorder: Option<String>,

    /// lastmodified
    #[arg(long, help_heading = "Query")]
    pub orderby: Option<String>,

    /// Only contacts in this group
    #[arg(long, value_name = "GROUP_ID", help_heading = "Query")]
    pub querygroupid: Option<String>,

    // Entry fields
    /// Entry id for delete and update
    #[arg(long, help_heading = "Entry")]
    pub id: Option<String>,

    #[arg(long, help_heading = "Entry")]
    pub name: Option<String>,

    #[arg(long, help_heading = "Entry")]
    pub given_name: Option<String>,

    #[arg(long, help_heading = "Entry")]
    pub family_name: Option<String>,

    #[arg(long, help_heading = "Entry")]
    pub nickname: Option<String>,

    #[arg(long, help_heading = "Entry")]
    pub birthday: Option<String>,

    /// Contact notes or group description
    #[arg(long, help_heading = "Entry")]
    pub notes: Option<String>,

    /// Group title
    #[arg(long, help_heading = "Entry")]
    pub title: Option<String>,

    #[arg(long, value_name = "ADDRESS[;rel=..][;primary]", help_heading = "Entry")]
    pub email: Vec<String>,

    #[arg(long, value_name = "NUMBER[;rel=..][;primary]", help_heading = "Entry")]
    pub phone: Vec<String>,

    #[arg(long, value_name = "ADDRESS[;protocol=..]", help_heading = "Entry")]
    pub im: Vec<String>,

    #[arg(long, value_name = "NAME[;title=..]", help_heading = "Entry")]
    pub organization: Vec<String>,

    #[arg(long, value_name = "ADDRESS[;rel=..]", help_heading = "Entry")]
    pub postal: Vec<String>,

    #[arg(long, value_name = "URL[;rel=..]", help_heading = "Entry")]
    pub website: Vec<String>,

    /// Group membership by group id
    #[arg(long, value_name = "GROUP_ID", help_heading = "Entry")]
    pub group: Vec<String>,

    #[arg(long, value_name = "NAME=VALUE", help_heading = "Entry")]
    pub extended_property: Vec<String>,
}

fn or<T: Clone>(line: &Option<T>, global: &Option<T>) -> Option<T> {
    line.clone().or_else(|| global.clone())
}

fn or_vec(line: &[String], global: &[String]) -> Vec<String> {
    if line.is_empty() {
        global.to_vec()
    } else {
        line.to_vec()
    }
}

impl RequestArgs {
    pub fn feed_kind(&self) -> Result<FeedKind, ValidationError> {
        FeedKind::from_flags(self.contactfeed, self.groupfeed)
    }

    /// Layer script-line flags over the command-line flags. A field set on
    /// the line wins.
    pub fn overlay(&self, global: &RequestArgs) -> RequestArgs {
        let feed_given = self.contactfeed || self.groupfeed;
        RequestArgs {
            contactfeed: if feed_given { self.contactfeed } else { global.contactfeed },
            groupfeed: if feed_given { self.groupfeed } else { global.groupfeed },
            action: or(&self.action, &global.action),
            updated_min: or(&self.updated_min, &global.updated_min),
            max_results: or(&self.max_results, &global.max_results),
            start_index: or(&self.start_index, &global.start_index),
            showdeleted: self.showdeleted || global.showdeleted,
            require_all_deleted: or(&self.require_all_deleted, &global.require_all_deleted),
            sortorder: or(&self.sortorder, &global.sortorder),
            orderby: or(&self.orderby, &global.orderby),
            querygroupid: or(&self.querygroupid, &global.querygroupid),
            id: or(&self.id, &global.id),
            name: or(&self.name, &global.name),
            given_name: or(&self.given_name, &global.given_name),
            family_name: or(&self.family_name, &global.family_name),
            nickname: or(&self.nickname, &global.nickname),
            birthday: or(&self.birthday, &global.birthday),
            notes: or(&self.notes, &global.notes),
            title: or(&self.title, &global.title),
            email: or_vec(&self.email, &global.email),
            phone: or_vec(&self.phone, &global.phone),
            im: or_vec(&self.im, &global.im),
            organization: or_vec(&self.organization, &global.organization),
            postal: or_vec(&self.postal, &global.postal),
            website: or_vec(&self.website, &global.website),
            group: or_vec(&self.group, &global.group),
            extended_property: or_vec(&self.extended_property, &global.extended_property),
        }
    }

    pub fn to_request(&self, config: &Config) -> Result<ActionRequest, ValidationError> {
        let params = QueryParameters {
            target: config.feed_target(self.feed_kind()?),
            updated_min: self.updated_min.clone(),
            max_results: self.max_results,
            start_index: self.start_index,
            show_deleted: self.showdeleted.then_some(true),
            require_all_deleted: self.require_all_deleted,
            sort_order: self.sortorder.clone(),
            order_by: self.orderby.clone(),
            group: self.querygroupid.clone(),
        };

        Ok(ActionRequest {
            action: self.action,
            params,
            id: self.id.clone(),
            element: ElementDesc {
                name: self.name.clone(),
                given_name: self.given_name.clone(),
                family_name: self.family_name.clone(),
                nickname: self.nickname.clone(),
                birthday: self.birthday.clone(),
                notes: self.notes.clone(),
                title: self.title.clone(),
                emails: self.email.clone(),
                phones: self.phone.clone(),
                ims: self.im.clone(),
                organizations: self.organization.clone(),
                postal_addresses: self.postal.clone(),
                websites: self.website.clone(),
                groups: self.group.clone(),
                extended_properties: self.extended_property.clone(),
            },
        })
    }
}

/// Parser for a single script line.
#[derive(Parser, Debug)]
#[command(name = "script", no_binary_name = true)]
pub struct ScriptLine {
    #[command(flatten)]
    pub request: RequestArgs,
}
