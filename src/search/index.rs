//! Catalog And Prefix-Index Writer
//!
//! The document catalog is four per-domain hashes keyed by the encoded URL
//! (`titles`, `urls`, `itemTypes`, and `groups` for grouped documents);
//! absence of a `titles` entry is the authoritative signal that a URL is
//! unknown. The prefix index is derived data: one popularity-scored set per
//! prefix of the title, under the domain's namespace or under a group
//! sub-namespace when the document carries a group.
//!
//! Store keys are built by concatenating fixed-width encoded labels with a
//! literal suffix or the prefix string, so readers decode positionally:
//!
//! - `E(domain) + "$titles" | "$urls" | "$itemTypes" | "$groups"`
//! - `E(domain) + prefix` and `E(domain) + E(group) + prefix`
//!
//! All mutations pipeline their commands on the request's client and drain
//! the replies in order; a failed reply aborts the request and may leave
//! earlier commands committed.

use super::tokenizer::prefixes;
use super::types::NewDocument;
use crate::stats::counters;
use crate::store::memory::StoreClient;
use crate::store::protocol::Command;
use crate::tenancy::encoding::encode;
use anyhow::Result;

const TITLES: &str = "$titles";
const URLS: &str = "$urls";
const ITEM_TYPES: &str = "$itemTypes";
const GROUPS: &str = "$groups";

pub fn titles_key(encoded_domain: &str) -> String {
    format!("{}{}", encoded_domain, TITLES)
}

pub fn urls_key(encoded_domain: &str) -> String {
    format!("{}{}", encoded_domain, URLS)
}

pub fn item_types_key(encoded_domain: &str) -> String {
    format!("{}{}", encoded_domain, ITEM_TYPES)
}

pub fn groups_key(encoded_domain: &str) -> String {
    format!("{}{}", encoded_domain, GROUPS)
}

/// Sorted-set key for one prefix, in the base namespace or a group
/// sub-namespace. `encoded_group` is the stored label, already encoded.
pub fn prefix_key(encoded_domain: &str, encoded_group: Option<&str>, prefix: &str) -> String {
    match encoded_group {
        Some(group) => format!("{}{}{}", encoded_domain, group, prefix),
        None => format!("{}{}", encoded_domain, prefix),
    }
}

fn hget(key: String, field: &str) -> Command {
    Command::HGet {
        key,
        field: field.to_string(),
    }
}

fn hset(key: String, field: &str, value: &str) -> Command {
    Command::HSet {
        key,
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn hdel(key: String, field: &str) -> Command {
    Command::HDel {
        key,
        field: field.to_string(),
    }
}

/// Queue removal of `encoded_url` from every prefix set of `title`.
fn append_index_removals(
    client: &mut StoreClient,
    encoded_domain: &str,
    encoded_url: &str,
    title: &str,
    encoded_group: Option<&str>,
) {
    for prefix in prefixes(title) {
        client.append(Command::ZRem {
            key: prefix_key(encoded_domain, encoded_group, &prefix),
            member: encoded_url.to_string(),
        });
    }
}

/// Insert a document, or replace it when the URL is already cataloged.
///
/// The domain document count is bumped only for a URL the catalog has not
/// seen. On replacement the old title's index entries (in the old group's
/// namespace, if any) are queued for removal ahead of the new writes, so a
/// changed title or group leaves no stale prefix entries behind.
pub fn insert_document(client: &mut StoreClient, domain: &str, doc: &NewDocument) -> Result<()> {
    let encoded_domain = encode(domain);
    let encoded_url = encode(&doc.url);

    let prior_title = client
        .run(hget(titles_key(&encoded_domain), &encoded_url))?
        .text();
    if prior_title.is_none() {
        counters::bump_document_count(client, domain, 1)?;
    }

    if let Some(old_title) = &prior_title {
        let old_group = client
            .run(hget(groups_key(&encoded_domain), &encoded_url))?
            .text();
        append_index_removals(
            client,
            &encoded_domain,
            &encoded_url,
            old_title,
            old_group.as_deref(),
        );
        if old_group.is_some() {
            client.append(hdel(groups_key(&encoded_domain), &encoded_url));
        }
    }

    let encoded_group = doc.group.as_deref().map(encode);
    for prefix in prefixes(&doc.title) {
        client.append(Command::ZAdd {
            key: prefix_key(&encoded_domain, encoded_group.as_deref(), &prefix),
            score: doc.popularity,
            member: encoded_url.clone(),
        });
    }
    if let Some(group) = &encoded_group {
        client.append(hset(groups_key(&encoded_domain), &encoded_url, group));
    }
    client.append(hset(titles_key(&encoded_domain), &encoded_url, &doc.title));
    client.append(hset(
        item_types_key(&encoded_domain),
        &encoded_url,
        &doc.item_type,
    ));
    client.append(hset(urls_key(&encoded_domain), &encoded_url, &doc.url));

    client.drain()?;
    tracing::debug!("Indexed document {} for domain {}", doc.url, domain);
    Ok(())
}

/// Remove a document and all of its index entries. Returns false when the
/// URL is not in the domain's catalog.
pub fn delete_document(client: &mut StoreClient, domain: &str, url: &str) -> Result<bool> {
    let encoded_domain = encode(domain);
    let encoded_url = encode(url);

    let Some(title) = client
        .run(hget(titles_key(&encoded_domain), &encoded_url))?
        .text()
    else {
        return Ok(false);
    };
    counters::bump_document_count(client, domain, -1)?;

    let encoded_group = client
        .run(hget(groups_key(&encoded_domain), &encoded_url))?
        .text();

    append_index_removals(
        client,
        &encoded_domain,
        &encoded_url,
        &title,
        encoded_group.as_deref(),
    );
    if encoded_group.is_some() {
        client.append(hdel(groups_key(&encoded_domain), &encoded_url));
    }
    client.append(hdel(titles_key(&encoded_domain), &encoded_url));
    client.append(hdel(urls_key(&encoded_domain), &encoded_url));
    client.append(hdel(item_types_key(&encoded_domain), &encoded_url));

    client.drain()?;
    tracing::debug!("Deleted document {} for domain {}", url, domain);
    Ok(true)
}

/// Remove every document of a domain, index entries included, and zero the
/// domain's document count. Returns how many documents were purged.
pub fn flush_domain(client: &mut StoreClient, domain: &str) -> Result<usize> {
    let encoded_domain = encode(domain);

    let entries = client
        .run(Command::HGetAll {
            key: titles_key(&encoded_domain),
        })?
        .entries()?;

    for (encoded_url, title) in &entries {
        let encoded_group = client
            .run(hget(groups_key(&encoded_domain), encoded_url))?
            .text();
        append_index_removals(
            client,
            &encoded_domain,
            encoded_url,
            title,
            encoded_group.as_deref(),
        );
        if encoded_group.is_some() {
            client.append(hdel(groups_key(&encoded_domain), encoded_url));
        }
        client.append(hdel(titles_key(&encoded_domain), encoded_url));
        client.append(hdel(urls_key(&encoded_domain), encoded_url));
        client.append(hdel(item_types_key(&encoded_domain), encoded_url));
    }

    client.drain()?;
    counters::reset_document_count(client, domain)?;
    tracing::info!("Flushed {} documents for domain {}", entries.len(), domain);
    Ok(entries.len())
}
