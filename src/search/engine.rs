//! Query Planner
//!
//! Turns a raw query into ranked completions:
//!
//! 1. **Tokenize**: normalize the query the same way titles were indexed.
//! 2. **Mark**: in a multi-word query every term but the last has been
//!    finished by the user (they typed whitespace after it), so those terms
//!    are anchored to the `$`-closed form indexed for completed words. A
//!    query like "one spo" then matches "One Spotless Thing" but not
//!    "Oneanother Sport". Transliteration expansion reorders the term list,
//!    so when it fired the marking is skipped.
//! 3. **Fetch**: per namespace (base index first, then each requested
//!    group), read the top n of the single prefix set, or intersect all
//!    term sets with MAX score aggregation and read the top of that.
//! 4. **Merge**: concatenate, dedup by document id keeping first-seen
//!    order, truncate to n.
//! 5. **Hydrate**: bulk-read urls, titles and item types for the survivors.

use super::index::{item_types_key, prefix_key, titles_key, urls_key};
use super::tokenizer::clean_words;
use super::types::SearchResponse;
use crate::stats::counters;
use crate::store::memory::StoreClient;
use crate::store::protocol::Command;
use crate::tenancy::encoding::encode;
use anyhow::Result;
use std::collections::HashSet;
use uuid::Uuid;

pub fn search_titles(
    client: &mut StoreClient,
    domain: &str,
    query: &str,
    groups: &[String],
    n: usize,
) -> Result<SearchResponse> {
    let (mut terms, expanded) = clean_words(query);
    let searched_terms = terms.clone();

    if terms.len() > 1 && !expanded {
        let last = terms.len() - 1;
        for term in &mut terms[..last] {
            term.push('$');
        }
    }

    counters::record_fetch(client, domain)?;
    tracing::debug!("Search for {:?} in domain {}", searched_terms, domain);

    if terms.is_empty() {
        return Ok(SearchResponse {
            terms: searched_terms,
            results: Vec::new(),
        });
    }

    let encoded_domain = encode(domain);
    let mut hits = ranked_hits(client, &encoded_domain, None, &terms, n)?;
    for group in groups {
        hits.extend(ranked_hits(client, &encoded_domain, Some(group), &terms, n)?);
    }

    let mut seen = HashSet::new();
    hits.retain(|(member, _)| seen.insert(member.clone()));
    hits.truncate(n);

    Ok(SearchResponse {
        terms: searched_terms,
        results: hydrate(client, &encoded_domain, &hits)?,
    })
}

/// Top `n` document ids for `terms` within one namespace, best score first.
/// A single term reads its prefix set directly; several terms intersect
/// into a request-unique scratch key that is read back and then dropped.
fn ranked_hits(
    client: &mut StoreClient,
    encoded_domain: &str,
    group: Option<&str>,
    terms: &[String],
    n: usize,
) -> Result<Vec<(String, f64)>> {
    let encoded_group = group.map(encode);
    let keys: Vec<String> = terms
        .iter()
        .map(|term| prefix_key(encoded_domain, encoded_group.as_deref(), term))
        .collect();

    if keys.len() == 1 {
        return client
            .run(Command::ZRevRange {
                key: keys.into_iter().next().expect("one key"),
                start: 0,
                stop: n as i64 - 1,
            })?
            .scored();
    }

    let scratch = format!("$tmp${}", Uuid::new_v4());
    client.append(Command::ZInterStore {
        dest: scratch.clone(),
        keys,
    });
    client.append(Command::ZRevRange {
        key: scratch.clone(),
        start: 0,
        stop: n as i64 - 1,
    });
    client.append(Command::Del { key: scratch });

    let mut replies = client.drain()?;
    replies.remove(1).scored()
}

fn hydrate(
    client: &mut StoreClient,
    encoded_domain: &str,
    hits: &[(String, f64)],
) -> Result<Vec<(String, String, String)>> {
    if hits.is_empty() {
        return Ok(Vec::new());
    }
    let members: Vec<String> = hits.iter().map(|(member, _)| member.clone()).collect();

    let titles = client
        .run(Command::HMGet {
            key: titles_key(encoded_domain),
            fields: members.clone(),
        })?
        .fields()?;
    let item_types = client
        .run(Command::HMGet {
            key: item_types_key(encoded_domain),
            fields: members.clone(),
        })?
        .fields()?;
    let urls = client
        .run(Command::HMGet {
            key: urls_key(encoded_domain),
            fields: members,
        })?
        .fields()?;

    let mut rows = Vec::with_capacity(titles.len());
    for (i, title) in titles.into_iter().enumerate() {
        // A missing title means the document vanished between the ranked
        // read and hydration; drop the row rather than return holes.
        let Some(title) = title else { continue };
        rows.push((
            urls[i].clone().unwrap_or_default(),
            title,
            item_types[i].clone().unwrap_or_default(),
        ));
    }
    Ok(rows)
}
