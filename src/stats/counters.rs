use crate::store::memory::StoreClient;
use crate::store::protocol::{Command, Reply};
use anyhow::{Result, anyhow};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;

/// Global map of lifetime document counts, `{domain -> count}`.
pub const DOMAIN_DOCUMENTS: &str = "$domaindocuments";

/// First year the service observed traffic; reports start here.
const EPOCH_YEAR: i32 = 2015;

fn fetches_key(year: i32, month: u32) -> String {
    format!("$domainfetches${}${}", year, month)
}

/// Bump the current month's fetch counter for a domain.
pub fn record_fetch(client: &mut StoreClient, domain: &str) -> Result<()> {
    let now = Utc::now();
    client.run(Command::HIncrBy {
        key: fetches_key(now.year(), now.month()),
        field: domain.to_string(),
        delta: 1,
    })?;
    Ok(())
}

pub fn bump_document_count(client: &mut StoreClient, domain: &str, delta: i64) -> Result<i64> {
    client
        .run(Command::HIncrBy {
            key: DOMAIN_DOCUMENTS.to_string(),
            field: domain.to_string(),
            delta,
        })?
        .int()
}

pub fn reset_document_count(client: &mut StoreClient, domain: &str) -> Result<()> {
    client.run(Command::HSet {
        key: DOMAIN_DOCUMENTS.to_string(),
        field: domain.to_string(),
        value: "0".to_string(),
    })?;
    Ok(())
}

pub fn document_count(client: &mut StoreClient, domain: &str) -> Result<i64> {
    let reply = client.run(Command::HGet {
        key: DOMAIN_DOCUMENTS.to_string(),
        field: domain.to_string(),
    })?;
    match reply {
        Reply::Text(raw) if !raw.is_empty() => raw
            .parse::<i64>()
            .map_err(|_| anyhow!("document count for {} is not an integer", domain)),
        _ => Ok(0),
    }
}

/// Monthly fetch counts, `{year -> {month -> count}}`, from the epoch year
/// through the current month. Months with no observed fetches are omitted
/// from their year's map; every year in the range is present.
pub fn monthly_fetches(
    client: &mut StoreClient,
    domain: &str,
) -> Result<BTreeMap<String, BTreeMap<String, i64>>> {
    let now = Utc::now();
    let mut years = BTreeMap::new();
    for year in EPOCH_YEAR..=now.year() {
        let mut months = BTreeMap::new();
        for month in 1..=12u32 {
            if year == now.year() && month > now.month() {
                break;
            }
            let reply = client.run(Command::HGet {
                key: fetches_key(year, month),
                field: domain.to_string(),
            })?;
            if let Some(raw) = reply.text() {
                let count = raw
                    .parse::<i64>()
                    .map_err(|_| anyhow!("fetch count for {} is not an integer", domain))?;
                months.insert(month.to_string(), count);
            }
        }
        years.insert(year.to_string(), months);
    }
    Ok(years)
}
