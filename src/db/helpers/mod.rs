use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::models::JournalSource;
use crate::profile::{Archetype, Tier};

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} is out of range: {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_date(value: Option<String>, field: &str) -> Result<Option<NaiveDate>> {
    match value {
        Some(raw) => parse_date(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_tier(value: &str) -> Result<Tier> {
    match value {
        "free" => Ok(Tier::Free),
        "plus" => Ok(Tier::Plus),
        "pro" => Ok(Tier::Pro),
        other => Err(anyhow!("unknown tier {other}")),
    }
}

pub fn parse_archetype(value: &str) -> Result<Archetype> {
    match value {
        "explorer" => Ok(Archetype::Explorer),
        "reflector" => Ok(Archetype::Reflector),
        "grounder" => Ok(Archetype::Grounder),
        "connector" => Ok(Archetype::Connector),
        other => Err(anyhow!("unknown archetype {other}")),
    }
}

pub fn parse_journal_source(value: &str) -> Result<JournalSource> {
    match value {
        "typed" => Ok(JournalSource::Typed),
        "dictated" => Ok(JournalSource::Dictated),
        other => Err(anyhow!("unknown journal source {other}")),
    }
}
