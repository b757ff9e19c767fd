//! LanceDB persistence for price observations.
//!
//! One row per observation; rows are only ever appended. Lookups filter on
//! the `keyword` and `day` columns and sort by capture time in memory.

use anyhow::Result;
use arrow_array::{Float64Array, RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use std::sync::Arc;
use tracing::debug;

use chef_core::traits::PriceStore;
use chef_core::types::PriceObservation;

use crate::schema::{build_price_schema, DAY_FORMAT};

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

pub async fn ensure_price_table(conn: &Connection, name: &str) -> Result<()> {
    let names = conn.table_names().execute().await?;
    if names.contains(&name.to_string()) {
        return Ok(());
    }
    // create empty table with 0 rows
    let schema = build_price_schema();
    let iter = RecordBatchIterator::new(vec![].into_iter(), schema.clone());
    conn.create_table(name, Box::new(iter)).execute().await?;
    Ok(())
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn to_record_batch(observations: &[PriceObservation]) -> Result<RecordBatch> {
    let mut keywords = Vec::new(); let mut names = Vec::new(); let mut urls = Vec::new();
    let mut prices = Vec::new(); let mut days = Vec::new(); let mut captured = Vec::new();
    for o in observations {
        keywords.push(o.keyword.clone());
        names.push(o.name.clone());
        urls.push(o.url.clone());
        prices.push(o.price);
        days.push(o.day.format(DAY_FORMAT).to_string());
        captured.push(o.captured_at.timestamp_millis());
    }
    let batch = RecordBatch::try_new(build_price_schema(), vec![
        Arc::new(StringArray::from(keywords)),
        Arc::new(StringArray::from(names)),
        Arc::new(StringArray::from(urls)),
        Arc::new(Float64Array::from(prices)),
        Arc::new(StringArray::from(days)),
        Arc::new(TimestampMillisecondArray::from(captured)),
    ])?;
    Ok(batch)
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow::anyhow!("{name} column missing"))
}

fn from_record_batch(batch: &RecordBatch) -> Result<Vec<PriceObservation>> {
    let keyword = string_col(batch, "keyword")?;
    let name = string_col(batch, "name")?;
    let url = string_col(batch, "url")?;
    let day = string_col(batch, "day")?;
    let price = batch
        .column_by_name("price")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| anyhow::anyhow!("price column missing"))?;
    let captured = batch
        .column_by_name("captured_at")
        .and_then(|c| c.as_any().downcast_ref::<TimestampMillisecondArray>())
        .ok_or_else(|| anyhow::anyhow!("captured_at column missing"))?;

    let mut out = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let captured_at = DateTime::<Utc>::from_timestamp_millis(captured.value(i))
            .ok_or_else(|| anyhow::anyhow!("captured_at out of range: {}", captured.value(i)))?;
        out.push(PriceObservation {
            keyword: keyword.value(i).to_string(),
            name: name.value(i).to_string(),
            url: url.value(i).to_string(),
            price: price.value(i),
            captured_at,
            day: NaiveDate::parse_from_str(day.value(i), DAY_FORMAT)?,
        });
    }
    Ok(out)
}

/// Append-only store of price observations in a LanceDB table.
pub struct LancePriceStore { db: Connection, table_name: String }

impl LancePriceStore {
    pub async fn open(uri: &str, table_name: &str) -> Result<Self> {
        let db = open_db(uri).await?;
        ensure_price_table(&db, table_name).await?;
        Ok(Self { db, table_name: table_name.to_string() })
    }

    async fn select(&self, predicate: &str) -> Result<Vec<PriceObservation>> {
        let t = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = t.query().only_if(predicate).execute().await?;
        let mut out = Vec::new();
        while let Some(batch) = futures::TryStreamExt::try_next(&mut stream).await? {
            out.extend(from_record_batch(&batch)?);
        }
        Ok(out)
    }
}

#[async_trait]
impl PriceStore for LancePriceStore {
    async fn append(&self, observations: &[PriceObservation]) -> Result<usize> {
        if observations.is_empty() { return Ok(0); }
        let record_batch = to_record_batch(observations)?; let schema = record_batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
        self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
        debug!("appended {} observations to {}", observations.len(), self.table_name);
        Ok(observations.len())
    }

    async fn exists_on(&self, keyword: &str, day: NaiveDate) -> Result<bool> {
        let predicate = format!("keyword = {} AND day = {}", quote(keyword), quote(&day.format(DAY_FORMAT).to_string()));
        Ok(!self.select(&predicate).await?.is_empty())
    }

    async fn history(&self, keyword: &str) -> Result<Vec<PriceObservation>> {
        let mut rows = self.select(&format!("keyword = {}", quote(keyword))).await?;
        rows.sort_by_key(|o| o.captured_at);
        Ok(rows)
    }
}
