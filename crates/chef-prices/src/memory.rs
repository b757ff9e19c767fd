use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use chef_core::traits::PriceStore;
use chef_core::types::PriceObservation;

/// Process-local store. Nothing survives the process; used for dry runs.
#[derive(Debug, Default)]
pub struct MemoryPriceStore {
    rows: Mutex<Vec<PriceObservation>>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<PriceObservation>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<PriceObservation>>> {
        self.rows.lock().map_err(|_| anyhow::anyhow!("price store lock poisoned"))
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn append(&self, observations: &[PriceObservation]) -> Result<usize> {
        self.rows()?.extend_from_slice(observations);
        Ok(observations.len())
    }

    async fn exists_on(&self, keyword: &str, day: NaiveDate) -> Result<bool> {
        Ok(self.rows()?.iter().any(|o| o.keyword == keyword && o.day == day))
    }

    async fn history(&self, keyword: &str) -> Result<Vec<PriceObservation>> {
        let mut rows: Vec<_> = self.rows()?.iter().filter(|o| o.keyword == keyword).cloned().collect();
        rows.sort_by_key(|o| o.captured_at);
        Ok(rows)
    }
}
