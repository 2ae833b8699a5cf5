use crate::domain::model::{CatalogSnapshot, Pet};
use crate::domain::ports::{ConfigProvider, ProviderAdapter};
use crate::utils::error::{
    AggregationError, PetError, ProviderError, ProviderFailure, Result,
};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// 同時向所有來源取資料並合併成單一 snapshot
pub struct CatalogAggregator {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    batch_size: usize,
    fetch_timeout: Duration,
}

impl CatalogAggregator {
    /// adapter 的註冊順序即 snapshot 中的來源順序
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Result<Self> {
        if adapters.is_empty() {
            return Err(PetError::ConfigError {
                message: "at least one provider adapter is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for adapter in &adapters {
            let provenance = adapter.provenance();
            if provenance.trim().is_empty() {
                return Err(PetError::InvalidConfigValueError {
                    field: "provenance".to_string(),
                    value: provenance.to_string(),
                    reason: "provenance prefix cannot be empty".to_string(),
                });
            }
            if !seen.insert(provenance.to_string()) {
                return Err(PetError::InvalidConfigValueError {
                    field: "provenance".to_string(),
                    value: provenance.to_string(),
                    reason: "provenance prefixes must be unique".to_string(),
                });
            }
        }

        Ok(Self {
            adapters,
            batch_size: DEFAULT_BATCH_SIZE,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }

    pub fn from_config<C: ConfigProvider>(
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        config: &C,
    ) -> Result<Self> {
        Ok(Self::new(adapters)?
            .with_batch_size(config.batch_size())
            .with_fetch_timeout(config.fetch_timeout()))
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn provenances(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.provenance()).collect()
    }

    async fn fetch_one(
        &self,
        adapter: &dyn ProviderAdapter,
    ) -> std::result::Result<Vec<Pet>, ProviderError> {
        let provenance = adapter.provenance();
        let batch = tokio::time::timeout(self.fetch_timeout, adapter.fetch_batch(self.batch_size))
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: provenance.to_string(),
                timeout_ms: self.fetch_timeout.as_millis() as u64,
            })??;

        let species = adapter.species();
        Ok(batch
            .into_iter()
            .map(|raw| Pet::from_raw(provenance, species, raw))
            .collect())
    }

    /// 等所有來源結束（成功或失敗）後合併；只有全部失敗才回傳錯誤
    pub async fn refresh(&self) -> std::result::Result<CatalogSnapshot, AggregationError> {
        tracing::info!(
            "🔄 Refreshing catalog from providers: {}",
            self.provenances().join(", ")
        );

        let settled = join_all(
            self.adapters
                .iter()
                .map(|adapter| self.fetch_one(adapter.as_ref())),
        )
        .await;

        let mut pets = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut failures = Vec::new();
        let mut succeeded = 0usize;

        for (adapter, outcome) in self.adapters.iter().zip(settled) {
            let provenance = adapter.provenance();
            match outcome {
                Ok(batch) => {
                    succeeded += 1;
                    tracing::debug!("Provider '{}' returned {} pets", provenance, batch.len());
                    for pet in batch {
                        if seen_ids.insert(pet.id().to_string()) {
                            pets.push(pet);
                        } else {
                            tracing::warn!("⚠️ Dropping duplicate pet id '{}'", pet.id());
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!("⚠️ Provider '{}' failed: {}", provenance, error);
                    failures.push(ProviderFailure {
                        provenance: provenance.to_string(),
                        error,
                    });
                }
            }
        }

        if succeeded == 0 {
            tracing::error!("❌ All {} providers failed", failures.len());
            return Err(AggregationError { failures });
        }

        let failed_providers: Vec<String> =
            failures.into_iter().map(|f| f.provenance).collect();
        tracing::info!(
            "✅ Catalog refreshed: {} pets ({} providers failed)",
            pets.len(),
            failed_providers.len()
        );

        Ok(CatalogSnapshot::new(pets, failed_providers))
    }
}
