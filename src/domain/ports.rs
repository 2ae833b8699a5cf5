use crate::domain::model::{RawProviderPet, Size, Species};
use crate::utils::error::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

/// 上游來源的轉接器，每個來源一個實作
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// id 前綴，例如 `"dog"`，在同一個 aggregator 內必須唯一
    fn provenance(&self) -> &str;

    fn species(&self) -> Species;

    async fn fetch_batch(&self, count: usize) -> Result<Vec<RawProviderPet>, ProviderError>;
}

/// 合成 size 的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    #[default]
    Random,
    Fixed(Size),
}

pub trait ConfigProvider: Send + Sync {
    fn dog_api_base(&self) -> &str;
    fn cat_api_base(&self) -> &str;
    fn batch_size(&self) -> usize;
    fn fetch_timeout(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn concurrent_requests(&self) -> usize;

    fn cat_size_policy(&self) -> SizePolicy {
        SizePolicy::Random
    }

    /// TheCatAPI 的 `x-api-key`，沒有也能使用
    fn cat_api_key(&self) -> Option<&str> {
        None
    }

    fn seed(&self) -> Option<u64> {
        None
    }
}
