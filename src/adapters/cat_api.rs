use crate::adapters::http::{ensure_absolute_url, send_json, trim_base};
use crate::adapters::synth::AttributeSynthesizer;
use crate::domain::model::{RawProviderPet, Species};
use crate::domain::ports::{ConfigProvider, ProviderAdapter, SizePolicy};
use crate::utils::error::ProviderError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CAT_API_BASE: &str = "https://api.thecatapi.com/v1";

/// `GET /images/search?limit=N` 回傳的單筆圖片
#[derive(Debug, Deserialize)]
struct CatImage {
    #[serde(default)]
    url: Option<String>,
}

pub fn synthesized_name(index: usize) -> String {
    format!("Whiskers {}", index + 1)
}

/// TheCatAPI：單一請求取回最多 `count` 張圖片，名稱依序合成
pub struct CatApiAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    request_timeout: Duration,
    synth: AttributeSynthesizer,
}

impl CatApiAdapter {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.as_ref()),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            synth: AttributeSynthesizer::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let mut adapter = Self::new(config.cat_api_base())
            .with_request_timeout(config.request_timeout())
            .with_size_policy(config.cat_size_policy());
        if let Some(api_key) = config.cat_api_key() {
            adapter = adapter.with_api_key(api_key);
        }
        match config.seed() {
            // 與 dog adapter 錯開，避免兩邊產生相同序列
            Some(seed) => adapter.with_seed(seed.wrapping_add(1)),
            None => adapter,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_size_policy(mut self, size_policy: SizePolicy) -> Self {
        self.synth = self.synth.with_size_policy(size_policy);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.synth = self.synth.with_seed(seed);
        self
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for CatApiAdapter {
    fn provenance(&self) -> &str {
        "cat"
    }

    fn species(&self) -> Species {
        Species::Cat
    }

    async fn fetch_batch(&self, count: usize) -> Result<Vec<RawProviderPet>, ProviderError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}/images/search?limit={}", self.base_url, count);
        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let images: Vec<CatImage> = send_json(request, &url, self.request_timeout).await?;
        tracing::debug!("Cat API returned {} images", images.len());

        let mut pets = Vec::with_capacity(images.len().min(count));
        let mut dropped = 0usize;
        for (index, image) in images.into_iter().take(count).enumerate() {
            let image_url = match image.url.as_deref().map(|raw| ensure_absolute_url(&url, raw)) {
                Some(Ok(image_url)) => image_url,
                Some(Err(e)) => {
                    tracing::warn!("⚠️ Dropping cat image #{}: {}", index, e);
                    dropped += 1;
                    continue;
                }
                None => {
                    tracing::warn!("⚠️ Dropping cat image #{}: missing url", index);
                    dropped += 1;
                    continue;
                }
            };

            let attrs = self.synth.attributes();
            pets.push(RawProviderPet {
                local_key: index.to_string(),
                name: synthesized_name(index),
                image_url,
                age: attrs.age,
                gender: attrs.gender,
                size: attrs.size,
            });
        }

        // 有圖片但全部不可用，等同來源失敗
        if pets.is_empty() && dropped > 0 {
            return Err(ProviderError::malformed(&url, "no usable images"));
        }

        Ok(pets)
    }
}
