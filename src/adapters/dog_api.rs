use crate::adapters::http::{ensure_absolute_url, send_json, trim_base};
use crate::adapters::synth::AttributeSynthesizer;
use crate::domain::model::{RawProviderPet, Species};
use crate::domain::ports::{ConfigProvider, ProviderAdapter};
use crate::utils::error::ProviderError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_DOG_API_BASE: &str = "https://dog.ceo/api";

/// `GET /breeds/list/all`
#[derive(Debug, Deserialize)]
struct BreedIndexResponse {
    message: BTreeMap<String, Vec<String>>,
    status: String,
}

/// `GET /breed/{breed}/images/random`
#[derive(Debug, Deserialize)]
struct BreedImageResponse {
    message: String,
    status: String,
}

fn ensure_success(url: &str, status: &str) -> Result<(), ProviderError> {
    if status == "success" {
        Ok(())
    } else {
        Err(ProviderError::malformed(
            url,
            format!("unexpected status '{}'", status),
        ))
    }
}

fn display_name(breed: &str) -> String {
    let mut chars = breed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// dog.ceo 品種目錄：先列出品種，再為抽中的每個品種各取一張隨機圖片
pub struct DogApiAdapter {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    concurrency: usize,
    synth: AttributeSynthesizer,
}

impl DogApiAdapter {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.as_ref()),
            request_timeout: Duration::from_secs(10),
            concurrency: 5,
            synth: AttributeSynthesizer::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let adapter = Self::new(config.dog_api_base())
            .with_request_timeout(config.request_timeout())
            .with_concurrency(config.concurrent_requests());
        match config.seed() {
            Some(seed) => adapter.with_seed(seed),
            None => adapter,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.synth = self.synth.with_seed(seed);
        self
    }

    async fn list_breeds(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/breeds/list/all", self.base_url);
        let index: BreedIndexResponse =
            send_json(self.client.get(&url), &url, self.request_timeout).await?;
        ensure_success(&url, &index.status)?;
        if index.message.is_empty() {
            return Err(ProviderError::malformed(&url, "breed index is empty"));
        }
        Ok(index.message.into_keys().collect())
    }

    async fn fetch_breed_image(&self, breed: &str) -> Result<String, ProviderError> {
        let url = format!("{}/breed/{}/images/random", self.base_url, breed);
        let image: BreedImageResponse =
            send_json(self.client.get(&url), &url, self.request_timeout).await?;
        ensure_success(&url, &image.status)?;
        ensure_absolute_url(&url, &image.message)
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for DogApiAdapter {
    fn provenance(&self) -> &str {
        "dog"
    }

    fn species(&self) -> Species {
        Species::Dog
    }

    async fn fetch_batch(&self, count: usize) -> Result<Vec<RawProviderPet>, ProviderError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let breeds = self.list_breeds().await?;

        let selected = self.synth.sample(&breeds, count);
        tracing::debug!(
            "Selected {} of {} breeds: {:?}",
            selected.len(),
            breeds.len(),
            selected
        );

        // buffered 依請求順序輸出，不依完成順序
        let results: Vec<(String, Result<String, ProviderError>)> = stream::iter(selected)
            .map(|breed| async move {
                let image = self.fetch_breed_image(&breed).await;
                (breed, image)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut pets = Vec::with_capacity(results.len());
        let mut last_error = None;
        for (breed, image) in results {
            match image {
                Ok(image_url) => {
                    let attrs = self.synth.attributes();
                    pets.push(RawProviderPet {
                        name: display_name(&breed),
                        local_key: breed,
                        image_url,
                        age: attrs.age,
                        gender: attrs.gender,
                        size: attrs.size,
                    });
                }
                Err(e) => {
                    tracing::warn!("⚠️ Dropping breed '{}': {}", breed, e);
                    last_error = Some(e);
                }
            }
        }

        if pets.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        Ok(pets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn breed_index(breeds: &[&str]) -> serde_json::Value {
        let message: serde_json::Map<String, serde_json::Value> = breeds
            .iter()
            .map(|b| (b.to_string(), serde_json::json!([])))
            .collect();
        serde_json::json!({ "message": message, "status": "success" })
    }

    async fn mock_image(server: &MockServer, breed: &str) {
        let path = format!("/breed/{}/images/random", breed);
        let image = format!("https://images.dog.ceo/breeds/{}/1.jpg", breed);
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .json_body(serde_json::json!({ "message": image, "status": "success" }));
            })
            .await;
    }

    #[test]
    fn test_display_name_capitalizes() {
        assert_eq!(display_name("labrador"), "Labrador");
        assert_eq!(display_name(""), "");
    }

    #[tokio::test]
    async fn test_fetch_batch_returns_all_breeds_when_fewer_than_count() {
        let server = MockServer::start_async().await;
        let index = server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200).json_body(breed_index(&["beagle", "pug"]));
            })
            .await;
        mock_image(&server, "beagle").await;
        mock_image(&server, "pug").await;

        let adapter = DogApiAdapter::new(server.base_url()).with_seed(3);
        let mut pets = adapter.fetch_batch(10).await.unwrap();
        pets.sort_by(|a, b| a.local_key.cmp(&b.local_key));

        index.assert_async().await;
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].local_key, "beagle");
        assert_eq!(pets[0].name, "Beagle");
        assert_eq!(pets[0].image_url, "https://images.dog.ceo/breeds/beagle/1.jpg");
        assert_eq!(pets[1].local_key, "pug");
    }

    #[tokio::test]
    async fn test_fetch_batch_samples_requested_count() {
        let server = MockServer::start_async().await;
        let breeds = ["akita", "beagle", "boxer", "collie", "husky", "pug"];
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200).json_body(breed_index(&breeds));
            })
            .await;
        for breed in breeds {
            mock_image(&server, breed).await;
        }

        let adapter = DogApiAdapter::new(server.base_url()).with_seed(11);
        let pets = adapter.fetch_batch(3).await.unwrap();

        assert_eq!(pets.len(), 3);
        let mut keys: Vec<&str> = pets.iter().map(|p| p.local_key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[tokio::test]
    async fn test_single_breed_failure_is_dropped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200).json_body(breed_index(&["beagle", "pug"]));
            })
            .await;
        mock_image(&server, "beagle").await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breed/pug/images/random");
                then.status(404)
                    .json_body(serde_json::json!({ "message": "Breed not found", "status": "error" }));
            })
            .await;

        let adapter = DogApiAdapter::new(server.base_url());
        let pets = adapter.fetch_batch(2).await.unwrap();

        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].local_key, "beagle");
    }

    #[tokio::test]
    async fn test_every_breed_failing_fails_the_batch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200).json_body(breed_index(&["pug"]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breed/pug/images/random");
                then.status(500);
            })
            .await;

        let adapter = DogApiAdapter::new(server.base_url());
        let err = adapter.fetch_batch(1).await.unwrap_err();
        assert!(matches!(err, ProviderError::StatusError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_index_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200).json_body(serde_json::json!({ "breeds": ["pug"] }));
            })
            .await;

        let adapter = DogApiAdapter::new(server.base_url());
        let err = adapter.fetch_batch(5).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedPayload { .. }));
    }

    #[tokio::test]
    async fn test_error_status_field_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200)
                    .json_body(serde_json::json!({ "message": {}, "status": "error" }));
            })
            .await;

        let adapter = DogApiAdapter::new(server.base_url());
        assert!(matches!(
            adapter.fetch_batch(5).await,
            Err(ProviderError::MalformedPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_breed_index_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/breeds/list/all");
                then.status(200).json_body(breed_index(&[]));
            })
            .await;

        let adapter = DogApiAdapter::new(server.base_url());
        assert!(matches!(
            adapter.fetch_batch(5).await,
            Err(ProviderError::MalformedPayload { .. })
        ));
    }
}
