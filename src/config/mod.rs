pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::{cat_api::DEFAULT_CAT_API_BASE, dog_api::DEFAULT_DOG_API_BASE};
#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, SizePolicy};
#[cfg(feature = "cli")]
use crate::domain::model::{FilterState, Size, SpeciesFilter};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "pet-catalog")]
#[command(about = "Browse adoptable dogs and cats aggregated from public image APIs")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_DOG_API_BASE)]
    pub dog_api_base: String,

    #[arg(long, default_value = DEFAULT_CAT_API_BASE)]
    pub cat_api_base: String,

    #[arg(long, help = "Optional TheCatAPI key sent as x-api-key")]
    pub cat_api_key: Option<String>,

    #[arg(long, default_value = "10", help = "Pets requested from each provider")]
    pub batch_size: usize,

    #[arg(long, default_value = "10", help = "Timeout for a whole provider fetch")]
    pub fetch_timeout_secs: u64,

    #[arg(long, default_value = "5", help = "Timeout for a single HTTP request")]
    pub request_timeout_secs: u64,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    #[arg(long, help = "Give every cat this size instead of a random one")]
    pub cat_size: Option<Size>,

    #[arg(long, help = "Seed for the synthesized age/gender/size attributes")]
    pub seed: Option<u64>,

    #[arg(long, help = "Load provider settings from a TOML file instead")]
    pub config: Option<String>,

    #[arg(long, default_value = "all", help = "all, dog or cat")]
    pub species: SpeciesFilter,

    #[arg(long, help = "small, medium or large")]
    pub size: Option<Size>,

    #[arg(long, help = "Match names (substring) or species (exact)")]
    pub search: Option<String>,

    #[arg(long = "favorite", help = "Pet id to toggle as favorite (repeatable)")]
    pub favorites: Vec<String>,

    #[arg(long, help = "Print a share message for this pet id")]
    pub share: Option<String>,

    #[arg(long, help = "Print the listing as JSON")]
    pub json: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            species: self.species,
            size: self.size,
            free_text: self.search.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn dog_api_base(&self) -> &str {
        &self.dog_api_base
    }

    fn cat_api_base(&self) -> &str {
        &self.cat_api_base
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn cat_size_policy(&self) -> SizePolicy {
        self.cat_size.map(SizePolicy::Fixed).unwrap_or_default()
    }

    fn cat_api_key(&self) -> Option<&str> {
        self.cat_api_key.as_deref()
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("dog_api_base", &self.dog_api_base)?;
        validation::validate_url("cat_api_base", &self.cat_api_base)?;
        validation::validate_range("batch_size", self.batch_size, 1, 100)?;
        validation::validate_range("fetch_timeout_secs", self.fetch_timeout_secs, 1, 300)?;
        validation::validate_range("request_timeout_secs", self.request_timeout_secs, 1, 300)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        if let Some(path) = &self.config {
            validation::validate_non_empty_string("config", path)?;
        }
        if let Some(id) = &self.share {
            validation::validate_non_empty_string("share", id)?;
        }
        Ok(())
    }
}
