pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CatApiAdapter, DogApiAdapter};
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    aggregator::CatalogAggregator,
    favorites::FavoriteSet,
    session::{CatalogStatus, PetSession},
};
pub use domain::model::{
    CatalogSnapshot, FilterState, Gender, Pet, RawProviderPet, Size, Species, SpeciesFilter,
};
pub use domain::ports::{ConfigProvider, ProviderAdapter, SizePolicy};
pub use utils::error::{AggregationError, PetError, ProviderError, Result};

use std::sync::Arc;

/// 依設定建立 dog + cat 兩個來源的 session
pub fn build_session<C: ConfigProvider>(config: &C) -> Result<PetSession> {
    let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
        Arc::new(DogApiAdapter::from_config(config)),
        Arc::new(CatApiAdapter::from_config(config)),
    ];
    let aggregator = CatalogAggregator::from_config(adapters, config)?;
    Ok(PetSession::new(aggregator))
}
