pub mod aggregator;
pub mod favorites;
pub mod filter;
pub mod session;

pub use crate::domain::model::{CatalogSnapshot, FilterState, Pet, RawProviderPet};
pub use crate::domain::ports::{ConfigProvider, ProviderAdapter, SizePolicy};
pub use crate::utils::error::Result;
