// Adapters layer: one provider adapter per upstream API, plus the shared HTTP and attribute helpers.

pub mod cat_api;
pub mod dog_api;
pub mod http;
pub mod synth;

pub use cat_api::CatApiAdapter;
pub use dog_api::DogApiAdapter;
