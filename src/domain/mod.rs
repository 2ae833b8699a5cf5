// Domain layer: canonical pet models and ports (interfaces) implemented by adapters and configs.

pub mod model;
pub mod ports;
