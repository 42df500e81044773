pub mod consts;
pub mod model;

pub use model::{Config, MarkersConfig, TrustConfig};
