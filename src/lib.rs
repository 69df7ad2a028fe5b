#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod store;
pub mod throttle;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{scrape, Pipeline};
pub use process::{Dataset, NormalizedEntry};
pub use store::{load_dataset, save_dataset, ChartRecord};
