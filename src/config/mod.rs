//! Capture settings read from a TOML file
//!
//! Every section is optional. Missing values fall back to defaults and
//! command-line flags are applied on top before validation.
//!
//! # Example
//!
//! ```no_run
//! use site_capture::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("capture.toml")).unwrap();
//! println!("Whitelist: {:?}", config.crawler.whitelist);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, Engine, OutputConfig, RendererConfig};
pub use parser::{content_hash, load_config, parse_config, read_config};
pub use validation::validate;
