//! VirtuPack: packaging configuration, fit check and export.
//!
//! The core is a typed configuration record held by [`store::ConfigurationStore`],
//! with pure derived computations on top of it:
//! - [`geometry`]: bounding boxes and the product/box fit report
//! - [`score`]: the aggregate confidence score
//! - [`export`]: the canonical JSON export document and its parser
//!
//! [`preview`] and [`api`] adapt the core for a browser front end.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod preview;
pub mod score;
pub mod store;
pub mod types;

pub use error::{Error, Result};
