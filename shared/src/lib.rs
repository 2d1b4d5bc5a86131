//! Shared library for the Notion heatmap Lambda.
//!
//! Fetches dated records from a Notion database, counts them per day and
//! renders the counts as an SVG calendar heatmap.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod notion;
pub mod render;
pub mod secrets;
pub mod source;

pub use aggregate::{aggregate, DayCounts};
pub use calendar::{day_key, CalendarRange};
pub use config::{Config, RangeMode};
pub use error::{Error, Result};
pub use models::{Record, RecordPage};
pub use notion::NotionClient;
pub use render::{fallback_document, render, ColorBand, Decorations, HeatmapStyle, Layout};
pub use secrets::{get_secret, resolve_notion_token};
pub use source::{fetch_all_records, RecordSource};
