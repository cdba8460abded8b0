//! Polymarket Data API client, response types, and pagination.

mod data_client;
mod pagination;
mod types;

pub use data_client::{DataClient, TraderSnapshot};
pub use pagination::collect_pages;
pub use types::*;
