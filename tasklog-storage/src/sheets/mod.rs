//! Google Sheets backend.
//!
//! Talks to the Sheets v4 REST API with a service-account token. Each
//! record table is a worksheet of the configured spreadsheet.

mod auth;
mod client;
mod config;

pub use auth::{ServiceAccountAuth, ServiceAccountKey};
pub use client::SheetsStore;
pub use config::{SheetsConfig, SpreadsheetRef};
