//! Student registration service.
//!
//! Collects registration forms (with a drawn signature) over HTTP, keeps them
//! in memory with a debounced JSON file mirror, and exports them to an xlsx
//! workbook for administrators.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod record;
pub mod signature;
pub mod store;

pub use config::Config;
pub use error::ServerError;
pub use record::Registration;
pub use store::{Backend, RegistrationStore, Registrations};
