// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # roocart store
//!
//! Startup inputs for a checkout run.
//!
//! - **Settings**: one immutable value built from environment variables
//! - **Items**: the ordered list of order lines, read from a JSON file
//!
//! ## Usage
//!
//! ```ignore
//! use roocart_store::{Settings, load_items};
//!
//! let settings = Settings::from_env()?;
//! let items = load_items(&settings.items_file).await?;
//! ```

pub mod error;
pub mod items;
pub mod settings;

pub use error::StoreError;
pub use items::{load_items, parse_items};
pub use settings::{Settings, TelegramSettings};
