//! # quote_core - Wall Quotation Engine
//!
//! `quote_core` prices walls for The Wall Company India: wall face area from
//! plot dimensions, a per-type base rate, and a delivery surcharge that grows
//! with the distance from the factory. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure pricing**: `calculate` is a function of its input and the rate card
//! - **Explicit state**: form values, location and lookup generation live in a
//!   [`session::QuoteSession`], never in globals
//! - **Degrade, don't fail**: road routing falls back to aerial distance, a
//!   failed relay does not fail an export
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::calculations::{calculate, QuoteInput};
//! use quote_core::display::format_inr;
//! use quote_core::pricing::{PriceTable, ShippingPolicy, WallType};
//!
//! let input = QuoteInput {
//!     wall_type: WallType::Boundary,
//!     length_ft: 10.0,
//!     breadth_ft: 8.0,
//!     height_ft: 6.0,
//!     distance_km: 25.0,
//! };
//! let result = calculate(&input, &PriceTable::standard(), &ShippingPolicy::default()).unwrap();
//! assert_eq!(format_inr(result.total), "Rs.28,080");
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Wall types, rate card, delivery surcharge policy
//! - [`calculations`] - Area and quote arithmetic
//! - [`display`] - Rupee formatting and the quote panel text
//! - [`distance`] - Road / aerial distance from the factory
//! - [`geocoding`] - Place search
//! - [`session`] / [`controller`] / [`debounce`] - Event-driven quote form
//! - [`export`] / [`pdf`] - Quotation PDF and request relay
//! - [`settings`] / [`file_io`] - Configuration and atomic JSON files
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod controller;
pub mod debounce;
pub mod display;
pub mod distance;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod geocoding;
pub mod pdf;
pub mod pricing;
pub mod session;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, QuoteInput, QuoteResult};
pub use display::{format_inr, QuoteDisplay};
pub use errors::{CalcResult, QuoteError};
pub use file_io::{load_settings, save_settings};
pub use pricing::{PriceTable, ShippingPolicy, WallType};
pub use session::QuoteSession;
pub use settings::QuoteSettings;
