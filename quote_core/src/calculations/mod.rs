//! # Quote Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, ...) -> Result<*Result, QuoteError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`geometry`] - Plot perimeter and wall area
//! - [`quote`] - Wall price with delivery surcharge

pub mod geometry;
pub mod quote;

// Re-export commonly used types
pub use quote::{calculate, evaluate, QuoteForm, QuoteInput, QuoteResult};
