//! # grocer-core: Pure Logic for Grocer
//!
//! Domain types and input validation for the grocery tracker, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Grocer Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation (grocer CLI, or a GUI)               │   │
//! │  │     keystrokes ──► fields        submit ──► form ──► repo       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ grocer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   field   │  │   form    │  │ validation│  │   │
//! │  │   │GroceryItem│  │ DateInput │  │ ItemForm  │  │ date, upc │  │   │
//! │  │   │ Sku, Upc  │  │ UpcInput  │  │           │  │ sku, qty  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    grocer-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `GroceryItem`, unit vocabularies, `Sku` and `Upc`
//! - [`field`] - Keystroke-level field validators
//! - [`form`] - Submit-time form validation
//! - [`validation`] - Whole-value validators shared by the above
//! - [`error`] - `ValidationError`
//!
//! The one impure read is the local clock, used by [`field::DateInput::new`]
//! to decide what "today" is. Everything else takes "today" as an argument.

pub mod error;
pub mod field;
pub mod form;
pub mod types;
pub mod validation;

pub use error::{ValidationError, ValidationResult};
pub use field::{DateInput, FieldInput, FieldStatus, FieldUpdate, SkuInput, TextField, UpcInput};
pub use form::ItemForm;
pub use types::*;

/// Earliest purchase year the tracker accepts.
pub const MIN_PURCHASE_YEAR: i32 = 2022;

/// Maximum digits in a SKU or UPC field.
pub const MAX_CODE_DIGITS: usize = 12;
