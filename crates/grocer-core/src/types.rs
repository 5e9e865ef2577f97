//! # Domain Types
//!
//! Core domain types used throughout Grocer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  GroceryItem    │   │  PackageUnit    │   │  InventoryUnit  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │   │  Pack, Case     │   │  Ct., Pcs.      │       │
//! │  │  name, store    │   │  Box, Bag       │   │  Liters, Grams  │       │
//! │  │  pkg / inv qty  │   │  Bottle, Sack   │   │  Pounds, ...    │       │
//! │  │  price, date    │   └─────────────────┘   └─────────────────┘       │
//! │  │  sku, upc       │                                                   │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │      Sku        │   │      Upc        │       │
//! │                        │  1..=12 digits  │   │  12 digits +    │       │
//! │                        │                 │   │  check digit    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are append-only: a [`NewGroceryItem`] is built from the form, the
//! store assigns the id, and the persisted [`GroceryItem`] is never updated.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::validation::{validate_sku, validate_upc};

// =============================================================================
// Package Unit
// =============================================================================

/// How an item is packaged at the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageUnit {
    Pack,
    Case,
    Box,
    Bag,
    Bottle,
    Sack,
}

impl PackageUnit {
    /// Every package unit, in the order the entry form offers them.
    pub const ALL: [PackageUnit; 6] = [
        PackageUnit::Pack,
        PackageUnit::Case,
        PackageUnit::Box,
        PackageUnit::Bag,
        PackageUnit::Bottle,
        PackageUnit::Sack,
    ];

    /// Label shown to the user and stored in the `pkg_unit` column.
    pub const fn label(&self) -> &'static str {
        match self {
            PackageUnit::Pack => "Pack",
            PackageUnit::Case => "Case",
            PackageUnit::Box => "Box",
            PackageUnit::Bag => "Bag",
            PackageUnit::Bottle => "Bottle",
            PackageUnit::Sack => "Sack",
        }
    }
}

impl fmt::Display for PackageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PackageUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PackageUnit::ALL
            .into_iter()
            .find(|unit| unit.label() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "package unit".to_string(),
                allowed: PackageUnit::ALL.iter().map(|u| u.label().to_string()).collect(),
            })
    }
}

// =============================================================================
// Inventory Unit
// =============================================================================

/// What one package contains: a count or a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryUnit {
    #[serde(rename = "Ct.")]
    Count,
    #[serde(rename = "Pcs.")]
    Pieces,
    Milliliters,
    Liters,
    #[serde(rename = "Fluid Ounces")]
    FluidOunces,
    Pints,
    Quarts,
    Gallons,
    Grams,
    Kilograms,
    Ounces,
    Pounds,
}

impl InventoryUnit {
    /// Every counting/measure unit, in the order the entry form offers them.
    pub const ALL: [InventoryUnit; 12] = [
        InventoryUnit::Count,
        InventoryUnit::Pieces,
        InventoryUnit::Milliliters,
        InventoryUnit::Liters,
        InventoryUnit::FluidOunces,
        InventoryUnit::Pints,
        InventoryUnit::Quarts,
        InventoryUnit::Gallons,
        InventoryUnit::Grams,
        InventoryUnit::Kilograms,
        InventoryUnit::Ounces,
        InventoryUnit::Pounds,
    ];

    /// Label shown to the user and stored in the `inv_unit` column.
    pub const fn label(&self) -> &'static str {
        match self {
            InventoryUnit::Count => "Ct.",
            InventoryUnit::Pieces => "Pcs.",
            InventoryUnit::Milliliters => "Milliliters",
            InventoryUnit::Liters => "Liters",
            InventoryUnit::FluidOunces => "Fluid Ounces",
            InventoryUnit::Pints => "Pints",
            InventoryUnit::Quarts => "Quarts",
            InventoryUnit::Gallons => "Gallons",
            InventoryUnit::Grams => "Grams",
            InventoryUnit::Kilograms => "Kilograms",
            InventoryUnit::Ounces => "Ounces",
            InventoryUnit::Pounds => "Pounds",
        }
    }
}

impl fmt::Display for InventoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InventoryUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        InventoryUnit::ALL
            .into_iter()
            .find(|unit| unit.label() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "counting unit".to_string(),
                allowed: InventoryUnit::ALL
                    .iter()
                    .map(|u| u.label().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Codes
// =============================================================================

/// Store-specific stock keeping number: 1 to 12 digits.
///
/// The `sku` column is an `INTEGER`, so leading zeros are dropped on parse:
/// `"007"` becomes `"7"`, and a parsed SKU always equals what the store
/// reads back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Parses and validates a SKU, dropping leading zeros.
    pub fn parse(digits: &str) -> ValidationResult<Self> {
        validate_sku(digits)?;

        let significant = digits.trim_start_matches('0');
        let canonical = if significant.is_empty() { "0" } else { significant };
        Ok(Sku(canonical.to_string()))
    }

    /// Rebuilds a SKU from its `INTEGER` column value.
    pub fn from_stored(value: i64) -> ValidationResult<Self> {
        Sku::parse(&value.to_string())
    }

    /// The digits, without leading zeros.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value for the `sku` column.
    pub fn to_stored(&self) -> i64 {
        digits_to_i64(&self.0)
    }
}

impl TryFrom<String> for Sku {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Sku::parse(&value)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UPC-A barcode: exactly 12 digits with a valid check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Upc(String);

impl Upc {
    /// Parses a UPC, verifying length and check digit.
    pub fn parse(digits: &str) -> ValidationResult<Self> {
        validate_upc(digits)?;
        Ok(Upc(digits.to_string()))
    }

    /// Rebuilds a UPC from its `INTEGER` column value, restoring leading
    /// zeros.
    pub fn from_stored(value: i64) -> ValidationResult<Self> {
        if value < 0 {
            return Err(ValidationError::invalid_format(
                "upc",
                "stored value is negative",
            ));
        }
        Upc::parse(&format!("{:012}", value))
    }

    /// The 12 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value for the `upc` column.
    pub fn to_stored(&self) -> i64 {
        digits_to_i64(&self.0)
    }
}

impl TryFrom<String> for Upc {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Upc::parse(&value)
    }
}

impl From<Upc> for String {
    fn from(upc: Upc) -> Self {
        upc.0
    }
}

impl fmt::Display for Upc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Callers guarantee at most 12 ASCII digits, so this cannot overflow.
fn digits_to_i64(digits: &str) -> i64 {
    digits
        .bytes()
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'))
}

// =============================================================================
// Grocery Item
// =============================================================================

/// A grocery item ready to be stored (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroceryItem {
    pub name: String,
    pub pkg_unit: PackageUnit,
    /// Packages bought.
    pub pkg_qty: f64,
    pub inv_unit: InventoryUnit,
    /// Count or measure inside one package.
    pub inv_qty: f64,
    pub price: f64,
    pub store: String,
    /// Purchase date.
    pub date: NaiveDate,
    pub sku: Option<Sku>,
    pub upc: Option<Upc>,
}

impl NewGroceryItem {
    /// Attaches the store-assigned id.
    pub fn with_id(self, id: i64) -> GroceryItem {
        GroceryItem {
            id,
            name: self.name,
            pkg_unit: self.pkg_unit,
            pkg_qty: self.pkg_qty,
            inv_unit: self.inv_unit,
            inv_qty: self.inv_qty,
            price: self.price,
            store: self.store,
            date: self.date,
            sku: self.sku,
            upc: self.upc,
        }
    }
}

/// A persisted grocery item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Store-assigned row id.
    pub id: i64,
    pub name: String,
    pub pkg_unit: PackageUnit,
    pub pkg_qty: f64,
    pub inv_unit: InventoryUnit,
    pub inv_qty: f64,
    pub price: f64,
    pub store: String,
    pub date: NaiveDate,
    pub sku: Option<Sku>,
    pub upc: Option<Upc>,
}

impl GroceryItem {
    /// One-line description used by the inventory listing.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use grocer_core::{GroceryItem, InventoryUnit, PackageUnit, Upc};
    ///
    /// let item = GroceryItem {
    ///     id: 7,
    ///     name: "Cola".to_string(),
    ///     pkg_unit: PackageUnit::Case,
    ///     pkg_qty: 1.0,
    ///     inv_unit: InventoryUnit::Count,
    ///     inv_qty: 24.0,
    ///     price: 12.5,
    ///     store: "Corner Market".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
    ///     sku: None,
    ///     upc: Some(Upc::parse("036000291452").unwrap()),
    /// };
    /// assert_eq!(
    ///     item.summary_line(),
    ///     "ID: 7 | Item: Cola | 1 Case | 24 Ct. | Price: 12.5 | Store: Corner Market \
    ///      | Bought: 2024-03-09 | SKU: - | UPC: 036000291452"
    /// );
    /// ```
    pub fn summary_line(&self) -> String {
        format!(
            "ID: {} | Item: {} | {} {} | {} {} | Price: {} | Store: {} | Bought: {} | SKU: {} | UPC: {}",
            self.id,
            self.name,
            self.pkg_qty,
            self.pkg_unit,
            self.inv_qty,
            self.inv_unit,
            self.price,
            self.store,
            self.date.format("%Y-%m-%d"),
            self.sku.as_ref().map_or("-", Sku::as_str),
            self.upc.as_ref().map_or("-", Upc::as_str),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
