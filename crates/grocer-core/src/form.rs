//! # Item Form
//!
//! Submit-time checks for the "new item" form.
//!
//! Field validators keep each input well-formed while it is typed; this
//! module answers the remaining question on submit: is everything there,
//! and does it convert into a [`NewGroceryItem`]?
//!
//! ```rust
//! use chrono::NaiveDate;
//! use grocer_core::form::ItemForm;
//!
//! let form = ItemForm {
//!     name: "Rice".into(),
//!     pkg_unit: "Sack".into(),
//!     pkg_qty: "1".into(),
//!     inv_unit: "Kilograms".into(),
//!     inv_qty: "5".into(),
//!     price: "9.99".into(),
//!     store: "Market".into(),
//!     date: "2024-01-10".into(),
//!     ..Default::default()
//! };
//!
//! let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
//! let item = form.validate(today).unwrap();
//! assert_eq!(item.inv_qty, 5.0);
//! assert!(item.sku.is_none());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{InventoryUnit, NewGroceryItem, PackageUnit, Sku, Upc};
use crate::validation::{
    parse_decimal, validate_date, validate_item_name, validate_price, validate_quantity,
    validate_store,
};

/// Raw text of every form field, as collected on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemForm {
    pub name: String,
    pub pkg_unit: String,
    pub pkg_qty: String,
    pub inv_unit: String,
    pub inv_qty: String,
    pub price: String,
    pub store: String,
    pub date: String,
    /// Optional; empty means none.
    pub sku: String,
    /// Optional; empty means none.
    pub upc: String,
}

impl ItemForm {
    /// Validates every field in form order and builds the item.
    ///
    /// Returns the first failure. `today` bounds the purchase date.
    pub fn validate(&self, today: NaiveDate) -> ValidationResult<NewGroceryItem> {
        let name = validate_item_name(&self.name)?;

        let pkg_unit: PackageUnit = required(&self.pkg_unit, "package unit")?.parse()?;
        let pkg_qty = parse_decimal("package quantity", &self.pkg_qty)?;
        validate_quantity("package quantity", pkg_qty)?;

        let inv_unit: InventoryUnit = required(&self.inv_unit, "counting unit")?.parse()?;
        let inv_qty = parse_decimal("count per package", &self.inv_qty)?;
        validate_quantity("count per package", inv_qty)?;

        let price = parse_decimal("price", &self.price)?;
        validate_price(price)?;

        let store = validate_store(&self.store)?;
        let date = validate_date(&self.date, today)?;

        let sku = optional(&self.sku).map(Sku::parse).transpose()?;
        let upc = optional(&self.upc).map(Upc::parse).transpose()?;

        Ok(NewGroceryItem {
            name,
            pkg_unit,
            pkg_qty,
            inv_unit,
            inv_qty,
            price,
            store,
            date,
            sku,
            upc,
        })
    }

    /// Names of required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("package unit", &self.pkg_unit),
            ("package quantity", &self.pkg_qty),
            ("counting unit", &self.inv_unit),
            ("count per package", &self.inv_qty),
            ("price", &self.price),
            ("store", &self.store),
            ("date", &self.date),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

fn required<'a>(value: &'a str, field: &str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value)
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
