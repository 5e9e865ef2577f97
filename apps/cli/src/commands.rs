//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use chrono::{Days, Local, NaiveDate};
use grocer_core::validation::upc_check_digit;
use grocer_core::{
    DateInput, FieldInput, FieldStatus, InventoryUnit, ItemForm, NewGroceryItem, PackageUnit,
    SkuInput, TextField, Upc, UpcInput, MIN_PURCHASE_YEAR,
};
use grocer_db::Database;
use tracing::info;

use crate::FieldKind;

/// Validates the form and stores the item.
///
/// Blank required fields are all reported together before anything else is
/// checked.
pub async fn add(db: &Database, form: ItemForm) -> Result<()> {
    let missing = form.missing_fields();
    if !missing.is_empty() {
        bail!("item not saved: please fill in {}", missing.join(", "));
    }

    let today = Local::now().date_naive();
    let item = form.validate(today).context("item not saved")?;

    let stored = db.items().add_item(&item).await?;
    info!(id = stored.id, "Item saved");
    println!("{}", stored.summary_line());
    Ok(())
}

/// Prints every stored item.
pub async fn list(db: &Database, json: bool) -> Result<()> {
    let items = db.items().list_items().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items found in database.");
        return Ok(());
    }

    for item in &items {
        println!("{}", item.summary_line());
    }
    Ok(())
}

/// Types `text` into a field one character at a time, printing each step.
pub fn check(kind: FieldKind, text: &str) {
    match kind {
        FieldKind::Date => type_into(TextField::new(DateInput::new()), text),
        FieldKind::Sku => type_into(TextField::new(SkuInput), text),
        FieldKind::Upc => type_into(TextField::new(UpcInput), text),
    }
}

fn type_into<I: FieldInput>(mut field: TextField<I>, text: &str) {
    for ch in text.chars() {
        let status = field.insert(&ch.to_string()).clone();
        println!("{ch:?} -> {:<12} {}", field.text(), describe(&status));
    }
    println!("final: {:?} {}", field.text(), describe(field.status()));
}

fn describe(status: &FieldStatus) -> String {
    match status {
        FieldStatus::Pending => "…".to_string(),
        FieldStatus::Complete => "✓ valid".to_string(),
        FieldStatus::Rejected(err) => format!("✗ {err} (cleared)"),
    }
}

/// Prints both unit vocabularies.
pub fn units() {
    println!("Package units:");
    for unit in PackageUnit::ALL {
        println!("  {unit}");
    }
    println!("Counting units:");
    for unit in InventoryUnit::ALL {
        println!("  {unit}");
    }
}

// =============================================================================
// Seed Data
// =============================================================================

/// Sample purchases: name, package unit, counting unit, count per package,
/// price.
const SAMPLES: &[(&str, PackageUnit, InventoryUnit, f64, f64)] = &[
    ("Sparkling Water", PackageUnit::Case, InventoryUnit::Count, 12.0, 8.49),
    ("Whole Milk", PackageUnit::Bottle, InventoryUnit::Gallons, 1.0, 4.29),
    ("Basmati Rice", PackageUnit::Sack, InventoryUnit::Kilograms, 5.0, 11.99),
    ("Eggs", PackageUnit::Box, InventoryUnit::Count, 12.0, 3.79),
    ("Apples", PackageUnit::Bag, InventoryUnit::Pounds, 3.0, 4.99),
    ("Olive Oil", PackageUnit::Bottle, InventoryUnit::Milliliters, 750.0, 9.49),
    ("Paper Towels", PackageUnit::Pack, InventoryUnit::Pieces, 6.0, 7.99),
    ("Coffee Beans", PackageUnit::Bag, InventoryUnit::Ounces, 12.0, 10.99),
    ("Orange Juice", PackageUnit::Bottle, InventoryUnit::FluidOunces, 52.0, 4.49),
    ("Flour", PackageUnit::Sack, InventoryUnit::Pounds, 5.0, 3.29),
];

const STORES: &[&str] = &["Corner Market", "Co-op", "Fresh Mart", "Warehouse Club"];

/// Inserts `count` generated items, skipping if the database has data.
pub async fn seed(db: &Database, count: usize) -> Result<()> {
    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} items");
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let start = std::time::Instant::now();

    for index in 0..count {
        let item = sample_item(index, today)?;
        db.items().add_item(&item).await?;
    }

    println!("✓ Generated {count} items in {:?}", start.elapsed());
    Ok(())
}

fn sample_item(index: usize, today: NaiveDate) -> Result<NewGroceryItem> {
    let (name, pkg_unit, inv_unit, inv_qty, price) = SAMPLES[index % SAMPLES.len()];

    let earliest = NaiveDate::from_ymd_opt(MIN_PURCHASE_YEAR, 1, 1).context("bad minimum year")?;
    let date = today
        .checked_sub_days(Days::new((index as u64 * 3) % 90))
        .unwrap_or(today)
        .max(earliest)
        .min(today);

    Ok(NewGroceryItem {
        name: name.to_string(),
        pkg_unit,
        pkg_qty: (1 + index % 3) as f64,
        inv_unit,
        inv_qty,
        price,
        store: STORES[index % STORES.len()].to_string(),
        date,
        sku: None,
        upc: Some(sample_upc(index)?),
    })
}

/// Builds a valid UPC from the index by computing its check digit.
fn sample_upc(index: usize) -> Result<Upc> {
    let body = format!("{:011}", 40_000_000_000u64 + index as u64 * 7_919);

    let mut digits = [0u8; 11];
    for (slot, b) in digits.iter_mut().zip(body.bytes()) {
        *slot = b - b'0';
    }

    let code = format!("{body}{}", upc_check_digit(&digits));
    Ok(Upc::parse(&code)?)
}
