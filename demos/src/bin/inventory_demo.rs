//! Demo 1: Inventory Walkthrough
//!
//! Showcases: upserts with metadata, price-range aggregates, top-K queries
//!
//! Run: cargo run --bin inventory_demo

use colored::*;
use rust_decimal_macros::dec;
use stockdex_index::{IndexConfig, Metadata, SharedInventory};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  INVENTORY WALKTHROUGH".cyan().bold());
    println!("{}", "  Stockdex Demo - Range Aggregates and Top-K".cyan());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let inventory = SharedInventory::with_config(IndexConfig::new("produce"))?;

    let mut metadata = Metadata::new();
    metadata.insert("category".to_string(), serde_json::json!("fruit"));
    inventory.upsert_with_metadata("apple", dec!(1.25), 100, metadata)?;
    inventory.upsert("banana", dec!(0.75), 150)?;
    inventory.upsert("carrot", dec!(0.50), 200)?;

    println!("  {}", "INVENTORY".white().bold());
    println!("  {:<10} {:>8} {:>10} {:>10}", "KEY", "PRICE", "QTY", "VALUE");
    println!("  {}", "─".repeat(41));
    for item in inventory.items() {
        let tags = if item.metadata.is_empty() {
            String::new()
        } else {
            format!(" {:?}", item.metadata).dimmed().to_string()
        };
        println!(
            "  {:<10} {:>8} {:>10} {:>10}{}",
            item.key.yellow(),
            format!("${:.2}", item.price),
            item.quantity,
            format!("${:.2}", item.value()),
            tags
        );
    }
    println!();

    let (lo, hi) = (dec!(0.6), dec!(1.5));
    let totals = inventory.range_totals(lo, hi);
    println!("  {} [${}, ${}]", "PRICE RANGE".white().bold(), lo, hi);
    println!("    Quantity: {}", totals.quantity.to_string().green());
    println!("    Value:    {}", format!("${:.2}", totals.value).green());
    println!();

    println!("  {}", "TOP 2 BY PRICE".white().bold());
    for item in inventory.top_k_price(2) {
        println!("    {:<10} ${:.2}", item.key, item.price);
    }
    println!();

    println!("  {}", "TOP 2 BY QUANTITY".white().bold());
    for item in inventory.top_k_quantity(2) {
        println!("    {:<10} {}", item.key, item.quantity);
    }
    println!();

    match inventory.remove("nonexistent") {
        Ok(item) => println!("  {} removed {}", "✗".red(), item.key),
        Err(err) => println!("  {} Expected error: {}", "✓".green(), err),
    }

    let total = inventory.total();
    println!();
    println!(
        "  {} {} items, {} units, ${:.2} in stock",
        "SUMMARY".white().bold(),
        inventory.len(),
        total.quantity,
        total.value
    );

    Ok(())
}
