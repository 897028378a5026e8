//! Demo 2: Scan vs Index Performance Comparison
//!
//! Showcases: O(log n) range aggregates and top-K against a full-scan store
//!
//! Run: cargo run --release --bin perf_comparison
//!
//! Parameters can be overridden with `STOCKDEX_PERF_ITEMS`,
//! `STOCKDEX_PERF_QUERIES`, `STOCKDEX_PERF_TOP_K`, `STOCKDEX_PERF_REPEATS`,
//! `STOCKDEX_PERF_PRICE_MIN`, `STOCKDEX_PERF_PRICE_MAX` and
//! `STOCKDEX_PERF_SEED`.

use colored::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::{Duration, Instant};
use stockdex_index::{InventoryError, ScanInventory, SharedInventory, Totals};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    Unparseable { var: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("price range [{min}, {max}] must span at least two units")]
    PriceRange { min: i64, max: i64 },
}

/// Benchmark parameters
#[derive(Debug, Clone)]
struct PerfConfig {
    n_items: usize,
    n_queries: usize,
    top_k: usize,
    repeats: usize,
    price_min: i64,
    price_max: i64,
    seed: u64,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            n_items: 100_000,
            n_queries: 1_000,
            top_k: 50,
            repeats: 50,
            price_min: 0,
            price_max: 100,
            seed: 0,
        }
    }
}

fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Unparseable { var, value }),
        Err(_) => Ok(default),
    }
}

impl PerfConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let config = Self {
            n_items: env_or("STOCKDEX_PERF_ITEMS", d.n_items)?,
            n_queries: env_or("STOCKDEX_PERF_QUERIES", d.n_queries)?,
            top_k: env_or("STOCKDEX_PERF_TOP_K", d.top_k)?,
            repeats: env_or("STOCKDEX_PERF_REPEATS", d.repeats)?,
            price_min: env_or("STOCKDEX_PERF_PRICE_MIN", d.price_min)?,
            price_max: env_or("STOCKDEX_PERF_PRICE_MAX", d.price_max)?,
            seed: env_or("STOCKDEX_PERF_SEED", d.seed)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.n_items == 0 {
            return Err(ConfigError::Zero { field: "n_items" });
        }
        if self.n_queries == 0 {
            return Err(ConfigError::Zero { field: "n_queries" });
        }
        if self.repeats == 0 {
            return Err(ConfigError::Zero { field: "repeats" });
        }
        if self.price_min < 0 || self.price_max - self.price_min < 2 {
            return Err(ConfigError::PriceRange {
                min: self.price_min,
                max: self.price_max,
            });
        }
        Ok(())
    }
}

/// The operations both inventories expose to the benchmark
trait Subject {
    fn fresh() -> Self;
    fn put(&mut self, key: String, price: Decimal, quantity: i64) -> Result<(), InventoryError>;
    fn range(&self, lo: Decimal, hi: Decimal) -> Totals;
    fn top(&self, k: usize) -> usize;
}

impl Subject for ScanInventory {
    fn fresh() -> Self {
        ScanInventory::new()
    }

    fn put(&mut self, key: String, price: Decimal, quantity: i64) -> Result<(), InventoryError> {
        self.upsert(key, price, quantity).map(drop)
    }

    fn range(&self, lo: Decimal, hi: Decimal) -> Totals {
        Totals::new(self.range_quantity(lo, hi), self.range_value(lo, hi))
    }

    fn top(&self, k: usize) -> usize {
        self.top_k_price(k).len() + self.top_k_quantity(k).len()
    }
}

impl Subject for SharedInventory {
    fn fresh() -> Self {
        SharedInventory::new()
    }

    fn put(&mut self, key: String, price: Decimal, quantity: i64) -> Result<(), InventoryError> {
        self.upsert(key, price, quantity).map(drop)
    }

    fn range(&self, lo: Decimal, hi: Decimal) -> Totals {
        Totals::new(self.range_quantity(lo, hi), self.range_value(lo, hi))
    }

    fn top(&self, k: usize) -> usize {
        self.top_k_price(k).len() + self.top_k_quantity(k).len()
    }
}

/// Random cent-precision price in `[min, max)`
fn random_price(rng: &mut StdRng, min: i64, max: i64) -> Decimal {
    Decimal::new(rng.gen_range(min * 100..max * 100), 2)
}

fn fill<S: Subject>(config: &PerfConfig, rng: &mut StdRng) -> Result<(S, Duration), InventoryError> {
    let mut inv = S::fresh();
    let start = Instant::now();
    for i in 0..config.n_items {
        let price = random_price(rng, config.price_min, config.price_max);
        let qty = rng.gen_range(1..=100);
        inv.put(format!("item_{i}"), price, qty)?;
    }
    Ok((inv, start.elapsed()))
}

struct Timings {
    upsert: Duration,
    range: Duration,
    top_k: Duration,
    checksum: Totals,
}

fn run<S: Subject>(config: &PerfConfig) -> Result<Timings, InventoryError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (inv, upsert) = fill::<S>(config, &mut rng)?;

    let (min, max) = (config.price_min, config.price_max);
    let ranges: Vec<(Decimal, Decimal)> = (0..config.n_queries)
        .map(|_| {
            let lo = random_price(&mut rng, min, max - 1);
            let hi = random_price(&mut rng, min + 1, max);
            (lo, hi)
        })
        .collect();

    let start = Instant::now();
    let mut checksum = Totals::ZERO;
    for &(lo, hi) in &ranges {
        checksum += inv.range(lo, hi);
    }
    let range = start.elapsed();

    let start = Instant::now();
    let mut returned = 0;
    for _ in 0..config.repeats {
        returned += inv.top(config.top_k);
    }
    let top_k = start.elapsed();
    info!(returned, "top-k queries complete");

    Ok(Timings {
        upsert,
        range,
        top_k,
        checksum,
    })
}

fn print_row(label: &str, old: Duration, new: Duration) {
    let speedup = old.as_secs_f64() / new.as_secs_f64().max(f64::EPSILON);
    let label_speedup = format!("{speedup:>8.1}x");
    let speedup = if speedup >= 1.0 {
        label_speedup.green()
    } else {
        label_speedup.red()
    };
    println!(
        "  {:<16} {:>12.4}s {:>12.4}s {}",
        label,
        old.as_secs_f64(),
        new.as_secs_f64(),
        speedup
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PerfConfig::from_env()?;

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  SCAN VS INDEX PERFORMANCE".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!(
        "  {} items, {} range queries, top-{} x {} repeats, seed {}",
        config.n_items, config.n_queries, config.top_k, config.repeats, config.seed
    );
    println!();

    info!("running scan baseline");
    let old = run::<ScanInventory>(&config)?;
    info!("running indexed inventory");
    let new = run::<SharedInventory>(&config)?;

    if old.checksum != new.checksum {
        println!("  {} range results differ: {} vs {}", "✗".red(), old.checksum, new.checksum);
    }

    println!("  {:<16} {:>13} {:>13} {:>9}", "", "SCAN", "INDEXED", "SPEEDUP");
    println!("  {}", "─".repeat(55));
    print_row("Upsert", old.upsert, new.upsert);
    print_row("Range queries", old.range, new.range);
    print_row("Top-K queries", old.top_k, new.top_k);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rejected_put_is_reported() {
        let mut scan = ScanInventory::fresh();
        assert!(scan.put("a".into(), dec!(1), -1).is_err());

        let mut shared = SharedInventory::fresh();
        assert!(shared.put("a".into(), dec!(-1), 1).is_err());
        assert!(shared.put("a".into(), dec!(1), 1).is_ok());
    }

    #[test]
    fn test_fill_matches_between_subjects() {
        let config = PerfConfig {
            n_items: 200,
            n_queries: 10,
            ..PerfConfig::default()
        };
        let old = run::<ScanInventory>(&config).unwrap();
        let new = run::<SharedInventory>(&config).unwrap();
        assert_eq!(old.checksum, new.checksum);
    }

    #[test]
    fn test_config_validation() {
        assert!(PerfConfig::default().validate().is_ok());

        let narrow = PerfConfig {
            price_max: 1,
            ..PerfConfig::default()
        };
        assert!(matches!(narrow.validate(), Err(ConfigError::PriceRange { .. })));
    }
}
