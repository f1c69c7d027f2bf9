//! Compares the sketch against an exact `HashSet` on random integers.
//!
//! Environment variables:
//! - `N`: number of values inserted (default `100000`)
//! - `MAX_VALUE`: values are drawn from `[1, MAX_VALUE]` (default `50000`)
//! - `ERROR_RATE`: target standard error of the sketch (default `0.02`)
//! - `SEED`: random seed (default `0`)
use std::collections::HashSet;
use std::error::Error;
use std::mem::size_of;
use std::str::FromStr;

use loglog_sketch::Sketch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabled::settings::{Settings, Style};
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Tabled)]
struct Record {
    method: &'static str,
    count: String,
    #[tabled(rename = "size (bytes)")]
    size: usize,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let n: usize = env_or("N", 100_000);
    let max_value: u64 = env_or("MAX_VALUE", 50_000);
    let error_rate: f64 = env_or("ERROR_RATE", 0.02);
    let seed: u64 = env_or("SEED", 0);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sketch = Sketch::new(error_rate)?;
    let mut exact = HashSet::new();
    for _ in 0..n {
        let value = rng.gen_range(1..=max_value);
        sketch.insert(&value);
        exact.insert(value);
    }

    let estimate = sketch.estimate();
    let relative_error = if exact.is_empty() {
        0.0
    } else {
        (estimate - exact.len() as f64).abs() / exact.len() as f64
    };
    info!(n, error_rate, regime = ?sketch.regime(), relative_error, "done");

    let records = vec![
        Record {
            method: "HyperLogLog",
            count: format!("{:.2}", estimate),
            size: sketch.size_of(),
        },
        Record {
            method: "Exact Set",
            count: exact.len().to_string(),
            // one control byte per bucket on top of the stored values
            size: size_of::<HashSet<u64>>() + exact.capacity() * (size_of::<u64>() + 1),
        },
    ];

    println!("Inserted values  : {}", n);
    println!("Target error rate: {:.2}%", error_rate * 100.0);
    println!();
    let table_config = Settings::default().with(Style::markdown());
    println!("{}", Table::new(records).with(table_config));

    Ok(())
}
