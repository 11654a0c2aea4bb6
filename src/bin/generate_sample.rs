//! Writes the bundled example dataset to `sample_data/example.csv`
//! (or the path given as the first argument).

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Cities the sample rows are scattered around: (latitude, longitude).
const SITES: [(f64, f64); 6] = [
    (40.71, -74.01),
    (34.05, -118.24),
    (41.88, -87.63),
    (29.76, -95.37),
    (47.61, -122.33),
    (39.74, -104.99),
];

const CATEGORIES: [&str; 4] = ["A", "B", "C", "D"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data/example.csv"));
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("opening {}", path.display()))?;
    writer.write_record(["Category", "Value", "Date", "Latitude", "Longitude"])?;

    let n_rows = 24;
    for i in 0..n_rows {
        let category = CATEGORIES[rng.below(CATEGORIES.len())];
        let value = rng.gauss(50.0, 20.0).round().max(0.0) as i64;
        let date = format!("2025-01-{:02}", i % 7 + 1);
        let (lat, lon) = SITES[rng.below(SITES.len())];
        writer.write_record([
            category.to_string(),
            value.to_string(),
            date,
            format!("{:.4}", lat + rng.gauss(0.0, 0.3)),
            format!("{:.4}", lon + rng.gauss(0.0, 0.3)),
        ])?;
    }
    writer.flush()?;

    log::info!("wrote {n_rows} rows to {}", path.display());
    println!("Wrote {n_rows} rows to {}", path.display());
    Ok(())
}
