use std::env;
use std::thread;

use anyhow::{Context, Result};

/// Default bound of the score channel feeding the writer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default worker count: available parallelism plus headroom for the time
/// workers spend blocked on feature-file reads.
pub fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(4) + 2
}

/// Central configuration loaded from environment variables.
///
/// Both knobs have defaults; CLI flags override whatever is loaded here.
pub struct Config {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let workers = match env::var("CRIB_WORKERS") {
            Ok(v) => v
                .parse()
                .ok()
                .filter(|&n| n >= 1)
                .with_context(|| format!("CRIB_WORKERS must be a positive integer, got `{v}`"))?,
            Err(_) => default_workers(),
        };
        let queue_capacity = match env::var("CRIB_QUEUE_CAPACITY") {
            Ok(v) => v.parse().ok().filter(|&n| n >= 1).with_context(|| {
                format!("CRIB_QUEUE_CAPACITY must be a positive integer, got `{v}`")
            })?,
            Err(_) => DEFAULT_QUEUE_CAPACITY,
        };

        Ok(Self {
            workers,
            queue_capacity,
        })
    }
}
