use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LEVEL: &str = "info";

pub struct Logging;

impl Logging {
    pub fn new() -> Self {
        Self
    }

    pub fn early_init(self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
        tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}
