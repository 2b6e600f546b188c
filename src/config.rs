use std::{env, time::Duration};

use color_eyre::{Result, eyre::eyre};

pub const DEFAULT_BASE_URL: &str = "https://cloud.leonardo.ai";

/// Runtime configuration for the [`Leonardo`](crate::Leonardo) client.
///
/// `initial_wait` is how long to sleep before the first result poll
/// (generations usually take a while to even show up as pending), and
/// `poll_interval`/`max_polls` bound the polling loop after that.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub initial_wait: Duration,
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            initial_wait: Duration::from_secs(20),
            poll_interval: Duration::from_secs(2),
            max_polls: 10,
        }
    }

    /// Reads `LEONARDO_API_KEY` (required) and `LEONARDO_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("LEONARDO_API_KEY")
            .map_err(|_| eyre!("LEONARDO_API_KEY is not set"))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("LEONARDO_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_initial_wait(mut self, wait: Duration) -> Self {
        self.initial_wait = wait;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }
}
