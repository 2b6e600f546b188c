use std::path::PathBuf;

use leonardo_i2i::Model;

/// Generates an image-to-image variation of a local image via the Leonardo API
#[derive(Debug, clap::Parser)]
pub struct Cli {
    /// Local image file to use as the init image
    pub image: PathBuf,

    /// Generation prompt
    pub prompt: String,

    /// API key, falls back to the LEONARDO_API_KEY environment variable
    #[arg(short, long)]
    pub api_key: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model to generate with, defaults to Leonardo Diffusion XL
    #[arg(long, value_enum)]
    pub model: Option<Model>,

    /// Raw provider model id, takes precedence over --model
    #[arg(long)]
    pub model_id: Option<String>,

    #[arg(long, default_value_t = 512)]
    pub width: u32,

    #[arg(long, default_value_t = 512)]
    pub height: u32,

    /// How strongly the init image constrains the result, the provider
    /// expects a value between 0.1 and 0.9
    #[arg(long, default_value_t = 0.5)]
    pub strength: f64,

    /// Seconds to wait before polling for the result
    #[arg(long, default_value_t = 20)]
    pub wait_secs: u64,

    /// Seconds between result polls, the interval doubles on each retry
    #[arg(long, default_value_t = 2)]
    pub poll_secs: u64,

    /// Maximum number of result polls before giving up
    #[arg(long, default_value_t = 10)]
    pub max_polls: u32,
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    #[test]
    fn poll_tuning_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "leo-i2i",
            "test.jpg",
            "a cat",
            "--wait-secs",
            "5",
            "--poll-secs",
            "1",
            "--max-polls",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.wait_secs, 5);
        assert_eq!(cli.poll_secs, 1);
        assert_eq!(cli.max_polls, 4);
    }

    #[test]
    fn poll_tuning_defaults_match_the_config_defaults() {
        let cli = Cli::try_parse_from(["leo-i2i", "test.jpg", "a cat"]).unwrap();
        assert_eq!(cli.wait_secs, 20);
        assert_eq!(cli.poll_secs, 2);
        assert_eq!(cli.max_polls, 10);
    }
}
