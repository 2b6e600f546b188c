use std::time::Duration;

use clap::Parser;
use color_eyre::{Result, eyre::WrapErr as _};
use leonardo_i2i::{Config, Leonardo, leonardo::ImageRequest};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let args = cli::Cli::parse();

    let mut config = match args.api_key {
        Some(key) => Config::new(key),
        None => Config::from_env().wrap_err("No API key given, pass --api-key")?,
    };
    config = config
        .with_initial_wait(Duration::from_secs(args.wait_secs))
        .with_poll_interval(Duration::from_secs(args.poll_secs))
        .with_max_polls(args.max_polls);
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let request = ImageRequest {
        model_id: args
            .model_id
            .unwrap_or_else(|| args.model.unwrap_or_default().id().into()),
        prompt: args.prompt,
        width: args.width,
        height: args.height,
        init_strength: args.strength,
    };

    let leonardo = Leonardo::new(config);
    let result = leonardo.image_to_image(&args.image, &request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
