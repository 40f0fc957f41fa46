use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing_subscriber::EnvFilter;
use weather_icebreaker::config::LoggingConfig;
use weather_icebreaker::{
    Clipboard, Field, GeolocationProvider, IcebreakerConfig, IpGeolocation, LocationResolver,
    MemoryDisplay, PositionOptions, VisualState, WeatherFetcher, Widget,
};

#[derive(Parser, Debug)]
#[command(name = "weather-icebreaker")]
#[command(about = "Today's weather against yesterday's, plus something to say about it")]
#[command(version)]
struct Cli {
    /// Page URL; `lat` and `lon` query parameters pin the location
    page_url: Option<String>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ask for the device location even when the link carries one
    #[arg(long, default_value_t = false)]
    locate: bool,

    /// Print a share link for the resolved location
    #[arg(long, default_value_t = false)]
    share: bool,

    /// Seed for icebreaker selection
    #[arg(long)]
    seed: Option<u64>,
}

/// Terminal stand-in for the clipboard
struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> weather_icebreaker::Result<()> {
        println!("Share link: {text}");
        Ok(())
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_receipt(display: &MemoryDisplay) {
    let text = |field: Field| display.text(field).unwrap_or("--");

    println!("{}", text(Field::LocationStatus));
    println!();
    println!("Now:        {}", text(Field::TempNow));
    println!("Yesterday:  {}", text(Field::TempYesterday));
    println!("Difference: {}", text(Field::TempDelta));
    println!("Wind:       {}", text(Field::WindNow));
    println!("Rain:       {}", text(Field::RainNow));
    println!("{}", text(Field::Summary));

    if display.text(Field::Say).is_some() {
        println!();
        println!("Say:   {}", text(Field::Say));
        println!("Ask:   {}", text(Field::Ask));
        println!("Twist: {}", text(Field::Twist));
    }

    if display.is_on(VisualState::Toast) {
        println!();
        println!("Link copied.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = IcebreakerConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    init_logging(&config.logging);

    let weather = Arc::new(
        WeatherFetcher::new(&config.weather).with_context(|| "Failed to set up weather client")?,
    );
    let resolver = LocationResolver::new(PositionOptions {
        timeout: config.location.timeout(),
        ..PositionOptions::default()
    });
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let page_url = cli.page_url.clone().unwrap_or_else(|| config.page.url.clone());

    let mut widget = Widget::new(
        MemoryDisplay::new(),
        StdRng::seed_from_u64(seed),
        weather,
        resolver,
        page_url,
    );

    // With --locate the link location is never fetched
    let from_link = !cli.locate && widget.start().await;
    if !from_link {
        let provider = if config.location.enabled {
            Some(
                IpGeolocation::new(config.location.provider_url.clone())
                    .with_context(|| "Failed to set up geolocation client")?,
            )
        } else {
            None
        };
        widget
            .use_my_location(provider.as_ref().map(|p| p as &dyn GeolocationProvider))
            .await;
    }

    if let Some(error) = &widget.state().weather_error {
        tracing::warn!("Weather unavailable: {}", error);
    }

    if cli.share {
        widget.copy_share_link(&StdoutClipboard).await;
    }

    print_receipt(&widget.into_display());
    Ok(())
}
