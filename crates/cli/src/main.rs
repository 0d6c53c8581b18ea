//! `marquee-cli` -- operator tool for the Marquee extensions.
//!
//! Reads a host snapshot export (JSON) and prints view models as JSON.
//!
//! ```text
//! marquee-cli grid
//! marquee-cli sales <performance-id>...
//! marquee-cli show <show-id>
//! marquee-cli geocode <address>
//! marquee-cli pins
//! marquee-cli viewport <table> [<longitude> <latitude> <zoom>]
//! ```
//!
//! Configuration comes from the environment (a `.env` file is honoured);
//! see [`marquee_cli::settings::CliSettings`], [`marquee_sales::SalesConfig`]
//! and [`marquee_map::MapConfig`].

use anyhow::{bail, Context};
use marquee_cli::commands;
use marquee_cli::settings::CliSettings;
use marquee_core::types::RecordId;
use marquee_map::{MapConfig, Viewport};
use marquee_sales::SalesConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: marquee-cli <grid | sales <id>... | show <id> | geocode <address> | pins | viewport <table> [lon lat zoom]>";

fn parse_viewport(args: &[String]) -> anyhow::Result<Option<Viewport>> {
    match args {
        [] => Ok(None),
        [lon, lat, zoom] => Ok(Some(Viewport {
            longitude: lon.parse().context("longitude")?,
            latitude: lat.parse().context("latitude")?,
            zoom: zoom.parse().context("zoom")?,
        })),
        _ => bail!("viewport takes either no coordinates or <longitude> <latitude> <zoom>"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_cli=info,marquee_sales=info,marquee_map=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let settings = CliSettings::from_env()?;

    let output = match command.as_str() {
        "grid" => {
            let snapshot = commands::load_snapshot(&settings.snapshot_path).await?;
            commands::grid(&settings, &snapshot)?
        }
        "sales" => {
            let ids: Vec<RecordId> = rest.iter().map(RecordId::new).collect();
            commands::sales(&settings, SalesConfig::from_env()?, &ids).await?
        }
        "show" => {
            let [show_id] = rest else {
                bail!("show takes exactly one show id");
            };
            let snapshot = commands::load_snapshot(&settings.snapshot_path).await?;
            commands::show(
                &settings,
                &snapshot,
                SalesConfig::from_env()?,
                &RecordId::new(show_id.as_str()),
            )
            .await?
        }
        "geocode" => {
            if rest.is_empty() {
                bail!("geocode takes an address");
            }
            commands::geocode(&MapConfig::from_env(), &rest.join(" ")).await?
        }
        "pins" => {
            let snapshot = commands::load_snapshot(&settings.snapshot_path).await?;
            commands::pins(&settings, &snapshot, &MapConfig::from_env()).await?
        }
        "viewport" => {
            let Some((table, coords)) = rest.split_first() else {
                bail!("viewport takes a table id or name");
            };
            let snapshot = commands::load_snapshot(&settings.snapshot_path).await?;
            commands::viewport(&snapshot, &MapConfig::from_env(), table, parse_viewport(coords)?)
                .await?
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
