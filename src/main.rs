use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stormdeck_core::{AppError, Config};
use stormdeck_ui::{
    CardRenderer, CityStore, DashboardController, DashboardError, JsonFileStore, TextRenderer,
};
use stormdeck_weather::{find_city, ForecastProvider, SelectedCity, CITY_CATALOG};

#[derive(Debug, Parser)]
#[command(name = "stormdeck", version, about = "Multi-day forecasts for the cities you track")]
struct Cli {
    /// Config file (default: <config dir>/stormdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load saved cities, fetch their forecasts and print the cards
    Show,
    /// Fetch every visible card again and print the cards
    Refresh,
    /// Add a city from the catalog, or any provider id with --key/--label
    Add {
        /// Catalog label or id, e.g. "Boston" or "4930956"
        city: Option<String>,
        #[arg(long, requires = "label", conflicts_with = "city")]
        key: Option<String>,
        #[arg(long, requires = "key")]
        label: Option<String>,
    },
    /// List the cities that can be added by name
    Cities,
    /// Print the saved city list
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    stormdeck_core::init()?;
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("{:#}", e);
            let message = e
                .downcast_ref::<AppError>()
                .map(AppError::user_message)
                .unwrap_or("Something went wrong.");
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (config, _) = Config::load_validated(cli.config.as_deref())?;
    let store = Arc::new(JsonFileStore::new(config.cities_path()));
    tracing::debug!("Selected cities stored at {}", store.path().display());

    let command = cli.command.unwrap_or(Command::Show);
    match command {
        Command::Cities => {
            for city in CITY_CATALOG {
                println!("{:>8}  {}", city.key, city.label);
            }
            return Ok(());
        }
        Command::List => {
            let cities = store.load()?.unwrap_or_default();
            if cities.is_empty() {
                println!("No cities saved yet.");
            }
            for city in cities {
                println!("{:>8}  {}", city.key, city.label);
            }
            return Ok(());
        }
        _ => {}
    }

    let provider = ForecastProvider::new(&config.weather).map_err(AppError::from)?;
    let mut controller =
        DashboardController::new(store, Arc::new(provider), tokio::runtime::Handle::current());
    controller.startup()?;

    match command {
        Command::Show | Command::Cities | Command::List => {}
        Command::Refresh => {
            controller.settle().await;
            controller.refresh_all();
        }
        Command::Add { city, key, label } => {
            let selected = resolve_city(city, key, label)?;
            controller.add_city(selected)?;
        }
    }

    controller.settle().await;

    let mut renderer = TextRenderer::new(std::io::stdout().lock());
    renderer
        .render(&controller.snapshot())
        .context("Failed to write cards")?;
    Ok(())
}

fn resolve_city(
    query: Option<String>,
    key: Option<String>,
    label: Option<String>,
) -> Result<SelectedCity, AppError> {
    match (query, key, label) {
        (_, Some(key), Some(label)) => Ok(SelectedCity::new(key, label)),
        (Some(query), _, _) => {
            find_city(&query).ok_or_else(|| AppError::from(DashboardError::UnknownCity(query)))
        }
        _ => Err(DashboardError::UnknownCity(String::new()).into()),
    }
}
