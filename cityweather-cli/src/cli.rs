use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::{fs, path::PathBuf};

use cityweather_core::{
    Config, Coordinates, FixedLocation, JsonFileStore, OpenWeatherProvider, PreferredCities,
    UnitSystem, WeatherError, Widget, language_or_default, provider_from_config,
};

use crate::terminal::TerminalPage;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and 5-day forecast for a city")]
pub struct Cli {
    /// Unit system for this run: metric or imperial.
    #[arg(long, global = true)]
    pub units: Option<String>,

    /// Language code for descriptions, e.g. "de".
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Write the rendered page here instead of stdout.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Defaults to `here`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API key, units and language.
    Configure,

    /// Weather at the current position.
    Here {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Weather for a city.
    Show { city: String },

    /// Weather for a city, then keep the local city clock ticking until Ctrl-C.
    Watch { city: String },

    /// Manage preferred cities.
    Cities {
        #[command(subcommand)]
        action: CitiesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CitiesCommand {
    List,
    Add { city: String },
    /// Choose a stored city and show its weather.
    Pick,
}

type CliWidget = Widget<OpenWeatherProvider, TerminalPage>;

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Here { lat: None, lon: None });

        if let Command::Configure = command {
            return configure();
        }

        let config = Config::load()?;
        let cities = PreferredCities::new(JsonFileStore::new(Config::data_file_path()?));

        if let Command::Cities { action: CitiesCommand::List } = &command {
            for city in cities.load() {
                println!("{city}");
            }
            return Ok(());
        }

        let mut settings = config.settings();
        if let Some(units) = self.units.as_deref() {
            settings.units = UnitSystem::try_from(units)?;
        }
        if let Some(lang) = self.lang.as_deref() {
            settings.language = language_or_default(lang);
        }

        tracing::debug!(?settings, "starting lookup");

        let echo_clock = matches!(command, Command::Watch { .. });
        // Adding a city only writes the page when asked to.
        let write = self.out.is_some() || !matches!(command, Command::Cities { .. });
        let provider = provider_from_config(&config)?;
        let mut widget = Widget::new(provider, TerminalPage::new(echo_clock), settings, cities);

        let outcome = match command {
            Command::Here { lat, lon } => {
                let position = match (lat, lon) {
                    (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
                    _ => config.home,
                };
                widget.locate(&FixedLocation(position)).await
            }
            Command::Show { city } => widget.search(&city).await,
            Command::Watch { city } => {
                let outcome = widget.search(&city).await;
                if outcome.is_ok() {
                    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
                    eprintln!();
                }
                outcome
            }
            Command::Cities { action: CitiesCommand::Pick } => {
                let stored = widget.show_preferred_cities();
                if stored.is_empty() {
                    bail!("No preferred cities yet.\nHint: run `cityweather cities add <city>` first.");
                }
                let choice = inquire::Select::new("City:", stored).prompt()?;
                widget.select_preferred_city(&choice).await
            }
            Command::Cities { action: CitiesCommand::Add { city } } => {
                println!("{}", add_city(&mut widget, &city)?);
                Ok(())
            }
            Command::Configure | Command::Cities { action: CitiesCommand::List } => Ok(()),
        };

        if write {
            write_page(&widget, self.out.as_ref())?;
        }
        finish(outcome)
    }
}

/// Store `city` through the widget, which also redraws the page's list.
fn add_city(widget: &mut CliWidget, city: &str) -> anyhow::Result<String> {
    let all = widget.add_preferred_city(city)?;
    Ok(format!("Preferred cities: {}", all.join(", ")))
}

fn write_page(widget: &CliWidget, out: Option<&PathBuf>) -> anyhow::Result<()> {
    let document = widget.view().lock().page().to_document();
    match out {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("Failed to write page: {}", path.display())),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}

fn finish(outcome: Result<(), WeatherError>) -> anyhow::Result<()> {
    outcome.map_err(|err| {
        let message = err.user_message();
        anyhow::Error::new(err).context(message)
    })
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()?;
    let units = inquire::Select::new("Units:", vec![UnitSystem::Metric, UnitSystem::Imperial])
        .with_starting_cursor(match config.units {
            UnitSystem::Metric => 0,
            UnitSystem::Imperial => 1,
        })
        .prompt()?;
    let language = inquire::Text::new("Language code:")
        .with_default(&config.language)
        .prompt()?;

    config.api_key = Some(api_key.trim().to_string());
    config.units = units;
    config.language = language.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
