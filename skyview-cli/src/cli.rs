use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use skyview_core::{
    Config, Dashboard, OpenWeatherProvider, Renderer, ViewState, config::API_KEY_ENV,
    source_from_config,
};
use std::io::{self, Write};
use tracing::debug;

use crate::terminal::Painter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Weather dashboard in your terminal")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show the dashboard for one location.
    Show {
        /// Location name, e.g. "Paris" or "Portland,US".
        location: String,

        /// Print the hourly chart without the staggered reveal.
        #[arg(long)]
        no_animation: bool,
    },

    /// Prompt for locations until Esc or Ctrl-C (the default).
    Interactive {
        /// Print the hourly chart without the staggered reveal.
        #[arg(long)]
        no_animation: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive {
            no_animation: false,
        }) {
            Command::Configure => configure(),
            Command::Show {
                location,
                no_animation,
            } => {
                let (mut dashboard, painter) = setup(no_animation)?;
                let mut out = io::stdout().lock();

                let state = dashboard
                    .submit(&location, |state| show_busy(&painter, state))
                    .await;
                painter.paint(&painter.render(state), &mut out).await?;

                if matches!(state, ViewState::Failed(_)) {
                    bail!("Search for {location:?} failed");
                }
                Ok(())
            }
            Command::Interactive { no_animation } => {
                let (dashboard, painter) = setup(no_animation)?;
                interactive(dashboard, painter).await
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env_api_key(std::env::var(API_KEY_ENV).ok());
    Ok(config)
}

fn setup(no_animation: bool) -> anyhow::Result<(Dashboard<OpenWeatherProvider>, Painter)> {
    let config = load_config()?;
    let source = source_from_config(&config)?;
    let painter = Painter::new(
        Renderer::from_config(&config),
        config.animate && !no_animation,
    );

    Ok((Dashboard::new(source), painter))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!(
        "Saved API key to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

/// Loading indicator on stderr, so stdout only carries finished screens.
fn show_busy(painter: &Painter, state: &ViewState) {
    if !state.is_busy() {
        return;
    }

    let screen = painter.render(state);
    if let Err(err) = painter.paint_control(&screen, &mut io::stderr()) {
        debug!(error = %err, "Could not draw loading indicator");
    }
}

/// One search at a time: the prompt returns only after the previous search settles.
async fn interactive(
    mut dashboard: Dashboard<OpenWeatherProvider>,
    painter: Painter,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    painter.paint(&painter.render(dashboard.state()), &mut out).await?;

    loop {
        let input = match Text::new("Location:")
            .with_help_message("Enter to search, Esc to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read location"),
        };

        let state = dashboard
            .submit(&input, |state| show_busy(&painter, state))
            .await;

        painter.paint(&painter.render(state), &mut out).await?;
        out.flush()?;
    }

    Ok(())
}
