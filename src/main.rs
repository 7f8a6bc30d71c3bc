use anyhow::Context;
use api_client::AnalyticsClient;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{ColorTheme, Settings, DEFAULT_CONFIG_FILE};
use core_types::format::to_fixed;
use core_types::CurrencySentiment;
use std::path::PathBuf;
use store::CurrencyStore;
use web_server::chart::RiskExposureChart;
use web_server::detail::{load_detail, ProfilePanel};

/// The main entry point for the forex sentiment dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_settings_from(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Commands::Serve(args) = &cli.command {
        args.apply(&mut settings);
        settings.validate()?;
    }
    let _guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(_) => web_server::run_server(settings).await,
        Commands::Symbols => handle_symbols(&settings).await,
        Commands::Exposure(args) => handle_exposure(&settings, &args.currency).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sentiment, prediction and risk exposure dashboard for forex pairs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file. A missing file falls back to defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard web server.
    Serve(ServeArgs),
    /// Fetch the symbol sentiment list once and print it.
    Symbols,
    /// Print the risk profile and exposure of one currency pair.
    Exposure(ExposureArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,

    /// Analytics backend base URL (overrides `backend.base_url`).
    #[arg(long)]
    backend_url: Option<String>,

    /// Color theme of the market widget (overrides `widget.color_theme`).
    #[arg(long, value_enum)]
    theme: Option<ColorTheme>,
}

impl ServeArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            settings.backend.base_url = url.clone();
        }
        if let Some(theme) = self.theme {
            settings.widget.color_theme = theme;
        }
    }
}

#[derive(Parser)]
struct ExposureArgs {
    /// Currency pair exactly as the backend lists it, e.g. "EUR/USD".
    currency: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_symbols(settings: &Settings) -> anyhow::Result<()> {
    let client = AnalyticsClient::new(&settings.backend)?;
    let store = CurrencyStore::new();
    store
        .load(&client)
        .await
        .context("failed to load currency data")?;

    let snapshot = store.reader().snapshot().await;
    tracing::debug!(count = snapshot.data.len(), backend = %client.base_url(), "Fetched symbols.");
    if snapshot.data.is_empty() {
        println!("No currency data available.");
        return Ok(());
    }
    println!("{}", symbols_table(&snapshot.data));
    Ok(())
}

async fn handle_exposure(settings: &Settings, currency: &str) -> anyhow::Result<()> {
    let client = AnalyticsClient::new(&settings.backend)?;
    let store = CurrencyStore::new();
    store
        .load(&client)
        .await
        .context("failed to load currency data")?;

    let view = load_detail(&store.reader(), &client, Some(currency)).await?;

    println!("{}", view.title());
    println!("{}", profile_table(&view.profile));
    match &view.exposure {
        Some(chart) => println!("{}", exposure_table(chart)),
        None => println!("No risk exposure data available."),
    }
    Ok(())
}

fn symbols_table(records: &[CurrencySentiment]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Currency",
        "Sentiment",
        "Daily Low",
        "Daily High",
        "Predicted Price",
    ]);
    for record in records {
        table.add_row(vec![
            record.currency.clone(),
            record.sentiment.to_uppercase(),
            to_fixed(record.daily_low, 4),
            to_fixed(record.daily_high, 4),
            to_fixed(record.predicted_price, 4),
        ]);
    }
    table
}

fn profile_table(profile: &ProfilePanel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Risk Profile", ""]);
    for (label, value) in profile.rows() {
        table.add_row(vec![label, value]);
    }
    table
}

fn exposure_table(chart: &RiskExposureChart) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Risk Exposure", "USD"]);
    for bar in &chart.bars {
        table.add_row(vec![bar.name, bar.tooltip.as_str()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::testing::{sample_exposure, sample_record};

    #[test]
    fn test_serve_args_override_settings() {
        let cli = Cli::try_parse_from([
            "forex-sentiment",
            "serve",
            "--port",
            "4000",
            "--backend-url",
            "http://analytics:9000",
            "--theme",
            "light",
        ])
        .unwrap();

        let mut settings = Settings::default();
        match &cli.command {
            Commands::Serve(args) => args.apply(&mut settings),
            _ => panic!("expected serve"),
        }
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:4000");
        assert_eq!(settings.backend.base_url, "http://analytics:9000");
        assert_eq!(settings.widget.color_theme, ColorTheme::Light);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_exposure_requires_a_currency() {
        assert!(Cli::try_parse_from(["forex-sentiment", "exposure"]).is_err());
        let cli = Cli::try_parse_from(["forex-sentiment", "--config", "dev.toml", "exposure", "EUR/USD"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("dev.toml"));
        assert!(matches!(cli.command, Commands::Exposure(ref a) if a.currency == "EUR/USD"));
    }

    #[test]
    fn test_symbols_table_rows() {
        let rendered = symbols_table(&[sample_record("EUR/USD", 1.0951)]).to_string();
        assert!(rendered.contains("EUR/USD"));
        assert!(rendered.contains("NEUTRAL"));
        assert!(rendered.contains("1.0874"));
        assert!(rendered.contains("1.0923"));
    }

    #[test]
    fn test_exposure_table_uses_tooltip_text() {
        let chart = RiskExposureChart::from_exposure(&sample_exposure()).unwrap();
        let rendered = exposure_table(&chart).to_string();
        assert!(rendered.contains("Net Exposure"));
        assert!(rendered.contains("$100.5"));
    }
}
