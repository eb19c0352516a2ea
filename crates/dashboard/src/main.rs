use std::io::IsTerminal;
use std::process::ExitCode;

use analysis_client::{AnalysisClient, ClientConfig};
use analysis_core::{AnalyzeRequest, NewsCategory};
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dashboard::render::{self, Palette};
use dashboard::settings::{FilePreferenceStore, Theme, ThemeSettings};
use dashboard::{Alert, Dashboard, View};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "smart-invest", author, version, about = "SmartInvest stock dashboard", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the analysis server
    #[arg(long, global = true, env = "SMART_INVEST_API_URL")]
    api_url: Option<String>,

    /// Disable colours
    #[arg(long, global = true)]
    plain: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a stock and decide whether it clears the threshold
    Analyze(AnalyzeArgs),
    /// Show the latest market news
    News {
        #[arg(long, default_value = "indian")]
        category: NewsCategory,

        #[arg(long, default_value_t = dashboard::controller::NEWS_LIMIT)]
        limit: u32,
    },
    /// Show or change the colour theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Ticker symbol, e.g. TCS.NS
    ticker: String,

    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long)]
    max_news: Option<u32>,

    #[arg(long)]
    sentiment_weight: Option<f64>,

    #[arg(long)]
    technical_weight: Option<f64>,

    #[arg(long)]
    fundamental_weight: Option<f64>,

    /// Print the raw result as JSON
    #[arg(long)]
    json: bool,
}

impl AnalyzeArgs {
    fn to_request(&self) -> AnalyzeRequest {
        AnalyzeRequest::new(self.ticker.as_str())
            .max_news(self.max_news)
            .threshold(self.threshold)
            .sentiment_weight(self.sentiment_weight)
            .technical_weight(self.technical_weight)
            .fundamental_weight(self.fundamental_weight)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ThemeAction {
    Show,
    Toggle,
    Dark,
    Light,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Analyze(args) => run_analyze(&cli, args).await,
        Command::News { category, limit } => run_news(&cli, *category, *limit).await,
        Command::Theme { action } => run_theme(*action),
    }
}

fn init_logging(verbose: bool) {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let default_filter = if verbose {
        "smart_invest=debug,dashboard=debug,analysis_client=debug,sentiment_analysis=debug"
    } else {
        "smart_invest=info,dashboard=info,analysis_client=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so rendered screens can be piped.
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_dashboard(cli: &Cli) -> anyhow::Result<Dashboard<AnalysisClient>> {
    let mut config = ClientConfig::default();
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    tracing::debug!("Using analysis server at {}", config.base_url);

    let client = AnalysisClient::new(config).context("Failed to build HTTP client")?;
    Ok(Dashboard::new(client))
}

fn palette(cli: &Cli) -> Palette {
    let colour = !cli.plain
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();
    if !colour {
        return Palette::plain();
    }

    match FilePreferenceStore::default_location() {
        Ok(store) => Palette::for_theme(ThemeSettings::new(store).get()),
        Err(e) => {
            tracing::warn!("{}; using the {} theme", e, Theme::default());
            Palette::for_theme(Theme::default())
        }
    }
}

fn report(alert: Alert) -> ExitCode {
    eprintln!("Error: {}", alert);
    ExitCode::FAILURE
}

async fn run_analyze(cli: &Cli, args: &AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let mut dashboard = build_dashboard(cli)?;
    if let Err(alert) = dashboard.analyze(args.to_request()).await {
        return Ok(report(alert));
    }

    if let (View::Results(result), Some(request)) = (dashboard.view(), dashboard.last_request()) {
        if args.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            println!("{}", render::results(result, request, &palette(cli)));
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_news(cli: &Cli, category: NewsCategory, limit: u32) -> anyhow::Result<ExitCode> {
    let mut dashboard = build_dashboard(cli)?;
    if let Err(alert) = dashboard.show_news_limited(category, limit).await {
        return Ok(report(alert));
    }

    if let View::News { category, feed } = dashboard.view() {
        println!("{}", render::news(*category, feed, &palette(cli)));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_theme(action: ThemeAction) -> anyhow::Result<ExitCode> {
    let store = FilePreferenceStore::default_location()?;
    let path = store.path().display().to_string();
    let mut settings = ThemeSettings::new(store);

    let theme = match action {
        ThemeAction::Show => settings.get(),
        ThemeAction::Toggle => settings.toggle()?,
        ThemeAction::Dark => {
            settings.set(Theme::Dark)?;
            Theme::Dark
        }
        ThemeAction::Light => {
            settings.set(Theme::Light)?;
            Theme::Light
        }
    };

    if action != ThemeAction::Show {
        tracing::info!("Saved theme preference to {}", path);
    }
    println!("{}", theme);
    Ok(ExitCode::SUCCESS)
}
