use clap::{Parser, Subcommand};
use colored::Colorize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pr_risk_analyzer::config::Config;
use pr_risk_analyzer::github::GitHubClient;
use pr_risk_analyzer::model::{ChurnClassifier, RiskLabel};
use pr_risk_analyzer::pipeline::Pipeline;
use pr_risk_analyzer::review::TemplateReviewer;
use pr_risk_analyzer::server;

/// PR Risk Analyzer — takes a GitHub Pull Request URL and returns a risk
/// label, a score, and a generated review, either over HTTP or one-shot on
/// the command line.
#[derive(Parser, Debug)]
#[command(name = "pr-risk-analyzer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (POST /api/v1/analyze/pr).
    Serve {
        /// Port to bind; overrides the config file value.
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyze one pull request and print the result to the terminal.
    Analyze {
        /// GitHub Pull Request URL (e.g., https://github.com/org/repo/pull/42)
        pr_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = Config::load()?;
    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Command::Serve { port } => serve(pipeline, port.unwrap_or(config.server.port)).await,
        Command::Analyze { pr_url } => analyze_once(pipeline, &pr_url).await,
    }
}

/// Wire the pipeline with the built-in collaborators. The GitHub token is
/// resolved here, once, so a missing credential fails at startup rather
/// than on the first request.
fn build_pipeline(config: &Config) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let token = config.github_token()?;
    let github = GitHubClient::new(token, config.github_api_base_url())?;
    Ok(Pipeline::new(
        github,
        Arc::new(ChurnClassifier::new()),
        Arc::new(TemplateReviewer::new()),
    ))
}

async fn serve(pipeline: Pipeline, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = server::router(pipeline);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "pr-risk-analyzer listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn analyze_once(pipeline: Pipeline, pr_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = pipeline.analyze(pr_url).await?;

    println!();
    println!("═══ Risk: {} (score {:.2}) ═══", colorize_label(outcome.risk_label), outcome.risk_score);
    println!();
    println!("{}", outcome.review_comments);
    println!();
    Ok(())
}

fn colorize_label(label: RiskLabel) -> colored::ColoredString {
    match label {
        RiskLabel::Low => label.to_string().green(),
        RiskLabel::Medium => label.to_string().yellow(),
        RiskLabel::High => label.to_string().red(),
    }
}
