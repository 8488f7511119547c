use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use colorseason::classifier::Classifier;
use colorseason::comparison::{self, Phase};
use colorseason::config::AppConfig;
use colorseason::server::{self, AppState};
use colorseason::store::UploadStore;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing model.onnx and labels.txt
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Directory uploaded images are stored in
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// SQLite database file for the comparison log
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the classification HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },
    /// Create the database tables
    InitDb,
    /// Replay labeled dataset lists through the classifier and log outcomes
    RunComparison {
        /// Whitespace-delimited list of <filepath> <class id> for the train split
        train_list: PathBuf,
        /// Whitespace-delimited list of <filepath> <class id> for the test split
        test_list: PathBuf,
    },
}

/// Builds the classifier from the configured model directory. A missing
/// model or label file fails here, before any request is accepted.
fn build_classifier(config: &AppConfig) -> anyhow::Result<Classifier> {
    let classifier = Classifier::builder()
        .with_model_file(config.model_file())
        .context("Model weights are not available")?
        .with_labels_file(config.labels_file())
        .context("Label table is not available")?
        .build()?;

    let info = classifier.info();
    info!(
        "Classifier ready: {} classes, {}x{} input, model {}",
        info.num_classes, info.input_size.0, info.input_size.1, info.model_path
    );
    Ok(classifier)
}

async fn serve(config: AppConfig, bind: SocketAddr) -> anyhow::Result<()> {
    let pool = config
        .connect_pool()
        .await
        .context("Failed to open the comparison database")?;
    comparison::init_db(&pool).await?;

    let classifier = build_classifier(&config)?;
    let store = UploadStore::new(config.upload_dir.clone());
    let state = AppState::new(classifier, pool, store);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Listening on http://{}", bind);
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}

async fn run_comparison(
    config: AppConfig,
    train_list: PathBuf,
    test_list: PathBuf,
) -> anyhow::Result<()> {
    let pool = config
        .connect_pool()
        .await
        .context("Failed to open the comparison database")?;
    comparison::init_db(&pool).await?;

    let classifier = build_classifier(&config)?;
    comparison::run_comparison(
        &pool,
        &classifier,
        &[
            (train_list.as_path(), Phase::Train),
            (test_list.as_path(), Phase::Test),
        ],
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colorseason::init_logger();
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.model_dir, cli.upload_dir, cli.database);

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::InitDb => {
            let pool = config
                .connect_pool()
                .await
                .context("Failed to open the comparison database")?;
            comparison::init_db(&pool).await?;
            println!("Initialized the database.");
            Ok(())
        }
        Command::RunComparison {
            train_list,
            test_list,
        } => run_comparison(config, train_list, test_list).await,
    }
}
