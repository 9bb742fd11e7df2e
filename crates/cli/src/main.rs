use anyhow::{Context, Result, anyhow};
use artifacts::{
    ChurnArtifactPaths, LabelEncoder, TreeEnsemble, load_churn_artifacts,
    load_recommendation_bundle,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{RawRecord, UnknownCategoryPolicy};
use predictors::{ChurnPredictor, RecommendationPredictor, RiskCategory};
use serde_json::Value;
use server::ServerConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// telco-ml - plan recommendation and churn risk models
#[derive(Parser)]
#[command(name = "telco-ml")]
#[command(about = "Serve and run the telco plan recommender and churn model", long_about = None)]
struct Cli {
    /// Directory holding the model artifacts
    #[arg(short, long, global = true, env = "TELCO_ML_MODEL_DIR", default_value = ".")]
    model_dir: PathBuf,

    /// What to do with categories the encoders have never seen
    #[arg(long, global = true, env = "TELCO_ML_UNKNOWN_CATEGORY", default_value = "first-class")]
    unknown_category: UnknownCategoryPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, env = "TELCO_ML_ADDR", default_value = server::DEFAULT_ADDR)]
        addr: SocketAddr,

        /// Refuse to start unless every model loads
        #[arg(
            long,
            env = "TELCO_ML_STRICT_STARTUP",
            value_parser = clap::builder::FalseyValueParser::new()
        )]
        strict: bool,
    },

    /// Recommend a plan for the customer(s) in a JSON file
    Recommend {
        /// JSON file with one customer object or an array of them
        #[arg(long)]
        input: PathBuf,

        /// Print the feature vector the model saw
        #[arg(long)]
        explain: bool,
    },

    /// Score churn risk for the customer(s) in a JSON file
    Churn {
        /// JSON file with one customer object or an array of them
        #[arg(long)]
        input: PathBuf,

        /// Print the feature vector before scaling
        #[arg(long)]
        explain: bool,
    },

    /// Summarize the artifacts in the model directory
    Inspect,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let policy = cli.unknown_category;

    match cli.command {
        Commands::Serve { addr, strict } => {
            let config = ServerConfig {
                addr,
                unknown_category: policy,
                strict_startup: strict,
                ..ServerConfig::with_model_dir(&cli.model_dir)
            };
            server::serve(config).await?
        }
        Commands::Recommend { input, explain } => {
            handle_recommend(&cli.model_dir, policy, &input, explain)?
        }
        Commands::Churn { input, explain } => handle_churn(&cli.model_dir, policy, &input, explain)?,
        Commands::Inspect => handle_inspect(&cli.model_dir)?,
    }

    Ok(())
}

/// Read a JSON file holding one record or an array of records.
fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(anyhow!("Item {} in {} is not a JSON object", i, path.display())),
            })
            .collect(),
        _ => Err(anyhow!("{} must hold a JSON object or array", path.display())),
    }
}

fn record_label(record: &RawRecord, index: usize) -> String {
    record
        .get("username")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", index + 1))
}

/// Indented `name value` rows, or the reason no vector could be built.
fn explain_lines(explained: predictors::Result<Vec<(String, f64)>>) -> Vec<String> {
    match explained {
        Ok(features) => features
            .iter()
            .map(|(name, value)| format!("   {:<24} {}", name.dimmed(), value))
            .collect(),
        Err(e) => vec![format!("   {} {}", "explain failed:".red(), e)],
    }
}

/// Handle the 'recommend' command
fn handle_recommend(
    model_dir: &Path,
    policy: UnknownCategoryPolicy,
    input: &Path,
    explain: bool,
) -> Result<()> {
    let config = ServerConfig::with_model_dir(model_dir);
    let bundle = load_recommendation_bundle(&config.recommendation_bundle_path())
        .context("Failed to load recommendation bundle")?;
    let predictor = RecommendationPredictor::new(bundle, policy)?;

    let records = read_records(input)?;
    let start = Instant::now();
    let results = predictor.predict_batch(&records);
    info!("Scored {} records in {:?}", records.len(), start.elapsed());

    println!("{}", "Plan Recommendations:".bold().blue());
    for (i, (record, result)) in records.iter().zip(results).enumerate() {
        let who = record_label(record, i);
        match result {
            Ok(rec) => println!(
                "{} {} -> {} ({})",
                "✓".green(),
                who,
                rec.recommendation.bold(),
                rec.confidence_score
            ),
            Err(e) => println!("{} {} -> {}", "✗".red(), who, e),
        }
        if explain {
            for line in explain_lines(predictor.explain(record)) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Handle the 'churn' command
fn handle_churn(
    model_dir: &Path,
    policy: UnknownCategoryPolicy,
    input: &Path,
    explain: bool,
) -> Result<()> {
    let config = ServerConfig::with_model_dir(model_dir);
    let artifacts =
        load_churn_artifacts(&config.churn_paths()).context("Failed to load churn artifacts")?;
    let predictor = ChurnPredictor::new(artifacts, policy)?;

    let records = read_records(input)?;

    println!("{}", "Churn Risk:".bold().blue());
    for (i, record) in records.iter().enumerate() {
        let who = record_label(record, i);
        match predictor.predict(record) {
            Ok(assessment) => {
                let category = match assessment.risk_category {
                    RiskCategory::High => assessment.risk_category.as_str().red(),
                    RiskCategory::Medium => assessment.risk_category.as_str().yellow(),
                    RiskCategory::Low => assessment.risk_category.as_str().green(),
                };
                println!(
                    "{} {} -> {} risk ({:.2}%), prediction {}",
                    "✓".green(),
                    who,
                    category,
                    assessment.risk_score * 100.0,
                    assessment.prediction
                );
            }
            Err(e) => println!("{} {} -> {}", "✗".red(), who, e),
        }
        if explain {
            for line in explain_lines(predictor.explain(record)) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Handle the 'inspect' command
fn handle_inspect(model_dir: &Path) -> Result<()> {
    let config = ServerConfig::with_model_dir(model_dir);

    println!("{}", "Recommendation bundle".bold().blue());
    let bundle_path = config.recommendation_bundle_path();
    match load_recommendation_bundle(&bundle_path) {
        Ok(bundle) => {
            println!("{}File: {}", "• ".green(), bundle_path.display());
            println!("{}Scaler: {}", "• ".green(), if bundle.model.has_scaler() { "yes" } else { "no" });
            print_forest(bundle.model.classifier());
            match &bundle.features {
                Some(features) => println!("{}Feature order: {}", "• ".green(), features.join(", ")),
                None => println!("{}Feature order: {}", "• ".green(), "not recorded".yellow()),
            }
            print_encoder("le_plan", bundle.le_plan.as_ref());
            print_encoder("le_device", bundle.le_device.as_ref());
            print_encoder("le_target", bundle.le_target.as_ref());
        }
        Err(e) => println!("{} {}", "✗".red(), e),
    }

    println!();
    println!("{}", "Churn model".bold().blue());
    let paths: ChurnArtifactPaths = config.churn_paths();
    match load_churn_artifacts(&paths) {
        Ok(churn) => {
            println!("{}Model: {}", "• ".green(), paths.model.display());
            print_forest(&churn.model);
            println!(
                "{}Scaler width: {}",
                "• ".green(),
                churn
                    .scaler
                    .n_features()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unspecified".to_string())
            );
            let mut columns: Vec<_> = churn.encoders.iter().collect();
            columns.sort_by(|a, b| a.0.cmp(b.0));
            for (column, encoder) in columns {
                print_encoder(column, Some(encoder));
            }
        }
        Err(e) => println!("{} {}", "✗".red(), e),
    }
    Ok(())
}

fn print_forest(forest: &TreeEnsemble) {
    let nodes: usize = forest.trees().iter().map(|t| t.node_count()).sum();
    let depth = forest.trees().iter().map(|t| t.depth()).max().unwrap_or(0);
    println!(
        "{}Forest: {} trees, {} nodes, max depth {}, {} features, classes {:?}",
        "• ".cyan(),
        forest.trees().len(),
        nodes,
        depth,
        forest.n_features(),
        forest.classes()
    );
}

fn print_encoder(name: &str, encoder: Option<&LabelEncoder>) {
    match encoder {
        Some(encoder) => println!(
            "{}{} ({}): {}",
            "• ".cyan(),
            name,
            encoder.len(),
            encoder.classes().join(", ")
        ),
        None => println!("{}{}: {}", "• ".cyan(), name, "missing".yellow()),
    }
}
