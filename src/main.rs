mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use sl_core::config::Config;
use sl_server::storage::{allowed_file, FileStore};
use sl_vision::{analyze_file, AnalysisParams, PlaceholderDetector};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // CLI flags win over the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting structlens server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    sl_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "structlens=trace,sl_server=trace,sl_vision=trace,sl_core=debug,tower_http=debug"
                .to_string()
        } else {
            "structlens=info,sl_server=debug,sl_vision=info,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so `analyze` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Analyze { file, output_dir } => {
            analyze(&file, output_dir.as_deref(), cli.config.as_deref())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("structlens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn analyze(file: &Path, output_dir: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);

    if !file.exists() {
        anyhow::bail!("Input file does not exist: {}", file.display());
    }
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !allowed_file(&name) {
        anyhow::bail!("File type not allowed: {}", file.display());
    }

    let result_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.storage.result_dir.clone());
    std::fs::create_dir_all(&result_dir)?;
    let store = FileStore::new(config.storage.upload_dir.clone(), result_dir);

    tracing::info!("Analyzing {}", file.display());
    let params = AnalysisParams::from(&config.analysis);
    let analysis = analyze_file(file, &params, &PlaceholderDetector)?;
    let output_image = store.save_result(&analysis.annotated)?;
    tracing::info!(
        "Annotated image written to {}",
        store.result_dir().join(&output_image).display()
    );

    let report = analysis.into_report(output_image);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  Max upload: {} bytes",
        config.server.max_upload_bytes
    );
    println!("  Uploads: {}", config.storage.upload_dir.display());
    println!("  Results: {}", config.storage.result_dir.display());
    println!(
        "  Canny thresholds: {} / {}",
        config.analysis.canny_low, config.analysis.canny_high
    );

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
