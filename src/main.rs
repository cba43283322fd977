use clap::{Parser, Subcommand};
use std::path::Path;

use user_repo::bench::run_benchmark;
use user_repo::config::AppConfig;
use user_repo::demo::run_crud_demo;
use user_repo::logging::init_tracing;
use user_repo::startup::open_backend;

#[derive(Parser, Debug)]
#[command(name = "user-repo")]
#[command(about = "User repository over PostgreSQL, MySQL and SQLite")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Database type (overrides config file; inferred from --url when omitted)
    #[arg(long = "type")]
    db_type: Option<String>,

    /// Connection URL (overrides config file)
    #[arg(long)]
    url: Option<String>,

    /// Database user (overrides config file)
    #[arg(long)]
    user: Option<String>,

    /// Database password (overrides config file)
    #[arg(long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, read, update, list and delete one user
    Demo {
        /// Create the users table first when it does not exist
        #[arg(long)]
        init_schema: bool,
    },
    /// Compare per-statement and multi-row inserts plus a filtered select
    Bench {
        /// Rows per insert step (overrides config file)
        #[arg(short, long)]
        iterations: Option<u32>,
    },
    /// Print every user as one JSON object per line
    List,
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(url) = &args.url {
        config.database.url = url.clone();
        if args.db_type.is_none() {
            if let Some((scheme, _)) = url.split_once(':') {
                config.database.db_type = scheme.to_string();
            }
        }
    }
    if let Some(db_type) = &args.db_type {
        config.database.db_type = db_type.clone();
    }
    if let Some(user) = &args.user {
        config.database.username = Some(user.clone());
    }
    if let Some(password) = &args.password {
        config.database.password = Some(password.clone());
    }
    if let Command::Bench {
        iterations: Some(iterations),
    } = args.command
    {
        config.bench.iterations = iterations;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_tracing("warn");

    let (mut app_config, using_defaults) =
        if args.config == "config.yaml" && !Path::new("config.yaml").exists() {
            println!("No config.yaml found, using default configuration:");
            println!("   - In-memory SQLite database");
            println!("   - Table 'users' created on startup\n");
            (AppConfig::default_config(), true)
        } else {
            let config = AppConfig::load_from_file(&args.config)
                .map_err(|e| format!("Failed to load configuration: {}", e))?;
            (config, false)
        };

    apply_overrides(&mut app_config, &args);
    // a fresh in-memory database has no tables
    let memory = app_config.database.url.contains(":memory:");

    match &args.command {
        Command::Demo { init_schema } => {
            let factory = open_backend(&app_config, *init_schema || using_defaults || memory).await?;
            let repo = factory.create_user_repository(&app_config.table)?;
            run_crud_demo(repo.as_ref()).await?;
            repo.close().await;
        }
        Command::Bench { .. } => {
            let factory = open_backend(&app_config, false).await?;
            let target = factory.create_bench_target()?;
            run_benchmark(target.as_ref(), app_config.bench.iterations).await?;
        }
        Command::List => {
            let factory = open_backend(&app_config, using_defaults || memory).await?;
            let repo = factory.create_user_repository(&app_config.table)?;
            for user in repo.find_all().await? {
                println!("{}", serde_json::to_string(&user)?);
            }
            repo.close().await;
        }
    }

    Ok(())
}
