mod render;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use routedesk_lib::api::MemoryApi;
use routedesk_lib::dashboard::{Dashboard, DashboardConfig};
use routedesk_lib::error::{ApiError, DashboardError};
use routedesk_widgets::flags::FlagMap;
use routedesk_widgets::scheduler::TokioScheduler;
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "routedesk")]
#[command(about = "Plan multi-stop visits and benchmark their routes", long_about = None)]
struct Cli {
    /// JSON fixture with doctors, users and a benchmark result
    #[arg(short, long, default_value = "routedesk-cli/fixtures/routedesk.json")]
    fixture: PathBuf,

    /// Log file
    #[arg(long, default_value = "routedesk.log")]
    log_file: PathBuf,

    /// Rows per page in the user table
    #[arg(long, default_value = "10")]
    page_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List doctors grouped by specialty
    Doctors,

    /// Show one page of the user table
    Users {
        /// Page to show (0-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Sort by column (name, email, age); repeat for a sort chain
        #[arg(short, long)]
        sort: Vec<String>,

        /// Only rows whose name contains this text
        #[arg(long)]
        name: Option<String>,
    },

    /// Run a route benchmark
    Benchmark {
        /// Doctor ID
        #[arg(short, long)]
        doctor: String,

        /// User IDs, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        users: Vec<String>,

        /// Priority user IDs, comma separated
        #[arg(short, long, value_delimiter = ',')]
        priority: Vec<String>,

        /// Maximum number of users
        #[arg(long)]
        max_users: Option<usize>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to open log file: {0}")]
    LogFile(#[from] std::io::Error),

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("no tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let log_file = File::create(&cli.log_file)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let api = Arc::new(MemoryApi::from_path(&cli.fixture).await?);
    let scheduler = Arc::new(TokioScheduler::current()?);
    let mut config = DashboardConfig::default().with_page_size(cli.page_size);
    if let Commands::Benchmark {
        max_users: Some(max),
        ..
    } = &cli.command
    {
        config = config.with_max_users(*max);
    }

    let mut dashboard = Dashboard::new(api, scheduler).with_config(config);
    dashboard.load().await?;

    match cli.command {
        Commands::Doctors => render::doctors(&dashboard.doctor_groups()),
        Commands::Users { page, sort, name } => {
            let table = dashboard.table();
            for column in &sort {
                table.toggle_sort(column, true);
            }
            if let Some(name) = name {
                table.set_filter("name", name);
            }
            table.set_page(page);
            render::users(&table.view(), &table.flags());
        }
        Commands::Benchmark {
            doctor,
            users,
            priority,
            ..
        } => {
            dashboard.select_doctor(&doctor)?;

            // Drive the table the way an operator would
            let table = dashboard.table().clone();
            for id in &users {
                table.toggle_row(id);
            }
            dashboard.pump();
            if dashboard.user_ids().len() < users.len() {
                log::warn!(
                    "Only {} of {} users selected",
                    dashboard.user_ids().len(),
                    users.len()
                );
            }
            dashboard.set_priorities(priority.into_iter().map(|id| (id, true)).collect::<FlagMap>());

            let result = dashboard.start().await?;
            render::benchmark(&result, dashboard.user_ids(), &dashboard.priority_user_ids());
        }
    }
    Ok(())
}
