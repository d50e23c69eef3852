use clap::{Args, Parser, Subcommand};
use dq_dashboard::config::AppConfig;
use dq_dashboard::logic::{load_datasets, render_table, Route, SessionState, SummaryCard};
use dq_dashboard::{Dashboard, DatasetId, NewUser};

#[derive(Parser)]
#[command(author, version, about = "Data quality dashboard client", long_about = None)]
struct Cli {
    /// Backend base URL, overrides configuration
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DQ_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show whether a session is stored
    Status,
    /// List datasets visible to the current user
    Datasets,
    /// Show the latest summary and time series of a dataset
    Metrics {
        #[arg(long)]
        dataset: DatasetId,
    },
    /// User administration
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Subcommand)]
enum UsersCommand {
    List,
    Create(CreateUserArgs),
}

#[derive(Args)]
struct CreateUserArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long, env = "DQ_NEW_USER_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    admin: bool,
    #[arg(long)]
    inactive: bool,
    /// Dataset id to grant access to, repeatable
    #[arg(long = "dataset")]
    datasets: Vec<DatasetId>,
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout | Command::Status => Route::Login,
            Command::Datasets | Command::Metrics { .. } => Route::Dashboard,
            Command::Users(_) => Route::Users,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }

    let dashboard = Dashboard::from_config(&config)?;

    if let Err(message) = run(&dashboard, cli.command).await {
        eprintln!("{}", message);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(dashboard: &Dashboard, command: Command) -> Result<(), String> {
    let requested = command.route();
    if dashboard.session.guard(requested) != requested {
        return Err("Not logged in. Run `dq-dashboard login` first.".to_string());
    }

    match command {
        Command::Login { email, password } => {
            dashboard
                .session
                .login(&email, &password)
                .await
                .map_err(|e| e.message())?;
            println!("Logged in as {}", email);
        }
        Command::Logout => {
            dashboard.session.logout().map_err(|e| e.to_string())?;
            println!("Logged out");
        }
        Command::Status => match dashboard.session.state() {
            SessionState::Authenticated => println!("Authenticated against {}", dashboard.gateway.base_url()),
            SessionState::Unauthenticated => println!("Not logged in"),
        },
        Command::Datasets => {
            for dataset in load_datasets(dashboard.gateway.as_ref()).await? {
                println!("{:>5}  {:<24} {}", dataset.id, dataset.key, dataset.name);
            }
        }
        Command::Metrics { dataset } => show_metrics(dashboard, dataset).await?,
        Command::Users(UsersCommand::List) => {
            dashboard.users.load().await;
            let state = dashboard.users.current();
            if let Some(error) = state.error {
                return Err(error);
            }
            for user in &state.users {
                println!(
                    "{}  {} | {} | {}",
                    user.email,
                    user.full_name.as_deref().unwrap_or("—"),
                    user.role(),
                    user.status()
                );
            }
        }
        Command::Users(UsersCommand::Create(args)) => {
            let mut user = NewUser::new(args.email, args.password);
            user.full_name = args.full_name;
            user.is_admin = args.admin;
            user.is_active = !args.inactive;
            for dataset_id in args.datasets {
                if !user.dataset_ids.contains(&dataset_id) {
                    user.toggle_dataset(dataset_id);
                }
            }

            let created = dashboard.users.create(&user).await?;
            println!("Created user {} (id {})", created.email, created.id);
        }
    }

    Ok(())
}

async fn show_metrics(dashboard: &Dashboard, dataset_id: DatasetId) -> Result<(), String> {
    dashboard.metrics.select(Some(dataset_id)).await;
    let state = dashboard.metrics.current();

    if let Some(error) = state.error {
        return Err(error);
    }

    if let Some(summary) = &state.summary {
        for card in summary.iter().map(SummaryCard::from) {
            println!(
                "{:<13} {:>7}  {}",
                card.dimension.as_str(),
                card.value,
                card.recorded_at
            );
        }
    }

    if let Some(series) = &state.series {
        println!();
        if series.is_empty() {
            println!("No time series data");
        } else {
            println!("{}", render_table(series));
        }
    }

    Ok(())
}
