use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "choreio", version, about = "Chore.io CLI")]
struct Cli {
    /// Act as this account (defaults to account.email in config)
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    as_user: Option<String>,
    /// Compute progress for this date instead of today (admins only)
    #[arg(long, global = true, value_name = "YYYY-MM-DD|RFC3339")]
    date: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Properties (houses, apartments) and their members
    Property {
        #[command(subcommand)]
        action: commands::property::PropertyAction,
    },
    /// Rooms of a property
    Room {
        #[command(subcommand)]
        action: commands::room::RoomAction,
    },
    /// Recurring chores and their completion history
    Chore {
        #[command(subcommand)]
        action: commands::chore::ChoreAction,
    },
    /// Floor plan editing
    Floorplan {
        #[command(subcommand)]
        action: commands::floorplan::FloorplanAction,
    },
    /// Property invitations
    Invite {
        #[command(subcommand)]
        action: commands::invite::InviteAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CHOREIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = Context::new(cli.as_user, cli.date);
    let result = match cli.command {
        Commands::User { action } => commands::user::run(&ctx, action),
        Commands::Property { action } => commands::property::run(&ctx, action),
        Commands::Room { action } => commands::room::run(&ctx, action),
        Commands::Chore { action } => commands::chore::run(&ctx, action),
        Commands::Floorplan { action } => commands::floorplan::run(&ctx, action),
        Commands::Invite { action } => commands::invite::run(&ctx, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            generate(shell, &mut command, "choreio", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
