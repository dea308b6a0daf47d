//! Pixelmart CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! pixelmart-cli migrate
//!
//! # Create an admin user
//! pixelmart-cli admin create -u admin -p 'strong password here'
//!
//! # Change an existing user's role
//! pixelmart-cli admin set-role -u someone -r seller
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create an admin user
//! - `admin set-role` - Change a user's role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pixelmart-cli")]
#[command(author, version, about = "Pixelmart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password (min 8 chars)
        #[arg(short, long)]
        password: String,

        /// Optional contact email
        #[arg(short, long)]
        email: Option<String>,

        /// Optional display name
        #[arg(short, long)]
        full_name: Option<String>,
    },
    /// Change an existing user's role
    SetRole {
        /// Username to modify
        #[arg(short, long)]
        username: String,

        /// New role (`user`, `seller`, `admin`)
        #[arg(short, long)]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
                full_name,
            } => {
                commands::admin::create_admin(
                    &username,
                    &password,
                    email.as_deref(),
                    full_name.as_deref(),
                )
                .await?;
            }
            AdminAction::SetRole { username, role } => {
                commands::admin::set_role(&username, &role).await?;
            }
        },
    }
    Ok(())
}
