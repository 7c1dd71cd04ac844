//! Reservations CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! rsv-cli migrate
//!
//! # Create a staff account
//! rsv-cli staff create -u host -p 'a long password'
//!
//! # List accounts
//! rsv-cli staff list
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `staff create` - Create back-office accounts
//! - `staff list` - List back-office accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rsv-cli")]
#[command(author, version, about = "Reservations CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage back-office accounts
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
}

#[derive(Subcommand)]
enum StaffAction {
    /// Create a new account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Create the account without back-office access
        #[arg(long)]
        non_staff: bool,
    },
    /// List all accounts
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Staff { action } => match action {
            StaffAction::Create {
                username,
                password,
                non_staff,
            } => {
                commands::staff::create_user(&username, &password, !non_staff).await?;
            }
            StaffAction::List => commands::staff::list_users().await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_staff_create() {
        let cli = Cli::try_parse_from([
            "rsv-cli", "staff", "create", "-u", "host", "-p", "password123", "--non-staff",
        ])
        .map_err(|e| e.to_string());

        match cli.map(|c| c.command) {
            Ok(Commands::Staff {
                action:
                    StaffAction::Create {
                        username,
                        password,
                        non_staff,
                    },
            }) => {
                assert_eq!(username, "host");
                assert_eq!(password, "password123");
                assert!(non_staff);
            }
            _ => panic!("expected staff create"),
        }
    }
}
