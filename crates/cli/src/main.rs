//! ByteMe admin console CLI.
//!
//! # Usage
//!
//! ```bash
//! # Log in through the general admin portal
//! byteme login --portal general --email admin@byteme.lk
//!
//! # Log in through the multi-vendor portal
//! byteme login --portal multi-vendor --email mv@byteme.lk
//!
//! # Sign in with Google instead
//! byteme login --google
//!
//! # Recover a forgotten password
//! byteme forgot-password --email admin@byteme.lk
//! byteme reset-password --token <TOKEN>
//!
//! # Show the logged-in admin
//! byteme whoami
//!
//! # Platform-wide dashboard stats
//! byteme dashboard
//!
//! # Entity listings
//! byteme vendors list
//! byteme customers list --period 30d
//! byteme orders list
//!
//! # Vendor access grants (multi-vendor admins)
//! byteme grants list
//! byteme grants accept <GRANT_ID>
//! ```
//!
//! # Environment Variables
//!
//! - `BYTEME_API_BASE_URL` - Base URL of the ByteMe backend API
//! - `BYTEME_SESSION_FILE` - Path of the session file (default `~/.byteme/session.json`)
//! - `BYTEME_PASSWORD` - Password for `login` and `reset-password`, as an alternative to `--password`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, customers, dashboard, grants, orders, vendors};

#[derive(Parser)]
#[command(name = "byteme")]
#[command(author, version, about = "ByteMe admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in through an admin portal
    Login(auth::LoginArgs),
    /// Register a new admin account
    Register {
        #[command(subcommand)]
        portal: auth::RegisterPortal,
    },
    /// Request a password reset link by email
    ForgotPassword {
        /// Email address of the account
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password using an emailed reset token
    ResetPassword {
        /// Reset token from the emailed link
        #[arg(short, long)]
        token: String,

        /// New password
        #[arg(long, env = "BYTEME_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the logged-in admin
    Whoami,
    /// Ingest a Google OAuth callback URL
    OauthCallback {
        /// The full callback URL, query string included
        url: String,
    },
    /// Evaluate route access for a console path
    Open {
        /// Console path, e.g. `/dashboard` or `/mv/<ADMIN_ID>`
        path: String,
    },
    /// Dashboard statistics
    Dashboard(dashboard::DashboardArgs),
    /// Manage vendors
    Vendors {
        #[command(subcommand)]
        action: vendors::VendorAction,
    },
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: customers::CustomerAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: orders::OrderAction,
    },
    /// Vendor access grants for the logged-in multi-vendor admin
    Grants {
        #[command(subcommand)]
        action: grants::GrantAction,
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
        Commands::Login(args) => auth::login(args).await?,
        Commands::Register { portal } => auth::register(portal).await?,
        Commands::ForgotPassword { email } => auth::forgot_password(&email).await?,
        Commands::ResetPassword { token, password } => {
            auth::reset_password(&token, password).await?;
        }
        Commands::Logout => auth::logout().await?,
        Commands::Whoami => auth::whoami().await?,
        Commands::OauthCallback { url } => auth::oauth_callback(&url).await?,
        Commands::Open { path } => auth::open(&path).await?,
        Commands::Dashboard(args) => dashboard::show(args).await?,
        Commands::Vendors { action } => vendors::run(action).await?,
        Commands::Customers { action } => customers::run(action).await?,
        Commands::Orders { action } => orders::run(action).await?,
        Commands::Grants { action } => grants::run(action).await?,
    }
    Ok(())
}
