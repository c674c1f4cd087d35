//! Session commands: login, register, password recovery, logout, whoami,
//! OAuth callback and route checks.

use clap::{Args, Subcommand, ValueEnum};
use secrecy::SecretString;
use url::Url;

use byteme_client::auth::{Credentials, GeneralRegistration, MultiVendorRegistration};
use byteme_client::guard::{self, Route, RouteDecision};
use byteme_core::{AdminRole, Email};

use super::{CliError, Context};

/// Which login portal to authenticate through.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Portal {
    /// Platform-wide general admin portal
    General,
    /// Vendor-scoped multi-vendor admin portal
    MultiVendor,
}

impl From<Portal> for AdminRole {
    fn from(portal: Portal) -> Self {
        match portal {
            Portal::General => Self::GeneralAdmin,
            Portal::MultiVendor => Self::MultiVendorAdmin,
        }
    }
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Print the Google OAuth entry URL instead of logging in with
    /// credentials
    #[arg(long, conflicts_with_all = ["portal", "email"])]
    pub google: bool,

    /// Which portal to log in through
    #[arg(short = 'p', long, value_enum, required_unless_present = "google")]
    pub portal: Option<Portal>,

    /// Admin email address
    #[arg(short, long, required_unless_present = "google")]
    pub email: Option<String>,

    /// Password; prefer the environment variable over the flag
    #[arg(long, env = "BYTEME_PASSWORD", hide_env_values = true, required_unless_present = "google")]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum RegisterPortal {
    /// Register a general admin account
    General {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "BYTEME_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a multi-vendor admin account using a vendor-issued access
    /// token
    MultiVendor {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "BYTEME_PASSWORD", hide_env_values = true)]
        password: String,

        /// Vendor-issued access token
        #[arg(short = 't', long)]
        access_token: String,
    },
}

fn parse_email(raw: &str) -> Result<Email, CliError> {
    Email::parse(raw).map_err(|e| CliError::InvalidArgument(format!("email: {e}")))
}

pub async fn login(args: LoginArgs) -> Result<(), CliError> {
    let ctx = Context::load().await?;

    if args.google {
        println!("Open this URL in a browser to sign in with Google:");
        println!("{}", ctx.auth.google_login_url());
        println!("Then run `byteme oauth-callback <URL>` with the URL you are redirected to.");
        return Ok(());
    }

    let (Some(portal), Some(email), Some(password)) = (args.portal, args.email, args.password)
    else {
        return Err(CliError::InvalidArgument(
            "login requires --portal, --email and --password".to_owned(),
        ));
    };

    let credentials = Credentials {
        email: parse_email(&email)?,
        password: SecretString::from(password),
    };
    let session = ctx.auth.login(portal.into(), &credentials).await?;

    println!(
        "Logged in as {} <{}> ({})",
        session.profile.name, session.profile.email, session.role()
    );
    if session.role() == AdminRole::MultiVendorAdmin {
        println!("Vendor access grants: {}", session.vendor_grants.len());
    }
    Ok(())
}

pub async fn register(portal: RegisterPortal) -> Result<(), CliError> {
    let ctx = Context::load().await?;

    let message = match portal {
        RegisterPortal::General {
            name,
            email,
            password,
        } => {
            let registration = GeneralRegistration {
                name,
                email: parse_email(&email)?,
                password: SecretString::from(password),
            };
            ctx.auth.register_general(&registration).await?
        }
        RegisterPortal::MultiVendor {
            name,
            email,
            password,
            access_token,
        } => {
            let registration = MultiVendorRegistration {
                name,
                email: parse_email(&email)?,
                password: SecretString::from(password),
                access_token,
            };
            ctx.auth.register_multi_vendor(&registration).await?
        }
    };

    println!("{message}");
    println!("Log in with `byteme login` to start a session.");
    Ok(())
}

pub async fn forgot_password(email: &str) -> Result<(), CliError> {
    let ctx = Context::load().await?;
    let message = ctx.auth.forgot_password(&parse_email(email)?).await?;
    println!("{message}");
    println!("Check your inbox for the reset link, then run `byteme reset-password`.");
    Ok(())
}

pub async fn reset_password(token: &str, password: String) -> Result<(), CliError> {
    let ctx = Context::load().await?;
    let message = ctx
        .auth
        .reset_password(token, &SecretString::from(password))
        .await?;
    println!("{message}");
    println!("Log in with `byteme login` to start a session.");
    Ok(())
}

pub async fn logout() -> Result<(), CliError> {
    let ctx = Context::load().await?;
    ctx.auth.logout().await;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami() -> Result<(), CliError> {
    let ctx = Context::load().await?;

    match ctx.auth.current_session().await {
        Some(session) => {
            println!("Name:  {}", session.profile.name);
            println!("Email: {}", session.profile.email);
            println!("Role:  {}", session.role());
            println!("ID:    {}", session.admin_id());
            if session.role() == AdminRole::MultiVendorAdmin {
                println!("Vendor access grants: {}", session.vendor_grants.len());
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn oauth_callback(raw_url: &str) -> Result<(), CliError> {
    let ctx = Context::load().await?;

    let url = Url::parse(raw_url)
        .map_err(|e| CliError::InvalidArgument(format!("callback URL: {e}")))?;

    match ctx.auth.ingest_oauth_callback(&url).await {
        Some(clean) => {
            let session = ctx
                .auth
                .current_session()
                .await
                .ok_or(CliError::NotLoggedIn)?;
            println!(
                "Logged in as {} <{}> ({})",
                session.profile.name, session.profile.email, session.role()
            );
            println!("Continue at: {clean}");
        }
        None => println!("Not an OAuth callback URL; nothing ingested."),
    }
    Ok(())
}

/// Evaluate route access for a console path under the current session.
pub async fn open(path: &str) -> Result<(), CliError> {
    let ctx = Context::load().await?;

    let Some(route) = Route::parse(path) else {
        return Err(CliError::InvalidArgument(format!("unknown path: {path}")));
    };

    let state = ctx.auth.state().await;
    match guard::evaluate(&state, &route) {
        RouteDecision::Allow => println!("Allowed: {}", route.path()),
        RouteDecision::Pending => println!("Session still resolving; try again."),
        RouteDecision::Redirect { to, then } => {
            println!("Redirect: {} -> {}", route.path(), to.path());
            if let Some(then) = then {
                println!("After login, return to: {}", then.path());
            }
        }
    }
    Ok(())
}
