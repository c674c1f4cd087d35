//! Vendor access grant commands for multi-vendor admins.

use clap::Subcommand;

use byteme_core::GrantId;

use super::{CliError, Context};

#[derive(Debug, Subcommand)]
pub enum GrantAction {
    /// List the grants extended to the logged-in admin
    List,
    /// Accept a pending grant
    Accept {
        /// Grant ID
        id: String,
    },
    /// Verify a vendor-issued registration access token
    Verify {
        /// The access token from the vendor's invite
        token: String,
    },
}

pub async fn run(action: GrantAction) -> Result<(), CliError> {
    match action {
        GrantAction::List => {
            let ctx = Context::load_authenticated().await?;
            let session = ctx.auth.load_vendor_grants().await?;
            println!("{} grant(s)", session.vendor_grants.len());
            for grant in session.vendor_grants {
                println!(
                    "  {}  {:<24}  {:<10}  {:?}",
                    grant.id, grant.vendor_name, grant.access_type, grant.status,
                );
            }
        }
        GrantAction::Accept { id } => {
            let ctx = Context::load_authenticated().await?;
            let session = ctx
                .auth
                .accept_vendor_grant(&GrantId::from(id.as_str()))
                .await?;
            println!("Accepted grant {id}");
            println!("Active grants: {}", session.vendor_grants.len());
        }
        GrantAction::Verify { token } => {
            // Token verification happens pre-registration, so no session is
            // required here.
            let ctx = Context::load().await?;
            let access = byteme_client::services::VendorAccessService::new(ctx.api.clone())
                .verify(&token)
                .await?;
            println!(
                "Token grants {} access to {} ({})",
                access.access_type, access.vendor_name, access.vendor_id,
            );
        }
    }
    Ok(())
}
