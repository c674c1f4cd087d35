//! Vendor management commands.

use clap::Subcommand;

use byteme_client::services::VendorService;
use byteme_client::services::vendors::VendorUpdate;
use byteme_core::VendorId;

use super::{CliError, Context};

#[derive(Debug, Subcommand)]
pub enum VendorAction {
    /// List the vendors visible to the logged-in admin
    List,
    /// Show one vendor
    Show {
        /// Vendor ID
        id: String,
    },
    /// Update a vendor's editable fields
    Update {
        /// Vendor ID
        id: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,

        /// New cuisine label
        #[arg(long)]
        cuisine: Option<String>,

        /// New location
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a vendor
    Delete {
        /// Vendor ID
        id: String,
    },
}

pub async fn run(action: VendorAction) -> Result<(), CliError> {
    let ctx = Context::load_authenticated().await?;
    let vendors = VendorService::new(ctx.api.clone());

    match action {
        VendorAction::List => {
            let listing = vendors.list().await?;
            println!("{} vendor(s)", listing.len());
            for vendor in listing {
                println!(
                    "  {}  {:<24}  {:<12}  rating {}",
                    vendor.id,
                    vendor.name,
                    vendor.cuisine.as_deref().unwrap_or("-"),
                    vendor
                        .rating
                        .map_or_else(|| "-".to_owned(), |r| format!("{r:.1}")),
                );
            }
        }
        VendorAction::Show { id } => {
            let vendor = vendors.get(&VendorId::from(id.as_str())).await?;
            println!("ID:       {}", vendor.id);
            println!("Name:     {}", vendor.name);
            println!("Email:    {}", vendor.email);
            println!("Phone:    {}", vendor.phone.as_deref().unwrap_or("-"));
            println!("Cuisine:  {}", vendor.cuisine.as_deref().unwrap_or("-"));
            println!("Location: {}", vendor.location.as_deref().unwrap_or("-"));
            if let Some(rating) = vendor.rating {
                println!("Rating:   {rating:.1} ({} reviews)", vendor.total_reviews);
            }
        }
        VendorAction::Update {
            id,
            name,
            phone,
            cuisine,
            location,
        } => {
            let update = VendorUpdate {
                name,
                phone,
                cuisine,
                location,
            };
            let vendor = vendors.update(&VendorId::from(id.as_str()), &update).await?;
            println!("Updated vendor {} ({})", vendor.name, vendor.id);
        }
        VendorAction::Delete { id } => {
            vendors.delete(&VendorId::from(id.as_str())).await?;
            println!("Deleted vendor {id}");
        }
    }
    Ok(())
}
