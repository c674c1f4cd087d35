//! Customer management commands.

use clap::Subcommand;

use byteme_client::services::CustomerService;
use byteme_client::services::Period;
use byteme_client::services::customers::CustomerUpdate;
use byteme_core::{CustomerId, VendorId};

use super::{CliError, Context};

#[derive(Debug, Subcommand)]
pub enum CustomerAction {
    /// List customers
    List {
        /// Scope to customers of one vendor
        #[arg(short, long)]
        vendor: Option<String>,

        /// Reporting window (7d, 30d or 90d)
        #[arg(short = 'P', long)]
        period: Option<Period>,
    },
    /// Show one customer
    Show {
        /// Customer ID
        id: String,
    },
    /// Update a customer's editable fields
    Update {
        /// Customer ID
        id: String,

        /// New first name
        #[arg(long)]
        first_name: Option<String>,

        /// New last name
        #[arg(long)]
        last_name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,

        /// Activate or deactivate the account
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a customer
    Delete {
        /// Customer ID
        id: String,
    },
}

pub async fn run(action: CustomerAction) -> Result<(), CliError> {
    let ctx = Context::load_authenticated().await?;
    let customers = CustomerService::new(ctx.api.clone());

    match action {
        CustomerAction::List { vendor, period } => {
            let listing = if vendor.is_none() && period.is_none() {
                customers.list().await?
            } else {
                let vendor_id = vendor.as_deref().map(VendorId::from);
                customers.list_filtered(vendor_id.as_ref(), period).await?
            };
            println!("{} customer(s)", listing.len());
            for customer in listing {
                println!(
                    "  {}  {:<24}  {:<28}  {}",
                    customer.id,
                    format!("{} {}", customer.first_name, customer.last_name),
                    customer.email,
                    if customer.is_active { "active" } else { "inactive" },
                );
            }
        }
        CustomerAction::Show { id } => {
            let customer = customers.get(&CustomerId::from(id.as_str())).await?;
            println!("ID:       {}", customer.id);
            println!("Name:     {} {}", customer.first_name, customer.last_name);
            println!("Email:    {}", customer.email);
            println!("Phone:    {}", customer.phone.as_deref().unwrap_or("-"));
            println!("Address:  {}", customer.address.as_deref().unwrap_or("-"));
            println!(
                "Status:   {}{}",
                if customer.is_active { "active" } else { "inactive" },
                if customer.is_email_verified {
                    ", email verified"
                } else {
                    ""
                },
            );
            if let Some(created_at) = customer.created_at {
                println!("Joined:   {created_at}");
            }
            if let Some(last_login) = customer.last_login {
                println!("Last login: {last_login}");
            }
        }
        CustomerAction::Update {
            id,
            first_name,
            last_name,
            phone,
            active,
        } => {
            let update = CustomerUpdate {
                first_name,
                last_name,
                phone,
                is_active: active,
            };
            let customer = customers
                .update(&CustomerId::from(id.as_str()), &update)
                .await?;
            println!(
                "Updated customer {} {} ({})",
                customer.first_name, customer.last_name, customer.id
            );
        }
        CustomerAction::Delete { id } => {
            customers.delete(&CustomerId::from(id.as_str())).await?;
            println!("Deleted customer {id}");
        }
    }
    Ok(())
}
