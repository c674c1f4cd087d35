//! Order management commands.

use clap::Subcommand;

use byteme_client::services::OrderService;
use byteme_client::services::Period;
use byteme_core::{OrderId, VendorId};

use super::{CliError, Context};

#[derive(Debug, Subcommand)]
pub enum OrderAction {
    /// List orders visible to the logged-in admin
    List {
        /// Scope to one vendor
        #[arg(short, long)]
        vendor: Option<String>,

        /// Reporting window (7d, 30d or 90d)
        #[arg(short = 'P', long)]
        period: Option<Period>,
    },
    /// Show one order, items included
    Show {
        /// Order ID
        id: String,
    },
    /// Update an order's kitchen status
    SetStatus {
        /// Order ID
        id: String,

        /// New status, e.g. `preparing`, `ready`, `completed`
        status: String,
    },
}

pub async fn run(action: OrderAction) -> Result<(), CliError> {
    let ctx = Context::load_authenticated().await?;
    let orders = OrderService::new(ctx.api.clone());

    match action {
        OrderAction::List { vendor, period } => {
            let vendor_id = vendor.as_deref().map(VendorId::from);
            let listing = orders.list(vendor_id.as_ref(), period).await?;
            println!("{} order(s)", listing.len());
            for order in listing {
                println!(
                    "  {}  {:<12}  total {:>10.2}  payment {}",
                    order.id,
                    order.status,
                    order.total_amount,
                    order.payment_status.as_deref().unwrap_or("-"),
                );
            }
        }
        OrderAction::Show { id } => {
            let order = orders.get(&OrderId::from(id.as_str())).await?;
            println!("ID:      {}", order.id);
            println!("Status:  {}", order.status);
            println!("Total:   {:.2}", order.total_amount);
            println!(
                "Payment: {}",
                order.payment_status.as_deref().unwrap_or("-")
            );
            if let Some(table) = &order.table_number {
                println!("Table:   {table}");
            }
            if let Some(phone) = &order.customer_phone {
                println!("Phone:   {phone}");
            }
            if let Some(created_at) = order.created_at {
                println!("Placed:  {created_at}");
            }
            if !order.items.is_empty() {
                println!("Items:");
                for item in &order.items {
                    println!("  {:>3} x {:<28} {:>8.2}", item.quantity, item.name, item.price);
                }
            }
        }
        OrderAction::SetStatus { id, status } => {
            let order = orders
                .update_status(&OrderId::from(id.as_str()), &status)
                .await?;
            println!("Order {} is now {}", order.id, order.status);
        }
    }
    Ok(())
}
