//! Dashboard statistics: stat cards and chart series.

use clap::Args;

use byteme_client::services::{AnalyticsService, Period};
use byteme_core::VendorId;

use super::CliError;
use super::Context;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Reporting window for the chart series (7d, 30d or 90d)
    #[arg(short = 'P', long, default_value = "7d")]
    pub period: Period,

    /// Scope the stat cards to one vendor
    #[arg(short, long)]
    pub vendor: Option<String>,

    /// Also print the revenue chart series
    #[arg(long)]
    pub revenue: bool,
}

fn format_growth(value: Option<f64>) -> String {
    value.map_or_else(String::new, |pct| format!(" ({pct:+.1}% MoM)"))
}

pub async fn show(args: DashboardArgs) -> Result<(), CliError> {
    let ctx = Context::load_authenticated().await?;
    let analytics = AnalyticsService::new(ctx.api.clone());

    if let Some(vendor) = &args.vendor {
        let vendor_id = VendorId::from(vendor.as_str());
        let stats = analytics.vendor_dashboard_stats(&vendor_id).await?;
        println!("Vendor: {} ({})", stats.vendor_name, stats.vendor_id);
        println!(
            "Orders:  {}{}",
            stats.total_orders,
            format_growth(stats.growth.orders)
        );
        println!(
            "Revenue: {:.2}{}",
            stats.total_revenue,
            format_growth(stats.growth.revenue)
        );
    } else {
        let stats = analytics.dashboard_stats().await?;
        println!(
            "Vendors:   {}{}",
            stats.total_vendors,
            format_growth(stats.growth.vendors)
        );
        println!(
            "Customers: {}{}",
            stats.total_customers,
            format_growth(stats.growth.customers)
        );
        println!(
            "Orders:    {}{}",
            stats.total_orders,
            format_growth(stats.growth.orders)
        );
        println!(
            "Revenue:   {:.2}{}",
            stats.total_revenue,
            format_growth(stats.growth.revenue)
        );
    }

    if args.revenue {
        let vendor_id = args.vendor.as_deref().map(VendorId::from);
        let series = analytics
            .revenue_stats(args.period, vendor_id.as_ref())
            .await?;
        println!();
        println!("Revenue over {}:", args.period);
        for point in series {
            println!(
                "  {:<12} revenue {:>10.2}  orders {:>5}",
                point.name, point.revenue, point.orders
            );
        }
    }

    Ok(())
}
