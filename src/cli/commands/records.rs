//! Geolocation record commands.

use std::sync::Arc;

use clap::Args;
use sqlx::SqlitePool;
use tokio::runtime::Runtime;

use super::{Context, print_notices};
use crate::cli::prompt::{AutoConfirm, StdinPrompt};
use crate::db;
use crate::error::ResultExt;
use crate::model::GeolocationRecord;
use crate::workflow::{ConfirmPrompt, WorkflowController};

/// Field overrides for `update`
#[derive(Args, Debug, Default)]
pub struct RecordEdits {
    /// New IP address
    #[arg(long)]
    pub ip: Option<String>,
    /// New country name
    #[arg(long)]
    pub country: Option<String>,
    /// New region name
    #[arg(long)]
    pub region: Option<String>,
    /// New city name
    #[arg(long)]
    pub city: Option<String>,
    /// New latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    /// New longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,
}

impl RecordEdits {
    pub fn is_empty(&self) -> bool {
        self.ip.is_none()
            && self.country.is_none()
            && self.region.is_none()
            && self.city.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    fn apply(&self, record: &mut GeolocationRecord) {
        if let Some(ip) = &self.ip {
            record.ip.clone_from(ip);
        }
        if let Some(country) = &self.country {
            record.country.clone_from(country);
        }
        if let Some(region) = &self.region {
            record.region.clone_from(region);
        }
        if let Some(city) = &self.city {
            record.city.clone_from(city);
        }
        if let Some(latitude) = self.latitude {
            record.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            record.longitude = longitude;
        }
    }
}

/// List stored geolocations
pub fn cmd_list(rt: &Runtime, ctx: &Context) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = open_pool(ctx).await?;
        let controller = controller(ctx, pool, Arc::new(StdinPrompt));

        let count = controller
            .refresh()
            .await
            .with_context("loading geolocations")?;
        if count == 0 {
            println!("No geolocations stored yet. Add one with `track-my-ip add <ip or url>`.");
            return Ok(());
        }

        print_header();
        for record in controller.records() {
            print_row(&record);
        }
        println!();
        println!("{} geolocation(s)", count);
        Ok(())
    })
}

/// Look up an address without saving it
pub fn cmd_search(rt: &Runtime, ctx: &Context, query: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        // Nothing is stored, so a missing database file stays missing
        let pool = db::open_lazy(ctx.db_path.as_deref())?;
        let controller = controller(ctx, pool, Arc::new(StdinPrompt));
        let mut events = controller.subscribe();

        let result = controller.search(query).await;
        print_notices(&mut events);
        let record = result?;

        print_details(&record);
        Ok(())
    })
}

/// Look up an address and store the result
pub fn cmd_add(rt: &Runtime, ctx: &Context, query: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = open_pool(ctx).await?;
        let controller = controller(ctx, pool, Arc::new(StdinPrompt));
        controller.refresh().await?;
        let mut events = controller.subscribe();

        let result = controller.search_and_add(query).await;
        print_notices(&mut events);
        let record = result?;

        println!("✓ Added geolocation #{}", record.id);
        print_details(&record);
        Ok(())
    })
}

/// Print stored geolocations by ID, or every one stored for an IP
pub fn cmd_show(rt: &Runtime, ctx: &Context, target: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = open_pool(ctx).await?;

        let records = match target.trim().parse::<i64>() {
            Ok(id) => db::get_geolocation_by_id(&pool, id)
                .await?
                .into_iter()
                .collect::<Vec<_>>(),
            Err(_) => db::find_by_ip(&pool, target.trim()).await?,
        };
        if records.is_empty() {
            anyhow::bail!("No geolocation found for {}", target);
        }

        for record in records {
            println!("Geolocation #{}", record.id);
            print_details(&record);
        }
        Ok(())
    })
}

/// Edit fields of a stored geolocation
pub fn cmd_update(
    rt: &Runtime,
    ctx: &Context,
    id: i64,
    edits: &RecordEdits,
) -> anyhow::Result<()> {
    if edits.is_empty() {
        anyhow::bail!(
            "Nothing to update, pass at least one of --ip, --country, --region, --city, --latitude, --longitude"
        );
    }

    rt.block_on(async {
        let pool = open_pool(ctx).await?;
        let controller = controller(ctx, pool, Arc::new(StdinPrompt));
        controller.refresh().await?;

        select_existing(&controller, id)?;
        controller.edit_selected(|record| edits.apply(record))?;
        let record = controller
            .update_selected()
            .await
            .with_context(format!("updating geolocation #{}", id))?;

        println!("✓ Updated geolocation #{}", record.id);
        print_details(&record);
        Ok(())
    })
}

/// Delete a stored geolocation after confirmation
pub fn cmd_delete(rt: &Runtime, ctx: &Context, id: i64, yes: bool) -> anyhow::Result<()> {
    let prompt: Arc<dyn ConfirmPrompt> = if yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(StdinPrompt)
    };

    rt.block_on(async {
        let pool = open_pool(ctx).await?;
        let controller = controller(ctx, pool, prompt);
        controller.refresh().await?;

        let record = select_existing(&controller, id)?;
        let deleted = controller
            .delete_selected()
            .await
            .with_context(format!("deleting geolocation #{}", id))?;
        if deleted {
            println!("✓ Deleted geolocation #{}: {} {}", record.id, record.ip, record);
        } else {
            println!("Cancelled.");
        }
        Ok(())
    })
}

// ============================================================================
// Helpers
// ============================================================================

async fn open_pool(ctx: &Context) -> anyhow::Result<SqlitePool> {
    Ok(db::open(ctx.db_path.as_deref()).await?)
}

fn controller(
    ctx: &Context,
    pool: SqlitePool,
    prompt: Arc<dyn ConfirmPrompt>,
) -> WorkflowController {
    WorkflowController::new(ctx.client.clone(), Arc::new(pool), prompt)
}

fn select_existing(
    controller: &WorkflowController,
    id: i64,
) -> anyhow::Result<GeolocationRecord> {
    controller
        .select(Some(id))
        .ok_or_else(|| anyhow::anyhow!("No geolocation with ID {}", id))
}

fn print_header() {
    println!(
        "{:>5}  {:<18} {:<20} {:<20} {:<20} {:>10} {:>11}",
        "ID", "IP", "Country", "Region", "City", "Latitude", "Longitude"
    );
}

fn print_row(record: &GeolocationRecord) {
    println!(
        "{:>5}  {:<18} {:<20} {:<20} {:<20} {:>10.4} {:>11.4}",
        record.id,
        record.ip,
        record.country,
        record.region,
        record.city,
        record.latitude,
        record.longitude
    );
}

fn print_details(record: &GeolocationRecord) {
    println!("  IP:        {}", record.ip);
    println!("  Country:   {}", record.country);
    println!("  Region:    {}", record.region);
    println!("  City:      {}", record.city);
    println!("  Latitude:  {}", record.latitude);
    println!("  Longitude: {}", record.longitude);
}
