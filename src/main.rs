//! VinDash CLI - Vehicle Inventory Dashboard
//!
//! One-shot commands for scripting plus the interactive dashboard.

use clap::Parser;
use console::style;
use futures::future::join_all;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tokio::runtime::Runtime;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vindash::api::{InventoryApi, InventoryClient, PaginatedVehicles, VehicleCreate};
use vindash::config::{CliArgs, ClientConfig, Commands, OutputFormat};
use vindash::dashboard::{DetailOutcome, Field, FormDraft, VehicleDetail, CREATED_MESSAGE};
use vindash::error::{DashboardError, Result};
use vindash::progress::RequestSpinner;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Handle result
    if let Err(e) = init_logging(&args).and_then(|_| run(args)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the tracing subscriber.
///
/// The dashboard owns the terminal, so it logs to `--log-file` or nowhere.
fn init_logging(args: &CliArgs) -> Result<()> {
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &args.log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if matches!(args.command, Commands::Tui) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
    }

    Ok(())
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = ClientConfig::from_cli(&args).map_err(DashboardError::ConfigError)?;
    debug!(?config, "configuration");

    let runtime = Runtime::new()?;

    match &args.command {
        Commands::Health => cmd_health(&runtime, &config, &args),
        Commands::List { page } => cmd_list(&runtime, &config, &args, *page),
        Commands::Show { vins } => cmd_show(&runtime, &config, &args, vins),
        Commands::Add {
            vin,
            make,
            model,
            description,
            image_urls,
        } => {
            let mut draft = FormDraft::new();
            draft.set(Field::Vin, vin.as_str());
            draft.set(Field::Make, make.as_str());
            draft.set(Field::Model, model.as_str());
            draft.set(Field::Description, description.as_str());
            draft.set(Field::ImageUrls, image_urls.as_str());
            cmd_add(&runtime, &config, &args, draft)
        }
        Commands::Tui => cmd_tui(&runtime, &config),
    }
}

/// Spinner, hidden for quiet runs and JSON output
fn spinner(args: &CliArgs, message: &str) -> RequestSpinner {
    RequestSpinner::for_mode(message, args.quiet || args.output_format == OutputFormat::Json)
}

/// Finish the spinner for a completed request; `success` replaces it with a mark
fn settle<T>(spinner: &RequestSpinner, result: Result<T>, success: Option<&str>) -> Result<T> {
    debug!(elapsed = ?spinner.elapsed(), ok = result.is_ok(), "request settled");
    match (&result, success) {
        (Ok(_), Some(message)) => spinner.finish_success(message),
        (Ok(_), None) => spinner.clear(),
        (Err(_), _) => spinner.finish_error("Request failed"),
    }
    result
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_health(runtime: &Runtime, config: &ClientConfig, args: &CliArgs) -> Result<()> {
    let client = InventoryClient::new(config)?;
    let spinner = spinner(args, "Checking service health...");
    let health = settle(&spinner, runtime.block_on(client.health()), None)?;

    match args.output_format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Text => {
            println!("{} {}", style("Service status:").bold(), health.status);
            if !args.quiet {
                println!("{} {}", style("Backend:").dim(), client.base_url());
            }
        }
    }

    Ok(())
}

fn cmd_list(runtime: &Runtime, config: &ClientConfig, args: &CliArgs, page: usize) -> Result<()> {
    if page == 0 {
        return Err(DashboardError::config("Page numbers start at 1"));
    }

    let client = InventoryClient::new(config)?;
    let spinner = spinner(args, "Loading vehicles...");
    let request = client.list_vehicles(page, config.page_size);
    let listing = settle(&spinner, runtime.block_on(request), None)?;

    match args.output_format {
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Text => print_listing(&listing, args.quiet),
    }

    Ok(())
}

fn print_listing(listing: &PaginatedVehicles, quiet: bool) {
    if listing.items.is_empty() {
        println!("No vehicles yet");
    } else {
        println!(
            "{}",
            style(format!("{:<17}  {:<16}  {:<16}  {}", "VIN", "MAKE", "MODEL", "ADDED")).bold()
        );
        for item in &listing.items {
            let added = item
                .created_at()
                .map(|ts| ts.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{:<17}  {:<16}  {:<16}  {}", item.vin, item.make, item.model, added);
        }
    }

    if !quiet {
        println!(
            "\n{}",
            style(format!(
                "Showing {}–{} of {} vehicles · Page {} of {}",
                listing.range_start(),
                listing.range_end(),
                listing.total,
                listing.page,
                listing.page_count()
            ))
            .dim()
        );
    }
}

fn cmd_show(
    runtime: &Runtime,
    config: &ClientConfig,
    args: &CliArgs,
    vins: &[String],
) -> Result<()> {
    let client = InventoryClient::new(config)?;
    let spinner = spinner(args, "Fetching vehicle details...");
    let results = runtime.block_on(join_all(vins.iter().map(|vin| client.get_vehicle(vin))));
    debug!(elapsed = ?spinner.elapsed(), count = vins.len(), "lookups settled");
    spinner.clear();

    let mut found = Vec::new();
    let mut missing = Vec::new();
    for (vin, result) in vins.iter().zip(results) {
        match DetailOutcome::from_result(vin, result) {
            DetailOutcome::Found(detail) => found.push(*detail),
            DetailOutcome::NotFound => missing.push(vin.clone()),
        }
    }

    match args.output_format {
        OutputFormat::Json => {
            let vehicles: Vec<_> = found.iter().map(|d| &d.vehicle).collect();
            match vehicles.as_slice() {
                [single] if vins.len() == 1 => print_json(single)?,
                _ => print_json(&vehicles)?,
            }
        }
        OutputFormat::Text => {
            for (i, detail) in found.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_vehicle(detail);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::NotFound(missing.join(", ")))
    }
}

fn print_vehicle(detail: &VehicleDetail) {
    let vehicle = &detail.vehicle;
    println!("{}", style(detail.title()).cyan().bold());
    println!("  VIN:         {}", vehicle.vin);
    println!("  Make:        {}", vehicle.make);
    println!("  Model:       {}", vehicle.model);
    println!("  Added On:    {}", detail.added_on);
    println!("  Description: {}", vehicle.description);
    println!("  Gallery ({} photos):", detail.gallery.len());
    for url in &detail.gallery {
        println!("    - {}", url);
    }
}

fn cmd_add(
    runtime: &Runtime,
    config: &ClientConfig,
    args: &CliArgs,
    mut draft: FormDraft,
) -> Result<()> {
    draft.touch_all();
    let errors = draft.validate();
    if !errors.is_empty() {
        return Err(DashboardError::Validation(errors.messages()));
    }

    let payload: VehicleCreate = draft.to_payload();
    let client = InventoryClient::new(config)?;
    let spinner = spinner(args, "Adding vehicle...");
    let created = settle(
        &spinner,
        runtime.block_on(client.create_vehicle(&payload)),
        Some(CREATED_MESSAGE),
    )?;

    match args.output_format {
        OutputFormat::Json => match &created {
            Some(vehicle) => print_json(vehicle)?,
            None => print_json(&payload)?,
        },
        OutputFormat::Text => {
            if let Some(vehicle) = created {
                if !args.quiet {
                    print_vehicle(&VehicleDetail::new(vehicle));
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn cmd_tui(runtime: &Runtime, config: &ClientConfig) -> Result<()> {
    vindash::ui::run(config, runtime)
}

#[cfg(not(feature = "tui"))]
fn cmd_tui(_runtime: &Runtime, _config: &ClientConfig) -> Result<()> {
    Err(DashboardError::config(
        "the interactive dashboard is not part of this build (enable the `tui` feature)",
    ))
}
