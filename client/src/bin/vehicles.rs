//! Operator CLI for the remote vehicle collection.
//!
//! Connection settings come from `VEHICLES_*` environment variables (or an
//! OrthoConfig file); `--base-url` overrides the configured base URL. Records
//! are printed to stdout as one JSON object per line, distances as bare
//! metres. Diagnostics go to stderr and are filtered with `RUST_LOG`.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use vehicle_client::config::VehicleClientSettings;
use vehicle_client::domain::ports::VehicleSource;
use vehicle_client::domain::{Vehicle, VehicleId, VehicleManager};
use vehicle_client::outbound::http::VehicleHttpSource;

#[derive(Debug, Parser)]
#[command(name = "vehicles", about = "Query and edit a remote vehicle collection")]
struct Cli {
    /// Override the configured base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every vehicle.
    List,
    /// Print vehicles whose field equals the value.
    Filter {
        /// Wire field name, for example `color`.
        field: String,
        /// Value to compare against; parsed as JSON when possible.
        value: String,
    },
    /// Print one vehicle.
    Get {
        /// Vehicle identifier.
        id: VehicleId,
    },
    /// Create a vehicle from a JSON object and print the stored record.
    Create {
        /// Vehicle object; any `id` is ignored.
        #[arg(long)]
        json: String,
    },
    /// Overwrite a vehicle from a JSON object carrying its `id`.
    Update {
        /// Vehicle object including `id`.
        #[arg(long)]
        json: String,
    },
    /// Delete a vehicle.
    Delete {
        /// Vehicle identifier.
        id: VehicleId,
    },
    /// Print the distance in metres between two vehicles.
    Distance {
        /// First vehicle identifier.
        first: VehicleId,
        /// Second vehicle identifier.
        second: VehicleId,
    },
    /// Print the vehicle closest to the given one.
    Nearest {
        /// Vehicle identifier.
        id: VehicleId,
        /// Print every other vehicle with its distance, closest first.
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }

    let cli = Cli::parse();
    let manager = build_manager(cli.base_url)?;
    run(&manager, cli.command, &mut io::stdout().lock())
}

fn build_manager(base_url: Option<String>) -> Result<VehicleManager<VehicleHttpSource>> {
    let mut settings = VehicleClientSettings::load_from_iter([OsString::from("vehicles")])
        .map_err(|error| eyre!("failed to load vehicle settings: {error}"))?;
    if base_url.is_some() {
        settings.base_url = base_url;
    }

    let config = settings
        .to_http_config()
        .wrap_err("invalid vehicle settings")?;
    let source = VehicleHttpSource::new(&config).wrap_err("failed to build vehicle client")?;
    debug!(collection = %source.collection_url(), "vehicle client ready");
    Ok(VehicleManager::new(Arc::new(source)))
}

fn run<S: VehicleSource>(
    manager: &VehicleManager<S>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List => print_vehicles(out, &manager.list_all()?),
        Command::Filter { field, value } => {
            let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            print_vehicles(out, &manager.filter([(field, value)])?)
        }
        Command::Get { id } => print_vehicle(out, &manager.get(id)?),
        Command::Create { json } => print_vehicle(out, &manager.create(&parse_vehicle(&json)?)?),
        Command::Update { json } => print_vehicle(out, &manager.update(&parse_vehicle(&json)?)?),
        Command::Delete { id } => {
            manager.delete(id)?;
            Ok(())
        }
        Command::Distance { first, second } => {
            writeln!(out, "{}", manager.get_distance(first, second)?)?;
            Ok(())
        }
        Command::Nearest { id, all: false } => match manager.get_nearest(id)? {
            Some(vehicle) => print_vehicle(out, &vehicle),
            None => Err(eyre!("vehicle {id} has no neighbours")),
        },
        Command::Nearest { id, all: true } => {
            for (vehicle, distance) in manager.distances_from(id)? {
                writeln!(out, "{}", json!({ "vehicle": vehicle, "distance_m": distance }))?;
            }
            Ok(())
        }
    }
}

fn parse_vehicle(raw: &str) -> Result<Vehicle> {
    serde_json::from_str(raw).wrap_err("--json must be a vehicle object")
}

fn print_vehicle(out: &mut impl Write, vehicle: &Vehicle) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(vehicle)?)?;
    Ok(())
}

fn print_vehicles(out: &mut impl Write, vehicles: &[Vehicle]) -> Result<()> {
    vehicles
        .iter()
        .try_for_each(|vehicle| print_vehicle(out, vehicle))
}
