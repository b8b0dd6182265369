//! Synthetic shipment dataset generator
//!
//! Writes a CSV in the dashboard's input format with random purchase dates,
//! delivery estimates and actual deliveries, plus a sprinkling of blank or
//! garbled timestamps so the "missing value" paths get exercised.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --rows <N>           Number of shipments (default: 5000)
//!   --start-date <DATE>  First purchase date (default: 2022-01-01)
//!   --days <N>           Purchase dates spread over this many days (default: 365)
//!   --late-rate <F>      Probability a delivery misses its estimate (default: 0.08)
//!   --missing-rate <F>   Probability a timestamp cell is blank or garbled (default: 0.02)
//!   --no-status          Leave out the order_status_item column
//!   --seed <N>           Random seed for reproducibility (optional)
//!   --output <PATH>      Output CSV path (default: data/shipments.csv)

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use csv::WriterBuilder;
use rand::prelude::*;
use rand::rngs::StdRng;
use shipment_delay_dashboard::models::{
    DELIVERED_COLUMN, ESTIMATED_COLUMN, PURCHASE_COLUMN, STATUS_COLUMN,
};
use std::error::Error;
use std::path::PathBuf;

/// Synthetic data generator for the shipment dataset
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic shipment CSV")]
struct Args {
    /// Number of shipments to generate
    #[arg(long, default_value = "5000")]
    rows: usize,

    /// First purchase date
    #[arg(long, default_value = "2022-01-01")]
    start_date: NaiveDate,

    /// Spread purchase dates over this many days
    #[arg(long, default_value = "365")]
    days: i64,

    /// Probability that a delivery arrives after its estimate (0.0 - 1.0)
    #[arg(long, default_value = "0.08")]
    late_rate: f64,

    /// Probability that a timestamp cell is blank or garbled (0.0 - 1.0)
    #[arg(long, default_value = "0.02")]
    missing_rate: f64,

    /// Omit the order status column
    #[arg(long)]
    no_status: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/shipments.csv")]
    output: PathBuf,
}

const STATES: [&str; 8] = ["SP", "RJ", "MG", "RS", "PR", "SC", "BA", "DF"];

/// Format datetime for CSV output
fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Generate a unique order ID
fn generate_order_id(rng: &mut impl Rng) -> String {
    format!("{:032x}", rng.gen::<u128>())
}

/// Random time of day on the given date
fn random_moment(date: NaiveDate, rng: &mut impl Rng) -> NaiveDateTime {
    let seconds = rng.gen_range(0..86_400);
    date.and_hms_opt(0, 0, 0).unwrap_or_default() + Duration::seconds(seconds)
}

/// Blank or garble a cell with the given probability
fn maybe_corrupt(value: String, rate: f64, rng: &mut impl Rng) -> String {
    if rng.gen::<f64>() >= rate {
        return value;
    }
    if rng.gen_bool(0.5) {
        String::new()
    } else {
        "not-a-date".to_string()
    }
}

fn pick_status(rng: &mut impl Rng) -> &'static str {
    match rng.gen_range(0..100) {
        0..=89 => "delivered",
        90..=94 => "shipped",
        95..=96 => "canceled",
        97..=98 => "invoiced",
        _ => "processing",
    }
}

struct SyntheticRow {
    order_id: String,
    customer_state: &'static str,
    status: &'static str,
    purchase: String,
    estimated: String,
    delivered: String,
}

fn generate_row(args: &Args, rng: &mut impl Rng) -> SyntheticRow {
    let purchase_date = args.start_date + Duration::days(rng.gen_range(0..args.days.max(1)));
    let purchased = random_moment(purchase_date, rng);

    // Estimates are promised at midnight, 10-40 days out
    let estimated_date = purchase_date + Duration::days(rng.gen_range(10..=40));
    let estimated = estimated_date.and_hms_opt(0, 0, 0).unwrap_or_default();

    let offset_days = if rng.gen::<f64>() < args.late_rate {
        rng.gen_range(1..=20)
    } else {
        -rng.gen_range(0..=25)
    };
    let status = pick_status(rng);
    let delivered = match status {
        "delivered" => {
            let day = (estimated_date + Duration::days(offset_days)).max(purchase_date);
            format_datetime(&random_moment(day, rng))
        }
        _ => String::new(),
    };

    SyntheticRow {
        order_id: generate_order_id(rng),
        customer_state: STATES[rng.gen_range(0..STATES.len())],
        status,
        purchase: maybe_corrupt(format_datetime(&purchased), args.missing_rate, rng),
        estimated: maybe_corrupt(format_datetime(&estimated), args.missing_rate, rng),
        delivered: maybe_corrupt(delivered, args.missing_rate, rng),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Synthetic Shipment Generator");
    println!("{}", "-".repeat(60));
    println!("Output:        {}", args.output.display());
    println!("Rows:          {}", args.rows);
    println!("Purchases:     {} + {} days", args.start_date, args.days);
    println!("Late rate:     {:.1}%", args.late_rate * 100.0);
    println!("Missing rate:  {:.1}%", args.missing_rate * 100.0);
    println!("Status column: {}", !args.no_status);
    if let Some(seed) = args.seed {
        println!("Random seed:   {}", seed);
    }
    println!();

    // Initialize RNG
    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    // Ensure output directory exists
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_path(&args.output)?;

    let mut header = vec![
        "order_id",
        "customer_state",
        PURCHASE_COLUMN,
        ESTIMATED_COLUMN,
        DELIVERED_COLUMN,
    ];
    if !args.no_status {
        header.push(STATUS_COLUMN);
    }
    writer.write_record(&header)?;

    for i in 0..args.rows {
        let row = generate_row(&args, &mut rng);
        let mut record = vec![
            row.order_id,
            row.customer_state.to_string(),
            row.purchase,
            row.estimated,
            row.delivered,
        ];
        if !args.no_status {
            record.push(row.status.to_string());
        }
        writer.write_record(&record)?;

        if (i + 1) % 10000 == 0 {
            println!("   Generated {}/{} rows...", i + 1, args.rows);
        }
    }

    writer.flush()?;

    println!("Done: {} rows written to {}", args.rows, args.output.display());
    Ok(())
}
