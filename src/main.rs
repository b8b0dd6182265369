//! Shipment Delay Dashboard, terminal edition
//! Run: ./target/release/delivery_dashboard --data data/shipments.csv [--start YYYY-MM-DD] [--end YYYY-MM-DD]

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use shipment_delay_dashboard::{
    api::DashboardService,
    calendar_names::day_name_short,
    charts::{ChartSet, DelayHistogram},
    config::SourceArgs,
    pipeline::DashboardView,
    report::{format_days, format_pct, DashboardReport},
    summary::GroupStats,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "delivery_dashboard")]
#[command(about = "Print the shipment delay dashboard to the terminal")]
struct Args {
    /// First purchase date to include
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last purchase date to include
    #[arg(long)]
    end: Option<NaiveDate>,

    #[command(flatten)]
    source: SourceArgs,
}

fn rate_cell(rate: Option<f64>) -> String {
    format_pct(rate.map(|r| r * 100.0))
}

fn print_group_table(title: &str, groups: &[GroupStats]) {
    println!("\n{}", title);
    println!("{}", "-".repeat(70));
    println!(
        "  {:14} {:>10} {:>14} {:>10}   {}",
        "Group", "Shipments", "Mean Delay", "On-Time%", "Visual"
    );
    println!("  {}", "-".repeat(66));

    for group in groups {
        let bar_len = group.on_time_rate.map(|r| (r * 20.0) as usize).unwrap_or(0);
        println!(
            "  {:14} {:>10} {:>14} {:>10}   {}",
            group.key,
            group.count,
            format_days(group.mean_delay_days),
            rate_cell(group.on_time_rate),
            "#".repeat(bar_len)
        );
    }
}

fn print_histogram(histogram: &DelayHistogram) {
    println!("\nDELIVERY DELAY DISTRIBUTION (days)");
    println!("{}", "-".repeat(70));
    let peak = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in histogram.bins.iter().filter(|b| b.count > 0) {
        let bar_len = bin.count * 40 / peak;
        println!(
            "  [{:>7.1}, {:>7.1})  {:>7}  {}",
            bin.lower,
            bin.upper,
            bin.count,
            "|".repeat(bar_len.max(1))
        );
    }
}

fn print_weekday_boxes(charts: &ChartSet) {
    println!("\nDELAY SPREAD BY DELIVERY WEEKDAY");
    println!("{}", "-".repeat(70));
    println!(
        "  {:5} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>9}",
        "Day", "Min", "Q1", "Median", "Q3", "Max", "Count", "Outliers"
    );
    for b in &charts.weekday_box_plot {
        println!(
            "  {:5} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8} {:>9}",
            day_name_short(b.day),
            b.min,
            b.q1,
            b.median,
            b.q3,
            b.max,
            b.count,
            b.outliers.len()
        );
    }
}

fn print_report(report: &DashboardReport) {
    println!("\n{}", "=".repeat(75));
    println!("                {}", report.title.to_uppercase());
    println!("  {}", report.header);
    println!("{}\n", "=".repeat(75));

    for notice in &report.notices {
        println!("  ! {}", notice);
    }

    print_histogram(&report.charts.delay_histogram);
    print_weekday_boxes(&report.charts);
    print_group_table("DELAY BY DELIVERY WEEKDAY", &report.breakdown.by_weekday);
    print_group_table("DELAY BY DELIVERY MONTH", &report.breakdown.by_month);
    if let Some(statuses) = &report.breakdown.by_status {
        print_group_table("ON-TIME RATE BY ORDER STATUS", statuses);
    }

    println!("\n{}", "-".repeat(75));
    println!("{}", report.markdown);
    println!("{}", "=".repeat(75));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let source = args.source.source();
    info!("Loading shipments from {}", source);

    let service = DashboardService::new(source, args.source.loader());
    match service.dashboard(args.start, args.end).await {
        DashboardView::Unavailable { message } => {
            eprintln!("Data unavailable: {}", message);
        }
        DashboardView::NoData { warning, window } => {
            match window {
                Some(w) => println!("Warning: {} ({} to {})", warning, w.start, w.end),
                None => println!("Warning: {}", warning),
            }
        }
        DashboardView::Ready(report) => print_report(&report),
    }

    Ok(())
}
