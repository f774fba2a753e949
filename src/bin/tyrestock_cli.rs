use std::{path::PathBuf, process::ExitCode, str::FromStr};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use tyrestock::{
    config::{self, AppConfig},
    models::{
        date_format::{bill_timestamp, day},
        BillingRecord, ComplaintRecord, StockItem,
    },
    services::{billing::BillRequest, complaints::ComplaintRequest, pricing::DemandMatch},
    CsvStore, ServiceError, ShopService,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // User errors get a plain message; anything else shows its cause chain.
            match err.downcast_ref::<ServiceError>() {
                Some(service_err) if service_err.is_user_error() => {
                    eprintln!("error: {}", service_err)
                }
                _ => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }
    debug!(data_dir = %cfg.data_dir.display(), "Using data directory");

    let context = CliContext::new(cfg);
    match cli.command {
        Commands::Init => handle_init(&context, cli.json),
        Commands::Stock(command) => handle_stock_command(&context, command, cli.json),
        Commands::Bill(command) => handle_bill_command(&context, command, cli.json),
        Commands::Demand(command) => handle_demand_command(&context, command, cli.json),
        Commands::Complaint(command) => handle_complaint_command(&context, command, cli.json),
    }
}

#[derive(Parser)]
#[command(name = "tyrestock", about = "Tyre shop stock, billing and complaints", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, help = "Directory holding the CSV tables (overrides config)")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and empty tables
    Init,
    #[command(subcommand)]
    Stock(StockCommands),
    #[command(subcommand)]
    Bill(BillCommands),
    #[command(subcommand)]
    Demand(DemandCommands),
    #[command(subcommand)]
    Complaint(ComplaintCommands),
}

#[derive(Subcommand)]
enum StockCommands {
    List,
    /// Add a tyre, or overwrite the row with the same name
    Set(SetStockArgs),
}

#[derive(Subcommand)]
enum BillCommands {
    Create(CreateBillArgs),
    List,
}

#[derive(Subcommand)]
enum DemandCommands {
    /// Find tyres by name or size with suggested prices
    Search(SearchArgs),
    Price(PriceArgs),
}

#[derive(Subcommand)]
enum ComplaintCommands {
    Add(AddComplaintArgs),
    List(ListComplaintsArgs),
}

#[derive(Args)]
struct SetStockArgs {
    #[arg(long, help = "Tyre name (unique key)")]
    name: String,
    #[arg(long)]
    size: String,
    #[arg(long)]
    brand: String,
    #[arg(long, value_parser = parse_decimal, help = "Purchase price per tyre")]
    price: Decimal,
    #[arg(long)]
    quantity: u32,
}

#[derive(Args)]
struct CreateBillArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_parser = parse_positive_u32)]
    quantity: u32,
    #[arg(long, value_parser = parse_decimal, help = "Sell price per tyre")]
    price: Decimal,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(help = "Part of a tyre name or size")]
    query: String,
}

#[derive(Args)]
struct PriceArgs {
    name: String,
}

#[derive(Args)]
struct AddComplaintArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    issue: String,
    #[arg(long, value_parser = parse_positive_u32, help = "Number of tyres affected")]
    quantity: u32,
}

#[derive(Args)]
struct ListComplaintsArgs {
    #[arg(long, action = ArgAction::SetTrue, help = "Only show complaints still pending")]
    pending: bool,
}

#[derive(Serialize)]
struct InitOutput {
    data_dir: String,
    created: Vec<String>,
}

#[derive(Serialize)]
struct PriceOutput<'a> {
    tyre_name: &'a str,
    min_price: Decimal,
    mode_price: Decimal,
}

struct CliContext {
    config: AppConfig,
    shop: ShopService<CsvStore>,
}

impl CliContext {
    fn new(config: AppConfig) -> Self {
        let shop = ShopService::new(CsvStore::new(config.data_dir()));
        Self { config, shop }
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }
}

fn handle_init(context: &CliContext, json: bool) -> Result<()> {
    let store = context.shop.store();
    let created = store
        .init()
        .with_context(|| format!("failed to initialise {}", store.root().display()))?;
    if json {
        return print_json(&InitOutput {
            data_dir: store.root().display().to_string(),
            created: created.iter().map(|d| d.to_string()).collect(),
        });
    }
    if created.is_empty() {
        println!("All tables already exist in {}", store.root().display());
    } else {
        for dataset in created {
            println!("Created {}", store.path_for(dataset).display());
        }
    }
    Ok(())
}

fn handle_stock_command(context: &CliContext, command: StockCommands, json: bool) -> Result<()> {
    match command {
        StockCommands::List => {
            let stock = context.shop.stock()?;
            if json {
                return print_json(&stock.rows());
            }
            if stock.is_empty() {
                println!("No stock recorded");
            }
            for item in stock.iter() {
                render_stock_item(item, context.currency());
            }
            Ok(())
        }
        StockCommands::Set(args) => {
            let item = StockItem::new(args.name, args.size, args.brand, args.price, args.quantity);
            let outcome = context.shop.upsert_stock(item.clone())?;
            if json {
                return print_json(&item);
            }
            println!("Stock {} successfully", outcome);
            render_stock_item(&item, context.currency());
            Ok(())
        }
    }
}

fn handle_bill_command(context: &CliContext, command: BillCommands, json: bool) -> Result<()> {
    match command {
        BillCommands::Create(args) => {
            let record = context
                .shop
                .create_bill(BillRequest::new(args.name, args.quantity, args.price))?;
            if json {
                return print_json(&record);
            }
            println!("Bill #{} created!", record.bill_number);
            render_bill(&record, context.currency());
            Ok(())
        }
        BillCommands::List => {
            let billing = context.shop.bills()?;
            if json {
                return print_json(&billing.rows());
            }
            if billing.is_empty() {
                println!("No bills recorded");
            }
            for record in billing.iter() {
                render_bill(record, context.currency());
            }
            Ok(())
        }
    }
}

fn handle_demand_command(context: &CliContext, command: DemandCommands, json: bool) -> Result<()> {
    match command {
        DemandCommands::Search(args) => {
            let hits = context.shop.search_demand(&args.query)?;
            if json {
                return print_json(&hits);
            }
            if hits.is_empty() {
                println!("No tyres found!");
            }
            for hit in &hits {
                render_demand_match(hit, context.currency());
            }
            Ok(())
        }
        DemandCommands::Price(args) => {
            let suggestion = context.shop.suggest_price(args.name.trim())?;
            if json {
                return print_json(&PriceOutput {
                    tyre_name: args.name.trim(),
                    min_price: suggestion.min_price,
                    mode_price: suggestion.mode_price,
                });
            }
            println!(
                "{} • lowest {} {} • most frequent {} {}",
                args.name.trim(),
                suggestion.min_price,
                context.currency(),
                suggestion.mode_price,
                context.currency()
            );
            Ok(())
        }
    }
}

fn handle_complaint_command(
    context: &CliContext,
    command: ComplaintCommands,
    json: bool,
) -> Result<()> {
    match command {
        ComplaintCommands::Add(args) => {
            let record = context
                .shop
                .add_complaint(ComplaintRequest::new(args.name, args.issue, args.quantity))?;
            if json {
                return print_json(&record);
            }
            println!("Complaint added!");
            render_complaint(&record);
            Ok(())
        }
        ComplaintCommands::List(args) => {
            let complaints = context.shop.complaints()?;
            let records: Vec<&ComplaintRecord> = if args.pending {
                complaints.pending().collect()
            } else {
                complaints.iter().collect()
            };
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No complaints recorded");
            }
            for record in records {
                render_complaint(record);
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_stock_item(item: &StockItem, currency: &str) {
    println!(
        "- {} • {} • {} • bought at {} {} • {} in stock",
        item.tyre_name, item.size, item.brand, item.purchase_price, currency, item.quantity
    );
}

fn render_bill(record: &BillingRecord, currency: &str) {
    println!(
        "- Bill #{} • {} • {} x {} @ {} (total {} {})",
        record.bill_number,
        record.date.format(bill_timestamp::FORMAT),
        record.quantity,
        record.tyre_name,
        record.sell_price,
        record.total_price,
        currency
    );
}

fn render_demand_match(hit: &DemandMatch, currency: &str) {
    println!(
        "- {} • {} • {} • {} in stock • buy {} • lowest {} • most frequent {} {}",
        hit.tyre_name,
        hit.size,
        hit.brand,
        hit.stock,
        hit.buy_price,
        hit.lowest_sell_price,
        hit.most_frequent_price,
        currency
    );
}

fn render_complaint(record: &ComplaintRecord) {
    println!(
        "- {} • {} • {} • {} • {} affected • {} [{}]",
        record.date.format(day::FORMAT),
        record.tyre_name,
        record.size,
        record.brand,
        record.quantity_affected,
        record.issue,
        record.status
    );
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|_| format!("invalid decimal '{raw}'"))
}

fn parse_positive_u32(raw: &str) -> Result<u32, String> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid integer '{raw}'"))?;
    if value == 0 {
        Err("value must be greater than zero".to_string())
    } else {
        Ok(value)
    }
}
