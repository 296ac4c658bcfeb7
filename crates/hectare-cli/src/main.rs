use anyhow::Context;
use clap::Parser;
use hectare_core::{
    aggregate, classify, classify_raw,
    config::DisplayConfig,
    owner_metrics,
    portfolio::{
        count_by_lga, ownership_percent, portfolio_for, status_distribution, verification_queue,
        verification_rate,
    },
    verification_progress_percent, Config, JsonFileSource, PropertyFilter, PropertyRecord,
    PropertySource, PropertyStatus, PropertyStore,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hectare")]
#[command(version, about = "Search and summarise a land registry snapshot", long_about = None)]
struct Cli {
    /// Registry snapshot (JSON); overrides data.snapshot_path from config
    #[arg(long, global = true, env = "HECTARE_DATA")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search properties by internal id, address or owner
    Search {
        /// Search query (empty lists everything)
        #[arg(default_value = "")]
        query: String,
    },
    /// Show one property by object id or internal id
    Show {
        id: String,
    },
    /// Portfolio statistics, optionally over a filtered subset, plus
    /// registry-wide owner and transaction counts
    Stats {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, value_parser = parse_status)]
        status: Option<PropertyStatus>,
        #[arg(long)]
        lga: Option<String>,
    },
    /// Properties the viewer owns or holds shares in
    Portfolio {
        /// Wallet address; defaults to display.viewer_address from config
        #[arg(long)]
        viewer: Option<String>,
    },
    /// Transaction history for a property
    History {
        id: String,
    },
    /// Properties still going through verification
    Verification,
    /// Export search results to .json, .csv or .md
    Export {
        path: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
    },
}

fn parse_status(raw: &str) -> Result<PropertyStatus, String> {
    PropertyStatus::parse(raw).ok_or_else(|| format!("unknown status '{}'", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hectare=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    let config = Config::load().context("failed to load config")?;
    let data_path = cli
        .data
        .or_else(|| config.data.snapshot_path.clone())
        .context("no snapshot given; pass --data or set data.snapshot_path in config")?;

    let sources: Vec<Box<dyn PropertySource>> = vec![Box::new(JsonFileSource::new(&data_path))];
    let store = PropertyStore::load(&sources)
        .await
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    let display = &config.display;

    match command {
        Commands::Search { query } => {
            tracing::info!("Searching for: {}", query);
            let results = store.search(&query);
            println!("Search Results ({})", results.len());
            for record in results {
                print_summary(record, display);
            }
        }
        Commands::Show { id } => {
            let record = store.resolve(&id)?;
            print_details(record, display);
        }
        Commands::Stats { query, status, lga } => {
            let mut filter = PropertyFilter::new().with_query(&query);
            filter.status = status;
            filter.lga = lga;
            let records = store.filter(&filter);
            print_stats(&records, display);
            print_registry_counts(&store);
        }
        Commands::Portfolio { viewer } => {
            let viewer = viewer
                .or_else(|| display.viewer_address.clone())
                .context("no viewer; pass --viewer or set display.viewer_address in config")?;
            let mine = portfolio_for(store.records(), &viewer);
            let metrics = aggregate(mine.iter().copied());

            println!("Portfolio for {}", viewer);
            println!("  Properties:       {}", metrics.total_count);
            println!("  Total value:      {}", display.money(metrics.total_value));
            println!(
                "  Fractional shares: {}",
                metrics.fractional_shares_held
            );
            println!();
            for record in mine {
                print_summary(record, display);
            }
        }
        Commands::History { id } => {
            let record = store.resolve(&id)?;
            let history = store.history(&record.id);
            println!("History for {} ({} records)", record.internal_id, history.len());
            for tx in history {
                let change = match (&tx.previous_status, &tx.new_status) {
                    (Some(from), Some(to)) => {
                        format!(" {} -> {}", classify_raw(from).label, classify_raw(to).label)
                    }
                    (None, Some(to)) => format!(" -> {}", classify_raw(to).label),
                    _ => String::new(),
                };
                println!(
                    "  {}  {:<17} {:?}{}  {}",
                    tx.date.format("%Y-%m-%d"),
                    tx.kind.to_string(),
                    tx.status,
                    change,
                    tx.description
                );
            }
        }
        Commands::Verification => {
            let queue = verification_queue(store.records());
            println!("Verification queue ({})", queue.len());
            for record in queue {
                println!(
                    "  {:<18} {:>5.0}%  {}",
                    record.internal_id,
                    verification_progress_percent(record),
                    record.address
                );
            }
        }
        Commands::Export { path, query } => {
            let results = store.search(&query);
            display.exporter().export_to_file(&results, &path)?;
            tracing::info!("Exported {} properties to {}", results.len(), path.display());
            println!("Exported {} properties to {}", results.len(), path.display());
        }
    }

    Ok(())
}

fn print_summary(record: &PropertyRecord, display: &DisplayConfig) {
    let class = classify(record.status);
    println!(
        "  {} {:<18} {:<26} {:>8}  {}",
        class.trust_level.emoji(),
        record.internal_id,
        class.label,
        display.money(record.estimated_value),
        record.address
    );
}

fn print_details(record: &PropertyRecord, display: &DisplayConfig) {
    let class = classify(record.status);
    println!("{}", record.internal_id);
    println!("  Object ID:  {}", record.id);
    println!("  Address:    {}", record.address);
    println!("  Owner:      {}", record.owner_address);
    println!(
        "  Status:     {} {} [{}]",
        class.trust_level.emoji(),
        class.label,
        class.badge()
    );
    println!("  Value:      {}", display.money(record.estimated_value));
    if let Some(lga) = &record.lga {
        println!("  LGA:        {}", lga);
    }
    if let Some(size) = &record.size {
        println!("  Size:       {}", size);
    }
    println!(
        "  Registered: {}  (modified {})",
        record.registration_date.format("%Y-%m-%d"),
        record.last_modified_date.format("%Y-%m-%d")
    );
    if let Some(shares) = &record.fractional_shares {
        println!(
            "  Shares:     {}/{} ({:.1}%)",
            shares.user_shares,
            shares.total_shares,
            ownership_percent(shares)
        );
    }
    if let Some(stages) = &record.verification_progress {
        println!(
            "  Verification: {:.0}% complete",
            verification_progress_percent(record)
        );
        for stage in stages {
            println!("    - {:<24} {}", stage.name, stage.state.label());
        }
    }
    for (label, cid) in [("Deed", &record.deed_cid), ("Survey", &record.survey_cid)] {
        if let Some(cid) = cid {
            println!("  {:<10}  {}", label, cid);
        }
    }
}

fn print_stats(records: &[&PropertyRecord], display: &DisplayConfig) {
    let metrics = aggregate(records.iter().copied());

    println!("Properties:        {}", metrics.total_count);
    println!("Total value:       {}", display.money(metrics.total_value));
    println!(
        "Average value:     {}",
        display.money(metrics.average_value.round() as u64)
    );
    println!(
        "Verification rate: {:.0}%",
        verification_rate(records.iter().copied())
    );
    println!("Fractional shares: {}", metrics.fractional_shares_held);

    println!("\nStatus distribution");
    for share in status_distribution(records.iter().copied()) {
        println!(
            "  {:<20} {:>4}  {:>3.0}%",
            share.status.as_str(),
            share.count,
            share.percent
        );
    }

    let lgas = count_by_lga(records.iter().copied());
    if !lgas.is_empty() {
        println!("\nCoverage by LGA");
        for (lga, count) in lgas {
            println!("  {:<20} {:>4}", lga, count);
        }
    }
}

fn print_registry_counts(store: &PropertyStore) {
    let owners = owner_metrics(store.owners());

    println!("\nRegistry");
    println!("  Owners:            {}", owners.total_owners);
    println!(
        "  Verified owners:   {} ({} pending, {} rejected)",
        owners.verified, owners.pending, owners.rejected
    );
    println!("  Transactions:      {}", store.transactions().len());
}
