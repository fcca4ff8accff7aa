//! cloudcarbon - Estimate cloud energy use and carbon emissions from billing exports

use clap::Parser;
use cloudcarbon::{
    accumulator::sort_chronologically,
    aggregator::BillingExportAggregator,
    api::{self, AppState},
    cache::EstimateCache,
    cli::{Cli, Command},
    emissions::EmissionsFactorTable,
    error::{CarbonError, Result},
    output::{Totals, get_formatter},
    request::{EstimationRequest, parse_date},
    source::CsvDataSource,
    types::{CloudProvider, GroupDimension, TimeGranularity},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first to check for the quiet flag
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cloudcarbon=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let provider: CloudProvider = cli.provider.parse().map_err(CarbonError::Config)?;
    let factors = Arc::new(EmissionsFactorTable::builtin(provider));

    match cli.command {
        Command::Estimate {
            source,
            start,
            end,
            group_by,
            group,
            sorted,
        } => {
            info!("Running footprint estimation");

            let granularity: TimeGranularity =
                group_by.parse().map_err(CarbonError::InvalidRequest)?;
            let group_dimension: Option<GroupDimension> = group
                .as_deref()
                .map(|raw| raw.parse())
                .transpose()
                .map_err(CarbonError::InvalidRequest)?;
            let request = EstimationRequest::new(
                parse_date(&start)?,
                parse_date(&end)?,
                granularity,
                group_dimension,
                false,
            )?;

            let data_source = Arc::new(CsvDataSource::new(source.csv));
            let aggregator = BillingExportAggregator::new(data_source, factors);

            let mut results = aggregator
                .get_estimates(request.range, request.granularity, request.group_by)
                .await?;
            if sorted {
                sort_chronologically(&mut results);
            }

            let totals = Totals::from_results(&results);
            let formatter = get_formatter(cli.json);
            println!("{}", formatter.format_results(&results, &totals));
        }

        Command::Serve { source, port } => {
            info!("Starting footprint API server on port {port}");

            let data_source = Arc::new(CsvDataSource::new(source.csv));
            let state = AppState {
                aggregator: Arc::new(BillingExportAggregator::new(data_source, factors.clone())),
                factors,
                cache: Arc::new(EstimateCache::new()),
            };

            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
            info!("Listening on {}", listener.local_addr()?);
            axum::serve(listener, api::router(state)).await?;
        }

        Command::Regions => {
            let formatter = get_formatter(cli.json);
            println!("{}", formatter.format_regions(&factors.listing()));
        }
    }

    Ok(())
}
