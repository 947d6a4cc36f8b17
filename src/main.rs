use chrono::Local;
use clap::Parser;
use doclist::{cli::Args, info_time, process::run, request::build_client, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    debug!(?args, "CLI arguments parsed");

    let config = args.config();

    #[cfg(feature = "browser")]
    let harvest = if args.browser {
        doclist::process::run_in_browser(&config, !args.headed).await?
    } else {
        run(&config, build_client(args.user_agent.as_deref())?).await?
    };
    #[cfg(not(feature = "browser"))]
    let harvest = run(&config, build_client(args.user_agent.as_deref())?).await?;

    println!("Rows written: {}", harvest.records.len());
    info_time!(start_time, "Full program time:");

    Ok(())
}
