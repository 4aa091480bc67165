use std::time::Instant;

use aqi_dashboard::cli::{run, DashboardArgs};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};
use sysinfo::{get_current_pid, ProcessExt, System, SystemExt};

fn monitor_memory() -> u64 {
    let mut sys = System::new();
    match get_current_pid() {
        Ok(pid) => {
            sys.refresh_process(pid);
            sys.process(pid).map(|p| p.memory()).unwrap_or(0)
        }
        Err(_) => 0,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = DashboardArgs::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let env = Env::new().filter("AQI_LOG");
    Builder::new()
        .filter(Some("aqi_dashboard"), log_level)
        .parse_env(env)
        .init();

    debug!("Arguments {:#?}", cli);

    let start_time = Instant::now();
    let start_memory = monitor_memory();

    run(cli).await?;

    let end_memory = monitor_memory();
    info!(
        "finished in {:?}, memory used: {} KiB",
        start_time.elapsed(),
        end_memory.saturating_sub(start_memory) / 1024
    );

    Ok(())
}
