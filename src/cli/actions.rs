use anyhow::{bail, Result};
use std::sync::Arc;

use clap::ArgMatches;

use super::config::GeneratorConfig;
use crate::protocol::{
    modbus::{into_shared_storage, LoggingHook, ModbusHook, ModbusServer, ServerOptions},
    pipeline::configure_bank,
    register::RegisterBank,
};

/// Build the register bank described by the command line and serve it until Ctrl+C.
pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = GeneratorConfig::from_matches(matches)?;
    let files = config.register_files()?;
    if files.is_empty() {
        log::info!(
            "No register files configured, pass --json-coil, --json-discrete, --json-input or --json-holding"
        );
        return Ok(());
    }

    let mut bank = RegisterBank::new();
    let reports = configure_bank(
        &mut bank,
        files
            .iter()
            .map(|(category, path)| (*category, path.as_path())),
        config.register_start_offset,
    );
    if reports.is_empty() {
        bail!("No register category could be configured");
    }
    for report in &reports {
        log::debug!(
            "{}: {} placed, {} skipped",
            report.category,
            report.placed,
            report.skipped
        );
    }

    if matches.get_flag("dump") {
        println!("{}", serde_json::to_string_pretty(&bank.snapshot())?);
        return Ok(());
    }

    let storage = into_shared_storage(bank)?;
    let hooks: Vec<Arc<dyn ModbusHook>> = vec![Arc::new(LoggingHook)];
    let server = ModbusServer::listen(
        &config.listen_address(),
        storage,
        ServerOptions {
            station_id: config.station_id,
            protocol: config.protocol,
        },
        hooks,
    )
    .await?;

    println!("Press ctrl+c to stop");
    tokio::signal::ctrl_c().await?;
    server.close();
    println!("Stopped");

    Ok(())
}
