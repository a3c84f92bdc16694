use anyhow::Result;

use modbus_generator::{boot, cli};

#[tokio::main]
async fn main() -> Result<()> {
    boot::init_logger();

    let matches = cli::parse_args();
    cli::actions::run(&matches).await
}
