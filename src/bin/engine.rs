use clap::Parser;
use pitboss::table::audit::Csv;
use pitboss::table::config::Config;
use pitboss::table::table::Table;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    pitboss::log();
    let sink = Csv::create(&config.csv)?;
    let table = Table::host(config, Box::new(sink)).await?;
    table.run().await?;
    Ok(())
}
