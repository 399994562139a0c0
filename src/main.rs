use anyhow::Result;
use log::LevelFilter;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("SPED_GAP_LOG", "warn,sped_funding_gap=info"))
        .init();

    sped_funding_gap::cli::run()
}
