use clap::Parser;
use timetable_planner::{Config, server};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter)).init();

    server::run_server(&config).await
}
