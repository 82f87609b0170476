use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "timetable_planner")]
#[command(about = "Authoring service for university course-timetabling problems")]
pub struct Config {
    #[arg(long, env = "PLANNER_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Base URL of the timetabling solver; requests go to `{solver_url}/solve`.
    #[arg(long, env = "PLANNER_SOLVER_URL", default_value = "http://127.0.0.1:8000")]
    pub solver_url: String,

    #[arg(long, env = "PLANNER_LOG", default_value = "info")]
    pub log_filter: String,
}
