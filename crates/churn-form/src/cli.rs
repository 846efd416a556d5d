use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "churn-form", version, about = "Submit a churn form to a prediction endpoint")]
pub(crate) struct Args {
    /// TOML file with a `[fields]` table of raw input text.
    #[arg(long)]
    pub(crate) form: PathBuf,
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Request timeout, e.g. `5s` or `1500ms`.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub(crate) timeout: Option<Duration>,
    #[arg(long, default_value_t = false)]
    pub(crate) check_health: bool,
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
}
