use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Session-bound token authentication gateway")]
pub struct Cli {
    /// Path to a settings file; defaults to settings/dev.toml in debug builds.
    #[arg(long)]
    pub settings: Option<String>,
}
