//! Shows the filter swap done at startup: the bootstrap subscriber logs at
//! `info`, then the `log.filter` from settings turns on `sessiongate` debug
//! output while other targets stay at `info`.
//!
//! $ cargo run --bin logger_demo -- --settings=settings/dev.toml

use sessiongate::logger::*;
use sessiongate::settings::*;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger = Logger::new_bootstrap();

    debug!(target: "sessiongate::auth", "hidden: bootstrap filter is info");
    info!(target: "sessiongate::auth", "bootstrap info log");

    let project_settings = parse_settings(cli.settings.as_deref())?;
    let config = LogConfig::from(&project_settings.log);
    logger.reload_from_config(&config)?;
    info!(filter = %config.filter, "filter reloaded from settings");

    debug!(target: "sessiongate::auth", principal = 100, "session confirmed");
    debug!(target: "hyper::proto", "hidden unless the filter names this target");
    warn!(target: "sessiongate::store", "store unreachable, treating session as expired");

    // A malformed directive is rejected and the previous filter stays in place.
    let bad = LogConfig {
        filter: "sessiongate=loud".to_string(),
    };
    if let Err(e) = logger.reload_from_config(&bad) {
        error!("rejected filter {:?}: {}", bad.filter, e);
    }
    debug!(target: "sessiongate::auth", "still at debug after the rejected reload");

    Ok(())
}
