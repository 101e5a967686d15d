//! Writes a canonical session for a principal and prints the bearer token.
//! Only meaningful against a shared store (the redis backend); a token issued
//! into the memory backend dies with this process.
//!
//! $ cargo run --bin issue_token -- --principal 100 --platform ios

use clap::Parser;
use sessiongate::domain_model::PrincipalId;
use sessiongate::logger::*;
use sessiongate::server::Server;
use sessiongate::settings::parse_settings;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    settings: Option<String>,
    #[arg(long)]
    principal: i64,
    #[arg(long, default_value = "")]
    platform: String,
    /// Delete the session instead of issuing one.
    #[arg(long)]
    revoke: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let logger = Logger::new_bootstrap();
    let project_settings = parse_settings(args.settings.as_deref())?;
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let server = Server::try_new(&project_settings).await?;
    let principal = PrincipalId(args.principal);

    if args.revoke {
        server.issuer.revoke(principal, &args.platform).await?;
        println!("revoked {}/{}", principal, args.platform);
    } else {
        let issued = server.issuer.issue(principal, &args.platform).await?;
        println!("Bearer {}", issued.token);
    }

    server.shutdown().await;
    Ok(())
}
