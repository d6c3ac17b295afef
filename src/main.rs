use clap::Parser;
use regnav::core::config::{self, CliOverrides, EnvOverrides};
use regnav::core::locator::{self, RegistryRules};
use regnav::registry::{ConnectClient, Registry};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "regnav", about = "Terminal navigator for a module registry")]
struct Args {
    /// Registry remote, e.g. buf.build
    #[arg(long)]
    remote: Option<String>,

    /// Use the alternate screen instead of an inline viewport
    #[arg(short, long)]
    fullscreen: bool,

    /// Username for the registry remote
    #[arg(short, long)]
    username: Option<String>,

    /// Token for the registry remote
    #[arg(short, long)]
    token: Option<String>,

    /// Start at a reference: [remote/]owner/module[:ref]
    #[arg(short, long, default_value = "")]
    reference: String,

    /// Override the base URL requests are sent to
    #[arg(long)]
    base_url: Option<String>,

    /// Where to write the log
    #[arg(long, default_value = "regnav.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let startup = match locator::resolve(&args.reference, &RegistryRules) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    let cli = CliOverrides {
        remote: args.remote,
        reference_remote: startup.as_ref().and_then(|l| l.remote.clone()),
        username: args.username,
        token: args.token,
        base_url: args.base_url,
        fullscreen: args.fullscreen,
    };
    let resolved = match config::load_config()
        .and_then(|file| config::resolve(&file, &EnvOverrides::from_env(), &cli))
    {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    log::info!(
        "regnav starting up against {} (reference: {:?})",
        resolved.remote,
        startup.as_ref().map(ToString::to_string)
    );

    let registry: Arc<dyn Registry> = Arc::new(
        ConnectClient::new(resolved.remote.clone(), resolved.credentials.clone())
            .with_base_url(resolved.base_url.clone())
            .with_page_size(resolved.page_size),
    );

    match regnav::tui::run(&resolved, registry, startup) {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(e)) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
