mod call;
mod cli;
mod config;
mod routes;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Routes(args) => {
            let cfg =
                config::ProjectConfig::load(&args.global.config, args.global.config_explicit)?;
            init_tracing(&cfg.file.log.filter);
            routes::run(&cfg)
        }
        cli::Command::Call(args) => {
            let cfg =
                config::ProjectConfig::load(&args.global.config, args.global.config_explicit)?;
            init_tracing(&cfg.file.log.filter);
            call::run(&cfg, args).await
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
