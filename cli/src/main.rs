mod commands;
mod terminal;

use commands::{CommandLine, audit};
use nsaudit_common::config::Config;
use terminal::{logging, print, spinner};
use tracing::warn;

const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands: CommandLine = CommandLine::parse_args();
    logging::init_logging(commands.verbose)?;

    let cfg: Config = commands.to_config();
    print::banner(cfg.no_banner, cfg.quiet);

    let interrupted: bool = tokio::select! {
        result = audit::audit(commands.domain.clone(), &cfg) => {
            result?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        spinner::finish();
        warn!("interrupted, in-flight queries were cancelled");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
    Ok(())
}
