mod commands;
mod terminal;

use commands::{CommandLine, check};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    let verbosity = logging::init_logging(commands.log_level());

    check::check(&commands, verbosity).await
}
