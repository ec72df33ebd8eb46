mod commands;
mod terminal;

use addrbook_common::config::Config;
use commands::{CommandLine, Commands, interfaces, listen};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    match commands.command {
        Commands::Listen(args) => {
            print::header("starting listener");
            let cfg = Config::from(args);
            listen::listen(&cfg).await
        }
        Commands::Interfaces => {
            print::header("capture interfaces");
            interfaces::interfaces();
            Ok(())
        }
    }
}
