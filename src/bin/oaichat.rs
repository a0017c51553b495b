use std::process;

use clap::Parser;
use oaitutor::commands::chat::{self, ChatArgs};
use oaitutor::logging::{self, LogArgs};

#[derive(Debug, Parser)]
#[command(
    name = "oaichat",
    version = oaitutor::VERSION,
    about = "Interactive chat; type quit, exit or q to leave"
)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
    #[command(flatten)]
    chat: ChatArgs,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.log);

    if let Err(err) = chat::run(cli.chat) {
        eprintln!("{err}");
        process::exit(1);
    }
}
