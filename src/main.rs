use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, shells};
use oaitutor::commands::ask::{self, AskArgs};
use oaitutor::commands::chat::{self, ChatArgs};
use oaitutor::commands::config::{self, ConfigArgs};
use oaitutor::commands::demo::{self, DemoArgs};
use oaitutor::commands::embed::{self, EmbedArgs};
use oaitutor::commands::image::{self, ImageArgs};
use oaitutor::commands::respond::{self, RespondArgs};
use oaitutor::logging::{self, LogArgs};

const ROOT_HELP_EXAMPLES: &str = "\
Examples:
  oaitutor ask \"Tell me a fun fact about Python\"
  oaitutor ask --system \"Be concise\" --dry-run \"How do I create a virtualenv?\"
  oaitutor respond --instructions \"Talk like a pirate.\" --effort low \"Are semicolons optional?\"
  oaitutor demo story
  oaitutor completion bash > ~/.local/share/bash-completion/completions/oaitutor";

const RESPOND_HELP_EXAMPLES: &str = "\
Examples:
  oaitutor respond --instructions \"Talk like a pirate.\" \"Are semicolons optional?\"
  oaitutor respond --instructions \"Talk like a pirate.\" --developer-turn \"Semicolons?\"
  oaitutor respond --prompt-id pmpt_123 --prompt-version 2 --var product=Headphones";

#[derive(Debug, Parser)]
#[command(
    name = "oaitutor",
    version = oaitutor::VERSION,
    about = "Tutorial client for chat, embeddings, images and responses",
    after_help = ROOT_HELP_EXAMPLES
)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Ask a single question")]
    Ask(AskArgs),
    #[command(about = "Start an interactive chat session")]
    Chat(ChatArgs),
    #[command(about = "Embed a text and print the vector")]
    Embed(EmbedArgs),
    #[command(about = "Generate images and print their URLs")]
    Image(ImageArgs),
    #[command(about = "Call the responses endpoint", after_help = RESPOND_HELP_EXAMPLES)]
    Respond(RespondArgs),
    #[command(about = "Run the tutorial demos")]
    Demo(DemoArgs),
    #[command(about = "Manage local config")]
    Config(ConfigArgs),
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

fn print_completion(shell: CompletionShell) {
    let mut cmd = Cli::command();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, "oaitutor", &mut io::stdout()),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, "oaitutor", &mut io::stdout()),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, "oaitutor", &mut io::stdout()),
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.log);

    let result = match cli.command {
        Commands::Ask(args) => ask::run(args),
        Commands::Chat(args) => chat::run(args),
        Commands::Embed(args) => embed::run(args),
        Commands::Image(args) => image::run(args),
        Commands::Respond(args) => respond::run(args),
        Commands::Demo(args) => demo::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
