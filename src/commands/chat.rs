use std::io::{self, IsTerminal};

use clap::{Args, value_parser};

use crate::commands::shared::{ClientArgs, parse_temperature};
use crate::openai::CompletionOverrides;
use crate::session::{BufReadSource, EditorSource, Session};

#[derive(Debug, Args, Clone)]
pub struct ChatArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[arg(long, help = "Chat model (default: gpt-4o-mini)")]
    pub model: Option<String>,
    #[arg(long, value_parser = value_parser!(u32).range(1..), help = "Maximum output tokens")]
    pub max_tokens: Option<u32>,
    #[arg(long, value_parser = parse_temperature, help = "Sampling temperature, 0.0 to 2.0")]
    pub temperature: Option<f64>,
    #[arg(long, help = "System prompt sent with every message")]
    pub system: Option<String>,
}

pub fn run(args: ChatArgs) -> Result<(), String> {
    let client = args.client.connect()?;
    let overrides = CompletionOverrides {
        model: args.model,
        max_tokens: args.max_tokens,
        temperature: args.temperature,
        system_prompt: args.system,
    };
    let session = Session::new(&client).with_overrides(overrides);

    println!("Interactive Chat Mode");
    println!("{}", "-".repeat(30));
    println!("Type your messages (type 'quit' to exit):");

    let mut out = io::stdout();
    let outcome = if io::stdin().is_terminal() {
        match EditorSource::new() {
            Ok(mut editor) => session.run(&mut editor, &mut out),
            Err(err) => {
                tracing::warn!(error = %err, "line editor unavailable, reading plain lines");
                session.run(&mut BufReadSource::new(io::stdin().lock()), &mut out)
            }
        }
    } else {
        session.run(&mut BufReadSource::new(io::stdin().lock()), &mut out)
    };

    outcome
        .map(|_| ())
        .map_err(|err| format!("Console I/O failed: {err}"))
}
