use std::io;

use clap::{Args, ValueEnum};

use crate::commands::shared::{ClientArgs, TemplateArgs};
use crate::demos::Demo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Plain question, then one with a system prompt
    Chat,
    /// Embed a sentence and preview the vector
    Embeddings,
    /// Generate one image
    Image,
    /// One-sentence bedtime story with model and token usage
    Story,
    /// Responses endpoint with instructions and low reasoning effort
    Pirate,
    /// Responses endpoint with a stored prompt (needs --prompt-id)
    Template,
    /// Chat, embeddings, image and story in sequence
    All,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[command(flatten)]
    pub template: TemplateArgs,
    #[arg(value_enum, default_value = "all")]
    pub demo: DemoKind,
}

fn select(args: &DemoArgs) -> Result<Demo, String> {
    Ok(match args.demo {
        DemoKind::Chat => Demo::Chat,
        DemoKind::Embeddings => Demo::Embeddings,
        DemoKind::Image => Demo::Image,
        DemoKind::Story => Demo::Story,
        DemoKind::Pirate => Demo::Pirate,
        DemoKind::Template => Demo::Template(
            args.template
                .template()
                .ok_or("The template demo needs --prompt-id.")?,
        ),
        DemoKind::All => Demo::All,
    })
}

pub fn run(args: DemoArgs) -> Result<(), String> {
    let demo = select(&args)?;
    let client = args.client.connect()?;

    println!("Welcome to the OpenAI tutorial!");
    println!("{}", "=".repeat(50));
    demo.run(&client, &mut io::stdout())
        .map_err(|err| format!("Console I/O failed: {err}"))
}
