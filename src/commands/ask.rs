use clap::{Args, value_parser};

use crate::commands::shared::{ClientArgs, parse_temperature, print_dry_run, read_text};
use crate::openai::chat::ChatCompletionRequest;
use crate::openai::{Completion, CompletionOverrides, Endpoint};

#[derive(Debug, Args, Clone)]
pub struct AskArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[arg(long, help = "Chat model (default: gpt-4o-mini)")]
    pub model: Option<String>,
    #[arg(long, value_parser = value_parser!(u32).range(1..), help = "Maximum output tokens")]
    pub max_tokens: Option<u32>,
    #[arg(long, value_parser = parse_temperature, help = "Sampling temperature, 0.0 to 2.0")]
    pub temperature: Option<f64>,
    #[arg(long, help = "System prompt placed before the question")]
    pub system: Option<String>,
    #[arg(long, help = "Print model and token usage on stderr")]
    pub show_usage: bool,
    #[arg(long, help = "Print the request instead of sending it")]
    pub dry_run: bool,
    #[arg(help = "Question; read from stdin when omitted")]
    pub prompt: Option<String>,
}

impl AskArgs {
    fn overrides(&self) -> CompletionOverrides {
        CompletionOverrides {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_prompt: self.system.clone(),
        }
    }
}

pub fn run(args: AskArgs) -> Result<(), String> {
    let prompt = read_text(args.prompt.clone(), "prompt")?;
    let overrides = args.overrides();

    if args.dry_run {
        let settings = args.client.settings()?;
        let request = ChatCompletionRequest::build(&settings.defaults, &prompt, &overrides);
        return print_dry_run(Endpoint::ChatCompletions, &request);
    }

    let client = args.client.connect()?;
    let completion = client
        .complete(&prompt, &overrides)
        .map_err(|err| format!("Error generating response: {err}"))?;

    println!("{}", completion.content);
    if args.show_usage {
        eprintln!("{}", usage_line(&completion));
    }
    Ok(())
}

fn usage_line(completion: &Completion) -> String {
    let model = completion.model.as_deref().unwrap_or("unknown");
    match completion.usage {
        Some(usage) => format!(
            "model: {model} prompt_tokens={} completion_tokens={} total_tokens={}",
            count(usage.prompt_tokens),
            count(usage.completion_tokens),
            count(usage.total_tokens)
        ),
        None => format!("model: {model} usage: unavailable"),
    }
}

fn count(value: Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |value| value.to_string())
}
