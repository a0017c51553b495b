use clap::Args;

use crate::commands::shared::{ClientArgs, TemplateArgs, print_dry_run, read_text};
use crate::openai::responses::ResponseRequest;
use crate::openai::{Endpoint, ReasoningEffort, ResponseInput, ResponseOptions, Turn};

#[derive(Debug, Args, Clone)]
pub struct RespondArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[command(flatten)]
    pub template: TemplateArgs,
    #[arg(long, help = "Response model (default: gpt-5-nano)")]
    pub model: Option<String>,
    #[arg(long, conflicts_with = "prompt_id", help = "Instructions for the model")]
    pub instructions: Option<String>,
    #[arg(
        long,
        requires = "instructions",
        help = "Send the instructions as a developer turn instead of the instructions field"
    )]
    pub developer_turn: bool,
    #[arg(long, help = "Reasoning effort: minimal, low, medium or high")]
    pub effort: Option<ReasoningEffort>,
    #[arg(long, help = "Print the request instead of sending it")]
    pub dry_run: bool,
    #[arg(conflicts_with = "prompt_id", help = "Input; read from stdin when omitted")]
    pub input: Option<String>,
}

fn response_input(args: &RespondArgs) -> Result<ResponseInput, String> {
    if let Some(template) = args.template.template() {
        return Ok(ResponseInput::Template(template));
    }

    let input = read_text(args.input.clone(), "input")?;
    Ok(match &args.instructions {
        Some(instructions) if args.developer_turn => {
            ResponseInput::developer_turns(instructions.as_str(), input)
        }
        Some(instructions) => ResponseInput::flat(instructions.as_str(), input),
        None => ResponseInput::Turns(vec![Turn::user(input)]),
    })
}

pub fn run(args: RespondArgs) -> Result<(), String> {
    let input = response_input(&args)?;
    let options = ResponseOptions {
        model: args.model.clone(),
        reasoning_effort: args.effort,
    };

    if args.dry_run {
        let settings = args.client.settings()?;
        let request = ResponseRequest::build(&settings.defaults, &input, &options);
        return print_dry_run(Endpoint::Responses, &request);
    }

    let client = args.client.connect()?;
    let text = client
        .respond(&input, &options)
        .map_err(|err| format!("Error creating response: {err}"))?;
    println!("{text}");
    Ok(())
}
