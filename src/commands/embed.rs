use clap::Args;

use crate::commands::shared::{ClientArgs, print_dry_run, read_text};
use crate::openai::{EmbeddingRequest, Endpoint};

#[derive(Debug, Args, Clone)]
pub struct EmbedArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[arg(long, help = "Embedding model (default: text-embedding-3-small)")]
    pub model: Option<String>,
    #[arg(long, help = "Print the whole vector as a JSON array")]
    pub json: bool,
    #[arg(long, default_value_t = 5, help = "How many leading values to show")]
    pub preview: usize,
    #[arg(long, help = "Print the request instead of sending it")]
    pub dry_run: bool,
    #[arg(help = "Text to embed; read from stdin when omitted")]
    pub text: Option<String>,
}

pub fn run(args: EmbedArgs) -> Result<(), String> {
    let text = read_text(args.text.clone(), "text")?;

    if args.dry_run {
        let settings = args.client.settings()?;
        let request = EmbeddingRequest::build(&settings.defaults, &text, args.model.as_deref());
        return print_dry_run(Endpoint::Embeddings, &request);
    }

    let client = args.client.connect()?;
    let vector = client
        .embedding(&text, args.model.as_deref())
        .map_err(|err| format!("Error generating embeddings: {err}"))?;

    if args.json {
        let rendered = serde_json::to_string(&vector)
            .map_err(|err| format!("Failed to render embedding: {err}"))?;
        println!("{rendered}");
    } else {
        println!("Embedding vector length: {}", vector.len());
        let shown = &vector[..vector.len().min(args.preview)];
        println!("First {} values: {shown:?}", shown.len());
    }
    Ok(())
}
