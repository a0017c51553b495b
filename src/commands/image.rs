use clap::{Args, value_parser};

use crate::commands::shared::{ClientArgs, print_dry_run, read_text};
use crate::openai::images::ImageGenerationRequest;
use crate::openai::{Endpoint, ImageOptions, ImageQuality, ImageSize};

#[derive(Debug, Args, Clone)]
pub struct ImageArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    #[arg(long, help = "Image model (default: dall-e-3)")]
    pub model: Option<String>,
    #[arg(
        long,
        default_value = "1024x1024",
        help = "256x256, 512x512, 1024x1024, 1792x1024 or 1024x1792"
    )]
    pub size: ImageSize,
    #[arg(long, default_value = "standard", help = "standard or hd")]
    pub quality: ImageQuality,
    #[arg(
        long,
        short = 'n',
        default_value_t = 1,
        value_parser = value_parser!(u32).range(1..=10),
        help = "Number of images"
    )]
    pub count: u32,
    #[arg(long, help = "Print the request instead of sending it")]
    pub dry_run: bool,
    #[arg(help = "Image description; read from stdin when omitted")]
    pub prompt: Option<String>,
}

pub fn run(args: ImageArgs) -> Result<(), String> {
    let prompt = read_text(args.prompt.clone(), "prompt")?;
    let options = ImageOptions {
        model: args.model.clone(),
        size: args.size,
        quality: args.quality,
        count: args.count,
    };

    if args.dry_run {
        let settings = args.client.settings()?;
        let request = ImageGenerationRequest::build(&settings.defaults, &prompt, &options);
        return print_dry_run(Endpoint::ImageGenerations, &request);
    }

    let client = args.client.connect()?;
    let urls = client
        .image_generation(&prompt, &options)
        .map_err(|err| format!("Error generating image: {err}"))?;

    if urls.is_empty() {
        eprintln!("The provider returned no images.");
    }
    for url in urls {
        println!("{url}");
    }
    Ok(())
}
