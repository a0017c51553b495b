//! Scripted walkthroughs of each operation. Every demo reports its own
//! failure on the output and returns normally.

use std::io::{self, Write};

use owo_colors::{OwoColorize, Stream::Stdout};

use crate::openai::{
    ClientHandle, CompletionOverrides, ImageOptions, PromptTemplate, ReasoningEffort,
    ResponseInput, ResponseOptions, Transport,
};

const CHAT_QUESTION: &str = "Hello! Tell me a fun fact about Python programming.";
const CODING_SYSTEM_PROMPT: &str =
    "You are a helpful coding assistant. Keep responses concise and practical.";
const CODING_QUESTION: &str = "How do I create a virtual environment in Python?";
const EMBEDDING_TEXT: &str = "OpenAI provides powerful AI models for developers";
const IMAGE_PROMPT: &str =
    "A serene mountain landscape with a crystal clear lake, digital art style";
const STORY_PROMPT: &str = "Write a one-sentence bedtime story about a unicorn.";
const PIRATE_INSTRUCTIONS: &str = "Talk like a pirate.";
const PIRATE_QUESTION: &str = "Are semicolons optional in JavaScript?";

#[derive(Debug, Clone, PartialEq)]
pub enum Demo {
    Chat,
    Embeddings,
    Image,
    Story,
    Pirate,
    Template(PromptTemplate),
    /// Chat, embeddings, image and story in sequence.
    All,
}

impl Demo {
    pub fn run<T, W>(&self, client: &ClientHandle<T>, out: &mut W) -> io::Result<()>
    where
        T: Transport,
        W: Write,
    {
        match self {
            Self::Chat => chat(client, out),
            Self::Embeddings => embeddings(client, out),
            Self::Image => image(client, out),
            Self::Story => story(client, out),
            Self::Pirate => pirate(client, out),
            Self::Template(template) => reusable_prompt(client, template, out),
            Self::All => {
                chat(client, out)?;
                embeddings(client, out)?;
                image(client, out)?;
                story(client, out)
            }
        }
    }
}

fn heading<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.if_supports_color(Stdout, |text| text.bold()))?;
    writeln!(out, "{}", "-".repeat(30))
}

fn failure<W: Write>(out: &mut W, what: &str, err: impl std::fmt::Display) -> io::Result<()> {
    writeln!(
        out,
        "{} {what}: {err}",
        "Error".if_supports_color(Stdout, |text| text.red())
    )
}

pub fn chat<T: Transport, W: Write>(client: &ClientHandle<T>, out: &mut W) -> io::Result<()> {
    heading(out, "Chat Completion Demo")?;

    match client.text_completion(CHAT_QUESTION, &CompletionOverrides::default()) {
        Ok(reply) => writeln!(out, "AI Response: {reply}")?,
        Err(err) => failure(out, "generating response", err)?,
    }

    let overrides = CompletionOverrides::default().with_system_prompt(CODING_SYSTEM_PROMPT);
    match client.text_completion(CODING_QUESTION, &overrides) {
        Ok(reply) => writeln!(out, "\nAI Response (with system prompt): {reply}"),
        Err(err) => failure(out, "generating response", err),
    }
}

pub fn embeddings<T: Transport, W: Write>(
    client: &ClientHandle<T>,
    out: &mut W,
) -> io::Result<()> {
    heading(out, "Text Embeddings Demo")?;

    match client.embedding(EMBEDDING_TEXT, None) {
        Ok(vector) => {
            writeln!(out, "Text: {EMBEDDING_TEXT}")?;
            writeln!(out, "Embedding vector length: {}", vector.len())?;
            let preview = &vector[..vector.len().min(5)];
            writeln!(out, "First 5 values: {preview:?}")
        }
        Err(err) => failure(out, "generating embeddings", err),
    }
}

pub fn image<T: Transport, W: Write>(client: &ClientHandle<T>, out: &mut W) -> io::Result<()> {
    heading(out, "Image Generation Demo")?;
    writeln!(out, "Generating image with prompt: {IMAGE_PROMPT}")?;

    match client.image_generation(IMAGE_PROMPT, &ImageOptions::default()) {
        Ok(urls) if urls.is_empty() => writeln!(out, "The provider returned no images"),
        Ok(urls) => {
            writeln!(out, "Generated {} image(s):", urls.len())?;
            for (index, url) in urls.iter().enumerate() {
                writeln!(out, "Image {}: {url}", index + 1)?;
            }
            Ok(())
        }
        Err(err) => failure(out, "generating image", err),
    }
}

pub fn story<T: Transport, W: Write>(client: &ClientHandle<T>, out: &mut W) -> io::Result<()> {
    heading(out, "Bedtime Story Demo")?;

    match client.complete(STORY_PROMPT, &CompletionOverrides::default()) {
        Ok(completion) => {
            writeln!(out, "Bedtime Story:")?;
            writeln!(out, "{}", completion.content)?;
            let model = completion.model.as_deref().unwrap_or("unknown");
            writeln!(out, "\nModel used: {model}")?;
            match completion.usage.and_then(|usage| usage.total_tokens) {
                Some(total) => writeln!(out, "Tokens used: {total}"),
                None => writeln!(out, "Tokens used: unavailable"),
            }
        }
        Err(err) => failure(out, "running the bedtime story", err),
    }
}

pub fn pirate<T: Transport, W: Write>(client: &ClientHandle<T>, out: &mut W) -> io::Result<()> {
    heading(out, "Responses Demo")?;

    match client.structured_response(
        PIRATE_INSTRUCTIONS,
        PIRATE_QUESTION,
        Some(ReasoningEffort::Low),
    ) {
        Ok(text) => writeln!(out, "{text}"),
        Err(err) => failure(out, "calling the responses endpoint", err),
    }
}

pub fn reusable_prompt<T: Transport, W: Write>(
    client: &ClientHandle<T>,
    template: &PromptTemplate,
    out: &mut W,
) -> io::Result<()> {
    heading(out, "Reusable Prompt Demo")?;
    writeln!(out, "Prompt: {}", template.id)?;

    let input = ResponseInput::Template(template.clone());
    match client.respond(&input, &ResponseOptions::default()) {
        Ok(text) => writeln!(out, "{text}"),
        Err(err) => failure(out, "rendering the stored prompt", err),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::Demo;
    use crate::openai::PromptTemplate;
    use crate::openai::fake::{FakeTransport, chat_reply};
    use crate::openai::transport::Endpoint;

    fn run(demo: Demo, transport: FakeTransport) -> (String, Vec<Endpoint>) {
        let client = transport.into_handle();
        let mut out = Vec::new();
        demo.run(&client, &mut out).unwrap();
        let endpoints = client
            .transport()
            .calls()
            .into_iter()
            .map(|(endpoint, _)| endpoint)
            .collect();
        (String::from_utf8(out).unwrap(), endpoints)
    }

    #[test]
    fn chat_demo_sends_plain_then_system_prompted_question() {
        let client = FakeTransport::new()
            .reply(chat_reply("fun fact"))
            .reply(chat_reply("python -m venv .venv"))
            .into_handle();
        let mut out = Vec::new();
        Demo::Chat.run(&client, &mut out).unwrap();

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1["messages"].as_array().unwrap().len(), 1);
        assert_eq!(calls[1].1["messages"][0]["role"], "system");
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("AI Response (with system prompt): python -m venv .venv"));
    }

    #[test]
    fn embeddings_demo_prints_length_and_preview() {
        let vector: Vec<f64> = (1..=8).map(|i| f64::from(i) / 10.0).collect();
        let (printed, _) = run(
            Demo::Embeddings,
            FakeTransport::new().reply(json!({"data": [{"embedding": vector}]})),
        );
        assert!(printed.contains("Embedding vector length: 8"));
        assert!(printed.contains("First 5 values: [0.1, 0.2, 0.3, 0.4, 0.5]"));
    }

    #[test]
    fn image_demo_numbers_urls_from_one() {
        let (printed, _) = run(
            Demo::Image,
            FakeTransport::new().reply(json!({"data": [{"url": "https://img.example/a.png"}]})),
        );
        assert!(printed.contains("Generated 1 image(s):"));
        assert!(printed.contains("Image 1: https://img.example/a.png"));
    }

    #[test]
    fn story_demo_reports_model_and_tokens() {
        let (printed, _) = run(Demo::Story, FakeTransport::new().reply(chat_reply("Once...")));
        assert!(printed.contains("Once..."));
        assert!(printed.contains("Model used: gpt-4o-mini-2024-07-18"));
        assert!(printed.contains("Tokens used: 12"));
    }

    #[test]
    fn failing_demo_reports_and_returns() {
        let (printed, endpoints) = run(
            Demo::Pirate,
            FakeTransport::new().fail(StatusCode::UNAUTHORIZED, "invalid api key"),
        );
        assert_eq!(endpoints, vec![Endpoint::Responses]);
        assert!(printed.contains("invalid api key"));
    }

    #[test]
    fn all_demo_keeps_going_after_failures() {
        let (_, endpoints) = run(Demo::All, FakeTransport::new());
        assert_eq!(
            endpoints,
            vec![
                Endpoint::ChatCompletions,
                Endpoint::ChatCompletions,
                Endpoint::Embeddings,
                Endpoint::ImageGenerations,
                Endpoint::ChatCompletions,
            ]
        );
    }

    #[test]
    fn template_demo_uses_responses_endpoint() {
        let template = PromptTemplate::new("pmpt_abc").with_variable("product", "Headphones");
        let (printed, endpoints) = run(
            Demo::Template(template),
            FakeTransport::new().reply(json!({"output_text": "Thanks for buying Headphones"})),
        );
        assert_eq!(endpoints, vec![Endpoint::Responses]);
        assert!(printed.contains("Thanks for buying Headphones"));
    }
}
