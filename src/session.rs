//! Interactive read-evaluate-print loop over [`ClientHandle::text_completion`].
//!
//! Every line is sent on its own; no history reaches the provider.

use std::io::{self, BufRead, Write};

use owo_colors::{OwoColorize, Stream::Stdout};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::openai::{ClientHandle, CompletionOverrides, Transport};

/// Inputs that end the session, compared case-insensitively.
pub const EXIT_TOKENS: [&str; 3] = ["quit", "exit", "q"];

const PROMPT: &str = "\nYou: ";
const FAREWELL: &str = "Goodbye!";

/// Result of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

/// Source of human input lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome>;
}

/// Line editor for terminals. Ctrl-C and Ctrl-D surface as outcomes instead
/// of killing the process mid-read.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        tracing::debug!(error = %err, "history entry not recorded");
                    }
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Io(err)) => Err(err),
            #[cfg(windows)]
            Err(ReadlineError::Decode(err)) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
            Err(err) => Err(io::Error::other(err.to_string())),
        }
    }
}

/// Plain reader for piped input; no prompt is echoed.
///
/// A line that is not valid UTF-8 is consumed and reported as
/// `InvalidData`, so the next read starts on the following line.
pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<ReadOutcome> {
        let mut raw = Vec::new();
        if self.reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        String::from_utf8(raw)
            .map(ReadOutcome::Line)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

/// What a single input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Blank,
    Message(String),
}

pub fn classify(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Blank
    } else if EXIT_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        Input::Quit
    } else {
        Input::Message(trimmed.to_string())
    }
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub requests: usize,
    pub failures: usize,
}

pub struct Session<'a, T> {
    client: &'a ClientHandle<T>,
    overrides: CompletionOverrides,
}

impl<'a, T: Transport> Session<'a, T> {
    pub fn new(client: &'a ClientHandle<T>) -> Self {
        Self {
            client,
            overrides: CompletionOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: CompletionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Runs until a quit token, EOF or an interrupt. Request failures and
    /// undecodable input lines are printed and the loop keeps going; only
    /// other I/O failures end it early.
    pub fn run<S, W>(&self, source: &mut S, out: &mut W) -> io::Result<SessionSummary>
    where
        S: LineSource,
        W: Write,
    {
        let mut summary = SessionSummary::default();

        loop {
            let line = match source.read_line(PROMPT) {
                Ok(ReadOutcome::Line(line)) => line,
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    let label = "Error:".if_supports_color(Stdout, |text| text.red());
                    writeln!(out, "{label} could not read that line: {err}")?;
                    continue;
                }
                Err(err) => return Err(err),
                Ok(ReadOutcome::Interrupted) => {
                    writeln!(out, "\n{FAREWELL}")?;
                    break;
                }
                Ok(ReadOutcome::Eof) => {
                    writeln!(out, "{FAREWELL}")?;
                    break;
                }
            };

            let message = match classify(&line) {
                Input::Quit => {
                    writeln!(out, "{FAREWELL}")?;
                    break;
                }
                Input::Blank => continue,
                Input::Message(message) => message,
            };

            summary.requests += 1;
            match self.client.text_completion(&message, &self.overrides) {
                Ok(reply) => {
                    let label = "AI:".if_supports_color(Stdout, |text| text.cyan());
                    writeln!(out, "{label} {reply}")?;
                }
                Err(err) => {
                    summary.failures += 1;
                    let label = "Error:".if_supports_color(Stdout, |text| text.red());
                    writeln!(out, "{label} {err}")?;
                }
            }
            out.flush()?;
        }

        tracing::debug!(
            requests = summary.requests,
            failures = summary.failures,
            "session finished"
        );
        Ok(summary)
    }
}
