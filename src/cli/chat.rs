//! Interactive `chat` command.

use crate::advisor::AdvisorService;
use crate::models::PreferenceState;
use crate::{Error, Result};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "you> ";

/// Slash commands understood by the chat loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatCommand {
    State,
    Quit,
}

impl ChatCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "/state" => Some(Self::State),
            "/quit" | "/exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Runs a chat session over `input` and `output`.
///
/// Each line is one message. The preference state lives only for the
/// session. Advisor errors are reported and the loop continues. Returns the
/// final state.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if reading input or writing output fails.
pub fn run_chat<R: BufRead, W: Write>(
    advisor: &AdvisorService,
    input: R,
    output: &mut W,
) -> Result<PreferenceState> {
    let session_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat_session", session_id = %session_id);
    let _guard = span.enter();

    let mut state = PreferenceState::new();
    let mut lines = input.lines();

    writeln!(
        output,
        "Tell me what you'd like to study and where. Type /state to see what I know, /quit to leave."
    )
    .map_err(io_error)?;

    loop {
        write!(output, "{PROMPT}").map_err(io_error)?;
        output.flush().map_err(io_error)?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }

        match ChatCommand::parse(&line) {
            Some(ChatCommand::Quit) => break,
            Some(ChatCommand::State) => {
                let json = serde_json::to_string_pretty(&state).map_err(|e| {
                    Error::OperationFailed {
                        operation: "serialize_state".to_string(),
                        cause: e.to_string(),
                    }
                })?;
                writeln!(output, "{json}").map_err(io_error)?;
            },
            None => match advisor.respond(&line, &state) {
                Ok(response) => {
                    writeln!(output, "\n{}\n", response.message).map_err(io_error)?;
                    for (i, record) in response.recommendations.iter().enumerate() {
                        writeln!(output, "  {}. {} ({})", i + 1, record.name, record.location)
                            .map_err(io_error)?;
                    }
                    state = response.new_state;
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Advisor turn failed");
                    writeln!(output, "Sorry, something went wrong: {e}").map_err(io_error)?;
                },
            },
        }
    }

    tracing::info!(preferences = state.summary_lines().len(), "Chat session ended");
    Ok(state)
}

/// Executes the chat command on stdin and stdout.
///
/// # Errors
///
/// Returns an error if terminal I/O fails.
pub fn cmd_chat(advisor: &AdvisorService) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_chat(advisor, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

#[allow(clippy::needless_pass_by_value)]
fn io_error(e: io::Error) -> Error {
    Error::OperationFailed {
        operation: "chat_io".to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;
    use crate::models::{Course, Location, UniversityRecord};

    fn advisor() -> AdvisorService {
        AdvisorService::new(Catalogue::from_records(vec![
            UniversityRecord::new("kcl.ac.uk", "King's College London").with_location("London"),
        ]))
    }

    #[test]
    fn test_state_accumulates_across_lines() {
        let input = "I like london\nI want to study law\n/quit\nignored medicine\n";
        let mut output = Vec::new();
        let state = run_chat(&advisor(), input.as_bytes(), &mut output).unwrap();

        assert_eq!(state.location, Some(Location::London));
        assert_eq!(state.course, Some(Course::Law));
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("1. King's College London (London)"));
    }

    #[test]
    fn test_state_command_prints_json() {
        let input = "scotland\n/state\n";
        let mut output = Vec::new();
        run_chat(&advisor(), input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"location\": \"Scotland\""));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut output = Vec::new();
        let state = run_chat(&advisor(), "\n   \n".as_bytes(), &mut output).unwrap();
        assert!(state.is_empty());
        assert!(!String::from_utf8(output).unwrap().contains("Sorry"));
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(ChatCommand::parse(" /quit "), Some(ChatCommand::Quit));
        assert_eq!(ChatCommand::parse("/state"), Some(ChatCommand::State));
        assert_eq!(ChatCommand::parse("quit"), None);
    }
}
