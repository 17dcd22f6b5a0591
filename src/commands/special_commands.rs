//! Special commands parser for interactive chat mode
//!
//! Special commands are handled locally and never reach the model. They are
//! prefixed with `/` and are case-insensitive, except for the bare `exit` and
//! `quit` words.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command does not take an argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Commands handled by the chat loop itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show available commands
    Help,

    /// Clear the transcript (the rate window is kept)
    Clear,

    /// List companies, optionally filtered by a substring
    Companies(Option<String>),

    /// Show a random handful of classmates
    Featured,

    /// Show transcript length and remaining queries
    ShowStatus,

    /// Leave the session
    Exit,

    /// Not a special command; treat as a question
    None,
}

/// Parse user input into a special command
///
/// # Errors
///
/// Returns `CommandError` for `/`-prefixed input that is not a known command
///
/// # Examples
///
/// ```
/// use hooswho::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/clear").unwrap(), SpecialCommand::Clear);
/// assert_eq!(
///     parse_special_command("/companies icf").unwrap(),
///     SpecialCommand::Companies(Some("icf".to_string()))
/// );
/// assert_eq!(
///     parse_special_command("Who works at ICF?").unwrap(),
///     SpecialCommand::None
/// );
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/clear" => Ok(SpecialCommand::Clear),
        "/featured" => Ok(SpecialCommand::Featured),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/companies" => Ok(SpecialCommand::Companies(None)),
        input if input.starts_with("/companies ") => {
            // Keep the caller's casing; matching is case-insensitive anyway
            let filter = trimmed["/companies ".len()..].trim();
            Ok(SpecialCommand::Companies(Some(filter.to_string())))
        }
        input if input.starts_with("/clear ") || input.starts_with("/featured ") => {
            let (command, arg) = input.split_once(' ').unwrap_or((input, ""));
            Err(CommandError::UnsupportedArgument {
                command: command.to_string(),
                arg: arg.trim().to_string(),
            })
        }
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands
================

  /help               - Show this help
  /clear              - Clear the chat history
  /companies [text]   - List companies represented, optionally filtered
  /featured           - Show a few classmates at random
  /status             - Show history size and remaining queries
  exit, quit          - Leave Hoos Who?

Anything else is sent as a question, for example:
  {}
  {}
  {}
  {}
"#,
        "Who works at ICF?".italic(),
        "Who has government contracting/consulting experience?".italic(),
        "Find me someone in the cohort who worked in tech and finance".italic(),
        "Who should I talk to about breaking in finance or fintech?".italic(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_question_is_not_a_command() {
        assert_eq!(
            parse_special_command("Who works at ICF?").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_exit_words() {
        for input in ["exit", "QUIT", " quit ", "/exit"] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(parse_special_command("/HELP").unwrap(), SpecialCommand::Help);
        assert_eq!(
            parse_special_command("/Status").unwrap(),
            SpecialCommand::ShowStatus
        );
        assert_eq!(
            parse_special_command("/Featured").unwrap(),
            SpecialCommand::Featured
        );
    }

    #[test]
    fn test_companies_with_and_without_filter() {
        assert_eq!(
            parse_special_command("/companies").unwrap(),
            SpecialCommand::Companies(None)
        );
        assert_eq!(
            parse_special_command("/companies  Capital One ").unwrap(),
            SpecialCommand::Companies(Some("Capital One".to_string()))
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_special_command("/mode write").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/mode write".to_string()));
    }

    #[test]
    fn test_clear_rejects_argument() {
        let err = parse_special_command("/clear all").unwrap_err();
        assert_eq!(
            err,
            CommandError::UnsupportedArgument {
                command: "/clear".to_string(),
                arg: "all".to_string(),
            }
        );
    }
}
