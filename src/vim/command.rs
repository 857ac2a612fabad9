use thiserror::Error;

/// Commands accepted on the `:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Submit the active step (same as Enter in normal mode).
    Submit,
    Previous,
    /// Wipe all answers and return to the first step.
    Clear,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.trim().to_lowercase();
    let cmd = input.split_whitespace().next().unwrap_or("");

    match cmd {
        "next" | "n" | "submit" | "w" => Ok(Command::Submit),
        "prev" | "previous" | "p" | "back" | "b" => Ok(Command::Previous),
        "clear" | "reset" => Ok(Command::Clear),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "" => Err(CommandError::Unknown("empty command".to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!(parse_command("next"), Ok(Command::Submit));
        assert_eq!(parse_command(" W "), Ok(Command::Submit));
        assert_eq!(parse_command("back"), Ok(Command::Previous));
        assert_eq!(parse_command("reset"), Ok(Command::Clear));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(
            parse_command("launch"),
            Err(CommandError::Unknown("launch".to_string()))
        );
        assert!(parse_command("   ").is_err());
    }
}
