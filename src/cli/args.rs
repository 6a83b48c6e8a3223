//! Command-line argument parsing for the classbook CLI.

use crate::api::DayOfWeek;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Sign in and persist the session
    Login { email: String, password: String },
    /// Forget the persisted session
    Logout,
    /// Show the signed-in user's profile
    WhoAmI,
    /// Schedules for a day, optionally for one class
    Schedule {
        day: DayOfWeek,
        class_name: Option<String>,
    },
    /// News feed, optionally filtered by a search query
    News { query: Option<String> },
    /// The signed-in student's grades, optionally for one subject
    Grades { subject: Option<String> },
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments that could not be parsed
    Invalid(String),
}

/// Usage text printed by `help` and after invalid input.
pub const USAGE: &str = "\
Usage: classbook <command>

Commands:
  login <email> <password>   Sign in
  logout                     Sign out
  whoami                     Show your profile
  schedule <day> [class]     Show schedules for a day
  news [query]               Show or search news
  grades [subject]           Show your grades
  version                    Show version";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use classbook::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["classbook".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match (command.as_str(), rest) {
        ("--version" | "-V" | "version", _) => CliCommand::Version,
        ("--help" | "-h" | "help", _) => CliCommand::Help,
        ("login", [email, password]) => CliCommand::Login {
            email: email.clone(),
            password: password.clone(),
        },
        ("login", _) => CliCommand::Invalid("login needs <email> <password>".to_string()),
        ("logout", []) => CliCommand::Logout,
        ("whoami", []) => CliCommand::WhoAmI,
        ("logout" | "whoami", _) => CliCommand::Invalid(format!("{} takes no arguments", command)),
        ("schedule", [day, class @ ..]) if class.len() <= 1 => match day.parse::<DayOfWeek>() {
            Ok(day) => CliCommand::Schedule {
                day,
                class_name: class.first().cloned(),
            },
            Err(e) => CliCommand::Invalid(e),
        },
        ("schedule", _) => CliCommand::Invalid("schedule needs <day> [class]".to_string()),
        ("news", query) => CliCommand::News {
            query: joined(query),
        },
        ("grades", subject) => CliCommand::Grades {
            subject: joined(subject),
        },
        (other, _) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

/// Join the remaining words, so `news exam week` searches "exam week".
fn joined(words: &[String]) -> Option<String> {
    let text = words.join(" ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
