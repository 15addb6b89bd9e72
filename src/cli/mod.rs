//! Command line front end over [`FinanceTracker`](crate::FinanceTracker).

mod args;
mod commands;
pub mod output;

use std::env;

use strsim::levenshtein;
use tracing::debug;

pub use args::ParsedArgs;
pub use commands::Command;

use crate::{errors::CliError, FinanceTracker};

pub fn run_cli() -> Result<(), CliError> {
    run_with_args(env::args().skip(1))
}

pub fn run_with_args<I, S>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let parsed = ParsedArgs::parse(args)?;
    let Some(name) = parsed.command.as_deref() else {
        commands::print_usage();
        return Ok(());
    };
    let Some(command) = Command::from_name(name) else {
        if let Some(best) = suggest(name) {
            output::info(format!("Suggestion: `{best}`?"));
        }
        return Err(CliError::Input(format!("unknown command `{name}`")));
    };
    debug!(%command, positional = parsed.positional.len(), "dispatching command");

    let mut tracker = if command.is_static() {
        None
    } else {
        Some(FinanceTracker::open_default()?)
    };
    output::configure(
        tracker
            .as_ref()
            .map_or(true, |tracker| tracker.config().ui_color_enabled),
    );
    match tracker.as_mut() {
        Some(tracker) => commands::dispatch(command, &parsed, tracker),
        None => {
            commands::dispatch_static(command);
            Ok(())
        }
    }
}

/// Closest command name within an edit distance of three.
pub fn suggest(input: &str) -> Option<&'static str> {
    Command::ALL
        .into_iter()
        .map(|command| (levenshtein(command.name(), input), command.name()))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_near_misses_only() {
        assert_eq!(suggest("lst"), Some("list"));
        assert_eq!(suggest("imprt"), Some("import"));
        assert_eq!(suggest("xxxxxxxxxxxx"), None);
    }
}
