use crate::cli::actions::{server::Args, Action};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    Ok(Action::Server(Args { port }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action() -> Result<()> {
        let matches =
            commands::new().get_matches_from(vec!["gibiteca", "--port", "9090"]);
        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, 9090);
        Ok(())
    }
}
