use clap::{Arg, ArgAction, Command};

pub fn with_args(command: Command) -> Command {
    // GIBITECA_LOG_LEVEL maps onto the -v count so both knobs share one arg;
    // explicit -v flags still win over the env default.
    let default_verbosity = match std::env::var("GIBITECA_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "warn" => "1",
        "info" => "2",
        "debug" => "3",
        "trace" => "4",
        _ => "0",
    };

    command.arg(
        Arg::new("verbosity")
            .short('v')
            .action(ArgAction::Count)
            .help(
                "Verbosity level: ERROR (default), -v WARN, -vv INFO, -vvv DEBUG, -vvvv TRACE [env: GIBITECA_LOG_LEVEL]",
            )
            .default_value(default_verbosity),
    )
}
