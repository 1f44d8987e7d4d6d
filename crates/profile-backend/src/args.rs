use clap::Parser;
use config::args::ArgsConfig;

// Define main CLI arguments struct here, so that
// correct version and other information from Cargo.toml
// is added to CLI.

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub args: ArgsConfig,
}

pub fn get_config() -> ArgsConfig {
    Cli::parse().args
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use config::args::AppMode;

    use super::Cli;

    #[test]
    fn cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn arguments_are_parsed() {
        let cli = Cli::parse_from([
            "profile-backend",
            "--config-dir",
            "/tmp",
            "--public-api",
            "0.0.0.0:8080",
        ]);
        assert_eq!(cli.args.config_dir.unwrap().to_str(), Some("/tmp"));
        assert_eq!(cli.args.public_api.unwrap().port(), 8080);
        assert!(cli.args.mode.is_none());
    }

    #[test]
    fn open_api_subcommand_is_parsed() {
        let cli = Cli::parse_from(["profile-backend", "open-api"]);
        assert!(matches!(cli.args.mode, Some(AppMode::OpenApi)));
    }
}
