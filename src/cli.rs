use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "term-desk",
    version = env!("CARGO_PKG_VERSION"),
    about = "A floating-panel desktop for the terminal"
)]
pub struct Cli {
    /// Directory holding storage.json. Defaults to the platform data dir.
    #[arg(long, value_name = "PATH", conflicts_with = "ephemeral")]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk.
    #[arg(long)]
    pub ephemeral: bool,

    #[arg(long, value_name = "LEVEL", default_value_t = Level::DEBUG)]
    pub log_level: Level,

    /// Open the debug log panel at start.
    #[arg(long)]
    pub debug_log: bool,

    /// Chat username to use when none is stored yet.
    #[arg(long, value_name = "NAME")]
    pub username: Option<String>,

    /// API key attached to outgoing chat messages.
    #[arg(long, value_name = "KEY")]
    pub chat_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["term-desk"]).unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);
        assert!(!cli.ephemeral);
        assert!(cli.data_dir.is_none());
        assert!(cli.chat_key.is_none());
    }

    #[test]
    fn parses_every_flag() {
        let cli = Cli::try_parse_from([
            "term-desk",
            "--data-dir",
            "/tmp/desk",
            "--log-level",
            "warn",
            "--debug-log",
            "--username",
            "ada",
            "--chat-key",
            "secret",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/desk")));
        assert_eq!(cli.log_level, Level::WARN);
        assert!(cli.debug_log);
        assert_eq!(cli.username.as_deref(), Some("ada"));
        assert_eq!(cli.chat_key.as_deref(), Some("secret"));
    }

    #[test]
    fn data_dir_conflicts_with_ephemeral() {
        assert!(Cli::try_parse_from(["term-desk", "--ephemeral", "--data-dir", "x"]).is_err());
    }
}
