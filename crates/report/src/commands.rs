//! Report command line.
//!
//! Each subcommand maps to one engine operation or one access-gate call. The
//! method names used by the mobile presentation layer are accepted as aliases.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "screen-timer", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print the report as single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Recently active apps, most recent first
    #[command(alias = "getRunningApps")]
    Recent,
    /// Daily usage of one app over the monthly lookback
    #[command(alias = "getMonthlyUsage")]
    Monthly {
        /// Package identifier, validated by the engine
        #[arg(value_name = "PACKAGE")]
        package: Option<String>,
    },
    /// Per-day totals across apps over the weekly lookback
    #[command(alias = "getWeeklyUsage")]
    Weekly,
    /// Report the usage-access grant state
    #[command(alias = "hasUsageAccess")]
    Access,
    /// Open the usage-access settings screen
    #[command(alias = "openUsageAccess")]
    OpenSettings,
    /// Any other presentation-layer method
    #[command(external_subcommand)]
    Unsupported(Vec<String>),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Self::Recent => "recent",
            Self::Monthly { .. } => "monthly",
            Self::Weekly => "weekly",
            Self::Access => "access",
            Self::OpenSettings => "open-settings",
            Self::Unsupported(args) => args.first().map(String::as_str).unwrap_or("unknown"),
        }
    }

    /// Whether the command reads usage data and needs the permission.
    pub fn requires_access(&self) -> bool {
        matches!(self, Self::Recent | Self::Monthly { .. } | Self::Weekly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("screen-timer").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(&["recent"]).unwrap(), Command::Recent);
        assert_eq!(parse(&["weekly"]).unwrap(), Command::Weekly);
        assert_eq!(parse(&["access"]).unwrap(), Command::Access);
        assert_eq!(parse(&["open-settings"]).unwrap(), Command::OpenSettings);
        assert_eq!(
            parse(&["monthly", "com.example.maps"]).unwrap(),
            Command::Monthly {
                package: Some("com.example.maps".to_string())
            }
        );
    }

    #[test]
    fn test_parse_presentation_aliases() {
        assert_eq!(parse(&["getRunningApps"]).unwrap(), Command::Recent);
        assert_eq!(parse(&["getWeeklyUsage"]).unwrap(), Command::Weekly);
        assert_eq!(parse(&["hasUsageAccess"]).unwrap(), Command::Access);
        assert_eq!(parse(&["openUsageAccess"]).unwrap(), Command::OpenSettings);
        assert_eq!(
            parse(&["getMonthlyUsage", "com.example.maps"]).unwrap(),
            Command::Monthly {
                package: Some("com.example.maps".to_string())
            }
        );
    }

    #[test]
    fn test_monthly_without_package_parses() {
        assert_eq!(
            parse(&["monthly"]).unwrap(),
            Command::Monthly { package: None }
        );
    }

    #[test]
    fn test_monthly_rejects_extra_arguments() {
        assert!(parse(&["monthly", "com.a", "com.b"]).is_err());
    }

    #[test]
    fn test_unknown_command_is_unsupported() {
        let command = parse(&["getBatteryStats", "--all"]).unwrap();
        assert_eq!(
            command,
            Command::Unsupported(vec!["getBatteryStats".to_string(), "--all".to_string()])
        );
        assert_eq!(command.name(), "getBatteryStats");
        assert!(!command.requires_access());
    }

    #[test]
    fn test_help_and_missing_command() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["screen-timer", "weekly", "--compact", "-vv"]).unwrap();
        assert!(cli.compact);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Command::Weekly);
    }

    #[test]
    fn test_requires_access() {
        assert!(Command::Recent.requires_access());
        assert!(Command::Weekly.requires_access());
        assert!(!Command::Access.requires_access());
        assert!(!Command::OpenSettings.requires_access());
    }
}
