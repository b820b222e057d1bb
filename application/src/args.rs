//! [`Args`] definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Console of the Nachos admin dashboard.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Signs in, persisting the session tokens.
    Login {
        /// Email of the user.
        #[arg(long)]
        email: String,

        /// Password of the user.
        #[arg(long, env = "NACHOS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Signs out, forgetting the session tokens.
    Logout,

    /// Prints a page of a collection as JSON lines.
    List {
        /// Collection to list.
        entity: Entity,

        /// Number of the page to print.
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Number of items per page.
        #[arg(long)]
        page_size: Option<u32>,

        /// Free-text search term.
        #[arg(long)]
        search: Option<String>,

        /// Entity-specific filter, as `key=value`.
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
}

/// Collection of the admin API.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Entity {
    /// Registered users.
    Users,

    /// Permission groups.
    Groups,

    /// Movie catalog.
    Movies,

    /// Published posts.
    Posts,

    /// Feedback messages.
    Feedback,
}

/// Parses a `key=value` filter.
fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected `key=value`, got `{raw}`"))
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::{parse_filter, Args, Command, Entity};

    #[test]
    fn parses_filters() {
        assert_eq!(
            parse_filter("is_staff=true"),
            Ok(("is_staff".into(), "true".into())),
        );
        assert_eq!(
            parse_filter("email=a=b"),
            Ok(("email".into(), "a=b".into())),
        );
        assert_eq!(parse_filter(" rating =").unwrap().0, "rating");
        assert!(parse_filter("is_staff").is_err());
        assert!(parse_filter("=true").is_err());
    }

    #[test]
    fn parses_list_command() {
        let args = Args::try_parse_from([
            "nachos",
            "list",
            "users",
            "--page",
            "2",
            "--filter",
            "is_active=true",
            "--filter",
            "is_staff=all",
        ])
        .unwrap();

        assert_eq!(args.config, "config.toml");
        let Command::List {
            entity,
            page,
            page_size,
            search,
            filters,
        } = args.command
        else {
            panic!("expected `list` command");
        };
        assert_eq!(entity, Entity::Users);
        assert_eq!(page, 2);
        assert_eq!(page_size, None);
        assert_eq!(search, None);
        assert_eq!(filters.len(), 2);
    }
}
