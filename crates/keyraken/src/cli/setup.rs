use clap::{Args, Parser, Subcommand, ValueEnum};
use keyrakenapp::attributes::Logic;

#[derive(Parser, Debug)]
#[command(
    name = "keyraken",
    bin_name = "keyraken",
    version,
    disable_help_subcommand = true,
    after_help = "Attribute maps are flat JSON objects, e.g. --attributes '{\"username\": \"alice\"}'"
)]
#[command(about = "Store and query secrets in your desktop keyring", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Unlock the collection via the service prompt before running the command
    #[arg(long, global = true, help_heading = "Options")]
    pub unlock: bool,

    /// Lock the collection again once the command has run
    #[arg(long, global = true, help_heading = "Options")]
    pub relock: bool,

    /// Log backend activity to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new keyring collection
    #[command(display_order = 1)]
    New {
        /// Name of the new keyring collection
        collection: String,

        /// Ask the service to protect the collection with a password
        #[arg(long)]
        password: bool,
    },

    /// Create a new item in the collection
    #[command(display_order = 2)]
    Create {
        /// Name of the keyring collection
        collection: String,

        /// Label of the item
        label: String,

        /// Attributes of the item in JSON format
        #[arg(long)]
        attributes: Option<String>,

        /// Secret of the item (prompted for when missing or empty)
        #[arg(long)]
        secret: Option<String>,
    },

    /// Read one item, or several with --multiple
    #[command(display_order = 3)]
    Read {
        /// Name of the keyring collection
        collection: String,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Update attributes and/or the secret of selected items
    #[command(display_order = 4)]
    Update {
        /// Name of the keyring collection
        collection: String,

        #[command(flatten)]
        selection: SelectionArgs,

        /// New secret of the item (an empty value prompts for it)
        #[arg(long = "new_secret")]
        new_secret: Option<String>,

        /// New attributes of the item in JSON format
        #[arg(long = "new_attributes")]
        new_attributes: Option<String>,

        /// Replace all attributes instead of merging (the schema attribute is kept)
        #[arg(long)]
        replace: bool,
    },

    /// Delete selected items, or only some of their attributes
    #[command(display_order = 5)]
    Delete {
        /// Name of the keyring collection
        collection: String,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Attributes to delete from the item in JSON format (values are ignored)
        #[arg(long = "delete_attributes")]
        delete_attributes: Option<String>,
    },

    /// List all items of a collection
    #[command(alias = "ls", display_order = 6)]
    List {
        /// Name of the keyring collection
        collection: String,

        /// Include secrets in the output
        #[arg(long)]
        secrets: bool,
    },
}

/// Item selection flags shared by read, update and delete.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Attributes to match in JSON format
    #[arg(long)]
    pub attributes: Option<String>,

    /// Label of the item
    #[arg(long)]
    pub label: Option<String>,

    /// Object path of the item
    #[arg(long)]
    pub path: Option<String>,

    /// How constraints combine (defaults to the configured logic, AND out of the box)
    #[arg(long, value_enum, ignore_case = true)]
    pub logic: Option<LogicArg>,

    /// Act on every match instead of requiring exactly one
    #[arg(long)]
    pub multiple: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogicArg {
    #[value(name = "AND")]
    And,
    #[value(name = "OR")]
    Or,
}

impl From<LogicArg> for Logic {
    fn from(arg: LogicArg) -> Self {
        match arg {
            LogicArg::And => Logic::And,
            LogicArg::Or => Logic::Or,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_with_underscore_flags() {
        let cli = Cli::try_parse_from([
            "keyraken",
            "update",
            "login",
            "--attributes",
            r#"{"username":"u"}"#,
            "--new_secret",
            "s",
            "--logic",
            "or",
            "--relock",
        ])
        .unwrap();

        assert!(cli.relock);
        match cli.command {
            Commands::Update {
                collection,
                selection,
                new_secret,
                new_attributes,
                replace,
            } => {
                assert_eq!(collection, "login");
                assert_eq!(selection.logic, Some(LogicArg::Or));
                assert_eq!(new_secret.as_deref(), Some("s"));
                assert!(new_attributes.is_none());
                assert!(!replace);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_logic_is_rejected() {
        let err = Cli::try_parse_from(["keyraken", "read", "login", "--logic", "XOR"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_create_takes_positional_label() {
        let cli = Cli::try_parse_from(["keyraken", "create", "login", "mail"]).unwrap();
        match cli.command {
            Commands::Create { label, secret, .. } => {
                assert_eq!(label, "mail");
                assert!(secret.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
