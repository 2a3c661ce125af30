//! # CLI Layer
//!
//! This module is **one possible UI client** for keyraken, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, the secret prompt)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Validation**: Turn raw flags into a [`Request`]. JSON maps, logic and no-op
//!    updates are checked here, before the secret service is contacted
//! 3. **Dispatch**: Open the collection, run the use-case, relock if asked
//! 4. **Output Formatting**: JSON records and confirmation lines via `render`

use super::prompt::TerminalPrompt;
use super::render::{self, Rendered, Shape};
use super::setup::{Cli, Commands, SelectionArgs};
use keyrakenapp::api::KeyrakenApi;
use keyrakenapp::attributes::{parse_attribute_map, Filter, MapRole};
use keyrakenapp::commands::{update, CmdResult, CollectionContext};
use keyrakenapp::config::KeyrakenConfig;
use keyrakenapp::error::Result;
use keyrakenapp::model::Attributes;
use keyrakenapp::secret::SecretInput;
use keyrakenapp::store::dbus_backend::DbusBackend;
use keyrakenapp::store::SecretBackend;
use tracing::debug;

/// A fully validated invocation.
#[derive(Debug)]
pub enum Request {
    New { collection: String, password: bool },
    Item { collection: String, op: ItemOp },
}

/// An operation on the items of an existing collection.
#[derive(Debug)]
pub enum ItemOp {
    Create {
        label: String,
        attributes: Attributes,
        secret: SecretInput,
    },
    Read {
        filter: Filter,
        multiple: bool,
    },
    Update {
        filter: Filter,
        multiple: bool,
        new_attributes: Option<Attributes>,
        new_secret: SecretInput,
        replace: bool,
    },
    Delete {
        filter: Filter,
        multiple: bool,
        delete_attributes: Option<Attributes>,
    },
    List {
        secrets: bool,
    },
}

/// Global flags that apply around any request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    pub unlock: bool,
    pub relock: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = KeyrakenConfig::load();
    let lifecycle = Lifecycle {
        unlock: cli.unlock,
        relock: cli.relock || config.always_relock,
    };
    let request = prepare(cli.command, &config)?;
    debug!(?request, ?lifecycle, "request validated");

    let api = KeyrakenApi::new(DbusBackend::connect()?, Box::new(TerminalPrompt));
    let (result, shape) = execute(&api, request, lifecycle)?;

    let Rendered { stdout, stderr } = render::render(&result, shape, config.compact)?;
    eprint!("{}", stderr);
    print!("{}", stdout);
    Ok(())
}

/// Validate raw arguments. Never touches the backend.
pub fn prepare(command: Commands, config: &KeyrakenConfig) -> Result<Request> {
    let (collection, op) = match command {
        Commands::New {
            collection,
            password,
        } => {
            return Ok(Request::New {
                collection,
                password,
            })
        }
        Commands::Create {
            collection,
            label,
            attributes,
            secret,
        } => (
            collection,
            ItemOp::Create {
                label,
                attributes: parse_attribute_map(attributes.as_deref().unwrap_or(""), MapRole::Input)?,
                secret: SecretInput::for_create(secret),
            },
        ),
        Commands::Read {
            collection,
            selection,
        } => (
            collection,
            ItemOp::Read {
                multiple: selection.multiple,
                filter: build_filter(selection, config)?,
            },
        ),
        Commands::Update {
            collection,
            selection,
            new_secret,
            new_attributes,
            replace,
        } => {
            let new_attributes = new_attributes
                .map(|json| parse_attribute_map(&json, MapRole::Input))
                .transpose()?;
            let new_secret = SecretInput::for_update(new_secret);
            update::ensure_changes_requested(new_attributes.as_ref(), &new_secret)?;
            (
                collection,
                ItemOp::Update {
                    multiple: selection.multiple,
                    filter: build_filter(selection, config)?,
                    new_attributes,
                    new_secret,
                    replace,
                },
            )
        }
        Commands::Delete {
            collection,
            selection,
            delete_attributes,
        } => (
            collection,
            ItemOp::Delete {
                multiple: selection.multiple,
                filter: build_filter(selection, config)?,
                delete_attributes: delete_attributes
                    .map(|json| parse_attribute_map(&json, MapRole::Input))
                    .transpose()?,
            },
        ),
        Commands::List {
            collection,
            secrets,
        } => (collection, ItemOp::List { secrets }),
    };
    Ok(Request::Item { collection, op })
}

fn build_filter(selection: SelectionArgs, config: &KeyrakenConfig) -> Result<Filter> {
    let logic = match selection.logic {
        Some(arg) => arg.into(),
        None => config.logic()?,
    };
    let attributes = parse_attribute_map(
        selection.attributes.as_deref().unwrap_or(""),
        MapRole::Filter,
    )?;

    let mut filter = Filter::new(attributes).with_logic(logic);
    if let Some(label) = selection.label {
        filter = filter.with_label(label);
    }
    if let Some(path) = selection.path {
        filter = filter.with_path(path);
    }
    Ok(filter)
}

/// Run a validated request against `api`.
pub fn execute<B: SecretBackend>(
    api: &KeyrakenApi<B>,
    request: Request,
    lifecycle: Lifecycle,
) -> Result<(CmdResult, Shape)> {
    match request {
        Request::New {
            collection,
            password,
        } => {
            let result = api.new_collection(&collection, password)?;
            if lifecycle.relock {
                let ctx = api.open(&collection, false)?;
                api.relock(&ctx)?;
            }
            Ok((result, Shape::Messages))
        }
        Request::Item { collection, op } => {
            let ctx = api.open(&collection, lifecycle.unlock)?;
            let outcome = run_item_op(api, &ctx, op);
            api.finish(&ctx, lifecycle.relock, outcome)
        }
    }
}

fn run_item_op<B: SecretBackend>(
    api: &KeyrakenApi<B>,
    ctx: &CollectionContext,
    op: ItemOp,
) -> Result<(CmdResult, Shape)> {
    match op {
        ItemOp::Create {
            label,
            attributes,
            secret,
        } => Ok((
            api.create_item(ctx, &label, attributes, secret)?,
            Shape::Messages,
        )),
        ItemOp::Read { filter, multiple } => {
            let shape = if multiple { Shape::Many } else { Shape::Single };
            Ok((api.read_items(ctx, &filter, multiple)?, shape))
        }
        ItemOp::Update {
            filter,
            multiple,
            new_attributes,
            new_secret,
            replace,
        } => Ok((
            api.update_items(ctx, &filter, multiple, new_attributes, new_secret, replace)?,
            Shape::Messages,
        )),
        ItemOp::Delete {
            filter,
            multiple,
            delete_attributes,
        } => Ok((
            api.delete_items(ctx, &filter, multiple, delete_attributes.as_ref())?,
            Shape::Messages,
        )),
        ItemOp::List { secrets } => Ok((api.list_items(ctx, secrets)?, Shape::Many)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::setup::LogicArg;
    use clap::Parser;
    use keyrakenapp::attributes::Logic;
    use keyrakenapp::error::KeyrakenError;
    use keyrakenapp::secret::FixedSecret;
    use keyrakenapp::store::mem_backend::MemBackend;

    fn parse(args: &[&str]) -> Result<Request> {
        let mut argv = vec!["keyraken"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        prepare(cli.command, &KeyrakenConfig::default())
    }

    fn api() -> KeyrakenApi<MemBackend> {
        KeyrakenApi::new(
            MemBackend::with_collection("login"),
            Box::new(FixedSecret::new("prompted")),
        )
    }

    fn run_args(api: &KeyrakenApi<MemBackend>, args: &[&str]) -> Result<(CmdResult, Shape)> {
        execute(api, parse(args)?, Lifecycle::default())
    }

    #[test]
    fn test_malformed_filter_is_invalid_filter() {
        assert!(matches!(
            parse(&["read", "login", "--attributes", "{oops"]),
            Err(KeyrakenError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_non_string_new_attribute_is_invalid_input() {
        assert!(matches!(
            parse(&["update", "login", "--new_attributes", r#"{"n": 1}"#]),
            Err(KeyrakenError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_update_without_changes_fails_early() {
        assert!(matches!(
            parse(&["update", "login", "--attributes", r#"{"a":"b"}"#]),
            Err(KeyrakenError::NoOpUpdate)
        ));
    }

    #[test]
    fn test_logic_defaults_from_config() {
        let cli = Cli::try_parse_from(["keyraken", "read", "login"]).unwrap();
        let config = KeyrakenConfig {
            default_logic: "OR".to_string(),
            ..Default::default()
        };
        match prepare(cli.command, &config).unwrap() {
            Request::Item {
                op: ItemOp::Read { filter, .. },
                ..
            } => assert_eq!(filter.logic, Logic::Or),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_explicit_logic_wins_over_config() {
        let cli = Cli::try_parse_from(["keyraken", "read", "login", "--logic", "AND"]).unwrap();
        let config = KeyrakenConfig {
            default_logic: "bogus".to_string(),
            ..Default::default()
        };
        match prepare(cli.command, &config).unwrap() {
            Request::Item {
                op: ItemOp::Read { filter, .. },
                ..
            } => assert_eq!(filter.logic, Logic::from(LogicArg::And)),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_create_then_read_round_trip() {
        let api = api();
        run_args(
            &api,
            &["create", "login", "mail", "--attributes", r#"{"username":"u"}"#, "--secret", "s"],
        )
        .unwrap();

        let (result, shape) =
            run_args(&api, &["read", "login", "--attributes", r#"{"username":"u"}"#]).unwrap();
        assert_eq!(shape, Shape::Single);
        assert_eq!(result.listed_items[0].label, "mail");
        assert_eq!(result.listed_items[0].secret.as_deref(), Some("s"));
    }

    #[test]
    fn test_create_without_secret_prompts() {
        let api = api();
        run_args(&api, &["create", "login", "mail"]).unwrap();
        let (result, shape) = run_args(&api, &["list", "login", "--secrets"]).unwrap();
        assert_eq!(shape, Shape::Many);
        assert_eq!(result.listed_items[0].secret.as_deref(), Some("prompted"));
    }

    #[test]
    fn test_relock_runs_after_failure() {
        let api = api();
        let lifecycle = Lifecycle {
            unlock: false,
            relock: true,
        };
        let request = parse(&["read", "login", "--label", "missing"]).unwrap();
        assert!(matches!(
            execute(&api, request, lifecycle),
            Err(KeyrakenError::NotFound(_))
        ));

        let ctx = api.open("login", false).unwrap();
        assert!(api.backend().is_locked(&ctx.collection).unwrap());
    }

    #[test]
    fn test_unlock_then_relock() {
        let api = KeyrakenApi::new(MemBackend::new(), Box::new(FixedSecret::dismissed()));
        api.backend().add_collection("vault", true);

        assert!(matches!(
            run_args(&api, &["list", "vault"]),
            Err(KeyrakenError::CollectionLocked(_))
        ));

        let lifecycle = Lifecycle {
            unlock: true,
            relock: true,
        };
        let (result, _) = execute(&api, parse(&["list", "vault"]).unwrap(), lifecycle).unwrap();
        assert!(result.listed_items.is_empty());

        let ctx = api.open("vault", false).unwrap();
        assert!(api.backend().is_locked(&ctx.collection).unwrap());
    }

    #[test]
    fn test_new_collection() {
        let api = api();
        let (result, shape) = run_args(&api, &["new", "work"]).unwrap();
        assert_eq!(shape, Shape::Messages);
        assert!(result.messages[0].content.contains("'work' created"));
        assert!(matches!(
            run_args(&api, &["new", "work"]),
            Err(KeyrakenError::InvalidInput(_))
        ));
    }
}
