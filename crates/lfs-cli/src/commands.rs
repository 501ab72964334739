use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use lfs_store::{AllowAll, MetaStore, MetadataStore, StoreConfig};
use lfs_types::{MetaObject, RequestVars};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.db.as_deref())?;
    // Local file access is the admin credential.
    let store = MetaStore::open(&config, AllowAll)
        .with_context(|| format!("opening metadata store {}", config.path.display()))?;
    let mut stdout = std::io::stdout().lock();
    let result = dispatch(&store, cli.command, cli.format, &mut stdout);
    store.close();
    result
}

fn resolve_config(config: Option<&Path>, db: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let mut resolved = match config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(db) = db {
        resolved.path = db.to_path_buf();
    }
    Ok(resolved)
}

fn dispatch(
    store: &dyn MetadataStore,
    command: Command,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::User(args) => cmd_user(store, args.action, format, out),
        Command::Object(args) => cmd_object(store, args.action, format, out),
    }
}

fn cmd_user(
    store: &dyn MetadataStore,
    action: UserAction,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        UserAction::Add { name, password } => {
            store.add_user(&name, &password)?;
            writeln!(out, "{} Added user {}", "✓".green().bold(), name.bold())?;
        }
        UserAction::Delete { name } => {
            store.delete_user(&name)?;
            writeln!(out, "Deleted user {}", name.bold())?;
        }
        UserAction::List => {
            let users = store.users()?;
            match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&users)?)?,
                OutputFormat::Text if users.is_empty() => writeln!(out, "No users.")?,
                OutputFormat::Text => {
                    for user in &users {
                        writeln!(out, "{}", user.name)?;
                    }
                }
            }
        }
        UserAction::Verify { name, password } => {
            let valid = store.verify_user(&name, &password)?;
            match format {
                OutputFormat::Json => {
                    let verdict = serde_json::json!({ "name": name, "valid": valid });
                    writeln!(out, "{verdict}")?
                }
                OutputFormat::Text if valid => writeln!(
                    out,
                    "{} Credential valid for {}",
                    "✓".green().bold(),
                    name.bold()
                )?,
                OutputFormat::Text => writeln!(
                    out,
                    "{} Credential rejected for {}",
                    "✗".red().bold(),
                    name.bold()
                )?,
            }
        }
    }
    Ok(())
}

fn cmd_object(
    store: &dyn MetadataStore,
    action: ObjectAction,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        ObjectAction::Get { oid } => {
            let meta = store.get(&RequestVars::new(oid, 0))?;
            print_object(&meta, format, out)?;
        }
        ObjectAction::Put { oid, size } => {
            let meta = store.put(&RequestVars::new(oid, size))?;
            match format {
                OutputFormat::Json => print_object(&meta, format, out)?,
                OutputFormat::Text if meta.existing => writeln!(
                    out,
                    "Object {} already registered ({} bytes)",
                    meta.oid.yellow(),
                    meta.size
                )?,
                OutputFormat::Text => writeln!(
                    out,
                    "{} Registered {} ({} bytes)",
                    "✓".green().bold(),
                    meta.oid.yellow(),
                    meta.size
                )?,
            }
        }
        ObjectAction::List => {
            let objects = store.objects()?;
            match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&objects)?)?,
                OutputFormat::Text if objects.is_empty() => writeln!(out, "No objects.")?,
                OutputFormat::Text => {
                    for meta in &objects {
                        writeln!(out, "{}  {}", meta.oid.yellow(), meta.size)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_object(
    meta: &MetaObject,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(meta)?)?,
        OutputFormat::Text => writeln!(out, "{}  {}", meta.oid.yellow(), meta.size)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfs_store::MetaError;
    use lfs_types::MetaUser;

    fn run(store: &MetaStore, command: Command, format: OutputFormat) -> anyhow::Result<String> {
        let mut out = Vec::new();
        dispatch(store, command, format, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn user(action: UserAction) -> Command {
        Command::User(UserArgs { action })
    }

    fn object(action: ObjectAction) -> Command {
        Command::Object(ObjectArgs { action })
    }

    #[test]
    fn user_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetaStore::open_path(dir.path().join("meta.db"), AllowAll).unwrap();

        let add = user(UserAction::Add {
            name: "bob".into(),
            password: "secret".into(),
        });
        run(&store, add, OutputFormat::Text).unwrap();
        let listed = run(&store, user(UserAction::List), OutputFormat::Json).unwrap();
        let users: Vec<MetaUser> = serde_json::from_str(&listed).unwrap();
        assert_eq!(users, vec![MetaUser::new("bob")]);

        let verify = user(UserAction::Verify {
            name: "bob".into(),
            password: "secret".into(),
        });
        let verdict = run(&store, verify, OutputFormat::Json).unwrap();
        let verdict: serde_json::Value = serde_json::from_str(&verdict).unwrap();
        assert_eq!(verdict["valid"], true);

        let delete = user(UserAction::Delete { name: "bob".into() });
        run(&store, delete, OutputFormat::Text).unwrap();
        let listed = run(&store, user(UserAction::List), OutputFormat::Text).unwrap();
        assert_eq!(listed.trim(), "No users.");
    }

    #[test]
    fn object_put_get_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetaStore::open_path(dir.path().join("meta.db"), AllowAll).unwrap();

        let put = object(ObjectAction::Put {
            oid: "abc123".into(),
            size: 42,
        });
        let created = run(&store, put, OutputFormat::Json).unwrap();
        let created: MetaObject = serde_json::from_str(&created).unwrap();
        assert_eq!(created, MetaObject::new("abc123", 42));

        let put = object(ObjectAction::Put {
            oid: "abc123".into(),
            size: 7,
        });
        let again = run(&store, put, OutputFormat::Json).unwrap();
        let again: MetaObject = serde_json::from_str(&again).unwrap();
        assert!(again.existing);
        assert_eq!(again.size, 42);

        let listed = run(&store, object(ObjectAction::List), OutputFormat::Text).unwrap();
        assert!(listed.contains("abc123"));
        assert!(listed.contains("42"));
    }

    #[test]
    fn object_get_missing_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetaStore::open_path(dir.path().join("meta.db"), AllowAll).unwrap();

        let get = object(ObjectAction::Get { oid: "nope".into() });
        let err = run(&store, get, OutputFormat::Text).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetaError>(),
            Some(MetaError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn db_flag_overrides_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lfs.toml");
        std::fs::write(&file, "path = \"from-config.db\"\n").unwrap();

        let from_config = resolve_config(Some(file.as_path()), None).unwrap();
        assert_eq!(from_config.path, Path::new("from-config.db"));

        let overridden =
            resolve_config(Some(file.as_path()), Some(Path::new("flag.db"))).unwrap();
        assert_eq!(overridden.path, Path::new("flag.db"));

        let defaults = resolve_config(None, None).unwrap();
        assert_eq!(defaults, StoreConfig::default());
    }
}
