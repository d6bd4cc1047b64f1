//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::Outline;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::display::TreeDisplay;
use crate::domain::TreeModelRegistry;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let dir = cli.dir.clone().or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(dir.as_deref())?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Some(Commands::Show { file, ids }) => cmd_show(&settings, file.as_deref(), *ids),
        Some(Commands::Walk { file }) => cmd_walk(&settings, file.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&settings, command, dir.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

/// Explicit file first, then the `outline` setting.
pub fn resolve_outline(settings: &Settings, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.outline.clone())
        .ok_or_else(|| {
            CliError::Usage("no outline file given and no `outline` setting configured".into())
        })
}

/// Loads an outline file into a fresh registry.
#[instrument(level = "debug")]
pub fn load_registry(path: &Path) -> CliResult<TreeModelRegistry> {
    let outline = Outline::load(path)?;
    let registry = TreeModelRegistry::new();
    outline.register(&registry)?;
    Ok(registry)
}

fn cmd_show(settings: &Settings, file: Option<&Path>, ids: bool) -> CliResult<()> {
    let path = resolve_outline(settings, file)?;
    let registry = load_registry(&path)?;

    let mut opts = settings.display_options();
    opts.show_ids |= ids;
    output::info(&registry.to_tree_string(&opts));
    Ok(())
}

fn cmd_walk(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_outline(settings, file)?;
    let registry = load_registry(&path)?;
    let opts = settings.display_options();

    for entry in registry.snapshot() {
        let indent = "  ".repeat(entry.depth - 1);
        let row = format!("{}{}", indent, opts.row(&entry.id, &entry.node));
        let parent = if entry.parent_id.is_root() {
            "root".to_string()
        } else {
            entry.parent_id.short(opts.id_width).to_string()
        };
        output::annotated(
            &row,
            &format!("{} ({})", entry.id.short(opts.id_width), parent),
        );
    }
    Ok(())
}

fn cmd_config(settings: &Settings, command: &ConfigCommands, dir: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective configuration");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            output::action("global", &global);
            if let Some(dir) = dir {
                output::action("local", &local_config_path(dir).display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_no_file_and_no_setting_when_resolving_then_usage_error() {
        let err = resolve_outline(&Settings::default(), None).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn given_setting_when_resolving_without_file_then_setting_is_used() {
        let settings = Settings {
            outline: Some(PathBuf::from("/tmp/o.toml")),
            ..Default::default()
        };
        assert_eq!(
            resolve_outline(&settings, None).unwrap(),
            PathBuf::from("/tmp/o.toml")
        );
        assert_eq!(
            resolve_outline(&settings, Some(Path::new("x.toml"))).unwrap(),
            PathBuf::from("x.toml")
        );
    }

    #[test]
    fn given_outline_file_when_loading_registry_then_all_entries_are_registered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("outline.toml");
        fs::write(
            &path,
            "[[node]]\nlabel = \"a\"\n[[node.children]]\nlabel = \"b\"\n[[node]]\nlabel = \"c\"\n",
        )
        .unwrap();

        let registry = load_registry(&path).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.children_of(&crate::domain::NodeId::ROOT).len(), 2);
    }

    #[test]
    fn given_missing_file_when_loading_registry_then_application_error() {
        let err = load_registry(Path::new("/nonexistent/outline.toml")).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}
