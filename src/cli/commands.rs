//! Command dispatch and execution

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::StructureService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Tree;
use crate::infrastructure::ServiceContainer;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|source| CliError::Io {
            context: "determine current directory".into(),
            source,
        })?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Structure {
            file,
            hierarchy,
            output,
            wrap,
            compact,
        }) => cmd_structure(
            &container,
            file,
            hierarchy.as_deref(),
            output.as_deref(),
            *wrap,
            *compact,
        ),
        Some(Commands::Batch {
            dir,
            hierarchy,
            output_dir,
        }) => cmd_batch(&container, dir, hierarchy.as_deref(), output_dir.as_deref()),
        Some(Commands::Tree { file, hierarchy }) => {
            cmd_tree(&container, file, hierarchy.as_deref())
        }
        Some(Commands::Check { hierarchy }) => cmd_check(&container, hierarchy.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&container, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "doctree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `doctree --help`".into(),
        )),
    }
}

/// `--hierarchy` wins over the configured default.
fn hierarchy_path(container: &ServiceContainer, arg: Option<&Path>) -> CliResult<PathBuf> {
    arg.map(Path::to_path_buf)
        .or_else(|| container.settings.hierarchy.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no hierarchy given: pass --hierarchy or set `hierarchy` in .doctree.toml".into(),
            )
        })
}

fn is_stdin(file: &Path) -> bool {
    file.as_os_str() == "-"
}

fn structure_input(service: &StructureService, file: &Path) -> CliResult<Tree> {
    if is_stdin(file) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Io {
                context: "read stdin".into(),
                source,
            })?;
        Ok(service.structure_text(&text)?)
    } else {
        Ok(service.structure_file(file)?)
    }
}

/// Serialize a tree, optionally wrapped as `{ <root name>: tree }`.
///
/// Serialized directly (not via `serde_json::Value`) to keep field order.
pub fn render_json(tree: &Tree, root_name: &str, wrap: bool, pretty: bool) -> CliResult<String> {
    if wrap {
        to_json(&BTreeMap::from([(root_name, tree)]), pretty)
    } else {
        to_json(tree, pretty)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CliResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn write_file(container: &ServiceContainer, path: &Path, content: &str) -> CliResult<()> {
    container
        .fs
        .ensure_parent(path)
        .and_then(|_| container.fs.write(path, content))
        .map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[instrument(level = "debug", skip(container))]
fn cmd_structure(
    container: &ServiceContainer,
    file: &Path,
    hierarchy: Option<&Path>,
    output: Option<&Path>,
    wrap: bool,
    compact: bool,
) -> CliResult<()> {
    let service = container.structure_service(&hierarchy_path(container, hierarchy)?)?;
    let tree = structure_input(&service, file)?;

    let settings = &container.settings;
    let json = render_json(
        &tree,
        &service.hierarchy().root().name,
        wrap || settings.wrap_root,
        settings.pretty && !compact,
    )?;

    match output {
        Some(path) => {
            write_file(container, path, &json)?;
            output::action("Written", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_batch(
    container: &ServiceContainer,
    dir: &Path,
    hierarchy: Option<&Path>,
    output_dir: Option<&Path>,
) -> CliResult<()> {
    let service = container.structure_service(&hierarchy_path(container, hierarchy)?)?;
    let settings = &container.settings;
    let outcomes = service.structure_dir(dir, &settings.extensions)?;

    if outcomes.is_empty() {
        output::warning(&format!(
            "no documents with extensions [{}] in {}",
            settings.extensions.join(", "),
            dir.display()
        ));
        return Ok(());
    }

    output::header(&format!("Structuring {} documents", outcomes.len()));
    let root_name = &service.hierarchy().root().name;
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(tree) => {
                let target = json_target(&outcome.path, dir, output_dir);
                let written = render_json(tree, root_name, settings.wrap_root, settings.pretty)
                    .and_then(|json| write_file(container, &target, &json));
                match written {
                    Ok(()) => output::document_ok(&outcome.path, tree.node_count(), &target),
                    Err(e) => {
                        failed += 1;
                        output::document_failed(&outcome.path, &e);
                    }
                }
            }
            Err(e) => {
                failed += 1;
                output::document_failed(&outcome.path, e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Partial {
            failed,
            total: outcomes.len(),
        });
    }
    output::success(&format!("{} documents structured", outcomes.len()));
    Ok(())
}

/// `<doc>.<ext>.json` next to the document, or mirrored below `output_dir`.
///
/// The source extension is kept so `civil.txt` and `civil.md` do not collide.
fn json_target(document: &Path, dir: &Path, output_dir: Option<&Path>) -> PathBuf {
    let base = match output_dir {
        Some(out) => out.join(document.strip_prefix(dir).unwrap_or(document)),
        None => document.to_path_buf(),
    };
    let mut target = base.into_os_string();
    target.push(".json");
    PathBuf::from(target)
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path, hierarchy: Option<&Path>) -> CliResult<()> {
    let service = container.structure_service(&hierarchy_path(container, hierarchy)?)?;
    let tree = structure_input(&service, file)?;
    output::info(&tree.to_termtree(&service.hierarchy().root().name));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_check(container: &ServiceContainer, hierarchy: Option<&Path>) -> CliResult<()> {
    let path = hierarchy_path(container, hierarchy)?;
    let hierarchy = container.hierarchy_loader().load(&path)?;

    output::header(&format!("{} ({})", hierarchy.root().name, path.display()));
    for level in hierarchy.levels() {
        output::level_row(
            level.rank(),
            level.name(),
            level.parent(),
            level.pattern(),
            hierarchy.is_leaf(level),
        );
    }
    output::success(&format!(
        "valid: {} levels, leaf '{}'",
        hierarchy.len(),
        hierarchy.leaf().name()
    ));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            write_file(container, &path, &Settings::template())?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail(&"global: <unavailable>"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(project_dir).display()
            ));
            Ok(())
        }
    }
}
