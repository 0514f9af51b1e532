//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{AppError, InputShape, Loader};
use crate::cli::args::{Cli, Commands, ConfigCommands, TreeStyle, ViewArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeId, TreeStore, ViewOptions};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let shape = cli.input.unwrap_or(settings.input);
    let loader = Loader::new(settings.schema.clone());
    debug!("input shape: {:?}", shape);

    match &cli.command {
        Some(Commands::Tree {
            file,
            view,
            style,
            collapsed,
        }) => cmd_tree(&loader, &settings, file, shape, view, *style, *collapsed),
        Some(Commands::Flat { file, view }) => cmd_flat(&loader, file, shape, view),
        Some(Commands::Nested { file, view }) => cmd_nested(&loader, file, shape, view),
        Some(Commands::Crumbs { file, id }) => cmd_crumbs(&loader, file, shape, id),
        Some(Commands::Children { file, id, view }) => cmd_children(&loader, file, shape, id, view),
        Some(Commands::NestedSet { file }) => cmd_nested_set(&loader, file, shape),
        Some(Commands::Export {
            file,
            output,
            nested_set,
        }) => cmd_export(&loader, file, shape, output.as_deref(), *nested_set),
        Some(Commands::Config { command }) => cmd_config(&settings, command, cli.config.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage("no command given, see --help".to_string())),
    }
}

/// Loads the store and checks that the view's start node exists.
fn load_for_view(loader: &Loader, file: &Path, shape: InputShape, options: &ViewOptions) -> CliResult<TreeStore> {
    let store = loader.load(file, shape)?;
    if let Some(start) = &options.start {
        store.breadcrumb_of(start)?;
    }
    Ok(store)
}

fn print_json(value: &Value) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| AppError::OperationFailed {
        context: "serialize output".to_string(),
        source: Box::new(e),
    })?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(loader, settings))]
fn cmd_tree(
    loader: &Loader,
    settings: &Settings,
    file: &Path,
    shape: InputShape,
    view: &ViewArgs,
    style: TreeStyle,
    collapsed: bool,
) -> CliResult<()> {
    let options = view.to_options();
    let store = load_for_view(loader, file, shape, &options)?;
    let forest = store.nested_view(&options);
    if forest.is_empty() {
        output::detail(&"(empty)");
        return Ok(());
    }

    match style {
        TreeStyle::Termtree => match forest.as_slice() {
            [root] => output::info(&root.to_tree_string(&settings.label)),
            roots => output::info(&roots.to_tree_string(&settings.label)),
        },
        TreeStyle::Icons => {
            for line in forest.to_lines(&settings.label) {
                if collapsed && !line.visible {
                    continue;
                }
                output::tree_line(&line);
            }
        }
    }
    Ok(())
}

#[instrument(skip(loader))]
fn cmd_flat(loader: &Loader, file: &Path, shape: InputShape, view: &ViewArgs) -> CliResult<()> {
    let options = view.to_options();
    let store = load_for_view(loader, file, shape, &options)?;
    let records = store
        .flat_view(&options)
        .iter()
        .map(|entry| Value::Object(entry.to_record(loader.schema())))
        .collect();
    print_json(&Value::Array(records))
}

#[instrument(skip(loader))]
fn cmd_nested(loader: &Loader, file: &Path, shape: InputShape, view: &ViewArgs) -> CliResult<()> {
    let options = view.to_options();
    let store = load_for_view(loader, file, shape, &options)?;
    let records = store
        .nested_view(&options)
        .iter()
        .map(|node| Value::Object(node.to_record(loader.schema())))
        .collect();
    print_json(&Value::Array(records))
}

#[instrument(skip(loader))]
fn cmd_crumbs(loader: &Loader, file: &Path, shape: InputShape, id: &str) -> CliResult<()> {
    let store = loader.load(file, shape)?;
    let crumbs = store.breadcrumb_of(&NodeId::from(id))?;
    output::info(&crumbs.iter().join(" > "));
    Ok(())
}

#[instrument(skip(loader))]
fn cmd_children(loader: &Loader, file: &Path, shape: InputShape, id: &str, view: &ViewArgs) -> CliResult<()> {
    let options = view.to_options();
    let store = loader.load(file, shape)?;
    let records = store
        .children_of(&NodeId::from(id), &options)?
        .iter()
        .map(|node| Value::Object(node.to_record(loader.schema())))
        .collect();
    print_json(&Value::Array(records))
}

#[instrument(skip(loader))]
fn cmd_nested_set(loader: &Loader, file: &Path, shape: InputShape) -> CliResult<()> {
    let mut store = loader.load(file, shape)?;
    store.recompute_nested_set();

    output::header(&"id\tleft\tright");
    for node in &store {
        let bound = |b: Option<u64>| b.map_or_else(|| "-".to_string(), |v| v.to_string());
        output::info(&format!("{}\t{}\t{}", node.id, bound(node.left), bound(node.right)));
    }
    Ok(())
}

#[instrument(skip(loader))]
fn cmd_export(
    loader: &Loader,
    file: &Path,
    shape: InputShape,
    target: Option<&Path>,
    nested_set: bool,
) -> CliResult<()> {
    let mut store = loader.load(file, shape)?;
    if nested_set {
        store.recompute_nested_set();
    }
    match target {
        Some(path) => {
            loader.write_snapshot(&store, path)?;
            output::detail(&format!("wrote {} nodes to {}", store.len(), path.display()));
        }
        None => output::info(&loader.snapshot_json(&store)?),
    }
    Ok(())
}

fn cmd_config(settings: &Settings, command: &ConfigCommands, local: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info(&"global: (no config directory)"),
            }
            if let Some(local) = local {
                output::info(&format!("local:  {}", local.display()));
            }
        }
    }
    Ok(())
}
