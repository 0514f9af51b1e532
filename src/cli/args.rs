//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::InputShape;
use crate::domain::{NodeId, ViewOptions};

/// Flat/nested hierarchy conversion with breadcrumbs, tree-line glyphs and nested-set bounds
#[derive(Parser, Debug)]
#[command(name = "treeline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Shape of the input file (default from config)
    #[arg(short, long, global = true, value_enum)]
    pub input: Option<InputShape>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Filters shared by the view commands
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Only show this node and its descendants
    #[arg(short, long)]
    pub start: Option<String>,

    /// Deepest level shown (0 = roots only)
    #[arg(long)]
    pub depth: Option<usize>,

    /// Selected node (repeatable)
    #[arg(long = "select")]
    pub select: Vec<String>,
}

impl ViewArgs {
    pub fn to_options(&self) -> ViewOptions {
        ViewOptions {
            selection: self.select.iter().map(|s| NodeId::from(s.as_str())).collect(),
            start: self.start.as_deref().map(NodeId::from),
            depth_limit: self.depth,
        }
    }
}

/// How `tree` draws the hierarchy
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// Glyphs computed from sibling flags
    #[default]
    Icons,
    /// termtree rendering
    Termtree,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the hierarchy
    Tree {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        /// Rendering style
        #[arg(long, value_enum, default_value_t = TreeStyle::Icons)]
        style: TreeStyle,
        /// Hide nodes not visible for the selection
        #[arg(long)]
        collapsed: bool,
    },

    /// Print annotated flat records as JSON
    Flat {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print nested records as JSON
    Nested {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print the ancestor path of a node
    Crumbs {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// Print the children of a node as nested JSON
    Children {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Compute nested-set bounds
    NestedSet {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Write a snapshot for later restore (--input snapshot)
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Include nested-set bounds
        #[arg(long)]
        nested_set: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}
