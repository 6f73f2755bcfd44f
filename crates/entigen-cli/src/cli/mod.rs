//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "entigen",
    bin_name = "entigen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2699} Model-driven Jakarta project generation",
    long_about = "Entigen reads declarative JSON models (entities, API paths, \
                  views) and generates Java sources plus deployment descriptors, \
                  merging idempotently into an existing project.",
    after_help = "EXAMPLES:\n\
        \x20 entigen generate --model model.json\n\
        \x20 entigen generate --model model.json --api api.json --view view.json\n\
        \x20 entigen validate --model model.json\n\
        \x20 entigen completions bash > /usr/share/bash-completion/completions/entigen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a generation pass over the project directory.
    #[command(
        visible_alias = "gen",
        about = "Generate sources and descriptors from the models",
        after_help = "EXAMPLES:\n\
            \x20 entigen generate --model model.json\n\
            \x20 entigen generate -m model.json -p ./my-app --offline\n\
            \x20 entigen generate -m model.json --api api.json --payara-micro"
    )]
    Generate(GenerateArgs),

    /// Validate the model documents without writing anything.
    #[command(
        about = "Validate model documents",
        after_help = "EXAMPLES:\n\
            \x20 entigen validate --model model.json\n\
            \x20 entigen validate --model model.json --api api.json"
    )]
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 entigen completions bash > ~/.local/share/bash-completion/completions/entigen\n\
            \x20 entigen completions zsh  > ~/.zfunc/_entigen\n\
            \x20 entigen completions fish > ~/.config/fish/completions/entigen.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Entity and datasource model document.
    #[arg(
        short = 'm',
        long = "model",
        value_name = "FILE",
        default_value = "model.json",
        help = "Entity/datasource model document"
    )]
    pub model: PathBuf,

    /// API model document (optional).
    #[arg(long = "api", value_name = "FILE", help = "API model document")]
    pub api: Option<PathBuf>,

    /// View model document (optional).
    #[arg(long = "view", value_name = "FILE", help = "View model document")]
    pub view: Option<PathBuf>,

    /// Target project directory.
    #[arg(
        short = 'p',
        long = "project-dir",
        value_name = "DIR",
        default_value = ".",
        help = "Target project directory"
    )]
    pub project_dir: PathBuf,

    /// Provision for Payara Micro (post-boot command script) instead of
    /// the static resources descriptor.
    #[arg(
        long = "payara-micro",
        help = "Use the Payara Micro post-boot script variant"
    )]
    pub payara_micro: bool,

    /// Fail the run if any phase failed.
    #[arg(long = "strict", help = "Exit non-zero when any phase fails")]
    pub strict: bool,

    /// Use pinned driver versions and the built-in feature set; no network.
    #[arg(long = "offline", help = "Resolve drivers and features offline")]
    pub offline: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Entity and datasource model document.
    #[arg(
        short = 'm',
        long = "model",
        value_name = "FILE",
        default_value = "model.json",
        help = "Entity/datasource model document"
    )]
    pub model: PathBuf,

    /// API model document (optional).
    #[arg(long = "api", value_name = "FILE", help = "API model document")]
    pub api: Option<PathBuf>,

    /// View model document (optional).
    #[arg(long = "view", value_name = "FILE", help = "View model document")]
    pub view: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `entigen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
