use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigFileOpts {
    #[arg(
        long,
        help = "Specify path of the TOML config file (default: .codeshare/codeshare.toml, then the user config dir).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Configuration"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file; use built-in defaults.",
        conflicts_with = "config_file",
        help_heading = "Configuration"
    )]
    pub disable_config_file: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bundle a project's structure and source into one Markdown file for AI chats.",
    long_about = "codeshare scans a directory (or a single file), selects files by extension and \nexclusion rules, and writes a Markdown context file with the directory structure, \nthe (truncated) file contents and your prompt, ready to paste into a chat.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  codeshare generate . -p \"Review the error handling\"\n  codeshare generate src/main.py --max-chars 2000\n  codeshare config --effective",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        about = "Generate the context file for a project or a single file."
    )]
    Generate(GenerateArgs),

    #[command(about = "Show the default or effective configuration as TOML.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH",
        help = "Project directory or single file (default: current dir)."
    )]
    pub path: Option<PathBuf>,

    #[arg(
        long,
        help = "Treat PATH as a single file (implied when PATH is a file).",
        help_heading = "Selection"
    )]
    pub file: bool,

    #[arg(
        long,
        value_name = "CHARS",
        help = "Character limit per file (overrides config).",
        help_heading = "Selection"
    )]
    pub max_chars: Option<usize>,

    #[arg(
        short = 'p',
        long,
        value_name = "TEXT",
        help = "Question/request appended to the context. Read from stdin when omitted.",
        help_heading = "Prompt"
    )]
    pub prompt: Option<String>,

    #[arg(
        long,
        help = "Accept an empty prompt.",
        help_heading = "Prompt"
    )]
    pub allow_empty_prompt: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file [default: context.md, or output.path from config].",
        help_heading = "Output Control",
        conflicts_with = "stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Write the context to standard output instead of a file.",
        help_heading = "Output Control"
    )]
    pub stdout: bool,

    #[clap(flatten)]
    pub config_file: ConfigFileOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Show the configuration that would be loaded for PATH instead of the defaults."
    )]
    pub effective: bool,

    #[arg(value_name = "PATH", help = "Project directory used to locate config files.")]
    pub path: Option<PathBuf>,

    #[clap(flatten)]
    pub config_file: ConfigFileOpts,
}
