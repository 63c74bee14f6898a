use crate::cli_args::GenerateArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use codeshare_core::{AppError, ContextGenerator, Mode};
use colored::Colorize;
use log;
use std::env;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let target = match &args.path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    log::info!("Target path: {}", target.display());

    let config = load_config_for_command(&config_lookup_dir(&target), &args.config_file)
        .context("Failed to load configuration")?;

    let generator = ContextGenerator::from_config(&target, args.file, &config, args.max_chars)
        .with_context(|| format!("Cannot generate context for {}", target.display()))?;

    let prompt = match args.prompt.clone() {
        Some(prompt) => prompt,
        None => collect_prompt(&generator).context("Failed to read prompt")?,
    };
    if prompt.trim().is_empty() && !args.allow_empty_prompt {
        return Err(AppError::InvalidArgument(
            "The prompt is empty. Pass --prompt or --allow-empty-prompt.".to_string(),
        )
        .into());
    }

    let artifact = generator.generate(&prompt);
    let content = artifact.render();

    if args.stdout {
        return output::write_to_stdout(&content);
    }

    let output_path: PathBuf = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.path.clone());
    output::write_to_file(&output_path, &content)?;
    if !quiet {
        output::print_summary(&output_path, &generator, artifact.files_included);
    }
    Ok(())
}

/// Directory searched for a project config file: the target itself, or the
/// parent of a single file.
fn config_lookup_dir(target: &Path) -> PathBuf {
    if target.is_file() {
        target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        target.to_path_buf()
    }
}

fn collect_prompt(generator: &ContextGenerator) -> Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        log::debug!("Reading prompt from piped stdin.");
        let mut prompt = String::new();
        stdin.lock().read_to_string(&mut prompt)?;
        return Ok(prompt.trim_end_matches(&['\r', '\n'] as &[char]).to_string());
    }

    let question = match (generator.root().mode(), generator.root().selected_file_name()) {
        (Mode::SingleFile, Some(name)) => {
            format!("Enter your question/request for the file '{}': ", name)
        }
        _ => "Enter your question/request: ".to_string(),
    };
    let mut stderr = io::stderr();
    write!(stderr, "\n{} {}", "💡".yellow(), question.bold())?;
    stderr.flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'] as &[char]).to_string())
}
