use anyhow::{Context, Result};
use codeshare_core::{AppError, ContextGenerator, Mode};
use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file = File::create(path).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_summary(output_path: &Path, generator: &ContextGenerator, files_included: usize) {
    println!(
        "\n{} File generated: {}",
        "✅".green(),
        output_path.display().to_string().blue()
    );
    match (generator.root().mode(), generator.root().selected_file_name()) {
        (Mode::SingleFile, Some(name)) => {
            println!("{} File processed: {}", "📄".cyan(), name.bold());
        }
        _ => {
            println!(
                "{} {} files included",
                "📁".cyan(),
                files_included.to_string().bold()
            );
        }
    }
    println!("{}", "📋 Copy the content and paste it in the chat!".dimmed());
}
