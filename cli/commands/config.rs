use crate::cli_args::ConfigArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use codeshare_core::Config;
use log;
use std::env;

pub fn handle_config_command(args: &ConfigArgs) -> Result<()> {
    let config = if args.effective {
        let project_dir = match &args.path {
            Some(path) => path.clone(),
            None => env::current_dir().context("Failed to get current directory")?,
        };
        log::debug!("Showing effective config for {}", project_dir.display());
        load_config_for_command(&project_dir, &args.config_file)?
    } else {
        log::debug!("Showing default config.");
        Config::default()
    };
    let text = config
        .to_toml_string()
        .context("Failed to serialize configuration")?;
    output::write_to_stdout(&text)
}
