//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_breakdown, output_history, output_result};
use ecosort_app::app::{ImageInput, ScanOptions, ScanService};
use ecosort_app::config::Config;
use ecosort_app::repository::open_history_store;
use ecosort_app::tips::{find_tip, TIPS};
use ecosort_store::category_breakdown;
use ecosort_types::{Error, OutputFormat, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Classify {
            image,
            no_save,
            timeout,
            structured,
        } => {
            config.structured_output |= *structured;
            cmd_classify(&config, image.clone(), !no_save, *timeout, output_format).await
        }

        Commands::History {
            limit,
            delete,
            clear,
        } => cmd_history(&config, *limit, delete.clone(), *clear, output_format),

        Commands::Stats => cmd_stats(&config, output_format),

        Commands::Tips { id } => cmd_tips(id.as_deref(), output_format),

        Commands::Config {
            show,
            set_model,
            set_api_base,
            set_api_key_env,
            set_structured,
            set_history_limit,
            set_output,
            reset,
        } => cmd_config(
            *show,
            set_model.clone(),
            set_api_base.clone(),
            set_api_key_env.clone(),
            *set_structured,
            *set_history_limit,
            *set_output,
            *reset,
        ),
    }
}

async fn cmd_classify(
    config: &Config,
    image: PathBuf,
    record: bool,
    timeout_secs: Option<u64>,
    output_format: OutputFormat,
) -> Result<()> {
    let input = ImageInput::from_path(&image)?;
    let service = ScanService::from_config(config)?;
    let options = ScanOptions::default()
        .with_record(record)
        .with_timeout(timeout_secs.map(Duration::from_secs));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analyzing {} ...", image.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = service.scan(&input, &options).await;
    spinner.finish_and_clear();

    let outcome = outcome?;
    output_result(output_format, &outcome.result)?;

    if output_format == OutputFormat::Table {
        match outcome.scan {
            Some(scan) => println!("\nSaved to history as {}", scan.id),
            None => println!("\nNot saved to history"),
        }
    }

    Ok(())
}

fn cmd_history(
    config: &Config,
    limit: usize,
    delete: Option<String>,
    clear: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let mut store = open_history_store(config)?;

    if clear {
        let removed = store.clear()?;
        println!("Removed {} scan(s) from history", removed);
        return Ok(());
    }

    if let Some(id) = delete {
        if !store.delete(&id)? {
            return Err(Error::NotFound(format!("scan {}", id)));
        }
        println!("Deleted scan {}", id);
        return Ok(());
    }

    output_history(output_format, store.entries(), limit)
}

fn cmd_stats(config: &Config, output_format: OutputFormat) -> Result<()> {
    let store = open_history_store(config)?;
    let slices = category_breakdown(store.entries());
    output_breakdown(output_format, &slices, store.len())
}

fn cmd_tips(id: Option<&str>, output_format: OutputFormat) -> Result<()> {
    let Some(id) = id else {
        if output_format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(TIPS)?);
            return Ok(());
        }

        println!("Tips & Tricks");
        println!("=============");
        for tip in TIPS {
            println!("[{}] {} ({})", tip.id, tip.title, tip.category);
            println!("    {}", tip.summary);
        }
        println!("\nShow an article with: ecosort tips <ID>");
        return Ok(());
    };

    let tip = find_tip(id).ok_or_else(|| Error::NotFound(format!("tip {}", id)))?;
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(tip)?);
    } else {
        println!("{}", tip.title);
        println!("{}", "=".repeat(tip.title.chars().count()));
        println!("{}\n", tip.category);
        println!("{}", tip.content);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_model: Option<String>,
    set_api_base: Option<String>,
    set_api_key_env: Option<String>,
    set_structured: Option<bool>,
    set_history_limit: Option<usize>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(model) = set_model {
        config.model = model;
        modified = true;
    }

    if let Some(api_base) = set_api_base {
        config.api_base = api_base;
        modified = true;
    }

    if let Some(var) = set_api_key_env {
        config.api_key_env = var;
        modified = true;
    }

    if let Some(structured) = set_structured {
        config.structured_output = structured;
        modified = true;
    }

    if let Some(limit) = set_history_limit {
        config.history_limit = limit.max(1);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
