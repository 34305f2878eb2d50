use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, write_config, Config, Representative};
use crate::scoring::{validate_sales_config, SalesConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Optional free-text answer; empty input means "not set"
fn prompt_optional(message: &str) -> Result<Option<String>> {
    let input = prompt(&format!("{} (leave empty to skip): ", message))?;
    Ok(if input.is_empty() { None } else { Some(input) })
}

/// Parse a scoring weight in the 0-1 range
fn parse_weight(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", input))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0-1", value))
    }
}

/// Parse a non-negative whole number (days, completions)
fn parse_count(input: &str) -> Result<u32, String> {
    input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", input))
}

fn ask_weight(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_weight(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn ask_count(message: &str, default: u32) -> Result<u32> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_count(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Triangle Pipeline Configuration Wizard");
    println!("======================================");
    println!();

    // 1. Representative
    let name = prompt_with_default("Your name", "Sales Representative")?;
    let email = prompt_optional("Your email")?;
    let territory = prompt_optional("Sales territory")?;
    let representative = Representative {
        name,
        email,
        territory,
    };

    // 2. Scoring
    println!();
    let defaults = SalesConfig::default();
    let customize = prompt_yes_no("Customize lead scoring? (n accepts defaults)", false)?;
    let sales = if customize {
        println!();
        println!("Weights are multiplied by 100 and added to a lead's probability.");
        let mut sales = defaults.clone();
        let scoring = &mut sales.lead_scoring;
        scoring.certificates_generated_weight = ask_weight(
            "Certificates weight",
            defaults.lead_scoring.certificates_generated_weight,
        )?;
        scoring.workflow_completions_weight = ask_weight(
            "Workflow completions weight",
            defaults.lead_scoring.workflow_completions_weight,
        )?;
        scoring.recent_activity_weight = ask_weight(
            "Recent activity weight",
            defaults.lead_scoring.recent_activity_weight,
        )?;

        println!();
        let factors = &mut sales.priority_factors;
        factors.workflow_threshold = ask_count(
            "Workflow completions before a lead counts as engaged",
            defaults.priority_factors.workflow_threshold,
        )?;
        factors.recent_activity_days = ask_count(
            "Days since login that still count as recent",
            defaults.priority_factors.recent_activity_days as u32,
        )? as i64;

        if let Err(errors) = validate_sales_config(&sales) {
            anyhow::bail!("Scoring settings are invalid: {}", errors.join("; "));
        }
        Some(sales)
    } else {
        None
    };

    // 3. Default lead export
    println!();
    let leads = prompt_optional("Default lead export (.json or .csv)")?.map(PathBuf::from);

    // 4. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        representative: Some(representative),
        sales,
        leads,
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `triangle-pipeline list` to see your pipeline.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("0.25"), Ok(0.25));
        assert_eq!(parse_weight(" 1 "), Ok(1.0));
        assert!(parse_weight("1.5").is_err());
        assert!(parse_weight("-0.1").is_err());
        assert!(parse_weight("heavy").is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("7"), Ok(7));
        assert!(parse_count("-3").is_err());
        assert!(parse_count("a week").is_err());
    }
}
