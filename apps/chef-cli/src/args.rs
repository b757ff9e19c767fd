use anyhow::{anyhow, Result};

use chef_core::config::Settings;

pub fn number_after(args: &[String], i: usize, flag: &str) -> Result<usize> {
    args.get(i + 1)
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| anyhow!("{flag} requires a number"))
}

/// Apply `--max N` and `--candidates N` to the recipe settings and return
/// the remaining words as the ingredient input. The overridden settings are
/// validated again.
pub fn apply_search_flags(settings: &mut Settings, args: &[String]) -> Result<String> {
    let mut words = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--max" => { settings.recipes.max_results = number_after(args, i, "--max")?; i += 1; }
            "--candidates" => { settings.recipes.max_candidates = Some(number_after(args, i, "--candidates")?); i += 1; }
            other => words.push(other.to_string()),
        }
        i += 1;
    }
    settings.validate()?;
    Ok(words.join(" "))
}
