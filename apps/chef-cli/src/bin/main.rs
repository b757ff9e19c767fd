use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use chrono::Utc;
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use chef_cli::args::apply_search_flags;
use chef_cli::render;
use chef_cli::repl::{parse_command, Command, HELP};
use chef_core::config::{Config, Settings};
use chef_core::session::Session;
use chef_core::traits::RecipeSource;
use chef_prices::{tracker_from_settings, TrackOutcome};
use chef_recipes::{finder_from_settings, RecipeFinder, SearchOutcome};

const USAGE: &str = "Usage: chef <search|interactive|track|history> [args...]
  chef search \"egg, flour, sugar\" [--max N] [--candidates N]
  chef interactive
  chef track \"<product>\" [--ephemeral]
  chef history \"<product>\"";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    args.remove(0);
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

async fn run_search<S: RecipeSource>(finder: &RecipeFinder<S>, input: &str, session: &mut Session) {
    match finder.find(input).await {
        SearchOutcome::NeedIngredients => println!("Please enter at least one ingredient, separated by commas."),
        SearchOutcome::NoResults => println!("No recipes found for those ingredients."),
        SearchOutcome::Found(results) => {
            for (i, m) in results.matches.iter().enumerate() {
                let localized = finder.localize(m, &results.user).await;
                println!("{}", render::recipe_card(i + 1, &localized, i == 0));
            }
            session.set_last_results(results.matches);
        }
    }
}

async fn interactive<S: RecipeSource>(finder: &RecipeFinder<S>) -> anyhow::Result<()> {
    let mut session = Session::new();
    println!("🍳 chef interactive\n===================\n{HELP}\n");
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> "); io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        match parse_command(&line) {
            Command::Empty => {}
            Command::Search(input) => run_search(finder, &input, &mut session).await,
            Command::Save(index) => match session.save_from_last(index) {
                Some(true) => println!("Saved. {} recipe(s) kept.", session.len()),
                Some(false) => println!("Already saved."),
                None => println!("No result {} in the last search.", index + 1),
            },
            Command::Saved => {
                if session.is_empty() { println!("Nothing saved yet."); }
                for (i, m) in session.saved().iter().enumerate() { println!("{}", render::match_line(i + 1, m)); }
            }
            Command::Remove(id) => match session.remove(&id) {
                Some(m) => println!("Removed {}.", m.recipe.name),
                None => println!("No saved recipe with id {id}."),
            },
            Command::Clear => { session.clear(); println!("Cleared saved recipes."); }
            Command::Last => {
                if session.last_results().is_empty() { println!("No search yet."); }
                for (i, m) in session.last_results().iter().enumerate() { println!("{}", render::match_line(i + 1, m)); }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Invalid(msg) => println!("{msg} (try /help)"),
        }
    }
    Ok(())
}

async fn track(settings: &Settings, args: &[String], scrape: bool) -> anyhow::Result<()> {
    let ephemeral = args.iter().any(|a| a == "--ephemeral");
    let keyword = args.iter().filter(|a| !a.starts_with("--")).cloned().collect::<Vec<_>>().join(" ");
    let tracker = tracker_from_settings(&settings.tracker, ephemeral).await?;
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("checking prices for {keyword}"));
    spinner.enable_steady_tick(Duration::from_millis(120));
    let outcome = if scrape { tracker.track(&keyword, Utc::now()).await } else { tracker.history_report(&keyword).await };
    spinner.finish_and_clear();
    match outcome? {
        TrackOutcome::NeedKeyword => println!("Please enter a product."),
        TrackOutcome::NoData { keyword, scrape } => {
            println!("No price data for \"{keyword}\".");
            if let Some(status) = scrape { println!("({})", render::scrape_status(&status)); }
        }
        TrackOutcome::Report(report) => print!("{}", render::track_report(&report, settings.tracker.price_format)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    let (cmd, args) = parse_args();
    tracing::debug!(command = %cmd, "starting");
    match cmd.as_str() {
        "search" => {
            let input = apply_search_flags(&mut settings, &args).map_err(|e| { eprintln!("Error: {e:#}"); e })?;
            let finder = finder_from_settings(&settings.recipes, true)?;
            run_search(&finder, &input, &mut Session::new()).await;
        }
        "interactive" => {
            let finder = finder_from_settings(&settings.recipes, true)?;
            interactive(&finder).await?;
        }
        "track" => track(&settings, &args, true).await?,
        "history" => track(&settings, &args, false).await?,
        "help" | "--help" | "-h" => println!("{USAGE}"),
        _ => { eprintln!("Unknown command: {}\n{USAGE}", cmd); std::process::exit(1); }
    }
    Ok(())
}
