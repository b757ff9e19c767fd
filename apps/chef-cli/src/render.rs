//! Plain-text rendering of search results and price reports.

use std::fmt::Write as _;

use chef_core::matching::RecipeMatch;
use chef_core::prices::{DaySummary, PriceFormat, PriceStats};
use chef_prices::{ScrapeStatus, TrackReport};
use chef_recipes::LocalizedRecipe;

fn currency(format: PriceFormat) -> &'static str {
    match format {
        PriceFormat::Brazilian => "R$",
        PriceFormat::Plain => "$",
    }
}

fn money(v: f64, format: PriceFormat) -> String {
    format!("{} {v:.2}", currency(format))
}

/// One ranked recipe. Instructions are only printed when `full` is set.
pub fn recipe_card(rank: usize, r: &LocalizedRecipe, full: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{rank}. {} ({}% compatible)", r.name, r.coverage_percent);
    let tags: Vec<&str> = [r.recipe.category.as_deref(), r.recipe.area.as_deref()].into_iter().flatten().collect();
    if !tags.is_empty() {
        let _ = writeln!(out, "   {}", tags.join(" · "));
    }
    for mark in &r.ingredients {
        let check = if mark.have { '✓' } else { '✗' };
        match mark.measure.as_deref() {
            Some(m) => {
                let _ = writeln!(out, "   {check} {} ({m})", mark.name);
            }
            None => {
                let _ = writeln!(out, "   {check} {}", mark.name);
            }
        }
    }
    if let Some(url) = &r.recipe.source_url {
        let _ = writeln!(out, "   source: {url}");
    }
    if let Some(url) = &r.recipe.video_url {
        let _ = writeln!(out, "   video:  {url}");
    }
    if full && !r.instructions.trim().is_empty() {
        let _ = writeln!(out, "\n{}", r.instructions.trim());
    }
    if r.partially_translated {
        let _ = writeln!(out, "   (some text could not be translated)");
    }
    out
}

/// Short listing line used for saved and repeated results.
pub fn match_line(rank: usize, m: &RecipeMatch) -> String {
    format!("{rank}. [{}] {} ({}/{} ingredients)", m.recipe.id, m.recipe.name, m.score.matches, m.score.total)
}

pub fn stats_line(s: &PriceStats, format: PriceFormat) -> String {
    format!(
        "n={:<3} mean {:>12}  median {:>12}  min {:>12}  max {:>12}",
        s.count,
        money(s.mean, format),
        money(s.median, format),
        money(s.min, format),
        money(s.max, format)
    )
}

pub fn scrape_status(status: &ScrapeStatus) -> String {
    match status {
        ScrapeStatus::SkippedToday => "already checked today, using stored prices".to_string(),
        ScrapeStatus::Stored { stored, dropped: 0 } => format!("stored {stored} new prices"),
        ScrapeStatus::Stored { stored, dropped } => format!("stored {stored} new prices ({dropped} without a readable price)"),
        ScrapeStatus::Failed(e) => format!("could not fetch new prices: {e}"),
    }
}

pub fn day_table(days: &[DaySummary], smoothed: &[f64], format: PriceFormat) -> String {
    let mut out = String::new();
    for (d, s) in days.iter().zip(smoothed) {
        let _ = writeln!(out, "{}  {}  ewma {:>12}", d.day, stats_line(&d.stats, format), money(*s, format));
    }
    out
}

pub fn track_report(report: &TrackReport, format: PriceFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Prices for \"{}\"", report.keyword);
    if let Some(status) = &report.scrape {
        let _ = writeln!(out, "({})", scrape_status(status));
    }
    let _ = writeln!(out);
    out.push_str(&day_table(&report.days, &report.smoothed, format));
    let _ = writeln!(out, "\noverall     {}", stats_line(&report.overall, format));
    let _ = writeln!(out, "next-day estimate: {}", money(report.forecast, format));
    out
}
