//! Status command - vocabulary counts per mastery status.

use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use vocabmaster::{CatalogStore, Scope, WordFilter, WordStore};

use super::{CommandResult, Context};

#[derive(Serialize)]
struct SectionCount {
    id: u64,
    location: String,
    words: usize,
}

#[derive(Serialize)]
struct StatusReport {
    file: String,
    updated_at: String,
    total: usize,
    new: usize,
    learning: usize,
    learned: usize,
    sections: Vec<SectionCount>,
    songs: usize,
    tags: Vec<String>,
}

pub fn run(ctx: &Context, json_output: bool) -> CommandResult {
    if !ctx.library_path.exists() {
        return Err(format!(
            "Library not found: {}\nRun 'vocabmaster init' first.",
            ctx.library_path.display()
        )
        .into());
    }

    let vm = ctx.open()?;
    let library = vm.library();
    let counts = library.status_counts();

    let sections = library
        .sections(None)
        .into_iter()
        .map(|section| SectionCount {
            id: section.id,
            location: library
                .section_location(section.id)
                .map(|loc| loc.to_string())
                .unwrap_or(section.name),
            words: library
                .list_words(&WordFilter::new().with_scope(Scope::Section(section.id)))
                .len(),
        })
        .collect();

    let report = StatusReport {
        file: ctx.library_path.display().to_string(),
        updated_at: library.updated_at.to_rfc3339(),
        total: counts.total(),
        new: counts.new,
        learning: counts.learning,
        learned: counts.learned,
        sections,
        songs: library.songs(None).len(),
        tags: library.all_tags().into_iter().collect(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Vocabulary status for".cyan().bold(),
        report.file.white()
    );
    println!();

    // Progress bar over learned words
    let progress = if report.total == 0 {
        0.0
    } else {
        report.learned as f64 / report.total as f64
    };
    let bar_width = 30;
    let filled = (progress * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
    println!(
        "Learned: {} {}/{} ({:.0}%)",
        bar.cyan(),
        report.learned.to_string().white().bold(),
        report.total,
        progress * 100.0
    );
    println!();

    println!("{}", "Status:".yellow().bold());
    println!("  New:      {}", report.new.to_string().blue());
    println!("  Learning: {}", report.learning.to_string().yellow());
    println!("  Learned:  {}", report.learned.to_string().green());
    println!();

    println!("{}", "Sections:".yellow().bold());
    for section in &report.sections {
        println!(
            "  {:>5}  {}  {}",
            section.id.to_string().dimmed(),
            section.location,
            section.words.to_string().white()
        );
    }
    println!();

    println!("Songs: {}", report.songs.to_string().white());
    if !report.tags.is_empty() && ctx.verbose > 0 {
        println!("Tags:  {}", report.tags.join(", ").dimmed());
    }
    println!(
        "Last updated: {}",
        library
            .updated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed()
    );

    Ok(())
}
