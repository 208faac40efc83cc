//! Import command - bulk-add `word<TAB>gloss` lines.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;

use super::{CommandResult, Context};

pub fn run(ctx: &Context, file: PathBuf, section: Option<u64>) -> CommandResult {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    let text = fs::read_to_string(&file)?;

    let mut vm = ctx.open()?;
    let section = section
        .or_else(|| vm.library().default_section())
        .ok_or("Library has no sections. Run 'vocabmaster init' first.")?;

    let report = vm.import_text(&text, section)?;

    println!(
        "Imported {} words ({} duplicates, {} failed)",
        report.created.len().to_string().green().bold(),
        report.duplicates.len().to_string().yellow(),
        report.failed.len().to_string().red()
    );
    if ctx.verbose > 0 {
        for headword in &report.duplicates {
            println!("  {} {}", "duplicate".yellow(), headword);
        }
    }
    for (headword, reason) in &report.failed {
        println!("  {} {}: {}", "failed".red(), headword, reason);
    }

    if !report.created.is_empty() {
        ctx.save(&vm)?;
    }
    Ok(())
}
