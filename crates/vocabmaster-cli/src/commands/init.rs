//! Init command - create a new seeded library file.

use colored::Colorize;
use vocabmaster::{CatalogStore, Library};

use super::{CommandResult, Context};

pub fn run(ctx: &Context, force: bool) -> CommandResult {
    let path = &ctx.library_path;
    if path.exists() && !force {
        return Err(format!(
            "Library already exists: {}\nUse --force to replace it.",
            path.display()
        )
        .into());
    }

    let library = Library::new();
    if force {
        library.save_with_history(path)?;
    } else {
        library.save(path)?;
    }

    println!(
        "{} {}",
        "Created library".green().bold(),
        path.display().to_string().white()
    );
    for collection in library.collections() {
        for section in library.sections(Some(collection.id)) {
            println!(
                "  {} {} › {} {}",
                collection.icon,
                collection.name,
                section.name,
                format!("(section {})", section.id).dimmed()
            );
        }
    }
    for folder in library.folders() {
        println!(
            "  🎵 {} {}",
            folder.name,
            format!("(folder {})", folder.id).dimmed()
        );
    }

    Ok(())
}
