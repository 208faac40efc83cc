//! Songs command - list and add song lyrics.

use std::fs;

use colored::Colorize;
use vocabmaster::CatalogStore;

use crate::cli::SongsAction;

use super::{CommandResult, Context};

pub fn run(ctx: &Context, action: SongsAction) -> CommandResult {
    match action {
        SongsAction::List => {
            let vm = ctx.open()?;
            let library = vm.library();
            for folder in library.folders() {
                println!("{} {}", "🎵".normal(), folder.name.yellow().bold());
                let songs = library.songs(Some(folder.id));
                if songs.is_empty() {
                    println!("   {}", "(empty)".dimmed());
                }
                for song in songs {
                    let lines = song.text.lines().filter(|l| !l.trim().is_empty()).count();
                    println!(
                        "   {:>5}  {}  {}",
                        song.id.to_string().dimmed(),
                        song.title.white(),
                        format!("{} lines", lines).dimmed()
                    );
                }
            }
            Ok(())
        }
        SongsAction::Add {
            title,
            file,
            folder,
        } => {
            if !file.exists() {
                return Err(format!("File not found: {}", file.display()).into());
            }
            let text = fs::read_to_string(&file)?;

            let mut vm = ctx.open()?;
            let folder = match folder {
                Some(id) => id,
                None => vm
                    .library()
                    .folders()
                    .first()
                    .map(|f| f.id)
                    .ok_or("Library has no song folders. Run 'vocabmaster init' first.")?,
            };
            let id = vm.library_mut().create_song(folder, &title, &text)?;
            ctx.save(&vm)?;

            println!(
                "{} {} {}",
                "Added song".green().bold(),
                title.white(),
                format!("(id {})", id).dimmed()
            );
            println!(
                "Run {} to annotate it.",
                format!("vocabmaster annotate {}", id).cyan().bold()
            );
            Ok(())
        }
    }
}
