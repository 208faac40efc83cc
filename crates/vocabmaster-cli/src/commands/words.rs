//! Words command - list, add, and delete vocabulary entries.

use colored::Colorize;
use vocabmaster::{LookupMode, MasteryStatus, Word, WordDraft, WordFilter, WordStore};

use crate::cli::{PoolArgs, WordsAction};

use super::{confirm, CommandResult, Context};

pub fn run(ctx: &Context, action: WordsAction) -> CommandResult {
    match action {
        WordsAction::List { pool, json } => list(ctx, pool, json),
        WordsAction::Add {
            headword,
            translation,
            gloss,
            section,
            class,
            level,
            lookup,
        } => {
            let mut vm = ctx.open()?;
            let section = section
                .or_else(|| vm.library().default_section())
                .ok_or("Library has no sections. Run 'vocabmaster init' first.")?;

            let mut draft = WordDraft::new(section, headword.trim())
                .with_class(class.unwrap_or(vm.config().default_word_class))
                .with_level(level.unwrap_or(vm.config().default_level));
            if let Some(translation) = translation {
                draft = draft.with_translation(translation);
            }
            if let Some(gloss) = gloss {
                draft = draft.with_gloss(gloss);
            }

            if lookup {
                match vm.lookup_word(&mut draft, LookupMode::Auto, None)? {
                    Some(mut choices) => {
                        let extra: Vec<String> = choices
                            .meanings
                            .iter()
                            .map(|m| m.translation.clone())
                            .filter(|t| !choices.is_added(t))
                            .collect();
                        if !extra.is_empty() {
                            println!("Other translations: {}", extra.join(", ").cyan());
                            if confirm("Add them too? [y/N]")? {
                                for translation in &extra {
                                    choices.add(&mut draft, translation);
                                }
                            }
                        }
                    }
                    None => println!("{}", "Lookup failed; saving the entry as typed.".yellow()),
                }
            }

            let id = vm.add_word(draft)?;
            ctx.save(&vm)?;
            if let Some(word) = vm.library().get_word(id) {
                println!("{} {}", "Added".green().bold(), describe(&word));
            }
            Ok(())
        }
        WordsAction::Delete { id } => {
            let mut vm = ctx.open()?;
            let word = vm.library_mut().delete_word(id)?;
            ctx.save(&vm)?;
            println!("{} {}", "Deleted".red().bold(), word.headword);
            Ok(())
        }
    }
}

fn list(ctx: &Context, pool: PoolArgs, json: bool) -> CommandResult {
    let vm = ctx.open()?;
    let filter = WordFilter::new()
        .with_scope(pool.scope())
        .with_level(pool.level)
        .with_status(pool.status);
    let words = vm.library().list_words(&filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&words)?);
        return Ok(());
    }

    if words.is_empty() {
        println!("{}", "No words match.".dimmed());
        return Ok(());
    }
    for word in &words {
        println!("{}", describe(word));
    }
    println!();
    println!("{} words", words.len().to_string().white().bold());
    Ok(())
}

fn describe(word: &Word) -> String {
    let status = match word.status {
        MasteryStatus::New => word.status.label().blue(),
        MasteryStatus::Learning => word.status.label().yellow(),
        MasteryStatus::Learned => word.status.label().green(),
    };
    let mut line = format!(
        "{:>5}  {}  {}  {} {}",
        word.id.to_string().dimmed(),
        word.headword.white().bold(),
        word.translation,
        word.level.label().cyan(),
        status
    );
    if !word.phonetic.is_empty() {
        line.push_str(&format!("  {}", word.phonetic.dimmed()));
    }
    line
}
