//! Practice command - interactive flashcard, quiz, and recall drills.
//!
//! Judgments are written to the library as they happen; the file is saved
//! when the session ends or the learner quits.

use colored::Colorize;
use vocabmaster::{
    Judgment, PoolSpec, PracticeMode, SessionProgress, SessionSummary, VocabMaster, Word,
};

use crate::cli::PoolArgs;

use super::{confirm, prompt, CommandResult, Context};

pub fn run(ctx: &Context, mode: PracticeMode, pool: PoolArgs) -> CommandResult {
    let mut vm = ctx.open()?;
    let spec = PoolSpec::new()
        .with_scope(pool.scope())
        .with_level(pool.level)
        .with_status(pool.status);

    let result = match mode {
        PracticeMode::Flashcard => flashcards(&mut vm, spec),
        PracticeMode::Quiz => quiz(&mut vm, spec),
        PracticeMode::Recall => recall(&mut vm, spec),
    };

    ctx.save(&vm)?;
    result
}

fn flashcards(vm: &mut VocabMaster, spec: PoolSpec) -> CommandResult {
    let mut session = vm.start_flashcards(spec)?;
    println!(
        "{} {} cards. Enter reveals, {} knew it, {} didn't, {} quits.",
        "Flashcards:".cyan().bold(),
        session.pool().len(),
        "y".green(),
        "n".red(),
        "q".yellow()
    );

    loop {
        while let Some(word) = session.current().cloned() {
            print_progress(&session.progress());
            println!("  {}", word.headword.white().bold());

            if !session.is_revealed() {
                match prompt(">")?.as_deref() {
                    None | Some("q") => return Ok(()),
                    _ => session.reveal(),
                }
                print_back(&word);
            }

            match prompt("Know it? [y/n/q]")?.as_deref() {
                None | Some("q") => return Ok(()),
                Some("y") => report(&session.judge(vm.library_mut(), true)?, &word),
                Some("n") => report(&session.judge(vm.library_mut(), false)?, &word),
                Some(_) => continue,
            }
        }

        if let Some(summary) = session.summary() {
            print_summary(&summary);
        }
        if !confirm("Go again with the remaining cards? [y/N]")? {
            return Ok(());
        }
        if let Err(e) = session.restart(vm.library()) {
            println!("{}", e.to_string().yellow());
            return Ok(());
        }
    }
}

fn quiz(vm: &mut VocabMaster, spec: PoolSpec) -> CommandResult {
    let mut session = vm.start_quiz(spec)?;
    println!(
        "{} {} questions. Pick the number of the right translation, {} quits.",
        "Quiz:".cyan().bold(),
        session.pool().len(),
        "q".yellow()
    );

    loop {
        while let Some(card) = session.current().cloned() {
            print_progress(&session.progress());
            println!("  {}", card.target.headword.white().bold());
            for (i, option) in card.options.iter().enumerate() {
                println!("    {}. {}", i + 1, option_label(option));
            }

            let answer = match prompt("Answer:")? {
                None => return Ok(()),
                Some(answer) if answer == "q" => return Ok(()),
                Some(answer) => answer,
            };
            let Ok(choice) = answer.parse::<usize>() else {
                println!("{}", "Type a number.".yellow());
                continue;
            };
            match session.select(vm.library_mut(), choice.wrapping_sub(1)) {
                Ok(Some(judgment)) => {
                    report(&judgment, &card.target);
                    if !judgment.correct {
                        println!("    Answer: {}", option_label(&card.target).green());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    println!("{}", e.to_string().yellow());
                    continue;
                }
            }
            session.next();
        }

        if let Some(summary) = session.summary() {
            print_summary(&summary);
        }
        if !confirm("Play again? [y/N]")? {
            return Ok(());
        }
        if let Err(e) = session.restart(vm.library()) {
            println!("{}", e.to_string().yellow());
            return Ok(());
        }
    }
}

fn recall(vm: &mut VocabMaster, spec: PoolSpec) -> CommandResult {
    let mut session = vm.start_recall(spec)?;
    println!(
        "{} {} words. Type the word for each translation, {} quits.",
        "Recall:".cyan().bold(),
        session.pool().len(),
        ":q".yellow()
    );

    loop {
        while let Some(word) = session.current().cloned() {
            print_progress(&session.progress());
            println!("  {}", word.translation.white().bold());
            if !word.gloss_en.is_empty() {
                println!("  {}", word.gloss_en.dimmed());
            }

            let answer = match prompt("Word:")? {
                None => return Ok(()),
                Some(answer) if answer == ":q" => return Ok(()),
                Some(answer) => answer,
            };
            session.set_input(answer);
            if let Some(judgment) = session.check(vm.library_mut())? {
                report(&judgment, &word);
                if !judgment.correct {
                    println!("    Answer: {}", word.headword.green());
                }
            }
            session.next();
        }

        if let Some(summary) = session.summary() {
            print_summary(&summary);
        }
        if !confirm("Go again with the remaining words? [y/N]")? {
            return Ok(());
        }
        if let Err(e) = session.restart(vm.library()) {
            println!("{}", e.to_string().yellow());
            return Ok(());
        }
    }
}

fn option_label(word: &Word) -> String {
    if word.translation.is_empty() {
        word.gloss_en.clone()
    } else {
        word.translation.clone()
    }
}

fn print_progress(progress: &SessionProgress) {
    println!();
    println!(
        "{}  {} {}",
        format!("[{}/{}]", progress.index + 1, progress.total).dimmed(),
        progress.correct.to_string().green(),
        progress.wrong.to_string().red()
    );
}

fn print_back(word: &Word) {
    println!("  {}", word.translation.cyan());
    if !word.phonetic.is_empty() {
        println!("  {}", word.phonetic.dimmed());
    }
    if !word.gloss_en.is_empty() {
        println!("  {}", word.gloss_en);
    }
    if !word.example.is_empty() {
        println!("  {}", word.example.italic());
    }
}

fn report(judgment: &Judgment, word: &Word) {
    let verdict = if judgment.correct {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    match &judgment.outcome {
        Some(outcome) => println!("  {} {} is now {}", verdict, word.headword, outcome.status),
        None => println!("  {} {}", verdict, "(progress not saved)".dimmed()),
    }
}

fn print_summary(summary: &SessionSummary) {
    println!();
    println!(
        "{} {}/{} correct ({:.0}%)",
        format!("{} finished:", summary.mode).cyan().bold(),
        summary.correct.to_string().white().bold(),
        summary.total,
        summary.accuracy() * 100.0
    );
    if !summary.wrong_words.is_empty() {
        println!("{}", "To review:".yellow().bold());
        for word in &summary.wrong_words {
            println!("  {}  {}", word.headword, word.translation.dimmed());
        }
    }
}
