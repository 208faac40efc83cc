//! Annotate command - highlight a song against the vocabulary and collect
//! new words from it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use colored::{ColoredString, Colorize};
use vocabmaster::annotate::normalize_selection;
use vocabmaster::{
    AnnotationSession, CatalogStore, Popup, PopupAction, Span, SpanKind, Translation, VocabMaster,
    WordStore,
};

use super::{confirm, prompt, CommandResult, Context};

const HELP: &str = "\
Commands:
  select <text>        show the translation popup for a selection
  add [text]           add text (or the popup's text) to the selection list
  remove <text>        drop text from the selection list
  list                 show the selection list
  check <text>|all     toggle the checkbox of one or all entries
  section <id> [text]  send one entry, or every checked entry, to a section
  drop                 remove every checked entry
  commit               save the selection list as new words
  explain              explain the whole song
  show                 render the lyrics again
  quit                 leave";

pub fn run(ctx: &Context, target: String, title: Option<String>) -> CommandResult {
    let mut vm = ctx.open()?;
    let mut session = open_session(&vm, &target, title)?;

    render(&session, ctx.verbose > 0);
    println!("{}", "Type 'help' for commands.".dimmed());

    loop {
        let Some(line) = prompt(&format!("{}>", session.pending_len()))? else {
            break;
        };
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line.as_str(), ""),
        };

        match command {
            "" => {}
            "help" | "?" => println!("{}", HELP),
            "show" => render(&session, true),
            "select" | "s" => match vm.select(&mut session, arg) {
                Some(popup) => print_popup(popup),
                None => println!("{}", "Selection too short.".dimmed()),
            },
            "add" | "a" => {
                let result = if arg.is_empty() {
                    session.add_popup()
                } else {
                    session.add(arg)
                };
                match result {
                    Ok(()) => println!("{} ({} pending)", "Added".green(), session.pending_len()),
                    Err(e) => println!("{}", e.to_string().yellow()),
                }
            }
            "remove" | "rm" => match session.remove(&normalize_selection(arg)) {
                Some(entry) => println!("{} {}", "Removed".red(), entry.text),
                None => println!("{}", "Not in the selection list.".yellow()),
            },
            "list" | "ls" => print_pending(&vm, &session),
            "check" => {
                if arg == "all" {
                    session.toggle_check_all();
                    print_pending(&vm, &session);
                } else if let Err(e) = session.toggle_check(&normalize_selection(arg)) {
                    println!("{}", e.to_string().yellow());
                }
            }
            "section" => assign_section(&vm, &mut session, arg),
            "drop" => {
                let removed = session.remove_checked();
                println!("{} {} entries", "Removed".red(), removed.len());
            }
            "commit" => {
                commit(&mut vm, &mut session);
                ctx.save(&vm)?;
            }
            "explain" => match vm.explain(&mut session) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{}", e.to_string().yellow()),
            },
            "quit" | "q" | "exit" => {
                if session.has_unsaved()
                    && !confirm(&format!(
                        "{} entries are not committed. Leave anyway? [y/N]",
                        session.pending_len()
                    ))?
                {
                    continue;
                }
                break;
            }
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    Ok(())
}

fn open_session(
    vm: &VocabMaster,
    target: &str,
    title: Option<String>,
) -> Result<AnnotationSession, Box<dyn std::error::Error>> {
    if let Ok(id) = target.parse::<u64>() {
        return Ok(vm.annotate(id)?);
    }

    let path = Path::new(target);
    if !path.exists() {
        return Err(format!("No song with id '{}' and no file at that path.", target).into());
    }
    let text = fs::read_to_string(path)?;
    let title = title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string())
    });
    Ok(vm.annotate_text(&title, &text))
}

fn render(session: &AnnotationSession, with_glossary: bool) {
    println!();
    println!("{}", session.title().white().bold().underline());
    println!();

    let spans = session.spans();
    let rendered: String = spans.iter().map(|span| paint(span).to_string()).collect();
    println!("{}", rendered);
    println!();
    println!(
        "{} {} {}",
        "known".green().underline(),
        "selected".black().on_yellow(),
        "part of a phrase".cyan()
    );

    if with_glossary {
        print_glossary(&spans);
    }
}

fn paint(span: &Span) -> ColoredString {
    match &span.kind {
        SpanKind::Plain => span.text.normal(),
        SpanKind::Selected => span.text.black().on_yellow(),
        SpanKind::Known(_) => span.text.green().underline(),
        SpanKind::RelatedToPhrase(_) => span.text.cyan(),
    }
}

/// Tooltip contents for every highlighted span, one line per entry.
fn print_glossary(spans: &[Span]) {
    let mut glossary: BTreeMap<String, String> = BTreeMap::new();
    for span in spans {
        match &span.kind {
            SpanKind::Known(matches) => {
                for m in matches {
                    let mut line = m.translation.clone();
                    if !m.phonetic.is_empty() {
                        line = format!("{} {}", m.phonetic, line);
                    }
                    glossary.insert(m.headword.clone(), format!("{}  ({})", line, m.location));
                }
            }
            SpanKind::RelatedToPhrase(phrases) => {
                for p in phrases {
                    glossary
                        .entry(p.phrase.clone())
                        .or_insert_with(|| format!("{}  ({})", p.translation, p.location));
                }
            }
            _ => {}
        }
    }
    if glossary.is_empty() {
        return;
    }
    println!();
    for (headword, line) in glossary {
        println!("  {}  {}", headword.green(), line.dimmed());
    }
}

fn print_popup(popup: &Popup) {
    let translation = match &popup.translation {
        Translation::Pending => "…".dimmed(),
        Translation::Ready(text) => text.cyan(),
        Translation::Failed(reason) => format!("translation failed: {}", reason).red(),
    };
    let action = match popup.action {
        PopupAction::Add => "'add' to collect".dimmed(),
        PopupAction::Remove => "selected, 'remove' to drop".yellow(),
        PopupAction::Owned => match &popup.location {
            Some(location) => format!("in {}", location).green(),
            None => "in your vocabulary".green(),
        },
    };
    println!("  {}  {}  {}", popup.text.white().bold(), translation, action);
}

fn print_pending(vm: &VocabMaster, session: &AnnotationSession) {
    if session.pending_len() == 0 {
        println!("{}", "Selection list is empty.".dimmed());
        return;
    }
    for entry in session.pending() {
        let mark = if entry.checked { "[x]" } else { "[ ]" };
        let section = entry
            .section_id
            .and_then(|id| vm.library().section_location(id))
            .map(|loc| loc.to_string().normal())
            .unwrap_or_else(|| "no section".red());
        let translation = session.cache().get(&entry.text).unwrap_or_default();
        println!(
            "  {} {}  {}  {}",
            mark,
            entry.text.white(),
            translation.cyan(),
            section
        );
    }
}

fn assign_section(vm: &VocabMaster, session: &mut AnnotationSession, arg: &str) {
    let (id, text) = match arg.split_once(' ') {
        Some((id, text)) => (id, text.trim()),
        None => (arg, ""),
    };
    let Ok(id) = id.parse::<u64>() else {
        println!("{}", "Usage: section <id> [text]".yellow());
        return;
    };
    if !vm.library().sections(None).iter().any(|s| s.id == id) {
        println!("{}", format!("No section with id {}.", id).yellow());
        return;
    }

    if text.is_empty() {
        let count = session.assign_checked(id);
        println!("Moved {} checked entries", count);
    } else if let Err(e) = session.set_section(&normalize_selection(text), id) {
        println!("{}", e.to_string().yellow());
    }
}

fn commit(vm: &mut VocabMaster, session: &mut AnnotationSession) {
    let report = vm.commit(session);
    println!(
        "{} {} words",
        "Saved".green().bold(),
        report.created.len().to_string().white().bold()
    );
    for duplicate in &report.duplicates {
        println!(
            "  {} {} is already in {}",
            "duplicate".yellow(),
            duplicate.headword,
            duplicate.location
        );
    }
    for (text, reason) in &report.failed {
        println!("  {} {}: {}", "failed".red(), text, reason);
    }
    if report.needs_sections() {
        println!(
            "{}",
            "Pick a section for the selection list first: section <id> [text]".yellow()
        );
    } else if !report.unassigned.is_empty() {
        println!("  {} entries still need a section", report.unassigned.len());
    }
}
