//! Fuzz target for selection handling in an annotation session.
//!
//! Drives select/add/remove with arbitrary selections against the mock
//! oracle and checks the session never panics.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vocabmaster::{AnnotationSession, Library, MockOracle, VocabConfig};

#[derive(Debug, Arbitrary)]
enum Action<'a> {
    Select(&'a str),
    Add(&'a str),
    AddPopup,
    Remove(&'a str),
    Dismiss,
}

fuzz_target!(|input: (&str, Vec<Action>)| {
    let (lyric, actions) = input;
    if lyric.len() > 10_000 || actions.len() > 128 {
        return;
    }

    let library = Library::new();
    let oracle = MockOracle::new();
    let mut session = AnnotationSession::new("fuzz", lyric, &library, VocabConfig::default());

    for action in actions {
        match action {
            Action::Select(raw) => {
                session.select_with(raw, &oracle);
            }
            Action::Add(text) => {
                let _ = session.add(text);
            }
            Action::AddPopup => {
                let _ = session.add_popup();
            }
            Action::Remove(text) => {
                session.remove(text);
            }
            Action::Dismiss => session.dismiss_popup(),
        }
    }

    let _ = session.spans();
});
