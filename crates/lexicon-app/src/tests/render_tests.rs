use std::collections::{BTreeMap, HashMap};

use lexicon_core::quiz::Quiz;
use lexicon_types::{FieldErrors, FormError, Profile, Role, VocabularyItem};

use crate::render;

fn item(id: &str, term: &str, pl: &str) -> VocabularyItem {
    VocabularyItem {
        id: id.to_string(),
        term: term.to_string(),
        definition: String::new(),
        category: String::new(),
        translations: Vec::new(),
        primary_translations: BTreeMap::from([("pl".to_string(), pl.to_string())]),
        colloquial_terms: BTreeMap::from([("pl".to_string(), vec!["pikawa".to_string()])]),
        user_proposed_translations: BTreeMap::new(),
    }
}

#[test]
fn word_line_marks_saved_words_and_uncategorized() {
    let line = render::word_line(&item("7", "heart", "serce"), true);
    assert!(line.starts_with('*'));
    assert!(line.ends_with("heart  (Uncategorized)"));
}

#[test]
fn empty_lists_say_so() {
    assert_eq!(render::word_list(Vec::<&VocabularyItem>::new(), |_| false), "No words\n");
}

#[test]
fn detail_lists_translations_and_colloquial_terms() {
    let text = render::word_detail(&item("7", "heart", "serce"), false, &[]);
    assert!(text.contains("pl: serce"));
    assert!(text.contains("pl colloquial: pikawa"));
    assert!(!text.contains("suggestions:"));
}

#[test]
fn form_errors_list_every_field_message() {
    let mut details = FieldErrors::new();
    details.push("term", "Term must be at least 2 characters");
    details.push("language", "Please select a valid language");
    let text = render::form_error(&FormError::with_details("Please correct the highlighted fields", details));

    assert_eq!(
        text,
        "Error: Please correct the highlighted fields\n  \
         language: Please select a valid language\n  \
         term: Term must be at least 2 characters"
    );
}

#[test]
fn profile_shows_the_role() {
    let profile = Profile {
        username: "ola".to_string(),
        email: "ola@clinic.pl".to_string(),
        role: Role::Overseer,
    };
    assert_eq!(render::profile(&profile), "ola <ola@clinic.pl> (overseer)");
}

#[test]
fn quiz_question_numbers_choices_and_reports_the_verdict() {
    let items: HashMap<String, VocabularyItem> = [
        item("a", "heart", "serce"),
        item("b", "lung", "płuco"),
    ]
    .into_iter()
    .map(|i| (i.id.clone(), i))
    .collect();
    let mut quiz = Quiz::new(&["a".to_string()], &items, "pl", 3);

    let text = render::question(&quiz);
    assert!(text.starts_with("Question 1 of 1\nheart\n"));
    assert!(text.contains(". serce"));
    assert!(text.contains(". płuco"));

    quiz.answer("serce").unwrap();
    let text = render::question(&quiz);
    assert!(text.contains(" + "));
    assert!(text.contains("Correct."));

    quiz.next().unwrap();
    assert_eq!(render::question(&quiz), "Quiz complete: 1 / 1");
}
