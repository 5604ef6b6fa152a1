use std::fmt::Write;

use lexicon_core::quiz::{ChoiceMark, Quiz, QuizPhase};
use lexicon_core::suggestion::SuggestionCache;
use lexicon_types::{
    CategoryGroup, ExistingWordSuggestion, FormError, NewWordSuggestion, Profile, VocabularyItem,
};

/// One line per word: `id  term  (category)`, with a star on saved words
pub fn word_line(item: &VocabularyItem, saved: bool) -> String {
    let star = if saved { "*" } else { " " };
    format!("{star} {:>6}  {}  ({})", item.id, item.term, item.category_label())
}

pub fn word_list<'a>(
    items: impl IntoIterator<Item = &'a VocabularyItem>,
    is_saved: impl Fn(&str) -> bool,
) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}", word_line(item, is_saved(&item.id)));
    }
    if out.is_empty() {
        out.push_str("No words\n");
    }
    out
}

pub fn groups(groups: &[CategoryGroup], is_saved: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} [{}]", group.category, group.len());
        for item in &group.items {
            let _ = writeln!(out, "  {}", word_line(item, is_saved(&item.id)));
        }
    }
    if out.is_empty() {
        out.push_str("No words\n");
    }
    out
}

pub fn word_detail(item: &VocabularyItem, saved: bool, suggestions: &[ExistingWordSuggestion]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", item.term, if saved { "  (saved)" } else { "" });
    let _ = writeln!(out, "  category: {}", item.category_label());
    if !item.definition.is_empty() {
        let _ = writeln!(out, "  {}", item.definition);
    }

    for (language, translation) in &item.primary_translations {
        let _ = writeln!(out, "  {language}: {translation}");
    }
    for (language, terms) in &item.colloquial_terms {
        if !terms.is_empty() {
            let _ = writeln!(out, "  {language} colloquial: {}", terms.join(", "));
        }
    }
    for (language, terms) in &item.user_proposed_translations {
        if !terms.is_empty() {
            let _ = writeln!(out, "  {language} proposed: {}", terms.join(", "));
        }
    }

    if !suggestions.is_empty() {
        let _ = writeln!(out, "  suggestions:");
        for suggestion in suggestions {
            let _ = writeln!(out, "    {}", existing_suggestion(suggestion));
        }
    }
    out
}

pub fn existing_suggestion(s: &ExistingWordSuggestion) -> String {
    format!(
        "[{}] {} {} ({}) {} likes, {}",
        s.id, s.suggestion_type, s.suggestion, s.language, s.like_count, s.status
    )
}

pub fn new_word_suggestion(s: &NewWordSuggestion) -> String {
    format!(
        "[{}] {} = {} ({}, {}) {} likes, {}",
        s.id, s.term, s.translation, s.language, s.category, s.like_count, s.status
    )
}

/// Moderation page: existing-word suggestions grouped by their word, then new words
pub fn suggestions(
    cache: &SuggestionCache,
    term_of: impl Fn(&str) -> Option<String>,
    can_moderate: bool,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Suggestions for existing words");
    for (item_id, list) in cache.existing_grouped_by_item() {
        let term = term_of(item_id).unwrap_or_else(|| format!("#{item_id}"));
        let _ = writeln!(out, "  {term}");
        for suggestion in list {
            let _ = writeln!(out, "    {}", existing_suggestion(suggestion));
        }
    }

    let _ = writeln!(out, "New word suggestions");
    for suggestion in cache.new_words() {
        let _ = writeln!(out, "  {}", new_word_suggestion(suggestion));
    }

    if can_moderate {
        let _ = writeln!(out, "approve|reject <existing|new> <id> to moderate");
    }
    out
}

pub fn profile(profile: &Profile) -> String {
    format!("{} <{}> ({})", profile.username, profile.email, profile.role)
}

pub fn form_error(error: &FormError) -> String {
    let mut out = format!("Error: {}", error.message);
    for (field, messages) in error.details.iter() {
        for message in messages {
            let _ = write!(out, "\n  {field}: {message}");
        }
    }
    out
}

pub fn question(quiz: &Quiz) -> String {
    let Some(question) = quiz.current() else {
        return format!("Quiz complete: {} / {}", quiz.score(), quiz.total());
    };

    let mut out = String::new();
    let _ = writeln!(out, "Question {} of {}", question.number, question.total);
    let _ = writeln!(out, "{}", question.term);
    if !question.definition.is_empty() {
        let _ = writeln!(out, "  {}", question.definition);
    }
    for (n, choice) in question.choices.iter().enumerate() {
        let marker = match quiz.mark(choice) {
            ChoiceMark::Neutral => " ",
            ChoiceMark::Selected => ">",
            ChoiceMark::Correct => "+",
            ChoiceMark::Incorrect => "x",
        };
        let _ = writeln!(out, " {marker} {}. {choice}", n + 1);
    }

    if let QuizPhase::Answered { correct, .. } = quiz.phase() {
        let verdict = if *correct { "Correct" } else { "Incorrect" };
        let _ = writeln!(out, "{verdict}. `quiz next` to continue");
    }
    out
}
