use std::sync::LazyLock;

use lexicon_types::{
    Credentials, ExistingWordSuggestionDraft, FieldErrors, LANGUAGES, NewVocabularyItem,
    NewWordSuggestionDraft, Registration, Role,
};
use regex::Regex;

static ALPHABET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZąćęłńóśźżĄĆĘŁŃÓŚŹŻáéíóúüñÁÉÍÓÚÜÑàèìòùÀÈÌÒÙâêîôûÂÊÎÔÛäëïöüÄËÏÖÜßçÇ0-9\s'-]+$")
        .expect("alphabet pattern compiles")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

const ALPHABET_MESSAGE: &str =
    "Must contain only letters , numbers, spaces, hyphens, and apostrophes";

/// Checks for one text field, reported in a fixed order: alphabet, minimum
/// length, maximum length
struct Field<'a> {
    name: &'a str,
    label: &'a str,
    value: &'a str,
}

impl<'a> Field<'a> {
    fn new(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self { name, label, value }
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn alphabet(&self, errors: &mut FieldErrors) -> &Self {
        if !ALPHABET.is_match(self.value) {
            errors.push(self.name, ALPHABET_MESSAGE);
        }
        self
    }

    fn min(&self, min: usize, errors: &mut FieldErrors) -> &Self {
        if self.len() < min {
            errors.push(
                self.name,
                format!("{} must be at least {min} characters", self.label),
            );
        }
        self
    }

    fn max(&self, max: usize, errors: &mut FieldErrors) -> &Self {
        if self.len() > max {
            errors.push(
                self.name,
                format!("{} must not exceed {max} characters", self.label),
            );
        }
        self
    }
}

fn check_language(language: &str, errors: &mut FieldErrors) {
    if !LANGUAGES.contains(&language) {
        errors.push("language", "Please select a valid language");
    }
}

/// Form for proposing a word the lexicon does not have yet
pub fn validate_new_word(draft: &NewWordSuggestionDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    Field::new("term", "Term", &draft.term)
        .alphabet(&mut errors)
        .min(2, &mut errors)
        .max(20, &mut errors);
    Field::new("definition", "Definition", &draft.definition).min(10, &mut errors);
    Field::new("translation", "Translation", &draft.translation)
        .alphabet(&mut errors)
        .min(2, &mut errors)
        .max(50, &mut errors);

    if draft.category.trim().is_empty() {
        errors.push("category", "Please select a category");
    }
    check_language(&draft.language, &mut errors);

    errors
}

/// Form for proposing a translation or colloquial term for an existing word
pub fn validate_suggestion(draft: &ExistingWordSuggestionDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    Field::new("term", "Term", &draft.term)
        .alphabet(&mut errors)
        .min(2, &mut errors)
        .max(100, &mut errors);
    Field::new("suggestion", "Suggestion", &draft.suggestion)
        .alphabet(&mut errors)
        .min(2, &mut errors);
    check_language(&draft.language, &mut errors);

    errors
}

/// Direct creation of a vocabulary item
pub fn validate_new_item(item: &NewVocabularyItem) -> FieldErrors {
    let mut errors = FieldErrors::new();

    Field::new("term", "Term", &item.term)
        .alphabet(&mut errors)
        .min(2, &mut errors)
        .max(100, &mut errors);

    if item.translations.is_empty() {
        errors.push("translations", "At least one translation is required");
    }
    for (language, translation) in &item.translations {
        if !LANGUAGES.contains(&language.as_str()) {
            errors.push("translations", format!("Unknown language: {language}"));
        }
        if translation.trim().is_empty() {
            errors.push("translations", format!("Translation for {language} is empty"));
        }
    }

    errors
}

pub fn validate_registration(registration: &Registration) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if registration.username.trim().is_empty() {
        errors.push("username", "Username is required");
    } else if registration.username.contains('@') {
        errors.push("username", "Username must not contain @");
    }

    if !EMAIL.is_match(&registration.email) {
        errors.push("email", "Invalid email");
    }

    Field::new("password", "Password", &registration.password).min(6, &mut errors);

    // Moderator accounts are granted by the backend, never self-registered
    if registration.role != Role::Interpreter {
        errors.push("user_type", "Only interpreter accounts can be registered");
    }

    errors
}

pub fn validate_login(credentials: &Credentials) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if credentials.username.trim().is_empty() {
        errors.push("username", "Username is required");
    }
    if credentials.password.is_empty() {
        errors.push("password", "Password is required");
    }

    errors
}

#[cfg(test)]
mod tests {
    use lexicon_types::SuggestionType;

    use super::*;

    fn new_word() -> NewWordSuggestionDraft {
        NewWordSuggestionDraft {
            term: "zawał".to_string(),
            definition: "Martwica mięśnia sercowego".to_string(),
            translation: "heart attack".to_string(),
            category: "cardiology".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn accepts_polish_and_spanish_letters() {
        assert!(validate_new_word(&new_word()).is_empty());

        let mut draft = new_word();
        draft.translation = "infarto agudo de miocardio".to_string();
        draft.language = "es".to_string();
        assert!(validate_new_word(&draft).is_empty());
    }

    #[test]
    fn term_length_bounds() {
        let mut draft = new_word();
        draft.term = "a".to_string();
        assert_eq!(
            validate_new_word(&draft).first("term"),
            Some("Term must be at least 2 characters")
        );

        draft.term = "a".repeat(21);
        assert_eq!(
            validate_new_word(&draft).first("term"),
            Some("Term must not exceed 20 characters")
        );
    }

    #[test]
    fn rejects_symbols_outside_the_alphabet() {
        let mut draft = new_word();
        draft.term = "heart<script>".to_string();
        assert_eq!(validate_new_word(&draft).first("term"), Some(ALPHABET_MESSAGE));
    }

    #[test]
    fn missing_category_and_unknown_language() {
        let mut draft = new_word();
        draft.category.clear();
        draft.language = "it".to_string();
        let errors = validate_new_word(&draft);
        assert_eq!(errors.first("category"), Some("Please select a category"));
        assert!(errors.contains("language"));
    }

    #[test]
    fn suggestion_needs_two_characters() {
        let draft = ExistingWordSuggestionDraft {
            term: "heart".to_string(),
            suggestion_type: SuggestionType::Colloquial,
            suggestion: "x".to_string(),
            language: "pl".to_string(),
        };
        assert_eq!(
            validate_suggestion(&draft).first("suggestion"),
            Some("Suggestion must be at least 2 characters")
        );
    }

    #[test]
    fn registration_rules() {
        let registration = Registration {
            username: "ola@clinic".to_string(),
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
            role: Role::Overseer,
        };
        let errors = validate_registration(&registration);
        assert!(errors.contains("username"));
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
        assert!(errors.contains("user_type"));
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&Credentials::default());
        assert_eq!(errors.len(), 2);
    }
}
