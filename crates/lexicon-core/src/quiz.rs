use std::collections::HashMap;

use lexicon_types::VocabularyItem;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("The quiz is already completed")]
    Completed,

    #[error("This question is already answered")]
    AlreadyAnswered,

    #[error("No answer selected")]
    NothingSelected,

    #[error("'{0}' is not one of the choices")]
    UnknownChoice(String),
}

#[derive(Debug, Clone)]
struct Entry {
    item_id: String,
    term: String,
    definition: String,
    answer: String,
    /// Answered correctly; the point leaves with the entry on removal
    scored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Unanswered { selected: Option<String> },
    Answered { choice: String, correct: bool },
    Completed,
}

/// How a choice is shown after the current interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Neutral,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question<'a> {
    /// 1-based position
    pub number: usize,
    pub total: usize,
    pub item_id: &'a str,
    pub term: &'a str,
    pub definition: &'a str,
    pub choices: &'a [String],
}

/// Multiple-choice drill over the user's saved words
pub struct Quiz {
    entries: Vec<Entry>,
    /// (item id, answer) for every known item, sorted by id
    pool: Vec<(String, String)>,
    distractors: usize,
    index: usize,
    score: usize,
    choices: Vec<String>,
    phase: QuizPhase,
    rng: StdRng,
}

impl Quiz {
    pub fn new(
        saved_ids: &[String],
        items: &HashMap<String, VocabularyItem>,
        language: &str,
        distractors: usize,
    ) -> Self {
        Self::with_rng(
            saved_ids,
            items,
            language,
            distractors,
            StdRng::from_os_rng(),
        )
    }

    pub fn with_rng(
        saved_ids: &[String],
        items: &HashMap<String, VocabularyItem>,
        language: &str,
        distractors: usize,
        rng: StdRng,
    ) -> Self {
        let entries: Vec<Entry> = saved_ids
            .iter()
            .filter_map(|id| items.get(id))
            .filter_map(|item| {
                item.answer_for(language).map(|answer| Entry {
                    item_id: item.id.clone(),
                    term: item.term.clone(),
                    definition: item.definition.clone(),
                    answer: answer.to_string(),
                    scored: false,
                })
            })
            .collect();

        let mut pool: Vec<(String, String)> = items
            .values()
            .filter_map(|item| {
                item.answer_for(language)
                    .map(|answer| (item.id.clone(), answer.to_string()))
            })
            .collect();
        pool.sort();

        tracing::debug!(
            "Quiz built with {} of {} saved words",
            entries.len(),
            saved_ids.len()
        );

        let mut quiz = Self {
            entries,
            pool,
            distractors,
            index: 0,
            score: 0,
            choices: Vec::new(),
            phase: QuizPhase::Completed,
            rng,
        };
        quiz.start_question();
        quiz
    }

    fn start_question(&mut self) {
        if self.index >= self.entries.len() {
            self.index = self.entries.len();
            self.choices.clear();
            self.phase = QuizPhase::Completed;
            return;
        }

        self.choices = self.roll_choices();
        self.phase = QuizPhase::Unanswered { selected: None };
    }

    fn roll_choices(&mut self) -> Vec<String> {
        let entry = &self.entries[self.index];
        let (item_id, answer) = (entry.item_id.clone(), entry.answer.clone());

        let mut wrong: Vec<String> = self
            .pool
            .iter()
            .filter(|(id, other)| *id != item_id && *other != answer)
            .map(|(_, other)| other.clone())
            .collect();
        wrong.shuffle(&mut self.rng);
        wrong.truncate(self.distractors);

        let mut choices = Vec::with_capacity(wrong.len() + 1);
        choices.push(answer);
        choices.extend(wrong);
        choices.shuffle(&mut self.rng);
        choices
    }

    pub fn current(&self) -> Option<Question<'_>> {
        let entry = self.entries.get(self.index)?;
        Some(Question {
            number: self.index + 1,
            total: self.entries.len(),
            item_id: &entry.item_id,
            term: &entry.term,
            definition: &entry.definition,
            choices: &self.choices,
        })
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn select(&mut self, choice: &str) -> Result<(), QuizError> {
        match &self.phase {
            QuizPhase::Completed => Err(QuizError::Completed),
            QuizPhase::Answered { .. } => Err(QuizError::AlreadyAnswered),
            QuizPhase::Unanswered { .. } => {
                if !self.choices.iter().any(|c| c == choice) {
                    return Err(QuizError::UnknownChoice(choice.to_string()));
                }
                self.phase = QuizPhase::Unanswered {
                    selected: Some(choice.to_string()),
                };
                Ok(())
            }
        }
    }

    /// Lock in the selected choice; returns whether it was correct
    pub fn submit(&mut self) -> Result<bool, QuizError> {
        let choice = match &self.phase {
            QuizPhase::Completed => return Err(QuizError::Completed),
            QuizPhase::Answered { .. } => return Err(QuizError::AlreadyAnswered),
            QuizPhase::Unanswered { selected: None } => return Err(QuizError::NothingSelected),
            QuizPhase::Unanswered {
                selected: Some(choice),
            } => choice.clone(),
        };

        let correct = self
            .correct_answer()
            .is_some_and(|answer| answer == choice);
        if correct {
            self.score += 1;
            self.entries[self.index].scored = true;
        }
        self.phase = QuizPhase::Answered { choice, correct };
        Ok(correct)
    }

    /// Select and submit in one step
    pub fn answer(&mut self, choice: &str) -> Result<bool, QuizError> {
        self.select(choice)?;
        self.submit()
    }

    pub fn next(&mut self) -> Result<(), QuizError> {
        if self.is_completed() {
            return Err(QuizError::Completed);
        }
        self.index += 1;
        self.start_question();
        Ok(())
    }

    pub fn mark(&self, choice: &str) -> ChoiceMark {
        match &self.phase {
            QuizPhase::Answered { choice: chosen, .. } => {
                if self.correct_answer() == Some(choice) {
                    ChoiceMark::Correct
                } else if chosen == choice {
                    ChoiceMark::Incorrect
                } else {
                    ChoiceMark::Neutral
                }
            }
            QuizPhase::Unanswered {
                selected: Some(selected),
            } if selected == choice => ChoiceMark::Selected,
            _ => ChoiceMark::Neutral,
        }
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.entries
            .get(self.index)
            .map(|entry| entry.answer.as_str())
    }

    /// Drop a word mid-quiz. If it was the current question the next one
    /// takes its place.
    pub fn remove_word(&mut self, item_id: &str) -> bool {
        let Some(position) = self.entries.iter().position(|e| e.item_id == item_id) else {
            return false;
        };
        let removed = self.entries.remove(position);
        if removed.scored {
            self.score -= 1;
        }

        if self.is_completed() {
            self.index = self.entries.len();
        } else if position < self.index {
            self.index -= 1;
        } else if position == self.index {
            self.start_question();
        }
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.score = 0;
        for entry in &mut self.entries {
            entry.scored = false;
        }
        self.start_question();
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, QuizPhase::Completed)
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }
}
