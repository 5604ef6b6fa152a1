use crate::commands::QuizCommand;
use crate::render;
use crate::state::AppState;

pub async fn handle_quiz(state: &AppState, command: QuizCommand) -> anyhow::Result<String> {
    let mut slot = state.quiz.lock().await;

    if command == QuizCommand::Start {
        let quiz = state.lexicon.start_quiz().await?;
        if quiz.total() == 0 {
            *slot = None;
            return Ok("No saved words to quiz on, save some with `save <id>`".to_string());
        }
        tracing::info!("Quiz started with {} questions", quiz.total());
        return Ok(render::question(slot.insert(quiz)));
    }

    let Some(quiz) = slot.as_mut() else {
        return Ok("No quiz running, start one with `quiz start`".to_string());
    };

    match command {
        QuizCommand::Start | QuizCommand::Show => {}
        QuizCommand::Answer { choice } => {
            let picked = pick_choice(quiz, &choice);
            quiz.answer(&picked)?;
        }
        QuizCommand::Next => quiz.next()?,
        QuizCommand::Remove => {
            let Some(id) = quiz.current().map(|q| q.item_id.to_string()) else {
                return Ok(render::question(quiz));
            };
            state.lexicon.remove_from_quiz(quiz, &id).await?;
        }
        QuizCommand::Reset => quiz.reset(),
    }

    Ok(render::question(quiz))
}

/// Choices may be given by their 1-based number as shown
fn pick_choice(quiz: &lexicon_core::quiz::Quiz, raw: &str) -> String {
    let Some(question) = quiz.current() else {
        return raw.to_string();
    };
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.choices.get(i))
        .cloned()
        .unwrap_or_else(|| raw.to_string())
}
