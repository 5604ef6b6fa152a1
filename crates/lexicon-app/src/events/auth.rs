use lexicon_types::{Credentials, Registration, Role};

use crate::render;
use crate::state::AppState;

pub async fn handle_login(state: &AppState, username: String, password: String) -> anyhow::Result<String> {
    let profile = state
        .lexicon
        .login(&Credentials { username, password })
        .await?;
    tracing::info!("Signed in as {}", profile.username);
    Ok(format!("Signed in as {}", render::profile(&profile)))
}

pub async fn handle_logout(state: &AppState) -> anyhow::Result<String> {
    state.sign_out().await;
    Ok("Signed out".to_string())
}

pub async fn handle_register(
    state: &AppState,
    username: String,
    email: String,
    password: String,
    role: Role,
) -> anyhow::Result<String> {
    state
        .lexicon
        .register(&Registration {
            username: username.clone(),
            email,
            password,
            role,
        })
        .await?;
    Ok(format!("Account {username} created, sign in with `login`"))
}

pub async fn handle_whoami(state: &AppState) -> anyhow::Result<String> {
    let session = state.lexicon.session().snapshot().await;
    Ok(match (&session.profile, session.logged_in) {
        (Some(profile), true) => render::profile(profile),
        _ => match session.error {
            Some(error) => format!("Not signed in ({})", error.message),
            None => "Not signed in".to_string(),
        },
    })
}
