#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw line typed into the interactive shell
    Command(String),
    Session(SessionNotice),
    /// Input closed or the user asked to quit
    Shutdown,
}

/// Outcome of a background token refresh
#[derive(Debug, Clone)]
pub enum SessionNotice {
    Refreshed,
    Expired { reason: String },
}
