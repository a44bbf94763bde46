/// One line of the story log, as the UI renders it.
#[derive(Debug, Clone)]
pub enum StoryEntry {
    /// The player's own input, echoed as "> text".
    Action(String),
    /// Narration returned by the server.
    Narration(String),
    /// Client-side notices: hints, loading banners.
    System(String),
}
