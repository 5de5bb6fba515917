/// System prompt prepended to every stored conversation sent to the model.
pub const CHAT_SYSTEM: &str = "You are tomatoTool's assistant: a helpful, concise AI for \
    writing, coding, careers and everyday questions. Format answers in Markdown. \
    Use fenced code blocks with a language tag for code.";

/// Sampling temperature for chat when the client does not choose one.
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;
