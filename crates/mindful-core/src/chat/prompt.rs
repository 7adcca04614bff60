//! Fixed texts used by the chat relay.

/// Persona instruction sent as the system prompt on every model call.
pub const SYSTEM_PROMPT: &str = "You are a compassionate mental health support assistant for students. \
Provide empathetic, supportive responses while maintaining appropriate boundaries. \
Encourage professional help when needed. Be warm, understanding, and non-judgmental. \
Keep responses concise but meaningful.";

/// Returned in place of a model reply when the model API fails, times out,
/// or answers with nothing.
pub const FALLBACK_REPLY: &str = "I'm having trouble responding right now, but I'm still here for you. \
Please try again in a moment. If you need to talk to someone right away, \
reach out to a counselor or a trusted person near you.";
