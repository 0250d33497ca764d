pub mod gemini_chat;

pub use gemini_chat::GeminiChatAdapter;
