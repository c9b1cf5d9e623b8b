//! Opening-message generation for new contacts.
//!
//! A `Greeter` never fails: whatever goes wrong upstream, the caller gets a
//! usable greeting back.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiGreeter;

#[async_trait]
pub trait Greeter: Send + Sync {
    /// A short greeting `sender` can send to invite `recipient` to chat.
    async fn greeting(&self, sender: &str, recipient: &str) -> String;
}

/// Used when generation fails outright.
pub fn fallback_greeting(recipient: &str) -> String {
    format!("¡Hola {recipient}! ¡Hablemos por aquí!")
}

/// Used when generation succeeds but returns no text.
pub fn empty_reply_greeting(recipient: &str) -> String {
    format!("¡Hola {recipient}! He empezado a usar esta app, ¡hablemos por aquí!")
}

/// Greeter for deployments without a model API key.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGreeter;

#[async_trait]
impl Greeter for FallbackGreeter {
    async fn greeting(&self, _sender: &str, recipient: &str) -> String {
        fallback_greeting(recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_greeter_names_recipient() {
        assert_eq!(
            FallbackGreeter.greeting("Ana", "Bea").await,
            "¡Hola Bea! ¡Hablemos por aquí!"
        );
    }
}
