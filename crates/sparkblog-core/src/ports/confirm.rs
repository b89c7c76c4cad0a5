use async_trait::async_trait;

/// Yes/no gate shown to the user before destructive actions.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
}
