/// Cuts extracted text into overlapping chunks small enough to embed.
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}
