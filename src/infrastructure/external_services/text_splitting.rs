use std::collections::VecDeque;

use crate::application::ports::TextSplitter;

/// Recursive character splitter: tries coarse separators first and falls back
/// to finer ones for pieces that are still too long. Lengths are in chars.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    separators: Vec<&'static str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            separators: vec![
                "\n\n", // Paragraphs
                "\n",   // Lines
                ".",    // Sentences
                " ",    // Words
                "",     // Characters
            ],
            chunk_size: chunk_size.max(1),
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    fn length(text: &str) -> usize {
        text.chars().count()
    }

    /// Splits on `separator`, keeping it at the start of the piece that follows.
    fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
        if separator.is_empty() {
            return text.chars().map(String::from).collect();
        }

        text.split(separator)
            .enumerate()
            .map(|(i, part)| {
                if i == 0 {
                    part.to_string()
                } else {
                    format!("{}{}", separator, part)
                }
            })
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    fn recursive_split(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let found = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(**sep));

        let (separator, remaining): (&str, &[&'static str]) = match found {
            Some((i, sep)) if !sep.is_empty() => (sep, &separators[i + 1..]),
            Some((_, sep)) => (sep, &[]),
            None => (separators.last().copied().unwrap_or(""), &[]),
        };

        let mut chunks = Vec::new();
        let mut short_pieces: Vec<String> = Vec::new();

        for piece in Self::split_keeping_separator(text, separator) {
            if Self::length(&piece) < self.chunk_size {
                short_pieces.push(piece);
                continue;
            }

            if !short_pieces.is_empty() {
                chunks.extend(self.merge_pieces(&short_pieces));
                short_pieces.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.recursive_split(&piece, remaining));
            }
        }

        if !short_pieces.is_empty() {
            chunks.extend(self.merge_pieces(&short_pieces));
        }

        chunks
    }

    /// Greedily packs pieces up to `chunk_size`, carrying at most
    /// `chunk_overlap` chars of trailing pieces into the next chunk.
    fn merge_pieces(&self, pieces: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = Self::length(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = Self::join(&window) {
                    chunks.push(chunk);
                }

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some(front) => total -= Self::length(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        if let Some(chunk) = Self::join(&window) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join(window: &VecDeque<&str>) -> Option<String> {
        let joined: String = window.iter().copied().collect();
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.recursive_split(text, &self.separators)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }
}
