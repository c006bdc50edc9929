//! Key-value detail views for single records.

use colored::Colorize;

use super::colors::label;

enum Block {
    Field(String, String),
    Text(String),
    Item(String),
    Header(String),
}

/// Builder for a titled key-value view with optional sections.
pub struct DetailView {
    title: String,
    blocks: Vec<Block>,
}

impl DetailView {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl ToString) -> Self {
        self.blocks.push(Block::Field(key.to_string(), value.to_string()));
        self
    }

    /// Add a field only when `value` is present.
    pub fn field_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self,
        }
    }

    pub fn section(mut self, header: &str) -> Self {
        self.blocks.push(Block::Header(header.to_string()));
        self
    }

    /// Free-form paragraph, indented under the current section.
    pub fn text(mut self, text: &str) -> Self {
        self.blocks.push(Block::Text(text.to_string()));
        self
    }

    pub fn item(mut self, text: impl ToString) -> Self {
        self.blocks.push(Block::Item(text.to_string()));
        self
    }

    pub fn render(&self) -> String {
        let key_width = self
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Field(k, _) => Some(k.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        let mut lines = vec![self.title.bold().to_string()];
        for block in &self.blocks {
            match block {
                Block::Field(key, value) => {
                    let pad = " ".repeat(key_width - key.len());
                    lines.push(format!("  {}{pad}  {value}", label(key)));
                }
                Block::Header(header) => {
                    lines.push(String::new());
                    lines.push(header.bold().underline().to_string());
                }
                Block::Text(text) => lines.push(format!("  {text}")),
                Block::Item(text) => lines.push(format!("  {} {text}", "\u{2022}".dimmed())),
            }
        }
        lines.join("\n")
    }
}
