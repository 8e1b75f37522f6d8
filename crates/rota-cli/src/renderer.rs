//! Terminal rendering of the markdown produced by `rota_core::display`.
//!
//! Rich output goes through a termimad skin: headers keep their hashes and
//! are colored, slot tables are laid out as real tables, everything else is
//! rendered inline. Plain output prints the markdown untouched.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

/// A run of consecutive lines that render the same way.
#[derive(Debug, PartialEq, Eq)]
enum Block<'a> {
    Header(&'a str),
    Table(Vec<&'a str>),
    Line(&'a str),
}

fn blocks(markdown: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    for line in markdown.lines() {
        if line.starts_with('|') {
            if let Some(Block::Table(rows)) = blocks.last_mut() {
                rows.push(line);
                continue;
            }
            blocks.push(Block::Table(vec![line]));
        } else if line.starts_with('#') {
            blocks.push(Block::Header(line));
        } else {
            blocks.push(Block::Line(line));
        }
    }
    blocks
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);

        Self { rich_enabled, skin }
    }

    /// Prints `markdown` to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for block in blocks(markdown) {
            match block {
                Block::Header(line) => println!("\x1b[34m{line}\x1b[0m"),
                Block::Table(rows) => self.skin.print_text(&rows.join("\n")),
                Block::Line(line) => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(TerminalRenderer::default().rich_enabled);
    }

    #[test]
    fn test_table_rows_are_grouped() {
        let markdown = "# Slots\n\n| ID | Date |\n|---:|------|\n| 1 | 2024-01-01 |\ndone\n";
        assert_eq!(
            blocks(markdown),
            vec![
                Block::Header("# Slots"),
                Block::Line(""),
                Block::Table(vec!["| ID | Date |", "|---:|------|", "| 1 | 2024-01-01 |"]),
                Block::Line("done"),
            ]
        );
    }
}
