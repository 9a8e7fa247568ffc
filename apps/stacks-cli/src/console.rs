//! # Console I/O
//!
//! Line-oriented prompts over any async reader/writer pair. The binary uses
//! stdin/stdout; tests drive the same code with byte slices and `Vec<u8>`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ShellError, ShellResult};

pub const RULE: &str = "------------------------------------------------";

pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Console { reader, writer }
    }

    /// Writes one line.
    pub async fn say(&mut self, line: impl AsRef<str>) -> ShellResult<()> {
        self.writer.write_all(line.as_ref().as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn blank(&mut self) -> ShellResult<()> {
        self.say("").await
    }

    /// Writes a section header between rules.
    pub async fn heading(&mut self, title: impl AsRef<str>) -> ShellResult<()> {
        self.say(RULE).await?;
        self.say(title).await?;
        self.say(RULE).await
    }

    /// Shows `label`, reads one line, and returns it without the line ending.
    ///
    /// Returns `ShellError::Closed` at end of input.
    pub async fn ask(&mut self, label: &str) -> ShellResult<String> {
        self.writer.write_all(label.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(ShellError::Closed);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_strips_line_ending() {
        let mut console = Console::new(&b"ada@example.org\r\nnext\n"[..], Vec::new());

        assert_eq!(console.ask("Email: ").await.unwrap(), "ada@example.org");
        assert_eq!(console.ask("Again: ").await.unwrap(), "next");
        assert_eq!(String::from_utf8_lossy(console.writer()), "Email: Again: ");
    }

    #[tokio::test]
    async fn test_end_of_input_is_closed() {
        let mut console = Console::new(&b""[..], Vec::new());
        assert!(matches!(console.ask("> ").await, Err(ShellError::Closed)));
    }

    #[tokio::test]
    async fn test_heading_layout() {
        let mut console = Console::new(&b""[..], Vec::new());
        console.heading("Search Results:").await.unwrap();
        let out = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(out, format!("{RULE}\nSearch Results:\n{RULE}\n"));
    }
}
