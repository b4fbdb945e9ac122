use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Line-based terminal I/O, generic so tests can script the input.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line of text
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write output")
    }

    /// Prompt user with a message and return their trimmed input.
    /// Closed input is an error: the caller cannot continue without an answer.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    pub fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(matches!(input.as_str(), "y" | "yes" | "d" | "da"))
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_prompt_trims_input() {
        let mut p = prompter("  hello \n");
        assert_eq!(p.prompt("> ").unwrap(), "hello");
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "> ");
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let mut p = prompter("");
        assert!(p.prompt("> ").is_err());
    }

    #[test]
    fn test_yes_no() {
        let mut p = prompter("\nda\nn\n");
        assert!(p.prompt_yes_no("?", true).unwrap());
        assert!(p.prompt_yes_no("?", false).unwrap());
        assert!(!p.prompt_yes_no("?", true).unwrap());
    }
}
