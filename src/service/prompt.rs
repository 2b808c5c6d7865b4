use std::io::{BufRead, Write};

use snafu::ResultExt;

use crate::common::{InputSnafu, Result};

/// Interactive input: labels go to the writer, answers come from the reader.
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print label and read a single line. End of input gives an empty
    /// string.
    pub fn read_line(&mut self, label: &str) -> Result<String> {
        write!(self.writer, "{label}")
            .and_then(|_| self.writer.flush())
            .context(InputSnafu {
                message: "Failed writing prompt",
            })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).context(InputSnafu {
            message: "Failed reading standard input",
        })?;

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read until end of input. Every line, including the last, ends with a
    /// newline.
    pub fn read_to_end(&mut self) -> Result<String> {
        let mut body = String::new();
        for line in self.reader.by_ref().lines() {
            let line = line.context(InputSnafu {
                message: "Failed reading standard input",
            })?;
            body.push_str(&line);
            body.push('\n');
        }
        Ok(body)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn line_then_rest() {
        let mut prompt = Prompt::new(Cursor::new("hello@test.com\nline one\nline two"), Vec::new());

        assert_eq!(prompt.read_line("To: ").unwrap(), "hello@test.com");
        assert_eq!(prompt.read_to_end().unwrap(), "line one\nline two\n");

        let (_, written) = prompt.into_inner();
        assert_eq!(written, b"To: ");
    }

    #[test]
    fn crlf_is_stripped() {
        let mut prompt = Prompt::new(Cursor::new("Hello subject\r\n"), Vec::new());
        assert_eq!(prompt.read_line("Subject: ").unwrap(), "Hello subject");
    }

    #[test]
    fn end_of_input_is_empty() {
        let mut prompt = Prompt::new(Cursor::new(""), Vec::new());
        assert_eq!(prompt.read_line("To: ").unwrap(), "");
        assert_eq!(prompt.read_to_end().unwrap(), "");
    }
}
