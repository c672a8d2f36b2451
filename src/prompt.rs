use crate::error::RenamerError;
use crate::naming::{parse_suffix_length, validate_joiner, validate_prefix, MAX_SUFFIX_LENGTH};
use crate::utils::WorkDir;
use crate::Result;
use std::io::{BufRead, Write};

/// Line-oriented question/answer over any reader and writer.
///
/// Each `ask_*` method keeps asking until the answer passes validation. Only
/// a closed input or an I/O error ends the loop early.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line without its line ending
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RenamerError::InputClosed);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Ask for the directory to work on
    pub fn ask_directory(&mut self) -> Result<WorkDir> {
        loop {
            let raw = self.read_line(
                "Please enter the absolute path to the directory containing the files you would like to rename:",
            )?;
            match WorkDir::open(&raw) {
                Ok(workdir) => return Ok(workdir),
                Err(e) => self.retry(e)?,
            }
        }
    }

    /// Ask for the filename prefix
    pub fn ask_prefix(&mut self) -> Result<String> {
        loop {
            let prefix = self.read_line("Please enter the prefix to be used:")?;
            match validate_prefix(&prefix) {
                Ok(()) => return Ok(prefix),
                Err(e) => self.retry(e)?,
            }
        }
    }

    /// Ask for the joining character
    pub fn ask_joiner(&mut self) -> Result<char> {
        loop {
            let joiner =
                self.read_line("Please enter the character to use to join the prefix and suffix:")?;
            match validate_joiner(&joiner) {
                Ok(ch) => return Ok(ch),
                Err(e) => self.retry(e)?,
            }
        }
    }

    /// Ask for the width of the numeric suffix
    pub fn ask_suffix_length(&mut self) -> Result<usize> {
        loop {
            let raw = self.read_line("Please enter the required length of the numeric suffix:")?;
            match parse_suffix_length(&raw) {
                Ok(length) => return Ok(length),
                Err(e) => self.retry(e)?,
            }
        }
    }

    /// Ask a y/n question. Only a negative answer returns false.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_line(question)?;
        Ok(!is_decline(&answer))
    }

    /// Tell the user why an answer was refused, or give up on fatal errors
    fn retry(&mut self, error: RenamerError) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error);
        }
        log::debug!("rejected input: {error}");
        writeln!(self.output, "{}", retry_message(&error))?;
        Ok(())
    }
}

/// Case-insensitive "n" or "no"
pub fn is_decline(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "n" | "no")
}

fn retry_message(error: &RenamerError) -> String {
    match error {
        RenamerError::DirectoryNotFound { .. } => {
            "That directory does not exist, please try again.".to_string()
        }
        RenamerError::RelativePath { .. } => "Please enter an absolute path.".to_string(),
        RenamerError::NotADirectory { .. } => {
            "That path is not a directory, please try again.".to_string()
        }
        RenamerError::ReservedCharacter { field, ch } => format!(
            "The {} entered contains '{ch}', which is not allowed in filenames.  Try again.",
            field.to_lowercase()
        ),
        RenamerError::JoinerLength { .. } => {
            "Please enter exactly one joining character.".to_string()
        }
        RenamerError::SuffixNotInteger { .. } => "Please enter an integer.".to_string(),
        RenamerError::SuffixOutOfRange { .. } => format!(
            "Please enter a positive integer of reasonable length ({MAX_SUFFIX_LENGTH} or less)."
        ),
        other => other.to_string(),
    }
}
