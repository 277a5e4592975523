//! Line-based terminal prompts.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use demoslides_core::Prompter;

/// [`Prompter`] reading answers line by line from `input` and writing questions to `output`.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn write_prompt(&mut self, text: &str) {
        let result = write!(self.output, "{}", text).and_then(|_| self.output.flush());
        if let Err(e) = result {
            log::warn!("Failed to write prompt: {}", e);
        }
    }

    /// Next trimmed input line, `None` at end of input.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose_one(&mut self, label: &str, options: &[String]) -> Option<String> {
        if options.is_empty() {
            return None;
        }

        let mut listing = format!("{}\n", label);
        for (number, option) in options.iter().enumerate() {
            listing.push_str(&format!("  {}) {}\n", number + 1, option));
        }
        listing.push_str("Number or name (empty to skip): ");
        self.write_prompt(&listing);

        let answer = self.read_line()?;
        if answer.is_empty() {
            return None;
        }

        if let Ok(number) = answer.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|index| options.get(index))
                .cloned();
        }

        options.iter().find(|option| **option == answer).cloned()
    }

    fn prompt_line(&mut self, label: &str) -> Option<String> {
        self.write_prompt(&format!("{}: ", label));
        self.read_line().filter(|answer| !answer.is_empty())
    }

    fn prompt_yes_no(&mut self, question: &str) -> bool {
        loop {
            self.write_prompt(&format!("{} [y/n] ", question));
            let Some(answer) = self.read_line() else {
                return false;
            };

            match answer.to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => self.write_prompt("Please answer y or n.\n"),
            }
        }
    }
}
