// kb-helper: Reference preparation and pseudoalignment of single-cell RNA-seq samples.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use std::io::BufRead;
use std::io::Write;

type E = Box<dyn std::error::Error>;

/// What to do with an alignment that already exists.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Always run the alignment again.
    Always,
    /// Keep the existing alignment.
    Never,
    /// Ask with a [Prompt].
    #[default]
    Prompt,
}

impl std::str::FromStr for OverwriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(OverwriteMode::Always),
            "never" => Ok(OverwriteMode::Never),
            "prompt" => Ok(OverwriteMode::Prompt),
            _ => Err(format!("'{}' is not a valid OverwriteMode", s)),
        }
    }
}

/// Source of answers to yes/no questions.
pub trait Prompt {
    /// Asks `question` and returns the raw answer.
    fn ask(&mut self, question: &str) -> Result<String, E>;
}

/// Asks on stdout and reads one line from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String, E> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(&['\n', '\r'][..]).to_string())
    }
}

/// Gives the same answer to every question.
#[derive(Debug, Clone)]
pub struct FixedAnswer {
    pub answer: String,
    /// Number of questions asked so far.
    pub asked: usize,
}

impl FixedAnswer {
    pub fn new(answer: &str) -> Self {
        FixedAnswer { answer: answer.to_string(), asked: 0 }
    }
}

impl Prompt for FixedAnswer {
    fn ask(&mut self, _question: &str) -> Result<String, E> {
        self.asked += 1;
        Ok(self.answer.clone())
    }
}

/// Returns true only for the exact answer `yes`.
pub fn is_yes(answer: &str) -> bool {
    answer == "yes"
}
