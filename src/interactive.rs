//! Line-driven suggestion session
use crate::error::Result;
use crate::output::OutputFormatter;
use crate::suggest::{Commit, Key, SuggestSession};
use colored::*;
use log::info;
use std::io::{BufRead, Write};

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the whole input text at once
    Text(String),
    /// Feed the text one keystroke at a time
    Type(String),
    Key(Key),
    Focus,
    Blur,
    Hover(usize),
    Click(usize),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Text(line.to_string()));
        };
        let (name, arg) = match rest.split_once(' ') {
            Some((name, arg)) => (name, Some(arg)),
            None => (rest, None),
        };
        let row = |arg: Option<&str>| -> std::result::Result<usize, String> {
            let arg = arg.ok_or_else(|| format!(":{name} needs a row number"))?;
            let shown: usize = arg
                .trim()
                .parse()
                .map_err(|_| format!("Invalid row number: {arg}"))?;
            // rows are shown 1-based
            shown
                .checked_sub(1)
                .ok_or_else(|| "Row numbers start at 1".to_string())
        };

        match name {
            "type" => Ok(Command::Type(arg.unwrap_or_default().to_string())),
            "down" => Ok(Command::Key(Key::ArrowDown)),
            "up" => Ok(Command::Key(Key::ArrowUp)),
            "enter" => Ok(Command::Key(Key::Enter)),
            "esc" => Ok(Command::Key(Key::Escape)),
            "focus" => Ok(Command::Focus),
            "blur" => Ok(Command::Blur),
            "hover" => row(arg).map(Command::Hover),
            "click" => row(arg).map(Command::Click),
            "help" | "h" => Ok(Command::Help),
            "q" | "quit" => Ok(Command::Quit),
            other => Err(format!("Unknown command :{other} (try :help)")),
        }
    }
}

pub struct InteractiveSession {
    session: SuggestSession,
    formatter: OutputFormatter,
}

impl InteractiveSession {
    pub fn new(session: SuggestSession, formatter: OutputFormatter) -> Self {
        Self { session, formatter }
    }

    pub fn session(&self) -> &SuggestSession {
        &self.session
    }

    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        info!("Starting interactive suggestion session");
        self.session.focus();
        display_help(out)?;

        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(out, "{}", message.red())?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            self.execute(command, out).await?;
        }

        info!("Interactive session finished");
        Ok(())
    }

    async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        let commit = match command {
            Command::Text(text) => {
                self.session.input(&text);
                None
            }
            Command::Type(text) => {
                let mut typed = String::new();
                for c in text.chars() {
                    typed.push(c);
                    self.session.input(&typed);
                }
                None
            }
            Command::Key(key) => self.session.key(key),
            Command::Focus => {
                self.session.focus();
                None
            }
            Command::Blur => {
                self.session.blur();
                None
            }
            Command::Hover(row) => {
                self.session.hover(row);
                None
            }
            Command::Click(row) => self.session.click(row),
            Command::Help => return display_help(out),
            Command::Quit => return Ok(()),
        };

        self.session.settle().await;
        if let Some(commit) = commit {
            writeln!(out, "{}", describe_commit(&commit))?;
        }
        write!(out, "{}", self.formatter.format_panel(&self.session.panel())?)?;
        out.flush()?;
        Ok(())
    }
}

fn describe_commit(commit: &Commit) -> String {
    match commit {
        Commit::Item(item) => format!(
            "{} {} {} (id {})",
            "Selected".green(),
            item.kind.as_str(),
            item.label.bold(),
            item.id
        ),
        Commit::FullResults(text) => {
            format!("{} \"{}\"", "Showing all results for".green(), text)
        }
    }
}

fn display_help<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", "Interactive Commands:".green().bold())?;
    writeln!(out, "  {} - Set the search text", "<text>".yellow())?;
    writeln!(out, "  {} - Type text keystroke by keystroke", ":type <text>".yellow())?;
    writeln!(out, "  {} - Move the highlight", ":down / :up".yellow())?;
    writeln!(out, "  {} - Commit the highlight or search all", ":enter".yellow())?;
    writeln!(out, "  {} - Close the panel", ":esc".yellow())?;
    writeln!(out, "  {} - Focus or leave the search box", ":focus / :blur".yellow())?;
    writeln!(out, "  {} - Point at or click a row", ":hover N / :click N".yellow())?;
    writeln!(out, "  {} - Show this help", ":help".yellow())?;
    writeln!(out, "  {} - Quit", ":q".yellow())?;
    Ok(())
}
