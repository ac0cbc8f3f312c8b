//! Interactive play: one fresh referee per round until the player leaves.

use crate::table;
use anyhow::Result;
use rps_game_core::{Outcome, RelationTable, RoundReferee};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// What the player typed at the move prompt
#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Exit,
    Help,
    /// Zero-based move index
    Move(usize),
    Invalid,
}

fn parse_choice(input: &str, move_count: usize) -> Choice {
    match input {
        "0" => Choice::Exit,
        "?" => Choice::Help,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=move_count).contains(&n) => Choice::Move(n - 1),
            _ => Choice::Invalid,
        },
    }
}

/// Terminal session over arbitrary input and output streams
pub struct Session<R, W> {
    table: Arc<RelationTable>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(table: Arc<RelationTable>, input: R, output: W) -> Self {
        Self {
            table,
            input,
            output,
        }
    }

    /// Play rounds until the player exits, declines a replay, or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            if !self.play_round()? {
                return Ok(());
            }
            if !self.prompt_replay()? {
                return Ok(());
            }
            writeln!(self.output, "-----")?;
        }
    }

    /// Returns false when the player asked to leave mid-round
    fn play_round(&mut self) -> Result<bool> {
        let mut referee = RoundReferee::new(self.table.clone());
        let commitment = referee.commit()?;
        writeln!(self.output, "HMAC: {commitment}")?;
        self.print_controls()?;

        loop {
            write!(self.output, "Enter your move: ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };

            match parse_choice(&line, self.table.moves().len()) {
                Choice::Exit => return Ok(false),
                Choice::Help => write!(self.output, "{}", table::render(&self.table))?,
                Choice::Move(index) => {
                    let human_move = self
                        .table
                        .moves()
                        .get(index)
                        .unwrap_or_default()
                        .to_string();
                    let record = referee.play(&human_move)?;

                    writeln!(self.output, "Your move: {}", record.human_move)?;
                    writeln!(self.output, "Computer's move: {}", record.opponent_move)?;
                    match record.outcome {
                        Outcome::Draw => writeln!(self.output, "It's a draw!")?,
                        outcome => writeln!(self.output, "You {outcome}!")?,
                    }
                    writeln!(self.output, "Key: {}", record.key)?;
                    return Ok(true);
                }
                Choice::Invalid => {
                    debug!(input = %line, "rejected move input");
                    writeln!(self.output, "Invalid input!")?;
                    self.print_controls()?;
                }
            }
        }
    }

    fn print_controls(&mut self) -> Result<()> {
        for (i, name) in self.table.moves().iter().enumerate() {
            writeln!(self.output, "{} - {}", i + 1, name)?;
        }
        writeln!(self.output, "0 - Exit")?;
        writeln!(self.output, "? - Help")?;
        Ok(())
    }

    fn prompt_replay(&mut self) -> Result<bool> {
        loop {
            writeln!(self.output, "Would you like to play again? [y/n]")?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };
            match line.to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            }
        }
    }

    /// Next trimmed line, or None at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_game_core::{verify_commitment, Commitment, HmacKey};
    use std::io::Cursor;

    fn classic() -> Arc<RelationTable> {
        Arc::new(RelationTable::build(["rock", "paper", "scissors"]).unwrap())
    }

    fn run_session(input: &str) -> String {
        let mut output = Vec::new();
        Session::new(classic(), Cursor::new(input.to_string()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn field<'a>(output: &'a str, prefix: &str) -> Vec<&'a str> {
        output
            .lines()
            .filter_map(|l| l.split(prefix).nth(1))
            .collect()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("0", 3), Choice::Exit);
        assert_eq!(parse_choice("?", 3), Choice::Help);
        assert_eq!(parse_choice("1", 3), Choice::Move(0));
        assert_eq!(parse_choice("3", 3), Choice::Move(2));
        assert_eq!(parse_choice("4", 3), Choice::Invalid);
        assert_eq!(parse_choice("rock", 3), Choice::Invalid);
        assert_eq!(parse_choice("", 3), Choice::Invalid);
        assert_eq!(parse_choice("-1", 3), Choice::Invalid);
    }

    #[test]
    fn test_exit_immediately() {
        let output = run_session("0\n");
        assert!(output.starts_with("HMAC: "));
        assert!(output.contains("1 - rock\n2 - paper\n3 - scissors\n0 - Exit\n? - Help\n"));
        assert!(!output.contains("Key:"));
    }

    #[test]
    fn test_round_disclosure_verifies() {
        let output = run_session("1\nn\n");

        assert_eq!(field(&output, "Your move: "), vec!["rock"]);
        let hmac: Commitment = field(&output, "HMAC: ")[0].parse().unwrap();
        let key: HmacKey = field(&output, "Key: ")[0].parse().unwrap();
        let opponent = field(&output, "Computer's move: ")[0];
        assert!(verify_commitment(opponent, &key, &hmac));

        let verdict = match classic().compare("rock", opponent).unwrap() {
            Outcome::Draw => "It's a draw!",
            Outcome::Win => "You win!",
            Outcome::Lose => "You lose!",
        };
        assert!(output.contains(verdict));
    }

    #[test]
    fn test_help_and_invalid_input() {
        let output = run_session("?\nfoo\n0\n");
        assert!(output.contains("| Player:  | rock | paper | scissors |"));
        assert!(output.contains("Invalid input!"));
        assert_eq!(output.matches("0 - Exit").count(), 2);
    }

    #[test]
    fn test_replay_uses_fresh_commitment() {
        let output = run_session("2\nmaybe\nY\n3\nn\n");

        let hmacs = field(&output, "HMAC: ");
        let keys = field(&output, "Key: ");
        assert_eq!(hmacs.len(), 2);
        assert_eq!(keys.len(), 2);
        assert_ne!(hmacs[0], hmacs[1]);
        assert_ne!(keys[0], keys[1]);
        assert_eq!(output.matches("Would you like to play again? [y/n]").count(), 3);
        assert!(output.contains("-----\n"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let output = run_session("1\n");
        assert!(output.contains("Key: "));
        assert!(output.ends_with("Would you like to play again? [y/n]\n"));
    }
}
