//! Command implementations, one module per pipeline stage

pub mod dates;
pub mod fetch;
pub mod load;
pub mod openings;
pub mod report;
pub mod run;

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

use crate::source::normalize_player;

/// Player from the command line, or asked for on stdin
pub fn resolve_player(arg: Option<String>) -> Result<String> {
    match arg {
        Some(raw) => checked(&raw),
        None => {
            let stdin = std::io::stdin();
            prompt_player(stdin.lock(), std::io::stdout())
        }
    }
}

pub fn prompt_player(mut input: impl BufRead, mut output: impl Write) -> Result<String> {
    write!(output, "Enter the Chess.com username: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    checked(&line)
}

fn checked(raw: &str) -> Result<String> {
    let player = normalize_player(raw);
    if player.is_empty() {
        bail!("no username given");
    }
    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_is_normalized() {
        assert_eq!(resolve_player(Some(" Hikaru ".into())).unwrap(), "hikaru");
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut shown = Vec::new();
        let player = prompt_player("DanielNaroditsky\nignored\n".as_bytes(), &mut shown).unwrap();
        assert_eq!(player, "danielnaroditsky");
        assert_eq!(String::from_utf8(shown).unwrap(), "Enter the Chess.com username: ");
    }

    #[test]
    fn test_blank_answer_is_rejected() {
        assert!(prompt_player("   \n".as_bytes(), Vec::new()).is_err());
    }
}
