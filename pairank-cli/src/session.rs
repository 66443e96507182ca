/// Interactive comparison session: show a pair, read the choice, record it.
use std::io::{BufRead, Write};

use anyhow::Result;
use pairank_core::{ComparisonStore, SessionService};

/// What happened during a session.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub recorded: usize,
    pub finished: bool,
}

enum Choice {
    First,
    Second,
    Quit,
}

fn parse_choice(line: &str) -> Option<Choice> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" => Some(Choice::First),
        "2" => Some(Choice::Second),
        "q" | "quit" => Some(Choice::Quit),
        _ => None,
    }
}

/// Run until every pair is covered, the user quits, or input ends.
pub fn run_session<S: ComparisonStore>(
    service: &SessionService<S>,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<SessionSummary> {
    let mut recorded = 0;

    loop {
        let Some((first, second)) = service.next_pair()?.into_pair()? else {
            writeln!(out, "All pairs have been compared.")?;
            return Ok(SessionSummary { recorded, finished: true });
        };

        loop {
            write!(out, "\n[1] {}\n[2] {}\nWhich is better? (1/2, q to quit): ", first.label, second.label)?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(SessionSummary { recorded, finished: false });
            }

            let (winner, loser) = match parse_choice(&line) {
                Some(Choice::First) => (&first, &second),
                Some(Choice::Second) => (&second, &first),
                Some(Choice::Quit) => return Ok(SessionSummary { recorded, finished: false }),
                None => {
                    writeln!(out, "Please answer 1, 2 or q.")?;
                    continue;
                }
            };
            service.record(winner.id, loser.id)?;
            recorded += 1;
            break;
        }
    }
}
