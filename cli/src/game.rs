use anyhow::Result;
use minegrid_core::{Coord, MAX_SIZE, MIN_SIZE, Outcome, Session};
use std::io::{BufRead, Write};

use crate::board::format_board;
use crate::command::{self, Command};

const HELP: &str = "\
x,y  - Clear cell at coordinates (x,y)
         (ignored if the cell is cleared or marked)
x,y  - Clear neighbours of numbered cell (x,y)
         (ignored unless the number equals the neighbouring '#' flags)
#x,y - Set '#' flag, change it to '?', or remove all marks on cell (x,y)
         (ignored if the cell is cleared)
?x,y - Set uncertain mark '?' or remove all marks on cell (x,y)
         (ignored if the cell is cleared)
h    - Print this help message
q    - Quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Ending {
    Won,
    Lost,
    Quit,
}

/// Writes `text` and reads one line, `None` at end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Asks for a grid dimension until a valid one is entered.
pub(crate) fn read_size(input: &mut impl BufRead, out: &mut impl Write) -> Result<Option<Coord>> {
    let text = format!("Enter grid dimension ({MIN_SIZE}-{MAX_SIZE}): ");
    while let Some(line) = prompt(input, out, &text)? {
        match line.trim().parse::<Coord>() {
            Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => return Ok(Some(size)),
            _ => writeln!(out, "Not a valid size")?,
        }
    }
    Ok(None)
}

/// Runs the prompt loop until the game ends or the player quits.
pub(crate) fn play(
    session: &mut Session,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Ending> {
    while !session.is_finished() {
        write!(out, "{}", format_board(&session.render(false)))?;
        writeln!(out, "Mines left: {}", session.mines_left())?;

        loop {
            let Some(line) = prompt(input, out, "Enter grid coordinates ([#?]x,y): ")? else {
                return Ok(Ending::Quit);
            };

            match command::parse(&line, session.size()) {
                Ok(Command::Help) => writeln!(out, "{HELP}")?,
                Ok(Command::Quit) => return Ok(Ending::Quit),
                Ok(Command::Move { coords, mark }) => {
                    let report = session.apply_move(coords, mark)?;
                    log::debug!("cleared {} cells, now {:?}", report.cleared, report.outcome);
                    break;
                }
                Err(err) => writeln!(out, "{err}")?,
            }
        }
    }

    write!(out, "{}", format_board(&session.render(true)))?;
    Ok(match session.outcome() {
        Outcome::Won => {
            writeln!(out, "Congratulations!")?;
            Ending::Won
        }
        Outcome::Lost | Outcome::InProgress => {
            writeln!(out, "Sorry, try again!")?;
            Ending::Lost
        }
    })
}
