use std::iter::Peekable;
use std::str::Chars;
use minegrid_core::{Coord, Coord2, Mark};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Quit,
    Move { coords: Coord2, mark: Option<Mark> },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("Invalid coordinate format")]
    InvalidFormat,
    #[error("Coordinate out of range (A-{last})")]
    CoordinateOutOfRange { last: char },
}

/// Parses one line of player input for a grid of `size`.
///
/// Moves are written `[#?]x,y` with `x` the column letter and `y` the row letter, the separator
/// being one of `,.:` or nothing at all. Case and surrounding whitespace are ignored.
pub(crate) fn parse(line: &str, size: Coord) -> Result<Command, CommandError> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "h" => return Ok(Command::Help),
        "q" => return Ok(Command::Quit),
        _ => {}
    }

    let mut chars = line.chars().peekable();
    let mark = match chars.peek() {
        Some('#') => Some(Mark::Flag),
        Some('?') => Some(Mark::Uncertain),
        _ => None,
    };
    if mark.is_some() {
        chars.next();
    }

    skip_whitespace(&mut chars);
    let column = letter(&mut chars)?;
    skip_whitespace(&mut chars);
    if matches!(chars.peek(), Some(',' | '.' | ':')) {
        chars.next();
    }
    skip_whitespace(&mut chars);
    let row = letter(&mut chars)?;
    if chars.next().is_some() {
        return Err(CommandError::InvalidFormat);
    }

    let coords = (index(row, size)?, index(column, size)?);
    Ok(Command::Move { coords, mark })
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn letter(chars: &mut Peekable<Chars<'_>>) -> Result<u8, CommandError> {
    chars
        .next_if(char::is_ascii_lowercase)
        .map(|c| c as u8 - b'a')
        .ok_or(CommandError::InvalidFormat)
}

fn index(letter: u8, size: Coord) -> Result<Coord, CommandError> {
    if letter < size {
        Ok(letter)
    } else {
        Err(CommandError::CoordinateOutOfRange {
            last: axis_label(size - 1),
        })
    }
}

/// Letter shown for row or column `index`.
pub(crate) fn axis_label(index: Coord) -> char {
    char::from(b'A' + index)
}
