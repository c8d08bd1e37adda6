//! Command-line tokenizing and parsing.
//!
//! A line is split on whitespace; the first token is the verb and the rest
//! are its arguments. Verbs are case-sensitive.

use std::path::PathBuf;

use pnmedit_core::Filter;
use thiserror::Error;

/// Errors reported for malformed command lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown verb, or missing/malformed arguments.
    #[error("Invalid command")]
    Invalid,

    /// `APPLY` with a filter name that is not recognized.
    #[error("APPLY parameter invalid")]
    UnknownFilter(String),
}

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Save { path: PathBuf, ascii: bool },
    Select { x1: i64, y1: i64, x2: i64, y2: i64 },
    SelectAll,
    Crop,
    Apply(Filter),
    Equalize,
    Histogram { max_stars: i64, bins: i64 },
    Rotate(i32),
    Exit,
    /// A known verb whose required argument is absent; silently skipped.
    Ignore,
}

impl Command {
    /// Whether this verb may run with no image loaded.
    pub fn allowed_without_image(verb: &str) -> bool {
        matches!(verb, "LOAD" | "EXIT")
    }

    /// Parse a verb and its argument tokens.
    pub fn parse(verb: &str, args: &[&str]) -> Result<Self, ParseError> {
        match verb {
            "EXIT" => Ok(Command::Exit),
            "LOAD" => Ok(args
                .first()
                .map_or(Command::Ignore, |path| Command::Load(PathBuf::from(path)))),
            "SAVE" => Ok(match args {
                [] => Command::Ignore,
                [path, rest @ ..] => Command::Save {
                    path: PathBuf::from(path),
                    ascii: rest.first() == Some(&"ascii"),
                },
            }),
            "SELECT" => parse_select(args),
            "CROP" => Ok(Command::Crop),
            "APPLY" => {
                let name = args.first().ok_or(ParseError::Invalid)?;
                Filter::from_name(name)
                    .map(Command::Apply)
                    .ok_or_else(|| ParseError::UnknownFilter(name.to_string()))
            }
            "EQUALIZE" => Ok(Command::Equalize),
            "HISTOGRAM" => match args {
                [max_stars, bins] => Ok(Command::Histogram {
                    max_stars: parse_int(max_stars)?,
                    bins: parse_int(bins)?,
                }),
                _ => Err(ParseError::Invalid),
            },
            "ROTATE" => match args.first() {
                None => Ok(Command::Ignore),
                Some(angle) => Ok(Command::Rotate(parse_int(angle)?)),
            },
            _ => Err(ParseError::Invalid),
        }
    }
}

fn parse_select(args: &[&str]) -> Result<Command, ParseError> {
    match args {
        ["ALL", ..] => Ok(Command::SelectAll),
        [x1, y1, x2, y2, ..] => Ok(Command::Select {
            x1: parse_int(x1)?,
            y1: parse_int(y1)?,
            x2: parse_int(x2)?,
            y2: parse_int(y2)?,
        }),
        _ => Err(ParseError::Invalid),
    }
}

fn parse_int<T: std::str::FromStr>(token: &str) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Command::parse(tokens[0], &tokens[1..])
    }

    #[test]
    fn test_simple_verbs() {
        assert_eq!(parse("EXIT"), Ok(Command::Exit));
        assert_eq!(parse("CROP"), Ok(Command::Crop));
        assert_eq!(parse("EQUALIZE"), Ok(Command::Equalize));
    }

    #[test]
    fn test_load() {
        assert_eq!(parse("LOAD a.ppm"), Ok(Command::Load(PathBuf::from("a.ppm"))));
        assert_eq!(parse("LOAD"), Ok(Command::Ignore));
    }

    #[test]
    fn test_save() {
        assert_eq!(
            parse("SAVE out.pgm"),
            Ok(Command::Save {
                path: PathBuf::from("out.pgm"),
                ascii: false
            })
        );
        assert_eq!(
            parse("SAVE out.pgm ascii"),
            Ok(Command::Save {
                path: PathBuf::from("out.pgm"),
                ascii: true
            })
        );
        assert_eq!(
            parse("SAVE out.pgm ASCII"),
            Ok(Command::Save {
                path: PathBuf::from("out.pgm"),
                ascii: false
            })
        );
        assert_eq!(parse("SAVE"), Ok(Command::Ignore));
    }

    #[test]
    fn test_select() {
        assert_eq!(parse("SELECT ALL"), Ok(Command::SelectAll));
        assert_eq!(
            parse("SELECT 5 5 -2 2"),
            Ok(Command::Select {
                x1: 5,
                y1: 5,
                x2: -2,
                y2: 2
            })
        );
        assert_eq!(parse("SELECT"), Err(ParseError::Invalid));
        assert_eq!(parse("SELECT 1 2 3"), Err(ParseError::Invalid));
        assert_eq!(parse("SELECT 1 2 x 4"), Err(ParseError::Invalid));
        assert_eq!(parse("SELECT all"), Err(ParseError::Invalid));
    }

    #[test]
    fn test_apply() {
        assert_eq!(parse("APPLY SHARPEN"), Ok(Command::Apply(Filter::Sharpen)));
        assert_eq!(
            parse("APPLY GAUSSIAN_BLUR"),
            Ok(Command::Apply(Filter::GaussianBlur))
        );
        assert_eq!(parse("APPLY"), Err(ParseError::Invalid));
        assert_eq!(
            parse("APPLY SEPIA"),
            Err(ParseError::UnknownFilter("SEPIA".to_string()))
        );
        assert_eq!(
            ParseError::UnknownFilter("SEPIA".to_string()).to_string(),
            "APPLY parameter invalid"
        );
    }

    #[test]
    fn test_histogram() {
        assert_eq!(
            parse("HISTOGRAM 10 4"),
            Ok(Command::Histogram {
                max_stars: 10,
                bins: 4
            })
        );
        assert_eq!(parse("HISTOGRAM 10"), Err(ParseError::Invalid));
        assert_eq!(parse("HISTOGRAM 10 4 2"), Err(ParseError::Invalid));
        assert_eq!(parse("HISTOGRAM ten 4"), Err(ParseError::Invalid));
    }

    #[test]
    fn test_rotate() {
        assert_eq!(parse("ROTATE -90"), Ok(Command::Rotate(-90)));
        assert_eq!(parse("ROTATE"), Ok(Command::Ignore));
        assert_eq!(parse("ROTATE left"), Err(ParseError::Invalid));
    }

    #[test]
    fn test_unknown_verb() {
        assert_eq!(parse("FLIP"), Err(ParseError::Invalid));
        assert_eq!(parse("load a.ppm"), Err(ParseError::Invalid));
    }

    #[test]
    fn test_allowed_without_image() {
        assert!(Command::allowed_without_image("LOAD"));
        assert!(Command::allowed_without_image("EXIT"));
        assert!(!Command::allowed_without_image("SAVE"));
        assert!(!Command::allowed_without_image("FLIP"));
    }
}
