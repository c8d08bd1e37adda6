//! The read-execute-print loop.
//!
//! Each input line runs at most one editor operation and prints its status
//! (or error) as a single line. Histogram output is one line per bin.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use pnmedit_core::{EditError, Editor};
use tracing::trace;

use crate::command::Command;

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Run commands from `input` until `EXIT` or end of input.
///
/// Only failures to read input or write output are returned as errors; every
/// editing failure is reported on `out` and the loop continues.
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> Result<()> {
    let mut editor = Editor::new();

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if execute_line(&mut editor, &line, out)? == Flow::Exit {
            break;
        }
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}

/// Execute one command line against `editor`.
pub fn execute_line<W: Write>(editor: &mut Editor, line: &str, out: &mut W) -> Result<Flow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, args)) = tokens.split_first() else {
        return Ok(Flow::Continue);
    };
    trace!(verb, ?args, "command");

    if !editor.is_loaded() && !Command::allowed_without_image(verb) {
        writeln!(out, "{}", EditError::NoImageLoaded)?;
        return Ok(Flow::Continue);
    }

    let command = match Command::parse(verb, args) {
        Ok(command) => command,
        Err(err) => {
            writeln!(out, "{err}")?;
            return Ok(Flow::Continue);
        }
    };

    let outcome = match command {
        Command::Exit => {
            if editor.close().is_none() {
                writeln!(out, "{}", EditError::NoImageLoaded)?;
            }
            return Ok(Flow::Exit);
        }
        Command::Ignore => return Ok(Flow::Continue),
        Command::Load(path) => editor.load(path),
        Command::Save { path, ascii } => editor.save(path, ascii),
        Command::Select { x1, y1, x2, y2 } => editor.select(x1, y1, x2, y2),
        Command::SelectAll => editor.select_all(),
        Command::Crop => editor.crop(),
        Command::Apply(filter) => editor.apply(filter),
        Command::Equalize => editor.equalize(),
        Command::Histogram { max_stars, bins } => editor.histogram(max_stars, bins),
        Command::Rotate(angle) => editor.rotate(angle),
    };

    match outcome {
        Ok(status) => writeln!(out, "{status}")?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    fn run_script(script: &str) -> String {
        let mut out = Vec::new();
        run(Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn write_gray_binary(path: &Path, width: u32, height: u32, value: u8) {
        let mut bytes = format!("P5\n{width} {height}\n255\n").into_bytes();
        bytes.extend(std::iter::repeat(value).take((width * height) as usize));
        std::fs::write(path, bytes).unwrap();
    }

    fn write_rgb_binary(path: &Path, width: u32, height: u32) {
        let mut bytes = format!("P6\n{width} {height}\n255\n").into_bytes();
        for y in 0..height {
            for x in 0..width {
                bytes.extend_from_slice(&[(x * 20) as u8, (y * 20) as u8, 7]);
            }
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_no_image_loaded() {
        let output = run_script("SELECT ALL\nCROP\nFLIP\nHISTOGRAM 1 1\nEXIT\n");
        assert_eq!(
            output,
            "No image loaded\nNo image loaded\nNo image loaded\nNo image loaded\nNo image loaded\n"
        );
    }

    #[test]
    fn test_blank_lines_and_end_of_input() {
        assert_eq!(run_script("\n   \n"), "");
    }

    #[test]
    fn test_load_failure() {
        let output = run_script("LOAD /nonexistent/x.pgm\nCROP\n");
        assert_eq!(
            output,
            "Failed to load /nonexistent/x.pgm\nNo image loaded\n"
        );
    }

    #[test]
    fn test_histogram_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.pgm");
        write_gray_binary(&path, 4, 4, 100);

        let output = run_script(&format!(
            "LOAD {}\nHISTOGRAM 10 4\nEXIT\n",
            path.display()
        ));
        let expected = format!(
            "Loaded {}\n0\t|\t\n10\t|\t**********\n0\t|\t\n0\t|\t\n",
            path.display()
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_crop_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ppm");
        let cropped = dir.path().join("out.ppm");
        write_rgb_binary(&input, 8, 8);

        let output = run_script(&format!(
            "LOAD {}\nSELECT 6 6 2 2\nCROP\nSAVE {} ascii\nEXIT\n",
            input.display(),
            cropped.display()
        ));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "Selected 2 2 6 6");
        assert_eq!(lines[2], "Image cropped");
        assert_eq!(lines[3], format!("Saved {}", cropped.display()));

        let text = std::fs::read_to_string(&cropped).unwrap();
        let mut rows = text.lines();
        assert_eq!(rows.next(), Some("P3"));
        assert_eq!(rows.next(), Some("4 4"));
        assert_eq!(rows.next(), Some("255"));
        // Pixel (2, 2) of the original: x * 20, y * 20, 7
        assert!(rows.next().unwrap().starts_with("40 40 7 60 40 7"));
    }

    #[test]
    fn test_error_messages() {
        let dir = tempfile::tempdir().unwrap();
        let gray = dir.path().join("g.pgm");
        write_gray_binary(&gray, 6, 6, 5);

        let output = run_script(&format!(
            "LOAD {}\nSELECT 0 0 7 7\nSELECT 1 1 2\nAPPLY\nAPPLY SEPIA\nAPPLY EDGE\n\
             HISTOGRAM 5 0\nHISTOGRAM 5\nSELECT 0 0 3 2\nROTATE 90\nROTATE 45\nBOGUS\n",
            gray.display()
        ));
        let lines: Vec<&str> = output.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec![
                "Invalid set of coordinates",
                "Invalid command",
                "Invalid command",
                "APPLY parameter invalid",
                "Easy, Charlie Chaplin",
                "Invalid set of parameters",
                "Invalid command",
                "Selected 0 0 3 2",
                "The selection must be square",
                "Unsupported rotation angle",
                "Invalid command",
            ]
        );
    }

    #[test]
    fn test_rgb_only_and_gray_only_operations() {
        let dir = tempfile::tempdir().unwrap();
        let rgb = dir.path().join("c.ppm");
        write_rgb_binary(&rgb, 4, 4);

        let output = run_script(&format!(
            "LOAD {}\nAPPLY BLUR\nEQUALIZE\nHISTOGRAM 3 3\nROTATE -90\nSELECT ALL\n",
            rgb.display()
        ));
        let lines: Vec<&str> = output.lines().skip(1).collect();
        assert_eq!(
            lines,
            vec![
                "APPLY BLUR done",
                "Black and white image needed",
                "Black and white image needed",
                "Rotated -90",
                "Selected ALL",
            ]
        );
    }

    #[test]
    fn test_exit_stops_reading() {
        let dir = tempfile::tempdir().unwrap();
        let gray = dir.path().join("g.pgm");
        write_gray_binary(&gray, 2, 2, 9);

        let output = run_script(&format!("LOAD {}\nEXIT\nEQUALIZE\n", gray.display()));
        assert_eq!(output, format!("Loaded {}\n", gray.display()));
    }

    #[test]
    fn test_argument_less_commands_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let gray = dir.path().join("g.pgm");
        write_gray_binary(&gray, 2, 2, 9);

        let output = run_script(&format!("LOAD\nLOAD {}\nSAVE\nROTATE\nEQUALIZE\n", gray.display()));
        assert_eq!(
            output,
            format!("Loaded {}\nEqualize done\n", gray.display())
        );
    }

    #[test]
    fn test_execute_line_flow() {
        let mut editor = Editor::new();
        let mut out = Vec::new();

        assert_eq!(execute_line(&mut editor, "", &mut out).unwrap(), Flow::Continue);
        assert_eq!(execute_line(&mut editor, "EXIT", &mut out).unwrap(), Flow::Exit);
        assert_eq!(String::from_utf8(out).unwrap(), "No image loaded\n");
    }
}
