use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read the first line of a file with its line terminator removed.
///
/// An empty file yields an empty string.
pub fn read_first_line(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(strip_line_ending(&line).to_string())
}

/// Return the first line of `text` without its terminator.
pub fn first_line(text: &str) -> &str {
    text.lines().next().map(strip_line_ending).unwrap_or("")
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
