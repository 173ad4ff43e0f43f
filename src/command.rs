use crate::error::ViewError;

/// A single tree mutation requested over the command boundary.
#[derive(Debug, PartialEq)]
pub enum Command {
    Open(Vec<String>),
    Close(Vec<String>),
}

/// Parse one line into a command, if it is one.
///
/// The driving agent's replies interleave commands with prose; a line that
/// does not start with `open [` or `close [` is not a command and yields
/// `None`. A command keyword followed by a malformed path array is an
/// error.
pub fn parse_line(line: &str) -> Option<Result<Command, ViewError>> {
    let line = line.trim();
    for (keyword, build) in [
        ("open", Command::Open as fn(Vec<String>) -> Command),
        ("close", Command::Close as fn(Vec<String>) -> Command),
    ] {
        let Some(rest) = line.strip_prefix(keyword) else {
            continue;
        };
        let rest = rest.trim_start();
        if rest.starts_with('[') {
            return Some(parse_path(rest).map(build));
        }
    }
    None
}

/// Extract every command from a multi-line reply, in order.
pub fn parse_block(text: &str) -> Vec<Result<Command, ViewError>> {
    text.lines().filter_map(parse_line).collect()
}

/// The path form of the command boundary is a literal array of segment
/// strings, which is valid JSON.
fn parse_path(text: &str) -> Result<Vec<String>, ViewError> {
    serde_json::from_str(text).map_err(|e| ViewError::BadCommand(e.to_string()))
}
