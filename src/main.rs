//! `keyhole` — Navigable structural view over a Python source tree.
//!
//! Maintains a lazily-materialized tree of directories, files, and the
//! declarations inside files, so a memory-limited agent can open exactly
//! the slice of a codebase it needs and nothing more.

mod command;
mod error;
mod parser;
mod reconstruct;
mod resolve;
mod scan;
mod tree;
mod unit;

use std::io::{self, BufRead, Write};

use command::Command;
use tree::EntryTree;

struct CliArgs {
    root: String,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut root = None;
    for arg in args {
        match arg.as_str() {
            a if a.starts_with('-') => {
                return Err(format!("unknown option: {a}"));
            }
            _ => {
                if root.is_some() {
                    return Err("expected exactly one project directory".to_string());
                }
                root = Some(arg.clone());
            }
        }
    }
    root.map(|root| CliArgs { root })
        .ok_or_else(|| "no project directory specified".to_string())
}

fn main() {
    let raw: Vec<String> = std::env::args().skip(1).collect();

    if raw.is_empty() || raw[0] == "-h" || raw[0] == "--help" {
        print_help();
        std::process::exit(0);
    }

    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("keyhole: {msg}");
            std::process::exit(1);
        }
    };

    let mut view = match EntryTree::new(&args.root) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("keyhole: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut view) {
        eprintln!("keyhole: {e}");
        std::process::exit(1);
    }
}

/// Interactive loop: render the view, apply one command per line.
///
/// Every tree error is reported and the loop continues; the view stays
/// usable after a failed open or close.
fn run(view: &mut EntryTree) -> io::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    print!("{view}");
    prompt(&mut out)?;

    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "quit" | "exit" => break,
            "show" => print!("{view}"),
            "refresh" => match view.refresh() {
                Ok(()) => print!("{view}"),
                Err(e) => eprintln!("keyhole: {e}"),
            },
            "" => {}
            _ => match command::parse_line(&line) {
                Some(Ok(Command::Open(path))) => match view.open(&path) {
                    Ok(()) => print!("{view}"),
                    Err(e) => eprintln!("keyhole: {e}"),
                },
                Some(Ok(Command::Close(path))) => match view.close(&path) {
                    Ok(()) => print!("{view}"),
                    Err(e) => eprintln!("keyhole: {e}"),
                },
                Some(Err(e)) => eprintln!("keyhole: {e}"),
                None => eprintln!("keyhole: unrecognized input (try `open [\"file.py\"]`)"),
            },
        }
        prompt(&mut out)?;
    }

    Ok(())
}

fn prompt(out: &mut io::Stdout) -> io::Result<()> {
    print!("> ");
    out.flush()
}

fn print_help() {
    eprintln!("keyhole — navigable structural view over a Python source tree");
    eprintln!("Usage: keyhole <project-dir>");
    eprintln!();
    eprintln!("Reads commands from stdin, one per line:");
    eprintln!("  open [\"dir/\", \"file.py\", \"class:Name\", \"func:name\"]");
    eprintln!("  close [\"file.py\"]");
    eprintln!("  refresh            re-read every open entry from disk");
    eprintln!("  show               print the current view");
    eprintln!("  quit               exit");
    eprintln!();
    eprintln!("Path segments: `dir/`, `file.py`, `class:Name`, `func:name`,");
    eprintln!("`func:static:name`, and the fixed children `imports`,");
    eprintln!("`root_code`, `static_vars`, `inherits`.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_accepts_one_directory() {
        let args = parse_args(&["proj".into()]).unwrap();
        assert_eq!(args.root, "proj");
    }

    #[test]
    fn parse_args_requires_a_directory() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn parse_args_rejects_two_directories() {
        assert!(parse_args(&["a".into(), "b".into()]).is_err());
    }

    #[test]
    fn parse_args_rejects_unknown_options() {
        assert!(parse_args(&["--fast".into(), "proj".into()]).is_err());
    }
}
