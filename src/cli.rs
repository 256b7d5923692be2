use clap::Parser;
use std::path::PathBuf;

use crate::kernel::event::InputEvent;
use crate::services::backend::ReferenceId;

#[derive(Debug, Parser)]
#[command(name = "guided-ops", version, about = "Guided Operations conversation console")]
pub struct Args {
    /// Backend endpoint root (overrides GUIDED_OPS_BACKEND_URL)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Per-request timeout in seconds (overrides GUIDED_OPS_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Reference document to scope answers to
    #[arg(long)]
    pub reference: Option<String>,
}

/// One line of console input, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Forwarded to the interaction loop in order.
    Inputs(Vec<InputEvent>),
    ListReferences,
    Upload(PathBuf),
    Stats,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Type a question and press Enter to send it. End a line with '\\' for a soft newline (not sent).
  /send            send the current input
  /mic             start or stop voice capture
  /suggest N       put suggestion N in the input
  /ref NAME|none   scope answers to a reference document
  /refs            list reference documents
  /upload PATH     upload a PDF manual
  /cancel          abandon the request in flight
  /stats           show request statistics
  /quit            exit";

pub fn parse_line(line: &str) -> CliCommand {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(command) = line.strip_prefix('/') else {
        return match line.strip_suffix('\\') {
            Some(text) => CliCommand::Inputs(vec![
                InputEvent::typed(text),
                InputEvent::EnterKey { soft_newline: true },
            ]),
            None => CliCommand::Inputs(vec![
                InputEvent::typed(line),
                InputEvent::EnterKey { soft_newline: false },
            ]),
        };
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "send" => CliCommand::Inputs(vec![InputEvent::SendClicked]),
        "mic" => CliCommand::Inputs(vec![InputEvent::MicToggled]),
        "cancel" => CliCommand::Inputs(vec![InputEvent::Cancel]),
        "suggest" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => CliCommand::Inputs(vec![InputEvent::SuggestionSelected(n - 1)]),
            _ => CliCommand::Unknown(line.to_string()),
        },
        "ref" if arg.is_empty() || arg.eq_ignore_ascii_case("none") => {
            CliCommand::Inputs(vec![InputEvent::ReferenceSelected(None)])
        }
        "ref" => CliCommand::Inputs(vec![InputEvent::ReferenceSelected(Some(ReferenceId::new(arg)))]),
        "refs" => CliCommand::ListReferences,
        "upload" if !arg.is_empty() => CliCommand::Upload(PathBuf::from(arg)),
        "stats" => CliCommand::Stats,
        "help" => CliCommand::Help,
        "quit" | "exit" => CliCommand::Quit,
        _ => CliCommand::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_types_then_enters() {
        assert_eq!(
            parse_line("how do I fix the pump\n"),
            CliCommand::Inputs(vec![
                InputEvent::typed("how do I fix the pump"),
                InputEvent::EnterKey { soft_newline: false },
            ])
        );
    }

    #[test]
    fn test_trailing_backslash_is_soft_newline() {
        assert_eq!(
            parse_line("first part\\"),
            CliCommand::Inputs(vec![
                InputEvent::typed("first part"),
                InputEvent::EnterKey { soft_newline: true },
            ])
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_line("/suggest 2"), CliCommand::Inputs(vec![InputEvent::SuggestionSelected(1)]));
        assert_eq!(parse_line("/suggest 0"), CliCommand::Unknown("/suggest 0".into()));
        assert_eq!(
            parse_line("/ref pump_manual.xml"),
            CliCommand::Inputs(vec![InputEvent::ReferenceSelected(Some(ReferenceId::new("pump_manual.xml")))])
        );
        assert_eq!(parse_line("/ref none"), CliCommand::Inputs(vec![InputEvent::ReferenceSelected(None)]));
        assert_eq!(parse_line("/upload ./manual.pdf"), CliCommand::Upload(PathBuf::from("./manual.pdf")));
        assert_eq!(parse_line("/quit"), CliCommand::Quit);
        assert_eq!(parse_line("/dance"), CliCommand::Unknown("/dance".into()));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["guided-ops", "--backend-url", "http://ops:5000", "--reference", "a.xml"]);
        assert_eq!(args.backend_url.as_deref(), Some("http://ops:5000"));
        assert_eq!(args.reference.as_deref(), Some("a.xml"));
        assert!(args.timeout_secs.is_none());
    }

    #[test]
    fn test_zero_timeout_flag_is_rejected() {
        assert!(Args::try_parse_from(["guided-ops", "--timeout-secs", "0"]).is_err());
        let args = Args::try_parse_from(["guided-ops", "--timeout-secs", "5"]).unwrap();
        assert_eq!(args.timeout_secs, Some(5));
    }
}
