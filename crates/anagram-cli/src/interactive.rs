//! Interactive shell: `find`, `add`, `stats`, `help`, `quit`. Ctrl-C
//! leaves the shell the same way `quit` does.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::client::{ApiClient, StatsParams};
use crate::report;

const HELP: &str = "\
Commands:
  find <word>     - Find similar words
  add <word>      - Add new word
  stats           - Show statistics
  help            - Show this help
  quit            - Exit";

/// One parsed shell line.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Look up anagrams.
    Find(String),
    /// Add a word.
    Add(String),
    /// Show unfiltered stats.
    Stats,
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
    /// Blank line.
    Empty,
    /// A known command missing its word.
    MissingWord(&'static str),
    /// Anything else.
    Unknown,
}

/// Parse a shell line. Commands are case-insensitive.
pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim().to_lowercase();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line.as_str(), ""), |(c, r)| (c, r.trim()));

    match (command, rest) {
        ("", _) => ReplCommand::Empty,
        ("quit" | "exit", "") => ReplCommand::Quit,
        ("help", "") => ReplCommand::Help,
        ("stats", "") => ReplCommand::Stats,
        ("find", "") => ReplCommand::MissingWord("find"),
        ("add", "") => ReplCommand::MissingWord("add"),
        ("find", word) => ReplCommand::Find(word.to_owned()),
        ("add", word) => ReplCommand::Add(word.to_owned()),
        _ => ReplCommand::Unknown,
    }
}

/// How a shell session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `quit` or `exit`.
    Quit,
    /// Standard input was closed.
    EndOfInput,
    /// Ctrl-C was pressed.
    Interrupted,
}

/// Run the shell on stdin until `quit`, end of input, or Ctrl-C.
pub async fn run(client: &ApiClient) -> anyhow::Result<SessionEnd> {
    println!("Similar Words API - Interactive Mode");
    println!("{}", "=".repeat(40));
    println!("{HELP}");
    println!("{}", "=".repeat(40));

    let input = BufReader::new(tokio::io::stdin());
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    run_session(client, input, interrupt).await
}

/// Read commands from `input` until `quit`, end of input, or until
/// `interrupt` completes.
pub async fn run_session<R, F>(
    client: &ApiClient,
    input: R,
    interrupt: F,
) -> anyhow::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut stdout = tokio::io::stdout();
    tokio::pin!(interrupt);

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let next = tokio::select! {
            line = lines.next_line() => line?,
            () = &mut interrupt => {
                println!("\nGoodbye!");
                return Ok(SessionEnd::Interrupted);
            }
        };
        let Some(line) = next else {
            println!("\nGoodbye!");
            return Ok(SessionEnd::EndOfInput);
        };

        match parse_line(&line) {
            ReplCommand::Quit => {
                println!("Goodbye!");
                return Ok(SessionEnd::Quit);
            }
            ReplCommand::Help => println!("\n{HELP}"),
            ReplCommand::Stats => report::stats(client, &StatsParams::default()).await,
            ReplCommand::Find(word) => report::similar(client, &word).await,
            ReplCommand::Add(word) => report::add(client, &word).await,
            ReplCommand::MissingWord(command) => {
                println!("Please provide a word: {command} <word>");
            }
            ReplCommand::Empty => {}
            ReplCommand::Unknown => {
                println!("Unknown command. Type 'help' for available commands.");
            }
        }
    }
}
