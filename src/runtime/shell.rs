//! Parsing of shell input lines into commands.
//!
//! Song and slot numbers are 1-based on the command line and 0-based in
//! every `Command`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Scan,
    List,
    Search(String),
    Queue,
    All,
    /// `play` alone resumes or starts the current slot.
    Play(Option<usize>),
    Pause,
    Resume,
    Stop,
    Next,
    Prev,
    /// Percent, 0-100.
    Volume(u32),
    Current,
    Random,
    Loop,
    Progress,
    Playlists,
    Create(String),
    Delete(String),
    Show(String),
    Add { playlist: String, index: usize },
    Remove { playlist: String, index: usize },
    PlayPlaylist(String),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for available commands.")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

fn rest_of(line: &str) -> Option<String> {
    line.split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn song_number(token: &str) -> Option<usize> {
    token.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

/// `<name...> <number>`: the last token is the song number, the rest is the
/// playlist name (which may contain spaces).
fn name_and_number(rest: Option<String>) -> Option<(String, usize)> {
    let rest = rest?;
    let (name, num) = rest.rsplit_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), song_number(num)?))
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let Some(word) = line.split_whitespace().next() else {
        return Ok(None);
    };
    let rest = rest_of(line);

    let cmd = match word.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "scan" => Command::Scan,
        "list" => Command::List,
        "search" => Command::Search(rest.ok_or(CommandError::Usage("search <query>"))?),
        "queue" => Command::Queue,
        "all" => Command::All,
        "play" => match rest {
            None => Command::Play(None),
            Some(n) => Command::Play(Some(
                song_number(&n).ok_or(CommandError::Usage("play <number>"))?,
            )),
        },
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "stop" => Command::Stop,
        "next" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "vol" | "volume" => Command::Volume(
            rest.and_then(|v| v.parse::<u32>().ok())
                .ok_or(CommandError::Usage("vol <0-100>"))?,
        ),
        "current" => Command::Current,
        "random" | "shuffle" => Command::Random,
        "loop" => Command::Loop,
        "progress" => Command::Progress,
        "playlists" => Command::Playlists,
        "create" => Command::Create(rest.ok_or(CommandError::Usage("create <name>"))?),
        "delete" => Command::Delete(rest.ok_or(CommandError::Usage("delete <name>"))?),
        "show" => Command::Show(rest.ok_or(CommandError::Usage("show <name>"))?),
        "add" => {
            let (playlist, index) =
                name_and_number(rest).ok_or(CommandError::Usage("add <playlist> <song#>"))?;
            Command::Add { playlist, index }
        }
        "remove" => {
            let (playlist, index) =
                name_and_number(rest).ok_or(CommandError::Usage("remove <playlist> <song#>"))?;
            Command::Remove { playlist, index }
        }
        "playlist" => Command::PlayPlaylist(rest.ok_or(CommandError::Usage("playlist <name>"))?),
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}
