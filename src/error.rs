use std::fmt;


// Problems with an inbound server event. None of them are recoverable: the client logs the error
// and waits for the next snapshot, which overwrites the view anyway.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    ServerReturnedError(String),
    UnknownEvent(String),
    MalformedPayload { event: String, message: String },
    CannotApplyEvent(String),
}

// A local user action that the client refused to turn into an outbound event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CommandError {
    NoSuchHandTile(usize),
    NoTileSelected,
    NotEnoughTilesToExchange { tiles_left: i32 },
    TileUnavailable(String),
    EmptyGuess,
    RoundOver,
    ActionUnavailable(&'static str),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::ServerReturnedError(message) => write!(f, "Got error from server: {message}"),
            EventError::UnknownEvent(name) => write!(f, "Unknown server event \"{name}\""),
            EventError::MalformedPayload { event, message } => {
                write!(f, "Malformed payload for \"{event}\": {message}")
            }
            EventError::CannotApplyEvent(message) => write!(f, "Cannot apply event: {message}"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NoSuchHandTile(index) => write!(f, "There is no hand tile #{index}"),
            CommandError::NoTileSelected => write!(f, "Select a hand tile first"),
            CommandError::NotEnoughTilesToExchange { tiles_left } => {
                write!(f, "Cannot exchange: only {tiles_left} tiles left")
            }
            CommandError::TileUnavailable(word) => write!(f, "\"{word}\" cannot be guessed"),
            CommandError::EmptyGuess => write!(f, "Guess is empty"),
            CommandError::RoundOver => write!(f, "The round is over"),
            CommandError::ActionUnavailable(action) => write!(f, "Cannot {action} right now"),
        }
    }
}

impl std::error::Error for EventError {}
impl std::error::Error for CommandError {}
