// Client of the scrambled-word game: players look for words on a letter grid until a countdown
// runs out, then the server scores the round. Words found by a single player score in full.

use std::sync::mpsc;

use crate::countdown::{Countdown, EXPIRED_DISPLAY, EpochMillis};
use crate::error::{CommandError, EventError};
use crate::event::{
    GuessReply, RoundSummary, ScrambledClientEvent, ScrambledServerEvent, ScrambledSnapshot,
};
use crate::surface::{ElementSpec, Surface};


pub const BOARD_CONTAINER_ID: &str = "inner-button-container";
pub const TIME_REMAINING_ID: &str = "time-remaining-div";
pub const VALID_WORDS_ID: &str = "valid-words-div";
pub const ROUND_SCORE_ID: &str = "round-score-div";
pub const TOTAL_SCORE_ID: &str = "total-score-div";
pub const GUESS_SUBMIT_ID: &str = "guessWordSubmit";
pub const GUESS_INPUT_ID: &str = "guessWordInput";
pub const PLAYERS_LIST_ID: &str = "players-list";

const PATH_TILE_CLASS: &str = "path-tile";
const NO_ROUND_SCORE: &str = "_";

pub fn letter_tile_id(index: usize) -> String { format!("tile-{index}") }

pub fn guess_element_id(word: &str) -> String { format!("valid-guess-{}", word.to_lowercase()) }


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GuessStatus {
    Pending,
    Scored { value: u32, sole_guesser: bool },
    Unscored,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GuessEntry {
    pub word: String,
    pub status: GuessStatus,
}

impl GuessEntry {
    fn pending(word: String) -> Self { GuessEntry { word, status: GuessStatus::Pending } }

    pub fn display_text(&self) -> String {
        let word = self.word.to_uppercase();
        match self.status {
            GuessStatus::Scored { value, .. } => format!("{word} +{value}"),
            GuessStatus::Pending | GuessStatus::Unscored => word,
        }
    }

    pub fn status_class(&self) -> Option<&'static str> {
        match self.status {
            GuessStatus::Pending => None,
            GuessStatus::Scored { sole_guesser: true, .. } => Some("scored-word"),
            GuessStatus::Scored { sole_guesser: false, .. } => Some("partial-scored-word"),
            GuessStatus::Unscored => Some("unscored-word"),
        }
    }

    fn matches(&self, word: &str) -> bool { self.word.to_lowercase() == word.to_lowercase() }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    RoundStarted,
    TimerExpired,
    GuessAccepted(String),
    GuessRejected(String),
    RoundOver { round_score: u32 },
    PlayersUpdated,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ScrambledView {
    pub tiles: Vec<String>,
    pub countdown: Countdown,
    pub time_display: String,
    // Newest first.
    pub guesses: Vec<GuessEntry>,
    // Tile indices of the last accepted word.
    pub path: Vec<usize>,
    pub round_score: Option<u32>,
    pub total_score: Option<u32>,
    pub guessing_enabled: bool,
    pub players: String,
}

impl ScrambledView {
    pub fn new() -> Self { Self::default() }

    pub fn guess(&self, word: &str) -> Option<&GuessEntry> {
        self.guesses.iter().find(|entry| entry.matches(word))
    }

    pub fn apply_snapshot(&mut self, snapshot: ScrambledSnapshot) {
        let ScrambledSnapshot { tiles, expire_time, player_guesses, player_total_score } = snapshot;
        self.tiles = tiles;
        self.countdown.arm(expire_time);
        self.time_display.clear();
        self.guesses = player_guesses.into_iter().rev().map(GuessEntry::pending).collect();
        self.path.clear();
        self.round_score = None;
        if let Some(total) = player_total_score {
            self.total_score = Some(total);
        }
        self.guessing_enabled = true;
    }

    // Returns the event to send when the countdown has just run out.
    pub fn tick(&mut self, now: EpochMillis) -> Option<ScrambledClientEvent> {
        let tick = self.countdown.tick(now)?;
        self.time_display = tick.display;
        if tick.expired {
            self.guessing_enabled = false;
            Some(ScrambledClientEvent::TimerExpired)
        } else {
            None
        }
    }

    pub fn submit_guess(&mut self, text: &str) -> Result<ScrambledClientEvent, CommandError> {
        let guess = text.trim();
        if guess.is_empty() {
            return Err(CommandError::EmptyGuess);
        }
        if !self.guessing_enabled {
            return Err(CommandError::RoundOver);
        }
        self.path.clear();
        Ok(ScrambledClientEvent::Guess { guess: guess.to_owned() })
    }

    // Returns whether the guess was accepted.
    pub fn apply_guess_reply(&mut self, reply: GuessReply) -> bool {
        let GuessReply { valid, guess, path } = reply;
        if !valid {
            return false;
        }
        if self.guess(&guess).is_none() {
            self.guesses.insert(0, GuessEntry::pending(guess));
        }
        self.path = path.unwrap_or_default();
        true
    }

    pub fn apply_round_summary(&mut self, summary: RoundSummary) -> u32 {
        let RoundSummary {
            scored_words,
            scored_word_values,
            scored_word_guessers,
            unscored_words,
            total_score,
        } = summary;
        let mut round_score = 0;
        let scored = scored_words.iter().zip(scored_word_values).zip(scored_word_guessers);
        for ((word, value), guessers) in scored {
            round_score += value;
            let status = GuessStatus::Scored { value, sole_guesser: guessers == 1 };
            self.set_status(word, status);
        }
        for word in &unscored_words {
            self.set_status(word, GuessStatus::Unscored);
        }
        self.round_score = Some(round_score);
        self.total_score = Some(total_score);
        // Scores are final even if the local clock has not caught up with the server yet.
        if self.countdown.is_armed() {
            self.countdown.disarm();
            self.time_display = EXPIRED_DISPLAY.to_owned();
        }
        self.guessing_enabled = false;
        round_score
    }

    pub fn new_game(&mut self) -> ScrambledClientEvent {
        self.path.clear();
        ScrambledClientEvent::NewGame
    }

    fn set_status(&mut self, word: &str, status: GuessStatus) {
        match self.guesses.iter_mut().find(|entry| entry.matches(word)) {
            Some(entry) => entry.status = status,
            None => log::warn!("Round summary mentions \"{word}\" which is not among my guesses"),
        }
    }
}


pub struct ScrambledClient {
    room: String,
    view: ScrambledView,
    events_tx: mpsc::Sender<ScrambledClientEvent>,
}

impl ScrambledClient {
    pub fn new(room: String, events_tx: mpsc::Sender<ScrambledClientEvent>) -> Self {
        ScrambledClient { room, view: ScrambledView::new(), events_tx }
    }

    pub fn room(&self) -> &str { &self.room }
    pub fn view(&self) -> &ScrambledView { &self.view }

    pub fn join(&mut self) { self.send(ScrambledClientEvent::Join); }

    pub fn submit_guess(&mut self, text: &str) -> Result<(), CommandError> {
        let event = self.view.submit_guess(text)?;
        self.send(event);
        Ok(())
    }

    // The caller is responsible for asking the user first: the round is abandoned.
    pub fn new_game(&mut self) {
        let event = self.view.new_game();
        self.send(event);
    }

    // Call about once a second. Returns true on the tick that ended the round.
    pub fn tick(&mut self, now: EpochMillis) -> bool {
        match self.view.tick(now) {
            Some(event) => {
                log::info!("Round timer expired");
                self.send(event);
                true
            }
            None => false,
        }
    }

    pub fn process_server_event(
        &mut self, event: ScrambledServerEvent, now: EpochMillis,
    ) -> Result<NotableEvent, EventError> {
        log::debug!("Processing {event:?}");
        match event {
            ScrambledServerEvent::GameState(snapshot) => {
                self.view.apply_snapshot(snapshot);
                // Show the countdown right away instead of waiting for the next tick.
                if self.tick(now) {
                    Ok(NotableEvent::TimerExpired)
                } else {
                    Ok(NotableEvent::RoundStarted)
                }
            }
            ScrambledServerEvent::GuessReplied(reply) => {
                let guess = reply.guess.clone();
                if self.view.apply_guess_reply(reply) {
                    Ok(NotableEvent::GuessAccepted(guess))
                } else {
                    Ok(NotableEvent::GuessRejected(guess))
                }
            }
            ScrambledServerEvent::GameOver(summary) => {
                let round_score = self.view.apply_round_summary(summary);
                Ok(NotableEvent::RoundOver { round_score })
            }
            ScrambledServerEvent::PlayersUpdated { players } => {
                self.view.players = players;
                Ok(NotableEvent::PlayersUpdated)
            }
        }
    }

    fn send(&self, event: ScrambledClientEvent) {
        log::debug!("Sending {event:?}");
        if self.events_tx.send(event).is_err() {
            log::error!("Cannot send event: connection closed");
        }
    }
}


pub fn render<S: Surface>(view: &ScrambledView, surface: &mut S) -> Result<(), S::Error> {
    for (index, letters) in view.tiles.iter().enumerate() {
        surface.set_text(&letter_tile_id(index), letters)?;
    }
    surface.purge_class_within(BOARD_CONTAINER_ID, PATH_TILE_CLASS)?;
    for &index in &view.path {
        surface.toggle_class(&letter_tile_id(index), PATH_TILE_CLASS, true)?;
    }

    surface.set_text(TIME_REMAINING_ID, &view.time_display)?;

    let guesses: Vec<_> = view
        .guesses
        .iter()
        .map(|entry| {
            ElementSpec::new("p", guess_element_id(&entry.word))
                .with_classes(entry.status_class())
                .with_text(entry.display_text())
        })
        .collect();
    surface.replace_children(VALID_WORDS_ID, &guesses)?;

    let round_score = view.round_score.map_or_else(|| NO_ROUND_SCORE.to_owned(), |s| s.to_string());
    surface.set_text(ROUND_SCORE_ID, &round_score)?;
    if let Some(total) = view.total_score {
        surface.set_text(TOTAL_SCORE_ID, &total.to_string())?;
    }
    surface.set_disabled(GUESS_SUBMIT_ID, !view.guessing_enabled)?;
    surface.set_text(PLAYERS_LIST_ID, &view.players)?;
    Ok(())
}

pub fn render_after_event<S: Surface>(
    view: &ScrambledView, event: &NotableEvent, surface: &mut S,
) -> Result<(), S::Error> {
    render(view, surface)?;
    render_notable(event, surface)
}

pub fn render_notable<S: Surface>(event: &NotableEvent, surface: &mut S) -> Result<(), S::Error> {
    match event {
        NotableEvent::RoundStarted => reset_guess_input(surface),
        NotableEvent::None
        | NotableEvent::TimerExpired
        | NotableEvent::GuessAccepted(_)
        | NotableEvent::GuessRejected(_)
        | NotableEvent::RoundOver { .. }
        | NotableEvent::PlayersUpdated => Ok(()),
    }
}

// Done after every submit attempt, accepted or not.
pub fn reset_guess_input<S: Surface>(surface: &mut S) -> Result<(), S::Error> {
    surface.reset_input(GUESS_INPUT_ID, true)
}
