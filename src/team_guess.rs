// Client of the team word-guessing game. Two teams take turns guessing words on a grid; each
// word secretly belongs to a team, to nobody or to the assassin.
//
// Spymaster mode is a display filter: it reveals hidden owners of all tiles on this screen only.
// The server sends hidden owners to every connection regardless of mode.

use std::sync::mpsc;

use enum_map::{EnumMap, enum_map};
use strum::Display;

use crate::error::{CommandError, EventError};
use crate::event::{TeamGuessClientEvent, TeamGuessServerEvent, TeamGuessUpdate, WordTileState};
use crate::surface::Surface;
use crate::team::Team;


pub const BLUE_REMAINING_ID: &str = "blue-team-tiles-remaining";
pub const RED_REMAINING_ID: &str = "red-team-tiles-remaining";
pub const TEAM_LABEL_ID: &str = "team-label";
pub const CURRENT_TEAM_ID: &str = "current-team";
pub const END_TURN_BUTTON_ID: &str = "end-turn-button";
pub const NEW_GAME_BUTTON_ID: &str = "new-game-button";
pub const SPYMASTER_BUTTON_ID: &str = "spymaster-button";
pub const GUESSER_BUTTON_ID: &str = "guesser-button";

const ACTIVE_MODE_CLASSES: &str = "btn btn-info shadow-none";
const INACTIVE_MODE_CLASSES: &str = "btn btn-light gray-button shadow-none";
const TILE_BASE_CLASSES: &str = "btn btn-tile btn-block shadow-none rounded-0";
const HIDDEN_TILE_CLASS: &str = "btn-light";

pub fn word_button_id(word: &str) -> String { format!("button-{word}") }
pub fn word_from_button_id(id: &str) -> Option<&str> { id.strip_prefix("button-") }

// Hidden input next to each word button; its value is the text sent as the guess.
pub fn word_input_id(button_id: &str) -> String { format!("{button_id}-input") }


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum PlayerMode {
    Guesser,
    Spymaster,
}

impl PlayerMode {
    pub fn toggled(self) -> Self {
        match self {
            PlayerMode::Guesser => PlayerMode::Spymaster,
            PlayerMode::Spymaster => PlayerMode::Guesser,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    GameUpdated,
    GameWon(Team),
    // The game was replaced on the server; the page must be loaded anew.
    ReloadPage,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TileView {
    pub disabled: bool,
    pub category: &'static str,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TeamGuessView {
    // In the order the server first listed them.
    pub tiles: Vec<WordTileState>,
    pub tiles_remaining: EnumMap<Team, u32>,
    pub current_team: Option<Team>,
    pub winning_team: Option<Team>,
    pub mode: PlayerMode,
}

impl Default for TeamGuessView {
    fn default() -> Self { Self::new() }
}

impl TeamGuessView {
    pub fn new() -> Self {
        TeamGuessView {
            tiles: vec![],
            tiles_remaining: enum_map! { _ => 0 },
            current_team: None,
            winning_team: None,
            mode: PlayerMode::Guesser,
        }
    }

    pub fn tile(&self, word: &str) -> Option<&WordTileState> {
        self.tiles.iter().find(|tile| tile.word == word)
    }

    pub fn tile_view(&self, tile: &WordTileState) -> TileView {
        if tile.guessed || self.mode == PlayerMode::Spymaster {
            TileView { disabled: true, category: tile.hidden_value.revealed_class() }
        } else {
            TileView { disabled: false, category: HIDDEN_TILE_CLASS }
        }
    }

    // The team shown next to the label: the winner once there is one.
    pub fn displayed_team(&self) -> Option<Team> { self.winning_team.or(self.current_team) }

    pub fn guess(&self, word: &str) -> Result<TeamGuessClientEvent, CommandError> {
        self.guess_tile(word, word)
    }

    // `tile_word` identifies the tile on this board; `text` is what the server receives.
    pub fn guess_tile(
        &self, tile_word: &str, text: &str,
    ) -> Result<TeamGuessClientEvent, CommandError> {
        match self.tile(tile_word) {
            Some(tile) if !self.tile_view(tile).disabled => {
                Ok(TeamGuessClientEvent::Guess { word: text.to_owned() })
            }
            _ => Err(CommandError::TileUnavailable(tile_word.to_owned())),
        }
    }

    pub fn set_mode(&mut self, mode: PlayerMode) -> TeamGuessClientEvent {
        self.mode = mode;
        TeamGuessClientEvent::PlayerModeChange
    }

    pub fn toggle_mode(&mut self) -> TeamGuessClientEvent { self.set_mode(self.mode.toggled()) }

    // A guess broadcast lists only the guessed tile, so tiles are merged by word.
    pub fn apply_update(&mut self, update: TeamGuessUpdate) {
        let TeamGuessUpdate {
            tiles,
            blue_team_tiles_remaining,
            red_team_tiles_remaining,
            current_team,
            winning_team,
        } = update;
        for tile in tiles {
            match self.tiles.iter_mut().find(|t| t.word == tile.word) {
                Some(existing) => *existing = tile,
                None => self.tiles.push(tile),
            }
        }
        self.tiles_remaining = enum_map! {
            Team::Blue => blue_team_tiles_remaining,
            Team::Red => red_team_tiles_remaining,
        };
        self.current_team = Some(current_team);
        self.winning_team = winning_team;
    }
}


pub struct TeamGuessClient {
    room: String,
    view: TeamGuessView,
    events_tx: mpsc::Sender<TeamGuessClientEvent>,
}

impl TeamGuessClient {
    pub fn new(room: String, events_tx: mpsc::Sender<TeamGuessClientEvent>) -> Self {
        TeamGuessClient { room, view: TeamGuessView::new(), events_tx }
    }

    pub fn room(&self) -> &str { &self.room }
    pub fn view(&self) -> &TeamGuessView { &self.view }

    pub fn join(&mut self) { self.send(TeamGuessClientEvent::Join); }

    pub fn guess(&mut self, word: &str) -> Result<(), CommandError> {
        let event = self.view.guess(word)?;
        self.send(event);
        Ok(())
    }

    pub fn guess_tile(&mut self, tile_word: &str, text: &str) -> Result<(), CommandError> {
        let event = self.view.guess_tile(tile_word, text)?;
        self.send(event);
        Ok(())
    }

    pub fn end_turn(&mut self) { self.send(TeamGuessClientEvent::EndTurn); }

    pub fn set_mode(&mut self, mode: PlayerMode) {
        let event = self.view.set_mode(mode);
        self.send(event);
    }

    pub fn toggle_mode(&mut self) {
        let event = self.view.toggle_mode();
        self.send(event);
    }

    // The caller is responsible for asking the user first: the current board is discarded.
    pub fn new_game(&mut self) { self.send(TeamGuessClientEvent::NewGame); }

    // Forgets the board and joins again. Used where a page reload is not available.
    pub fn rejoin(&mut self) {
        let mode = self.view.mode;
        self.view = TeamGuessView::new();
        self.view.mode = mode;
        self.join();
    }

    pub fn process_server_event(
        &mut self, event: TeamGuessServerEvent,
    ) -> Result<NotableEvent, EventError> {
        log::debug!("Processing {event:?}");
        match event {
            TeamGuessServerEvent::GameUpdated(update) => {
                let had_winner = self.view.winning_team.is_some();
                self.view.apply_update(update);
                match self.view.winning_team {
                    Some(team) if !had_winner => Ok(NotableEvent::GameWon(team)),
                    _ => Ok(NotableEvent::GameUpdated),
                }
            }
            TeamGuessServerEvent::ReloadPage => Ok(NotableEvent::ReloadPage),
            TeamGuessServerEvent::Error { message } => {
                Err(EventError::ServerReturnedError(message))
            }
        }
    }

    fn send(&self, event: TeamGuessClientEvent) {
        log::debug!("Sending {event:?}");
        if self.events_tx.send(event).is_err() {
            log::error!("Cannot send event: connection closed");
        }
    }
}


pub fn render<S: Surface>(view: &TeamGuessView, surface: &mut S) -> Result<(), S::Error> {
    surface.set_text(BLUE_REMAINING_ID, &view.tiles_remaining[Team::Blue].to_string())?;
    surface.set_text(RED_REMAINING_ID, &view.tiles_remaining[Team::Red].to_string())?;

    let game_over = view.winning_team.is_some();
    surface.set_text(TEAM_LABEL_ID, if game_over { "Winning Team:" } else { "Current Team:" })?;
    if let Some(team) = view.displayed_team() {
        surface.set_text(CURRENT_TEAM_ID, team.display_name())?;
        surface.set_class_attribute(CURRENT_TEAM_ID, team.text_class())?;
    }
    surface.set_displayed(END_TURN_BUTTON_ID, !game_over)?;
    surface.set_displayed(NEW_GAME_BUTTON_ID, game_over)?;

    let (spymaster_classes, guesser_classes) = match view.mode {
        PlayerMode::Spymaster => (ACTIVE_MODE_CLASSES, INACTIVE_MODE_CLASSES),
        PlayerMode::Guesser => (INACTIVE_MODE_CLASSES, ACTIVE_MODE_CLASSES),
    };
    surface.set_class_attribute(SPYMASTER_BUTTON_ID, spymaster_classes)?;
    surface.set_class_attribute(GUESSER_BUTTON_ID, guesser_classes)?;

    for tile in &view.tiles {
        let id = word_button_id(&tile.word);
        let TileView { disabled, category } = view.tile_view(tile);
        surface.set_disabled(&id, disabled)?;
        surface.set_class_attribute(&id, &format!("{TILE_BASE_CLASSES} {category}"))?;
    }
    Ok(())
}
