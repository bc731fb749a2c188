#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

// Browser clients of the three games. JS glue owns the Socket.IO connection: it passes every
// inbound event as a JSON array `["name", payload]` to `process_server_event`, forwards user
// input to the click handlers, and after each call drains `next_outgoing_event` into
// `socket.emit`.

pub mod web_document;
pub mod web_element_ext;
pub mod web_error_handling;
pub mod web_iterators;
pub mod web_logger;
pub mod web_surface;

use std::sync::mpsc;

use wasm_bindgen::prelude::*;

use wordparty::NEW_GAME_CONFIRMATION;
use wordparty::coord::{BoardPosition, ShiftDirection};
use wordparty::countdown::epoch_millis_now;
use wordparty::event::{
    ClientEvent, ScrambledClientEvent, ScrambledServerEvent, ServerEvent, TeamGuessClientEvent,
    TeamGuessServerEvent, TileBoardClientEvent, TileBoardServerEvent, WireEvent,
};
use wordparty::scrambled_words::{self, ScrambledClient};
use wordparty::team_guess::{self, PlayerMode, TeamGuessClient};
use wordparty::tile_board::{self, TileBoardClient};

use crate::web_document::{confirm, reload_page, web_document};
use crate::web_error_handling::{JsResult, event_error, ignore_command_error};
use crate::web_surface::DomSurface;


// Home page inputs that carry the player id into the create/join forms.
const PLAYER_ID_INPUTS: [&str; 2] = ["player_id_create", "player_id_join"];

#[wasm_bindgen]
pub fn init_page(debug_logging: bool) {
    web_error_handling::set_panic_hook();
    web_logger::init_logger(if debug_logging {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
}

// Makes sure the player has an id before any game page is opened.
#[wasm_bindgen]
pub fn init_home_page() -> JsResult<String> {
    let document = web_document()?;
    let player_id = document.ensure_player_id()?;
    for input_id in PLAYER_ID_INPUTS {
        if let Some(input) = document.get_element_by_id(input_id) {
            input.set_attribute("value", player_id.as_str())?;
        }
    }
    Ok(player_id.to_string())
}

fn parse_server_event<E: ServerEvent>(event: &str) -> JsResult<E> {
    let wire = WireEvent::from_json_array(event).map_err(event_error)?;
    E::from_wire(&wire).map_err(event_error)
}

fn next_outgoing<E: ClientEvent>(rx: &mpsc::Receiver<E>, room: &str) -> Option<String> {
    match rx.try_recv() {
        Ok(event) => Some(event.to_wire(room).to_json_array()),
        Err(mpsc::TryRecvError::Empty) => None,
        Err(mpsc::TryRecvError::Disconnected) => {
            log::error!("Event channel disconnected");
            None
        }
    }
}


#[wasm_bindgen]
pub struct TileBoardWebClient {
    client: TileBoardClient,
    server_rx: mpsc::Receiver<TileBoardClientEvent>,
    surface: DomSurface,
}

#[wasm_bindgen]
impl TileBoardWebClient {
    pub fn new_client(room: &str) -> JsResult<TileBoardWebClient> {
        let surface = DomSurface::new()?;
        let player_id = surface.document().ensure_player_id()?;
        let (server_tx, server_rx) = mpsc::channel();
        Ok(TileBoardWebClient {
            client: TileBoardClient::new(room.to_owned(), player_id, server_tx),
            server_rx,
            surface,
        })
    }

    pub fn join(&mut self) { self.client.join(); }

    pub fn click_hand_tile(&mut self, element_id: &str) -> JsResult<()> {
        let index = tile_board::hand_tile_index_from_id(element_id)
            .ok_or_else(|| rust_error!("Not a hand tile: \"{}\"", element_id))?;
        ignore_command_error(self.client.click_hand_tile(index));
        self.update_state()
    }

    pub fn click_board_cell(&mut self, element_id: &str) -> JsResult<()> {
        let pos = BoardPosition::from_cell_id(element_id)
            .ok_or_else(|| rust_error!("Not a board cell: \"{}\"", element_id))?;
        self.client.click_board_cell(pos);
        self.update_state()
    }

    pub fn shift_board(&mut self, direction: &str) -> JsResult<()> {
        let direction: ShiftDirection =
            direction.parse().map_err(|_| rust_error!("Unexpected direction: {}", direction))?;
        self.client.shift_board(direction);
        Ok(())
    }

    pub fn peel(&mut self) -> JsResult<()> {
        ignore_command_error(self.client.peel());
        self.update_state()
    }

    pub fn exchange(&mut self) -> JsResult<()> {
        ignore_command_error(self.client.exchange());
        self.update_state()
    }

    pub fn start_game(&mut self) -> JsResult<()> {
        if confirm(NEW_GAME_CONFIRMATION)? {
            log::info!("Starting game");
            ignore_command_error(self.client.start_game());
        }
        self.update_state()
    }

    pub fn process_server_event(&mut self, event: &str) -> JsResult<()> {
        let event: TileBoardServerEvent = parse_server_event(event)?;
        let notable = self.client.process_server_event(event).map_err(event_error)?;
        tile_board::render_after_event(self.client.view(), &notable, &mut self.surface)
    }

    pub fn next_outgoing_event(&mut self) -> Option<String> {
        next_outgoing(&self.server_rx, self.client.room())
    }

    pub fn update_state(&mut self) -> JsResult<()> {
        tile_board::render(self.client.view(), &mut self.surface)
    }
}


#[wasm_bindgen]
pub struct TeamGuessWebClient {
    client: TeamGuessClient,
    server_rx: mpsc::Receiver<TeamGuessClientEvent>,
    surface: DomSurface,
}

#[wasm_bindgen]
impl TeamGuessWebClient {
    pub fn new_client(room: &str) -> JsResult<TeamGuessWebClient> {
        let surface = DomSurface::new()?;
        let (server_tx, server_rx) = mpsc::channel();
        Ok(TeamGuessWebClient {
            client: TeamGuessClient::new(room.to_owned(), server_tx),
            server_rx,
            surface,
        })
    }

    pub fn join(&mut self) { self.client.join(); }

    // Clicks anywhere in the grid land here; only word buttons count.
    pub fn click_word_button(&mut self, element_id: &str) -> JsResult<()> {
        let Some(tile_word) = team_guess::word_from_button_id(element_id) else {
            return Ok(());
        };
        if self.client.view().tile(tile_word).is_none() {
            log::debug!("Ignoring click on \"{element_id}\"");
            return Ok(());
        }
        let text = self.surface.document().input_value(&team_guess::word_input_id(element_id))?;
        ignore_command_error(self.client.guess_tile(tile_word, &text));
        Ok(())
    }

    pub fn end_turn(&mut self) { self.client.end_turn(); }

    pub fn spymaster_mode(&mut self) -> JsResult<()> {
        self.client.set_mode(PlayerMode::Spymaster);
        self.update_state()
    }

    pub fn guesser_mode(&mut self) -> JsResult<()> {
        self.client.set_mode(PlayerMode::Guesser);
        self.update_state()
    }

    pub fn toggle_mode(&mut self) -> JsResult<()> {
        self.client.toggle_mode();
        self.update_state()
    }

    pub fn new_game(&mut self) -> JsResult<()> {
        if confirm(NEW_GAME_CONFIRMATION)? {
            log::info!("Starting new game...");
            self.client.new_game();
        }
        Ok(())
    }

    pub fn process_server_event(&mut self, event: &str) -> JsResult<()> {
        let event: TeamGuessServerEvent = parse_server_event(event)?;
        match self.client.process_server_event(event).map_err(event_error)? {
            team_guess::NotableEvent::ReloadPage => reload_page(),
            team_guess::NotableEvent::GameWon(team) => {
                log::info!("{} won", team.display_name());
                self.update_state()
            }
            team_guess::NotableEvent::None | team_guess::NotableEvent::GameUpdated => {
                self.update_state()
            }
        }
    }

    pub fn next_outgoing_event(&mut self) -> Option<String> {
        next_outgoing(&self.server_rx, self.client.room())
    }

    pub fn update_state(&mut self) -> JsResult<()> {
        team_guess::render(self.client.view(), &mut self.surface)
    }
}


#[wasm_bindgen]
pub struct ScrambledWebClient {
    client: ScrambledClient,
    server_rx: mpsc::Receiver<ScrambledClientEvent>,
    surface: DomSurface,
}

#[wasm_bindgen]
impl ScrambledWebClient {
    pub fn new_client(room: &str) -> JsResult<ScrambledWebClient> {
        let surface = DomSurface::new()?;
        let (server_tx, server_rx) = mpsc::channel();
        Ok(ScrambledWebClient {
            client: ScrambledClient::new(room.to_owned(), server_tx),
            server_rx,
            surface,
        })
    }

    pub fn join(&mut self) -> JsResult<()> {
        self.client.join();
        scrambled_words::reset_guess_input(&mut self.surface)
    }

    pub fn submit_guess(&mut self, text: &str) -> JsResult<()> {
        ignore_command_error(self.client.submit_guess(text));
        self.update_state()?;
        scrambled_words::reset_guess_input(&mut self.surface)
    }

    pub fn new_game(&mut self) -> JsResult<()> {
        if confirm(NEW_GAME_CONFIRMATION)? {
            log::info!("Starting new game...");
            self.client.new_game();
        }
        self.update_state()
    }

    // Called by a one-second interval.
    pub fn tick(&mut self) -> JsResult<()> {
        self.client.tick(epoch_millis_now());
        self.update_state()
    }

    pub fn process_server_event(&mut self, event: &str) -> JsResult<()> {
        let event: ScrambledServerEvent = parse_server_event(event)?;
        let notable =
            self.client.process_server_event(event, epoch_millis_now()).map_err(event_error)?;
        scrambled_words::render_after_event(self.client.view(), &notable, &mut self.surface)
    }

    pub fn next_outgoing_event(&mut self) -> Option<String> {
        next_outgoing(&self.server_rx, self.client.room())
    }

    pub fn update_state(&mut self) -> JsResult<()> {
        scrambled_words::render(self.client.view(), &mut self.surface)
    }
}
