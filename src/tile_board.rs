// Client of the tile-board crossword game. Every player builds a personal crossword from hand
// tiles; the server validates boards on peel and keeps the shared tile pool.

use std::sync::mpsc;

use crate::coord::{BoardPosition, ShiftDirection};
use crate::error::{CommandError, EventError};
use crate::event::{BoardSnapshot, TileBoardClientEvent, TileBoardServerEvent};
use crate::player_id::PlayerId;
use crate::surface::{ElementSpec, NBSP, Surface};


// The pool must hold at least this many tiles: one tile goes back and three come out.
pub const EXCHANGE_TILES: i32 = 3;

pub const BOARD_CONTAINER_ID: &str = "inner-button-container";
pub const HAND_CONTAINER_ID: &str = "tiles-div";
pub const PEEL_BUTTON_ID: &str = "peel-button";
pub const EXCHANGE_BUTTON_ID: &str = "exchange-button";
pub const START_GAME_BUTTON_ID: &str = "start-game-button";
pub const NUM_PLAYERS_ID: &str = "num-players";
pub const TILES_LEFT_ID: &str = "tiles-left";
pub const MESSAGE_BANNER_ID: &str = "message-banner";

const INVALID_POSITION_CLASS: &str = "invalid-position";
const PULSE_CLASS: &str = "pulse";

pub fn hand_tile_id(index: usize) -> String { format!("tile-{index}") }

pub fn hand_tile_index_from_id(id: &str) -> Option<usize> { id.strip_prefix("tile-")?.parse().ok() }


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    Banner(String),
    BoardUpdated,
    PeelRejected,
    GameOver { winning_player: String },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TileBoardView {
    pub board: Vec<Vec<Option<char>>>,
    pub hand: Vec<char>,
    pub selected: Option<usize>,
    pub num_players: u32,
    pub tiles_left: i32,
    pub game_running: bool,
    pub start_enabled: bool,
    pub invalid_positions: Vec<BoardPosition>,
    pub banner: String,
}

impl Default for TileBoardView {
    fn default() -> Self { Self::new() }
}

impl TileBoardView {
    pub fn new() -> Self {
        TileBoardView {
            board: vec![],
            hand: vec![],
            selected: None,
            num_players: 0,
            tiles_left: -1,
            game_running: false,
            start_enabled: true,
            invalid_positions: vec![],
            banner: String::new(),
        }
    }

    pub fn peel_enabled(&self) -> bool { self.hand.is_empty() && self.game_running }
    pub fn exchange_enabled(&self) -> bool {
        self.selected.is_some() && self.tiles_left >= EXCHANGE_TILES
    }

    pub fn cell(&self, pos: BoardPosition) -> Option<char> {
        self.board.get(pos.row).and_then(|row| row.get(pos.col)).copied().flatten()
    }

    pub fn click_hand_tile(&mut self, index: usize) -> Result<(), CommandError> {
        if index >= self.hand.len() {
            return Err(CommandError::NoSuchHandTile(index));
        }
        self.selected = if self.selected == Some(index) { None } else { Some(index) };
        Ok(())
    }

    // Places the selected tile, or takes back the tile in the cell when nothing is selected.
    pub fn click_board_cell(&mut self, pos: BoardPosition) -> Option<TileBoardClientEvent> {
        if let Some(hand_tile_index) = self.selected.take() {
            self.invalid_positions.clear();
            Some(TileBoardClientEvent::AddTile { hand_tile_index, board_position: pos })
        } else if self.cell(pos).is_some() {
            self.invalid_positions.clear();
            Some(TileBoardClientEvent::RemoveTile { board_position: pos })
        } else {
            None
        }
    }

    pub fn exchange(&mut self) -> Result<TileBoardClientEvent, CommandError> {
        let Some(hand_tile_index) = self.selected else {
            return Err(CommandError::NoTileSelected);
        };
        if self.tiles_left < EXCHANGE_TILES {
            return Err(CommandError::NotEnoughTilesToExchange { tiles_left: self.tiles_left });
        }
        self.selected = None;
        Ok(TileBoardClientEvent::Exchange { hand_tile_index })
    }

    pub fn peel(&self) -> Result<TileBoardClientEvent, CommandError> {
        if !self.peel_enabled() {
            return Err(CommandError::ActionUnavailable("peel"));
        }
        Ok(TileBoardClientEvent::Peel)
    }

    pub fn start_game(&mut self) -> Result<TileBoardClientEvent, CommandError> {
        if !self.start_enabled {
            return Err(CommandError::ActionUnavailable("start a game"));
        }
        self.start_enabled = false;
        Ok(TileBoardClientEvent::StartGame)
    }

    // A snapshot without an entry for this player is rejected as a whole.
    pub fn apply_snapshot(
        &mut self, snapshot: BoardSnapshot, player_id: &PlayerId,
    ) -> Result<(), EventError> {
        let BoardSnapshot { num_players, tiles_left, mut players, game_running } = snapshot;
        let player = players.remove(player_id.as_str()).ok_or_else(|| {
            EventError::CannotApplyEvent(format!("board update has no entry for player {player_id}"))
        })?;
        self.num_players = num_players;
        self.tiles_left = tiles_left;
        self.game_running = game_running;
        self.start_enabled = !game_running;
        // Hand indices may have shifted, so the old selection means nothing now.
        self.selected = None;
        self.board = player.board;
        self.hand = player.hand_tiles;
        Ok(())
    }

    pub fn apply_game_over(&mut self, winning_player: &str) {
        self.banner = format!("Player {winning_player} has won!");
        self.game_running = false;
        self.start_enabled = true;
    }
}


pub struct TileBoardClient {
    room: String,
    player_id: PlayerId,
    view: TileBoardView,
    events_tx: mpsc::Sender<TileBoardClientEvent>,
}

impl TileBoardClient {
    pub fn new(
        room: String, player_id: PlayerId, events_tx: mpsc::Sender<TileBoardClientEvent>,
    ) -> Self {
        TileBoardClient { room, player_id, view: TileBoardView::new(), events_tx }
    }

    pub fn room(&self) -> &str { &self.room }
    pub fn player_id(&self) -> &PlayerId { &self.player_id }
    pub fn view(&self) -> &TileBoardView { &self.view }

    pub fn join(&mut self) { self.send(TileBoardClientEvent::Join); }

    pub fn click_hand_tile(&mut self, index: usize) -> Result<(), CommandError> {
        self.view.click_hand_tile(index)
    }

    pub fn click_board_cell(&mut self, pos: BoardPosition) {
        if let Some(event) = self.view.click_board_cell(pos) {
            self.send(event);
        }
    }

    pub fn shift_board(&mut self, direction: ShiftDirection) {
        self.send(TileBoardClientEvent::ShiftBoard { direction });
    }

    pub fn peel(&mut self) -> Result<(), CommandError> {
        let event = self.view.peel()?;
        self.send(event);
        Ok(())
    }

    pub fn exchange(&mut self) -> Result<(), CommandError> {
        let event = self.view.exchange()?;
        self.send(event);
        Ok(())
    }

    // The caller is responsible for asking the user first: starting clears every board.
    pub fn start_game(&mut self) -> Result<(), CommandError> {
        let event = self.view.start_game()?;
        self.send(event);
        Ok(())
    }

    pub fn process_server_event(
        &mut self, event: TileBoardServerEvent,
    ) -> Result<NotableEvent, EventError> {
        log::debug!("Processing {event:?}");
        match event {
            TileBoardServerEvent::Peeled { peeling_player } => {
                self.view.banner = format!("Player {peeling_player} has peeled.");
                self.send(TileBoardClientEvent::UpdateRequest);
                Ok(NotableEvent::Banner(self.view.banner.clone()))
            }
            TileBoardServerEvent::UpdateRequested { message } => {
                self.send(TileBoardClientEvent::UpdateRequest);
                match message {
                    Some(message) => {
                        self.view.banner = message;
                        Ok(NotableEvent::Banner(self.view.banner.clone()))
                    }
                    None => Ok(NotableEvent::None),
                }
            }
            TileBoardServerEvent::BoardUpdated(snapshot) => {
                self.view.apply_snapshot(snapshot, &self.player_id)?;
                Ok(NotableEvent::BoardUpdated)
            }
            TileBoardServerEvent::PeelRejected { invalid_positions } => {
                self.view.invalid_positions = invalid_positions;
                Ok(NotableEvent::PeelRejected)
            }
            TileBoardServerEvent::GameOver { winning_player } => {
                self.view.apply_game_over(&winning_player);
                Ok(NotableEvent::GameOver { winning_player })
            }
        }
    }

    fn send(&self, event: TileBoardClientEvent) {
        log::debug!("Sending {event:?}");
        if self.events_tx.send(event).is_err() {
            log::error!("Cannot send event: connection closed");
        }
    }
}


pub fn render<S: Surface>(view: &TileBoardView, surface: &mut S) -> Result<(), S::Error> {
    surface.set_text(NUM_PLAYERS_ID, &view.num_players.to_string())?;
    surface.set_text(TILES_LEFT_ID, &view.tiles_left.to_string())?;
    surface.set_text(MESSAGE_BANNER_ID, &view.banner)?;
    surface.set_disabled(START_GAME_BUTTON_ID, !view.start_enabled)?;

    for (r, row) in view.board.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let text = cell.map_or_else(|| NBSP.to_owned(), |ch| ch.to_string());
            surface.set_text(&BoardPosition::new(r, c).cell_id(), &text)?;
        }
    }
    surface.purge_class_within(BOARD_CONTAINER_ID, INVALID_POSITION_CLASS)?;
    for pos in &view.invalid_positions {
        surface.toggle_class(&pos.cell_id(), INVALID_POSITION_CLASS, true)?;
    }

    let hand: Vec<_> = view
        .hand
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let category = if view.selected == Some(index) { "btn-success" } else { "btn-light" };
            ElementSpec::new("button", hand_tile_id(index))
                .with_classes(["btn", "btn-tile", "hand-tile", category, "rounded-0"])
                .with_text(tile.to_string())
        })
        .collect();
    surface.replace_children(HAND_CONTAINER_ID, &hand)?;

    let peel = view.peel_enabled();
    surface.set_disabled(PEEL_BUTTON_ID, !peel)?;
    surface.toggle_class(PEEL_BUTTON_ID, "btn-primary", peel)?;
    surface.toggle_class(PEEL_BUTTON_ID, "btn-light", !peel)?;

    let exchange = view.exchange_enabled();
    surface.set_disabled(EXCHANGE_BUTTON_ID, !exchange)?;
    surface.toggle_class(EXCHANGE_BUTTON_ID, "btn-warning", exchange)?;
    surface.toggle_class(EXCHANGE_BUTTON_ID, "btn-light", !exchange)?;
    Ok(())
}

// The view goes first so that a pulse highlights the new banner text.
pub fn render_after_event<S: Surface>(
    view: &TileBoardView, event: &NotableEvent, surface: &mut S,
) -> Result<(), S::Error> {
    render(view, surface)?;
    render_notable(event, surface)
}

pub fn render_notable<S: Surface>(event: &NotableEvent, surface: &mut S) -> Result<(), S::Error> {
    match event {
        NotableEvent::Banner(_) | NotableEvent::GameOver { .. } => {
            surface.pulse(MESSAGE_BANNER_ID, PULSE_CLASS)
        }
        NotableEvent::None | NotableEvent::BoardUpdated | NotableEvent::PeelRejected => Ok(()),
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event::PlayerBoard;
    use crate::test_util::{FakeSurface, Infallibly};

    const PLAYER: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn player_id() -> PlayerId { PlayerId::parse(PLAYER).unwrap() }

    fn snapshot(hand: &str, board: Vec<Vec<Option<char>>>, tiles_left: i32) -> BoardSnapshot {
        BoardSnapshot {
            num_players: 2,
            tiles_left,
            players: HashMap::from([(PLAYER.to_owned(), PlayerBoard {
                hand_tiles: hand.chars().collect(),
                board,
            })]),
            game_running: true,
        }
    }

    fn client() -> (TileBoardClient, mpsc::Receiver<TileBoardClientEvent>) {
        let (tx, rx) = mpsc::channel();
        (TileBoardClient::new("ROOM".to_owned(), player_id(), tx), rx)
    }

    fn drain(rx: &mpsc::Receiver<TileBoardClientEvent>) -> Vec<TileBoardClientEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn selection_moves_and_toggles() {
        let mut view = TileBoardView::new();
        view.apply_snapshot(snapshot("AB", vec![vec![None]], 50), &player_id()).unwrap();
        view.click_hand_tile(0).unwrap();
        view.click_hand_tile(1).unwrap();
        assert_eq!(view.selected, Some(1));
        view.click_hand_tile(1).unwrap();
        assert_eq!(view.selected, None);
        assert_eq!(view.click_hand_tile(2), Err(CommandError::NoSuchHandTile(2)));
    }

    #[test]
    fn placing_a_selected_tile_emits_one_event() {
        let (mut client, rx) = client();
        client
            .process_server_event(TileBoardServerEvent::BoardUpdated(snapshot(
                "AB",
                vec![vec![None, None], vec![None, None]],
                50,
            )))
            .unwrap();
        client.click_hand_tile(0).unwrap();
        client.click_hand_tile(1).unwrap();
        client.click_board_cell(BoardPosition::new(1, 0));
        assert_eq!(drain(&rx), vec![TileBoardClientEvent::AddTile {
            hand_tile_index: 1,
            board_position: BoardPosition::new(1, 0),
        }]);
        assert_eq!(client.view().selected, None);
    }

    #[test]
    fn clicking_board_without_selection() {
        let (mut client, rx) = client();
        client
            .process_server_event(TileBoardServerEvent::BoardUpdated(snapshot(
                "",
                vec![vec![Some('Q'), None]],
                50,
            )))
            .unwrap();
        client.click_board_cell(BoardPosition::new(0, 1));
        assert!(drain(&rx).is_empty());
        client.click_board_cell(BoardPosition::new(0, 0));
        assert_eq!(drain(&rx), vec![TileBoardClientEvent::RemoveTile {
            board_position: BoardPosition::new(0, 0),
        }]);
    }

    #[test]
    fn peel_requires_empty_hand_while_running() {
        let mut view = TileBoardView::new();
        assert!(!view.peel_enabled());
        view.apply_snapshot(snapshot("A", vec![], 10), &player_id()).unwrap();
        assert!(!view.peel_enabled());
        view.apply_snapshot(snapshot("", vec![], 10), &player_id()).unwrap();
        assert!(view.peel_enabled());
        assert_eq!(view.peel(), Ok(TileBoardClientEvent::Peel));
    }

    #[test]
    fn exchange_needs_selection_and_tiles() {
        let mut view = TileBoardView::new();
        view.apply_snapshot(snapshot("XY", vec![], 2), &player_id()).unwrap();
        assert_eq!(view.exchange(), Err(CommandError::NoTileSelected));
        view.click_hand_tile(1).unwrap();
        assert!(!view.exchange_enabled());
        assert_eq!(
            view.exchange(),
            Err(CommandError::NotEnoughTilesToExchange { tiles_left: 2 })
        );

        view.apply_snapshot(snapshot("XY", vec![], 3), &player_id()).unwrap();
        view.click_hand_tile(1).unwrap();
        assert!(view.exchange_enabled());
        assert_eq!(view.exchange(), Ok(TileBoardClientEvent::Exchange { hand_tile_index: 1 }));
        assert_eq!(view.selected, None);
    }

    #[test]
    fn peel_broadcast_requests_update() {
        let (mut client, rx) = client();
        let notable = client
            .process_server_event(TileBoardServerEvent::Peeled { peeling_player: "Ann".to_owned() })
            .unwrap();
        assert_eq!(notable, NotableEvent::Banner("Player Ann has peeled.".to_owned()));
        assert_eq!(drain(&rx), vec![TileBoardClientEvent::UpdateRequest]);

        let notable = client
            .process_server_event(TileBoardServerEvent::UpdateRequested { message: None })
            .unwrap();
        assert_eq!(notable, NotableEvent::None);
        assert_eq!(drain(&rx), vec![TileBoardClientEvent::UpdateRequest]);
        assert_eq!(client.view().banner, "Player Ann has peeled.");
    }

    #[test]
    fn game_over_is_idempotent() {
        let (mut client, _rx) = client();
        client
            .process_server_event(TileBoardServerEvent::BoardUpdated(snapshot("", vec![], 0)))
            .unwrap();
        client.start_game().unwrap_err();
        let game_over = TileBoardServerEvent::GameOver { winning_player: "Bo".to_owned() };
        client.process_server_event(game_over.clone()).unwrap();
        let after_first = client.view().clone();
        client.process_server_event(game_over).unwrap();
        assert_eq!(client.view(), &after_first);
        assert!(!after_first.peel_enabled());
        assert!(after_first.start_enabled);
        assert_eq!(after_first.banner, "Player Bo has won!");
    }

    #[test]
    fn start_game_disables_button_locally() {
        let (mut client, rx) = client();
        client.start_game().unwrap();
        assert!(!client.view().start_enabled);
        assert_eq!(drain(&rx), vec![TileBoardClientEvent::StartGame]);
    }

    #[test]
    fn snapshot_for_someone_else() {
        let mut view = TileBoardView::new();
        let mut waiting = snapshot("", vec![vec![None]], 10);
        waiting.game_running = false;
        view.apply_snapshot(waiting, &player_id()).unwrap();
        let before = view.clone();

        let mut other = snapshot("A", vec![], 40);
        other.players = HashMap::from([("someone-else".to_owned(), PlayerBoard {
            hand_tiles: vec!['A'],
            board: vec![],
        })]);
        assert!(matches!(
            view.apply_snapshot(other, &player_id()),
            Err(EventError::CannotApplyEvent(_))
        ));
        assert_eq!(view, before);
        assert!(!view.peel_enabled());
    }

    #[test]
    fn client_ignores_snapshot_without_own_board() {
        let (mut client, rx) = client();
        client
            .process_server_event(TileBoardServerEvent::BoardUpdated(snapshot("XY", vec![], 20)))
            .unwrap();
        client.click_hand_tile(1).unwrap();
        let before = client.view().clone();

        let mut foreign = snapshot("", vec![], 5);
        foreign.players.clear();
        assert!(matches!(
            client.process_server_event(TileBoardServerEvent::BoardUpdated(foreign)),
            Err(EventError::CannotApplyEvent(_))
        ));
        assert_eq!(client.view(), &before);
        assert_eq!(client.view().selected, Some(1));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn render_board_and_hand() {
        let mut view = TileBoardView::new();
        view.apply_snapshot(
            snapshot("HI", vec![vec![Some('A'), None], vec![None, Some('B')]], 7),
            &player_id(),
        )
        .unwrap();
        view.click_hand_tile(0).unwrap();
        view.invalid_positions = vec![BoardPosition::new(1, 1)];

        let cells = ["space-0-0", "space-0-1", "space-1-0", "space-1-1"];
        let mut surface = FakeSurface::new()
            .with_container("inner-button-container", cells)
            .with_container("bag", ["bag-counter"]);
        surface.toggle_class("bag-counter", "invalid-position", true).infallibly();
        render(&view, &mut surface).infallibly();
        assert_eq!(surface.text("space-0-0"), "A");
        assert_eq!(surface.text("space-0-1"), "\u{a0}");
        assert_eq!(surface.text("space-1-1"), "B");
        assert!(surface.element("space-1-1").has_class("invalid-position"));
        assert_eq!(surface.children("tiles-div"), ["tile-0", "tile-1"]);
        assert_eq!(surface.children_text("tiles-div"), ["H", "I"]);
        assert_eq!(
            surface.element("tile-0").class_attribute(),
            "btn btn-success btn-tile hand-tile rounded-0"
        );
        assert!(surface.element("tile-1").has_class("btn-light"));
        assert!(surface.element("peel-button").disabled);
        assert!(surface.element("peel-button").has_class("btn-light"));
        assert!(!surface.element("exchange-button").disabled);
        assert!(surface.element("exchange-button").has_class("btn-warning"));
        assert_eq!(surface.text("tiles-left"), "7");
        assert!(surface.element("start-game-button").disabled);

        view.click_board_cell(BoardPosition::new(0, 1));
        render(&view, &mut surface).infallibly();
        assert!(!surface.element("space-1-1").has_class("invalid-position"));
        assert!(surface.element("bag-counter").has_class("invalid-position"));
        assert!(surface.element("exchange-button").disabled);
    }

    #[test]
    fn banner_pulses() {
        let mut surface = FakeSurface::new();
        render_notable(&NotableEvent::Banner("hi".to_owned()), &mut surface).infallibly();
        render_notable(&NotableEvent::BoardUpdated, &mut surface).infallibly();
        assert_eq!(surface.element("message-banner").pulsed_text.len(), 1);
    }

    #[test]
    fn game_over_banner_pulses_with_the_winner() {
        let (mut client, _rx) = client();
        client
            .process_server_event(TileBoardServerEvent::BoardUpdated(snapshot("", vec![], 0)))
            .unwrap();
        let mut surface = FakeSurface::new();
        let notable = client
            .process_server_event(TileBoardServerEvent::GameOver {
                winning_player: "Ann".to_owned(),
            })
            .unwrap();
        assert_eq!(notable, NotableEvent::GameOver { winning_player: "Ann".to_owned() });
        render_after_event(client.view(), &notable, &mut surface).infallibly();

        let banner = surface.element("message-banner");
        assert_eq!(banner.pulsed_text, ["Player Ann has won!"]);
        assert!(banner.has_class("pulse"));
        assert!(surface.element("peel-button").disabled);
        assert!(!surface.element("start-game-button").disabled);
    }

    #[test]
    fn peel_banner_pulses_with_the_peeler() {
        let (mut client, _rx) = client();
        let mut surface = FakeSurface::new();
        let notable = client
            .process_server_event(TileBoardServerEvent::Peeled { peeling_player: "Bo".to_owned() })
            .unwrap();
        render_after_event(client.view(), &notable, &mut surface).infallibly();
        assert_eq!(surface.element("message-banner").pulsed_text, ["Player Bo has peeled."]);
    }

    #[test]
    fn hand_tile_ids() {
        assert_eq!(hand_tile_index_from_id(&hand_tile_id(12)), Some(12));
        assert_eq!(hand_tile_index_from_id("space-1-2"), None);
    }
}
