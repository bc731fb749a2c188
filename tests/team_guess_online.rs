mod common;

use std::sync::mpsc;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wordparty::error::CommandError;
use wordparty::event::{TeamGuessClientEvent, TeamGuessServerEvent, WireEvent};
use wordparty::team::{Team, TileOwner};
use wordparty::team_guess::{self, NotableEvent, PlayerMode, TeamGuessClient};
use wordparty::test_util::{FakeSurface, Infallibly};


const NEUTRAL: u8 = 0;
const BLUE: u8 = 1;
const RED: u8 = 2;
const ASSASSIN: u8 = 3;

struct Tile {
    word: &'static str,
    owner: u8,
    guessed: bool,
}

// Plays by the usual rules on a tiny grid. Like the real server, it broadcasts only the guessed
// tile after a guess and never hides owners from anybody.
struct Server {
    tiles: Vec<Tile>,
    current_team: u8,
    winning_team: Option<u8>,
}

impl Server {
    fn new() -> Self {
        let tiles = [
            ("apple", BLUE),
            ("pear", BLUE),
            ("fig", RED),
            ("plum", RED),
            ("kiwi", NEUTRAL),
            ("lime", ASSASSIN),
        ]
        .into_iter()
        .map(|(word, owner)| Tile { word, owner, guessed: false })
        .collect();
        Server { tiles, current_team: BLUE, winning_team: None }
    }

    fn remaining(&self, team: u8) -> usize {
        self.tiles.iter().filter(|tile| tile.owner == team && !tile.guessed).count()
    }

    fn other_team(&self) -> u8 { if self.current_team == BLUE { RED } else { BLUE } }

    fn update(&self, indices: impl IntoIterator<Item = usize>) -> WireEvent {
        let tiles: Vec<Value> = indices
            .into_iter()
            .map(|index| {
                let tile = &self.tiles[index];
                json!({ "word": tile.word, "hidden_value": tile.owner, "guessed": tile.guessed })
            })
            .collect();
        let mut game_state = json!({
            "tiles": tiles,
            "blue_team_tiles_remaining": self.remaining(BLUE),
            "red_team_tiles_remaining": self.remaining(RED),
            "current_team": self.current_team,
        });
        if let Some(team) = self.winning_team {
            game_state["winning_team"] = json!(team);
        }
        WireEvent::new("game_update", json!({ "game_state": game_state }))
    }

    fn handle(&mut self, from: usize, event: WireEvent) -> Vec<(Recipient, WireEvent)> {
        match event.name.as_str() {
            "join" | "player_mode_change" => {
                vec![(Recipient::One(from), self.update(0..self.tiles.len()))]
            }
            "guess" => {
                let word = payload_str(&event, "guess");
                let index = self.tiles.iter().position(|tile| tile.word == word).unwrap();
                self.tiles[index].guessed = true;
                let owner = self.tiles[index].owner;
                if owner == ASSASSIN {
                    self.winning_team = Some(self.other_team());
                } else if owner != NEUTRAL && self.remaining(owner) == 0 {
                    self.winning_team = Some(owner);
                }
                if owner != self.current_team {
                    self.current_team = self.other_team();
                }
                vec![(Recipient::All, self.update([index]))]
            }
            "end_turn" => {
                self.current_team = self.other_team();
                vec![(Recipient::All, self.update(0..0))]
            }
            "new_game" => {
                *self = Server::new();
                vec![(Recipient::All, WireEvent::new("reload_page", json!({})))]
            }
            _ => panic!("Unexpected event: {event:?}"),
        }
    }
}

struct Client {
    state: TeamGuessClient,
    outgoing: mpsc::Receiver<TeamGuessClientEvent>,
    inbox: Vec<WireEvent>,
    notable: Vec<NotableEvent>,
}

impl Client {
    fn render(&self) -> FakeSurface {
        let mut surface = FakeSurface::new();
        team_guess::render(self.state.view(), &mut surface).infallibly();
        surface
    }
}

struct World {
    server: Server,
    clients: Vec<Client>,
}

impl World {
    fn new() -> Self {
        let mut world = World { server: Server::new(), clients: vec![] };
        for _ in 0..2 {
            let (tx, rx) = mpsc::channel();
            let mut state = TeamGuessClient::new(ROOM.to_owned(), tx);
            state.join();
            world.clients.push(Client { state, outgoing: rx, inbox: vec![], notable: vec![] });
        }
        world.process_all_events();
        world
    }

    fn process_all_events(&mut self) {
        let mut something_changed = true;
        while something_changed {
            something_changed = false;
            for from in 0..self.clients.len() {
                for event in drain_to_server(&self.clients[from].outgoing) {
                    something_changed = true;
                    for (recipient, reply) in self.server.handle(from, event) {
                        for (id, client) in self.clients.iter_mut().enumerate() {
                            if recipient.includes(id) {
                                client.inbox.push(reply.clone());
                            }
                        }
                    }
                }
            }
            for client in &mut self.clients {
                for event in std::mem::take(&mut client.inbox) {
                    something_changed = true;
                    let event: TeamGuessServerEvent = to_client(&event);
                    let notable = client.state.process_server_event(event).unwrap();
                    if notable == NotableEvent::ReloadPage {
                        client.state.rejoin();
                    }
                    client.notable.push(notable);
                }
            }
        }
    }

    fn guess(&mut self, client: usize, word: &str) {
        self.clients[client].state.guess(word).unwrap();
        self.process_all_events();
    }
}


#[test]
fn join_shows_full_board() {
    let world = World::new();
    for client in &world.clients {
        let view = client.state.view();
        assert_eq!(view.tiles.len(), 6);
        assert_eq!(view.current_team, Some(Team::Blue));
        assert_eq!(view.tiles_remaining[Team::Blue], 2);
        assert_eq!(view.tiles_remaining[Team::Red], 2);
    }
    let surface = world.clients[0].render();
    assert_eq!(surface.text("team-label"), "Current Team:");
    assert_eq!(surface.text("current-team"), "Blue Team");
    assert!(surface.element("current-team").has_class("text-primary"));
    assert!(surface.element("button-lime").has_class("btn-light"));
    assert!(!surface.element("button-lime").disabled);
    assert!(surface.element("end-turn-button").displayed);
    assert!(!surface.element("new-game-button").displayed);
}

#[test]
fn correct_guess_keeps_the_turn() {
    let mut world = World::new();
    world.guess(1, "apple");
    for client in &world.clients {
        let view = client.state.view();
        assert!(view.tile("apple").unwrap().guessed);
        assert_eq!(view.tiles_remaining[Team::Blue], 1);
        assert_eq!(view.current_team, Some(Team::Blue));
        // The broadcast carried one tile, the rest of the board is intact.
        assert_eq!(view.tiles.len(), 6);
    }
    let surface = world.clients[0].render();
    assert!(surface.element("button-apple").disabled);
    assert!(surface.element("button-apple").has_class("btn-primary"));
    assert_eq!(surface.text("blue-team-tiles-remaining"), "1");
}

#[test]
fn wrong_guess_passes_the_turn() {
    let mut world = World::new();
    world.guess(0, "kiwi");
    assert_eq!(world.clients[1].state.view().current_team, Some(Team::Red));
    let surface = world.clients[1].render();
    assert_eq!(surface.text("current-team"), "Red Team");
    assert_eq!(surface.element("current-team").class_attribute(), "text-danger");
    assert!(surface.element("button-kiwi").has_class("btn-secondary"));
}

#[test]
fn end_turn() {
    let mut world = World::new();
    world.clients[0].state.end_turn();
    world.process_all_events();
    for client in &world.clients {
        assert_eq!(client.state.view().current_team, Some(Team::Red));
        assert_eq!(client.state.view().tiles.len(), 6);
    }
}

#[test]
fn spymaster_mode_is_local() {
    let mut world = World::new();
    world.clients[0].state.set_mode(PlayerMode::Spymaster);
    world.process_all_events();

    let spymaster = world.clients[0].state.view();
    assert_eq!(spymaster.mode, PlayerMode::Spymaster);
    let lime = spymaster.tile("lime").unwrap();
    assert_eq!(lime.hidden_value, TileOwner::Assassin);
    assert!(spymaster.tile_view(lime).disabled);
    assert_eq!(
        world.clients[0].state.guess("lime"),
        Err(CommandError::TileUnavailable("lime".to_owned()))
    );
    let surface = world.clients[0].render();
    assert!(surface.element("button-lime").has_class("btn-dark"));
    assert!(surface.element("spymaster-button").has_class("btn-info"));
    assert!(surface.element("guesser-button").has_class("gray-button"));

    let guesser = world.clients[1].state.view();
    assert_eq!(guesser.mode, PlayerMode::Guesser);
    assert!(!guesser.tile_view(guesser.tile("lime").unwrap()).disabled);

    world.clients[0].state.toggle_mode();
    world.process_all_events();
    let surface = world.clients[0].render();
    assert!(surface.element("button-lime").has_class("btn-light"));
    assert!(!surface.element("button-lime").disabled);
}

#[test]
fn assassin_ends_the_game() {
    let mut world = World::new();
    world.guess(0, "lime");
    for client in &world.clients {
        assert_eq!(client.state.view().winning_team, Some(Team::Red));
        assert_eq!(client.notable.last(), Some(&NotableEvent::GameWon(Team::Red)));
    }
    let surface = world.clients[1].render();
    assert_eq!(surface.text("team-label"), "Winning Team:");
    assert_eq!(surface.text("current-team"), "Red Team");
    assert!(!surface.element("end-turn-button").displayed);
    assert!(surface.element("new-game-button").displayed);
}

#[test]
fn finding_all_words_wins() {
    let mut world = World::new();
    world.guess(0, "apple");
    world.guess(1, "pear");
    let view = world.clients[0].state.view();
    assert_eq!(view.winning_team, Some(Team::Blue));
    assert_eq!(view.displayed_team(), Some(Team::Blue));
    assert_eq!(view.tiles_remaining[Team::Blue], 0);
}

#[test]
fn new_game_reloads_everybody() {
    let mut world = World::new();
    world.clients[1].state.set_mode(PlayerMode::Spymaster);
    world.guess(0, "lime");
    world.clients[0].state.new_game();
    world.process_all_events();
    for client in &world.clients {
        assert!(client.notable.contains(&NotableEvent::ReloadPage));
        let view = client.state.view();
        assert_eq!(view.winning_team, None);
        assert_eq!(view.tiles.len(), 6);
        assert!(view.tiles.iter().all(|tile| !tile.guessed));
    }
    assert_eq!(world.clients[1].state.view().mode, PlayerMode::Spymaster);
}
