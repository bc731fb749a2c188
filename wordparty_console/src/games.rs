// Adapters that let the terminal loop drive any of the game clients with typed-in commands.

use std::sync::mpsc;

use wordparty::NEW_GAME_CONFIRMATION;
use wordparty::coord::{BoardPosition, ShiftDirection};
use wordparty::countdown::EpochMillis;
use wordparty::error::EventError;
use wordparty::event::{
    ClientEvent, ScrambledClientEvent, ScrambledServerEvent, ServerEvent, TeamGuessClientEvent,
    TeamGuessServerEvent, TileBoardClientEvent, TileBoardServerEvent, WireEvent,
};
use wordparty::player_id::PlayerId;
use wordparty::scrambled_words::{self, ScrambledClient};
use wordparty::team_guess::{self, PlayerMode, TeamGuessClient};
use wordparty::tile_board::{self, TileBoardClient};

use crate::tui;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CommandOutcome {
    Done,
    // The command only runs after the user agrees to this question.
    NeedsConfirmation(&'static str),
}

pub trait ConsoleGame {
    fn join(&mut self);
    // Returns a message worth showing to the user, if any.
    fn process_server_event(
        &mut self, event: &WireEvent, now: EpochMillis,
    ) -> Result<Option<String>, EventError>;
    fn tick(&mut self, _now: EpochMillis) -> Option<String> { None }
    fn execute(&mut self, input: &str) -> Result<CommandOutcome, String>;
    // Runs the command that asked for confirmation.
    fn confirm(&mut self) -> Result<(), String>;
    fn render(&self) -> String;
    fn help(&self) -> &'static str;
    fn take_outgoing(&mut self) -> Vec<WireEvent>;
}

fn drain<E: ClientEvent>(rx: &mpsc::Receiver<E>, room: &str) -> Vec<WireEvent> {
    rx.try_iter().map(|event| event.to_wire(room)).collect()
}

fn parse_number(s: Option<&str>) -> Result<usize, String> {
    let s = s.ok_or_else(|| "Missing number".to_owned())?;
    s.parse().map_err(|_| format!("Not a number: '{s}'"))
}

fn unknown_command(cmd: &str) -> String { format!("Unknown command: '{cmd}'") }


pub struct TileBoardGame {
    client: TileBoardClient,
    rx: mpsc::Receiver<TileBoardClientEvent>,
}

impl TileBoardGame {
    pub fn new(room: String, player_id: PlayerId) -> Self {
        let (tx, rx) = mpsc::channel();
        TileBoardGame { client: TileBoardClient::new(room, player_id, tx), rx }
    }
}

impl ConsoleGame for TileBoardGame {
    fn join(&mut self) { self.client.join(); }

    fn process_server_event(
        &mut self, event: &WireEvent, _now: EpochMillis,
    ) -> Result<Option<String>, EventError> {
        let event = TileBoardServerEvent::from_wire(event)?;
        Ok(match self.client.process_server_event(event)? {
            tile_board::NotableEvent::PeelRejected => {
                Some("Peel rejected: fix the highlighted cells".to_owned())
            }
            tile_board::NotableEvent::None
            | tile_board::NotableEvent::Banner(_)
            | tile_board::NotableEvent::BoardUpdated
            | tile_board::NotableEvent::GameOver { .. } => None,
        })
    }

    fn execute(&mut self, input: &str) -> Result<CommandOutcome, String> {
        let mut words = input.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(CommandOutcome::Done);
        };
        match cmd {
            "/select" | "/s" => {
                let index = parse_number(words.next())?;
                self.client.click_hand_tile(index).map_err(|err| err.to_string())?;
            }
            "/place" | "/p" => {
                let row = parse_number(words.next())?;
                let col = parse_number(words.next())?;
                self.client.click_board_cell(BoardPosition::new(row, col));
            }
            "/shift" => {
                let dir = words.next().unwrap_or_default();
                let direction: ShiftDirection =
                    dir.parse().map_err(|_| format!("Unknown direction: '{dir}'"))?;
                self.client.shift_board(direction);
            }
            "/peel" => self.client.peel().map_err(|err| err.to_string())?,
            "/exchange" => self.client.exchange().map_err(|err| err.to_string())?,
            "/start" => return Ok(CommandOutcome::NeedsConfirmation(NEW_GAME_CONFIRMATION)),
            _ => return Err(unknown_command(cmd)),
        }
        Ok(CommandOutcome::Done)
    }

    fn confirm(&mut self) -> Result<(), String> {
        self.client.start_game().map_err(|err| err.to_string())
    }

    fn render(&self) -> String { tui::render_tile_board(self.client.view()) }

    fn help(&self) -> &'static str {
        "/select <i>  /place <row> <col>  /shift up|down|left|right  /peel  /exchange  /start  /quit"
    }

    fn take_outgoing(&mut self) -> Vec<WireEvent> { drain(&self.rx, self.client.room()) }
}


pub struct TeamGuessGame {
    client: TeamGuessClient,
    rx: mpsc::Receiver<TeamGuessClientEvent>,
}

impl TeamGuessGame {
    pub fn new(room: String) -> Self {
        let (tx, rx) = mpsc::channel();
        TeamGuessGame { client: TeamGuessClient::new(room, tx), rx }
    }
}

impl ConsoleGame for TeamGuessGame {
    fn join(&mut self) { self.client.join(); }

    fn process_server_event(
        &mut self, event: &WireEvent, _now: EpochMillis,
    ) -> Result<Option<String>, EventError> {
        let event = TeamGuessServerEvent::from_wire(event)?;
        Ok(match self.client.process_server_event(event)? {
            team_guess::NotableEvent::GameWon(team) => Some(format!("{} won!", team.display_name())),
            team_guess::NotableEvent::ReloadPage => {
                self.client.rejoin();
                Some("A new game has started".to_owned())
            }
            team_guess::NotableEvent::None | team_guess::NotableEvent::GameUpdated => None,
        })
    }

    fn execute(&mut self, input: &str) -> Result<CommandOutcome, String> {
        let input = input.trim();
        match input {
            "" => {}
            "/end" => self.client.end_turn(),
            "/spymaster" => self.client.set_mode(PlayerMode::Spymaster),
            "/guesser" => self.client.set_mode(PlayerMode::Guesser),
            "/toggle" => self.client.toggle_mode(),
            "/new" => return Ok(CommandOutcome::NeedsConfirmation(NEW_GAME_CONFIRMATION)),
            cmd if cmd.starts_with('/') => return Err(unknown_command(cmd)),
            word => self.client.guess(word).map_err(|err| err.to_string())?,
        }
        Ok(CommandOutcome::Done)
    }

    fn confirm(&mut self) -> Result<(), String> {
        self.client.new_game();
        Ok(())
    }

    fn render(&self) -> String { tui::render_team_guess(self.client.view()) }

    fn help(&self) -> &'static str {
        "<word> to guess  /end  /spymaster  /guesser  /toggle  /new  /quit"
    }

    fn take_outgoing(&mut self) -> Vec<WireEvent> { drain(&self.rx, self.client.room()) }
}


pub struct ScrambledGame {
    client: ScrambledClient,
    rx: mpsc::Receiver<ScrambledClientEvent>,
}

impl ScrambledGame {
    pub fn new(room: String) -> Self {
        let (tx, rx) = mpsc::channel();
        ScrambledGame { client: ScrambledClient::new(room, tx), rx }
    }
}

impl ConsoleGame for ScrambledGame {
    fn join(&mut self) { self.client.join(); }

    fn process_server_event(
        &mut self, event: &WireEvent, now: EpochMillis,
    ) -> Result<Option<String>, EventError> {
        let event = ScrambledServerEvent::from_wire(event)?;
        Ok(match self.client.process_server_event(event, now)? {
            scrambled_words::NotableEvent::GuessRejected(guess) => {
                Some(format!("'{guess}' is not a valid word"))
            }
            scrambled_words::NotableEvent::RoundOver { round_score } => {
                Some(format!("Round over, you scored {round_score}"))
            }
            scrambled_words::NotableEvent::TimerExpired => Some("Time is up".to_owned()),
            scrambled_words::NotableEvent::None
            | scrambled_words::NotableEvent::RoundStarted
            | scrambled_words::NotableEvent::GuessAccepted(_)
            | scrambled_words::NotableEvent::PlayersUpdated => None,
        })
    }

    fn tick(&mut self, now: EpochMillis) -> Option<String> {
        self.client.tick(now).then(|| "Time is up".to_owned())
    }

    fn execute(&mut self, input: &str) -> Result<CommandOutcome, String> {
        match input.trim() {
            "/new" => Ok(CommandOutcome::NeedsConfirmation(NEW_GAME_CONFIRMATION)),
            cmd if cmd.starts_with('/') => Err(unknown_command(cmd)),
            guess => {
                self.client.submit_guess(guess).map_err(|err| err.to_string())?;
                Ok(CommandOutcome::Done)
            }
        }
    }

    fn confirm(&mut self) -> Result<(), String> {
        self.client.new_game();
        Ok(())
    }

    fn render(&self) -> String { tui::render_scrambled(self.client.view()) }

    fn help(&self) -> &'static str { "<word> to guess  /new  /quit" }

    fn take_outgoing(&mut self) -> Vec<WireEvent> { drain(&self.rx, self.client.room()) }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn names(events: &[WireEvent]) -> Vec<&str> {
        events.iter().map(|event| event.name.as_str()).collect()
    }

    #[test]
    fn tile_board_commands() {
        let player_id = PlayerId::parse("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
        let mut game = TileBoardGame::new("R".to_owned(), player_id);
        game.join();
        game.process_server_event(
            &WireEvent::new(
                "cc-board_update",
                json!({
                    "num_players": 1,
                    "tiles_left": 30,
                    "game_running": true,
                    "players": {
                        "0f8fad5b-d9cb-469f-a165-70867728950e": {
                            "hand_tiles": ["Z"],
                            "board": [[null, null]]
                        }
                    }
                }),
            ),
            0,
        )
        .unwrap();
        assert_eq!(game.execute("/select 0"), Ok(CommandOutcome::Done));
        assert_eq!(game.execute("/place 0 1"), Ok(CommandOutcome::Done));
        assert_eq!(game.execute("/shift left"), Ok(CommandOutcome::Done));
        assert!(game.execute("/shift sideways").is_err());
        assert!(game.execute("/select 5").is_err());
        assert_eq!(
            game.execute("/start"),
            Ok(CommandOutcome::NeedsConfirmation(NEW_GAME_CONFIRMATION))
        );
        let outgoing = game.take_outgoing();
        assert_eq!(names(&outgoing), ["cc-join", "cc-add_tile", "cc-shift_board"]);
        assert_eq!(
            outgoing[1].payload,
            json!({ "room": "R", "hand_tile_index": 0, "board_position": [0, 1] })
        );
    }

    #[test]
    fn team_guess_reload_rejoins() {
        let mut game = TeamGuessGame::new("R".to_owned());
        let message = game.process_server_event(&WireEvent::new("reload_page", json!({})), 0);
        assert_eq!(message, Ok(Some("A new game has started".to_owned())));
        assert_eq!(names(&game.take_outgoing()), ["join"]);
        assert!(game.execute("/bogus").is_err());
        game.execute("/toggle").unwrap();
        game.confirm().unwrap();
        assert_eq!(names(&game.take_outgoing()), ["player_mode_change", "new_game"]);
    }

    #[test]
    fn scrambled_guess_input() {
        let mut game = ScrambledGame::new("R".to_owned());
        game.process_server_event(
            &WireEvent::new(
                "game_state",
                json!({ "tiles": ["A"], "expire_time": 10_000, "player_guesses": [] }),
            ),
            0,
        )
        .unwrap();
        game.execute("tea").unwrap();
        assert!(game.execute("  ").is_err());
        assert_eq!(game.tick(10_000), Some("Time is up".to_owned()));
        assert!(game.execute("eat").is_err());
        let outgoing = game.take_outgoing();
        assert_eq!(names(&outgoing), ["guess", "timer_expired"]);
        assert_eq!(outgoing[0].payload, json!({ "room": "R", "guess": "tea" }));
    }
}
