#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_main;
mod games;
mod identity;
mod network;
mod tui;

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgMatches, Command, arg};
use time::OffsetDateTime;

use wordparty::event::GameKind;

use crate::games::{ConsoleGame, ScrambledGame, TeamGuessGame, TileBoardGame};


fn game_command(kind: GameKind, about: &'static str) -> Command {
    Command::new(<&'static str>::from(kind))
        .about(about)
        .arg(arg!(<server_address> "Server address, e.g. https://example.com or localhost:5000"))
        .arg(arg!(<room> "Room name"))
}

fn main() -> anyhow::Result<()> {
    let matches = Command::new("Word Party")
        .version(clap::crate_version!())
        .about("Console client for the word party games")
        .subcommand_required(true)
        .arg(
            arg!(--"identity" [path] "Identity file: yaml-serialized player id and name")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("wordparty_identity.yaml"),
        )
        .arg(arg!(--"name" [player_name] "Player name; remembered in the identity file"))
        .arg(
            arg!(--"log-file" [path] "Where to write logs; the terminal is busy with the game")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("wordparty.log"),
        )
        .subcommand(game_command(GameKind::TileBoard, "Build a crossword from your tiles"))
        .subcommand(game_command(GameKind::TeamGuess, "Guess your team's words"))
        .subcommand(game_command(GameKind::ScrambledWords, "Find words before time runs out"))
        .get_matches();

    init_logging(get_path(&matches, "log-file")?)?;

    let now = OffsetDateTime::now_utc();
    let identity_path = get_path(&matches, "identity")?;
    let name = matches.get_one::<String>("name").map(String::as_str);
    let identity = identity::load_or_create(&identity_path, name, now)?;
    log::info!("Playing as {} ({})", identity.player_name, identity.player_id);

    let Some((subcommand, sub_matches)) = matches.subcommand() else {
        unreachable!("subcommand_required prevents `None`");
    };
    let kind: GameKind = subcommand.parse().context("Unknown game")?;
    let server_address = get_string(sub_matches, "server_address")?;
    let room = get_string(sub_matches, "room")?;
    let game: Box<dyn ConsoleGame> = match kind {
        GameKind::TileBoard => Box::new(TileBoardGame::new(room, identity.player_id.clone())),
        GameKind::TeamGuess => Box::new(TeamGuessGame::new(room)),
        GameKind::ScrambledWords => Box::new(ScrambledGame::new(room)),
    };
    client_main::run(
        client_main::ClientConfig { server_address, cookie: identity.cookie_header() },
        game,
    )
}

fn init_logging(path: PathBuf) -> anyhow::Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Creating log file {}", path.display()))?;
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    Ok(())
}

fn get_path(matches: &ArgMatches, id: &str) -> anyhow::Result<PathBuf> {
    matches.get_one::<PathBuf>(id).cloned().with_context(|| format!("Missing --{id}"))
}

fn get_string(matches: &ArgMatches, id: &str) -> anyhow::Result<String> {
    matches.get_one::<String>(id).cloned().with_context(|| format!("Missing <{id}>"))
}
