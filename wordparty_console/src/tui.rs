// Text rendering of the game views. Colors follow the browser pages where they mean something
// (team colors, scored words).

use console::Style;
use itertools::Itertools;
use strum::IntoEnumIterator;

use wordparty::coord::BoardPosition;
use wordparty::scrambled_words::{GuessEntry, GuessStatus, ScrambledView};
use wordparty::team::{Team, TileOwner};
use wordparty::team_guess::TeamGuessView;
use wordparty::tile_board::TileBoardView;


const TEAM_GUESS_COLUMNS: usize = 5;
const LETTER_GRID_COLUMNS: usize = 5;

fn team_style(team: Team) -> Style {
    match team {
        Team::Red => Style::new().red(),
        Team::Blue => Style::new().blue(),
    }
}

fn owner_style(owner: TileOwner) -> Style {
    match owner {
        TileOwner::Neutral => Style::new().color256(250),
        TileOwner::Team(team) => team_style(team),
        TileOwner::Assassin => Style::new().black().on_white(),
    }
}

pub fn render_tile_board(view: &TileBoardView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Players: {}    Tiles left: {}    {}\n\n",
        view.num_players,
        view.tiles_left,
        if view.game_running { "Game running" } else { "Waiting for start" },
    ));
    let num_cols = view.board.first().map_or(0, Vec::len);
    out.push_str(&format!(
        "    {}\n",
        (0..num_cols).map(|c| format!("{:>2}", c % 100)).join("")
    ));
    for (r, row) in view.board.iter().enumerate() {
        let cells = row
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let text = format!(" {}", cell.unwrap_or('·'));
                if view.invalid_positions.contains(&BoardPosition::new(r, c)) {
                    Style::new().on_red().apply_to(text).to_string()
                } else {
                    text
                }
            })
            .join("");
        out.push_str(&format!("{r:>3} {cells}\n"));
    }
    let hand = view
        .hand
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let text = format!("{index}:{tile}");
            if view.selected == Some(index) {
                Style::new().reverse().apply_to(text).to_string()
            } else {
                text
            }
        })
        .join("  ");
    out.push_str(&format!("\nHand: {hand}\n"));
    let mut actions = vec![];
    if view.peel_enabled() {
        actions.push("/peel");
    }
    if view.exchange_enabled() {
        actions.push("/exchange");
    }
    if view.start_enabled {
        actions.push("/start");
    }
    out.push_str(&format!("Available: {}\n", actions.join(" ")));
    if !view.banner.is_empty() {
        out.push_str(&format!("\n{}\n", Style::new().magenta().apply_to(&view.banner)));
    }
    out
}

pub fn render_team_guess(view: &TeamGuessView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}    Mode: {}\n",
        Team::iter()
            .map(|team| {
                let label = team_style(team).apply_to(format!("{team} left:"));
                format!("{label} {}", view.tiles_remaining[team])
            })
            .join("    "),
        view.mode,
    ));
    if let Some(team) = view.displayed_team() {
        let label = if view.winning_team.is_some() { "Winning Team:" } else { "Current Team:" };
        out.push_str(&format!("{label} {}\n", team_style(team).apply_to(team.display_name())));
    }
    out.push('\n');
    let width = view.tiles.iter().map(|tile| tile.word.chars().count()).max().unwrap_or(0) + 2;
    for row in view.tiles.chunks(TEAM_GUESS_COLUMNS) {
        let line = row
            .iter()
            .map(|tile| {
                let padded = format!("{:<width$}", tile.word);
                let style = if view.tile_view(tile).disabled {
                    owner_style(tile.hidden_value)
                } else {
                    Style::new()
                };
                let style = if tile.guessed { style.strikethrough() } else { style };
                style.apply_to(padded).to_string()
            })
            .join("");
        out.push_str(&format!("{line}\n"));
    }
    out
}

fn render_guess(entry: &GuessEntry) -> String {
    let style = match entry.status {
        GuessStatus::Pending => Style::new(),
        GuessStatus::Scored { sole_guesser: true, .. } => Style::new().green(),
        GuessStatus::Scored { sole_guesser: false, .. } => Style::new().yellow(),
        GuessStatus::Unscored => Style::new().dim().strikethrough(),
    };
    style.apply_to(entry.display_text()).to_string()
}

pub fn render_scrambled(view: &ScrambledView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Time: {}    Round: {}    Total: {}\n",
        if view.time_display.is_empty() { "--:--" } else { &view.time_display },
        view.round_score.map_or_else(|| "_".to_owned(), |s| s.to_string()),
        view.total_score.map_or_else(|| "_".to_owned(), |s| s.to_string()),
    ));
    if !view.players.is_empty() {
        out.push_str(&format!("Players: {}\n", view.players));
    }
    out.push('\n');
    for (row_index, row) in view.tiles.chunks(LETTER_GRID_COLUMNS).enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(col, letters)| {
                let index = row_index * LETTER_GRID_COLUMNS + col;
                let text = format!(" {letters:<2}");
                if view.path.contains(&index) {
                    Style::new().reverse().apply_to(text).to_string()
                } else {
                    text
                }
            })
            .join("");
        out.push_str(&format!("{line}\n"));
    }
    out.push('\n');
    for entry in &view.guesses {
        out.push_str(&format!("  {}\n", render_guess(entry)));
    }
    if !view.guessing_enabled {
        let notice = Style::new().magenta().apply_to("Round over. /new starts a new game.");
        out.push_str(&format!("\n{notice}\n"));
    }
    out
}
