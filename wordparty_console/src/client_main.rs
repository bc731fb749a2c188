use std::fmt;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use scopeguard::defer;

use wordparty::countdown::epoch_millis_now;
use wordparty::event::WireEvent;

use crate::games::{CommandOutcome, ConsoleGame};
use crate::network::{self, CommunicationError};


pub struct ClientConfig {
    pub server_address: String,
    pub cookie: String,
}

enum IncomingEvent {
    Network(WireEvent),
    Disconnected(CommunicationError),
    Terminal(term_event::Event),
    Tick,
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1), cursor::Hide)?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, game: &dyn ConsoleGame, keyboard_input: &str,
    pending_confirmation: Option<&str>, status: &Option<Result<String, String>>,
) -> io::Result<()> {
    execute!(stdout, cursor::MoveTo(0, 0), terminal::Clear(terminal::ClearType::All))?;
    writeln_raw(stdout, game.render())?;
    writeln_raw(stdout, game.help().with(style::Color::DarkGrey))?;
    if let Some(question) = pending_confirmation {
        writeln_raw(stdout, format!("{question} (y/n)").with(style::Color::Yellow))?;
    }
    writeln_raw(stdout, format!("> {keyboard_input}▂"))?;
    match status {
        Some(Ok(message)) => writeln_raw(stdout, message.clone().with(style::Color::Magenta))?,
        Some(Err(message)) => writeln_raw(stdout, message.clone().with(style::Color::Red))?,
        None => {}
    }
    Ok(())
}

// Owns the websocket: alternates between forwarding outgoing events and waiting for incoming ones.
fn run_network(
    mut connection: network::Connection, outgoing: mpsc::Receiver<WireEvent>,
    incoming: mpsc::Sender<IncomingEvent>,
) {
    let result = (|| -> Result<(), CommunicationError> {
        loop {
            loop {
                match outgoing.try_recv() {
                    Ok(event) => connection.send(event)?,
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
                }
            }
            if let Some(event) = connection.poll()? {
                if incoming.send(IncomingEvent::Network(event)).is_err() {
                    return Ok(());
                }
            }
        }
    })();
    if let Err(err) = result {
        log::error!("Connection lost: {err}");
        let _ = incoming.send(IncomingEvent::Disconnected(err));
    }
}

pub fn run(config: ClientConfig, mut game: Box<dyn ConsoleGame>) -> anyhow::Result<()> {
    println!("Connecting to {}...", config.server_address);
    let connection = network::Connection::open(&config.server_address, &config.cookie)
        .with_context(|| format!("Connecting to {}", config.server_address))?;
    log::info!("Connected, ping interval {} ms", connection.handshake().ping_interval);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    };

    let (tx, rx) = mpsc::channel();
    let (server_tx, server_rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx;
    thread::spawn(move || run_network(connection, server_rx, tx_net));
    thread::spawn(move || {
        while let Ok(ev) = term_event::read() {
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                break;
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(250));
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                break;
            }
        }
    });

    let mut keyboard_input = String::new();
    let mut pending_confirmation: Option<&'static str> = None;
    let mut status: Option<Result<String, String>> = None;
    game.join();
    for event in rx {
        let now = epoch_millis_now();
        match event {
            IncomingEvent::Network(event) => match game.process_server_event(&event, now) {
                Ok(Some(message)) => status = Some(Ok(message)),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Cannot process {}: {err}", event.name);
                    status = Some(Err(err.to_string()));
                }
            },
            IncomingEvent::Disconnected(err) => {
                return Err(err).context("Connection to the server lost");
            }
            IncomingEvent::Terminal(term_event::Event::Key(key))
                if key.kind == term_event::KeyEventKind::Press =>
            {
                match key.code {
                    term_event::KeyCode::Char('c')
                        if key.modifiers.contains(term_event::KeyModifiers::CONTROL) =>
                    {
                        return Ok(());
                    }
                    term_event::KeyCode::Char(ch) => keyboard_input.push(ch),
                    term_event::KeyCode::Backspace => {
                        keyboard_input.pop();
                    }
                    term_event::KeyCode::Enter => {
                        let input = std::mem::take(&mut keyboard_input);
                        if pending_confirmation.take().is_some() {
                            status = match input.trim() {
                                "y" | "yes" => game.confirm().err().map(Err),
                                _ => Some(Ok("Cancelled".to_owned())),
                            };
                        } else if input.trim() == "/quit" {
                            return Ok(());
                        } else {
                            status = match game.execute(&input) {
                                Ok(CommandOutcome::Done) => None,
                                Ok(CommandOutcome::NeedsConfirmation(question)) => {
                                    pending_confirmation = Some(question);
                                    None
                                }
                                Err(message) => Some(Err(message)),
                            };
                        }
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(_) => {}
            IncomingEvent::Tick => {
                if let Some(message) = game.tick(now) {
                    status = Some(Ok(message));
                }
            }
        }
        for event in game.take_outgoing() {
            if server_tx.send(event).is_err() {
                anyhow::bail!("Network thread is gone");
            }
        }
        render(&mut stdout, &*game, &keyboard_input, pending_confirmation, &status)?;
    }
    anyhow::bail!("Unexpected end of events stream")
}
