//! Line-based terminal control surface.
//!
//! A text version of a play button, parameter knobs and a pad grid: each
//! line is one command, and notifications are printed as they arrive.

use std::fmt;
use std::str::FromStr;

use pt_master::{Controller, Notification, ParamId, PAD_COUNT};
use tracing::debug;

pub const HELP: &str = "\
commands:
  play | stop | toggle        oscillator on/off
  pad <0-15>                  trigger a pad
  set <param> <value>         detune (st), volume (0-1), attack (ms)
  note <0-127> | off <0-127>  play or release a note as if from MIDI
  status                      show note and parameters
  help | quit";

/// One parsed control-surface command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Play,
    Stop,
    Toggle,
    Pad(usize),
    Set(ParamId, f32),
    Note(u8),
    Off(u8),
    Status,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

fn parse_arg<T: FromStr>(word: Option<&str>, what: &str) -> Result<T, ParseError> {
    let word = word.ok_or_else(|| ParseError(format!("missing {what}")))?;
    word.parse()
        .map_err(|_| ParseError(format!("invalid {what}: {word}")))
}

fn parse_note(word: Option<&str>) -> Result<u8, ParseError> {
    let note: u8 = parse_arg(word, "note")?;
    if note > 127 {
        return Err(ParseError(format!("note {note} out of range (0..=127)")));
    }
    Ok(note)
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| ParseError("empty command".into()))?;
        let command = match verb.to_ascii_lowercase().as_str() {
            "play" => Command::Play,
            "stop" => Command::Stop,
            "toggle" => Command::Toggle,
            "pad" => Command::Pad(parse_arg(words.next(), "pad")?),
            "set" => {
                let id = words
                    .next()
                    .ok_or_else(|| ParseError("missing parameter".into()))?
                    .parse::<ParamId>()
                    .map_err(|e| ParseError(e.to_string()))?;
                Command::Set(id, parse_arg(words.next(), "value")?)
            }
            "note" => Command::Note(parse_note(words.next())?),
            "off" => Command::Off(parse_note(words.next())?),
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError(format!("unknown command: {other}"))),
        };
        Ok(command)
    }
}

/// What the surface should do after a command.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

/// Apply `command` to the engine and describe the result.
pub fn execute(ctrl: &Controller, command: Command) -> Outcome {
    debug!(?command, "Control surface command.");
    let controls = ctrl.controls();
    let reply = match command {
        Command::Play => {
            controls.play();
            "playing".to_string()
        }
        Command::Stop => {
            controls.stop();
            "stopped".to_string()
        }
        Command::Toggle => {
            if controls.toggle_playing() {
                "playing".to_string()
            } else {
                "stopped".to_string()
            }
        }
        Command::Pad(pad) => match controls.request_trigger(pad) {
            Ok(()) => format!("pad {pad} triggered"),
            Err(e) => format!("error: {e}"),
        },
        Command::Set(id, value) => {
            let stored = controls.set_param(id, value);
            match id.unit() {
                "" => format!("{id} = {stored}"),
                unit => format!("{id} = {stored} {unit}"),
            }
        }
        Command::Note(note) => {
            ctrl.router().handle(pt_ir::MidiEvent::note_on(0, note, 100));
            return Outcome::Reply(String::new());
        }
        Command::Off(note) => {
            ctrl.router().handle(pt_ir::MidiEvent::NoteOff { channel: 0, note });
            return Outcome::Reply(String::new());
        }
        Command::Status => status(ctrl),
        Command::Help => HELP.to_string(),
        Command::Quit => return Outcome::Quit,
    };
    Outcome::Reply(reply)
}

/// One-line summary of the engine state.
pub fn status(ctrl: &Controller) -> String {
    let controls = ctrl.controls();
    let state = controls.note_state();
    let note = match state.held_note {
        Some(n) => n.to_string(),
        None => "-".to_string(),
    };
    let params = ParamId::ALL
        .iter()
        .map(|&id| format!("{id}={}", controls.param(id)))
        .collect::<Vec<_>>()
        .join(" ");
    let base = ctrl.router().pad_map().base_note();
    format!(
        "{} note={note} freq={:.2}Hz {params} pads={PAD_COUNT}@{base}..{} dropped={}",
        if state.playing { "playing" } else { "stopped" },
        state.base_frequency,
        base as usize + PAD_COUNT - 1,
        ctrl.dropped_notifications(),
    )
}

/// Text for a notification.
pub fn describe(notification: Notification) -> String {
    match notification {
        Notification::NoteChanged { note: Some(note) } => format!("note {note}"),
        Notification::NoteChanged { note: None } => "note off".to_string(),
        Notification::PadTriggered { pad } => format!("pad {pad}"),
    }
}
