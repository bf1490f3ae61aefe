//! MIDI input via midir, feeding raw messages to a [`MidiRouter`].

use std::fmt;
use std::str::FromStr;

use midir::{MidiInput, MidiInputConnection};
use pt_engine::MidiRouter;
use tracing::{debug, info};

use crate::traits::AudioError;

const CLIENT_NAME: &str = "padtone";

/// Which input port to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MidiPortSelector {
    /// Position in the list returned by [`list_midi_inputs`].
    Index(usize),
    /// Case-insensitive substring of the port name.
    Name(String),
}

impl FromStr for MidiPortSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<usize>() {
            Ok(index) => MidiPortSelector::Index(index),
            Err(_) => MidiPortSelector::Name(s.trim().to_string()),
        })
    }
}

impl fmt::Display for MidiPortSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiPortSelector::Index(index) => write!(f, "#{index}"),
            MidiPortSelector::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

/// Index of the first port in `names` matching `selector`.
pub fn select_port(names: &[String], selector: &MidiPortSelector) -> Option<usize> {
    match selector {
        MidiPortSelector::Index(index) => (*index < names.len()).then_some(*index),
        MidiPortSelector::Name(wanted) => {
            let wanted = wanted.to_lowercase();
            names.iter().position(|name| name.to_lowercase().contains(&wanted))
        }
    }
}

/// Names of every MIDI input port, in port order.
pub fn list_midi_inputs() -> Result<Vec<String>, AudioError> {
    let input = MidiInput::new(CLIENT_NAME).map_err(|e| AudioError::MidiInit(e.to_string()))?;
    input
        .ports()
        .iter()
        .map(|port| {
            input
                .port_name(port)
                .map_err(|e| AudioError::MidiInit(e.to_string()))
        })
        .collect()
}

/// An open MIDI input. Messages flow into the router until [`close`] is
/// called or the connection is dropped.
///
/// [`close`]: MidiConnection::close
pub struct MidiConnection {
    connection: Option<MidiInputConnection<()>>,
    port_name: String,
}

impl MidiConnection {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Stop delivering MIDI. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            let _ = connection.close();
            info!(port = %self.port_name, "Closed MIDI input.");
        }
    }
}

impl Drop for MidiConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Connect the selected input port to `router`. The router runs on midir's
/// callback thread.
pub fn connect_midi_input(
    selector: &MidiPortSelector,
    router: MidiRouter,
) -> Result<MidiConnection, AudioError> {
    let input = MidiInput::new(CLIENT_NAME).map_err(|e| AudioError::MidiInit(e.to_string()))?;
    let ports = input.ports();
    let names = ports
        .iter()
        .map(|port| input.port_name(port))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AudioError::MidiInit(e.to_string()))?;

    let index =
        select_port(&names, selector).ok_or_else(|| AudioError::NoMidiPort(selector.to_string()))?;
    let port_name = names[index].clone();
    debug!(port = %port_name, index, "Connecting MIDI input.");

    let connection = input
        .connect(
            &ports[index],
            "padtone input",
            move |_, raw_event, _| router.handle_raw(raw_event),
            (),
        )
        .map_err(|e| AudioError::MidiConnect(e.to_string()))?;

    info!(port = %port_name, "Watching MIDI events.");
    Ok(MidiConnection {
        connection: Some(connection),
        port_name,
    })
}
