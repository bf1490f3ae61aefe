//! Offline rendering of scripted control sequences.
//!
//! A script is a list of actions at frame offsets. Blocks are split at every
//! event so each action lands on its exact frame, and the same MIDI, control
//! and render paths used live are exercised.

use pt_engine::{build_engine, EngineConfig, EngineParts};
use pt_ir::{AudioBuffer, MidiEvent, OutputBlock, ParamId, Sample};
use tracing::{debug, info};

use crate::ControllerError;

/// One control action.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptAction {
    /// MIDI note-on at full velocity through the router.
    NoteOn(u8),
    /// MIDI note-off through the router.
    NoteOff(u8),
    /// Manual pad trigger.
    Trigger(usize),
    SetParam(ParamId, f32),
    Play,
    Stop,
}

/// An action applied just before `frame` is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptEvent {
    pub frame: usize,
    pub action: ScriptAction,
}

impl ScriptEvent {
    pub fn new(frame: usize, action: ScriptAction) -> Self {
        Self { frame, action }
    }
}

/// Parse a script, one event per line: `<frame> <action> [args]`.
///
/// Actions are `note <n>`, `off <n>`, `pad <n>`, `set <param> <value>`,
/// `play` and `stop`. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, ControllerError> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let err = |message: String| ControllerError::Script {
            line: idx + 1,
            message,
        };

        let mut words = line.split_whitespace();
        let frame = words
            .next()
            .unwrap_or("")
            .parse::<usize>()
            .map_err(|e| err(format!("bad frame: {e}")))?;
        let verb = words.next().ok_or_else(|| err("missing action".to_string()))?;
        let mut arg = |what: &str| {
            words
                .next()
                .ok_or_else(|| err(format!("{verb} needs {what}")))
        };

        let action = match verb {
            "note" => ScriptAction::NoteOn(parse_note(arg("a note")?).map_err(err)?),
            "off" => ScriptAction::NoteOff(parse_note(arg("a note")?).map_err(err)?),
            "pad" => ScriptAction::Trigger(
                arg("a pad")?
                    .parse::<usize>()
                    .map_err(|e| err(format!("bad pad: {e}")))?,
            ),
            "set" => {
                let id: ParamId = arg("a parameter")?.parse().map_err(|e| err(format!("{e}")))?;
                let value = arg("a value")?
                    .parse::<f32>()
                    .map_err(|e| err(format!("bad value: {e}")))?;
                ScriptAction::SetParam(id, value)
            }
            "play" => ScriptAction::Play,
            "stop" => ScriptAction::Stop,
            other => return Err(err(format!("unknown action {other:?}"))),
        };
        events.push(ScriptEvent::new(frame, action));
    }
    Ok(events)
}

fn parse_note(word: &str) -> Result<u8, String> {
    match word.parse::<u8>() {
        Ok(note) if note <= 127 => Ok(note),
        _ => Err(format!("bad note {word:?}")),
    }
}

/// Render `frames` frames of `channels`-channel audio, applying `script`
/// along the way. Blocks are at most `block_size` frames.
pub fn render_offline<I>(
    config: &EngineConfig,
    samples: I,
    script: &[ScriptEvent],
    frames: usize,
    channels: u16,
    block_size: usize,
) -> Result<AudioBuffer, ControllerError>
where
    I: IntoIterator<Item = Option<Sample>>,
{
    let mut parts = build_engine(config, samples)?;
    let mut events = script.to_vec();
    events.sort_by_key(|e| e.frame);
    let block_size = block_size.max(1);

    let mut out = AudioBuffer::new(channels, frames);
    let mut next = 0;
    let mut cursor = 0;
    let mut posted = 0;
    while cursor < frames {
        while let Some(event) = events.get(next).filter(|e| e.frame <= cursor) {
            apply(&parts, &event.action)?;
            next += 1;
        }
        // Nobody watches offline; keep the queue from overflowing.
        posted += parts.notifications.drain().count();
        let mut end = (cursor + block_size).min(frames);
        if let Some(event) = events.get(next) {
            end = end.min(event.frame);
        }
        parts.renderer.render(&mut Window {
            buffer: &mut out,
            start: cursor,
            len: end - cursor,
        });
        cursor = end;
    }

    info!(
        frames,
        channels,
        events = events.len(),
        notifications = posted,
        "Offline render finished."
    );
    Ok(out)
}

/// Render a script and encode the result as 16-bit stereo WAV.
pub fn render_to_wav<I>(
    config: &EngineConfig,
    samples: I,
    script: &[ScriptEvent],
    frames: usize,
) -> Result<Vec<u8>, ControllerError>
where
    I: IntoIterator<Item = Option<Sample>>,
{
    let buffer = render_offline(config, samples, script, frames, 2, 512)?;
    Ok(pt_formats::buffer_to_wav(&buffer, config.sample_rate))
}

fn apply(parts: &EngineParts, action: &ScriptAction) -> Result<(), ControllerError> {
    debug!(?action, "Applying script action.");
    match *action {
        ScriptAction::NoteOn(note) => parts.router.handle(MidiEvent::note_on(0, note, 127)),
        ScriptAction::NoteOff(note) => parts.router.handle(MidiEvent::NoteOff { channel: 0, note }),
        ScriptAction::Trigger(pad) => parts.controls.request_trigger(pad)?,
        ScriptAction::SetParam(id, value) => {
            parts.controls.set_param(id, value);
        }
        ScriptAction::Play => parts.controls.play(),
        ScriptAction::Stop => parts.controls.stop(),
    }
    Ok(())
}

/// A frame range of a planar buffer, rendered as its own block.
struct Window<'a> {
    buffer: &'a mut AudioBuffer,
    start: usize,
    len: usize,
}

impl OutputBlock for Window<'_> {
    fn channels(&self) -> usize {
        self.buffer.channels() as usize
    }

    fn frames(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for ch in 0..self.buffer.channels() {
            self.buffer.channel_mut(ch)[self.start..self.start + self.len].fill(0.0);
        }
    }

    fn write(&mut self, ch: usize, frame: usize, value: f32) {
        self.buffer.channel_mut(ch as u16)[self.start + frame] = value;
    }

    fn add(&mut self, ch: usize, frame: usize, value: f32) {
        self.buffer.channel_mut(ch as u16)[self.start + frame] += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_engine::EngineError;

    fn config() -> EngineConfig {
        EngineConfig {
            sample_rate: 8000,
            ..Default::default()
        }
    }

    #[test]
    fn parses_every_action() {
        let script = "\
            # warm-up
            0 set volume 0.8
            0 note 60
            100 pad 3   # kick
            200 off 60

            300 play
            400 stop
        ";
        let events = parse_script(script).unwrap();
        assert_eq!(
            events,
            vec![
                ScriptEvent::new(0, ScriptAction::SetParam(ParamId::Volume, 0.8)),
                ScriptEvent::new(0, ScriptAction::NoteOn(60)),
                ScriptEvent::new(100, ScriptAction::Trigger(3)),
                ScriptEvent::new(200, ScriptAction::NoteOff(60)),
                ScriptEvent::new(300, ScriptAction::Play),
                ScriptEvent::new(400, ScriptAction::Stop),
            ]
        );
    }

    #[test]
    fn parse_errors_name_the_line() {
        let err = parse_script("0 play\n5 jump").unwrap_err();
        assert!(matches!(err, ControllerError::Script { line: 2, .. }));
        assert!(matches!(
            parse_script("x note 60"),
            Err(ControllerError::Script { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("0 note 200"),
            Err(ControllerError::Script { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("0 set warp 1"),
            Err(ControllerError::Script { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("0 set volume"),
            Err(ControllerError::Script { line: 1, .. })
        ));
    }

    #[test]
    fn note_starts_on_its_frame() {
        let script = [ScriptEvent::new(37, ScriptAction::NoteOn(69))];
        let out = render_offline(&config(), std::iter::empty(), &script, 100, 1, 64).unwrap();
        assert!(out.channel(0)[..37].iter().all(|&s| s == 0.0));
        // First sounding frame is at phase 0, the next one is not.
        assert_eq!(out.channel(0)[37], 0.0);
        assert!(out.channel(0)[38] != 0.0);
    }

    #[test]
    fn note_off_silences_from_its_frame() {
        let script = [
            ScriptEvent::new(0, ScriptAction::NoteOn(60)),
            ScriptEvent::new(50, ScriptAction::NoteOff(60)),
        ];
        let out = render_offline(&config(), std::iter::empty(), &script, 80, 2, 16).unwrap();
        assert!(out.channel(0)[1..50].iter().any(|&s| s != 0.0));
        assert!(out.channel(0)[50..].iter().all(|&s| s == 0.0));
        assert_eq!(out.channel(0), out.channel(1));
    }

    #[test]
    fn block_size_does_not_change_output() {
        let script = [
            ScriptEvent::new(0, ScriptAction::NoteOn(64)),
            ScriptEvent::new(10, ScriptAction::SetParam(ParamId::Detune, 3.0)),
        ];
        let a = render_offline(&config(), std::iter::empty(), &script, 300, 1, 7).unwrap();
        let b = render_offline(&config(), std::iter::empty(), &script, 300, 1, 300).unwrap();
        assert_eq!(a.channel(0), b.channel(0));
    }

    #[test]
    fn pad_trigger_plays_sample_at_offset() {
        let mut samples = vec![None; 4];
        samples[2] = Some(Sample::from_mono("hit", vec![0.5; 4], 8000));
        let script = [ScriptEvent::new(5, ScriptAction::Trigger(2))];
        let out = render_offline(&config(), samples, &script, 12, 1, 64).unwrap();
        assert_eq!(
            out.channel(0),
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn invalid_pad_in_script_is_an_error() {
        let script = [ScriptEvent::new(0, ScriptAction::Trigger(99))];
        assert!(matches!(
            render_offline(&config(), std::iter::empty(), &script, 10, 1, 4),
            Err(ControllerError::Engine(EngineError::PadOutOfRange { pad: 99 }))
        ));
    }

    #[test]
    fn wav_output_has_expected_length() {
        let script = [ScriptEvent::new(0, ScriptAction::NoteOn(69))];
        let wav = render_to_wav(&config(), std::iter::empty(), &script, 1000).unwrap();
        assert_eq!(wav.len(), 44 + 1000 * 4);
    }
}
