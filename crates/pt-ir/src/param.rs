//! Oscillator parameter definitions.

use core::fmt;
use core::str::FromStr;

/// A user-facing synth parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Pitch offset applied on top of the held note, in semitones.
    Detune,
    /// Linear output gain of the oscillator.
    Volume,
    /// Attack time in milliseconds. Stored and reported, not used by synthesis.
    Attack,
}

/// Inclusive value range of a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    /// Clamp into the range. NaN maps to `fallback`.
    pub fn clamp(&self, value: f32, fallback: f32) -> f32 {
        if value.is_nan() {
            fallback
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl ParamId {
    /// Every parameter, in storage order.
    pub const ALL: [ParamId; 3] = [ParamId::Detune, ParamId::Volume, ParamId::Attack];

    /// Storage slot of this parameter.
    pub const fn index(self) -> usize {
        match self {
            ParamId::Detune => 0,
            ParamId::Volume => 1,
            ParamId::Attack => 2,
        }
    }

    pub const fn range(self) -> ParamRange {
        match self {
            ParamId::Detune => ParamRange { min: -24.0, max: 24.0 },
            ParamId::Volume => ParamRange { min: 0.0, max: 1.0 },
            ParamId::Attack => ParamRange { min: 1.0, max: 2000.0 },
        }
    }

    pub const fn default_value(self) -> f32 {
        match self {
            ParamId::Detune => 0.0,
            ParamId::Volume => 0.5,
            ParamId::Attack => 10.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ParamId::Detune => "detune",
            ParamId::Volume => "volume",
            ParamId::Attack => "attack",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            ParamId::Detune => "st",
            ParamId::Volume => "",
            ParamId::Attack => "ms",
        }
    }

    /// Clamp `value` into this parameter's range.
    pub fn clamp(self, value: f32) -> f32 {
        self.range().clamp(value, self.default_value())
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a parameter name that does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownParam;

impl fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown parameter (expected detune, volume or attack)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownParam {}

impl FromStr for ParamId {
    type Err = UnknownParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownParam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_range() {
        for id in ParamId::ALL {
            assert!(id.range().contains(id.default_value()), "{id}");
        }
    }

    #[test]
    fn indices_match_storage_order() {
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn clamp_limits_to_range() {
        assert_eq!(ParamId::Volume.clamp(1.5), 1.0);
        assert_eq!(ParamId::Volume.clamp(-0.1), 0.0);
        assert_eq!(ParamId::Detune.clamp(-30.0), -24.0);
        assert_eq!(ParamId::Attack.clamp(0.0), 1.0);
        assert_eq!(ParamId::Attack.clamp(150.0), 150.0);
    }

    #[test]
    fn clamp_replaces_nan_with_default() {
        assert_eq!(ParamId::Volume.clamp(f32::NAN), 0.5);
    }

    #[test]
    fn clamp_infinities_to_bounds() {
        assert_eq!(ParamId::Detune.clamp(f32::INFINITY), 24.0);
        assert_eq!(ParamId::Detune.clamp(f32::NEG_INFINITY), -24.0);
    }

    #[test]
    fn parse_names_case_insensitively() {
        assert_eq!("Volume".parse::<ParamId>(), Ok(ParamId::Volume));
        assert_eq!("detune".parse::<ParamId>(), Ok(ParamId::Detune));
        assert_eq!("ATTACK".parse::<ParamId>(), Ok(ParamId::Attack));
        assert_eq!("cutoff".parse::<ParamId>(), Err(UnknownParam));
    }
}
