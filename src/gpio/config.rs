use crate::map::port::{InputSense, OutputConfig};
use core::ops::{BitOr, BitOrAssign};

/// Contents of a PINnCTRL register.
///
/// Flags of the different groups combine with `|`; within one group (input
/// sense, output mode) only one flag should be used.
///
/// ```
/// use xmega_core::gpio::PinConfig;
///
/// let config = PinConfig::PULLUP | PinConfig::FALLING | PinConfig::INVERT;
/// assert_eq!(config.bits(), 0b0101_1010);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig(u8);

impl PinConfig {
    /// Sense both edges.
    pub const BOTH_EDGES: Self = Self::sense(InputSense::BothEdges);
    /// Sense rising edges.
    pub const RISING: Self = Self::sense(InputSense::Rising);
    /// Sense falling edges.
    pub const FALLING: Self = Self::sense(InputSense::Falling);
    /// Sense low level.
    pub const LEVEL_LOW: Self = Self::sense(InputSense::Level);
    /// Digital input buffer disabled, for analog inputs.
    pub const INPUT_DISABLE: Self = Self::sense(InputSense::InputDisable);

    /// Push-pull output, floating input.
    pub const TOTEM: Self = Self::output(OutputConfig::Totem);
    /// Push-pull output, input keeps the last level.
    pub const BUSKEEPER: Self = Self::output(OutputConfig::BusKeeper);
    /// Push-pull output, pull-down on input.
    pub const PULLDOWN: Self = Self::output(OutputConfig::PullDown);
    /// Push-pull output, pull-up on input.
    pub const PULLUP: Self = Self::output(OutputConfig::PullUp);
    /// Output driven high only.
    pub const WIRED_OR: Self = Self::output(OutputConfig::WiredOr);
    /// Output driven low only.
    pub const WIRED_AND: Self = Self::output(OutputConfig::WiredAnd);
    /// Output driven high only, pull-down on input.
    pub const WIRED_OR_PULL: Self = Self::output(OutputConfig::WiredOrPull);
    /// Output driven low only, pull-up on input.
    pub const WIRED_AND_PULL: Self = Self::output(OutputConfig::WiredAndPull);

    /// Inverted input and output.
    pub const INVERT: Self = Self(1 << 6);
    /// Slew rate limiting.
    pub const SLEW_RATE_LIMIT: Self = Self(1 << 7);

    /// Input sense flag.
    #[inline]
    pub const fn sense(sense: InputSense) -> Self {
        Self(sense as u8)
    }

    /// Output and pull flag.
    #[inline]
    pub const fn output(config: OutputConfig) -> Self {
        Self((config as u8) << 3)
    }

    /// Wraps a raw register value.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw register value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns the input sense configuration, or `None` for a reserved
    /// encoding.
    #[inline]
    pub const fn input_sense(self) -> Option<InputSense> {
        match self.0 & 0x07 {
            0 => Some(InputSense::BothEdges),
            1 => Some(InputSense::Rising),
            2 => Some(InputSense::Falling),
            3 => Some(InputSense::Level),
            7 => Some(InputSense::InputDisable),
            _ => None,
        }
    }

    /// Returns the output and pull configuration.
    #[inline]
    pub const fn output_config(self) -> OutputConfig {
        match (self.0 >> 3) & 0x07 {
            0 => OutputConfig::Totem,
            1 => OutputConfig::BusKeeper,
            2 => OutputConfig::PullDown,
            3 => OutputConfig::PullUp,
            4 => OutputConfig::WiredOr,
            5 => OutputConfig::WiredAnd,
            6 => OutputConfig::WiredOrPull,
            _ => OutputConfig::WiredAndPull,
        }
    }

    /// Returns `true` if the pin is inverted.
    #[inline]
    pub const fn is_inverted(self) -> bool {
        self.0 & Self::INVERT.0 != 0
    }

    /// Returns `true` if slew rate limiting is on.
    #[inline]
    pub const fn is_slew_rate_limited(self) -> bool {
        self.0 & Self::SLEW_RATE_LIMIT.0 != 0
    }
}

impl BitOr for PinConfig {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PinConfig {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Initial state of a pin, applied by drivers in their `init`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Leave the pin as it is.
    #[default]
    NoInit,
    /// Unused pin, parked with its pull-up enabled.
    Unused,
    /// Push-pull output driven low.
    OutputLow,
    /// Push-pull output driven high.
    OutputHigh,
    /// Input without pull.
    InputFloating,
    /// Input with bus-keeper.
    InputBusKeeper,
    /// Input with pull-up.
    InputPullUp,
    /// Input with pull-down.
    InputPullDown,
    /// Analog input, digital input buffer disabled.
    Analog,
}
