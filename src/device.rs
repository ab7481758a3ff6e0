//! Peripheral instances of the selected device variant.
//!
//! The variant is picked with a Cargo feature. Each instance is a type alias
//! binding a register block from [`map`](crate::map) to its base address, and
//! a field of [`Peripherals`].

use crate::{
    map::{adc::Adc, clk::Clk, osc::Osc, port::Port, spi::Spi, twi::Twi, usart::Usart},
    token::Token,
};
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(any(
    all(feature = "atxmega256a3u", feature = "atxmega128a4u"),
    all(feature = "atxmega256a3u", feature = "atxmega128a1u"),
    all(feature = "atxmega128a4u", feature = "atxmega128a1u"),
))]
compile_error!("only one device feature can be enabled; disable the default features first");

macro_rules! device {
    ($(
        $(#[$attr:meta])*
        $field:ident: $alias:ident = $block:ident @ $base:literal;
    )*) => {
        $(
            $(#[$attr])*
            pub type $alias = $block<$base>;
        )*

        /// All peripheral instances of the device.
        ///
        /// Obtained once with [`Peripherals::take`]; the fields are moved into
        /// drivers from there.
        pub struct Peripherals {
            $(
                $(#[$attr])*
                pub $field: $alias,
            )*
            _priv: (),
        }

        impl Peripherals {
            /// Creates every peripheral token without checking whether they
            /// were handed out before.
            ///
            /// # Safety
            ///
            /// No other instance of any of the tokens may exist.
            #[inline]
            pub unsafe fn steal() -> Self {
                Self {
                    $($field: unsafe { <$alias as Token>::take() },)*
                    _priv: (),
                }
            }
        }
    };
}

static TAKEN: AtomicBool = AtomicBool::new(false);

impl Peripherals {
    /// Returns all peripheral tokens on the first call and `None` afterwards.
    pub fn take() -> Option<Self> {
        critical_section::with(|_| {
            if TAKEN.load(Ordering::Relaxed) {
                None
            } else {
                TAKEN.store(true, Ordering::Relaxed);
                debug!("peripherals taken");
                Some(unsafe { Self::steal() })
            }
        })
    }
}

#[cfg(feature = "atxmega256a3u")]
device! {
    /// Clock system.
    clk: Clock = Clk @ 0x0040;
    /// Oscillators.
    osc: Oscillators = Osc @ 0x0050;
    /// Analog-to-digital converter A.
    adca: AdcA = Adc @ 0x0200;
    /// Analog-to-digital converter B.
    adcb: AdcB = Adc @ 0x0240;
    /// Two-wire interface C.
    twic: TwiC = Twi @ 0x0480;
    /// Two-wire interface E.
    twie: TwiE = Twi @ 0x04A0;
    /// Port A.
    porta: PortA = Port @ 0x0600;
    /// Port B.
    portb: PortB = Port @ 0x0620;
    /// Port C.
    portc: PortC = Port @ 0x0640;
    /// Port D.
    portd: PortD = Port @ 0x0660;
    /// Port E.
    porte: PortE = Port @ 0x0680;
    /// Port F.
    portf: PortF = Port @ 0x06A0;
    /// Port R.
    portr: PortR = Port @ 0x07E0;
    /// USART C0.
    usartc0: UsartC0 = Usart @ 0x08A0;
    /// USART C1.
    usartc1: UsartC1 = Usart @ 0x08B0;
    /// SPI C.
    spic: SpiC = Spi @ 0x08C0;
    /// USART D0.
    usartd0: UsartD0 = Usart @ 0x09A0;
    /// USART D1.
    usartd1: UsartD1 = Usart @ 0x09B0;
    /// SPI D.
    spid: SpiD = Spi @ 0x09C0;
    /// USART E0.
    usarte0: UsartE0 = Usart @ 0x0AA0;
    /// USART E1.
    usarte1: UsartE1 = Usart @ 0x0AB0;
    /// SPI E.
    spie: SpiE = Spi @ 0x0AC0;
    /// USART F0.
    usartf0: UsartF0 = Usart @ 0x0BA0;
}

#[cfg(feature = "atxmega128a4u")]
device! {
    /// Clock system.
    clk: Clock = Clk @ 0x0040;
    /// Oscillators.
    osc: Oscillators = Osc @ 0x0050;
    /// Analog-to-digital converter A.
    adca: AdcA = Adc @ 0x0200;
    /// Two-wire interface C.
    twic: TwiC = Twi @ 0x0480;
    /// Two-wire interface E.
    twie: TwiE = Twi @ 0x04A0;
    /// Port A.
    porta: PortA = Port @ 0x0600;
    /// Port B.
    portb: PortB = Port @ 0x0620;
    /// Port C.
    portc: PortC = Port @ 0x0640;
    /// Port D.
    portd: PortD = Port @ 0x0660;
    /// Port E.
    porte: PortE = Port @ 0x0680;
    /// Port R.
    portr: PortR = Port @ 0x07E0;
    /// USART C0.
    usartc0: UsartC0 = Usart @ 0x08A0;
    /// USART C1.
    usartc1: UsartC1 = Usart @ 0x08B0;
    /// SPI C.
    spic: SpiC = Spi @ 0x08C0;
    /// USART D0.
    usartd0: UsartD0 = Usart @ 0x09A0;
    /// USART D1.
    usartd1: UsartD1 = Usart @ 0x09B0;
    /// SPI D.
    spid: SpiD = Spi @ 0x09C0;
    /// USART E0.
    usarte0: UsartE0 = Usart @ 0x0AA0;
}

#[cfg(feature = "atxmega128a1u")]
device! {
    /// Clock system.
    clk: Clock = Clk @ 0x0040;
    /// Oscillators.
    osc: Oscillators = Osc @ 0x0050;
    /// Analog-to-digital converter A.
    adca: AdcA = Adc @ 0x0200;
    /// Analog-to-digital converter B.
    adcb: AdcB = Adc @ 0x0240;
    /// Two-wire interface C.
    twic: TwiC = Twi @ 0x0480;
    /// Two-wire interface D.
    twid: TwiD = Twi @ 0x0490;
    /// Two-wire interface E.
    twie: TwiE = Twi @ 0x04A0;
    /// Two-wire interface F.
    twif: TwiF = Twi @ 0x04B0;
    /// Port A.
    porta: PortA = Port @ 0x0600;
    /// Port B.
    portb: PortB = Port @ 0x0620;
    /// Port C.
    portc: PortC = Port @ 0x0640;
    /// Port D.
    portd: PortD = Port @ 0x0660;
    /// Port E.
    porte: PortE = Port @ 0x0680;
    /// Port F.
    portf: PortF = Port @ 0x06A0;
    /// Port H.
    porth: PortH = Port @ 0x06E0;
    /// Port J.
    portj: PortJ = Port @ 0x0700;
    /// Port K.
    portk: PortK = Port @ 0x0720;
    /// Port Q.
    portq: PortQ = Port @ 0x07C0;
    /// Port R.
    portr: PortR = Port @ 0x07E0;
    /// USART C0.
    usartc0: UsartC0 = Usart @ 0x08A0;
    /// USART C1.
    usartc1: UsartC1 = Usart @ 0x08B0;
    /// SPI C.
    spic: SpiC = Spi @ 0x08C0;
    /// USART D0.
    usartd0: UsartD0 = Usart @ 0x09A0;
    /// USART D1.
    usartd1: UsartD1 = Usart @ 0x09B0;
    /// SPI D.
    spid: SpiD = Spi @ 0x09C0;
    /// USART E0.
    usarte0: UsartE0 = Usart @ 0x0AA0;
    /// USART E1.
    usarte1: UsartE1 = Usart @ 0x0AB0;
    /// SPI E.
    spie: SpiE = Spi @ 0x0AC0;
    /// USART F0.
    usartf0: UsartF0 = Usart @ 0x0BA0;
    /// USART F1.
    usartf1: UsartF1 = Usart @ 0x0BB0;
    /// SPI F.
    spif: SpiF = Spi @ 0x0BC0;
}
