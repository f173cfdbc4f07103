//! LED bank adapter — bridges the indicator pins to [`OutputPort`].
//!
//! Owns the three [`IndicatorLed`] drivers and maps logical channels to
//! them. This is the only module that knows which physical LED belongs
//! to which channel. Pin write failures cannot stop the session loop —
//! they are logged and swallowed, matching the port's infallible
//! contract.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::OutputPort;
use crate::drivers::indicator_led::IndicatorLed;
use crate::indicator::Channel;

/// Concrete adapter over the three indicator LEDs.
pub struct LedBankAdapter<R, B, G>
where
    R: OutputPin,
    B: OutputPin,
    G: OutputPin,
{
    red: IndicatorLed<R>,
    blue: IndicatorLed<B>,
    green: IndicatorLed<G>,
}

impl<R, B, G> LedBankAdapter<R, B, G>
where
    R: OutputPin,
    B: OutputPin,
    G: OutputPin,
{
    pub fn new(red: IndicatorLed<R>, blue: IndicatorLed<B>, green: IndicatorLed<G>) -> Self {
        Self { red, blue, green }
    }

    fn drive(&mut self, channel: Channel, asserted: bool) {
        let result = match channel {
            Channel::Red => self.red.set_lit(asserted).map_err(|_| ()),
            Channel::Blue => self.blue.set_lit(asserted).map_err(|_| ()),
            Channel::Green => self.green.set_lit(asserted).map_err(|_| ()),
        };
        if result.is_err() {
            warn!("LED bank: pin write failed on {:?} channel", channel);
        }
    }
}

impl<R, B, G> OutputPort for LedBankAdapter<R, B, G>
where
    R: OutputPin,
    B: OutputPin,
    G: OutputPin,
{
    fn set_channel(&mut self, channel: Channel, asserted: bool) {
        self.drive(channel, asserted);
    }

    fn all_off(&mut self) {
        for channel in Channel::ALL {
            self.drive(channel, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    fn make_bank() -> LedBankAdapter<MockPin, MockPin, MockPin> {
        LedBankAdapter::new(
            IndicatorLed::new(MockPin::default()).unwrap(),
            IndicatorLed::new(MockPin::default()).unwrap(),
            IndicatorLed::new(MockPin::default()).unwrap(),
        )
    }

    #[test]
    fn channels_map_to_their_leds() {
        let mut bank = make_bank();
        bank.set_channel(Channel::Green, true);
        assert!(!bank.red.is_lit());
        assert!(!bank.blue.is_lit());
        assert!(bank.green.is_lit());
    }

    #[test]
    fn all_off_extinguishes_everything() {
        let mut bank = make_bank();
        bank.set_channel(Channel::Red, true);
        bank.set_channel(Channel::Blue, true);
        bank.all_off();
        assert!(!bank.red.is_lit());
        assert!(!bank.blue.is_lit());
        assert!(!bank.green.is_lit());
    }
}
