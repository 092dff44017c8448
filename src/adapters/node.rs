//! Node adapter: bundles the concrete peripherals behind the port traits.
//!
//! [`CounterService::dispatch`](crate::app::service::CounterService::dispatch)
//! takes one value implementing every hardware port; this struct is that
//! value.  Each port call is forwarded to the owning component.

use crate::app::ports::{IndicatorPort, InputPort, OutboundFrame, RadioError, RadioPort};
use crate::app::sampler::LineState;

/// Input lines + radio + activity indicator.
pub struct NodeHardware<I, R, L> {
    pub input: I,
    pub radio: R,
    pub indicator: L,
}

impl<I, R, L> NodeHardware<I, R, L> {
    pub fn new(input: I, radio: R, indicator: L) -> Self {
        Self {
            input,
            radio,
            indicator,
        }
    }
}

impl<I: InputPort, R, L> InputPort for NodeHardware<I, R, L> {
    fn read_lines(&mut self) -> LineState {
        self.input.read_lines()
    }
}

impl<I, R: RadioPort, L> RadioPort for NodeHardware<I, R, L> {
    fn broadcast(&mut self, frame: &OutboundFrame) -> Result<(), RadioError> {
        self.radio.broadcast(frame)
    }
}

impl<I, R, L: IndicatorPort> IndicatorPort for NodeHardware<I, R, L> {
    fn set_active(&mut self, on: bool) {
        self.indicator.set_active(on);
    }
}
