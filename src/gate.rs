/// Input-acceptance gate consulted before a drag or click is honored.
///
/// `Loading` covers the window before a page's media is ready; `Disabled`
/// covers scripted segments during which the mini-games refuse input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Active,
    Disabled,
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionGate {
    state: GateState,
}

impl InteractionGate {
    pub fn new(state: GateState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn set(&mut self, state: GateState) {
        self.state = state;
    }

    /// Only an `Active` gate accepts input.
    pub fn accepts(&self) -> bool {
        matches!(self.state, GateState::Active)
    }
}

impl Default for InteractionGate {
    fn default() -> Self {
        Self::new(GateState::Loading)
    }
}
