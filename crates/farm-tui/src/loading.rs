//! Loading gate: skeleton state until the first poll response.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
}

/// One-way `Loading → Loaded` latch, re-armed only by an explicit `reset`.
#[derive(Debug, Default)]
pub struct LoadingGate {
    state: LoadState,
}

impl LoadingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on every poll completion, success or failure.
    /// Returns `true` only on the transition.
    pub fn mark_loaded(&mut self) -> bool {
        let changed = self.state == LoadState::Loading;
        self.state = LoadState::Loaded;
        changed
    }

    pub fn reset(&mut self) {
        self.state = LoadState::Loading;
    }

    #[cfg(test)]
    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}
