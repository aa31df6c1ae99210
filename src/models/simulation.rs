use serde::{Deserialize, Serialize};

/// The single global simulation clock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub current_hour: u32,
    pub is_playing: bool,
    /// Last schedule hour whose step has been written. `None` right after a reset.
    pub last_applied_hour: Option<u32>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            current_hour: 0,
            is_playing: false,
            last_applied_hour: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationStateUpdate {
    pub current_hour: Option<u32>,
    pub is_playing: Option<bool>,
    pub last_applied_hour: Option<Option<u32>>,
}

impl SimulationStateUpdate {
    pub fn apply(&self, state: &mut SimulationState) {
        if let Some(hour) = self.current_hour {
            state.current_hour = hour;
        }
        if let Some(playing) = self.is_playing {
            state.is_playing = playing;
        }
        if let Some(last) = self.last_applied_hour {
            state.last_applied_hour = last;
        }
    }
}
