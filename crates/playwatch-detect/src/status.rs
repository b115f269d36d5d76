use serde::{Deserialize, Serialize};

/// Playback state code as reported by the player's web interface.
///
/// The code is passed through verbatim; the constants only name the values
/// the MPC family is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayState(pub i64);

impl PlayState {
    pub const STOPPED: PlayState = PlayState(0);
    pub const PAUSED: PlayState = PlayState(1);
    pub const PLAYING: PlayState = PlayState(2);

    pub fn code(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::STOPPED => write!(f, "stopped"),
            Self::PAUSED => write!(f, "paused"),
            Self::PLAYING => write!(f, "playing"),
            PlayState(other) => write!(f, "unknown ({other})"),
        }
    }
}

/// What the player reports about the currently loaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub state: PlayState,
    /// Position in seconds.
    pub position: f64,
    /// Duration in seconds.
    pub duration: f64,
    pub file_path: String,
}

/// Normalized status for one poll tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusRecord {
    /// Nothing loaded, or the player's page is not populated yet.
    #[default]
    Empty,
    Loaded(Playback),
}

impl StatusRecord {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn playback(&self) -> Option<&Playback> {
        match self {
            Self::Empty => None,
            Self::Loaded(p) => Some(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(StatusRecord::default().is_empty());
        assert!(StatusRecord::default().playback().is_none());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PlayState::PLAYING.to_string(), "playing");
        assert_eq!(PlayState(7).to_string(), "unknown (7)");
    }
}
