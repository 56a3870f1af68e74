//! Pipeline session state machine

use std::fmt;
use thiserror::Error;

/// States of one audio pipeline (capture or playback)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Running,
    Closing,
}

impl PipelineState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: PipelineState,
    pub action: &'static str,
}

/// Pipeline session entity.
/// RUNNING is the only state in which a worker thread executes; CLOSING
/// covers device release and worker join.
///
/// State machine:
///   IDLE -> RUNNING (start)
///   RUNNING -> CLOSING (request_stop; covers both a stop signal and
///                       natural end-of-stream)
///   CLOSING -> IDLE (finish)
#[derive(Debug, Default)]
pub struct PipelineSession {
    state: PipelineState,
}

impl PipelineSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: PipelineState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == PipelineState::Idle
    }

    /// Check if currently running
    pub fn is_running(&self) -> bool {
        self.state == PipelineState::Running
    }

    /// Transition from IDLE to RUNNING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != PipelineState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start",
            });
        }
        self.state = PipelineState::Running;
        Ok(())
    }

    /// Transition from RUNNING to CLOSING
    pub fn request_stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != PipelineState::Running {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "stop",
            });
        }
        self.state = PipelineState::Closing;
        Ok(())
    }

    /// Transition from CLOSING to IDLE
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != PipelineState::Closing {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "finish",
            });
        }
        self.state = PipelineState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = PipelineSession::new();
        assert!(session.is_idle());
        assert!(!session.is_running());
    }

    #[test]
    fn start_from_idle() {
        let mut session = PipelineSession::new();
        assert!(session.start().is_ok());
        assert!(session.is_running());
    }

    #[test]
    fn start_from_running_fails() {
        let mut session = PipelineSession::new();
        session.start().unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, PipelineState::Running);
        assert_eq!(err.action, "start");
    }

    #[test]
    fn start_from_closing_fails() {
        let mut session = PipelineSession::new();
        session.start().unwrap();
        session.request_stop().unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, PipelineState::Closing);
    }

    #[test]
    fn stop_from_running() {
        let mut session = PipelineSession::new();
        session.start().unwrap();

        assert!(session.request_stop().is_ok());
        assert_eq!(session.state(), PipelineState::Closing);
    }

    #[test]
    fn stop_from_idle_fails() {
        let mut session = PipelineSession::new();

        let err = session.request_stop().unwrap_err();
        assert_eq!(err.current_state, PipelineState::Idle);
    }

    #[test]
    fn finish_from_closing() {
        let mut session = PipelineSession::new();
        session.start().unwrap();
        session.request_stop().unwrap();

        assert!(session.finish().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn finish_from_running_fails() {
        let mut session = PipelineSession::new();
        session.start().unwrap();

        let err = session.finish().unwrap_err();
        assert_eq!(err.current_state, PipelineState::Running);
    }

    #[test]
    fn full_cycle() {
        let mut session = PipelineSession::new();
        assert!(session.is_idle());

        session.start().unwrap();
        assert!(session.is_running());

        session.request_stop().unwrap();
        session.finish().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.start().unwrap();
        assert!(session.is_running());
    }

    #[test]
    fn state_display() {
        assert_eq!(PipelineState::Idle.to_string(), "idle");
        assert_eq!(PipelineState::Running.to_string(), "running");
        assert_eq!(PipelineState::Closing.to_string(), "closing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: PipelineState::Running,
            action: "start",
        };
        let msg = err.to_string();
        assert!(msg.contains("start"));
        assert!(msg.contains("running"));
    }
}
