//! Admin gate guarding the full data wipe.
//!
//! The gate only tracks who may wipe; the wipe itself is performed by
//! [`Session::clear_all`](crate::session::Session::clear_all).

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Where the gate currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Password not yet entered.
    #[default]
    Locked,
    /// Password accepted.
    Unlocked,
    /// Password accepted and a wipe has been requested but not confirmed.
    ConfirmingClear,
}

/// Static shared-secret gate.
///
/// Only a digest of the secret is kept. There is no lockout after failed
/// attempts.
pub struct AdminGate {
    secret: blake3::Hash,
    state: GateState,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AdminGate {
    /// Create a locked gate for the given shared secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: blake3::hash(secret.as_bytes()),
            state: GateState::Locked,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether the password has been accepted.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state != GateState::Locked
    }

    /// Try to unlock with a password.
    ///
    /// Logging in while already unlocked keeps the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdminAuth`] if the password is wrong; the state is
    /// left unchanged.
    pub fn login(&mut self, password: &str) -> Result<()> {
        // blake3::Hash equality is constant-time
        if blake3::hash(password.as_bytes()) != self.secret {
            warn!("Rejected admin login");
            return Err(Error::AdminAuth);
        }
        if self.state == GateState::Locked {
            self.state = GateState::Unlocked;
        }
        debug!("Admin unlocked");
        Ok(())
    }

    /// Ask to wipe all data. Needs an unlocked gate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdminState`] when locked.
    pub fn request_clear(&mut self) -> Result<()> {
        match self.state {
            GateState::Locked => Err(Error::admin_state("admin login required")),
            GateState::Unlocked | GateState::ConfirmingClear => {
                self.state = GateState::ConfirmingClear;
                Ok(())
            }
        }
    }

    /// Back out of a pending wipe.
    pub fn cancel_clear(&mut self) {
        if self.state == GateState::ConfirmingClear {
            self.state = GateState::Unlocked;
        }
    }

    /// Consume a confirmed wipe request, relocking the gate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdminState`] unless a wipe was requested.
    pub(crate) fn take_clear(&mut self) -> Result<()> {
        if self.state != GateState::ConfirmingClear {
            return Err(Error::admin_state("clear was not requested"));
        }
        self.state = GateState::Locked;
        Ok(())
    }

    /// Leave the admin panel.
    pub fn logout(&mut self) {
        self.state = GateState::Locked;
    }

    /// Close the admin panel without logging out explicitly.
    ///
    /// Same effect as [`logout`](Self::logout): any pending confirmation is
    /// discarded.
    pub fn dismiss(&mut self) {
        self.logout();
    }
}
