use crate::backend::AuthService;
use crate::models::Session;
use crate::routes::{Navigator, Route};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthStateChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// Receiving end of session-change notifications. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<AuthStateChange>,
}

impl Subscription {
    /// Next change, or `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<AuthStateChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}

/// Holds the current session and fans out every change to subscribers.
#[derive(Debug)]
pub struct SessionHub {
    current: RwLock<Option<Session>>,
    sender: broadcast::Sender<AuthStateChange>,
}

impl SessionHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(None),
            sender,
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replaces the session and notifies subscribers.
    pub fn publish(&self, event: AuthEvent, session: Option<Session>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = session.clone();
        debug!(?event, signed_in = session.is_some(), "auth state changed");
        // No subscribers is not an error.
        let _ = self.sender.send(AuthStateChange { event, session });
    }

    /// Restores a session without notifying anyone.
    pub fn restore(&self, session: Session) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a view behind an active session for as long as it is alive.
///
/// Activation checks the session once and redirects to the login view if
/// there is none; afterwards every change reporting no session redirects
/// again. Dropping the guard stops listening.
#[derive(Debug)]
pub struct SessionGuard {
    listener: JoinHandle<()>,
    had_session: bool,
}

impl SessionGuard {
    pub async fn activate<A>(auth: &A, navigator: Arc<dyn Navigator>) -> Self
    where
        A: AuthService + ?Sized,
    {
        // Subscribe before checking so a change in between is not missed.
        let mut subscription = auth.on_auth_state_change();

        let had_session = match auth.get_session().await {
            Ok(session) => session.is_some(),
            Err(err) => {
                warn!(error = %err, "session check failed");
                false
            }
        };
        if !had_session {
            debug!("no active session, redirecting to login");
            navigator.navigate(Route::Login);
        }

        let listener = tokio::spawn(async move {
            while let Some(change) = subscription.recv().await {
                if change.session.is_none() {
                    debug!(event = ?change.event, "session ended, redirecting to login");
                    navigator.navigate(Route::Login);
                }
            }
        });

        Self {
            listener,
            had_session,
        }
    }

    /// Whether a session was active when the guard was activated.
    pub fn had_session(&self) -> bool {
        self.had_session
    }

    pub fn teardown(self) {}
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
