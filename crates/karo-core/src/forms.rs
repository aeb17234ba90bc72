use crate::backend::AuthService;
use crate::routes::{Navigator, Route};
use tracing::{info, warn};

pub const ACCOUNT_EXISTS: &str = "User with this email already exists.";
pub const CONFIRMATION_SENT: &str = "Check your email for the confirmation link!";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// Signs in and moves to the task grid; on failure keeps the backend's
    /// message in `error`. Returns whether the sign-in succeeded.
    pub async fn submit<A>(&mut self, auth: &A, navigator: &dyn Navigator) -> bool
    where
        A: AuthService + ?Sized,
    {
        self.error = None;
        match auth.sign_in_with_password(&self.email, &self.password).await {
            Ok(session) => {
                info!(user = %session.user.id, "signed in");
                navigator.navigate(Route::Tasks);
                true
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                self.error = Some(err.to_string());
                false
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl SignupForm {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            error: None,
            message: None,
        }
    }

    /// Registers the account. A confirmation message clears the form.
    pub async fn submit<A>(&mut self, auth: &A)
    where
        A: AuthService + ?Sized,
    {
        self.error = None;
        self.message = None;

        let response = match auth.sign_up(&self.email, &self.password, &self.username).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "sign-up failed");
                self.error = Some(err.to_string());
                return;
            }
        };

        let Some(user) = response.user else {
            return;
        };
        if user.identities.as_ref().is_some_and(|ids| ids.is_empty()) {
            self.error = Some(ACCOUNT_EXISTS.to_string());
        } else {
            info!(user = %user.id, "account created");
            self.message = Some(CONFIRMATION_SENT.to_string());
            self.username.clear();
            self.email.clear();
            self.password.clear();
        }
    }
}
