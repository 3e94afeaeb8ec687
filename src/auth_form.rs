//! Login / Sign-up flow
//!
//! Form state for the auth screen and the calls behind it. A successful
//! login stores the token in the session; sign-up only reports back.

use log::{info, warn};

use crate::api::AuthClient;
use crate::error::ApiError;
use crate::models::{Credentials, Registration};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

/// Message shown under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthForm {
    pub tab: AuthTab,
    pub login: Credentials,
    pub signup: Registration,
    submitting: bool,
    notice: Option<Notice>,
}

impl AuthForm {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn switch_tab(&mut self, tab: AuthTab) {
        if self.tab != tab {
            self.tab = tab;
            self.notice = None;
        }
    }

    /// Claim the form for one request; false while one is in flight or
    /// required fields are blank.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        let (email, password) = match self.tab {
            AuthTab::Login => (&self.login.email, &self.login.password),
            AuthTab::Signup => (&self.signup.email, &self.signup.password),
        };
        if email.trim().is_empty() || password.is_empty() {
            self.notice = Some(Notice::Error("Email and password are required".to_string()));
            return false;
        }
        self.submitting = true;
        self.notice = None;
        true
    }

    pub fn finish_login(&mut self, result: &Result<(), ApiError>) {
        self.submitting = false;
        self.notice = Some(match result {
            Ok(()) => {
                self.login.password.clear();
                Notice::Success("Logged in".to_string())
            }
            Err(e) if e.is_unauthorized() => Notice::Error("Invalid email or password".to_string()),
            Err(e) => Notice::Error(format!("Login failed: {}", e)),
        });
    }

    /// A successful sign-up moves the user to the login tab with the email
    /// filled in.
    pub fn finish_signup(&mut self, result: &Result<(), ApiError>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.login.email = self.signup.email.clone();
                self.signup = Registration::default();
                self.tab = AuthTab::Login;
                self.notice = Some(Notice::Success("Account created, please log in".to_string()));
            }
            Err(e) => {
                self.notice = Some(Notice::Error(format!("Sign-up failed: {}", e)));
            }
        }
    }
}

/// `auth/login`, then keep the token
pub async fn login(auth: &AuthClient, session: &Session, credentials: &Credentials) -> Result<(), ApiError> {
    match auth.login(credentials).await {
        Ok(data) => {
            session.set(&data.token);
            info!("[AUTH] Logged in as {}", credentials.email);
            Ok(())
        }
        Err(e) => {
            warn!("[AUTH] Login failed for {}: {}", credentials.email, e);
            Err(e)
        }
    }
}

pub async fn register(auth: &AuthClient, registration: &Registration) -> Result<(), ApiError> {
    auth.register(registration).await.map(|_| ())
}

pub fn logout(session: &Session) {
    session.clear();
    info!("[AUTH] Logged out");
}
