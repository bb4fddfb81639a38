//! Administrator identity verification.
//!
//! # Responsibility
//! - Define a pluggable `IdentityVerifier` capability.
//! - Track whether an admin session is active for the mutation surface.
//!
//! # Invariants
//! - Aggregation and views never consult identity.
//! - After `MAX_FAILED_ATTEMPTS` consecutive failures, logins are refused
//!   until a reset.
//! - Passwords are never logged.

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_FAILED_ATTEMPTS: u32 = 5;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Email/password pair submitted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proof of a successful admin login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub email: String,
}

/// Identity-provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    TooManyRequests,
    NotConfigured,
}

impl AuthError {
    /// Message suitable for showing to the person logging in.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::UserNotFound => "User not found. Please check your email.",
            Self::WrongPassword => "Incorrect password. Please try again.",
            Self::InvalidEmail => "Invalid email format.",
            Self::TooManyRequests => "Too many failed attempts. Please try again later.",
            Self::NotConfigured => "Admin authentication is not configured.",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::WrongPassword => "wrong_password",
            Self::InvalidEmail => "invalid_email",
            Self::TooManyRequests => "too_many_requests",
            Self::NotConfigured => "not_configured",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl Error for AuthError {}

/// Capability that decides whether credentials identify the administrator.
pub trait IdentityVerifier {
    fn verify(&self, credentials: &Credentials) -> Result<AdminSession, AuthError>;
}

/// Verifier accepting exactly one configured email/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticAdminIdentity {
    email: String,
    password: String,
}

impl StaticAdminIdentity {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for StaticAdminIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticAdminIdentity")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl IdentityVerifier for StaticAdminIdentity {
    fn verify(&self, credentials: &Credentials) -> Result<AdminSession, AuthError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::NotConfigured);
        }
        let email = credentials.email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(AuthError::InvalidEmail);
        }
        if !email.eq_ignore_ascii_case(self.email.trim()) {
            return Err(AuthError::UserNotFound);
        }
        if credentials.password != self.password {
            return Err(AuthError::WrongPassword);
        }
        Ok(AdminSession {
            email: self.email.trim().to_string(),
        })
    }
}

/// Session holder consulted by the admin host before mutations.
pub struct AdminGate<V: IdentityVerifier> {
    verifier: V,
    session: Option<AdminSession>,
    failed_attempts: u32,
}

impl<V: IdentityVerifier> AdminGate<V> {
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            session: None,
            failed_attempts: 0,
        }
    }

    /// Attempts a login, replacing any existing session on success.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&AdminSession, AuthError> {
        if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            warn!("event=admin_login module=auth status=error error_code=too_many_requests");
            return Err(AuthError::TooManyRequests);
        }

        match self.verifier.verify(credentials) {
            Ok(session) => {
                info!("event=admin_login module=auth status=ok");
                self.failed_attempts = 0;
                Ok(self.session.insert(session))
            }
            Err(err) => {
                self.failed_attempts += 1;
                warn!(
                    "event=admin_login module=auth status=error error_code={} failed_attempts={}",
                    err.code(),
                    self.failed_attempts
                );
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("event=admin_logout module=auth status=ok");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_session(&self) -> Option<&AdminSession> {
        self.session.as_ref()
    }

    /// Clears the failed-attempt lockout.
    pub fn reset_attempts(&mut self) {
        self.failed_attempts = 0;
    }
}
