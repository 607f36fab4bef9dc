// Service-layer error taxonomy and its HTTP mapping
use axum::http::StatusCode;
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

/// Every failure a service operation can report. Variants other than
/// `Database` and `Auth` are domain outcomes the caller is allowed to see.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid format")]
    InvalidFormat,

    #[error("account already exist")]
    AccountExist,

    #[error("account not registered")]
    AccountNotRegistered,

    #[error("invalid password")]
    InvalidPassword,

    #[error("username cannot be empty")]
    UsernameCannotBeEmpty,

    #[error("password cannot be empty")]
    PasswordCannotBeEmpty,

    #[error("username already exist")]
    UsernameAlreadyExist,

    #[error("email already exist")]
    EmailAlreadyExist,

    #[error("ktp number already exist")]
    KtpNumberAlreadyExist,

    #[error("phone number already exist")]
    PhoneNumberAlreadyExist,

    #[error("invalid dob format")]
    InvalidDobFormat,

    #[error("location not found")]
    LocationNotFound,

    #[error("location already exist")]
    LocationAlreadyExist,

    #[error("already checked in")]
    AlreadyCheckedIn,

    #[error("not checked in")]
    NotCheckedIn,

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Status and detail key a known service error is reported under. The detail
/// value is the error's display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub key: &'static str,
}

impl Rejection {
    const fn bad_request(key: &'static str) -> Self {
        Self { status: StatusCode::BAD_REQUEST, key }
    }
}

impl ServiceError {
    /// `None` means the error is internal and must surface as a 500.
    pub fn rejection(&self) -> Option<Rejection> {
        use ServiceError::*;

        match self {
            AccountExist => Some(Rejection { status: StatusCode::CONFLICT, key: "account" }),
            InvalidFormat => Some(Rejection::bad_request("body")),
            AccountNotRegistered
            | InvalidPassword
            | UsernameCannotBeEmpty
            | PasswordCannotBeEmpty
            | UsernameAlreadyExist
            | EmailAlreadyExist
            | KtpNumberAlreadyExist
            | PhoneNumberAlreadyExist
            | InvalidDobFormat => Some(Rejection::bad_request("accounts")),
            LocationNotFound | LocationAlreadyExist => Some(Rejection::bad_request("locations")),
            AlreadyCheckedIn | NotCheckedIn => Some(Rejection::bad_request("attendance")),
            Database(_) | Auth(_) => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
