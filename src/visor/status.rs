//! Transaction status
//!
//! A status is an immutable snapshot of where a transaction stands, built
//! fresh on every query. It serializes to the flag object
//! `{unconfirmed, unknown, confirmed, height}` with exactly one flag set.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use thiserror::Error;

use super::ReadableTransaction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("Invalid confirmed transaction height")]
    InvalidConfirmedHeight,
    #[error("Exactly one of unconfirmed, unknown, confirmed must be set")]
    AmbiguousFlags,
    #[error("Height is only meaningful for confirmed transactions")]
    UnexpectedHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StatusFlags", try_from = "StatusFlags")]
pub enum TransactionStatus {
    /// In the unconfirmed pool
    Unconfirmed,
    /// Nothing is known about this transaction. It may still sit in another
    /// node's unconfirmed pool and become confirmed later.
    Unknown,
    /// In a block; `height` counts that block and every block above it
    Confirmed { height: NonZeroU64 },
}

impl TransactionStatus {
    pub fn unconfirmed() -> Self {
        TransactionStatus::Unconfirmed
    }

    pub fn unknown() -> Self {
        TransactionStatus::Unknown
    }

    /// Confirmed status; a height of 0 is rejected
    pub fn confirmed(height: u64) -> Result<Self, StatusError> {
        NonZeroU64::new(height)
            .map(|height| TransactionStatus::Confirmed { height })
            .ok_or(StatusError::InvalidConfirmedHeight)
    }

    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, TransactionStatus::Unconfirmed)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TransactionStatus::Unknown)
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, TransactionStatus::Confirmed { .. })
    }

    /// Confirmation depth, 0 unless confirmed
    pub fn height(&self) -> u64 {
        match self {
            TransactionStatus::Confirmed { height } => height.get(),
            _ => 0,
        }
    }
}

/// Wire form of [`TransactionStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub unconfirmed: bool,
    pub unknown: bool,
    pub confirmed: bool,
    pub height: u64,
}

impl From<TransactionStatus> for StatusFlags {
    fn from(status: TransactionStatus) -> Self {
        Self {
            unconfirmed: status.is_unconfirmed(),
            unknown: status.is_unknown(),
            confirmed: status.is_confirmed(),
            height: status.height(),
        }
    }
}

impl TryFrom<StatusFlags> for TransactionStatus {
    type Error = StatusError;

    fn try_from(flags: StatusFlags) -> Result<Self, Self::Error> {
        match (flags.unconfirmed, flags.unknown, flags.confirmed) {
            (false, false, true) => TransactionStatus::confirmed(flags.height),
            (true, false, false) | (false, true, false) if flags.height != 0 => {
                Err(StatusError::UnexpectedHeight)
            }
            (true, false, false) => Ok(TransactionStatus::Unconfirmed),
            (false, true, false) => Ok(TransactionStatus::Unknown),
            _ => Err(StatusError::AmbiguousFlags),
        }
    }
}

/// A transaction tagged with its status, so unconfirmed transactions can be
/// reported alongside confirmed ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWithStatus {
    pub txn: ReadableTransaction,
    pub status: TransactionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfirmed_flags() {
        let status = TransactionStatus::unconfirmed();
        assert!(status.is_unconfirmed());
        assert!(!status.is_unknown() && !status.is_confirmed());
        assert_eq!(status.height(), 0);
    }

    #[test]
    fn test_unknown_flags() {
        let status = TransactionStatus::unknown();
        assert!(status.is_unknown());
        assert!(!status.is_unconfirmed() && !status.is_confirmed());
        assert_eq!(status.height(), 0);
    }

    #[test]
    fn test_confirmed_height() {
        let status = TransactionStatus::confirmed(3).unwrap();
        assert!(status.is_confirmed());
        assert!(!status.is_unconfirmed() && !status.is_unknown());
        assert_eq!(status.height(), 3);
    }

    #[test]
    fn test_confirmed_zero_rejected() {
        assert_eq!(
            TransactionStatus::confirmed(0),
            Err(StatusError::InvalidConfirmedHeight)
        );
    }

    #[test]
    fn test_serializes_as_flags() {
        let json = serde_json::to_value(TransactionStatus::confirmed(7).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"unconfirmed": false, "unknown": false, "confirmed": true, "height": 7})
        );

        let json = serde_json::to_value(TransactionStatus::unknown()).unwrap();
        assert_eq!(json["unknown"], true);
        assert_eq!(json["height"], 0);
    }

    #[test]
    fn test_deserialize_validates_flags() {
        let parse = |s: &str| serde_json::from_str::<TransactionStatus>(s);

        assert_eq!(
            parse(r#"{"unconfirmed":true,"unknown":false,"confirmed":false,"height":0}"#).unwrap(),
            TransactionStatus::Unconfirmed
        );
        assert!(parse(r#"{"unconfirmed":false,"unknown":false,"confirmed":true,"height":0}"#).is_err());
        assert!(parse(r#"{"unconfirmed":true,"unknown":false,"confirmed":true,"height":2}"#).is_err());
        assert!(parse(r#"{"unconfirmed":false,"unknown":false,"confirmed":false,"height":0}"#).is_err());
        assert!(parse(r#"{"unconfirmed":false,"unknown":true,"confirmed":false,"height":4}"#).is_err());
    }
}
