use crate::client::TransportError;
use strum_macros::Display;

/// The user operation a remote failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    CreateUser,
    UpdateUser,
    GetUser,
    GetUsers,
}

#[derive(Debug, thiserror::Error)]
pub enum UserManagerError {
    #[error("{0}")]
    OutOfRange(String),
    #[error("User id must not be empty")]
    EmptyIdentifier,
    #[error("Nickname must not be empty")]
    EmptyNickname,
    #[error("Response did not contain a user id")]
    NotFoundIdentifier,
    #[error("{operation} failed for {target}: {source}")]
    RemoteCallFailed {
        operation: Operation,
        target: String,
        #[source]
        source: TransportError,
    },
    #[error("Every user in the batch failed to be created")]
    BulkCreateFailed,
}
