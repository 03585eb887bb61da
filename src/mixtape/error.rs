use thiserror::Error;

/// Failures raised by the catalog store while loading or mutating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{kind} ID {id} is invalid")]
    InvalidId { kind: &'static str, id: String },

    #[error("Duplicate user ID {0}")]
    DuplicateUser(String),

    #[error("Duplicate song ID {0}")]
    DuplicateSong(String),

    #[error("Duplicate playlist ID {0}")]
    DuplicatePlaylist(String),

    #[error("User ID {0} does not exist")]
    DanglingUserRef(String),

    #[error("Song ID {0} does not exist")]
    DanglingSongRef(String),

    #[error("Playlist ID exceeds maximum {}", u32::MAX)]
    IdExhausted,

    #[error("Playlist ID {0} does not exist")]
    UnknownPlaylist(String),

    #[error("Song ID {0} does not exist")]
    UnknownSong(String),

    #[error("Song ID {song} is already in playlist {playlist}")]
    SongAlreadyInPlaylist { playlist: String, song: String },

    #[error("Playlist {0} already holds the maximum number of songs")]
    PlaylistFull(String),
}

/// Fatal failures of a mixtape run.
#[derive(Error, Debug)]
pub enum MixtapeError {
    #[error("Cannot read input: {0}")]
    InputFetch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot read changes file: {0}")]
    ChangesRead(String),

    #[error("Invalid changes file: {0}")]
    InvalidPatchList(String),

    #[error("Cannot write output: {0}")]
    OutputWrite(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MixtapeError>;
