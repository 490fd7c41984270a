use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("missing required environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save transfer ledger for manager `{manager_id}` gameweek {gameweek}")]
    SaveLedger {
        manager_id: Uuid,
        gameweek: u8,
        #[source]
        source: MongoError,
    },
    #[error("failed to load transfer ledger for manager `{manager_id}`")]
    LoadLedger {
        manager_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list transfer ledgers for gameweek {gameweek}")]
    ListLedgers {
        gameweek: u8,
        #[source]
        source: MongoError,
    },
    #[error("failed to save squad for manager `{manager_id}`")]
    SaveSquad {
        manager_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load squad for manager `{manager_id}`")]
    LoadSquad {
        manager_id: Uuid,
        #[source]
        source: MongoError,
    },
}

impl MongoDaoError {
    /// Whether the underlying failure is a record that no longer decodes,
    /// as opposed to a transport or server problem.
    pub fn is_decode_failure(&self) -> bool {
        let source = match self {
            MongoDaoError::InvalidUri { source, .. }
            | MongoDaoError::ClientConstruction { source }
            | MongoDaoError::InitialPing { source, .. }
            | MongoDaoError::HealthPing { source }
            | MongoDaoError::EnsureIndex { source, .. }
            | MongoDaoError::SaveLedger { source, .. }
            | MongoDaoError::LoadLedger { source, .. }
            | MongoDaoError::ListLedgers { source, .. }
            | MongoDaoError::SaveSquad { source, .. }
            | MongoDaoError::LoadSquad { source, .. } => source,
            MongoDaoError::MissingEnvVar { .. } => return false,
        };

        matches!(*source.kind, ErrorKind::BsonDeserialization(_))
    }
}
