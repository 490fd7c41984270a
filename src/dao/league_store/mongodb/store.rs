use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoLedgerDocument, MongoSquadDocument, doc_id, ledger_key, uuid_as_binary},
};
use crate::dao::{
    league_store::LeagueStore,
    models::{SquadEntity, TransferLedgerEntity},
    storage::StorageResult,
};
use crate::rules::Gameweek;

const LEDGER_COLLECTION_NAME: &str = "transfer_ledgers";
const SQUAD_COLLECTION_NAME: &str = "squads";

#[derive(Clone)]
pub struct MongoLeagueStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

/// Whether an insert failed because the unique index already holds the key.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

impl MongoLeagueStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.ledger_collection().await;

        // One ledger per manager per gameweek; concurrent week-opening
        // races resolve to a single winner through this index.
        let manager_week = mongodb::IndexModel::builder()
            .keys(doc! {"manager_id": 1, "gameweek": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("ledger_manager_week_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        collection
            .create_index(manager_week)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: LEDGER_COLLECTION_NAME,
                index: "manager_id,gameweek",
                source,
            })?;

        // Gameweek closing scans every ledger of the closing week.
        let by_week = mongodb::IndexModel::builder()
            .keys(doc! {"gameweek": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("ledger_week_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(by_week)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: LEDGER_COLLECTION_NAME,
                index: "gameweek",
                source,
            })?;

        Ok(())
    }

    async fn ledger_collection(&self) -> Collection<MongoLedgerDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoLedgerDocument>(LEDGER_COLLECTION_NAME)
    }

    async fn squad_collection(&self) -> Collection<MongoSquadDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoSquadDocument>(SQUAD_COLLECTION_NAME)
    }

    async fn create_ledger(&self, ledger: TransferLedgerEntity) -> MongoResult<bool> {
        let manager_id = ledger.manager_id;
        let gameweek = ledger.gameweek;
        let document: MongoLedgerDocument = ledger.into();
        let collection = self.ledger_collection().await;

        match collection.insert_one(&document).await {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_key(&err) => Ok(false),
            Err(source) => Err(MongoDaoError::SaveLedger {
                manager_id,
                gameweek,
                source,
            }),
        }
    }

    async fn update_ledger(&self, ledger: TransferLedgerEntity) -> MongoResult<bool> {
        let manager_id = ledger.manager_id;
        let gameweek = ledger.gameweek;
        let mut document: MongoLedgerDocument = ledger.into();
        let expected_version = document.version;
        document.version += 1;

        let mut filter = ledger_key(manager_id, gameweek);
        filter.insert("version", expected_version);

        let collection = self.ledger_collection().await;
        let result = collection
            .replace_one(filter, &document)
            .await
            .map_err(|source| MongoDaoError::SaveLedger {
                manager_id,
                gameweek,
                source,
            })?;

        Ok(result.matched_count > 0)
    }

    async fn find_ledger(
        &self,
        manager_id: Uuid,
        gameweek: Gameweek,
    ) -> MongoResult<Option<TransferLedgerEntity>> {
        let collection = self.ledger_collection().await;

        let document = collection
            .find_one(ledger_key(manager_id, gameweek.round()))
            .await
            .map_err(|source| MongoDaoError::LoadLedger { manager_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn find_latest_ledger(
        &self,
        manager_id: Uuid,
    ) -> MongoResult<Option<TransferLedgerEntity>> {
        let collection = self.ledger_collection().await;

        let document = collection
            .find_one(doc! { "manager_id": uuid_as_binary(manager_id) })
            .sort(doc! { "gameweek": -1 })
            .await
            .map_err(|source| MongoDaoError::LoadLedger { manager_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_ledgers(&self, gameweek: Gameweek) -> MongoResult<Vec<TransferLedgerEntity>> {
        let collection = self.ledger_collection().await;
        let week = gameweek.round();

        let documents: Vec<MongoLedgerDocument> = collection
            .find(doc! { "gameweek": i32::from(week) })
            .await
            .map_err(|source| MongoDaoError::ListLedgers {
                gameweek: week,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListLedgers {
                gameweek: week,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_squad(&self, squad: SquadEntity) -> MongoResult<()> {
        let manager_id = squad.manager_id;
        let document: MongoSquadDocument = squad.into();
        let collection = self.squad_collection().await;

        collection
            .replace_one(doc_id(manager_id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveSquad { manager_id, source })?;

        Ok(())
    }

    async fn find_squad(&self, manager_id: Uuid) -> MongoResult<Option<SquadEntity>> {
        let collection = self.squad_collection().await;

        let document = collection
            .find_one(doc_id(manager_id))
            .await
            .map_err(|source| MongoDaoError::LoadSquad { manager_id, source })?;

        Ok(document.map(Into::into))
    }
}

impl LeagueStore for MongoLeagueStore {
    fn create_ledger(
        &self,
        ledger: TransferLedgerEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.create_ledger(ledger).await.map_err(Into::into) })
    }

    fn update_ledger(
        &self,
        ledger: TransferLedgerEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.update_ledger(ledger).await.map_err(Into::into) })
    }

    fn find_ledger(
        &self,
        manager_id: Uuid,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_ledger(manager_id, gameweek)
                .await
                .map_err(Into::into)
        })
    }

    fn find_latest_ledger(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TransferLedgerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_latest_ledger(manager_id)
                .await
                .map_err(Into::into)
        })
    }

    fn list_ledgers(
        &self,
        gameweek: Gameweek,
    ) -> BoxFuture<'static, StorageResult<Vec<TransferLedgerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_ledgers(gameweek).await.map_err(Into::into) })
    }

    fn save_squad(&self, squad: SquadEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_squad(squad).await.map_err(Into::into) })
    }

    fn find_squad(
        &self,
        manager_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SquadEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_squad(manager_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
