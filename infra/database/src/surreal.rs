use crate::error::{RemoteError, RemoteErrorExt};
use crate::store::RemoteContentStore;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{debug, info, instrument, warn};
use vitrine_domain::ContentDocument;
use vitrine_domain::config::RemoteConfig;

const DEFINE_SCHEMA: &str = "DEFINE TABLE IF NOT EXISTS content SCHEMALESS;";
const READ_DOCUMENT: &str = "SELECT VALUE body FROM ONLY content:[$collection, $id];";
const WRITE_DOCUMENT: &str =
    "UPSERT content:[$collection, $id] SET body = $body, updated_at = time::now() RETURN NONE;";

/// Inner state of the [`SurrealContentStore`] wrapper.
#[derive(Debug)]
pub struct SurrealInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for SurrealInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// [`RemoteContentStore`] backed by `SurrealDB`.
///
/// Every `(collection, id)` pair is one record in table `content` keyed by the array id
/// `[collection, id]`. The document body is stored as its JSON text so arbitrary key names
/// survive untouched, next to an `updated_at` timestamp.
#[derive(Debug, Clone)]
pub struct SurrealContentStore {
    inner: Arc<SurrealInner>,
}

impl SurrealContentStore {
    /// Creates a new [`SurrealStoreBuilder`].
    pub fn builder() -> SurrealStoreBuilder {
        SurrealStoreBuilder::new()
    }

    /// Connects using the `[remote]` configuration section.
    ///
    /// # Errors
    /// See [`SurrealStoreBuilder::init`].
    pub async fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let mut builder = Self::builder()
            .url(&config.url)
            .session(&config.namespace, &config.database)
            .health_retries(config.health_retries);
        if let Some(credentials) = &config.credentials {
            builder = builder.auth(&credentials.username, &credentials.password);
        }
        builder.init().await
    }
}

impl Deref for SurrealContentStore {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct SurrealStoreBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
    health_retries: u32,
}

impl Default for SurrealStoreBuilder {
    fn default() -> Self {
        Self { url: None, ns: None, db: None, auth: None, health_retries: 3 }
    }
}

impl SurrealStoreBuilder {
    /// Creates a new [`SurrealStoreBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL (`mem://`, `ws://host:8000`, `http://…`, `rocksdb://path`).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Add root credentials to the connection.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Number of health checks before giving up on a starting engine (minimum 1).
    pub const fn health_retries(mut self, attempts: u32) -> Self {
        self.health_retries = attempts;
        self
    }

    /// Consumes the builder and establishes the connection.
    ///
    /// # Process
    /// 1. **Validation**: URL, namespace and database name must be set.
    /// 2. **Engine Initialization**: connects through the `any` engine.
    /// 3. **Resilience**: health checks with exponential backoff starting at 500ms. This is
    ///    connection setup only; document reads and writes are never retried here.
    /// 4. **Authentication**: signs in as a root user when credentials were given.
    /// 5. **Session Activation** and idempotent definition of the `content` table.
    ///
    /// # Errors
    /// * [`RemoteError::Validation`] if required parameters are missing.
    /// * [`RemoteError::Unavailable`] if the engine fails to start, stays unhealthy or rejects
    ///   the credentials.
    /// * [`RemoteError::Surreal`] if session activation or schema definition fails.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<SurrealContentStore, RemoteError> {
        let url = self.url.ok_or(RemoteError::Validation {
            message: "URL is required".into(),
            context: None,
        })?;
        let ns = self.ns.ok_or(RemoteError::Validation {
            message: "Namespace is required".into(),
            context: None,
        })?;
        let db = self.db.ok_or(RemoteError::Validation {
            message: "Database is required".into(),
            context: None,
        })?;

        let instance =
            connect(&url).await.map_err(|e| RemoteError::unavailable(e, "Initializing engine"))?;

        let attempts = self.health_retries.max(1);
        let mut delay = Duration::from_millis(500);
        for attempt in 1..=attempts {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == attempts {
                return Err(RemoteError::Unavailable {
                    message: "Unhealthy after retries".into(),
                    context: Some(url.into()),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        if let Some((username, password)) = self.auth {
            instance
                .signin(Root { username, password })
                .await
                .map_err(|e| RemoteError::unavailable(e, format!("Signing in to {url}")))?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;
        instance
            .query(DEFINE_SCHEMA)
            .await
            .context("Defining content table")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Defining content table")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB content store ready");

        Ok(SurrealContentStore { inner: Arc::new(SurrealInner { instance, ns, db }) })
    }
}

impl RemoteContentStore for SurrealContentStore {
    #[instrument(skip(self), level = "debug")]
    async fn read(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ContentDocument>, RemoteError> {
        let body = self
            .query(READ_DOCUMENT)
            .bind(("collection", collection.to_owned()))
            .bind(("id", id.to_owned()))
            .await
            .map_err(|e| RemoteError::unavailable(e, format!("Reading {collection}/{id}")))?
            .take::<Option<String>>(0)
            .map_err(|e| RemoteError::unavailable(e, format!("Reading {collection}/{id}")))?;

        let Some(body) = body else {
            debug!("Remote document absent");
            return Ok(None);
        };

        ContentDocument::from_json(&body).map(Some).map_err(|e| RemoteError::Corrupt {
            message: e.to_string().into(),
            context: Some(format!("{collection}/{id}").into()),
        })
    }

    #[instrument(skip(self, doc), level = "debug")]
    async fn write(
        &self,
        collection: &str,
        id: &str,
        doc: &ContentDocument,
    ) -> Result<(), RemoteError> {
        self.query(WRITE_DOCUMENT)
            .bind(("collection", collection.to_owned()))
            .bind(("id", id.to_owned()))
            .bind(("body", doc.to_json()))
            .await
            .map_err(|e| RemoteError::unavailable(e, format!("Writing {collection}/{id}")))?
            .check()
            .map_err(|e| RemoteError::unavailable(e, format!("Writing {collection}/{id}")))?;

        debug!("Remote document written");
        Ok(())
    }
}
