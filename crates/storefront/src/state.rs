//! Application state shared across handlers.

use std::sync::Arc;

use crate::ai::GenAiClient;
use crate::backend::{AuthClient, BlobClient, DocumentClient};
use crate::config::LookbookConfig;
use crate::services::notifications::{LogNotificationSender, NotificationSender};
use crate::services::session::SessionService;
use crate::services::wishlist::WishlistService;
use crate::storage::{FileStore, SnapshotError, SnapshotStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// gateway clients and the two state containers. The containers are
/// constructed here and initialized before the server accepts requests, so
/// handlers never observe the `Loading` state themselves.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: LookbookConfig,
    documents: DocumentClient,
    blobs: BlobClient,
    ai: GenAiClient,
    session: SessionService<AuthClient>,
    wishlist: WishlistService,
}

impl AppState {
    /// Create a new application state and initialize both containers.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot data directory cannot be created.
    pub fn new(config: LookbookConfig) -> Result<Self, SnapshotError> {
        let store: Arc<dyn SnapshotStore> = Arc::new(FileStore::new(&config.data_dir)?);
        let notifier: Arc<dyn NotificationSender> = Arc::new(LogNotificationSender);

        let documents = DocumentClient::new(&config.backend);
        let blobs = BlobClient::new(&config.backend);
        let ai = GenAiClient::new(&config.ai);
        let auth = AuthClient::new(&config.backend, documents.clone());

        let session = SessionService::new(auth, store.clone());
        session.initialize();

        let wishlist = WishlistService::new(store, notifier);
        wishlist.initialize();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                documents,
                blobs,
                ai,
                session,
                wishlist,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &LookbookConfig {
        &self.inner.config
    }

    /// Get a reference to the document database client.
    #[must_use]
    pub fn documents(&self) -> &DocumentClient {
        &self.inner.documents
    }

    /// Get a reference to the object storage client.
    #[must_use]
    pub fn blobs(&self) -> &BlobClient {
        &self.inner.blobs
    }

    /// Get a reference to the generative-language client.
    #[must_use]
    pub fn ai(&self) -> &GenAiClient {
        &self.inner.ai
    }

    /// Get a reference to the session container.
    #[must_use]
    pub fn session(&self) -> &SessionService<AuthClient> {
        &self.inner.session
    }

    /// Get a reference to the wishlist container.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistService {
        &self.inner.wishlist
    }
}
