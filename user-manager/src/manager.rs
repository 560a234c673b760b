use crate::client::{RemoteCaller, SurfRemoteCaller, TransportError};
use crate::endpoint::Request;
use crate::error::{Operation, UserManagerError};
use crate::limiter::RequestLimiter;
use crate::r#static::API_TOKEN_HEADER;
use crate::storage::UserStorage;
use crate::{ManagerConfig, User, UserCreationParams, UserResponse, UserUpdateParams};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Application the manager currently targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ApplicationContext {
    application_id: String,
    /// Sent as the `Api-Token` header; kept so callers can inspect the active credential
    api_token: String,
    /// Bumped on every switch to a different application id
    generation: u64,
}

/// Creates, updates and fetches users through a [`RemoteCaller`], caching
/// every user it receives.
///
/// All remote calls share one [`RequestLimiter`], so no more than
/// `max_concurrent_requests` of them are ever in flight. Create calls are
/// additionally delayed by `create_delay` before they compete for a slot.
///
/// There is no overall deadline: a bulk creation returns only once every
/// one of its calls has returned, so a caller that never answers stalls it.
pub struct UserManager<C> {
    client: Arc<C>,
    storage: UserStorage,
    limiter: RequestLimiter,
    context: RwLock<ApplicationContext>,
    config: ManagerConfig,
}

impl UserManager<SurfRemoteCaller> {
    /// Create a new UserManager talking HTTP through surf
    pub fn with_config(config: ManagerConfig) -> Self {
        let client = Arc::new(SurfRemoteCaller::new(&config));
        Self::new(client, config)
    }
}

impl<C: RemoteCaller> UserManager<C> {
    pub fn new(client: Arc<C>, config: ManagerConfig) -> Self {
        Self {
            client,
            storage: UserStorage::new(config.cache_capacity()),
            limiter: RequestLimiter::new(config.max_concurrent_requests()),
            context: RwLock::new(ApplicationContext::default()),
            config,
        }
    }

    /// Point the manager at an application.
    ///
    /// Switching to a different application id drops every cached user.
    /// Re-initialising with the same id only refreshes the token.
    pub fn init_application(&self, application_id: &str, api_token: &str) {
        let mut context = self.context.write();
        if context.application_id != application_id {
            log::info!(
                "Switching application from '{}' to '{}', clearing cached users",
                context.application_id,
                application_id
            );
            self.storage.remove_all_users();
            context.generation += 1;
        }
        context.application_id = application_id.to_string();
        context.api_token = api_token.to_string();

        self.client.set_app_id(application_id);
        self.client.set_headers(vec![
            (API_TOKEN_HEADER.to_string(), api_token.to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]);
    }

    /// Create a single user after the configured create delay
    pub async fn create_user(&self, params: UserCreationParams) -> Result<User, UserManagerError> {
        let generation = self.generation();
        let response = self
            .dispatch(Operation::CreateUser, Request::create_user(params))
            .await?;
        self.store_response(response, generation)
    }

    /// Create up to `max_bulk_create - 1` users concurrently.
    ///
    /// Created users are returned in the order of `params`; users that failed
    /// are left out and only logged. The call fails as a whole when the batch
    /// is too large (no request is sent) or when no user could be created.
    pub async fn create_users(
        &self,
        params: Vec<UserCreationParams>,
    ) -> Result<Vec<User>, UserManagerError> {
        let max = self.config.max_bulk_create();
        if params.len() >= max {
            return Err(UserManagerError::OutOfRange(format!(
                "Cannot create {} users at once, split them into groups of less than {}",
                params.len(),
                max
            )));
        }

        let user_ids: Vec<String> = params.iter().map(|p| p.user_id().clone()).collect();
        let outcomes = join_all(params.into_iter().map(|p| self.create_user(p))).await;

        let mut created = Vec::with_capacity(outcomes.len());
        let mut failed = vec![];
        for (user_id, outcome) in user_ids.into_iter().zip(outcomes) {
            match outcome {
                Ok(user) => created.push(user),
                Err(err) => failed.push((user_id, err)),
            }
        }

        for (user_id, err) in &failed {
            log::warn!("Bulk creation skipped user {}: {}", user_id, err);
        }

        if created.is_empty() {
            return Err(UserManagerError::BulkCreateFailed);
        }

        log::info!(
            "Created {} of {} users",
            created.len(),
            created.len() + failed.len()
        );
        Ok(created)
    }

    pub async fn update_user(&self, params: UserUpdateParams) -> Result<User, UserManagerError> {
        let generation = self.generation();
        let response = self
            .dispatch(Operation::UpdateUser, Request::update_user(params))
            .await?;
        self.store_response(response, generation)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, UserManagerError> {
        if user_id.is_empty() {
            return Err(UserManagerError::EmptyIdentifier);
        }

        let generation = self.generation();
        let response = self
            .dispatch(Operation::GetUser, Request::get_user(user_id.to_string()))
            .await?;
        self.store_response(response, generation)
    }

    /// Search users by nickname, one page of `list_limit` results.
    ///
    /// Entries without a user id are dropped.
    pub async fn get_users(&self, nickname: &str) -> Result<Vec<User>, UserManagerError> {
        if nickname.is_empty() {
            return Err(UserManagerError::EmptyNickname);
        }

        let generation = self.generation();
        let request = Request::get_users(nickname.to_string(), self.config.list_limit());
        let response = self.dispatch(Operation::GetUsers, request).await?;

        let users: Vec<User> = response
            .users
            .unwrap_or_default()
            .into_iter()
            .filter_map(User::from_response)
            .collect();
        self.write_through(&users, generation);

        log::debug!("Nickname '{}' matched {} users", nickname, users.len());
        Ok(users)
    }

    pub fn storage(&self) -> &UserStorage {
        &self.storage
    }

    pub fn limiter(&self) -> &RequestLimiter {
        &self.limiter
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn application_id(&self) -> String {
        self.context.read().application_id.clone()
    }

    pub fn api_token(&self) -> String {
        self.context.read().api_token.clone()
    }

    /// Close the request limiter. Calls waiting for a slot, and every call
    /// made afterwards, fail with [`TransportError::Closed`]; calls already
    /// in flight run to completion.
    pub fn shutdown(&self) {
        log::info!("Shutting down user manager");
        self.limiter.close();
    }

    fn generation(&self) -> u64 {
        self.context.read().generation
    }

    async fn dispatch<R>(
        &self,
        operation: Operation,
        request: Request<R>,
    ) -> Result<R, UserManagerError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let target = request.endpoint().target().to_string();

        if request.endpoint().is_delayed() {
            tokio::time::sleep(self.config.create_delay()).await;
        }

        self.send(request).await.map_err(|source| {
            log::warn!("{} failed for {}: {}", operation, target, source);
            UserManagerError::RemoteCallFailed {
                operation,
                target,
                source,
            }
        })
    }

    async fn send<R>(&self, request: Request<R>) -> Result<R, TransportError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| TransportError::Closed)?;
        self.client.request(request).await
    }

    fn store_response(
        &self,
        response: UserResponse,
        generation: u64,
    ) -> Result<User, UserManagerError> {
        let user = User::from_response(response).ok_or(UserManagerError::NotFoundIdentifier)?;
        self.write_through(std::slice::from_ref(&user), generation);
        Ok(user)
    }

    /// Caches `users` unless the application changed since the call started.
    /// The context lock is held across the write so a concurrent switch
    /// cannot clear the cache in between.
    fn write_through(&self, users: &[User], generation: u64) {
        let context = self.context.read();
        if context.generation != generation {
            log::debug!(
                "Application changed to '{}' during the call, not caching {} users",
                context.application_id,
                users.len()
            );
            return;
        }
        for user in users {
            self.storage.upsert_user(user.clone());
        }
    }
}
