//! Service layer

pub mod api_client;
pub mod registration;

pub use api_client::ApiClient;
pub use registration::RegistrationService;

use sqlx::PgPool;

use crate::config::Settings;
use crate::database::repositories::{GroupRepository, MessageRepository, UserRepository};
use crate::utils::errors::Result;
use crate::utils::hash::KeyHasher;

/// Bundle of repositories and services shared by the bot handlers and the
/// HTTP API, constructed once at startup.
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub messages: MessageRepository,
    pub registration: RegistrationService,
    pub api_client: ApiClient,
}

impl ServiceFactory {
    pub fn new(pool: PgPool, settings: &Settings) -> Result<Self> {
        let users = UserRepository::new(pool.clone());
        let groups = GroupRepository::new(pool.clone());
        let messages = MessageRepository::new(pool);

        let hasher = KeyHasher::new(settings.api.key_pepper.clone());
        let registration = RegistrationService::new(users.clone(), hasher);
        let api_client = ApiClient::new(settings.api.port, settings.api.key.clone())?;

        Ok(Self {
            users,
            groups,
            messages,
            registration,
            api_client,
        })
    }
}
