use std::sync::Arc;
use tiffin_core::{NewUser, ServiceError, ServiceResult, StoreError, UserRepository};
use tracing::{error, info, warn};

use crate::auth::PasswordHasher;
use crate::models::{RegisterUserRequest, RegisterUserResponse};

pub const REGISTERED_MESSAGE: &str = "Yayy! User Registered Sccessfully!";

/// UserService.Register: validate, hash, insert.
pub struct UserRegistrar {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserRegistrar {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub async fn register(
        &self,
        request: RegisterUserRequest,
    ) -> ServiceResult<RegisterUserResponse> {
        let RegisterUserRequest {
            username,
            password,
            address,
        } = request;

        let address = match address {
            Some(address) if !username.is_empty() && !password.is_empty() => address,
            _ => {
                warn!("Registration rejected: missing fields");
                return Err(ServiceError::invalid_argument("Missing required user fields"));
            }
        };
        if !address.is_complete() {
            warn!("Registration rejected for {}: incomplete address", username);
            return Err(ServiceError::invalid_argument("Invalid address data"));
        }

        let password_hash = self
            .hasher
            .hash_password(password.into_inner())
            .await
            .map_err(|e| {
                error!("Hashing password for {} failed: {}", username, e);
                ServiceError::internal("Error hashing password")
            })?;

        let user = self
            .users
            .create_user(&NewUser {
                username: username.clone(),
                password_hash,
                address,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    warn!("Registration rejected: {} already taken", username);
                    ServiceError::invalid_argument(format!(
                        "username '{}' is already registered",
                        username
                    ))
                }
                other => {
                    error!("Failed to store user {}: {}", username, other);
                    ServiceError::unknown(format!("error storing the user: {}", other))
                }
            })?;

        info!("Registered user {} (id {})", user.username, user.id);
        Ok(RegisterUserResponse {
            username: user.username,
            address: user.address,
            message: REGISTERED_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiffin_core::{Address, ErrorCode};
    use tiffin_shared::Masked;
    use tiffin_store::InMemoryStore;

    fn registrar(store: &Arc<InMemoryStore>) -> UserRegistrar {
        UserRegistrar::new(store.clone(), PasswordHasher::new(4))
    }

    fn alice() -> RegisterUserRequest {
        RegisterUserRequest {
            username: "alice".to_string(),
            password: Masked::new("pw1".to_string()),
            address: Some(Address {
                street: "1 Main".to_string(),
                city: "X".to_string(),
                state: "Y".to_string(),
                zipcode: "00000".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_and_echoes_address() {
        let store = Arc::new(InMemoryStore::new());
        let response = registrar(&store).register(alice()).await.unwrap();

        assert_eq!(response.message, "Yayy! User Registered Sccessfully!");
        assert_eq!(response.username, "alice");
        assert_eq!(response.address.zipcode, "00000");

        let stored = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw1");
        assert!(PasswordHasher::new(4).verify("pw1", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_without_insert() {
        let store = Arc::new(InMemoryStore::new());
        let registrar = registrar(&store);

        let mut no_name = alice();
        no_name.username.clear();
        let mut no_password = alice();
        no_password.password = Masked::default();
        let mut no_address = alice();
        no_address.address = None;

        for request in [no_name, no_password, no_address] {
            let err = registrar.register(request).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidArgument);
            assert_eq!(err.message, "Missing required user fields");
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_each_empty_address_field_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let registrar = registrar(&store);

        let clears: [fn(&mut Address); 4] = [
            |a| a.street.clear(),
            |a| a.city.clear(),
            |a| a.state.clear(),
            |a| a.zipcode.clear(),
        ];
        for clear in clears {
            let mut request = alice();
            if let Some(address) = request.address.as_mut() {
                clear(address);
            }
            let err = registrar.register(request).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidArgument);
            assert_eq!(err.message, "Invalid address data");
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let registrar = registrar(&store);

        registrar.register(alice()).await.unwrap();
        let err = registrar.register(alice()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.message, "username 'alice' is already registered");
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_store_outage_is_unknown() {
        let store = Arc::new(InMemoryStore::new());
        store.set_unavailable(true).await;

        let err = registrar(&store).register(alice()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unknown);
        assert!(err.message.starts_with("error storing the user:"));
    }
}
