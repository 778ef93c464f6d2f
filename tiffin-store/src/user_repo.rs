use async_trait::async_trait;
use sqlx::PgPool;
use tiffin_core::{Address, NewUser, StoreError, User, UserRepository};
use crate::database::map_sqlx_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    street: String,
    city: String,
    state: String,
    zipcode: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password,
            address: Address {
                street: row.street,
                city: row.city,
                state: row.state,
                zipcode: row.zipcode,
            },
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password, street, city, state, zipcode)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, password, street, city, state, zipcode
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.address.street)
        .bind(&user.address.city)
        .bind(&user.address.state)
        .bind(&user.address.zipcode)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, street, city, state, zipcode
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(User::from))
    }
}
