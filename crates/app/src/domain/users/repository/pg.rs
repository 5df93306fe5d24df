use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    domain::{
        store::{RepositoryError, escape_like},
        users::{
            models::{NewUserRecord, User, UserFilter, UserUuid},
            repository::UsersRepository,
        },
    },
    pagination::PageRequest,
};

const CREATE_USER_SQL: &str = include_str!("../sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("../sql/get_user.sql");
const GET_USER_BY_EMAIL_SQL: &str = include_str!("../sql/get_user_by_email.sql");
const UPDATE_USER_SQL: &str = include_str!("../sql/update_user.sql");
const DELETE_USER_SQL: &str = include_str!("../sql/delete_user.sql");
const LIST_USERS_SQL: &str = include_str!("../sql/list_users.sql");
const COUNT_USERS_SQL: &str = include_str!("../sql/count_users.sql");

#[derive(Debug, Clone)]
pub struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(error: sqlx::Error) -> RepositoryError {
    RepositoryError::from_sqlx(error, "email")
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn create(&self, user: NewUserRecord) -> Result<User, RepositoryError> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(UserUuid::new().into_uuid())
            .bind(user.name)
            .bind(user.email)
            .bind(user.phone)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)
    }

    async fn get_by_id(&self, user: UserUuid) -> Result<Option<User>, RepositoryError> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        query_as::<Postgres, User>(GET_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        query_as::<Postgres, User>(UPDATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.name)
            .bind(user.email)
            .bind(user.phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, user: UserUuid) -> Result<(), RepositoryError> {
        let rows_affected = query(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?
            .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: &UserFilter,
    ) -> Result<(Vec<User>, u64), RepositoryError> {
        let search = escape_like(&filter.search);

        let total: i64 = query_scalar(COUNT_USERS_SQL)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        let users = query_as::<Postgres, User>(LIST_USERS_SQL)
            .bind(&search)
            .bind(i64::from(page.limit()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        Ok((users, u64::try_from(total).unwrap_or_default()))
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
