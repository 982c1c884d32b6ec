use async_trait::async_trait;
use sqlx::{postgres::PgArguments, PgPool, Row};

use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::models::{Address, AddressData, Contact, ContactData, NewUser, User};
use crate::database::store::Store;
use crate::filter::{FilterWhere, Predicate, SqlParam, SqlResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        username    VARCHAR(100) NOT NULL UNIQUE,
        password    VARCHAR(255) NOT NULL,
        name        VARCHAR(100) NOT NULL,
        token       VARCHAR(100) UNIQUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id          BIGSERIAL PRIMARY KEY,
        first_name  VARCHAR(100) NOT NULL,
        last_name   VARCHAR(100),
        email       VARCHAR(200),
        phone       VARCHAR(20),
        user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS contacts_user_id_idx ON contacts (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS addresses (
        id           BIGSERIAL PRIMARY KEY,
        street       VARCHAR(200),
        city         VARCHAR(100),
        province     VARCHAR(100),
        country      VARCHAR(100) NOT NULL,
        postal_code  VARCHAR(10),
        contact_id   BIGINT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS addresses_contact_id_idx ON addresses (contact_id)",
];

const USER_COLUMNS: &str = "id, username, password, name, token, created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone, user_id, created_at, updated_at";
const ADDRESS_COLUMNS: &str = "id, street, city, province, country, postal_code, contact_id, created_at, updated_at";

/// `Store` backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Database schema ready");
        Ok(())
    }

    fn log_query(sql: &SqlResult) {
        if config::config().database.enable_query_logging {
            tracing::debug!("SQL: {} ({} params)", sql.query, sql.params.len());
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE token = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users (username, password, name) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "username already registered"))
    }

    async fn update_user(&self, user: &User) -> Result<User, DatabaseError> {
        let query = format!(
            "UPDATE users SET name = $1, password = $2, updated_at = now() WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.password)
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user.id)))
    }

    async fn set_user_token(&self, user_id: i64, token: Option<&str>) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET token = $1, updated_at = now() WHERE id = $2")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "token already in use"))?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        let query = format!("SELECT {} FROM contacts WHERE id = $1", CONTACT_COLUMNS);
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    async fn insert_contact(&self, user_id: i64, data: ContactData) -> Result<Contact, DatabaseError> {
        let query = format!(
            "INSERT INTO contacts (first_name, last_name, email, phone, user_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            CONTACT_COLUMNS
        );
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(contact)
    }

    async fn update_contact(&self, id: i64, data: ContactData) -> Result<Contact, DatabaseError> {
        let query = format!(
            "UPDATE contacts SET first_name = $1, last_name = $2, email = $3, phone = $4, updated_at = now() WHERE id = $5 RETURNING {}",
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("contact {}", id)))
    }

    async fn delete_contact(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM addresses WHERE contact_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_contacts(&self, predicates: &[Predicate]) -> Result<u64, DatabaseError> {
        let where_sql = FilterWhere::generate(predicates);
        let sql = SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM contacts WHERE {}", where_sql.query),
            params: where_sql.params,
        };
        Self::log_query(&sql);

        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn select_contacts(
        &self,
        predicates: &[Predicate],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, DatabaseError> {
        let where_sql = FilterWhere::generate(predicates);
        let next = where_sql.params.len();
        let sql = SqlResult {
            query: format!(
                "SELECT {} FROM contacts WHERE {} ORDER BY id LIMIT ${} OFFSET ${}",
                CONTACT_COLUMNS,
                where_sql.query,
                next + 1,
                next + 2
            ),
            params: where_sql.params,
        };
        Self::log_query(&sql);

        let mut q = sqlx::query_as::<_, Contact>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_address(&self, id: i64) -> Result<Option<Address>, DatabaseError> {
        let query = format!("SELECT {} FROM addresses WHERE id = $1", ADDRESS_COLUMNS);
        let address = sqlx::query_as::<_, Address>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(address)
    }

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError> {
        let query = format!("SELECT {} FROM addresses WHERE contact_id = $1 ORDER BY id", ADDRESS_COLUMNS);
        let rows = sqlx::query_as::<_, Address>(&query)
            .bind(contact_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_address(&self, contact_id: i64, data: AddressData) -> Result<Address, DatabaseError> {
        let query = format!(
            "INSERT INTO addresses (street, city, province, country, postal_code, contact_id) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ADDRESS_COLUMNS
        );
        let address = sqlx::query_as::<_, Address>(&query)
            .bind(&data.street)
            .bind(&data.city)
            .bind(&data.province)
            .bind(&data.country)
            .bind(&data.postal_code)
            .bind(contact_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(address)
    }

    async fn update_address(&self, id: i64, data: AddressData) -> Result<Address, DatabaseError> {
        let query = format!(
            "UPDATE addresses SET street = $1, city = $2, province = $3, country = $4, postal_code = $5, updated_at = now() WHERE id = $6 RETURNING {}",
            ADDRESS_COLUMNS
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(&data.street)
            .bind(&data.city)
            .bind(&data.province)
            .bind(&data.country)
            .bind(&data.postal_code)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("address {}", id)))
    }

    async fn delete_address(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}
