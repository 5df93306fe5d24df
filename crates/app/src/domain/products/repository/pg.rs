use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    domain::{
        products::{
            models::{NewProduct, Product, ProductFilter, ProductUuid},
            repository::ProductsRepository,
        },
        store::{RepositoryError, escape_like},
    },
    pagination::PageRequest,
};

const CREATE_PRODUCT_SQL: &str = include_str!("../sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("../sql/get_product.sql");
const GET_PRODUCT_BY_SKU_SQL: &str = include_str!("../sql/get_product_by_sku.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("../sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("../sql/delete_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("../sql/list_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("../sql/count_products.sql");

const NATURAL_KEY: &str = "sku";

#[derive(Debug, Clone)]
pub struct PgProductsRepository {
    pool: PgPool,
}

impl PgProductsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(error: sqlx::Error) -> RepositoryError {
    RepositoryError::from_sqlx(error, NATURAL_KEY)
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(ProductUuid::new().into_uuid())
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .bind(product.quantity)
            .bind(product.category)
            .bind(product.sku)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)
    }

    async fn get_by_id(&self, product: ProductUuid) -> Result<Option<Product>, RepositoryError> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        query_as::<Postgres, Product>(GET_PRODUCT_BY_SKU_SQL)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .bind(product.quantity)
            .bind(product.category)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, product: ProductUuid) -> Result<(), RepositoryError> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
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
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        let search = escape_like(&filter.search);
        let category = escape_like(&filter.category);

        let total: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .bind(&search)
            .bind(&category)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        let products = query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(&search)
            .bind(&category)
            .bind(i64::from(page.limit()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        Ok((products, u64::try_from(total).unwrap_or_default()))
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            category: row.try_get("category")?,
            sku: row.try_get("sku")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::TestDb;

    fn hammer(sku: &str) -> NewProduct {
        NewProduct {
            name: "Hammer".to_string(),
            description: "Claw hammer, 100% steel".to_string(),
            price: 12.5,
            quantity: 4,
            category: "Hand Tools".to_string(),
            sku: sku.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new(db.pool().clone());

        let created = repository.create(hammer("HAM-1")).await?;
        let fetched = repository.get_by_id(created.uuid).await?;

        assert_eq!(fetched, Some(created.clone()));
        assert_eq!(repository.get_by_sku("HAM-1").await?, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_sku_is_a_conflict() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new(db.pool().clone());

        repository.create(hammer("HAM-1")).await?;
        let result = repository.create(hammer("HAM-1")).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists("sku"))));

        Ok(())
    }

    #[tokio::test]
    async fn update_bumps_updated_at() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new(db.pool().clone());

        let created = repository.create(hammer("HAM-1")).await?;
        let updated = repository
            .update(Product {
                quantity: 10,
                ..created.clone()
            })
            .await?;

        assert_eq!(updated.quantity, 10);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn delete_of_a_missing_row_is_not_found() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new(db.pool().clone());

        let result = repository.delete(ProductUuid::new()).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn list_filters_literally_and_counts_all_matches() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new(db.pool().clone());

        repository.create(hammer("HAM-1")).await?;
        repository.create(hammer("HAM-2")).await?;
        repository
            .create(NewProduct {
                name: "Paint".to_string(),
                description: "Blue".to_string(),
                category: "Decorating".to_string(),
                ..hammer("PNT-1")
            })
            .await?;

        let filter = ProductFilter {
            search: "100%".to_string(),
            category: "tools".to_string(),
        };
        let (products, total) = repository.list(PageRequest::clamped(1, 1), &filter).await?;

        assert_eq!(total, 2);
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|p| p.sku.as_str()), Some("HAM-2"));

        Ok(())
    }
}
