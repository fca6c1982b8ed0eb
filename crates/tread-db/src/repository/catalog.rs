//! # Catalog Repository
//!
//! Reference rows that feed the product forms: brands and the predefined
//! tire/wheel size lists.
//!
//! Deletes here are unconditional. Products copy the size fields they
//! need at creation time, so removing a catalog row never breaks an
//! existing product.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tread_core::validation::{validate_name, validate_new_tire_size, validate_new_wheel_size};
use tread_core::{local_now, Brand, NewTireSize, NewWheelSize, TireSize, WheelSize};

/// Repository for brand and size catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// Lists all brands, sorted by name.
    pub async fn list_brands(&self) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(
            r#"
            SELECT id, name, created_at
            FROM brands
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Creates a brand.
    ///
    /// The name is unique case-sensitively: "BBS" and "bbs" are two
    /// brands. A duplicate surfaces as `UniqueViolation`.
    pub async fn create_brand(&self, name: &str) -> DbResult<Brand> {
        validate_name(name)?;

        let brand = Brand {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: local_now(),
        };

        debug!(name = %brand.name, "Creating brand");

        sqlx::query("INSERT INTO brands (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&brand.id)
            .bind(&brand.name)
            .bind(brand.created_at)
            .execute(&self.pool)
            .await?;

        Ok(brand)
    }

    /// Deletes a brand. Fails with `NotFound` if the id doesn't exist.
    pub async fn delete_brand(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id));
        }

        Ok(())
    }

    // =========================================================================
    // Tire Sizes
    // =========================================================================

    /// Lists all tire sizes, smallest first.
    pub async fn list_tire_sizes(&self) -> DbResult<Vec<TireSize>> {
        let sizes = sqlx::query_as::<_, TireSize>(
            r#"
            SELECT id, width, aspect_ratio, diameter, load_index, speed_rating,
                   size_display, created_at
            FROM tire_sizes
            ORDER BY width, aspect_ratio, diameter
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sizes)
    }

    /// Creates a tire size, deriving `size_display` when the request
    /// doesn't carry one. The (width, aspect_ratio, diameter,
    /// load_index, speed_rating) tuple is unique exact-match.
    pub async fn create_tire_size(&self, req: &NewTireSize) -> DbResult<TireSize> {
        validate_new_tire_size(req)?;

        let size = TireSize {
            id: Uuid::new_v4().to_string(),
            width: req.width,
            aspect_ratio: req.aspect_ratio,
            diameter: req.diameter,
            load_index: req.load_index.clone(),
            speed_rating: req.speed_rating.clone(),
            size_display: req.display(),
            created_at: local_now(),
        };

        debug!(size = %size.size_display, "Creating tire size");

        sqlx::query(
            r#"
            INSERT INTO tire_sizes (
                id, width, aspect_ratio, diameter, load_index, speed_rating,
                size_display, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&size.id)
        .bind(size.width)
        .bind(size.aspect_ratio)
        .bind(size.diameter)
        .bind(&size.load_index)
        .bind(&size.speed_rating)
        .bind(&size.size_display)
        .bind(size.created_at)
        .execute(&self.pool)
        .await?;

        Ok(size)
    }

    /// Deletes a tire size. Fails with `NotFound` if the id doesn't exist.
    pub async fn delete_tire_size(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM tire_sizes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TireSize", id));
        }

        Ok(())
    }

    // =========================================================================
    // Wheel Sizes
    // =========================================================================

    /// Lists all wheel sizes, smallest first.
    pub async fn list_wheel_sizes(&self) -> DbResult<Vec<WheelSize>> {
        let sizes = sqlx::query_as::<_, WheelSize>(
            r#"
            SELECT id, diameter, width, pcd, "offset", center_bore,
                   stud_count, stud_type, size_display, created_at
            FROM wheel_sizes
            ORDER BY diameter, width
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sizes)
    }

    /// Creates a wheel size. Stud count and stud type are required by
    /// validation; `size_display` is derived when not supplied.
    pub async fn create_wheel_size(&self, req: &NewWheelSize) -> DbResult<WheelSize> {
        validate_new_wheel_size(req)?;

        let size = WheelSize {
            id: Uuid::new_v4().to_string(),
            diameter: req.diameter,
            width: req.width,
            pcd: req.pcd.clone(),
            offset: req.offset,
            center_bore: req.center_bore,
            stud_count: req.stud_count,
            stud_type: req.stud_type.clone(),
            size_display: req.display(),
            created_at: local_now(),
        };

        debug!(size = %size.size_display, "Creating wheel size");

        sqlx::query(
            r#"
            INSERT INTO wheel_sizes (
                id, diameter, width, pcd, "offset", center_bore,
                stud_count, stud_type, size_display, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&size.id)
        .bind(size.diameter)
        .bind(size.width)
        .bind(&size.pcd)
        .bind(size.offset)
        .bind(size.center_bore)
        .bind(size.stud_count)
        .bind(&size.stud_type)
        .bind(&size.size_display)
        .bind(size.created_at)
        .execute(&self.pool)
        .await?;

        Ok(size)
    }

    /// Deletes a wheel size. Fails with `NotFound` if the id doesn't exist.
    pub async fn delete_wheel_size(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM wheel_sizes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("WheelSize", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tread_core::ValidationError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn tire_size(load_index: Option<&str>, speed_rating: Option<&str>) -> NewTireSize {
        NewTireSize {
            width: 205,
            aspect_ratio: 55,
            diameter: 16,
            load_index: load_index.map(String::from),
            speed_rating: speed_rating.map(String::from),
            size_display: None,
        }
    }

    fn wheel_size() -> NewWheelSize {
        NewWheelSize {
            diameter: 16.0,
            width: 7.0,
            pcd: Some("4x100".to_string()),
            offset: Some(38.0),
            center_bore: Some(57.1),
            stud_count: Some(5),
            stud_type: Some("Long Stud".to_string()),
            size_display: None,
        }
    }

    #[tokio::test]
    async fn test_brand_crud() {
        let db = test_db().await;
        let catalog = db.catalog();

        let brand = catalog.create_brand("Bridgestone").await.unwrap();
        catalog.create_brand("Apollo").await.unwrap();

        let brands = catalog.list_brands().await.unwrap();
        assert_eq!(brands.len(), 2);
        // Sorted by name
        assert_eq!(brands[0].name, "Apollo");

        catalog.delete_brand(&brand.id).await.unwrap();
        assert_eq!(catalog.list_brands().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_brand_rejected() {
        let db = test_db().await;
        let catalog = db.catalog();

        catalog.create_brand("Yokohama").await.unwrap();
        let err = catalog.create_brand("Yokohama").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Case differs: a distinct brand, not a duplicate
        assert!(catalog.create_brand("YOKOHAMA").await.is_ok());
    }

    #[tokio::test]
    async fn test_brand_name_validated() {
        let db = test_db().await;
        let err = db.catalog().create_brand("   ").await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_tire_size_display_derived() {
        let db = test_db().await;
        let catalog = db.catalog();

        let bare = catalog.create_tire_size(&tire_size(None, None)).await.unwrap();
        assert_eq!(bare.size_display, "205/55R16");

        let rated = catalog
            .create_tire_size(&tire_size(Some("91"), Some("V")))
            .await
            .unwrap();
        assert_eq!(rated.size_display, "205/55R16 91V");
    }

    #[tokio::test]
    async fn test_tire_size_tuple_unique_exact_match() {
        let db = test_db().await;
        let catalog = db.catalog();

        catalog
            .create_tire_size(&tire_size(Some("91"), Some("V")))
            .await
            .unwrap();

        let err = catalog
            .create_tire_size(&tire_size(Some("91"), Some("V")))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Letter case participates in the tuple: "v" is a different row
        assert!(catalog
            .create_tire_size(&tire_size(Some("91"), Some("v")))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_wheel_size_requires_studs() {
        let db = test_db().await;
        let catalog = db.catalog();

        let mut req = wheel_size();
        req.stud_count = None;
        let err = catalog.create_wheel_size(&req).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_wheel_size_display_derived() {
        let db = test_db().await;
        let size = db.catalog().create_wheel_size(&wheel_size()).await.unwrap();
        assert!(size.size_display.contains("16x7"));
        assert!(size.size_display.contains("5 Stud (Long Stud)"));
    }

    #[tokio::test]
    async fn test_delete_missing_size_not_found() {
        let db = test_db().await;
        let catalog = db.catalog();

        assert!(matches!(
            catalog.delete_tire_size("missing").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            catalog.delete_wheel_size("missing").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            catalog.delete_brand("missing").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
