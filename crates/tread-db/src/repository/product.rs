//! # Product Repository
//!
//! CRUD and search for catalog products.
//!
//! ## Cascade Delete
//! Invoice items snapshot everything a historical invoice displays, so a
//! product row can be removed outright. The delete cascade clears the
//! product's stock movements and invoice items first, then the product,
//! all inside one transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tread_core::validation::validate_new_product;
use tread_core::{local_now, NewProduct, Product, ProductSpec, ProductType, DEFAULT_LOW_STOCK_THRESHOLD};

/// Column list shared by every product SELECT (reports reuse it for the
/// slow-mover query).
pub(crate) const PRODUCT_COLUMNS: &str = "\
    id, sku, name, price_cents, cost_price_cents, \
    stock_quantity, low_stock_threshold, product_type, \
    tire_width, tire_aspect_ratio, tire_diameter, tire_load_index, tire_speed_rating, \
    wheel_diameter, wheel_width, wheel_pcd, wheel_offset, wheel_center_bore, \
    wheel_stud_count, wheel_stud_type, \
    size_display, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists all products, sorted by name.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists products of one type, sorted by name.
    pub async fn get_by_type(&self, product_type: ProductType) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_type = ?1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(product_type)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Case-insensitive substring match against the denormalized size
    /// label. Products without a label (general goods) never match.
    pub async fn get_by_size(&self, fragment: &str) -> DbResult<Vec<Product>> {
        let pattern = format!("%{}%", fragment.trim());
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE size_display LIKE ?1 ORDER BY name"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Products at or under their low-stock threshold, most urgent
    /// (lowest stock) first.
    pub async fn get_low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock_quantity <= low_stock_threshold \
             ORDER BY stock_quantity ASC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Counts products (used by the seed guard and diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a product from a validated request. The size label is
    /// derived from the type-specific attributes before the row write.
    pub async fn create(&self, req: &NewProduct) -> DbResult<Product> {
        validate_new_product(req)?;

        let now = local_now();
        let product = build_product(Uuid::new_v4().to_string(), req, now, now);

        debug!(name = %product.name, product_type = ?product.product_type, "Creating product");

        let sql = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES (\
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, \
             ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)"
        );
        bind_product(sqlx::query(&sql), &product)
            .execute(&self.pool)
            .await?;

        Ok(product)
    }

    /// Replaces a product's full attribute set. `created_at` is kept,
    /// `updated_at` moves to now. Fails with `NotFound` for a missing id.
    pub async fn update(&self, id: &str, req: &NewProduct) -> DbResult<Product> {
        validate_new_product(req)?;

        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let product = build_product(id.to_string(), req, existing.created_at, local_now());

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2, name = ?3, price_cents = ?4, cost_price_cents = ?5,
                stock_quantity = ?6, low_stock_threshold = ?7, product_type = ?8,
                tire_width = ?9, tire_aspect_ratio = ?10, tire_diameter = ?11,
                tire_load_index = ?12, tire_speed_rating = ?13,
                wheel_diameter = ?14, wheel_width = ?15, wheel_pcd = ?16,
                wheel_offset = ?17, wheel_center_bore = ?18,
                wheel_stud_count = ?19, wheel_stud_type = ?20,
                size_display = ?21, updated_at = ?22
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(product.product_type)
        .bind(product.tire_width)
        .bind(product.tire_aspect_ratio)
        .bind(product.tire_diameter)
        .bind(&product.tire_load_index)
        .bind(&product.tire_speed_rating)
        .bind(product.wheel_diameter)
        .bind(product.wheel_width)
        .bind(&product.wheel_pcd)
        .bind(product.wheel_offset)
        .bind(product.wheel_center_bore)
        .bind(product.wheel_stud_count)
        .bind(&product.wheel_stud_type)
        .bind(&product.size_display)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(product)
    }

    // =========================================================================
    // Deletes (cascading)
    // =========================================================================

    /// Deletes a product and its ledger/invoice-item rows in one
    /// transaction. Historical invoices keep their snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        cascade_delete_one(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Rolls back the (empty) cascade on drop
            return Err(DbError::not_found("Product", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = %id, "Product deleted");
        Ok(())
    }

    /// Deletes every product with the same cascade as `delete`. Returns
    /// the number of products removed.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("DELETE FROM stock_movements")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM invoice_items")
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM products").execute(&mut *tx).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(count = result.rows_affected(), "All products deleted");
        Ok(result.rows_affected())
    }

    /// Deletes products whose name contains the fragment, cascading per
    /// match. Returns the number of products removed.
    pub async fn delete_by_name(&self, fragment: &str) -> DbResult<u64> {
        let pattern = format!("%{}%", fragment.trim());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            "DELETE FROM stock_movements WHERE product_id IN \
             (SELECT id FROM products WHERE name LIKE ?1)",
        )
        .bind(&pattern)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM invoice_items WHERE product_id IN \
             (SELECT id FROM products WHERE name LIKE ?1)",
        )
        .bind(&pattern)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM products WHERE name LIKE ?1")
            .bind(&pattern)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(pattern = %pattern, count = result.rows_affected(), "Products deleted by name");
        Ok(result.rows_affected())
    }
}

/// Clears one product's stock movements and invoice items inside the
/// caller's transaction.
async fn cascade_delete_one(tx: &mut Transaction<'_, Sqlite>, product_id: &str) -> DbResult<()> {
    sqlx::query("DELETE FROM stock_movements WHERE product_id = ?1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM invoice_items WHERE product_id = ?1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Flattens a validated request into a Product row.
fn build_product(
    id: String,
    req: &NewProduct,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
) -> Product {
    let mut product = Product {
        id,
        sku: req.sku.as_deref().map(|s| s.trim().to_string()),
        name: req.name.trim().to_string(),
        price_cents: req.price_cents,
        cost_price_cents: req.cost_price_cents,
        stock_quantity: req.stock_quantity,
        low_stock_threshold: req.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        product_type: req.spec.product_type(),
        tire_width: None,
        tire_aspect_ratio: None,
        tire_diameter: None,
        tire_load_index: None,
        tire_speed_rating: None,
        wheel_diameter: None,
        wheel_width: None,
        wheel_pcd: None,
        wheel_offset: None,
        wheel_center_bore: None,
        wheel_stud_count: None,
        wheel_stud_type: None,
        size_display: req.spec.size_display(),
        created_at,
        updated_at,
    };

    match &req.spec {
        ProductSpec::Tire(t) => {
            product.tire_width = Some(t.width);
            product.tire_aspect_ratio = Some(t.aspect_ratio);
            product.tire_diameter = Some(t.diameter);
            product.tire_load_index = t.load_index.clone();
            product.tire_speed_rating = t.speed_rating.clone();
        }
        ProductSpec::AlloyWheel(w) => {
            product.wheel_diameter = Some(w.diameter);
            product.wheel_width = Some(w.width);
            product.wheel_pcd = w.pcd.clone();
            product.wheel_offset = w.offset;
            product.wheel_center_bore = w.center_bore;
            product.wheel_stud_count = w.stud_count;
            product.wheel_stud_type = w.stud_type.clone();
        }
        ProductSpec::General => {}
    }

    product
}

/// Binds every product column, in `PRODUCT_COLUMNS` order.
fn bind_product<'q>(
    query: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    p: &'q Product,
) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(&p.id)
        .bind(&p.sku)
        .bind(&p.name)
        .bind(p.price_cents)
        .bind(p.cost_price_cents)
        .bind(p.stock_quantity)
        .bind(p.low_stock_threshold)
        .bind(p.product_type)
        .bind(p.tire_width)
        .bind(p.tire_aspect_ratio)
        .bind(p.tire_diameter)
        .bind(&p.tire_load_index)
        .bind(&p.tire_speed_rating)
        .bind(p.wheel_diameter)
        .bind(p.wheel_width)
        .bind(&p.wheel_pcd)
        .bind(p.wheel_offset)
        .bind(p.wheel_center_bore)
        .bind(p.wheel_stud_count)
        .bind(&p.wheel_stud_type)
        .bind(&p.size_display)
        .bind(p.created_at)
        .bind(p.updated_at)
}

// =============================================================================
// Unit Tests
// =============================================================================
