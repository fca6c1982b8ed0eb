//! # Stock Ledger Repository
//!
//! Mutates `stock_quantity` and appends the immutable movement trail.
//! Every stock change in the system lands here as exactly one
//! StockMovement row: manual adjustments carry the signed applied delta,
//! sale decrements carry the positive sold quantity with the invoice as
//! reference.
//!
//! This component does not decide atomicity on its own. A manual adjust
//! wraps its product update and movement append in one transaction here;
//! the sale path runs inside the invoice engine's transaction via
//! [`decrement_for_sale`].

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tread_core::validation::validate_adjustment_amount;
use tread_core::{local_now, MovementType, StockAdjustMode, StockMovement};

/// Repository for stock ledger operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Appends a movement row without touching the product. Used for
    /// audit entries whose stock effect is applied elsewhere (purchases
    /// and returns recorded by the receiving flow).
    pub async fn record_movement(
        &self,
        product_id: &str,
        movement_type: MovementType,
        quantity: i64,
        reference_id: Option<&str>,
        notes: Option<&str>,
    ) -> DbResult<StockMovement> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let movement = append_movement(
            &mut tx,
            product_id,
            movement_type,
            quantity,
            reference_id,
            notes,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(movement)
    }

    /// Manually adjusts a product's stock and records the signed delta.
    ///
    /// - `Add`:      new = current + amount
    /// - `Subtract`: new = max(0, current − amount), floored at zero
    /// - `Set`:      new = amount
    ///
    /// Product update and movement append commit together. Returns the
    /// resulting stock level.
    pub async fn adjust(
        &self,
        product_id: &str,
        mode: StockAdjustMode,
        amount: i64,
    ) -> DbResult<i64> {
        validate_adjustment_amount(amount)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let current: i64 = sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        let new_stock = mode.apply(current, amount);

        sqlx::query("UPDATE products SET stock_quantity = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(product_id)
            .bind(new_stock)
            .bind(local_now())
            .execute(&mut *tx)
            .await?;

        append_movement(
            &mut tx,
            product_id,
            MovementType::Adjustment,
            new_stock - current,
            None,
            None,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(product_id = %product_id, ?mode, amount, new_stock, "Stock adjusted");
        Ok(new_stock)
    }

    /// The movement trail for one product, newest first.
    pub async fn movements_for_product(&self, product_id: &str) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, movement_type, quantity, reference_id, notes, created_at
            FROM stock_movements
            WHERE product_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Appends one movement row inside the caller's transaction.
pub(crate) async fn append_movement(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    movement_type: MovementType,
    quantity: i64,
    reference_id: Option<&str>,
    notes: Option<&str>,
) -> DbResult<StockMovement> {
    let movement = StockMovement {
        id: Uuid::new_v4().to_string(),
        product_id: product_id.to_string(),
        movement_type,
        quantity,
        reference_id: reference_id.map(String::from),
        notes: notes.map(String::from),
        created_at: local_now(),
    };

    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, product_id, movement_type, quantity, reference_id, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.product_id)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(&movement.reference_id)
    .bind(&movement.notes)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(movement)
}

/// Applies a sale decrement inside the invoice engine's transaction.
///
/// The decrement has NO floor and does not re-check current stock, so a
/// stale cart can drive `stock_quantity` negative. That behavior is
/// deliberate and covered by tests; see the invoice engine.
pub(crate) async fn decrement_for_sale(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    quantity: i64,
    invoice_id: &str,
) -> DbResult<()> {
    let result = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity - ?2, updated_at = ?3 WHERE id = ?1",
    )
    .bind(product_id)
    .bind(quantity)
    .bind(local_now())
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", product_id));
    }

    // Sale rows record the positive sold quantity; the movement type
    // carries the direction.
    append_movement(
        tx,
        product_id,
        MovementType::Sale,
        quantity,
        Some(invoice_id),
        None,
    )
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tread_core::{NewProduct, ProductSpec};

    async fn seeded_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                sku: None,
                name: "Valve stem".to_string(),
                price_cents: 250,
                cost_price_cents: 0,
                stock_quantity: 10,
                low_stock_threshold: None,
                spec: ProductSpec::General,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_adjust_add() {
        let (db, id) = seeded_db().await;

        let new_stock = db.stock().adjust(&id, StockAdjustMode::Add, 5).await.unwrap();
        assert_eq!(new_stock, 15);

        let product = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 15);

        let movements = db.stock().movements_for_product(&id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MovementType::Adjustment);
        assert_eq!(movements[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_adjust_subtract_floors_at_zero() {
        let (db, id) = seeded_db().await;

        let new_stock = db
            .stock()
            .adjust(&id, StockAdjustMode::Subtract, 25)
            .await
            .unwrap();
        assert_eq!(new_stock, 0);

        // The recorded delta is what was actually applied
        let movements = db.stock().movements_for_product(&id).await.unwrap();
        assert_eq!(movements[0].quantity, -10);
    }

    #[tokio::test]
    async fn test_adjust_set() {
        let (db, id) = seeded_db().await;

        let new_stock = db.stock().adjust(&id, StockAdjustMode::Set, 42).await.unwrap();
        assert_eq!(new_stock, 42);

        let movements = db.stock().movements_for_product(&id).await.unwrap();
        assert_eq!(movements[0].quantity, 32);
    }

    #[tokio::test]
    async fn test_adjust_rejects_negative_amount() {
        let (db, id) = seeded_db().await;
        assert!(matches!(
            db.stock()
                .adjust(&id, StockAdjustMode::Add, -5)
                .await
                .unwrap_err(),
            DbError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_adjust_missing_product() {
        let (db, _) = seeded_db().await;
        assert!(matches!(
            db.stock()
                .adjust("missing", StockAdjustMode::Add, 1)
                .await
                .unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_record_movement_is_append_only() {
        let (db, id) = seeded_db().await;

        db.stock()
            .record_movement(&id, MovementType::Purchase, 20, None, Some("GRN-114"))
            .await
            .unwrap();

        // Pure audit append: stock untouched
        let product = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 10);

        let movements = db.stock().movements_for_product(&id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MovementType::Purchase);
        assert_eq!(movements[0].notes.as_deref(), Some("GRN-114"));
    }
}
