//! # Invoice Repository
//!
//! The transactional core of the system. Creating an invoice applies, in
//! ONE transaction: the invoice row, every line-item snapshot, every
//! stock decrement, and every sale movement. Any failure rolls the whole
//! sale back; a partial invoice is never visible.
//!
//! Invoices are an append-only ledger. There is no update or delete
//! operation on this repository.
//!
//! ## Timestamps
//! Invoices are stamped with local wall-clock time so that every
//! date-bucketed report runs on the shop's calendar days, not UTC days.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use tread_core::validation::validate_invoice_draft;
use tread_core::{
    local_now, BusinessDate, CreatedInvoice, Invoice, InvoiceDraft, InvoiceItem, InvoiceWithItems,
    DEFAULT_INVOICE_PAGE, INVOICE_STATUS_COMPLETED,
};

/// Column list shared by every invoice SELECT.
const INVOICE_COLUMNS: &str = "\
    id, invoice_number, customer_name, customer_phone, customer_email, \
    subtotal_cents, tax_cents, discount_cents, total_cents, \
    payment_method, status, created_at, updated_at";

/// Repository for invoice operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    // =========================================================================
    // The Core Transaction
    // =========================================================================

    /// Creates an invoice from a priced cart, atomically.
    ///
    /// Steps, all-or-nothing:
    /// 1. Generate `invoice_number` from the current timestamp
    ///    (`INV-{epoch-millis}`). Storage still enforces uniqueness; a
    ///    collision surfaces as `UniqueViolation`.
    /// 2. Compute totals from the supplied lines. Prices were frozen at
    ///    add-to-cart time and are NOT re-read from the product rows.
    /// 3. Insert the invoice row with local wall-clock `created_at`.
    /// 4. Per line: insert the snapshot item, decrement the product's
    ///    stock (no floor — over-sell goes negative), append the sale
    ///    movement referencing this invoice.
    pub async fn create(&self, draft: &InvoiceDraft) -> DbResult<CreatedInvoice> {
        validate_invoice_draft(draft)?;

        let id = Uuid::new_v4().to_string();
        let invoice_number = generate_invoice_number();
        let now = local_now();

        let subtotal_cents = draft.subtotal().cents();
        let total_cents = draft.total().cents();

        debug!(
            invoice_number = %invoice_number,
            lines = draft.lines.len(),
            total_cents,
            "Creating invoice"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_number, customer_name, customer_phone, customer_email,
                subtotal_cents, tax_cents, discount_cents, total_cents,
                payment_method, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&id)
        .bind(&invoice_number)
        .bind(non_empty(draft.customer.name.as_deref()))
        .bind(non_empty(draft.customer.phone.as_deref()))
        .bind(non_empty(draft.customer.email.as_deref()))
        .bind(subtotal_cents)
        .bind(draft.tax_cents)
        .bind(draft.discount_cents)
        .bind(total_cents)
        .bind(draft.payment_method)
        .bind(INVOICE_STATUS_COMPLETED)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, product_id, product_name,
                    quantity, unit_price_cents, total_price_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.line_total().cents())
            .execute(&mut *tx)
            .await?;

            stock::decrement_for_sale(&mut tx, &line.product_id, line.quantity, &id).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(invoice_number = %invoice_number, total_cents, "Invoice created");

        Ok(CreatedInvoice { id, invoice_number })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Most recent invoices, newest first. `None` uses the default page
    /// size.
    pub async fn get_all(&self, limit: Option<i64>) -> DbResult<Vec<Invoice>> {
        let limit = limit.unwrap_or(DEFAULT_INVOICE_PAGE);

        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    /// One invoice joined with its items, in line order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InvoiceWithItems>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1");
        let Some(invoice) = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT id, invoice_id, product_id, product_name,
                   quantity, unit_price_cents, total_price_cents
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Invoices whose local calendar date falls in `[start, end]`,
    /// inclusive on both ends, newest first.
    pub async fn get_by_date_range(
        &self,
        start: BusinessDate,
        end: BusinessDate,
    ) -> DbResult<Vec<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE date(created_at) BETWEEN ?1 AND ?2 \
             ORDER BY created_at DESC, rowid DESC"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(start.date())
            .bind(end.date())
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }
}

/// Generates the invoice number from the current timestamp.
///
/// Collision probability at one terminal is negligible; the UNIQUE
/// constraint on the column remains the backstop.
fn generate_invoice_number() -> String {
    format!("INV-{}", Utc::now().timestamp_millis())
}

/// Trims and drops empty customer fields so reports can count customers
/// by non-empty name.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tread_core::{
        CartLine, CustomerInfo, MovementType, NewProduct, PaymentMethod, ProductSpec,
    };

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> String {
        db.products()
            .create(&NewProduct {
                sku: None,
                name: name.to_string(),
                price_cents,
                cost_price_cents: 0,
                stock_quantity: stock,
                low_stock_threshold: None,
                spec: ProductSpec::General,
            })
            .await
            .unwrap()
            .id
    }

    fn draft_for(lines: Vec<CartLine>) -> InvoiceDraft {
        InvoiceDraft {
            lines,
            customer: CustomerInfo::default(),
            payment_method: PaymentMethod::Cash,
            tax_cents: 0,
            discount_cents: 0,
        }
    }

    fn line(product_id: &str, name: &str, qty: i64, unit_cents: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            product_name: name.to_string(),
            quantity: qty,
            unit_price_cents: unit_cents,
        }
    }

    #[tokio::test]
    async fn test_sell_three_of_ten() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Valve stem", 1000, 10).await;

        let created = db
            .invoices()
            .create(&draft_for(vec![line(&product_id, "Valve stem", 3, 1000)]))
            .await
            .unwrap();
        assert!(created.invoice_number.starts_with("INV-"));

        let fetched = db.invoices().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.invoice.subtotal_cents, 3000);
        assert_eq!(fetched.invoice.total_cents, 3000);
        assert_eq!(fetched.invoice.status, "completed");
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].total_price_cents, 3000);

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 7);

        let movements = db.stock().movements_for_product(&product_id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MovementType::Sale);
        assert_eq!(movements[0].quantity, 3);
        assert_eq!(movements[0].reference_id.as_deref(), Some(created.id.as_str()));
    }

    #[tokio::test]
    async fn test_arithmetic_invariants() {
        let db = test_db().await;
        let a = seed_product(&db, "Tire A", 550_000, 20).await;
        let b = seed_product(&db, "Balance weights", 1_500, 200).await;

        let mut draft = draft_for(vec![
            line(&a, "Tire A", 4, 550_000),
            line(&b, "Balance weights", 8, 1_500),
        ]);
        draft.tax_cents = 39_600;
        draft.discount_cents = 12_000;

        let created = db.invoices().create(&draft).await.unwrap();
        let fetched = db.invoices().get_by_id(&created.id).await.unwrap().unwrap();

        let item_sum: i64 = fetched.items.iter().map(|i| i.total_price_cents).sum();
        assert_eq!(fetched.invoice.subtotal_cents, item_sum);
        assert_eq!(fetched.invoice.subtotal_cents, 2_212_000);
        assert_eq!(
            fetched.invoice.total_cents,
            fetched.invoice.subtotal_cents + 39_600 - 12_000
        );
    }

    #[tokio::test]
    async fn test_oversell_drives_stock_negative() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Last pair", 1000, 2).await;

        // No floor and no re-check on the sale path: the stale cart wins
        db.invoices()
            .create(&draft_for(vec![line(&product_id, "Last pair", 5, 1000)]))
            .await
            .unwrap();

        let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, -3);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_everything() {
        let db = test_db().await;
        let good = seed_product(&db, "Good product", 1000, 10).await;

        // Second line references a product that doesn't exist; the whole
        // sale must vanish, including the first line's side effects.
        let err = db
            .invoices()
            .create(&draft_for(vec![
                line(&good, "Good product", 2, 1000),
                line("missing", "Ghost", 1, 500),
            ]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        assert!(db.invoices().get_all(None).await.unwrap().is_empty());

        let product = db.products().get_by_id(&good).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 10);
        assert!(db.stock().movements_for_product(&good).await.unwrap().is_empty());

        let item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(item_count, 0);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;
        assert!(matches!(
            db.invoices().create(&draft_for(vec![])).await.unwrap_err(),
            DbError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_invoice_number_unique_constraint() {
        let db = test_db().await;
        let now = local_now();

        for _ in 0..2 {
            let result = sqlx::query(
                r#"
                INSERT INTO invoices (
                    id, invoice_number, subtotal_cents, tax_cents, discount_cents,
                    total_cents, payment_method, status, created_at, updated_at
                ) VALUES (?1, 'INV-1', 100, 0, 0, 100, 'cash', 'completed', ?2, ?2)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(now)
            .execute(db.pool())
            .await;

            if result.is_err() {
                let err: DbError = result.unwrap_err().into();
                assert!(matches!(err, DbError::UniqueViolation { .. }));
                return;
            }
        }
        panic!("duplicate invoice number was accepted");
    }

    #[tokio::test]
    async fn test_customer_snapshot_and_blank_normalization() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Tire", 1000, 10).await;

        let mut draft = draft_for(vec![line(&product_id, "Tire", 1, 1000)]);
        draft.customer = CustomerInfo {
            name: Some("  Imran Khan  ".to_string()),
            phone: Some("".to_string()),
            email: None,
        };
        let created = db.invoices().create(&draft).await.unwrap();

        let fetched = db.invoices().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.invoice.customer_name.as_deref(), Some("Imran Khan"));
        assert_eq!(fetched.invoice.customer_phone, None);
    }

    #[tokio::test]
    async fn test_product_delete_keeps_other_lines() {
        let db = test_db().await;
        let a = seed_product(&db, "Tire A", 1000, 10).await;
        let b = seed_product(&db, "Tire B", 2000, 10).await;

        let created = db
            .invoices()
            .create(&draft_for(vec![
                line(&a, "Tire A", 1, 1000),
                line(&b, "Tire B", 2, 2000),
            ]))
            .await
            .unwrap();

        // Cascade removes A's ledger and line rows; the invoice itself
        // and B's snapshot stay untouched.
        db.products().delete(&a).await.unwrap();

        let fetched = db.invoices().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.invoice.total_cents, 5000);
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].product_name, "Tire B");
        assert_eq!(fetched.items[0].unit_price_cents, 2000);

        assert!(db.stock().movements_for_product(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_and_date_range() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Tire", 1000, 100).await;

        for _ in 0..3 {
            db.invoices()
                .create(&draft_for(vec![line(&product_id, "Tire", 1, 1000)]))
                .await
                .unwrap();
        }

        let all = db.invoices().get_all(Some(2)).await.unwrap();
        assert_eq!(all.len(), 2);

        let today = BusinessDate::today();
        let hits = db.invoices().get_by_date_range(today, today).await.unwrap();
        assert_eq!(hits.len(), 3);

        let yesterday = today.days_ago(1);
        let misses = db
            .invoices()
            .get_by_date_range(yesterday, yesterday)
            .await
            .unwrap();
        assert!(misses.is_empty());
    }
}
