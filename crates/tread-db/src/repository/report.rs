//! # Report Repository
//!
//! Read-only aggregation over invoices and invoice items. No mutation
//! happens here, ever.
//!
//! Every date filter compares `date(created_at)` against a bound
//! [`BusinessDate`]: the local-calendar-day contract shared with the
//! invoice engine. Empty data produces zeroed sums and empty lists, not
//! errors.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::product::PRODUCT_COLUMNS;
use tread_core::reports::{
    CustomerReport, CustomerSpend, DailySalesReport, DayBreakdown, PaymentBreakdown,
    ProductPerformanceReport, ProductRevenue, RangeSalesReport, SalesTotals,
};
use tread_core::{BusinessDate, Product, SLOW_MOVER_WINDOW_DAYS};

/// How many rows the top-N report sections return.
const TOP_N: i64 = 10;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    // =========================================================================
    // Daily Summary
    // =========================================================================

    /// Sales summary for one local calendar date.
    pub async fn daily_sales(&self, date: BusinessDate) -> DbResult<DailySalesReport> {
        debug!(date = %date, "Building daily sales report");

        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT COUNT(*)                        AS total_invoices,
                   COALESCE(SUM(total_cents), 0)    AS total_cents,
                   COALESCE(SUM(subtotal_cents), 0) AS subtotal_cents,
                   COALESCE(SUM(tax_cents), 0)      AS tax_cents,
                   COALESCE(SUM(discount_cents), 0) AS discount_cents
            FROM invoices
            WHERE date(created_at) = ?1
            "#,
        )
        .bind(date.date())
        .fetch_one(&self.pool)
        .await?;

        let top_products = sqlx::query_as::<_, ProductRevenue>(
            r#"
            SELECT ii.product_id,
                   ii.product_name,
                   SUM(ii.quantity)          AS quantity_sold,
                   SUM(ii.total_price_cents) AS revenue_cents
            FROM invoice_items ii
            JOIN invoices i ON i.id = ii.invoice_id
            WHERE date(i.created_at) = ?1
            GROUP BY ii.product_id, ii.product_name
            ORDER BY revenue_cents DESC
            LIMIT ?2
            "#,
        )
        .bind(date.date())
        .bind(TOP_N)
        .fetch_all(&self.pool)
        .await?;

        Ok(DailySalesReport {
            date,
            totals,
            top_products,
        })
    }

    // =========================================================================
    // Range Summary
    // =========================================================================

    /// Sales summary over `[start, end]`, inclusive on both ends.
    pub async fn date_range_sales(
        &self,
        start: BusinessDate,
        end: BusinessDate,
    ) -> DbResult<RangeSalesReport> {
        debug!(start = %start, end = %end, "Building range sales report");

        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT COUNT(*)                        AS total_invoices,
                   COALESCE(SUM(total_cents), 0)    AS total_cents,
                   COALESCE(SUM(subtotal_cents), 0) AS subtotal_cents,
                   COALESCE(SUM(tax_cents), 0)      AS tax_cents,
                   COALESCE(SUM(discount_cents), 0) AS discount_cents
            FROM invoices
            WHERE date(created_at) BETWEEN ?1 AND ?2
            "#,
        )
        .bind(start.date())
        .bind(end.date())
        .fetch_one(&self.pool)
        .await?;

        let average: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(total_cents) FROM invoices WHERE date(created_at) BETWEEN ?1 AND ?2",
        )
        .bind(start.date())
        .bind(end.date())
        .fetch_one(&self.pool)
        .await?;

        let daily = sqlx::query_as::<_, DayBreakdown>(
            r#"
            SELECT date(created_at)              AS date,
                   COUNT(*)                      AS invoice_count,
                   COALESCE(SUM(total_cents), 0) AS revenue_cents
            FROM invoices
            WHERE date(created_at) BETWEEN ?1 AND ?2
            GROUP BY date(created_at)
            ORDER BY date(created_at)
            "#,
        )
        .bind(start.date())
        .bind(end.date())
        .fetch_all(&self.pool)
        .await?;

        let top_products = sqlx::query_as::<_, ProductRevenue>(
            r#"
            SELECT ii.product_id,
                   ii.product_name,
                   SUM(ii.quantity)          AS quantity_sold,
                   SUM(ii.total_price_cents) AS revenue_cents
            FROM invoice_items ii
            JOIN invoices i ON i.id = ii.invoice_id
            WHERE date(i.created_at) BETWEEN ?1 AND ?2
            GROUP BY ii.product_id, ii.product_name
            ORDER BY revenue_cents DESC
            LIMIT ?3
            "#,
        )
        .bind(start.date())
        .bind(end.date())
        .bind(TOP_N)
        .fetch_all(&self.pool)
        .await?;

        let payment_methods = sqlx::query_as::<_, PaymentBreakdown>(
            r#"
            SELECT payment_method,
                   COUNT(*)                      AS invoice_count,
                   COALESCE(SUM(total_cents), 0) AS amount_cents
            FROM invoices
            WHERE date(created_at) BETWEEN ?1 AND ?2
            GROUP BY payment_method
            ORDER BY amount_cents DESC
            "#,
        )
        .bind(start.date())
        .bind(end.date())
        .fetch_all(&self.pool)
        .await?;

        Ok(RangeSalesReport {
            start,
            end,
            totals,
            average_invoice_cents: average.unwrap_or(0.0).round() as i64,
            daily,
            top_products,
            payment_methods,
        })
    }

    // =========================================================================
    // Product Performance
    // =========================================================================

    /// Best sellers by quantity, and slow movers: stocked products with
    /// no sale inside the trailing window (or never sold at all).
    pub async fn product_performance(&self) -> DbResult<ProductPerformanceReport> {
        let best_sellers = sqlx::query_as::<_, ProductRevenue>(
            r#"
            SELECT ii.product_id,
                   ii.product_name,
                   SUM(ii.quantity)          AS quantity_sold,
                   SUM(ii.total_price_cents) AS revenue_cents
            FROM invoice_items ii
            GROUP BY ii.product_id, ii.product_name
            ORDER BY quantity_sold DESC
            LIMIT ?1
            "#,
        )
        .bind(TOP_N)
        .fetch_all(&self.pool)
        .await?;

        let cutoff = BusinessDate::today().days_ago(SLOW_MOVER_WINDOW_DAYS);

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock_quantity > 0 \
               AND id NOT IN ( \
                   SELECT ii.product_id \
                   FROM invoice_items ii \
                   JOIN invoices i ON i.id = ii.invoice_id \
                   WHERE date(i.created_at) >= ?1) \
             ORDER BY stock_quantity DESC"
        );
        let slow_movers = sqlx::query_as::<_, Product>(&sql)
            .bind(cutoff.date())
            .fetch_all(&self.pool)
            .await?;

        Ok(ProductPerformanceReport {
            best_sellers,
            slow_movers,
        })
    }

    // =========================================================================
    // Customer Report
    // =========================================================================

    /// Customer base summary across all invoices.
    ///
    /// Customers are identified by non-empty `customer_name`; anonymous
    /// walk-in sales don't count.
    pub async fn customer_report(&self) -> DbResult<CustomerReport> {
        let total_customers: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT customer_name) FROM invoices \
             WHERE customer_name IS NOT NULL AND customer_name <> ''",
        )
        .fetch_one(&self.pool)
        .await?;

        let repeat_customers: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM (
                SELECT customer_name
                FROM invoices
                WHERE customer_name IS NOT NULL AND customer_name <> ''
                GROUP BY customer_name
                HAVING COUNT(*) > 1
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let average: Option<f64> = sqlx::query_scalar("SELECT AVG(total_cents) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        let top_customers = sqlx::query_as::<_, CustomerSpend>(
            r#"
            SELECT customer_name,
                   COUNT(*)                      AS invoice_count,
                   COALESCE(SUM(total_cents), 0) AS total_spent_cents
            FROM invoices
            WHERE customer_name IS NOT NULL AND customer_name <> ''
            GROUP BY customer_name
            ORDER BY total_spent_cents DESC
            LIMIT ?1
            "#,
        )
        .bind(TOP_N)
        .fetch_all(&self.pool)
        .await?;

        Ok(CustomerReport {
            total_customers,
            repeat_customers,
            average_invoice_cents: average.unwrap_or(0.0).round() as i64,
            top_customers,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tread_core::{
        CartLine, CustomerInfo, InvoiceDraft, NewProduct, PaymentMethod, ProductSpec,
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

    async fn sell(
        db: &Database,
        product_id: &str,
        name: &str,
        qty: i64,
        unit_cents: i64,
        customer: Option<&str>,
        method: PaymentMethod,
    ) {
        db.invoices()
            .create(&InvoiceDraft {
                lines: vec![CartLine {
                    product_id: product_id.to_string(),
                    product_name: name.to_string(),
                    quantity: qty,
                    unit_price_cents: unit_cents,
                }],
                customer: CustomerInfo {
                    name: customer.map(String::from),
                    phone: None,
                    email: None,
                },
                payment_method: method,
                tax_cents: 0,
                discount_cents: 0,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_day_reports_zeros() {
        let db = test_db().await;

        let report = db.reports().daily_sales(BusinessDate::today()).await.unwrap();
        assert_eq!(report.totals.total_invoices, 0);
        assert_eq!(report.totals.total_cents, 0);
        assert_eq!(report.totals.tax_cents, 0);
        assert!(report.top_products.is_empty());
    }

    #[tokio::test]
    async fn test_daily_sales_aggregates() {
        let db = test_db().await;
        let a = seed_product(&db, "Tire A", 550_000, 50).await;
        let b = seed_product(&db, "Tire B", 480_000, 50).await;

        sell(&db, &a, "Tire A", 4, 550_000, None, PaymentMethod::Cash).await;
        sell(&db, &b, "Tire B", 2, 480_000, None, PaymentMethod::Card).await;

        let report = db.reports().daily_sales(BusinessDate::today()).await.unwrap();
        assert_eq!(report.totals.total_invoices, 2);
        assert_eq!(report.totals.total_cents, 4 * 550_000 + 2 * 480_000);

        // Ranked by revenue
        assert_eq!(report.top_products.len(), 2);
        assert_eq!(report.top_products[0].product_name, "Tire A");
        assert_eq!(report.top_products[0].quantity_sold, 4);
    }

    #[tokio::test]
    async fn test_range_sales_breakdowns() {
        let db = test_db().await;
        let a = seed_product(&db, "Tire A", 100_000, 50).await;

        sell(&db, &a, "Tire A", 1, 100_000, None, PaymentMethod::Cash).await;
        sell(&db, &a, "Tire A", 2, 100_000, None, PaymentMethod::Cash).await;
        sell(&db, &a, "Tire A", 1, 100_000, None, PaymentMethod::Card).await;

        let today = BusinessDate::today();
        let report = db
            .reports()
            .date_range_sales(today.days_ago(7), today)
            .await
            .unwrap();

        assert_eq!(report.totals.total_invoices, 3);
        assert_eq!(report.totals.total_cents, 400_000);
        assert_eq!(report.average_invoice_cents, 400_000 / 3);

        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.daily[0].date, today);
        assert_eq!(report.daily[0].invoice_count, 3);

        let cash = report
            .payment_methods
            .iter()
            .find(|p| p.payment_method == PaymentMethod::Cash)
            .unwrap();
        assert_eq!(cash.invoice_count, 2);
        assert_eq!(cash.amount_cents, 300_000);
    }

    #[tokio::test]
    async fn test_product_performance() {
        let db = test_db().await;
        let fast = seed_product(&db, "Fast mover", 100_000, 50).await;
        let quiet = seed_product(&db, "Never sold", 100_000, 30).await;
        let empty = seed_product(&db, "Out of stock", 100_000, 0).await;

        sell(&db, &fast, "Fast mover", 6, 100_000, None, PaymentMethod::Cash).await;

        let report = db.reports().product_performance().await.unwrap();

        assert_eq!(report.best_sellers.len(), 1);
        assert_eq!(report.best_sellers[0].product_id, fast);
        assert_eq!(report.best_sellers[0].quantity_sold, 6);

        // Never sold + in stock → slow mover; sold today and zero-stock
        // rows are excluded
        let slow_ids: Vec<&str> = report.slow_movers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(slow_ids, vec![quiet.as_str()]);
        assert!(!slow_ids.contains(&empty.as_str()));
    }

    #[tokio::test]
    async fn test_customer_report() {
        let db = test_db().await;
        let a = seed_product(&db, "Tire A", 100_000, 50).await;

        sell(&db, &a, "Tire A", 1, 100_000, Some("Ali"), PaymentMethod::Cash).await;
        sell(&db, &a, "Tire A", 1, 100_000, Some("Ali"), PaymentMethod::Cash).await;
        sell(&db, &a, "Tire A", 2, 100_000, Some("Sara"), PaymentMethod::Card).await;
        sell(&db, &a, "Tire A", 1, 100_000, None, PaymentMethod::Cash).await;

        let report = db.reports().customer_report().await.unwrap();
        assert_eq!(report.total_customers, 2);
        assert_eq!(report.repeat_customers, 1);
        // 5 units at 100_000 over 4 invoices
        assert_eq!(report.average_invoice_cents, 125_000);

        assert_eq!(report.top_customers[0].customer_name, "Sara");
        assert_eq!(report.top_customers[0].total_spent_cents, 200_000);
    }

    #[tokio::test]
    async fn test_empty_customer_report() {
        let db = test_db().await;
        let report = db.reports().customer_report().await.unwrap();
        assert_eq!(report.total_customers, 0);
        assert_eq!(report.repeat_customers, 0);
        assert_eq!(report.average_invoice_cents, 0);
        assert!(report.top_customers.is_empty());
    }
}
