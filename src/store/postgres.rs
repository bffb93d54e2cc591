//! PostgreSQL booking store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Row};
use uuid::Uuid;

use super::{BookingStore, StoreError};
use crate::models::{
    LedgerEntry, LedgerEntryType, LedgerLine, NewOrder, Order, OrderId, OrderStatus, UserId, Zone,
    ZoneId,
};

const ORDER_COLUMNS: &str = "id, user_id, zone_id, pickup_date, is_express, is_overflow, \
                             price_cents, status, notes, created_at";

const LEDGER_COLUMNS: &str = "id, order_id, amount_cents, type, description, created_at";

/// Booking store backed by a shared sqlx connection pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let status: String = row.try_get("status")?;
    Ok(Order {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        zone_id: row.try_get("zone_id")?,
        pickup_date: row.try_get("pickup_date")?,
        is_express: row.try_get("is_express")?,
        is_overflow: row.try_get("is_overflow")?,
        price_cents: row.try_get("price_cents")?,
        status: status.parse::<OrderStatus>().map_err(StoreError::CorruptRow)?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn zone_from_row(row: &PgRow) -> Result<Zone, StoreError> {
    Ok(Zone {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        capacity_per_day: row.try_get("capacity_per_day")?,
    })
}

fn ledger_from_row(row: &PgRow) -> Result<LedgerEntry, StoreError> {
    let entry_type: String = row.try_get("type")?;
    Ok(LedgerEntry {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        amount_cents: row.try_get("amount_cents")?,
        entry_type: entry_type
            .parse::<LedgerEntryType>()
            .map_err(StoreError::CorruptRow)?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

async fn insert_order_row<'e, E: PgExecutor<'e>>(
    executor: E,
    order: &NewOrder,
) -> Result<Order, StoreError> {
    let sql = format!(
        r#"
        INSERT INTO orders
            (id, user_id, zone_id, pickup_date, is_express, is_overflow, price_cents, status, notes)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {}
        "#,
        ORDER_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(order.user_id)
        .bind(order.zone_id)
        .bind(order.pickup_date)
        .bind(order.is_express)
        .bind(order.is_overflow)
        .bind(order.price_cents)
        .bind(OrderStatus::Created.as_str())
        .bind(order.notes.as_deref())
        .fetch_one(executor)
        .await?;

    order_from_row(&row)
}

/// One statement for the whole batch, so the lines land together or not at all.
async fn insert_ledger_rows<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: OrderId,
    lines: &[LedgerLine],
) -> Result<Vec<LedgerEntry>, StoreError> {
    let amounts: Vec<i64> = lines.iter().map(|l| l.amount_cents).collect();
    let types: Vec<String> = lines
        .iter()
        .map(|l| l.entry_type.as_str().to_string())
        .collect();
    let descriptions: Vec<String> = lines.iter().map(|l| l.description.to_string()).collect();

    let sql = format!(
        r#"
        INSERT INTO ledger (order_id, amount_cents, type, description)
        SELECT $1, amount_cents, type, description
        FROM UNNEST($2::BIGINT[], $3::TEXT[], $4::TEXT[]) AS l(amount_cents, type, description)
        RETURNING {}
        "#,
        LEDGER_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(order_id)
        .bind(amounts)
        .bind(types)
        .bind(descriptions)
        .fetch_all(executor)
        .await?;

    rows.iter().map(ledger_from_row).collect()
}

#[async_trait]
impl BookingStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, StoreError> {
        let rows = sqlx::query("SELECT id, name, capacity_per_day FROM zones ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(zone_from_row).collect()
    }

    async fn get_zone(&self, zone_id: ZoneId) -> Result<Option<Zone>, StoreError> {
        let row = sqlx::query("SELECT id, name, capacity_per_day FROM zones WHERE id = $1")
            .bind(zone_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(zone_from_row).transpose()
    }

    async fn count_orders_by_zone(
        &self,
        pickup_date: NaiveDate,
    ) -> Result<HashMap<ZoneId, i64>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT zone_id, COUNT(*) AS orders_count
            FROM orders
            WHERE pickup_date = $1
            GROUP BY zone_id
            "#,
        )
        .bind(pickup_date)
        .fetch_all(&self.pool)
        .await?;

        let mut counts: HashMap<ZoneId, i64> = HashMap::with_capacity(rows.len());
        for row in rows {
            counts.insert(row.try_get("zone_id")?, row.try_get("orders_count")?);
        }
        Ok(counts)
    }

    async fn count_orders(
        &self,
        zone_id: ZoneId,
        pickup_date: NaiveDate,
    ) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE zone_id = $1 AND pickup_date = $2",
        )
        .bind(zone_id)
        .bind(pickup_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        insert_order_row(&self.pool, order).await
    }

    async fn insert_ledger_lines(
        &self,
        order_id: OrderId,
        lines: &[LedgerLine],
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        insert_ledger_rows(&self.pool, order_id, lines).await
    }

    async fn insert_order_with_ledger(
        &self,
        order: &NewOrder,
        lines: &[LedgerLine],
    ) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = insert_order_row(&mut *tx, order).await?;
        insert_ledger_rows(&mut *tx, row.id, lines).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn list_orders(&self, user_id: Option<UserId>) -> Result<Vec<Order>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM orders
            WHERE ($1::UUID IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#,
            ORDER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(order_from_row).collect()
    }

    async fn list_ledger(&self, order_id: Option<OrderId>) -> Result<Vec<LedgerEntry>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM ledger
            WHERE ($1::UUID IS NULL OR order_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
            LEDGER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(ledger_from_row).collect()
    }

    async fn confirm_order(&self, order_id: OrderId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1
            WHERE id = $2 AND status = $3
            "#,
        )
        .bind(OrderStatus::Confirmed.as_str())
        .bind(order_id)
        .bind(OrderStatus::Created.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
