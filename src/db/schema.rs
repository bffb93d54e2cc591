use anyhow::Result;
use sqlx::PgPool;

/// Initialize PostgreSQL schema for the booking database
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing PostgreSQL schema...");

    for (name, ddl) in [
        ("zones table", CREATE_ZONES_TABLE),
        ("orders table", CREATE_ORDERS_TABLE),
        ("orders zone/date index", CREATE_ORDERS_ZONE_DATE_INDEX),
        ("orders user index", CREATE_ORDERS_USER_INDEX),
        ("ledger table", CREATE_LEDGER_TABLE),
        ("ledger order index", CREATE_LEDGER_ORDER_INDEX),
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", name, e))?;
    }

    // seed an empty database
    let zone_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM zones")
        .fetch_one(pool)
        .await?;
    if zone_count == 0 {
        sqlx::query(SEED_ZONES)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed zones: {}", e))?;
        tracing::info!("Seeded default zones");
    }

    tracing::info!("PostgreSQL schema ready");
    Ok(())
}

const CREATE_ZONES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS zones (
    id               BIGSERIAL PRIMARY KEY,
    name             TEXT NOT NULL,
    capacity_per_day INTEGER NOT NULL CHECK (capacity_per_day >= 0)
)
"#;

const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id          UUID PRIMARY KEY,
    user_id     UUID,
    zone_id     BIGINT NOT NULL REFERENCES zones (id),
    pickup_date DATE NOT NULL,
    is_express  BOOLEAN NOT NULL DEFAULT FALSE,
    is_overflow BOOLEAN NOT NULL DEFAULT FALSE,
    price_cents BIGINT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'created' CHECK (status IN ('created', 'confirmed')),
    notes       TEXT,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_ORDERS_ZONE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_orders_zone_date ON orders (zone_id, pickup_date)";

const CREATE_ORDERS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_orders_user ON orders (user_id, created_at DESC)";

const CREATE_LEDGER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger (
    id           BIGSERIAL PRIMARY KEY,
    order_id     UUID NOT NULL REFERENCES orders (id),
    amount_cents BIGINT NOT NULL,
    type         TEXT NOT NULL CHECK (type IN ('order', 'bonus_pool')),
    description  TEXT NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_ORDER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_ledger_order ON ledger (order_id, created_at DESC)";

const SEED_ZONES: &str = r#"
INSERT INTO zones (name, capacity_per_day) VALUES
    ('Downtown', 20),
    ('Riverside', 10),
    ('Hillcrest', 5)
"#;
