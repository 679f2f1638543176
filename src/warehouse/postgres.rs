// ABOUTME: PostgreSQL-backed Warehouse - renders TableScans to parameterized SQL
// ABOUTME: Values always travel as statement parameters, never interpolated into text

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

use crate::scan::{CmpOp, TableScan};
use crate::warehouse::Warehouse;

/// Warehouse implementation over a PostgreSQL connection.
///
/// Scans render to `SELECT ... FROM <table> t WHERE ...` with `$n`
/// placeholders; parameter types are left to the engine to infer from the
/// compared column, so predicates work against any column comparable with a
/// string-encoded value (the source-table contract for the timestamp
/// column). All-null-row elimination uses the row-wise NULL test:
/// `t IS NULL` is true exactly when every column of the row is null.
pub struct PgWarehouse {
    client: Client,
}

impl PgWarehouse {
    /// Connect to PostgreSQL and spawn the connection driver task.
    pub async fn connect(conn_str: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .context("Failed to connect to PostgreSQL")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Wrap an already-established client connection.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client.
    ///
    /// Useful for callers that need to perform additional queries.
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn query_scan(
        &self,
        scan: &TableScan,
        projection: &str,
    ) -> Result<Vec<tokio_postgres::Row>> {
        let (sql, params) = build_select(scan, projection);
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|v| v as &(dyn ToSql + Sync)).collect();

        self.client
            .query(&sql, &params)
            .await
            .with_context(|| format!("Failed to execute scan query against {}", scan.table()))
    }
}

#[async_trait]
impl Warehouse for PgWarehouse {
    async fn count(&self, scan: &TableScan) -> Result<u64> {
        let rows = self.query_scan(scan, "count(*)").await?;
        let row = rows
            .first()
            .with_context(|| format!("Count query against {} returned no rows", scan.table()))?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    async fn max_string(&self, scan: &TableScan, column: &str) -> Result<Option<String>> {
        let projection = format!("max(t.\"{}\")::text", column);
        let rows = self.query_scan(scan, &projection).await?;
        let row = rows
            .first()
            .with_context(|| format!("Aggregate query against {} returned no rows", scan.table()))?;
        Ok(row.get(0))
    }

    async fn fetch_strings(&self, scan: &TableScan, column: &str) -> Result<Vec<Option<String>>> {
        let projection = format!("t.\"{}\"::text", column);
        let rows = self.query_scan(scan, &projection).await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn update_where_eq(
        &self,
        table: &str,
        set_column: &str,
        set_value: &str,
        key_column: &str,
        key_value: &str,
    ) -> Result<u64> {
        let sql = build_update(table, set_column, key_column);
        self.client
            .execute(&sql, &[&set_value, &key_value])
            .await
            .with_context(|| format!("Failed to execute update against {}", table))
    }
}

/// Quote a possibly schema-qualified table name part by part.
///
/// `UTILS.CONFIG.TABLES` becomes `"UTILS"."CONFIG"."TABLES"`.
fn quote_table(table: &str) -> String {
    table
        .split('.')
        .map(|part| format!("\"{}\"", part))
        .collect::<Vec<_>>()
        .join(".")
}

/// Render a scan as a SELECT statement with numbered placeholders.
///
/// Returns the SQL text and the parameter values in placeholder order.
fn build_select<'a>(scan: &'a TableScan, projection: &str) -> (String, Vec<&'a str>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<&str> = Vec::new();

    for predicate in scan.predicates() {
        params.push(predicate.value.as_str());
        let op = match predicate.op {
            CmpOp::Eq => "=",
            CmpOp::Gt => ">",
        };
        clauses.push(format!("t.\"{}\" {} ${}", predicate.column, op, params.len()));
    }

    if scan.drops_all_null() {
        clauses.push("NOT (t IS NULL)".to_string());
    }

    let mut sql = format!(
        "SELECT {} FROM {} t",
        projection,
        quote_table(scan.table())
    );
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    (sql, params)
}

/// Render a single-column parameterized update.
///
/// Generates a query like:
/// ```sql
/// UPDATE "UTILS"."CONFIG"."TABLES" SET "silver_last_update" = $1 WHERE "table_name" = $2
/// ```
fn build_update(table: &str, set_column: &str, key_column: &str) -> String {
    format!(
        "UPDATE {} SET \"{}\" = $1 WHERE \"{}\" = $2",
        quote_table(table),
        set_column,
        key_column
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Predicate;

    #[test]
    fn test_build_select_unfiltered() {
        let scan = TableScan::new("ORDERS");
        let (sql, params) = build_select(&scan, "count(*)");

        assert_eq!(sql, "SELECT count(*) FROM \"ORDERS\" t");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_select_with_watermark_predicate() {
        let scan = TableScan::new("ORDERS").filter(Predicate::gt(
            "current_timestamp",
            "2024-01-01T00:00:00",
        ));
        let (sql, params) = build_select(&scan, "count(*)");

        assert_eq!(
            sql,
            "SELECT count(*) FROM \"ORDERS\" t WHERE t.\"current_timestamp\" > $1"
        );
        assert_eq!(params, vec!["2024-01-01T00:00:00"]);
    }

    #[test]
    fn test_build_select_numbers_params_in_order() {
        let scan = TableScan::new("ORDERS")
            .filter(Predicate::gt("current_timestamp", "2024-01-01T00:00:00"))
            .filter(Predicate::eq("region", "EU"));
        let (sql, params) = build_select(&scan, "*");

        assert!(sql.contains("t.\"current_timestamp\" > $1"));
        assert!(sql.contains("t.\"region\" = $2"));
        assert_eq!(params, vec!["2024-01-01T00:00:00", "EU"]);
    }

    #[test]
    fn test_build_select_renders_null_row_filter() {
        let scan = TableScan::new("ORDERS").drop_all_null();
        let (sql, params) = build_select(&scan, "count(*)");

        assert_eq!(
            sql,
            "SELECT count(*) FROM \"ORDERS\" t WHERE NOT (t IS NULL)"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_select_combines_predicates_and_null_filter() {
        let scan = TableScan::new("ORDERS")
            .filter(Predicate::gt("current_timestamp", "2024-01-01T00:00:00"))
            .drop_all_null();
        let (sql, _) = build_select(&scan, "count(*)");

        assert!(sql.contains("t.\"current_timestamp\" > $1 AND NOT (t IS NULL)"));
    }

    #[test]
    fn test_quote_table_qualified_name() {
        assert_eq!(
            quote_table("UTILS.CONFIG.DEV_CONFIG_TABLES"),
            "\"UTILS\".\"CONFIG\".\"DEV_CONFIG_TABLES\""
        );
        assert_eq!(quote_table("orders"), "\"orders\"");
    }

    #[test]
    fn test_build_update_is_fully_parameterized() {
        let sql = build_update(
            "UTILS.CONFIG.DEV_CONFIG_TABLES",
            "silver_last_update",
            "table_name",
        );

        assert_eq!(
            sql,
            "UPDATE \"UTILS\".\"CONFIG\".\"DEV_CONFIG_TABLES\" \
             SET \"silver_last_update\" = $1 WHERE \"table_name\" = $2"
        );
    }
}
