//! `SQLite` implementation of [`RecordRepository`].
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as fixed-width
//! RFC 3339 text, so lexical order in SQL matches chronological order.
//! `search_text` holds [`Record::search_text`], lowercased in Rust since
//! `SQLite`'s `lower()` only folds ASCII.

use chrono::{NaiveDate, SecondsFormat};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use hearthbook_app::ports::RecordRepository;
use hearthbook_domain::error::{HearthbookError, NotFoundError};
use hearthbook_domain::filter::{FilterOptions, RecordFilter};
use hearthbook_domain::id::RecordId;
use hearthbook_domain::page::{PageRequest, Sort};
use hearthbook_domain::record::{REFERENCE_PREFIX, Record};
use hearthbook_domain::sales::OrderRecord;
use hearthbook_domain::time::Timestamp;

use crate::error::StorageError;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

fn date_column(row: &SqliteRow, column: &str) -> Result<NaiveDate, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(decode_error)
}

fn optional_date_column(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|raw| raw.parse().map_err(decode_error)).transpose()
}

fn parse_timestamp(raw: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.to_utc())
        .map_err(decode_error)
}

fn timestamp_column(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse_timestamp(&raw)
}

fn optional_timestamp_column(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Timestamp>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.as_deref().map(parse_timestamp).transpose()
}

fn timestamp_text(timestamp: Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Record);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;

        Ok(Self(Record {
            id: RecordId::from_uuid(id),
            reference: row.try_get("reference")?,
            created_at: timestamp_column(row, "created_at")?,
            updated_at: timestamp_column(row, "updated_at")?,
            delivered_on: date_column(row, "delivered_on")?,
            installed_on: optional_date_column(row, "installed_on")?,
            site_visit_at: optional_timestamp_column(row, "site_visit_at")?,
            site_visit_by: row.try_get("site_visit_by")?,
            installed_by: row.try_get("installed_by")?,
            commissioned_by: row.try_get("commissioned_by")?,
            capacity_kw: row.try_get("capacity_kw")?,
            heater: row.try_get("heater")?,
            controller: row.try_get("controller")?,
            card: row.try_get("card")?,
            body: row.try_get("body")?,
            client_name: row.try_get("client_name")?,
            client_phone: row.try_get("client_phone")?,
            client_address: row.try_get("client_address")?,
            zone: row.try_get("zone")?,
            sale_price: row.try_get("sale_price")?,
            sold_by: row.try_get("sold_by")?,
            lead_source: row.try_get("lead_source")?,
            remarks: row.try_get("remarks")?,
        }))
    }
}

/// The slice of a row the sales aggregation needs.
struct OrderWrapper(OrderRecord);

impl<'r> FromRow<'r, SqliteRow> for OrderWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(OrderRecord {
            delivered_on: date_column(row, "delivered_on")?,
            sale_price: row.try_get("sale_price")?,
            zone: row.try_get("zone")?,
            sold_by: row.try_get("sold_by")?,
            lead_source: row.try_get("lead_source")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO records (
        id, reference, created_at,
        updated_at, delivered_on, installed_on, site_visit_at, site_visit_by,
        installed_by, commissioned_by, capacity_kw, heater, controller, card, body,
        client_name, client_phone, client_address, zone, sale_price, sold_by,
        lead_source, remarks, search_text
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE records SET
        updated_at = ?, delivered_on = ?, installed_on = ?, site_visit_at = ?,
        site_visit_by = ?, installed_by = ?, commissioned_by = ?, capacity_kw = ?,
        heater = ?, controller = ?, card = ?, body = ?, client_name = ?,
        client_phone = ?, client_address = ?, zone = ?, sale_price = ?,
        sold_by = ?, lead_source = ?, remarks = ?, search_text = ?
    WHERE id = ?
";

const SELECT_BY_ID: &str = "SELECT * FROM records WHERE id = ?";

const DELETE: &str = "DELETE FROM records WHERE id = ?";

/// Highest reference by its numeric suffix, so `RMZ-1000000` outranks `RMZ-999999`.
const SELECT_LAST_REFERENCE: &str = r"
    SELECT reference FROM records
    WHERE reference LIKE ? || '%'
    ORDER BY CAST(substr(reference, length(?) + 1) AS INTEGER) DESC, reference DESC
    LIMIT 1
";

const SELECT_BY_CLIENT_PHONE: &str = r"
    SELECT * FROM records
    WHERE client_phone = ? AND id IS NOT ?
    ORDER BY delivered_on DESC, rowid ASC
    LIMIT ?
";

/// Bind the columns a record update may change, in [`UPDATE`] order.
fn bind_details<'q>(query: SqliteQuery<'q>, record: &Record) -> SqliteQuery<'q> {
    query
        .bind(timestamp_text(record.updated_at))
        .bind(record.delivered_on.to_string())
        .bind(record.installed_on.map(|date| date.to_string()))
        .bind(record.site_visit_at.map(timestamp_text))
        .bind(record.site_visit_by.clone())
        .bind(record.installed_by.clone())
        .bind(record.commissioned_by.clone())
        .bind(record.capacity_kw.clone())
        .bind(record.heater.clone())
        .bind(record.controller.clone())
        .bind(record.card.clone())
        .bind(record.body.clone())
        .bind(record.client_name.clone())
        .bind(record.client_phone.clone())
        .bind(record.client_address.clone())
        .bind(record.zone.clone())
        .bind(record.sale_price)
        .bind(record.sold_by.clone())
        .bind(record.lead_source.clone())
        .bind(record.remarks.clone())
        .bind(record.search_text())
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append a `WHERE` clause selecting the rows that match `filter`.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecordFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(term) = filter.search.as_deref().filter(|term| !term.is_empty()) {
        builder.push(" AND search_text LIKE ");
        builder.push_bind(format!("%{}%", escape_like(&term.to_lowercase())));
        builder.push(" ESCAPE '\\'");
    }

    let labels = [
        ("zone", &filter.zone),
        ("capacity_kw", &filter.capacity_kw),
        ("heater", &filter.heater),
        ("controller", &filter.controller),
        ("card", &filter.card),
        ("body", &filter.body),
        ("sold_by", &filter.sold_by),
        ("lead_source", &filter.lead_source),
    ];
    for (column, value) in labels {
        if let Some(value) = value {
            builder.push(format!(" AND {column} = "));
            builder.push_bind(value.clone());
        }
    }

    if let Some(from) = filter.date_from {
        builder.push(" AND delivered_on >= ");
        builder.push_bind(from.to_string());
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND delivered_on <= ");
        builder.push_bind(to.to_string());
    }
}

fn not_found(id: RecordId) -> HearthbookError {
    NotFoundError {
        entity: "Record",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed record repository.
pub struct SqliteRecordRepository {
    pool: SqlitePool,
}

impl SqliteRecordRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn distinct(&self, column: &str) -> Result<Vec<String>, StorageError> {
        let sql = format!(
            "SELECT DISTINCT {column} FROM records WHERE {column} IS NOT NULL ORDER BY {column}"
        );
        let values = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;
        Ok(values)
    }
}

impl RecordRepository for SqliteRecordRepository {
    async fn create(&self, record: Record) -> Result<Record, HearthbookError> {
        let query = sqlx::query(INSERT)
            .bind(record.id.as_uuid())
            .bind(record.reference.clone())
            .bind(timestamp_text(record.created_at));
        bind_details(query, &record)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(record)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Option<Record>, HearthbookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn update(&self, record: Record) -> Result<Record, HearthbookError> {
        let result = bind_details(sqlx::query(UPDATE), &record)
            .bind(record.id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(not_found(record.id));
        }

        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, HearthbookError> {
        let result = sqlx::query(DELETE)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn last_reference(&self) -> Result<Option<String>, HearthbookError> {
        let reference = sqlx::query_scalar(SELECT_LAST_REFERENCE)
            .bind(REFERENCE_PREFIX)
            .bind(REFERENCE_PREFIX)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(reference)
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: PageRequest,
        sort: Sort,
    ) -> Result<(Vec<Record>, u64), HearthbookError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM records");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let direction = if sort.descending { "DESC" } else { "ASC" };
        let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM records");
        push_filter(&mut select, filter);
        select.push(format!(
            " ORDER BY {} {direction}, rowid ASC LIMIT ",
            sort.field.as_str()
        ));
        select.push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX));
        select.push(" OFFSET ");
        select.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows: Vec<Wrapper> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok((
            rows.into_iter().map(|w| w.0).collect(),
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn fetch_filtered(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<OrderRecord>, HearthbookError> {
        let mut select = QueryBuilder::<Sqlite>::new(
            "SELECT delivered_on, sale_price, zone, sold_by, lead_source FROM records",
        );
        push_filter(&mut select, filter);
        select.push(" ORDER BY delivered_on ASC");

        let rows: Vec<OrderWrapper> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_client_phone(
        &self,
        phone: &str,
        exclude: Option<RecordId>,
        limit: u32,
    ) -> Result<Vec<Record>, HearthbookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_CLIENT_PHONE)
            .bind(phone)
            .bind(exclude.map(RecordId::as_uuid))
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn filter_options(&self) -> Result<FilterOptions, HearthbookError> {
        Ok(FilterOptions {
            zones: self.distinct("zone").await?,
            capacity_kw: self.distinct("capacity_kw").await?,
            heaters: self.distinct("heater").await?,
            controllers: self.distinct("controller").await?,
            cards: self.distinct("card").await?,
            bodies: self.distinct("body").await?,
            sold_by: self.distinct("sold_by").await?,
            lead_sources: self.distinct("lead_source").await?,
        })
    }
}
