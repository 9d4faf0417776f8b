//! Repositories
//! 
//! SQL access per table. Functions that take a `&mut SqliteConnection`
//! are meant to run inside a caller-owned transaction.

pub mod approval_log_repository;
pub mod association_repository;
pub mod barangay_repository;
pub mod document_repository;
pub mod driver_repository;
pub mod loading_zone_repository;
pub mod operator_repository;
pub mod restriction_repository;
pub mod route_repository;
pub mod route_stop_repository;
pub mod submission_repository;
pub mod terminal_repository;
pub mod user_repository;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Transaction};

use crate::dto::pagination::{ListFilter, Page};
use crate::utils::query::FilterBuilder;

/// Open a transaction that holds the write lock from its first statement.
///
/// A deferred transaction that reads before it writes cannot be upgraded
/// once another writer is active, and SQLite fails it with `SQLITE_BUSY`
/// without waiting. Taking the lock at `BEGIN` lets the busy timeout apply.
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Run the COUNT and the paged SELECT for one listing.
///
/// `select` is the column list, `from` the table with its joins; both
/// queries share the same WHERE clause.
pub(crate) async fn fetch_page<T>(
    pool: &SqlitePool,
    select: &str,
    from: &str,
    filters: &FilterBuilder,
    order_by: &str,
    filter: &ListFilter,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) {}", from));
    filters.push_where(&mut count);
    let (total,): (i64,) = count.build_query_as().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new(format!("{} {}", select, from));
    filters.push_where(&mut query);
    query
        .push(format!(" ORDER BY {} LIMIT ", order_by))
        .push_bind(filter.per_page())
        .push(" OFFSET ")
        .push_bind(filter.offset());

    let items = query.build_query_as::<T>().fetch_all(pool).await?;
    Ok(Page::new(items, total, filter))
}
