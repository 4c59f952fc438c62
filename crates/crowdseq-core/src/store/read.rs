//! Read statements shared by [`Store`](super::Store) and [`Writer`](super::Writer).
//!
//! Every function issues exactly one statement. Relation loaders take a batch
//! of owner ids and bind them as one JSON array parameter.

use super::record::{Record, Searchable};
use crate::error::Result;
use crate::query::{json_id_array, Predicate};
use rusqlite::{params_from_iter, Connection, OptionalExtension, ToSql};
use std::collections::HashMap;

fn order_by<R: Record>(alias: &str) -> String {
    match R::SORT_KEY {
        Some(key) => format!("{alias}.{key}, {alias}.id"),
        None => format!("{alias}.id"),
    }
}

pub(crate) fn find<R: Searchable>(
    conn: &Connection,
    predicate: &Predicate<R::Field>,
    window: Option<(u64, u64)>,
) -> Result<Vec<R>> {
    let frag = predicate.to_sql("t");
    let mut sql = format!(
        "SELECT t.* FROM {} t WHERE {} ORDER BY {}",
        R::TABLE,
        frag.sql,
        order_by::<R>("t")
    );
    if let Some((limit, offset)) = window {
        // SQLite integers are signed; a larger literal would be read as REAL.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(frag.params.iter()), R::from_row)?
        .collect::<rusqlite::Result<Vec<R>>>()?;
    Ok(rows)
}

pub(crate) fn count<R: Searchable>(conn: &Connection, predicate: &Predicate<R::Field>) -> Result<u64> {
    let frag = predicate.to_sql("t");
    let sql = format!("SELECT COUNT(*) FROM {} t WHERE {}", R::TABLE, frag.sql);
    let n: i64 = conn.query_row(&sql, params_from_iter(frag.params.iter()), |row| row.get(0))?;
    Ok(n.max(0) as u64)
}

/// First row matching `condition` (a boolean expression over alias `t`).
pub(crate) fn first_where<R: Record>(
    conn: &Connection,
    condition: &str,
    param: &dyn ToSql,
) -> Result<Option<R>> {
    let sql = format!(
        "SELECT t.* FROM {} t WHERE {condition} ORDER BY t.id LIMIT 1",
        R::TABLE
    );
    Ok(conn.query_row(&sql, [param], R::from_row).optional()?)
}

/// Rows of `R` whose foreign key column `fk` points at one of `owner_ids`.
pub(crate) fn children<R: Record>(
    conn: &Connection,
    fk: &str,
    owner_ids: &[i64],
) -> Result<HashMap<i64, Vec<R>>> {
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!(
        "SELECT t.*, t.{fk} AS owner_id FROM {} t \
         WHERE t.{fk} IN (SELECT value FROM json_each(?1)) \
         ORDER BY t.{fk}, {}",
        R::TABLE,
        order_by::<R>("t")
    );
    grouped(conn, &sql, owner_ids)
}

/// Rows of `R` reached from `owner_ids` through a many-to-many link table.
pub(crate) fn linked<R: Record>(
    conn: &Connection,
    link_table: &str,
    owner_col: &str,
    target_col: &str,
    owner_ids: &[i64],
) -> Result<HashMap<i64, Vec<R>>> {
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!(
        "SELECT t.*, l.{owner_col} AS owner_id FROM {link_table} l \
         JOIN {} t ON t.id = l.{target_col} \
         WHERE l.{owner_col} IN (SELECT value FROM json_each(?1)) \
         ORDER BY l.{owner_col}, {}",
        R::TABLE,
        order_by::<R>("t")
    );
    grouped(conn, &sql, owner_ids)
}

fn grouped<R: Record>(conn: &Connection, sql: &str, owner_ids: &[i64]) -> Result<HashMap<i64, Vec<R>>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([json_id_array(owner_ids)], |row| {
        Ok((row.get::<_, i64>("owner_id")?, R::from_row(row)?))
    })?;

    let mut out: HashMap<i64, Vec<R>> = HashMap::new();
    for row in rows {
        let (owner, record) = row?;
        out.entry(owner).or_default().push(record);
    }
    Ok(out)
}
