//! In-memory implementation of the store protocol.
//!
//! Understands exactly the query shapes the builder emits: one table,
//! equality criteria joined by a single boolean operator, an optional
//! projection, and an optional group-by with count/sum aggregates.
//! Rows come back in insertion order.
//!
//! Used by tests, the seed loader, and local serving; a real deployment
//! points the gateway at an actual relational store instead.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::row::Row;
use super::Store;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to a table, creating the table on first insert.
    pub fn insert(&self, table: &str, row: Row) {
        self.tables
            .write()
            .expect("Lock poisoned")
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .expect("Lock poisoned")
            .get(table)
            .map_or(0, Vec::len)
    }
}

impl Store for MemoryStore {
    fn query(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>> {
        let statement = Statement::parse(sql)?;
        if statement.terms.len() != params.len() {
            return Err(StoreError::Unavailable(format!(
                "parameter count mismatch: {} terms, {} params",
                statement.terms.len(),
                params.len()
            )));
        }

        let tables = self.tables.read().expect("Lock poisoned");
        let rows = tables
            .get(&statement.table)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let matched: Vec<&Row> = rows
            .iter()
            .filter(|row| statement.matches(row, params))
            .collect();

        match &statement.group_by {
            Some(key) => statement.aggregate(&matched, key),
            None => matched
                .into_iter()
                .map(|row| statement.project(row))
                .collect(),
        }
    }
}

/// One predicate term of the WHERE clause.
#[derive(Debug, PartialEq)]
enum Term {
    /// `1 = ?`, true when the bound parameter equals 1
    AlwaysOne,
    /// `` `field` = ? ``
    Field(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    All,
    Any,
}

#[derive(Debug)]
struct Statement {
    projection: Vec<String>,
    table: String,
    terms: Vec<Term>,
    combine: Combine,
    group_by: Option<String>,
}

impl Statement {
    fn parse(sql: &str) -> StoreResult<Self> {
        let rest = sql
            .strip_prefix("SELECT ")
            .ok_or_else(|| Self::unsupported(sql))?;
        let (projection_part, rest) = rest
            .split_once(" FROM ")
            .ok_or_else(|| Self::unsupported(sql))?;
        let (table_part, rest) = rest
            .split_once(" WHERE ")
            .ok_or_else(|| Self::unsupported(sql))?;

        let (where_part, group_by) = match rest.split_once(" GROUP BY ") {
            Some((clause, key)) => (clause, Some(unquote(key).to_string())),
            None => (rest, None),
        };

        // Parameters are always bound, so the query text never contains
        // values; a bare " OR " can only be the glue operator.
        let (combine, raw_terms): (Combine, Vec<&str>) = if where_part.contains(" OR ") {
            (Combine::Any, where_part.split(" OR ").collect())
        } else {
            (Combine::All, where_part.split(" AND ").collect())
        };

        let terms = raw_terms
            .into_iter()
            .map(|raw| match raw.trim() {
                "1 = ?" => Ok(Term::AlwaysOne),
                other => other
                    .strip_suffix(" = ?")
                    .map(|field| Term::Field(unquote(field).to_string()))
                    .ok_or_else(|| Self::unsupported(sql)),
            })
            .collect::<StoreResult<Vec<Term>>>()?;

        let projection = match projection_part {
            "*" => Vec::new(),
            columns => columns.split(", ").map(str::to_string).collect(),
        };

        Ok(Self {
            projection,
            table: unquote(table_part).to_string(),
            terms,
            combine,
            group_by,
        })
    }

    fn matches(&self, row: &Row, params: &[Value]) -> bool {
        let mut outcomes = self.terms.iter().zip(params).map(|(term, param)| match term {
            Term::AlwaysOne => *param == Value::from(1),
            Term::Field(field) => row.get(field) == Some(param),
        });
        match self.combine {
            Combine::All => outcomes.all(|ok| ok),
            Combine::Any => outcomes.any(|ok| ok),
        }
    }

    fn project(&self, row: &Row) -> StoreResult<Row> {
        if self.projection.is_empty() {
            return Ok(row.clone());
        }
        let mut projected = Row::new();
        for column in &self.projection {
            let field = unquote(column);
            let value = row.get(field).cloned().unwrap_or(Value::Null);
            projected = projected.set(field, value);
        }
        Ok(projected)
    }

    /// Group matched rows by the key column and evaluate the aggregate
    /// projection per group, preserving first-seen group order.
    fn aggregate(&self, rows: &[&Row], key: &str) -> StoreResult<Vec<Row>> {
        let mut groups: Vec<(Value, Vec<&Row>)> = Vec::new();
        for row in rows {
            let group_key = row.get(key).cloned().unwrap_or(Value::Null);
            match groups.iter_mut().find(|(k, _)| *k == group_key) {
                Some((_, members)) => members.push(row),
                None => groups.push((group_key, vec![row])),
            }
        }

        groups
            .into_iter()
            .map(|(group_key, members)| {
                let mut out = Row::new();
                for column in &self.projection {
                    if let Some(alias) = column.strip_prefix("COUNT(*) AS ") {
                        out = out.set(alias, members.len());
                    } else if let Some(rest) = column.strip_prefix("SUM(") {
                        let (field, alias) = rest.split_once(") AS ").ok_or_else(|| {
                            StoreError::Unavailable(format!(
                                "unsupported aggregate: {}",
                                column
                            ))
                        })?;
                        let field = unquote(field);
                        let sum: i64 = members
                            .iter()
                            .filter_map(|row| row.get(field).and_then(Value::as_i64))
                            .sum();
                        out = out.set(alias, sum);
                    } else {
                        out = out.set(unquote(column), group_key.clone());
                    }
                }
                Ok(out)
            })
            .collect()
    }

    fn unsupported(sql: &str) -> StoreError {
        StoreError::Unavailable(format!("unsupported query shape: {}", sql))
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('`')
}
