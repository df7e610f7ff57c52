//! Selection descriptions and the select-statement builder.

use serde_json::{Map, Value};

use super::errors::{QueryError, QueryResult};

/// Key selecting the boolean operator in the legacy mapping form.
const GLUE_KEY: &str = "__glue";

/// Boolean operator combining the criteria of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Glue {
    /// Conjunction (the default)
    #[default]
    And,
    /// Disjunction
    Or,
}

impl Glue {
    /// Resolve an operator name from the legacy mapping form.
    pub fn parse(raw: &str) -> QueryResult<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "and" => Ok(Glue::And),
            "or" => Ok(Glue::Or),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }

    pub(crate) fn separator(self) -> &'static str {
        match self {
            Glue::And => " AND ",
            Glue::Or => " OR ",
        }
    }
}

/// One criterion of a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Field must equal the bound value
    Equals(Value),
    /// Matches every row (the `{"1": 1}` convention)
    Always,
}

/// A selection description: ordered field criteria plus a glue operator.
///
/// Transient; describes exactly one query and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    criteria: Vec<(String, Criterion)>,
    glue: Glue,
}

impl Selection {
    /// Empty selection. At least one criterion must be added before building.
    pub fn new() -> Self {
        Self::default()
    }

    /// The always-true selection: one field bound to a constant that is
    /// always true. Used for "select everything" reads.
    pub fn all() -> Self {
        Self {
            criteria: vec![("1".to_string(), Criterion::Always)],
            glue: Glue::And,
        }
    }

    /// Add an equality criterion on a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.push((name.into(), Criterion::Equals(value.into())));
        self
    }

    /// Set the boolean operator combining the criteria.
    pub fn glue(mut self, glue: Glue) -> Self {
        self.glue = glue;
        self
    }

    /// Build a selection from the legacy mapping form: field to expected
    /// value, with the optional `__glue` key choosing the operator and
    /// `{"1": 1}` standing for "match everything".
    pub fn from_map(map: &Map<String, Value>) -> QueryResult<Self> {
        let glue = match map.get(GLUE_KEY) {
            Some(Value::String(raw)) => Glue::parse(raw)?,
            Some(other) => return Err(QueryError::UnknownOperator(other.to_string())),
            None => Glue::And,
        };

        let mut criteria = Vec::new();
        for (field, value) in map {
            if field == GLUE_KEY {
                continue;
            }
            if field == "1" && *value == Value::from(1) {
                criteria.push((field.clone(), Criterion::Always));
            } else {
                criteria.push((field.clone(), Criterion::Equals(value.clone())));
            }
        }

        if criteria.is_empty() {
            return Err(QueryError::InvalidSelection(
                "selection has no fields".to_string(),
            ));
        }

        Ok(Self { criteria, glue })
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }
}

/// Columns a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    /// All fields (`*`)
    #[default]
    All,
    /// Explicit ordered column list; entries may be aggregate expressions
    Columns(Vec<String>),
}

impl Projection {
    /// Explicit projection from an ordered column list.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Columns(columns.into_iter().map(Into::into).collect())
    }

    fn render(&self) -> String {
        match self {
            Projection::All => "*".to_string(),
            Projection::Columns(columns) => columns.join(", "),
        }
    }
}

/// Build one parametrized read query.
///
/// Returns the query text and its ordered bound parameters. The query has a
/// single `WHERE` clause form regardless of criterion kind; the always-true
/// criterion renders as the literal field `1` bound to the constant `1`.
///
/// Purely functional; no side effects.
pub fn build_select(
    table: &str,
    selection: &Selection,
    projection: &Projection,
    group_by: Option<&str>,
) -> QueryResult<(String, Vec<Value>)> {
    if selection.criteria.is_empty() {
        return Err(QueryError::InvalidSelection(
            "selection has no fields".to_string(),
        ));
    }

    let mut clauses = Vec::with_capacity(selection.criteria.len());
    let mut params = Vec::with_capacity(selection.criteria.len());

    for (field, criterion) in &selection.criteria {
        match criterion {
            Criterion::Equals(value) => {
                clauses.push(format!("`{}` = ?", field));
                params.push(value.clone());
            }
            Criterion::Always => {
                clauses.push("1 = ?".to_string());
                params.push(Value::from(1));
            }
        }
    }

    let mut sql = format!(
        "SELECT {} FROM `{}` WHERE {}",
        projection.render(),
        table,
        clauses.join(selection.glue.separator()),
    );

    if let Some(column) = group_by {
        sql.push_str(&format!(" GROUP BY `{}`", column));
    }

    Ok((sql, params))
}
