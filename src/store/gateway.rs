//! Content Store Gateway
//!
//! Typed read operations over the Page and Tag entities. Content is
//! read-only from this core's perspective.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::query::{build_select, Projection, Selection};

use super::errors::{GatewayError, GatewayResult, StoreError};
use super::row::Row;
use super::Store;

pub const PAGES_TABLE: &str = "pages";
pub const TAGS_TABLE: &str = "tags";

/// A wiki page. `title` and `content` hold the raw source form; display
/// forms are derived by the rendering seam, not stored here.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub id: i64,
    pub path: String,
    pub title: String,
    pub content: String,
    pub views: u64,
    /// Ordered edit identifiers, comma-separated in storage
    pub edits: Vec<String>,
    pub modified: DateTime<Utc>,
}

/// One entry of the full page listing.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub path: String,
    pub title: String,
}

/// One tag attached to a page, in display form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Tag {
    pub text: String,
}

/// Aggregate tag record: occurrence count and view sum per tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagStats {
    pub tag: String,
    pub count: u64,
    pub views: u64,
}

/// Read gateway over the content store.
pub struct Gateway {
    store: Arc<dyn Store>,
}

impl Gateway {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch the page at a unique path. Zero rows is `NotFound`.
    pub fn page(&self, path: &str) -> GatewayResult<Page> {
        let (sql, params) = build_select(
            PAGES_TABLE,
            &Selection::new().field("path", path),
            &Projection::All,
            None,
        )?;
        let rows = self.store.query(&sql, &params)?;
        let row = rows.first().ok_or(GatewayError::NotFound)?;
        Self::page_from_row(row)
    }

    /// Every page's (path, title), in the store's insertion order.
    pub fn list_pages(&self) -> GatewayResult<Vec<PageSummary>> {
        let (sql, params) = build_select(
            PAGES_TABLE,
            &Selection::all(),
            &Projection::columns(["path", "title"]),
            None,
        )?;
        let rows = self.store.query(&sql, &params)?;
        rows.iter()
            .map(|row| {
                Ok(PageSummary {
                    path: row.str_field("path")?.to_string(),
                    title: row.str_field("title")?.to_string(),
                })
            })
            .collect()
    }

    /// Tags attached to one page. Separator characters become spaces at
    /// read time; storage keeps the raw form.
    pub fn tags_for_page(&self, page_id: i64) -> GatewayResult<Vec<Tag>> {
        let (sql, params) = build_select(
            TAGS_TABLE,
            &Selection::new().field("page_id", page_id),
            &Projection::All,
            None,
        )?;
        let rows = self.store.query(&sql, &params)?;
        rows.iter()
            .map(|row| {
                Ok(Tag {
                    text: row.str_field("tag")?.replace('-', " "),
                })
            })
            .collect()
    }

    /// Aggregate tag listing; the store performs the group-count and
    /// view-sum, this gateway only shapes the request and result.
    pub fn tag_stats(&self) -> GatewayResult<Vec<TagStats>> {
        let projection =
            Projection::columns(["tag", "COUNT(*) AS count", "SUM(`views`) AS views"]);
        let (sql, params) =
            build_select(TAGS_TABLE, &Selection::all(), &projection, Some("tag"))?;
        let rows = self.store.query(&sql, &params)?;
        rows.iter()
            .map(|row| {
                Ok(TagStats {
                    tag: row.str_field("tag")?.to_string(),
                    count: row.u64_field("count")?,
                    views: row.u64_field("views")?,
                })
            })
            .collect()
    }

    fn page_from_row(row: &Row) -> GatewayResult<Page> {
        let edits_raw = row.str_field("edits")?;
        let edits = if edits_raw.is_empty() {
            Vec::new()
        } else {
            edits_raw.split(',').map(str::to_string).collect()
        };

        let modified = DateTime::from_timestamp(row.i64_field("modified")?, 0)
            .ok_or_else(|| {
                StoreError::Unavailable("modified timestamp out of range".to_string())
            })?;

        Ok(Page {
            id: row.i64_field("id")?,
            path: row.str_field("path")?.to_string(),
            title: row.str_field("title")?.to_string(),
            content: row.str_field("content")?.to_string(),
            views: row.u64_field("views")?,
            edits,
            modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn page_row(id: i64, path: &str) -> Row {
        Row::new()
            .set("id", id)
            .set("path", path)
            .set("title", format!("Title of {}", path))
            .set("content", "Some *markup* here")
            .set("views", 12)
            .set("edits", "3,7,19")
            .set("modified", 1_300_000_000)
    }

    fn seeded_gateway() -> Gateway {
        let store = MemoryStore::new();
        store.insert(PAGES_TABLE, page_row(1, "home"));
        store.insert(PAGES_TABLE, page_row(2, "docs/install"));
        store.insert(TAGS_TABLE, Row::new().set("page_id", 1).set("tag", "sea-life").set("views", 5));
        store.insert(TAGS_TABLE, Row::new().set("page_id", 1).set("tag", "fish").set("views", 2));
        Gateway::new(Arc::new(store))
    }

    #[test]
    fn test_page_by_path() {
        let gateway = seeded_gateway();
        let page = gateway.page("docs/install").unwrap();

        assert_eq!(page.id, 2);
        assert_eq!(page.edits, vec!["3", "7", "19"]);
        assert_eq!(page.modified.timestamp(), 1_300_000_000);
    }

    #[test]
    fn test_missing_page_is_not_found() {
        let gateway = seeded_gateway();
        assert_eq!(
            gateway.page("nonexistent").unwrap_err(),
            GatewayError::NotFound
        );
    }

    #[test]
    fn test_list_pages_in_insertion_order() {
        let gateway = seeded_gateway();
        let pages = gateway.list_pages().unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].path, "home");
        assert_eq!(pages[1].path, "docs/install");
    }

    #[test]
    fn test_tag_separators_become_spaces() {
        let gateway = seeded_gateway();
        let tags = gateway.tags_for_page(1).unwrap();

        assert_eq!(
            tags,
            vec![
                Tag { text: "sea life".to_string() },
                Tag { text: "fish".to_string() },
            ]
        );
    }

    #[test]
    fn test_tag_stats_aggregates() {
        let gateway = seeded_gateway();
        let stats = gateway.tag_stats().unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].tag, "sea-life");
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].views, 5);
    }

    #[test]
    fn test_store_failure_propagates_as_unavailable() {
        struct DownStore;
        impl Store for DownStore {
            fn query(
                &self,
                _sql: &str,
                _params: &[serde_json::Value],
            ) -> crate::store::StoreResult<Vec<Row>> {
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
        }

        let gateway = Gateway::new(Arc::new(DownStore));
        assert!(matches!(
            gateway.page("home").unwrap_err(),
            GatewayError::Store(StoreError::Unavailable(_))
        ));
    }
}
