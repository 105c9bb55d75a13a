//! Source trait implementations on [`WikiDb`].

use rusqlite::OptionalExtension;
use tracing::info;

use super::WikiDb;
use crate::error::{Error, Result};
use crate::source::{LinkSource, PageResolver, PageSource};
use crate::types::PageId;

/// Progress is logged every this many links while fetching.
const LINK_PROGRESS_INTERVAL: usize = 100_000;

impl LinkSource for WikiDb {
    fn for_each_subcategory_link(
        &self,
        visit: &mut dyn FnMut(&str, &str) -> Result<()>,
    ) -> Result<usize> {
        let conn = self.connection()?;

        // cl_from is the subcategory's own category page; its title is the
        // child's name.
        let mut stmt = conn.prepare(
            "SELECT cl.cl_to, p.page_title
             FROM categorylinks cl
             JOIN page p ON cl.cl_from = p.page_id
             WHERE cl.cl_type = 'subcat'",
        )?;

        let mut rows = stmt.query([])?;
        let mut count = 0;
        while let Some(row) = rows.next()? {
            let parent: String = row.get(0)?;
            let child: String = row.get(1)?;
            visit(&parent, &child)?;

            count += 1;
            if count % LINK_PROGRESS_INTERVAL == 0 {
                info!(links = count, "Fetched subcategory links");
            }
        }

        Ok(count)
    }
}

impl PageSource for WikiDb {
    fn pages_of(&self, category: &str) -> Result<Vec<PageId>> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare_cached(
            "SELECT cl_from FROM categorylinks WHERE cl_to = ?1 AND cl_type = 'page'",
        )?;
        let pages = stmt
            .query_map([category], |row| row.get::<_, i64>(0).map(PageId::from))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(pages)
    }
}

impl PageResolver for WikiDb {
    fn title_of(&self, page: PageId) -> Result<String> {
        let conn = self.connection()?;

        let title = conn
            .prepare_cached("SELECT page_title FROM page WHERE page_id = ?1")?
            .query_row([page.as_i64()], |row| row.get::<_, String>(0))
            .optional()?;

        title.ok_or_else(|| Error::NotFound(format!("no page with id {page}")))
    }

    fn categories_of(&self, page: PageId) -> Result<Vec<String>> {
        let conn = self.connection()?;

        let mut stmt = conn
            .prepare_cached("SELECT cl_to FROM categorylinks WHERE cl_from = ?1 ORDER BY cl_to")?;
        let categories = stmt
            .query_map([page.as_i64()], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LinkKind;
    use tempfile::TempDir;

    /// Science > Physics > Optics, plus two articles.
    fn fixture() -> (TempDir, WikiDb) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("wiki.sqlite");
        let db = WikiDb::create(&path).expect("create db");

        db.insert_page(PageId(10), "Physics").expect("page");
        db.insert_page(PageId(11), "Optics").expect("page");
        db.insert_page(PageId(100), "Lens").expect("page");
        db.insert_page(PageId(101), "Newton").expect("page");

        db.insert_category_link(PageId(10), "Science", LinkKind::Subcat)
            .expect("link");
        db.insert_category_link(PageId(11), "Physics", LinkKind::Subcat)
            .expect("link");
        db.insert_category_link(PageId(100), "Optics", LinkKind::Page)
            .expect("link");
        db.insert_category_link(PageId(100), "Glass", LinkKind::Page)
            .expect("link");
        db.insert_category_link(PageId(101), "Physics", LinkKind::Page)
            .expect("link");
        db.insert_category_link(PageId(101), "Optics", LinkKind::File)
            .expect("link");

        (dir, db)
    }

    #[test]
    fn subcategory_links_join_child_titles() {
        let (_dir, db) = fixture();

        let mut links = Vec::new();
        let count = db
            .for_each_subcategory_link(&mut |parent, child| {
                links.push((parent.to_string(), child.to_string()));
                Ok(())
            })
            .expect("walk links");

        links.sort();
        assert_eq!(count, 2);
        assert_eq!(
            links,
            vec![
                ("Physics".to_string(), "Optics".to_string()),
                ("Science".to_string(), "Physics".to_string()),
            ]
        );
    }

    #[test]
    fn visitor_error_stops_the_walk() {
        let (_dir, db) = fixture();

        let mut seen = 0;
        let result = db.for_each_subcategory_link(&mut |_, _| {
            seen += 1;
            Err(Error::Internal("stop".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn pages_of_returns_only_page_links() {
        let (_dir, db) = fixture();

        assert_eq!(db.pages_of("Optics").expect("query"), vec![PageId(100)]);
        assert_eq!(db.pages_of("Physics").expect("query"), vec![PageId(101)]);
        assert!(db.pages_of("Science").expect("query").is_empty());
    }

    #[test]
    fn title_of_missing_page_is_not_found() {
        let (_dir, db) = fixture();

        assert_eq!(db.title_of(PageId(100)).expect("title"), "Lens");
        assert!(matches!(db.title_of(PageId(999)), Err(Error::NotFound(_))));
    }

    #[test]
    fn categories_of_lists_all_memberships_sorted() {
        let (_dir, db) = fixture();

        assert_eq!(
            db.categories_of(PageId(100)).expect("categories"),
            vec!["Glass".to_string(), "Optics".to_string()]
        );
        assert_eq!(
            db.categories_of(PageId(101)).expect("categories"),
            vec!["Optics".to_string(), "Physics".to_string()]
        );
        assert!(db.categories_of(PageId(999)).expect("categories").is_empty());
    }
}
