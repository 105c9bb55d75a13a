//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wikidepth::{Config, LinkKind, PageId, WikiDb};

/// Category pages of the fixture database, by page id.
pub const CATEGORIES: [(i64, &str); 6] = [
    (1, "Science"),
    (2, "Physics"),
    (3, "Biology"),
    (4, "Optics"),
    (5, "Mechanics"),
    (6, "History"),
];

/// Subcategory links of the fixture: (parent, child page id).
///
/// Science > {Physics, Biology}, Physics > {Optics, Mechanics}, Optics >
/// Physics closes a cycle, and History sits above Science.
pub const SUBCAT_LINKS: [(&str, i64); 6] = [
    ("Science", 2),
    ("Science", 3),
    ("Physics", 4),
    ("Physics", 5),
    ("Optics", 2),
    ("History", 1),
];

/// Articles of the fixture and the categories they belong to.
pub const ARTICLES: [(i64, &str, &[&str]); 5] = [
    (100, "Lens", &["Optics", "Glass"]),
    (101, "Newton", &["Physics", "Mechanics"]),
    (102, "Cell", &["Biology"]),
    (103, "Rome", &["History"]),
    (104, "Prism", &["Optics"]),
];

/// A temporary directory holding a fixture database, plus a config whose
/// paths all point inside it.
pub struct Fixture {
    /// Must be kept alive for the duration of the test.
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn database(&self) -> &Path {
        &self.config.database
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.config.output_dir.join(name)
    }

    pub fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.output(name)).expect("read output file")
    }
}

/// Populate a database with the fixture tables.
pub fn populate(db: &WikiDb) {
    for (id, title) in CATEGORIES {
        db.insert_page(PageId(id), title).expect("insert category page");
    }
    for (parent, child) in SUBCAT_LINKS {
        db.insert_category_link(PageId(child), parent, LinkKind::Subcat)
            .expect("insert subcat link");
    }
    for (id, title, categories) in ARTICLES {
        db.insert_page(PageId(id), title).expect("insert article");
        for category in categories {
            db.insert_category_link(PageId(id), category, LinkKind::Page)
                .expect("insert page link");
        }
    }
}

/// Create the fixture database and a config pointing into a temp dir.
pub fn science_fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = Config {
        database: dir.path().join("wiki.sqlite"),
        cache: dir.path().join("data").join("subcategory_links_cache"),
        output_dir: dir.path().join("data"),
        jobs: 2,
    };

    let db = WikiDb::create(&config.database).expect("create fixture db");
    populate(&db);

    Fixture { dir, config }
}

pub fn seeds(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
