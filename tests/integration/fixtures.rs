//! Shared assessment database fixture.

use std::path::PathBuf;

use tempfile::TempDir;

use ingres::config::ResolverConfig;
use ingres::store::schema;
use ingres::{AssessmentStore, QueryProcessor};

const SAMPLE_DATA: &str = "
INSERT INTO states VALUES
    (1, 'Delhi'), (2, 'Punjab'), (3, 'Karnataka'), (4, 'Tamil Nadu');

INSERT INTO districts VALUES
    (1, 'Central Delhi', 1),
    (2, 'South Delhi', 1),
    (3, 'Ludhiana', 2),
    (4, 'Bangalore Urban', 3),
    (5, 'Chennai', 4);

INSERT INTO blocks VALUES
    (1, 'Central Delhi Block-1', 1),
    (2, 'South Delhi Block-1', 2),
    (3, 'Ludhiana Block-1', 3),
    (4, 'Ludhiana Block-2', 3),
    (5, 'Bangalore Urban Block-1', 4),
    (6, 'Chennai Block-1', 5);

INSERT INTO groundwater_assessment VALUES
    (1, 1, 2024, 120.0, 108.0, 48.6, 45.0, 'Safe', 8.0, 6.0),
    (2, 2, 2024, 90.0, 81.0, 74.52, 92.0, 'Critical', 22.0, 19.0),
    (3, 3, 2024, 70.0, 63.0, 103.95, 165.0, 'Over-Exploited', 38.0, 35.0),
    (4, 4, 2024, 75.0, 67.5, 94.5, 140.0, 'Over-Exploited', 30.0, 27.0),
    (5, 5, 2024, 100.0, 90.0, 70.2, 78.0, 'Semi-Critical', 14.0, 12.0),
    (6, 6, 2024, 110.0, 99.0, 54.45, 55.0, 'Safe', 8.0, 7.0),
    (7, 1, 2023, 118.0, 106.2, 44.6, 42.0, 'Safe', 8.5, 6.5),
    (8, 3, 2023, 72.0, 64.8, 97.2, 150.0, 'Over-Exploited', 36.0, 33.0);
";

/// A temporary assessment database. The directory is removed on drop.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// Create a database populated with sample assessments.
    pub fn sample() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingres.db");
        let conn = schema::initialize_at(&path).unwrap();
        conn.execute_batch(SAMPLE_DATA).unwrap();
        Self { _dir: dir, path }
    }

    /// A path inside a temporary directory where no database exists.
    pub fn missing() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.db");
        Self { _dir: dir, path }
    }

    pub fn store(&self) -> AssessmentStore {
        AssessmentStore::new(&self.path)
    }

    pub fn processor(&self) -> QueryProcessor {
        QueryProcessor::new(self.store(), ResolverConfig::default())
    }
}
