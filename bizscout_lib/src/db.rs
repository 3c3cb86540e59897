//! SQLite storage for collected company records.
//!
//! Each company is stored as its full JSON payload plus a handful of
//! indexed columns used to prefilter searches.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::discovery::matches_criteria;
use crate::industry::IndustryClassifier;
use crate::models::{Company, SearchCriteria};
use crate::taxonomy::TaxonomyError;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),
}

pub struct Db {
    conn: Connection,
}

const UPSERT_COMPANY: &str = "INSERT INTO companies (
       id, name, street, city, state, zip, industry, naics_code, sic_code,
       employee_count, estimated_revenue, legal_structure, tax_saving_potential,
       region, payload, last_updated
     )
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
     ON CONFLICT(id) DO UPDATE SET
       name = excluded.name,
       street = excluded.street,
       city = excluded.city,
       state = excluded.state,
       zip = excluded.zip,
       industry = excluded.industry,
       naics_code = excluded.naics_code,
       sic_code = excluded.sic_code,
       employee_count = excluded.employee_count,
       estimated_revenue = excluded.estimated_revenue,
       legal_structure = excluded.legal_structure,
       tax_saving_potential = excluded.tax_saving_potential,
       region = excluded.region,
       payload = excluded.payload,
       last_updated = excluded.last_updated";

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<(), DbError> {
        // Migrations run before the DDL so the region index finds its column
        // on databases created before it existed.
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.migrate_v1()?;
            self.conn.pragma_update(None, "user_version", 1)?;
        }

        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        Ok(())
    }

    fn migrate_v1(&self) -> Result<(), DbError> {
        for sql in &[
            "ALTER TABLE companies ADD COLUMN region TEXT",
            "ALTER TABLE companies ADD COLUMN tax_saving_potential TEXT NOT NULL DEFAULT 'LOW'",
        ] {
            match self.conn.execute(sql, []) {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                    if msg.contains("duplicate column name")
                        || msg.contains("no such table") => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>, DbError> {
        self.conn
            .query_row(
                "SELECT value FROM ingest_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO ingest_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Inserts or replaces one company, keyed by id.
    pub fn save(&self, company: &Company) -> Result<(), DbError> {
        let mut stmt = self.conn.prepare_cached(UPSERT_COMPANY)?;
        bind_company(&mut stmt, company)?;
        Ok(())
    }

    /// Upserts every company in one transaction and returns how many were written.
    pub fn save_all(&mut self, companies: &[Company]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_COMPANY)?;
            for company in companies {
                bind_company(&mut stmt, company)?;
            }
        }
        tx.commit()?;
        Ok(companies.len())
    }

    pub fn get(&self, id: &str) -> Result<Option<Company>, DbError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM companies WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        payload
            .map(|json| serde_json::from_str(&json).map_err(DbError::from))
            .transpose()
    }

    /// Every stored company ordered by name.
    pub fn all(&self, limit: Option<usize>) -> Result<Vec<Company>, DbError> {
        let mut sql = String::from("SELECT payload FROM companies ORDER BY name COLLATE NOCASE");
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(serde_json::from_str(&row?)?);
        }
        Ok(result)
    }

    /// Companies matching `criteria`, ordered by name.
    ///
    /// Name, location, and size limits narrow the query in SQL; every
    /// criterion is then checked against the decoded record, so the result
    /// is the same as running discovery over the whole table.
    pub fn search(
        &self,
        criteria: &SearchCriteria,
        limit: Option<usize>,
    ) -> Result<Vec<Company>, DbError> {
        let mut sql = String::from("SELECT payload FROM companies WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        let mut param_idx = 1;

        if let Some(name) = criteria.name() {
            sql.push_str(&format!(" AND name LIKE ?{}", param_idx));
            params_vec.push(Box::new(format!("%{}%", name.trim())));
            param_idx += 1;
        }
        if let Some(location) = criteria.location() {
            sql.push_str(&format!(
                " AND (city LIKE ?{n} OR state LIKE ?{n} OR zip LIKE ?{n})",
                n = param_idx
            ));
            params_vec.push(Box::new(format!("%{}%", location.trim())));
            param_idx += 1;
        }
        if let Some(min) = criteria.min_employees() {
            sql.push_str(&format!(" AND employee_count >= ?{}", param_idx));
            params_vec.push(Box::new(sql_count(min)));
            param_idx += 1;
        }
        if let Some(min) = criteria.min_revenue() {
            sql.push_str(&format!(" AND estimated_revenue >= ?{}", param_idx));
            params_vec.push(Box::new(min));
            param_idx += 1;
        }

        sql.push_str(" ORDER BY name COLLATE NOCASE");

        let _ = param_idx;

        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let classifier = IndustryClassifier::embedded()?;
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for row in rows {
            let company: Company = serde_json::from_str(&row?)?;
            if matches_criteria(classifier, &company, criteria) {
                result.push(company);
                if limit.is_some_and(|n| result.len() >= n) {
                    break;
                }
            }
        }
        Ok(result)
    }

    /// Companies assigned to an outreach region, e.g. "Monday".
    pub fn by_region(&self, region: &str) -> Result<Vec<Company>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM companies WHERE region = ?1 ORDER BY name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map(params![region], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(serde_json::from_str(&row?)?);
        }
        Ok(result)
    }

    /// Removes a company. Returns false when no row had that id.
    pub fn delete(&self, id: &str) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM companies WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<i64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM companies", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// SQLite integers are signed; counts past `i64::MAX` are stored as `i64::MAX`.
fn sql_count(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn bind_company(stmt: &mut rusqlite::Statement<'_>, company: &Company) -> Result<(), DbError> {
    let payload = serde_json::to_string(company)?;
    let address = company.address.as_ref();
    let industry = company.industry.as_ref();
    stmt.execute(params![
        company.id,
        company.name,
        address.map(|a| a.street.as_str()),
        address.map(|a| a.city.as_str()),
        address.map(|a| a.state.as_str()),
        address.map(|a| a.zip.as_str()),
        industry.map(|i| i.primary.as_str()),
        industry.and_then(|i| i.naics_code.as_deref()),
        industry.and_then(|i| i.sic_code.as_deref()),
        company.financials.employee_count.map(sql_count),
        company.financials.estimated_revenue,
        company.legal_structure.map(|l| l.code()),
        company.tax_indicators.tax_saving_potential.as_str(),
        company.location.as_ref().and_then(|l| l.region.as_deref()),
        payload,
        company.last_updated.to_rfc3339(),
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Address, Executive, Financials, Industry, LegalStructure, TaxSavingPotential,
    };

    fn open_test_db() -> Db {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");
        db
    }

    fn has_column(db: &Db, table: &str, column: &str) -> bool {
        let sql = format!("PRAGMA table_info({})", table);
        let mut stmt = db.conn.prepare(&sql).expect("prepare pragma");
        let names: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query")
            .filter_map(|r| r.ok())
            .collect();
        names.contains(&column.to_string())
    }

    fn get_user_version(db: &Db) -> i32 {
        db.conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("read user_version")
    }

    fn company(id: &str, name: &str, city: &str, state: &str) -> Company {
        Company::new(id, name).with_address(Address::new("1 Main St", city, state, "53000"))
    }

    fn sample_companies() -> Vec<Company> {
        vec![
            company("acme", "Acme Steel Fabrication", "Racine", "WI")
                .with_description("Custom steel fabrication shop, now hiring welders")
                .with_industry(Industry::new("Metal Fabrication").with_naics("332312"))
                .with_financials(Financials {
                    employee_count: Some(120),
                    estimated_revenue: Some(25_000_000.0),
                    growth_rate: Some(12.0),
                    ..Default::default()
                })
                .with_legal_structure(LegalStructure::FamilyOwned)
                .with_executive(Executive::new("Pat Acme", "Owner")),
            company("badger", "Badger Freight Lines", "Waukesha", "WI")
                .with_description("Regional truckload carrier")
                .with_industry(Industry::new("Trucking").with_naics("484121"))
                .with_financials(Financials {
                    employee_count: Some(45),
                    estimated_revenue: Some(8_000_000.0),
                    ..Default::default()
                }),
            company("cedar", "Cedar Builders", "Rockford", "IL")
                .with_description("General contractor for commercial buildings")
                .with_industry(Industry::new("Construction").with_naics("236220")),
        ]
    }

    /// The schema before the region and tax columns existed.
    const OLD_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    street TEXT,
    city TEXT,
    state TEXT,
    zip TEXT,
    industry TEXT,
    naics_code TEXT,
    sic_code TEXT,
    employee_count INTEGER,
    estimated_revenue REAL,
    legal_structure TEXT,
    payload TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
";

    #[test]
    fn init_is_idempotent() {
        let db = open_test_db();
        db.init().expect("second init");
        assert_eq!(get_user_version(&db), 1);
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn migration_adds_missing_columns() {
        let db = Db::open_in_memory().expect("open");
        db.conn.execute_batch(OLD_SCHEMA).expect("old schema");
        assert!(!has_column(&db, "companies", "region"));

        db.init().expect("migrate");
        assert!(has_column(&db, "companies", "region"));
        assert!(has_column(&db, "companies", "tax_saving_potential"));
        assert_eq!(get_user_version(&db), 1);
    }

    #[test]
    fn save_and_get_round_trip() {
        let db = open_test_db();
        let acme = sample_companies().remove(0);
        db.save(&acme).unwrap();

        let loaded = db.get("acme").unwrap().expect("stored");
        assert_eq!(loaded, acme);
        assert!(db.get("missing").unwrap().is_none());
    }

    #[test]
    fn save_upserts_by_id() {
        let db = open_test_db();
        db.save(&company("acme", "Acme", "Racine", "WI")).unwrap();
        db.save(&company("acme", "Acme Steel", "Kenosha", "WI")).unwrap();

        assert_eq!(db.count().unwrap(), 1);
        let loaded = db.get("acme").unwrap().unwrap();
        assert_eq!(loaded.name, "Acme Steel");
        assert_eq!(loaded.city(), Some("Kenosha"));
    }

    #[test]
    fn save_all_in_one_transaction() {
        let mut db = open_test_db();
        let written = db.save_all(&sample_companies()).unwrap();
        assert_eq!(written, 3);
        let names: Vec<String> = db.all(None).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "Acme Steel Fabrication",
                "Badger Freight Lines",
                "Cedar Builders"
            ]
        );
        assert_eq!(db.all(Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn search_by_name_and_location() {
        let mut db = open_test_db();
        db.save_all(&sample_companies()).unwrap();

        let by_name = db
            .search(&SearchCriteria::default().with_name("freight"), None)
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "badger");

        let in_wi = db
            .search(&SearchCriteria::default().with_location("wi"), None)
            .unwrap();
        assert_eq!(in_wi.len(), 2);
    }

    #[test]
    fn search_by_size_drops_unknown_values() {
        let mut db = open_test_db();
        db.save_all(&sample_companies()).unwrap();

        let big = db
            .search(&SearchCriteria::default().with_min_employees(50), None)
            .unwrap();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].id, "acme");

        let revenue = db
            .search(&SearchCriteria::default().with_min_revenue(5_000_000.0), None)
            .unwrap();
        assert_eq!(revenue.len(), 2);
    }

    #[test]
    fn search_applies_industry_and_flags_in_rust() {
        let mut db = open_test_db();
        db.save_all(&sample_companies()).unwrap();

        let trucking = db
            .search(&SearchCriteria::default().with_industry("trucking"), None)
            .unwrap();
        assert_eq!(trucking.len(), 1);
        assert_eq!(trucking[0].id, "badger");

        let owner_run = db
            .search(&SearchCriteria::default().with_owner_operated(true), None)
            .unwrap();
        assert_eq!(owner_run.len(), 1);
        assert_eq!(owner_run[0].id, "acme");

        let growing = db
            .search(&SearchCriteria::default().with_growth_mode(true), None)
            .unwrap();
        assert_eq!(growing.len(), 1);

        let low = db
            .search(
                &SearchCriteria::default().with_tax_potential(TaxSavingPotential::Low),
                Some(1),
            )
            .unwrap();
        assert_eq!(low.len(), 1);
    }

    #[test]
    fn by_region_uses_assigned_day() {
        let db = open_test_db();
        let mut acme = company("acme", "Acme", "Racine", "WI").with_location(42.7, -87.8);
        if let Some(loc) = acme.location.as_mut() {
            loc.region = Some("Tuesday".to_string());
        }
        db.save(&acme).unwrap();
        db.save(&company("badger", "Badger", "Waukesha", "WI")).unwrap();

        let tuesday = db.by_region("Tuesday").unwrap();
        assert_eq!(tuesday.len(), 1);
        assert_eq!(tuesday[0].id, "acme");
        assert!(db.by_region("Monday").unwrap().is_empty());
    }

    #[test]
    fn oversized_employee_count_is_clamped() {
        let mut db = open_test_db();
        let huge = company("huge", "Huge Co", "Racine", "WI").with_financials(Financials {
            employee_count: Some(u64::MAX),
            ..Default::default()
        });
        let small = company("small", "Small Co", "Racine", "WI").with_financials(Financials {
            employee_count: Some(10),
            ..Default::default()
        });
        db.save_all(&[huge, small]).unwrap();

        let stored: i64 = db
            .conn
            .query_row(
                "SELECT employee_count FROM companies WHERE id = 'huge'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, i64::MAX);

        let big = db
            .search(&SearchCriteria::default().with_min_employees(1_000_000), None)
            .unwrap();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].id, "huge");
        assert_eq!(big[0].financials.employee_count, Some(u64::MAX));

        let all = db
            .search(&SearchCriteria::default().with_min_employees(u64::MAX), None)
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(sql_count(42), 42);
    }

    #[test]
    fn delete_reports_whether_row_existed() {
        let db = open_test_db();
        db.save(&company("acme", "Acme", "Racine", "WI")).unwrap();
        assert!(db.delete("acme").unwrap());
        assert!(!db.delete("acme").unwrap());
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn meta_round_trip() {
        let db = open_test_db();
        assert_eq!(db.get_meta("last_collect").unwrap(), None);
        db.set_meta("last_collect", "2026-01-05").unwrap();
        db.set_meta("last_collect", "2026-01-06").unwrap();
        assert_eq!(
            db.get_meta("last_collect").unwrap().as_deref(),
            Some("2026-01-06")
        );
    }
}
