//! SQLite-backed employee record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{RosterError, RosterResult};
use crate::traits::RecordStore;
use crate::types::{
    DepartmentCount, EmployeeFilter, EmployeeRecord, EmploymentStatus, StatsOverview,
};

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Create a new store at the given path.
    pub fn new(path: impl AsRef<Path>) -> RosterResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> RosterResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> RosterResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id              TEXT PRIMARY KEY,
                employee_id     TEXT NOT NULL UNIQUE,
                full_name       TEXT NOT NULL,
                email           TEXT NOT NULL,
                phone           TEXT,
                department      TEXT NOT NULL,
                designation     TEXT NOT NULL,
                salary          REAL NOT NULL,
                status          TEXT NOT NULL,
                date_of_joining TEXT NOT NULL,
                is_deleted      INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_employees_department
                ON employees(department);
        "#,
        )?;
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> RosterResult<EmployeeRecord> {
        let id: String = row.get(0)?;
        let employee_id: String = row.get(1)?;
        let full_name: String = row.get(2)?;
        let email: String = row.get(3)?;
        let phone: Option<String> = row.get(4)?;
        let department: String = row.get(5)?;
        let designation: String = row.get(6)?;
        let salary: f64 = row.get(7)?;
        let status: String = row.get(8)?;
        let date_of_joining: String = row.get(9)?;
        let is_deleted: i64 = row.get(10)?;
        let created_at: String = row.get(11)?;
        let updated_at: String = row.get(12)?;

        Ok(EmployeeRecord {
            id: Uuid::parse_str(&id).map_err(|e| RosterError::parse(e.to_string()))?,
            employee_id,
            full_name,
            email,
            phone,
            department,
            designation,
            salary,
            status: EmploymentStatus::parse(&status)
                .map_err(|_| RosterError::parse(format!("unknown status '{}'", status)))?,
            date_of_joining: parse_datetime(&date_of_joining)?,
            is_deleted: is_deleted != 0,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        })
    }

    fn get_sync(conn: &Connection, id: Uuid) -> RosterResult<Option<EmployeeRecord>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM employees WHERE id = ?1"
        ))?;
        stmt.query_row(params![id.to_string()], |row| Ok(Self::row_to_record(row)))
            .optional()?
            .transpose()
    }
}

fn parse_datetime(s: &str) -> RosterResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RosterError::parse(format!("bad timestamp '{}': {}", s, e)))
}

const SELECT_COLUMNS: &str = "id, employee_id, full_name, email, phone, department, designation, \
                              salary, status, date_of_joining, is_deleted, created_at, updated_at";

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get(&self, id: Uuid) -> RosterResult<Option<EmployeeRecord>> {
        let conn = self.conn.lock().unwrap();
        Self::get_sync(&conn, id)
    }

    async fn get_by_employee_id(
        &self,
        employee_id: &str,
    ) -> RosterResult<Option<EmployeeRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM employees WHERE employee_id = ?1"
        ))?;
        stmt.query_row(params![employee_id], |row| Ok(Self::row_to_record(row)))
            .optional()?
            .transpose()
    }

    async fn insert(&self, record: &EmployeeRecord) -> RosterResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"INSERT INTO employees
               (id, employee_id, full_name, email, phone, department, designation,
                salary, status, date_of_joining, is_deleted, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
            params![
                record.id.to_string(),
                record.employee_id,
                record.full_name,
                record.email,
                record.phone,
                record.department,
                record.designation,
                record.salary,
                record.status.as_str(),
                record.date_of_joining.to_rfc3339(),
                record.is_deleted as i64,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn update(&self, id: Uuid, record: &EmployeeRecord) -> RosterResult<EmployeeRecord> {
        let conn = self.conn.lock().unwrap();
        let prior = Self::get_sync(&conn, id)?
            .filter(|r| !r.is_deleted)
            .ok_or_else(|| RosterError::not_found(id.to_string()))?;

        conn.execute(
            r#"UPDATE employees SET
                 employee_id = ?2, full_name = ?3, email = ?4, phone = ?5,
                 department = ?6, designation = ?7, salary = ?8, status = ?9,
                 date_of_joining = ?10, updated_at = ?11
               WHERE id = ?1"#,
            params![
                id.to_string(),
                record.employee_id,
                record.full_name,
                record.email,
                record.phone,
                record.department,
                record.designation,
                record.salary,
                record.status.as_str(),
                record.date_of_joining.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(prior)
    }

    async fn soft_delete(&self, id: Uuid) -> RosterResult<EmployeeRecord> {
        let conn = self.conn.lock().unwrap();
        let prior = Self::get_sync(&conn, id)?
            .filter(|r| !r.is_deleted)
            .ok_or_else(|| RosterError::not_found(id.to_string()))?;

        conn.execute(
            "UPDATE employees SET is_deleted = 1, updated_at = ?2 WHERE id = ?1",
            params![id.to_string(), Utc::now().to_rfc3339()],
        )?;

        Ok(prior)
    }

    async fn list(
        &self,
        filter: &EmployeeFilter,
        page: u32,
        page_size: u32,
    ) -> RosterResult<(Vec<EmployeeRecord>, u64)> {
        let conn = self.conn.lock().unwrap();

        let mut clauses = vec!["is_deleted = 0".to_string()];
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref department) = filter.department {
            args.push(Box::new(department.clone()));
            clauses.push(format!("department = ?{}", args.len()));
        }
        if let Some(status) = filter.status {
            args.push(Box::new(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", args.len()));
        }
        if let Some(ref search) = filter.search {
            args.push(Box::new(format!("%{}%", search)));
            let n = args.len();
            clauses.push(format!(
                "(full_name LIKE ?{n} COLLATE NOCASE OR employee_id LIKE ?{n} COLLATE NOCASE)"
            ));
        }
        let where_clause = clauses.join(" AND ");

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM employees WHERE {where_clause}"),
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            |row| row.get(0),
        )?;

        let offset = (page.max(1) as u64 - 1) * page_size as u64;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM employees WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT {} OFFSET {}",
            page_size, offset
        ))?;

        let results = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            |row| Ok(Self::row_to_record(row)),
        )?;

        let records = results
            .map(|r| r.map_err(RosterError::from).and_then(|inner| inner))
            .collect::<RosterResult<Vec<_>>>()?;

        Ok((records, total as u64))
    }

    async fn stats(&self) -> RosterResult<StatsOverview> {
        let conn = self.conn.lock().unwrap();

        let (total, active, inactive) = conn.query_row(
            r#"SELECT
                 COUNT(*),
                 SUM(CASE WHEN status = 'Active' THEN 1 ELSE 0 END),
                 SUM(CASE WHEN status = 'Inactive' THEN 1 ELSE 0 END)
               FROM employees WHERE is_deleted = 0"#,
            [],
            |row| {
                let total: i64 = row.get(0)?;
                let active: Option<i64> = row.get(1)?;
                let inactive: Option<i64> = row.get(2)?;
                Ok((
                    total as u64,
                    active.unwrap_or(0) as u64,
                    inactive.unwrap_or(0) as u64,
                ))
            },
        )?;

        let mut stmt = conn.prepare(
            r#"SELECT department, COUNT(*) FROM employees
               WHERE is_deleted = 0
               GROUP BY department
               ORDER BY department"#,
        )?;
        let departments = stmt
            .query_map([], |row| {
                Ok(DepartmentCount {
                    department: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatsOverview {
            total,
            active,
            inactive,
            departments,
        })
    }
}
