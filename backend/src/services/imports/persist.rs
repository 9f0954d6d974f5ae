//! SQLite storage for imported records.
//!
//! Records of an import are written in a single transaction together with an
//! `import_batches` row describing the upload, so a file is stored entirely or
//! not at all. Nested sub-records keep their file order in `position`.

use common::import::ImportRecord;
use common::model::client::ClientRecord;
use common::model::import::ImportResult;
use common::model::nested::Location;
use common::model::vendor::VendorRecord;
use common::requests::ImportKind;
use log::info;
use rusqlite::{params, Connection, Transaction};
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS import_batches (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    file_md5 TEXT NOT NULL,
    success INTEGER NOT NULL,
    total_rows INTEGER NOT NULL,
    valid_rows INTEGER NOT NULL,
    invalid_rows INTEGER NOT NULL,
    persisted INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS clients (
    id TEXT PRIMARY KEY,
    batch_id TEXT NOT NULL,
    name TEXT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT,
    phone TEXT,
    risk_tier TEXT,
    contract_model TEXT,
    payment_terms_days INTEGER,
    is_active INTEGER
);
CREATE TABLE IF NOT EXISTS client_departments (
    client_id TEXT NOT NULL REFERENCES clients(id),
    position INTEGER NOT NULL,
    type TEXT NOT NULL,
    contact_name TEXT,
    contact_email TEXT,
    contact_phone TEXT,
    PRIMARY KEY (client_id, position)
);
CREATE TABLE IF NOT EXISTS client_locations (
    client_id TEXT NOT NULL REFERENCES clients(id),
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT,
    country TEXT,
    PRIMARY KEY (client_id, position)
);
CREATE TABLE IF NOT EXISTS vendors (
    id TEXT PRIMARY KEY,
    batch_id TEXT NOT NULL,
    name TEXT NOT NULL,
    contact_email TEXT,
    contact_phone TEXT,
    category TEXT,
    risk_tier TEXT,
    lead_time_days INTEGER,
    is_preferred INTEGER
);
CREATE TABLE IF NOT EXISTS vendor_locations (
    vendor_id TEXT NOT NULL REFERENCES vendors(id),
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT,
    country TEXT,
    PRIMARY KEY (vendor_id, position)
);
";

/// Creates the import tables if they do not exist yet.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// An importable record that knows how to store itself.
pub trait StoreRecords: ImportRecord {
    /// Inserts `records` and returns how many parent rows were written.
    fn store(tx: &Transaction<'_>, batch_id: &str, records: &[Self]) -> rusqlite::Result<usize>;
}

/// Logs the import batch and, when the import succeeded, stores its records.
///
/// Returns the number of records stored; a failed import stores none.
pub fn save_import<R: StoreRecords>(
    conn: &mut Connection,
    kind: ImportKind,
    file_md5: &str,
    result: &ImportResult<R>,
) -> rusqlite::Result<usize> {
    let batch_id = Uuid::new_v4().to_string();
    let tx = conn.transaction()?;

    let persisted = if result.success {
        R::store(&tx, &batch_id, &result.records)?
    } else {
        0
    };

    tx.execute(
        "INSERT INTO import_batches
            (id, kind, file_md5, success, total_rows, valid_rows, invalid_rows, persisted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            batch_id,
            kind.as_str(),
            file_md5,
            result.success,
            result.total_rows,
            result.valid_rows,
            result.invalid_rows,
            persisted
        ],
    )?;
    tx.commit()?;

    info!(
        "Import batch {} ({}) stored {} of {} rows",
        batch_id,
        kind.as_str(),
        persisted,
        result.total_rows
    );
    Ok(persisted)
}

fn insert_locations(
    tx: &Transaction<'_>,
    sql: &str,
    owner_id: &str,
    locations: &[Location],
) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;
    for (position, location) in locations.iter().enumerate() {
        stmt.execute(params![
            owner_id,
            position,
            location.name,
            location.address,
            location.city,
            location.country
        ])?;
    }
    Ok(())
}

impl StoreRecords for ClientRecord {
    fn store(tx: &Transaction<'_>, batch_id: &str, records: &[Self]) -> rusqlite::Result<usize> {
        let mut client_stmt = tx.prepare_cached(
            "INSERT INTO clients
                (id, batch_id, name, username, email, phone, risk_tier, contract_model,
                 payment_terms_days, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        let mut department_stmt = tx.prepare_cached(
            "INSERT INTO client_departments
                (client_id, position, type, contact_name, contact_email, contact_phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for client in records {
            // Passwords are not stored here; accounts get their credentials
            // from the authentication service.
            let id = Uuid::new_v4().to_string();
            client_stmt.execute(params![
                id,
                batch_id,
                client.name,
                client.username,
                client.email,
                client.phone,
                client.risk_tier.map(|tier| tier.as_str()),
                client.contract_model.map(|model| model.as_str()),
                client.payment_terms_days,
                client.is_active
            ])?;

            for (position, department) in client.departments.iter().flatten().enumerate() {
                department_stmt.execute(params![
                    id,
                    position,
                    department.kind,
                    department.contact_name,
                    department.contact_email,
                    department.contact_phone
                ])?;
            }

            insert_locations(
                tx,
                "INSERT INTO client_locations
                    (client_id, position, name, address, city, country)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &id,
                client.locations.as_deref().unwrap_or_default(),
            )?;
        }

        Ok(records.len())
    }
}

impl StoreRecords for VendorRecord {
    fn store(tx: &Transaction<'_>, batch_id: &str, records: &[Self]) -> rusqlite::Result<usize> {
        let mut vendor_stmt = tx.prepare_cached(
            "INSERT INTO vendors
                (id, batch_id, name, contact_email, contact_phone, category, risk_tier,
                 lead_time_days, is_preferred)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        for vendor in records {
            let id = Uuid::new_v4().to_string();
            vendor_stmt.execute(params![
                id,
                batch_id,
                vendor.name,
                vendor.contact_email,
                vendor.contact_phone,
                vendor.category,
                vendor.risk_tier.map(|tier| tier.as_str()),
                vendor.lead_time_days,
                vendor.is_preferred
            ])?;

            insert_locations(
                tx,
                "INSERT INTO vendor_locations
                    (vendor_id, position, name, address, city, country)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &id,
                vendor.locations.as_deref().unwrap_or_default(),
            )?;
        }

        Ok(records.len())
    }
}
