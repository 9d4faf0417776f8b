//! SQLite schema applied at startup.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS barangays (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    municipality TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL,
    email TEXT,
    role TEXT NOT NULL CHECK (role IN ('admin', 'staff')),
    barangay_id INTEGER REFERENCES barangays(id),
    status TEXT NOT NULL DEFAULT 'Active',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tricycle_routes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_code TEXT NOT NULL UNIQUE,
    route_name TEXT NOT NULL,
    description TEXT,
    start_point TEXT NOT NULL,
    end_point TEXT NOT NULL,
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    distance_km REAL NOT NULL,
    estimated_minutes INTEGER,
    regular_fare REAL NOT NULL,
    special_fare REAL,
    operating_start TEXT NOT NULL,
    operating_end TEXT NOT NULL,
    status TEXT NOT NULL,
    submission_status TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    approved_by INTEGER REFERENCES users(id),
    approved_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS route_approval_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES tricycle_routes(id),
    action TEXT NOT NULL,
    remarks TEXT,
    performed_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_route_approval_logs_route ON route_approval_logs(route_id);

CREATE TABLE IF NOT EXISTS tricycle_operators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operator_name TEXT NOT NULL,
    franchise_number TEXT NOT NULL UNIQUE,
    contact_number TEXT,
    address TEXT,
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tricycle_associations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    association_name TEXT NOT NULL,
    president_name TEXT,
    contact_number TEXT,
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tricycle_drivers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    license_number TEXT NOT NULL UNIQUE,
    contact_number TEXT,
    address TEXT,
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    operator_id INTEGER REFERENCES tricycle_operators(id),
    association_id INTEGER REFERENCES tricycle_associations(id),
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS route_terminals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    terminal_name TEXT NOT NULL,
    location TEXT NOT NULL,
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    route_id INTEGER REFERENCES tricycle_routes(id),
    capacity INTEGER NOT NULL DEFAULT 0,
    operating_hours TEXT,
    status TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS loading_zones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    zone_name TEXT NOT NULL,
    location TEXT NOT NULL,
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    route_id INTEGER REFERENCES tricycle_routes(id),
    capacity INTEGER NOT NULL DEFAULT 0,
    time_restriction TEXT,
    status TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS route_stops (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES tricycle_routes(id),
    stop_name TEXT NOT NULL,
    stop_order INTEGER NOT NULL,
    landmark TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (route_id, stop_order)
);

CREATE TABLE IF NOT EXISTS route_restrictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES tricycle_routes(id),
    restriction_type TEXT NOT NULL,
    description TEXT NOT NULL,
    start_time TEXT,
    end_time TEXT,
    effective_date TEXT,
    status TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS route_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_code TEXT NOT NULL UNIQUE,
    document_type TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    barangay_id INTEGER REFERENCES barangays(id),
    route_id INTEGER REFERENCES tricycle_routes(id),
    association_id INTEGER REFERENCES tricycle_associations(id),
    driver_id INTEGER REFERENCES tricycle_drivers(id),
    operator_id INTEGER REFERENCES tricycle_operators(id),
    original_name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    uploaded_by INTEGER NOT NULL REFERENCES users(id),
    valid_from TEXT,
    valid_until TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS document_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES route_documents(id),
    action TEXT NOT NULL,
    performed_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS route_submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    submission_code TEXT NOT NULL UNIQUE,
    route_id INTEGER REFERENCES tricycle_routes(id),
    submission_type TEXT NOT NULL,
    submitted_by INTEGER NOT NULL REFERENCES users(id),
    barangay_id INTEGER NOT NULL REFERENCES barangays(id),
    details TEXT NOT NULL,
    document_id INTEGER REFERENCES route_documents(id),
    status TEXT NOT NULL,
    reviewed_by INTEGER REFERENCES users(id),
    reviewed_at TEXT,
    review_notes TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS driver_association_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    driver_id INTEGER NOT NULL REFERENCES tricycle_drivers(id),
    association_id INTEGER NOT NULL REFERENCES tricycle_associations(id),
    membership_date TEXT NOT NULL,
    expiry_date TEXT,
    remarks TEXT,
    recorded_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS driver_attachments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES driver_association_records(id),
    original_name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
"#;
