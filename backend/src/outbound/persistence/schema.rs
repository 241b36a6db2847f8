//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `username` and `api_key` are unique.
    users (id) {
        id -> Int8,
        username -> Varchar,
        zipcode -> Varchar,
        api_key -> Varchar,
    }
}

diesel::table! {
    /// Submitted measurements. `api_key` references `users.api_key`.
    speedtests (id) {
        id -> Int8,
        isp -> Varchar,
        zipcode -> Varchar,
        download -> Int4,
        upload -> Int4,
        ping -> Int4,
        api_key -> Varchar,
        /// Server-assigned ingestion time.
        timestamp -> Timestamptz,
        /// Degrees Fahrenheit; null when enrichment failed.
        temperature -> Nullable<Int4>,
        condition -> Nullable<Varchar>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, speedtests);
