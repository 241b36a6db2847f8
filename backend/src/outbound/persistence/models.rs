//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{speedtests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub zipcode: String,
    pub api_key: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub zipcode: &'a str,
    pub api_key: &'a str,
}

/// Row struct for reading from the speedtests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = speedtests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SpeedTestRow {
    pub id: i64,
    pub isp: String,
    pub zipcode: String,
    pub download: i32,
    pub upload: i32,
    pub ping: i32,
    pub api_key: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<i32>,
    pub condition: Option<String>,
}

/// Insertable struct for creating new speed-test records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = speedtests)]
pub(crate) struct NewSpeedTestRow<'a> {
    pub isp: &'a str,
    pub zipcode: &'a str,
    pub download: i32,
    pub upload: i32,
    pub ping: i32,
    pub api_key: &'a str,
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<i32>,
    pub condition: Option<&'a str>,
}
