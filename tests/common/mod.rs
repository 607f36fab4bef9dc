#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use attendance_api::auth::JwtKeys;
use attendance_api::config::AppConfig;
use attendance_api::database::models::{
    Account, AccountChanges, Attendance, AttendanceKind, Location, LocationChanges, NewAccount,
    NewAttendance, NewLocation,
};
use attendance_api::database::{
    AccountField, AccountRepository, AttendanceRepository, DatabaseError, HealthCheck,
    LocationRepository,
};
use attendance_api::rest::{Pagination, Responder};
use attendance_api::routes;
use attendance_api::services::{
    AccountService, AccountServicer, AttendanceService, AttendanceServicer, LocationService,
    LocationServicer,
};
use attendance_api::state::{AppState, PageLimits};

fn page<T: Clone>(rows: &[T], pagination: Pagination) -> Vec<T> {
    rows.iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct MemoryAccounts {
    rows: Mutex<Vec<Account>>,
}

impl MemoryAccounts {
    fn live(&self) -> Vec<Account> {
        let rows = self.rows.lock().unwrap();
        rows.iter().filter(|a| a.deleted_at.is_none()).cloned().collect()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn insert(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let row = Account {
            id: rows.len() as i64 + 1,
            username: account.username,
            password: account.password_hash,
            name: account.name,
            email: account.email,
            ktp_number: account.ktp_number,
            phone_number: account.phone_number,
            dob: account.dob,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DatabaseError> {
        Ok(self.live().into_iter().find(|a| a.id == id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DatabaseError> {
        Ok(self.live().into_iter().find(|a| a.username == username))
    }

    async fn is_taken(
        &self,
        field: AccountField,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DatabaseError> {
        Ok(self.live().iter().any(|a| {
            let current = match field {
                AccountField::Username => &a.username,
                AccountField::Email => &a.email,
                AccountField::KtpNumber => &a.ktp_number,
                AccountField::PhoneNumber => &a.phone_number,
            };
            current == value && Some(a.id) != exclude_id
        }))
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|a| a.id == id && a.deleted_at.is_none()) else {
            return Ok(false);
        };

        if let Some(v) = changes.username {
            row.username = v;
        }
        if let Some(v) = changes.password_hash {
            row.password = v;
        }
        if let Some(v) = changes.name {
            row.name = v;
        }
        if let Some(v) = changes.email {
            row.email = v;
        }
        if let Some(v) = changes.ktp_number {
            row.ktp_number = v;
        }
        if let Some(v) = changes.phone_number {
            row.phone_number = v;
        }
        if let Some(v) = changes.dob {
            row.dob = v;
        }
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|a| a.username == username && a.deleted_at.is_none())
        {
            Some(row) => {
                row.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|a| a.id == id && a.deleted_at.is_none()) {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryLocations {
    rows: Mutex<Vec<Location>>,
}

impl MemoryLocations {
    fn live(&self) -> Vec<Location> {
        let rows = self.rows.lock().unwrap();
        rows.iter().filter(|l| l.deleted_at.is_none()).cloned().collect()
    }
}

#[async_trait]
impl LocationRepository for MemoryLocations {
    async fn list(&self, pagination: Pagination) -> Result<(Vec<Location>, i64), DatabaseError> {
        let live = self.live();
        Ok((page(&live, pagination), live.len() as i64))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DatabaseError> {
        Ok(self.live().into_iter().find(|l| l.id == id))
    }

    async fn name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool, DatabaseError> {
        Ok(self
            .live()
            .iter()
            .any(|l| l.name == name && Some(l.id) != exclude_id))
    }

    async fn insert(&self, location: NewLocation) -> Result<Location, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let row = Location {
            id: rows.len() as i64 + 1,
            name: location.name,
            address: location.address,
            latitude: location.latitude,
            longitude: location.longitude,
            radius_meters: location.radius_meters,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: LocationChanges) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|l| l.id == id && l.deleted_at.is_none()) else {
            return Ok(false);
        };

        if let Some(v) = changes.name {
            row.name = v;
        }
        if let Some(v) = changes.address {
            row.address = v;
        }
        if let Some(v) = changes.latitude {
            row.latitude = v;
        }
        if let Some(v) = changes.longitude {
            row.longitude = v;
        }
        if let Some(v) = changes.radius_meters {
            row.radius_meters = v;
        }
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|l| l.id == id && l.deleted_at.is_none()) {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryAttendance {
    rows: Mutex<Vec<Attendance>>,
}

impl MemoryAttendance {
    /// Newest first; ids break timestamp ties
    fn matching(&self, keep: impl Fn(&Attendance) -> bool) -> Vec<Attendance> {
        let rows = self.rows.lock().unwrap();
        let mut found: Vec<Attendance> = rows.iter().filter(|a| keep(a)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        found
    }
}

#[async_trait]
impl AttendanceRepository for MemoryAttendance {
    async fn insert_if_latest(
        &self,
        attendance: NewAttendance,
        expected: Option<AttendanceKind>,
    ) -> Result<Option<Attendance>, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let latest = rows
            .iter()
            .filter(|a| a.account_id == attendance.account_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .map(|a| a.kind);
        if latest != expected {
            return Ok(None);
        }

        let row = Attendance {
            id: rows.len() as i64 + 1,
            account_id: attendance.account_id,
            location_id: attendance.location_id,
            kind: attendance.kind,
            note: attendance.note,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(Some(row))
    }

    async fn latest_for_account(&self, account_id: i64) -> Result<Option<Attendance>, DatabaseError> {
        Ok(self.matching(|a| a.account_id == account_id).into_iter().next())
    }

    async fn list_by_account(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        let found = self.matching(|a| a.account_id == account_id);
        Ok((page(&found, pagination), found.len() as i64))
    }

    async fn list_by_location(
        &self,
        location_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        let found = self.matching(|a| a.location_id == location_id);
        Ok((page(&found, pagination), found.len() as i64))
    }
}

/// Hands control back to the runtime after every read, so concurrent
/// requests interleave between reading the latest entry and writing a new one
#[derive(Default)]
pub struct YieldingAttendance {
    inner: MemoryAttendance,
}

#[async_trait]
impl AttendanceRepository for YieldingAttendance {
    async fn insert_if_latest(
        &self,
        attendance: NewAttendance,
        expected: Option<AttendanceKind>,
    ) -> Result<Option<Attendance>, DatabaseError> {
        self.inner.insert_if_latest(attendance, expected).await
    }

    async fn latest_for_account(&self, account_id: i64) -> Result<Option<Attendance>, DatabaseError> {
        let latest = self.inner.latest_for_account(account_id).await;
        tokio::task::yield_now().await;
        latest
    }

    async fn list_by_account(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        self.inner.list_by_account(account_id, pagination).await
    }

    async fn list_by_location(
        &self,
        location_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        self.inner.list_by_location(location_id, pagination).await
    }
}

struct AlwaysHealthy;

#[async_trait]
impl HealthCheck for AlwaysHealthy {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub const BCRYPT_TEST_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub jwt: JwtKeys,
}

/// Full router over in-memory repositories
pub fn test_app() -> TestApp {
    let jwt = JwtKeys::new("test-secret", 1).expect("test keys");

    let accounts: Arc<dyn AccountServicer> = Arc::new(AccountService::new(
        Arc::new(MemoryAccounts::default()),
        BCRYPT_TEST_COST,
    ));
    let locations: Arc<dyn LocationServicer> =
        Arc::new(LocationService::new(Arc::new(MemoryLocations::default())));
    let attendance: Arc<dyn AttendanceServicer> = Arc::new(AttendanceService::new(
        Arc::new(MemoryAttendance::default()),
        accounts.clone(),
        locations.clone(),
    ));

    let state = AppState {
        responder: Responder::default(),
        jwt: jwt.clone(),
        accounts,
        locations,
        attendance,
        health: Arc::new(AlwaysHealthy),
        limits: PageLimits {
            default_limit: 10,
            max_limit: 100,
        },
    };

    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;

    TestApp {
        router: routes::app(state, &config),
        jwt,
    }
}

impl TestApp {
    /// Sends one request and returns the status with the decoded JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = serde_json::from_slice(&bytes)
            .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?;
        Ok((status, body))
    }

    /// Registers `username` with unique identity numbers derived from `seed`
    pub async fn register(&self, username: &str, seed: u32) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, "/v1/accounts/register", None, Some(registration(username, seed)))
            .await
    }

    /// Registers then logs in, returning the `Bearer ...` header value
    pub async fn signup(&self, username: &str, seed: u32) -> Result<String> {
        let (status, body) = self.register(username, seed).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {body}");

        let (status, body) = self
            .send(
                Method::POST,
                "/v1/auth",
                None,
                Some(json!({ "username": username, "password": "secret1" })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {body}");

        body["result"]["token"]
            .as_str()
            .map(str::to_string)
            .context("token missing from login response")
    }

    /// Creates a location named `name`, returning its id
    pub async fn create_location(&self, token: &str, name: &str) -> Result<i64> {
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/locations",
                Some(token),
                Some(json!({
                    "name": name,
                    "address": "Jl. Jend. Sudirman No. 1, Jakarta",
                    "latitude": -6.2088,
                    "longitude": 106.8456,
                    "radius_meters": 100
                })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create location failed: {body}");

        body["result"]["id"].as_i64().context("location id missing")
    }
}

pub fn registration(username: &str, seed: u32) -> Value {
    json!({
        "username": username,
        "password": "secret1",
        "name": "Test User",
        "email": format!("user{seed}@example.com"),
        "ktp_number": format!("{:016}", 3171000000000000u64 + seed as u64),
        "phone_number": format!("0812{:08}", seed),
        "dob": "1990-04-12"
    })
}
