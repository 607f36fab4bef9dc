use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::AddAttendance;
use crate::database::models::{Attendance, AttendanceKind, NewAttendance};
use crate::database::AttendanceRepository;
use crate::error::{ServiceError, ServiceResult};
use crate::rest::Pagination;

use super::{AccountServicer, AttendanceServicer, LocationServicer};

pub struct AttendanceService {
    repo: Arc<dyn AttendanceRepository>,
    accounts: Arc<dyn AccountServicer>,
    locations: Arc<dyn LocationServicer>,
}

impl AttendanceService {
    pub fn new(
        repo: Arc<dyn AttendanceRepository>,
        accounts: Arc<dyn AccountServicer>,
        locations: Arc<dyn LocationServicer>,
    ) -> Self {
        Self { repo, accounts, locations }
    }
}

/// Check-ins and check-outs must alternate, starting with a check-in
fn check_transition(latest: Option<AttendanceKind>, next: AttendanceKind) -> ServiceResult<()> {
    match (latest, next) {
        (Some(AttendanceKind::CheckIn), AttendanceKind::CheckIn) => Err(ServiceError::AlreadyCheckedIn),
        (Some(AttendanceKind::CheckIn), AttendanceKind::CheckOut) => Ok(()),
        (_, AttendanceKind::CheckIn) => Ok(()),
        (_, AttendanceKind::CheckOut) => Err(ServiceError::NotCheckedIn),
    }
}

#[async_trait]
impl AttendanceServicer for AttendanceService {
    async fn history(&self, account_id: i64, pagination: Pagination) -> ServiceResult<(Vec<Attendance>, i64)> {
        Ok(self.repo.list_by_account(account_id, pagination).await?)
    }

    async fn by_location(&self, location_id: i64, pagination: Pagination) -> ServiceResult<(Vec<Attendance>, i64)> {
        self.locations.take(location_id).await?;
        Ok(self.repo.list_by_location(location_id, pagination).await?)
    }

    async fn add(&self, account_id: i64, request: AddAttendance) -> ServiceResult<Attendance> {
        let kind = AttendanceKind::try_from(request.kind).map_err(|_| ServiceError::InvalidFormat)?;

        self.accounts.take_account_by_id(account_id).await?;
        self.locations.take(request.location_id).await?;

        let entry = NewAttendance {
            account_id,
            location_id: request.location_id,
            kind,
            note: request.note.filter(|n| !n.trim().is_empty()),
        };

        // Re-checked whenever a concurrent entry lands between read and write
        let attendance = loop {
            let latest = self.repo.latest_for_account(account_id).await?.map(|a| a.kind);
            check_transition(latest, kind)?;

            if let Some(attendance) = self.repo.insert_if_latest(entry.clone(), latest).await? {
                break attendance;
            }
            debug!("Attendance for account {} changed concurrently, re-checking", account_id);
        };

        info!(
            "Account {} {} at location {}",
            account_id, attendance.kind, attendance.location_id
        );
        Ok(attendance)
    }
}
