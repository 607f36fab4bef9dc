use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::{RegisterAccount, UpdateAccount};
use crate::auth::{hash_password, verify_password};
use crate::database::models::{Account, AccountChanges, NewAccount};
use crate::database::{AccountField, AccountRepository, DatabaseError, UniqueKey};
use crate::error::{ServiceError, ServiceResult};

use super::{normalize_username, AccountServicer};

const DOB_FORMAT: &str = "%Y-%m-%d";

pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    /// Without an account to exclude the value is checked for a registration
    async fn ensure_free(
        &self,
        field: AccountField,
        value: &str,
        exclude_id: Option<i64>,
    ) -> ServiceResult<()> {
        if self.repo.is_taken(field, value, exclude_id).await? {
            return Err(taken(field, exclude_id.is_none()));
        }
        Ok(())
    }
}

fn taken(field: AccountField, registering: bool) -> ServiceError {
    match field {
        AccountField::Username if registering => ServiceError::AccountExist,
        AccountField::Username => ServiceError::UsernameAlreadyExist,
        AccountField::Email => ServiceError::EmailAlreadyExist,
        AccountField::KtpNumber => ServiceError::KtpNumberAlreadyExist,
        AccountField::PhoneNumber => ServiceError::PhoneNumberAlreadyExist,
    }
}

/// A write that lost a race against the uniqueness check
fn write_conflict(err: DatabaseError, registering: bool) -> ServiceError {
    match err {
        DatabaseError::Conflict(UniqueKey::Account(field)) => taken(field, registering),
        other => other.into(),
    }
}

fn parse_dob(dob: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(dob.trim(), DOB_FORMAT).map_err(|_| ServiceError::InvalidDobFormat)
}

/// `Some("")` is treated the same as an absent member
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl AccountServicer for AccountService {
    async fn create(&self, request: RegisterAccount) -> ServiceResult<Account> {
        let username = normalize_username(&request.username);
        if username.is_empty() {
            return Err(ServiceError::UsernameCannotBeEmpty);
        }
        if request.password.is_empty() {
            return Err(ServiceError::PasswordCannotBeEmpty);
        }

        self.ensure_free(AccountField::Username, &username, None).await?;
        self.ensure_free(AccountField::Email, &request.email, None).await?;
        self.ensure_free(AccountField::KtpNumber, &request.ktp_number, None).await?;
        self.ensure_free(AccountField::PhoneNumber, &request.phone_number, None).await?;

        let dob = parse_dob(&request.dob)?;
        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;

        let account = self
            .repo
            .insert(NewAccount {
                username,
                password_hash,
                name: request.name,
                email: request.email,
                ktp_number: request.ktp_number,
                phone_number: request.phone_number,
                dob,
            })
            .await
            .map_err(|e| write_conflict(e, true))?;

        info!("Registered account {} ({})", account.id, account.username);
        Ok(account)
    }

    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Account> {
        let account = self.take_account_by_username(username).await?;

        if !verify_password(password.to_string(), account.password.clone()).await? {
            debug!("Password mismatch for account {}", account.id);
            return Err(ServiceError::InvalidPassword);
        }

        Ok(account)
    }

    async fn take_account_by_username(&self, username: &str) -> ServiceResult<Account> {
        self.repo
            .find_by_username(&normalize_username(username))
            .await?
            .ok_or(ServiceError::AccountNotRegistered)
    }

    async fn take_account_by_id(&self, id: i64) -> ServiceResult<Account> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::AccountNotRegistered)
    }

    async fn update(&self, id: i64, request: UpdateAccount) -> ServiceResult<Account> {
        self.take_account_by_id(id).await?;

        let mut changes = AccountChanges::default();

        if let Some(username) = request.username {
            let username = normalize_username(&username);
            if username.is_empty() {
                return Err(ServiceError::UsernameCannotBeEmpty);
            }
            self.ensure_free(AccountField::Username, &username, Some(id)).await?;
            changes.username = Some(username);
        }

        if let Some(password) = request.password {
            if password.is_empty() {
                return Err(ServiceError::PasswordCannotBeEmpty);
            }
            changes.password_hash = Some(hash_password(password, self.bcrypt_cost).await?);
        }

        if let Some(email) = non_empty(request.email) {
            self.ensure_free(AccountField::Email, &email, Some(id)).await?;
            changes.email = Some(email);
        }

        if let Some(ktp_number) = non_empty(request.ktp_number) {
            self.ensure_free(AccountField::KtpNumber, &ktp_number, Some(id)).await?;
            changes.ktp_number = Some(ktp_number);
        }

        if let Some(phone_number) = non_empty(request.phone_number) {
            self.ensure_free(AccountField::PhoneNumber, &phone_number, Some(id)).await?;
            changes.phone_number = Some(phone_number);
        }

        if let Some(dob) = non_empty(request.dob) {
            changes.dob = Some(parse_dob(&dob)?);
        }

        changes.name = non_empty(request.name);

        let updated = self
            .repo
            .update(id, changes)
            .await
            .map_err(|e| write_conflict(e, false))?;
        if !updated {
            return Err(ServiceError::AccountNotRegistered);
        }

        info!("Updated account {}", id);
        self.take_account_by_id(id).await
    }

    async fn update_password(&self, username: &str, password: &str) -> ServiceResult<()> {
        if password.is_empty() {
            return Err(ServiceError::PasswordCannotBeEmpty);
        }

        let username = normalize_username(username);
        let hash = hash_password(password.to_string(), self.bcrypt_cost).await?;

        if !self.repo.update_password(&username, &hash).await? {
            return Err(ServiceError::AccountNotRegistered);
        }

        info!("Password reset for {}", username);
        Ok(())
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.soft_delete(id).await? {
            return Err(ServiceError::AccountNotRegistered);
        }

        info!("Deleted account {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Passes every uniqueness check, then loses the write to a concurrent
    /// request holding `field`.
    struct LateConflict {
        field: AccountField,
    }

    impl LateConflict {
        fn service(field: AccountField) -> AccountService {
            AccountService::new(Arc::new(Self { field }), 4)
        }

        fn conflict(&self) -> DatabaseError {
            DatabaseError::Conflict(UniqueKey::Account(self.field))
        }
    }

    #[async_trait]
    impl AccountRepository for LateConflict {
        async fn insert(&self, _account: NewAccount) -> Result<Account, DatabaseError> {
            Err(self.conflict())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DatabaseError> {
            let now = Utc::now();
            Ok(Some(Account {
                id,
                username: "budi".into(),
                password: String::new(),
                name: "Budi".into(),
                email: "budi@example.com".into(),
                ktp_number: "3171000000000001".into(),
                phone_number: "081200000001".into(),
                dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }))
        }

        async fn find_by_username(&self, _username: &str) -> Result<Option<Account>, DatabaseError> {
            Ok(None)
        }

        async fn is_taken(
            &self,
            _field: AccountField,
            _value: &str,
            _exclude_id: Option<i64>,
        ) -> Result<bool, DatabaseError> {
            Ok(false)
        }

        async fn update(&self, _id: i64, _changes: AccountChanges) -> Result<bool, DatabaseError> {
            Err(self.conflict())
        }

        async fn update_password(&self, _username: &str, _hash: &str) -> Result<bool, DatabaseError> {
            Ok(true)
        }

        async fn soft_delete(&self, _id: i64) -> Result<bool, DatabaseError> {
            Ok(true)
        }
    }

    fn registration() -> RegisterAccount {
        RegisterAccount {
            username: "siti".into(),
            password: "secret1".into(),
            name: "Siti".into(),
            email: "siti@example.com".into(),
            ktp_number: "3171000000000002".into(),
            phone_number: "081200000002".into(),
            dob: "1992-01-30".into(),
        }
    }

    #[tokio::test]
    async fn register_race_on_username_is_account_exist() {
        let result = LateConflict::service(AccountField::Username).create(registration()).await;
        assert!(matches!(result, Err(ServiceError::AccountExist)));
    }

    #[tokio::test]
    async fn register_race_on_other_fields_names_the_field() {
        let result = LateConflict::service(AccountField::Email).create(registration()).await;
        assert!(matches!(result, Err(ServiceError::EmailAlreadyExist)));

        let result = LateConflict::service(AccountField::PhoneNumber).create(registration()).await;
        assert!(matches!(result, Err(ServiceError::PhoneNumberAlreadyExist)));
    }

    #[tokio::test]
    async fn update_race_is_a_field_sentinel_not_a_database_error() {
        let request = UpdateAccount {
            username: Some("siti".into()),
            ..Default::default()
        };
        let result = LateConflict::service(AccountField::Username).update(1, request).await;
        assert!(matches!(result, Err(ServiceError::UsernameAlreadyExist)));

        let request = UpdateAccount {
            ktp_number: Some("3171000000000002".into()),
            ..Default::default()
        };
        let result = LateConflict::service(AccountField::KtpNumber).update(1, request).await;
        assert!(matches!(result, Err(ServiceError::KtpNumberAlreadyExist)));
    }

    #[test]
    fn dob_must_be_iso_date() {
        assert_eq!(
            parse_dob("1990-04-12").unwrap(),
            NaiveDate::from_ymd_opt(1990, 4, 12).unwrap()
        );
        assert!(matches!(parse_dob("12/04/1990"), Err(ServiceError::InvalidDobFormat)));
        assert!(matches!(parse_dob("1990-02-30"), Err(ServiceError::InvalidDobFormat)));
    }

    #[test]
    fn blank_optional_members_are_ignored() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("a".into())), Some("a".into()));
        assert_eq!(non_empty(None), None);
    }
}
