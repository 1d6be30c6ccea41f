//! In-process application store.
//!
//! Applications live in a map behind a [`tokio::sync::RwLock`]. Concurrent
//! updates to the same application are serialized by the write lock and
//! resolve last-write-wins; there is no version check.

use std::collections::HashMap;

use panchayat_core::application::{Application, ApplicationStatus};
use panchayat_core::error::CoreError;
use panchayat_core::services::ServiceType;
use panchayat_core::types::{ApplicationId, UserId};
use tokio::sync::RwLock;

/// Filters for [`ApplicationStore::list`].
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub service_type: Option<ServiceType>,
    /// Restrict to one applicant (citizens only ever see their own).
    pub applicant_id: Option<UserId>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct ApplicationStore {
    applications: RwLock<HashMap<ApplicationId, Application>>,
}

fn not_found(id: ApplicationId) -> CoreError {
    CoreError::NotFound {
        entity: "Application",
        id: id.to_string(),
    }
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, application: Application) -> Application {
        let mut map = self.applications.write().await;
        map.insert(application.id, application.clone());
        application
    }

    pub async fn len(&self) -> usize {
        self.applications.read().await.len()
    }

    pub async fn get(&self, id: ApplicationId) -> Result<Application, CoreError> {
        self.applications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Matching applications, newest first.
    pub async fn list(&self, filter: &ApplicationFilter) -> Vec<Application> {
        let map = self.applications.read().await;
        let mut matching: Vec<&Application> = map
            .values()
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .filter(|a| filter.service_type.map_or(true, |t| a.service_type == t))
            .filter(|a| {
                filter
                    .applicant_id
                    .as_ref()
                    .map_or(true, |id| &a.applicant_id == id)
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect()
    }

    /// Apply `change` to a copy of the stored application and commit it only
    /// if `change` succeeds. Returns the committed application.
    pub async fn update<F>(&self, id: ApplicationId, change: F) -> Result<Application, CoreError>
    where
        F: FnOnce(&mut Application) -> Result<(), CoreError>,
    {
        let mut map = self.applications.write().await;
        let stored = map.get_mut(&id).ok_or_else(|| not_found(id))?;
        let mut draft = stored.clone();
        change(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use panchayat_core::roles::{Actor, Role};
    use panchayat_core::types::FormRecord;

    fn app(service: ServiceType, applicant: &str, age_mins: i64) -> Application {
        Application::new(
            service,
            applicant,
            FormRecord::new(),
            Utc::now() - Duration::minutes(age_mins),
        )
    }

    fn all() -> ApplicationFilter {
        ApplicationFilter {
            limit: 100,
            ..ApplicationFilter::default()
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let store = ApplicationStore::new();
        let old = store.insert(app(ServiceType::BirthCertificate, "c1", 30)).await;
        let new = store.insert(app(ServiceType::IncomeCertificate, "c1", 1)).await;
        store.insert(app(ServiceType::BirthCertificate, "c2", 10)).await;

        let listed = store.list(&all()).await;
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[2].id, old.id);

        let mine = store
            .list(&ApplicationFilter {
                applicant_id: Some("c1".into()),
                service_type: Some(ServiceType::BirthCertificate),
                ..all()
            })
            .await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, old.id);

        let page = store.list(&ApplicationFilter { limit: 1, offset: 1, ..all() }).await;
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn failed_update_leaves_record_untouched() {
        let store = ApplicationStore::new();
        let a = store.insert(app(ServiceType::BirthCertificate, "c1", 0)).await;
        let citizen = Actor::new("c1", Role::Citizen);

        let result = store
            .update(a.id, |app| {
                app.change_status(ApplicationStatus::Approved, &citizen, None, Utc::now())
            })
            .await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));
        assert_eq!(store.get(a.id).await.unwrap().status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn update_commits_on_success() {
        let store = ApplicationStore::new();
        let a = store.insert(app(ServiceType::BirthCertificate, "c1", 0)).await;
        let officer = Actor::new("o1", Role::Officer);

        let updated = store
            .update(a.id, |app| {
                app.change_status(ApplicationStatus::UnderReview, &officer, None, Utc::now())
            })
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::UnderReview);
        assert_eq!(store.get(a.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let store = ApplicationStore::new();
        assert_matches!(
            store.get(uuid::Uuid::nil()).await,
            Err(CoreError::NotFound { entity: "Application", .. })
        );
    }
}
