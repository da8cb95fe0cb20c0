//! Client record management.

use std::sync::Arc;

use carebook_core::error::CoreError;
use carebook_core::pagination::PageRequest;
use carebook_core::text::normalize_optional;
use carebook_core::types::DbId;
use carebook_db::models::client::{Client, CreateClient, UpdateClient};
use carebook_db::store::ClientStore;

use super::not_found_as;
use crate::error::AppResult;

const CLIENT_ENTITY: &str = "Client";

#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientStore>) -> Self {
        Self { clients }
    }

    /// Create a client. Names are trimmed and blank optional fields dropped.
    pub async fn create(&self, input: CreateClient) -> AppResult<Client> {
        let input = CreateClient {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_optional(input.email.as_deref()),
            phone: normalize_optional(input.phone.as_deref()),
            date_of_birth: input.date_of_birth,
            notes: normalize_optional(input.notes.as_deref()),
        };
        require_name("first_name", &input.first_name)?;
        require_name("last_name", &input.last_name)?;

        Ok(self.clients.insert_client(&input).await?)
    }

    pub async fn get(&self, id: DbId) -> AppResult<Client> {
        let client = self.clients.find_client(id).await?;
        client.ok_or_else(|| {
            CoreError::NotFound {
                entity: CLIENT_ENTITY,
                id,
            }
            .into()
        })
    }

    /// One page of clients ordered by last name, then first name.
    pub async fn list(&self, page: PageRequest) -> AppResult<Vec<Client>> {
        let (limit, offset) = page.resolve();
        Ok(self.clients.list_clients(limit, offset).await?)
    }

    pub async fn update(&self, id: DbId, input: UpdateClient) -> AppResult<Client> {
        let input = UpdateClient {
            first_name: input.first_name.map(|n| n.trim().to_string()),
            last_name: input.last_name.map(|n| n.trim().to_string()),
            email: normalize_optional(input.email.as_deref()),
            phone: normalize_optional(input.phone.as_deref()),
            date_of_birth: input.date_of_birth,
            notes: normalize_optional(input.notes.as_deref()),
        };
        if let Some(first_name) = &input.first_name {
            require_name("first_name", first_name)?;
        }
        if let Some(last_name) = &input.last_name {
            require_name("last_name", last_name)?;
        }

        self.clients
            .update_client(id, &input)
            .await
            .map_err(|err| not_found_as(err, CLIENT_ENTITY, id))
    }

    /// Hard delete. The client's waitlist entries go with it.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        self.clients
            .delete_client(id)
            .await
            .map_err(|err| not_found_as(err, CLIENT_ENTITY, id))
    }
}

/// Reject names that are blank once trimmed.
fn require_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field}: must not be blank")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use carebook_db::store::memory::MemoryStore;

    use super::*;
    use crate::error::AppError;

    fn service() -> ClientService {
        ClientService::new(Arc::new(MemoryStore::new()))
    }

    fn input(first: &str, last: &str) -> CreateClient {
        CreateClient {
            first_name: first.into(),
            last_name: last.into(),
            email: None,
            phone: None,
            date_of_birth: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_trims_names_and_drops_blank_fields() {
        let svc = service();
        let created = svc
            .create(CreateClient {
                phone: Some("   ".into()),
                ..input("  Ada ", " Byron")
            })
            .await
            .unwrap();

        assert_eq!(created.first_name, "Ada");
        assert_eq!(created.last_name, "Byron");
        assert_eq!(created.phone, None);
    }

    #[tokio::test]
    async fn whitespace_name_is_rejected() {
        let err = service().create(input("   ", "Byron")).await.unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg.contains("first_name"));
    }

    #[tokio::test]
    async fn get_missing_client_is_not_found() {
        let err = service().get(12).await.unwrap_err();
        assert_matches!(
            err,
            AppError::Core(CoreError::NotFound { entity: "Client", id: 12 })
        );
    }

    #[tokio::test]
    async fn list_clamps_oversized_limit() {
        let svc = service();
        for i in 0..3 {
            svc.create(input("Pat", &format!("Lee{i}"))).await.unwrap();
        }

        let all = svc
            .list(PageRequest {
                limit: Some(10_000),
                offset: Some(-5),
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let page = svc
            .list(PageRequest {
                limit: Some(1),
                offset: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].last_name, "Lee1");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let svc = service();
        let created = svc
            .create(CreateClient {
                email: Some("ada@example.com".into()),
                ..input("Ada", "Byron")
            })
            .await
            .unwrap();

        let updated = svc
            .update(
                created.id,
                UpdateClient {
                    phone: Some("555-0100".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.first_name, "Ada");
    }

    #[tokio::test]
    async fn update_and_delete_missing_client_are_not_found() {
        let svc = service();
        assert_matches!(
            svc.update(4, UpdateClient::default()).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Client", id: 4 }))
        );
        assert_matches!(
            svc.delete(4).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Client", id: 4 }))
        );
    }
}
