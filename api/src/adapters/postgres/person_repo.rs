//! PostgreSQL adapter for PersonRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::entities::{Person, PersonId, Role};
use crate::domain::ports::PersonRepository;
use crate::entity::persons;
use crate::error::DomainError;

/// PostgreSQL implementation of PersonRepository
pub struct PostgresPersonRepository {
    db: DatabaseConnection,
}

impl PostgresPersonRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, DomainError> {
        let result = persons::Entity::find_by_id(id.0)
            .filter(persons::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_active_by_role(&self, role: Role) -> Result<Vec<Person>, DomainError> {
        let results = persons::Entity::find()
            .filter(persons::Column::Role.eq(role.to_string()))
            .filter(persons::Column::Active.eq(true))
            .filter(persons::Column::DeletedAt.is_null())
            .order_by_asc(persons::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_ids(&self, ids: &[PersonId]) -> Result<Vec<Person>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = persons::Entity::find()
            .filter(persons::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .filter(persons::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<persons::Model> for Person {
    fn from(model: persons::Model) -> Self {
        Person {
            id: PersonId(model.id),
            honda_id: model.honda_id,
            name: model.name,
            job_title: model.job_title,
            // unknown roles get no privileges
            role: model.role.parse().unwrap_or(Role::Viewer),
            dealer_code: model.dealer_code,
            active: model.active,
        }
    }
}
