use crate::domain::relation::{
    NewRelation, ParentStudentRelation, RelationFilter, RelationPatch,
};
use crate::domain::user::{Role, User};
use crate::error::{AppError, Result};
use crate::storage::{RelationStore, UserStore};
use std::sync::Arc;

/// Parent-student guardianship links. Staff maintain them; parents and
/// students can only read their own.
#[derive(Clone, Debug)]
pub struct RelationService {
    relations: Arc<dyn RelationStore>,
    users: Arc<dyn UserStore>,
}

impl RelationService {
    #[must_use]
    pub fn new(relations: Arc<dyn RelationStore>, users: Arc<dyn UserStore>) -> Self {
        Self { relations, users }
    }

    fn require_staff(user: &User) -> Result<()> {
        match user.role {
            Role::Admin | Role::Employee => Ok(()),
            Role::Parent | Role::Student => Err(AppError::Forbidden),
        }
    }

    async fn check_party(&self, user_id: i64, expected: Role) -> Result<()> {
        let Some(party) = self.users.find(user_id).await? else {
            return Err(AppError::BadRequest(format!("unknown user: {user_id}")));
        };
        if party.role != expected {
            return Err(AppError::BadRequest(format!(
                "user {user_id} does not have the {expected} role"
            )));
        }
        Ok(())
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller, new), fields(user_id = caller.id, parent_id = new.parent_id, student_id = new.student_id))]
    pub async fn create(&self, caller: &User, new: NewRelation) -> Result<ParentStudentRelation> {
        Self::require_staff(caller)?;
        self.check_party(new.parent_id, Role::Parent).await?;
        self.check_party(new.student_id, Role::Student).await?;

        let relation = self.relations.insert(new).await?;
        tracing::info!(relation_id = relation.id, "Parent-student relation created");
        Ok(relation)
    }

    /// Non-staff callers only see relations they are a party to.
    pub async fn list(
        &self,
        caller: &User,
        mut filter: RelationFilter,
    ) -> Result<Vec<ParentStudentRelation>> {
        match caller.role {
            Role::Admin | Role::Employee => {}
            Role::Parent => filter.parent_id = Some(caller.id),
            Role::Student => filter.student_id = Some(caller.id),
        }
        self.relations.list(&filter).await
    }

    pub async fn get(&self, caller: &User, id: i64) -> Result<ParentStudentRelation> {
        let relation = self.relations.find(id).await?.ok_or(AppError::NotFound)?;
        let is_party = relation.parent_id == caller.id || relation.student_id == caller.id;
        match caller.role {
            Role::Admin | Role::Employee => Ok(relation),
            Role::Parent | Role::Student if is_party => Ok(relation),
            Role::Parent | Role::Student => Err(AppError::Forbidden),
        }
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller), fields(user_id = caller.id))]
    pub async fn update(
        &self,
        caller: &User,
        id: i64,
        patch: RelationPatch,
    ) -> Result<ParentStudentRelation> {
        Self::require_staff(caller)?;
        self.relations.update(id, patch).await?.ok_or(AppError::NotFound)
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller), fields(user_id = caller.id))]
    pub async fn delete(&self, caller: &User, id: i64) -> Result<()> {
        Self::require_staff(caller)?;
        if self.relations.delete(id).await? {
            tracing::info!(relation_id = id, "Parent-student relation deleted");
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::relation::RelationKind;
    use crate::domain::user::NewUser;
    use crate::storage::memory::{InMemoryRelationStore, InMemoryUserStore};

    async fn seed_user(users: &InMemoryUserStore, username: &str, role: Role) -> User {
        users
            .insert(NewUser {
                username: username.to_string(),
                password_hash: String::new(),
                full_name: None,
                role,
            })
            .await
            .unwrap()
    }

    async fn setup() -> (RelationService, User, User, User) {
        let users = Arc::new(InMemoryUserStore::new());
        let admin = seed_user(&users, "admin", Role::Admin).await;
        let parent = seed_user(&users, "parent", Role::Parent).await;
        let student = seed_user(&users, "student", Role::Student).await;
        let service = RelationService::new(Arc::new(InMemoryRelationStore::new()), users);
        (service, admin, parent, student)
    }

    fn new_relation(parent_id: i64, student_id: i64, kind: RelationKind) -> NewRelation {
        NewRelation { parent_id, student_id, kind, is_primary_contact: false }
    }

    #[tokio::test]
    async fn test_create_validates_roles() {
        let (service, admin, parent, student) = setup().await;

        let relation = service
            .create(&admin, new_relation(parent.id, student.id, RelationKind::Mother))
            .await
            .unwrap();
        assert!(relation.is_active);

        // Swapped parties must be rejected.
        let err = service
            .create(&admin, new_relation(student.id, parent.id, RelationKind::Mother))
            .await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_duplicate_relation_conflicts() {
        let (service, admin, parent, student) = setup().await;
        let new = new_relation(parent.id, student.id, RelationKind::Guardian);

        service.create(&admin, new.clone()).await.unwrap();
        let err = service.create(&admin, new).await;
        assert!(matches!(err, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_parent_only_sees_own_relations() {
        let (service, admin, parent, student) = setup().await;
        service
            .create(&admin, new_relation(parent.id, student.id, RelationKind::Father))
            .await
            .unwrap();

        // A parent's filter is pinned to their own id regardless of input.
        let listed = service
            .list(&parent, RelationFilter { parent_id: Some(999), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].parent_id, parent.id);

        let err = service.create(&parent, new_relation(parent.id, student.id, RelationKind::Other)).await;
        assert!(matches!(err, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (service, admin, parent, student) = setup().await;
        let relation = service
            .create(&admin, new_relation(parent.id, student.id, RelationKind::Mother))
            .await
            .unwrap();

        let patch = RelationPatch { is_primary_contact: Some(true), is_active: None };
        let updated = service.update(&admin, relation.id, patch).await.unwrap();
        assert!(updated.is_primary_contact);

        service.delete(&admin, relation.id).await.unwrap();
        assert!(matches!(service.delete(&admin, relation.id).await, Err(AppError::NotFound)));
    }
}
