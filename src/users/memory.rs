use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{
    errors::UserError,
    password::hash_password,
    repo::UserStore,
    repo_types::{NewUser, User},
};

/// In-process stand-in for `PgUserRepository` with the same NotFound and
/// uniqueness rules. Counts email lookups.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    next_id: AtomicUsize,
    lookups: AtomicUsize,
}

impl MemoryUserStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

fn hash(plain: &str) -> Result<String, UserError> {
    hash_password(plain).map_err(|e| UserError::Hash(e.to_string()))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_all(&self) -> Result<Vec<User>, UserError> {
        let mut all = self.rows.lock().unwrap().clone();
        // Postgres sorts NULLs last in ascending order
        all.sort_by(|a, b| {
            (a.last_name.is_none(), &a.last_name).cmp(&(b.last_name.is_none(), &b.last_name))
        });
        Ok(all)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, UserError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    async fn get_one(&self, id: i32) -> Result<User, UserError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    async fn insert(&self, user: &NewUser) -> Result<i32, UserError> {
        let password = hash(&user.password)?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(UserError::Query(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: email {}",
                user.email
            ))));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let now = OffsetDateTime::now_utc();
        rows.push(User {
            id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password,
            active: user.active,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update(&self, user: &User) -> Result<(), UserError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(UserError::NotFound)?;
        row.email = user.email.clone();
        row.first_name = user.first_name.clone();
        row.last_name = user.last_name.clone();
        row.active = user.active;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn reset_password(&self, id: i32, password: &str) -> Result<(), UserError> {
        let password = hash(password)?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UserError::NotFound)?;
        row.password = password;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), UserError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(UserError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, last_name: Option<&str>) -> NewUser {
        NewUser {
            email: email.into(),
            first_name: None,
            last_name: last_name.map(Into::into),
            password: "pw".into(),
            active: 1,
        }
    }

    #[tokio::test]
    async fn crud_semantics_match_postgres_store() {
        let store = MemoryUserStore::default();
        let a = store.insert(&new_user("a@x.com", None)).await.unwrap();
        let b = store.insert(&new_user("b@x.com", Some("Zeta"))).await.unwrap();
        store.insert(&new_user("c@x.com", Some("Alpha"))).await.unwrap();
        assert_ne!(a, b);

        let order: Vec<_> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(order, ["c@x.com", "b@x.com", "a@x.com"]);

        assert!(matches!(
            store.insert(&new_user("a@x.com", None)).await,
            Err(UserError::Query(_))
        ));

        store.delete(a).await.unwrap();
        assert!(store.delete(a).await.unwrap_err().is_not_found());
        assert!(store.get_one(a).await.unwrap_err().is_not_found());
        assert!(store.reset_password(a, "x").await.unwrap_err().is_not_found());
    }
}
