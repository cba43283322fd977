use serde::{Deserialize, Serialize};

/// Application-level user record
///
/// `id` stays `None` until the backend assigns a generated key on save.
/// Whatever the backend stores, the application always sees it as `i64`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl User {
    /// Create a transient user that has not been saved yet
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Build a user as read back from a row
    pub fn with_id(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }
}

/// Row shape used by the insert-throughput benchmark
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BenchUser {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub status: String,
}

impl BenchUser {
    /// Deterministic fixture row for benchmark id `id`
    pub fn fixture(id: i32) -> Self {
        Self {
            id,
            name: format!("User{}", id),
            age: 20 + (id % 50),
            status: "Active".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_transient() {
        let user = User::new("Alice", "alice@example.com");
        assert!(user.is_transient());
        assert_eq!(user.name, "Alice");

        let saved = User::with_id(7, "Alice", "alice@example.com");
        assert!(!saved.is_transient());
    }

    #[test]
    fn test_transient_user_serializes_without_id() {
        let user = User::new("Bob", "bob@example.com");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("id").is_none());

        let saved = User::with_id(3, "Bob", "bob@example.com");
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["id"], 3);
    }

    #[test]
    fn test_bench_fixture() {
        let row = BenchUser::fixture(1001);
        assert_eq!(row.name, "User1001");
        assert_eq!(row.age, 21);
        assert_eq!(row.status, "Active");
    }
}
