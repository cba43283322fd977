//! CRUD walkthrough against whatever backend is configured

use crate::backend::database::UserRepository;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// What the walkthrough observed, for callers that want more than stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoOutcome {
    pub created: User,
    /// `None` when the freshly saved row could not be read back
    pub updated: Option<User>,
    pub listed: usize,
    pub deleted: bool,
}

/// Create, read, update, list and delete one user, printing each step
pub async fn run_crud_demo(repo: &dyn UserRepository) -> AppResult<DemoOutcome> {
    let mut user = User::new("Test User", "test@example.com");
    repo.save(&mut user).await?;
    let id = user
        .id
        .ok_or_else(|| AppError::InvalidInput("saved user has no id".to_string()))?;
    println!("Created user: {} - {}", id, user.name);

    let updated = match repo.find_by_id(id).await? {
        Some(mut read) => {
            println!("Read user: {} - {} <{}>", id, read.name, read.email);

            read.name = "Updated User".to_string();
            repo.update(&read).await?;
            println!("Updated user: {} - {}", id, read.name);
            Some(read)
        }
        None => {
            println!("User {} not found", id);
            None
        }
    };

    let users = repo.find_all().await?;
    println!("All users:");
    for u in &users {
        println!(
            "  {} - {} <{}>",
            u.id.map(|id| id.to_string()).unwrap_or_default(),
            u.name,
            u.email
        );
    }

    let deleted = repo.delete_by_id(id).await?;
    println!("Deleted user: {}", id);

    Ok(DemoOutcome {
        created: user,
        updated,
        listed: users.len(),
        deleted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::startup::open_backend;

    #[tokio::test]
    async fn test_demo_leaves_table_empty() {
        let config = AppConfig::default_config();
        let factory = open_backend(&config, true).await.unwrap();
        let repo = factory.create_user_repository(&config.table).unwrap();

        let outcome = run_crud_demo(repo.as_ref()).await.unwrap();

        let updated = outcome.updated.unwrap();
        assert_eq!(outcome.created.id, updated.id);
        assert_eq!(updated.name, "Updated User");
        assert_eq!(outcome.listed, 1);
        assert!(outcome.deleted);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
