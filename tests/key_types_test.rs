mod common;

use common::{seed_users, setup_sqlite_with_ddl, setup_test_database, users_table, TestDatabaseType};
use user_repo::backend::database::KeyType;
use user_repo::backend::BackendFactory;
use user_repo::{AppError, User};
use uuid::Uuid;

// Same CRUD round trip for every integer key width
macro_rules! integer_key_test {
    ($name:ident, $key_type:expr) => {
        paste::paste! {
            #[tokio::test]
            async fn [<integer_key_round_trip_ $name>]() {
                integer_key_round_trip($key_type).await;
            }
        }
    };
}

async fn integer_key_round_trip(key_type: KeyType) {
    let table = users_table(key_type);
    let db = setup_test_database(TestDatabaseType::Sqlite, &table)
        .await
        .unwrap();
    let repo = db.repository(&table);

    let users = seed_users(repo.as_ref(), 3).await;
    let ids: Vec<i64> = users.iter().map(|u| u.id.unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    for user in &users {
        let found = repo.find_by_id(user.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(&found, user);
    }
}

integer_key_test!(smallint, KeyType::SmallInt);
integer_key_test!(int, KeyType::Int);
integer_key_test!(bigint, KeyType::BigInt);

#[tokio::test]
async fn test_smallint_ids_are_truncated_not_rejected() {
    let table = users_table(KeyType::SmallInt);
    let db = setup_test_database(TestDatabaseType::Sqlite, &table)
        .await
        .unwrap();
    let repo = db.repository(&table);
    seed_users(repo.as_ref(), 1).await;

    // 65537 narrows to 1 in a 16-bit key
    let found = repo.find_by_id(65537).await.unwrap().unwrap();
    assert_eq!(found.id, Some(1));
}

#[tokio::test]
async fn test_uuid_key_maps_low_bits() {
    let factory = setup_sqlite_with_ddl(
        "CREATE TABLE users (id BLOB PRIMARY KEY, name TEXT NOT NULL, email TEXT NOT NULL)",
    )
    .await;
    let pool = factory.context().unwrap().pool();
    for (id, name) in [
        (Uuid::from_u128(42), "Low"),
        (Uuid::from_u64_pair(7, 43), "High"),
    ] {
        sqlx::query("INSERT INTO users (id, name, email) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(format!("{}@example.com", name.to_lowercase()))
            .execute(pool)
            .await
            .unwrap();
    }

    let repo = factory
        .create_user_repository(&users_table(KeyType::Uuid))
        .unwrap();

    let low = repo.find_by_id(42).await.unwrap().unwrap();
    assert_eq!(low.id, Some(42));
    assert_eq!(low.name, "Low");

    // a key with high bits set reads back as its low half, which does not
    // address the same row again
    let mut listed: Vec<i64> = repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|u| u.id)
        .collect();
    listed.sort();
    assert_eq!(listed, vec![42, 43]);
    assert_eq!(repo.find_by_id(43).await.unwrap(), None);

    assert!(repo
        .update(&User::with_id(42, "Lower", "lower@example.com"))
        .await
        .unwrap());
    assert_eq!(repo.find_by_id(42).await.unwrap().unwrap().name, "Lower");
    assert!(repo.delete_by_id(42).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_text_key_round_trip() {
    let factory = setup_sqlite_with_ddl(
        "CREATE TABLE users (id TEXT PRIMARY KEY DEFAULT (abs(random()) % 1000000000), name TEXT NOT NULL, email TEXT NOT NULL)",
    )
    .await;
    let repo = factory
        .create_user_repository(&users_table(KeyType::Text))
        .unwrap();

    let mut carol = User::new("Carol", "carol@example.com");
    repo.save(&mut carol).await.unwrap();
    let id = carol.id.unwrap();
    assert!(id >= 0);

    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found, carol);
    assert!(repo.delete_by_id(id).await.unwrap());
    assert_eq!(repo.find_by_id(id).await.unwrap(), None);
}

#[tokio::test]
async fn test_non_numeric_text_key_is_a_conversion_error() {
    let factory = setup_sqlite_with_ddl(
        "CREATE TABLE users (id TEXT PRIMARY KEY, name TEXT NOT NULL, email TEXT NOT NULL)",
    )
    .await;
    sqlx::query("INSERT INTO users (id, name, email) VALUES ('abc', 'Dave', 'dave@example.com')")
        .execute(factory.context().unwrap().pool())
        .await
        .unwrap();

    let repo = factory
        .create_user_repository(&users_table(KeyType::Text))
        .unwrap();
    let result = repo.find_all().await;

    assert!(matches!(result, Err(AppError::Conversion(_))));
}
