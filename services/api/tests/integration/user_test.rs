use uuid::Uuid;

use ladle_api::domain::types::UserDraft;
use ladle_api::error::ApiServiceError;
use ladle_api::usecase::user::{CreateUserUseCase, GetUserUseCase, GetUsersUseCase};
use ladle_domain::pagination::PageRequest;

use crate::helpers::{MockUserRepo, test_author, test_user};

fn registration() -> UserDraft {
    UserDraft {
        email: "carol@example.com".to_owned(),
        username: "carol".to_owned(),
        first_name: "Carol".to_owned(),
        last_name: "Singer".to_owned(),
        password: "quite-secret-9".to_owned(),
    }
}

// ── CreateUserUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_and_store_argon2_hash() {
    let repo = MockUserRepo::empty();
    let users_handle = repo.users_handle();

    let usecase = CreateUserUseCase { repo };
    let user = usecase.execute(registration()).await.unwrap();

    assert_eq!(user.email, "carol@example.com");
    assert_eq!(user.username, "carol");

    let users = users_handle.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].password_hash.starts_with("$argon2id$"));
    assert_ne!(users[0].password_hash, "quite-secret-9");
}

#[tokio::test]
async fn should_find_registered_user_by_id() {
    let repo = MockUserRepo::empty();

    let create = CreateUserUseCase { repo: repo.clone() };
    let created = create.execute(registration()).await.unwrap();

    let get = GetUserUseCase { repo };
    let found = get.execute(created.id).await.unwrap();
    assert_eq!(found.username, "carol");
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn should_reject_duplicate_email_without_writing() {
    let repo = MockUserRepo::new(vec![test_user()]);
    let users_handle = repo.users_handle();
    let usecase = CreateUserUseCase { repo };

    let mut draft = registration();
    draft.email = "alice@example.com".to_owned();
    let result = usecase.execute(draft).await;

    assert!(
        matches!(result, Err(ApiServiceError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
    assert_eq!(users_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_username_without_writing() {
    let repo = MockUserRepo::new(vec![test_user()]);
    let users_handle = repo.users_handle();
    let usecase = CreateUserUseCase { repo };

    let mut draft = registration();
    draft.username = "alice".to_owned();
    let result = usecase.execute(draft).await;

    assert!(
        matches!(result, Err(ApiServiceError::UsernameTaken)),
        "expected UsernameTaken, got {result:?}"
    );
    assert_eq!(users_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_collect_registration_violations_without_writing() {
    let repo = MockUserRepo::empty();
    let users_handle = repo.users_handle();
    let usecase = CreateUserUseCase { repo };

    let draft = UserDraft {
        email: "no-at-sign".to_owned(),
        username: "bad name!".to_owned(),
        first_name: String::new(),
        last_name: String::new(),
        password: "1234".to_owned(),
    };
    let result = usecase.execute(draft).await;

    let Err(ApiServiceError::Validation(errors)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    for field in ["email", "username", "first_name", "last_name", "password"] {
        assert!(
            errors.iter().any(|e| e.field == field),
            "missing violation for {field}"
        );
    }
    assert!(users_handle.lock().unwrap().is_empty());
}

// ── GetUsersUseCase / GetUserUseCase ─────────────────────────────────────────

#[tokio::test]
async fn should_list_users_in_username_order_with_pagination() {
    let mut carol = test_user();
    carol.id = Uuid::parse_str("00000000-0000-0000-0000-000000000003").unwrap();
    carol.email = "carol@example.com".to_owned();
    carol.username = "carol".to_owned();

    // Insert out of order; listing sorts by username.
    let repo = MockUserRepo::new(vec![carol, test_user(), test_author()]);

    let usecase = GetUsersUseCase { repo: repo.clone() };
    let first = usecase
        .execute(PageRequest {
            per_page: 2,
            page: 1,
        })
        .await
        .unwrap();
    let usernames: Vec<&str> = first.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(usernames, ["alice", "bob"]);

    let usecase = GetUsersUseCase { repo };
    let second = usecase
        .execute(PageRequest {
            per_page: 2,
            page: 2,
        })
        .await
        .unwrap();
    let usernames: Vec<&str> = second.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(usernames, ["carol"]);
}

#[tokio::test]
async fn should_fail_get_when_user_does_not_exist() {
    let usecase = GetUserUseCase {
        repo: MockUserRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(ApiServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}
