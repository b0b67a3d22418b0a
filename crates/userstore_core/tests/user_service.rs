use userstore_core::{
    with_client, Client, NewUser, RepoError, ServiceError, ServiceResult, User, UserService,
};

fn printed(out: Vec<u8>) -> serde_json::Value {
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn create_default_user_matches_example_record() {
    let client = Client::open_in_memory().unwrap();
    let service = UserService::new(client.users().unwrap());

    let user = service.create_default_user().unwrap();
    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["name"], "Hosen");
    assert_eq!(json["age"], 24);
    assert_eq!(json["email"], "hosen@test.com");
    assert_eq!(json["userPreference"]["emailUpdates"], true);
    assert_eq!(json["id"], user.id.to_string());
}

#[test]
fn find_by_email_prints_same_record_as_create() {
    let client = Client::open_in_memory().unwrap();
    let service = UserService::new(client.users().unwrap());
    let created = service.create_default_user().unwrap();

    let mut out = Vec::new();
    service.find_by_email("hosen@test.com", &mut out).unwrap();

    let found: User = serde_json::from_value(printed(out)).unwrap();
    assert_eq!(found, created);
}

#[test]
fn find_by_unknown_email_prints_null() {
    let client = Client::open_in_memory().unwrap();
    let service = UserService::new(client.users().unwrap());

    let mut out = Vec::new();
    service.find_by_email("nobody@test.com", &mut out).unwrap();
    assert_eq!(printed(out), serde_json::Value::Null);
}

#[test]
fn list_all_prints_every_user() {
    let client = Client::open_in_memory().unwrap();
    let service = UserService::new(client.users().unwrap());
    service.create_default_user().unwrap();
    service
        .create_user(&NewUser::new("Sabbir", 30, "sabbir@test.com"))
        .unwrap();

    let mut out = Vec::new();
    service.list_all(&mut out).unwrap();

    let users: Vec<User> = serde_json::from_value(printed(out)).unwrap();
    let emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();
    assert_eq!(emails, ["hosen@test.com", "sabbir@test.com"]);
}

#[test]
fn update_then_delete_round_through_service() {
    let client = Client::open_in_memory().unwrap();
    let service = UserService::new(client.users().unwrap());
    service.create_default_user().unwrap();

    let updated = service
        .update_name_by_email("hosen@test.com", "Md. Sabbir Hosen")
        .unwrap();
    assert_eq!(updated.name, "Md. Sabbir Hosen");
    assert_eq!(updated.age, 24);

    service.delete_by_email("hosen@test.com").unwrap();
    let err = service.delete_by_email("hosen@test.com").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::NotFound { .. })
    ));
}

#[test]
fn creating_default_user_twice_fails_with_unique_violation() {
    let client = Client::open_in_memory().unwrap();
    let service = UserService::new(client.users().unwrap());
    service.create_default_user().unwrap();

    let err = service.create_default_user().unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::UniqueViolation { .. })
    ));
}

#[test]
fn scoped_client_propagates_failed_operation_error() {
    let client = Client::open_in_memory().unwrap();

    let result: ServiceResult<User> = with_client(client, |client| {
        let service = UserService::new(client.users()?);
        service.update_name_by_email("sabbir@test.com", "Nobody")
    });

    assert!(matches!(
        result,
        Err(ServiceError::Repo(RepoError::NotFound { .. }))
    ));
}

#[test]
fn scoped_client_returns_created_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scoped.sqlite3");

    let created: ServiceResult<User> = with_client(Client::open(&path).unwrap(), |client| {
        UserService::new(client.users()?).create_default_user()
    });
    let created = created.unwrap();

    let mut out = Vec::new();
    let printed_result: ServiceResult<()> = with_client(Client::open(&path).unwrap(), |client| {
        UserService::new(client.users()?).find_by_email("hosen@test.com", &mut out)
    });
    printed_result.unwrap();

    let found: User = serde_json::from_value(printed(out)).unwrap();
    assert_eq!(found, created);
}
