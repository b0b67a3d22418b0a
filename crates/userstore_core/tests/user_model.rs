use userstore_core::{default_new_user, User, UserPreference};
use uuid::Uuid;

#[test]
fn user_serializes_with_camel_case_fields() {
    let user = User {
        id: Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
        name: "Hosen".to_string(),
        age: 24,
        email: "hosen@test.com".to_string(),
        user_preference: Some(UserPreference {
            id: Uuid::parse_str("66666666-7777-4888-8999-000000000000").unwrap(),
            email_updates: true,
        }),
    };

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "name": "Hosen",
            "age": 24,
            "email": "hosen@test.com",
            "userPreference": {
                "id": "66666666-7777-4888-8999-000000000000",
                "emailUpdates": true
            }
        })
    );
}

#[test]
fn user_without_preference_serializes_null_relation() {
    let user = User {
        id: Uuid::new_v4(),
        name: "Sabbir".to_string(),
        age: 30,
        email: "sabbir@test.com".to_string(),
        user_preference: None,
    };

    let json = serde_json::to_value(&user).unwrap();
    assert!(json["userPreference"].is_null());
}

#[test]
fn default_payload_carries_fixed_literal_values() {
    let payload = default_new_user();
    assert_eq!(payload.name, "Hosen");
    assert_eq!(payload.age, 24);
    assert_eq!(payload.email, "hosen@test.com");
    assert_eq!(
        payload.user_preference.map(|preference| preference.email_updates),
        Some(true)
    );
    assert!(payload.validate().is_ok());
}
