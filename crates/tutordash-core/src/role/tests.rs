use super::*;

#[test]
fn resolves_each_known_role_to_its_token() {
    let resolver = RoleResolver::default();

    for (raw, role, token) in [
        ("teacher", Role::Teacher, "teacher_123"),
        ("administrator", Role::Administrator, "admin_001"),
        ("dpo", Role::Dpo, "dpo_001"),
    ] {
        assert_eq!(
            resolver.resolve(raw),
            Ok(ResolvedRole {
                role,
                token: SessionToken::new(token),
            })
        );
    }
}

#[test]
fn trims_before_matching() {
    let resolved = RoleResolver::default()
        .resolve("  administrator\n")
        .expect("valid role");
    assert_eq!(resolved.token.as_str(), "admin_001");
}

#[test_log::test]
fn rejects_unknown_empty_and_miscased_roles() {
    let resolver = RoleResolver::default();

    for raw in ["", "   ", "\t", "superadmin", "Teacher", "DPO", "admin_001", "teacher dpo"] {
        assert_eq!(
            resolver.resolve(raw),
            Err(LoginError::InvalidRole),
            "{raw:?} must not resolve"
        );
    }
}

#[test]
fn missing_submission_is_distinct_from_invalid_role() {
    let resolver = RoleResolver::default();

    assert_eq!(
        resolver.resolve_submission(None),
        Err(LoginError::MissingSubmission)
    );
    assert_eq!(
        resolver.resolve_submission(Some("")),
        Err(LoginError::InvalidRole)
    );
    assert_eq!(
        resolver
            .resolve_submission(Some("dpo"))
            .map(|resolved| resolved.role),
        Ok(Role::Dpo)
    );
}

#[test_log::test]
fn known_role_missing_from_table_is_rejected() {
    static INCOMPLETE: &[(Role, &str)] = &[(Role::Teacher, "teacher_123")];
    let resolver = RoleResolver::new(INCOMPLETE);

    assert!(resolver.resolve("teacher").is_ok());
    assert_eq!(
        resolver.resolve("administrator"),
        Err(LoginError::InvalidRole)
    );
}

#[test]
fn token_maps_back_to_role() {
    let resolver = RoleResolver::default();

    for (role, token) in resolver.entries() {
        assert_eq!(resolver.role_for_token(&token), Some(role));
    }
    assert_eq!(
        resolver.role_for_token(&SessionToken::new("teacher_456")),
        None
    );
}

#[test]
fn error_messages_are_user_facing() {
    assert_eq!(LoginError::InvalidRole.to_string(), "Invalid role selected.");
    assert_eq!(
        LoginError::MissingSubmission.to_string(),
        "No form data submitted."
    );
}

#[test]
fn role_serializes_as_lowercase_identifier() {
    assert_eq!(
        serde_json::to_string(&Role::Administrator).unwrap(),
        "\"administrator\""
    );
    assert_eq!(Role::Dpo.label(), "DPO");
}
