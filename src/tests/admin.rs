use super::*;

#[tokio::test]
async fn seed_admin_forced_rotation() {
    let app = crate::router(global());

    let (status, res) = post(
        &app,
        "/api/admin/login",
        None,
        json!({ "email": "admin@mmpcs.net", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["force_password_change"], true);
    assert_eq!(res["section"], "manage_admins");
    let seed = res["account_id"].as_u64().unwrap();
    let token = res["token"].as_str().unwrap().to_owned();

    let (_, res) = get(&app, "/api/account/session", Some(&token)).await;
    assert_eq!(res["password_prompt"], true);
    assert_eq!(res["sections"].as_array().unwrap().len(), 9);
    assert_eq!(res["account"]["admin"]["password_changed"], false);

    // blank fields are kept
    let (status, _) = post(
        &app,
        "/api/admin/modify",
        Some(&token),
        json!({
            "admin_id": seed,
            "username": "",
            "email": null,
            "password": "",
            "permissions": crate::permission::Permission::all(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, res) = get(&app, "/api/account/session", Some(&token)).await;
    assert_eq!(res["password_prompt"], true);
    assert_eq!(res["account"]["username"], "Admin");

    let (status, _) = post(
        &app,
        "/api/admin/modify",
        Some(&token),
        json!({
            "admin_id": seed,
            "username": "",
            "email": null,
            "password": "a better password",
            "permissions": crate::permission::Permission::all(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, res) = get(&app, "/api/account/session", Some(&token)).await;
    assert_eq!(res["password_prompt"], false);

    let (status, _) = post(
        &app,
        "/api/admin/login",
        None,
        json!({ "email": "admin@mmpcs.net", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, res) = post(
        &app,
        "/api/admin/login",
        None,
        json!({ "email": "admin@mmpcs.net", "password": "a better password" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["force_password_change"], false);
    assert_eq!(res["section"], "overview");
}

#[tokio::test]
async fn seed_admin_locked() {
    let app = crate::router(global());
    let (seed, seed_token) = seed_admin(&app).await;
    let (_, token) = admin(&app, &seed_token, "second", json!(["manage_admins"])).await;

    let (status, res) = post(
        &app,
        "/api/admin/delete",
        Some(&token),
        json!({ "admin_id": seed }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        res["error"],
        "cannot delete the default admin until the password is changed"
    );
}

#[tokio::test]
async fn delete_admins() {
    let global = global();
    let app = crate::router(global.clone());
    let (seed, seed_token) = seed_admin(&app).await;

    let (status, _) = post(
        &app,
        "/api/admin/modify",
        Some(&seed_token),
        json!({
            "admin_id": seed,
            "username": "",
            "email": null,
            "password": "rotated",
            "permissions": crate::permission::Permission::all(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the only admin
    let (status, res) = post(
        &app,
        "/api/admin/delete",
        Some(&seed_token),
        json!({ "admin_id": seed }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["error"], "cannot delete the last admin account");

    let (second, second_token) = admin(&app, &seed_token, "second", json!([])).await;

    let (status, res) = post(
        &app,
        "/api/admin/delete",
        Some(&seed_token),
        json!({ "admin_id": seed }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["error"], "cannot delete your own account");

    // no permission
    let (status, res) = post(
        &app,
        "/api/admin/delete",
        Some(&second_token),
        json!({ "admin_id": seed }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(res["error"], "permission denied");

    let (status, _) = post(
        &app,
        "/api/admin/delete",
        Some(&seed_token),
        json!({ "admin_id": second }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(global.store.read().accounts.admins().len(), 1);

    let (status, _) = get(&app, "/api/account/session", Some(&second_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn make_admin() {
    let app = crate::router(global());
    let (_, seed_token) = seed_admin(&app).await;
    let (_, user_token) = user(&app, "alice").await;

    let descriptor = json!({
        "username": "",
        "email": "mod@example.com",
        "password": "password",
        "permissions": ["moderate_posts", "view_shop"],
    });

    let (status, res) = post(&app, "/api/admin/create", Some(&user_token), descriptor.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(res["error"], "permission denied");

    let (status, res) = post(&app, "/api/admin/create", None, descriptor.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(res["error"], "not logged in");

    let (status, res) = post(&app, "/api/admin/create", Some(&seed_token), descriptor.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let username = res["username"].as_str().unwrap();
    assert!(username.starts_with("Admin_"));
    assert_eq!(username.len(), "Admin_".len() + 4);
    assert_eq!(res["verified"], true);
    assert_eq!(res["admin"]["password_changed"], true);
    assert_eq!(
        res["admin"]["permissions"],
        json!(["view_shop", "moderate_posts"])
    );

    let (status, res) = post(&app, "/api/admin/create", Some(&seed_token), descriptor).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["error"], "Email already exists");

    let (status, res) = post(
        &app,
        "/api/admin/create",
        Some(&seed_token),
        json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "password",
            "permissions": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["error"], "Username already taken");

    let (status, res) = get(&app, "/api/admin/list", Some(&seed_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.as_array().unwrap().len(), 2);

    let (status, res) = get(&app, "/api/account/list", Some(&seed_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["users"].as_array().unwrap().len(), 1);
    assert_eq!(res["admins"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn latest_link_wins() {
    let global = global();
    let app = crate::router(global.clone());
    let (_, seed_token) = seed_admin(&app).await;
    let (user, user_token) = user(&app, "user").await;
    let (a, _) = admin(&app, &seed_token, "a", json!([])).await;
    let (b, _) = admin(&app, &seed_token, "b", json!([])).await;

    let (status, _) = post(
        &app,
        "/api/admin/link",
        Some(&user_token),
        json!({ "admin_id": a, "user_id": user }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for admin in [a, b] {
        let (status, _) = post(
            &app,
            "/api/admin/link",
            Some(&seed_token),
            json!({ "admin_id": admin, "user_id": user }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": user })).await;
    assert_eq!(res["linked"], json!({ "id": b, "username": "b" }));
    {
        let store = global.store.read();
        assert_eq!(store.accounts.admin(a).unwrap().linked_user, Some(user));
        assert_eq!(store.accounts.admin(b).unwrap().linked_user, Some(user));
        assert_eq!(
            store.accounts.linked_admin_of(user).unwrap().profile.id,
            b
        );
    }

    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": a })).await;
    assert_eq!(res["linked"], json!({ "id": user, "username": "user" }));

    // admins can only be linked to standard accounts
    let (status, _) = post(
        &app,
        "/api/admin/link",
        Some(&seed_token),
        json!({ "admin_id": a, "user_id": b }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // unlinking a stale pointer keeps the current link
    let (status, _) = post(
        &app,
        "/api/admin/link",
        Some(&seed_token),
        json!({ "admin_id": a, "user_id": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        global.store.read().accounts.linked_admin_of(user).unwrap().profile.id,
        b
    );

    let (status, _) = post(
        &app,
        "/api/admin/link",
        Some(&seed_token),
        json!({ "admin_id": b, "user_id": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(global.store.read().accounts.linked_admin_of(user).is_none());
}

#[tokio::test]
async fn unlinking_latest_shows_earlier_admin() {
    let app = crate::router(global());
    let (_, seed_token) = seed_admin(&app).await;
    let (user, _) = user(&app, "user").await;
    let (a, _) = admin(&app, &seed_token, "a", json!([])).await;
    let (b, _) = admin(&app, &seed_token, "b", json!([])).await;

    for (admin, target) in [(a, json!(user)), (b, json!(user)), (b, Value::Null)] {
        let (status, _) = post(
            &app,
            "/api/admin/link",
            Some(&seed_token),
            json!({ "admin_id": admin, "user_id": target }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // a still points at the user, so the user is still shown as linked
    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": user })).await;
    assert_eq!(res["linked"], json!({ "id": a, "username": "a" }));
    assert_eq!(res["linked_admin"], true);
    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": a })).await;
    assert_eq!(res["linked"], json!({ "id": user, "username": "user" }));

    // deleting the admin drops the link with it
    let (status, _) = post(&app, "/api/admin/delete", Some(&seed_token), json!({ "admin_id": a })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": user })).await;
    assert_eq!(res["linked"], Value::Null);
    assert_eq!(res["linked_admin"], false);
}

#[tokio::test]
async fn linked_badges_merge() {
    let app = crate::router(global());
    let (_, seed_token) = seed_admin(&app).await;
    let (user, _) = user(&app, "user").await;
    let (a, _) = admin(&app, &seed_token, "a", json!([])).await;

    let (_, res) = get(&app, "/api/badge/list", None).await;
    let ids: Vec<u64> = res
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_u64().unwrap())
        .collect();
    let (founder, veteran) = (ids[0], ids[1]);

    for (account, badge) in [(user, founder), (user, veteran), (a, veteran)] {
        let (status, _) = post(
            &app,
            "/api/account/badge/assign",
            Some(&seed_token),
            json!({ "account_id": account, "badge_id": badge }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let badge_ids = |res: &Value| -> Vec<u64> {
        res["badges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_u64().unwrap())
            .collect()
    };

    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": a })).await;
    assert_eq!(badge_ids(&res), [veteran]);
    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": user })).await;
    assert_eq!(badge_ids(&res), [founder, veteran]);
    assert_eq!(res["linked_admin"], false);

    let (status, _) = post(
        &app,
        "/api/admin/link",
        Some(&seed_token),
        json!({ "admin_id": a, "user_id": user }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the admin shows its own badges and the user's, once each
    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": a })).await;
    assert_eq!(badge_ids(&res), [veteran, founder]);
    assert_eq!(res["linked_admin"], false);

    // the user shows the admin badge only
    let (_, res) = post(&app, "/api/account/view", None, json!({ "account_id": user })).await;
    assert_eq!(res["linked_admin"], true);
    assert_eq!(
        res["badges"],
        json!([{
            "id": 0,
            "name": "Admin",
            "emoji": "🛡️",
            "description": "Linked Admin Account",
        }])
    );
}
