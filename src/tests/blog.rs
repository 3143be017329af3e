use super::*;

#[tokio::test]
async fn seeded_posts() {
    let app = crate::router(global());
    let (status, res) = get(&app, "/api/blog/list", None).await;
    assert_eq!(status, StatusCode::OK);
    let posts = res.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    // newest first
    assert_eq!(posts[0]["title"], "Welcome to the new website");
    // the seed admin writes as the site
    assert_eq!(posts[0]["author"], json!({ "kind": "admin" }));
}

#[tokio::test]
async fn publish_and_comment() {
    let app = crate::router(global());
    let (_, seed_token) = seed_admin(&app).await;
    let (alice, alice_token) = user(&app, "alice").await;
    let (writer, writer_token) = admin(&app, &seed_token, "writer", json!(["manage_blogs"])).await;

    let descriptor = json!({ "title": "Patch notes", "content": "Everything changed." });
    let (status, _) = post(&app, "/api/blog/create", Some(&alice_token), descriptor.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(
        &app,
        "/api/blog/create",
        Some(&writer_token),
        json!({ "title": " ", "content": "Everything changed." }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, res) = post(&app, "/api/blog/create", Some(&writer_token), descriptor).await;
    assert_eq!(status, StatusCode::OK);
    let id = res["id"].as_u64().unwrap();

    let (_, res) = get(&app, "/api/blog/list", None).await;
    assert_eq!(res[0]["id"], id);
    assert_eq!(res[0]["author"]["kind"], "account");
    assert_eq!(res[0]["author"]["account"]["id"], writer);

    let (status, _) = post(
        &app,
        "/api/blog/comment",
        None,
        json!({ "post": id, "text": "first" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(
        &app,
        "/api/blog/comment",
        Some(&alice_token),
        json!({ "post": id, "text": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, res) = post(
        &app,
        "/api/blog/comment",
        Some(&alice_token),
        json!({ "post": id, "text": " first! " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["comments"][0]["comment"]["text"], "first!");
    assert_eq!(res["comments"][0]["byline"]["account"]["id"], alice);

    let (status, res) = post(
        &app,
        "/api/blog/comment",
        Some(&seed_token),
        json!({ "post": id, "text": "welcome" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["comments"].as_array().unwrap().len(), 2);
    assert_eq!(res["comments"][1]["byline"], json!({ "kind": "admin" }));

    let (status, _) = post(
        &app,
        "/api/blog/comment",
        Some(&alice_token),
        json!({ "post": 7, "text": "lost" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/blog/delete", Some(&writer_token), json!({ "id": id })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, res) = post(&app, "/api/blog/get", None, json!({ "id": id })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res["error"], format!("blog post {id} not found"));
}

#[tokio::test]
async fn user_posts() {
    let global = global();
    let app = crate::router(global.clone());
    let (_, seed_token) = seed_admin(&app).await;
    let (alice, alice_token) = user(&app, "alice").await;

    let (status, _) = post(&app, "/api/post/create", None, json!({ "content": "hi" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(
        &app,
        "/api/post/create",
        Some(&alice_token),
        json!({ "content": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/post/create",
        Some(&alice_token),
        json!({ "content": "with a picture", "media": 9 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // upload an image to attach
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(4, 4)
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media/upload")
                .method("POST")
                .header(http::header::AUTHORIZATION, format!("Bearer {alice_token}"))
                .header(http::header::CONTENT_TYPE, mime::IMAGE_PNG.as_ref())
                .body(Body::from(png.into_inner()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let media: webster_shared::media::MediaRef =
        serde_json::from_slice(&hyper::body::to_bytes(response.into_body()).await.unwrap())
            .unwrap();
    assert_eq!(media.mime, "image/png");

    let (status, first) = post(
        &app,
        "/api/post/create",
        Some(&alice_token),
        json!({ "content": "with a picture", "media": media.hash }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["author"], alice);
    assert_eq!(first["media"]["hash"], media.hash);

    let (_, second) = post(
        &app,
        "/api/post/create",
        Some(&alice_token),
        json!({ "content": "second" }),
    )
    .await;

    let (_, res) = get(&app, "/api/post/list", None).await;
    assert_eq!(res[0]["id"], second["id"]);
    assert_eq!(res[1]["id"], first["id"]);

    let (status, _) = post(
        &app,
        "/api/post/delete",
        Some(&alice_token),
        json!({ "id": first["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(
        &app,
        "/api/post/delete",
        Some(&seed_token),
        json!({ "id": first["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(global.store.read().posts.list().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media/get")
                .method("POST")
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::to_vec(&json!({ "hash": media.hash })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[http::header::CONTENT_TYPE],
        mime::IMAGE_PNG.as_ref()
    );
}

#[tokio::test]
async fn reject_non_image_upload() {
    let app = crate::router(global());
    let (_, token) = user(&app, "alice").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media/upload")
                .method("POST")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from("plain text"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn reject_oversized_upload() {
    let app = crate::router(global());
    let (_, token) = user(&app, "alice").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/media/upload")
                .method("POST")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(vec![0u8; crate::media::MAX_SIZE + 1]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
