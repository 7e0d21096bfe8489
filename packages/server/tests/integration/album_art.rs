use sea_orm::EntityTrait;
use uuid::Uuid;

use music_server::entity::song;

use crate::common::{MAX_FILE_SIZE, TestApp, fake_jpeg, routes};

#[tokio::test]
async fn upload_sets_album_art_and_stores_file() {
    let app = TestApp::spawn().await;
    let id = app.create_song("So What").await;
    let content = fake_jpeg(5 * 1024);

    let res = app
        .upload(&routes::album_art(&id), "cover.jpg", content.clone())
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    let url = res.body["album_art_url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/albumart/"), "{url}");
    assert!(url.ends_with(".jpg"), "{url}");
    assert_eq!(std::fs::read(app.file_path(&url)).unwrap(), content);

    let song = app.get(&routes::song(&id)).await;
    assert_eq!(song.body["album_art_url"], url.as_str());

    let stored = song::Entity::find_by_id(Uuid::parse_str(&id).unwrap())
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.album_art_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn uploaded_art_is_served_under_its_url() {
    let app = TestApp::spawn().await;
    let id = app.create_song("Blue in Green").await;
    let content = fake_jpeg(2048);

    let res = app
        .upload(&routes::album_art(&id), "cover.jpg", content.clone())
        .await;
    let url = res.body["album_art_url"].as_str().unwrap().to_string();

    let (status, body) = app.get_bytes(&url).await;
    assert_eq!(status, 200);
    assert_eq!(body, content);

    let (status, _) = app.get_bytes("/uploads/albumart/missing.jpg").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn replacing_art_deletes_previous_file() {
    let app = TestApp::spawn().await;
    let id = app.create_song("Freddie Freeloader").await;

    let first = app
        .upload(&routes::album_art(&id), "first.png", fake_jpeg(1024))
        .await;
    assert_eq!(first.status, 200);
    let first_url = first.body["album_art_url"].as_str().unwrap().to_string();

    let second = app
        .upload(&routes::album_art(&id), "second.jpg", fake_jpeg(2048))
        .await;
    assert_eq!(second.status, 200);
    let second_url = second.body["album_art_url"].as_str().unwrap().to_string();

    assert_ne!(first_url, second_url);
    assert!(!app.file_path(&first_url).exists());
    assert!(app.file_path(&second_url).exists());
    assert_eq!(app.stored_file_count(), 1);

    let song = app.get(&routes::song(&id)).await;
    assert_eq!(song.body["album_art_url"], second_url.as_str());
}

#[tokio::test]
async fn deleting_song_removes_its_art() {
    let app = TestApp::spawn().await;
    let id = app.create_song("All Blues").await;

    let res = app
        .upload(&routes::album_art(&id), "cover.jpg", fake_jpeg(4096))
        .await;
    let url = res.body["album_art_url"].as_str().unwrap().to_string();
    assert!(app.file_path(&url).exists());

    let res = app.delete(&routes::song(&id)).await;
    assert_eq!(res.status, 200);

    assert!(!app.file_path(&url).exists());
    assert_eq!(app.stored_file_count(), 0);
    let (status, _) = app.get_bytes(&url).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn upload_to_unknown_song_is_not_found_and_stores_nothing() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            &routes::album_art(&Uuid::now_v7().to_string()),
            "cover.jpg",
            fake_jpeg(1024),
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.code(), "NOT_FOUND");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn oversized_upload_to_unknown_song_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            &routes::album_art(&Uuid::now_v7().to_string()),
            "cover.jpg",
            fake_jpeg(MAX_FILE_SIZE as usize + 1),
        )
        .await;

    assert_eq!(res.status, 404, "{}", res.text);
    assert_eq!(res.code(), "NOT_FOUND");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let app = TestApp::spawn().await;
    let id = app.create_song("So What").await;

    let res = app
        .upload_field(&routes::album_art(&id), "image", "cover.jpg", fake_jpeg(1024))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");

    let song = app.get(&routes::song(&id)).await;
    assert!(song.body["album_art_url"].is_null());
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let app = TestApp::spawn().await;
    let id = app.create_song("So What").await;

    let res = app
        .upload(&routes::album_art(&id), "cover.jpg", Vec::new())
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = TestApp::spawn().await;
    let id = app.create_song("So What").await;

    let res = app
        .upload(
            &routes::album_art(&id),
            "cover.jpg",
            fake_jpeg(MAX_FILE_SIZE as usize + 1),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.code(), "VALIDATION_ERROR");
    assert_eq!(app.stored_file_count(), 0);

    let song = app.get(&routes::song(&id)).await;
    assert!(song.body["album_art_url"].is_null());
}

#[tokio::test]
async fn upload_ignores_unsafe_extensions() {
    let app = TestApp::spawn().await;
    let id = app.create_song("So What").await;

    let res = app
        .upload(&routes::album_art(&id), "../../evil.j/pg", fake_jpeg(512))
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    let url = res.body["album_art_url"].as_str().unwrap();
    let name = url.trim_start_matches("/uploads/albumart/");
    assert!(!name.contains('/'));
    assert!(!name.contains(".."));
    assert!(app.file_path(url).exists());
}
