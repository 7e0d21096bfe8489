use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::common::storage::FilesystemFileStore;
use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use music_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, LoggingConfig, ServerConfig, StorageConfig,
};
use music_server::state::AppState;

pub const ALBUM_ART_DIR: &str = "uploads/albumart";

/// Upload limit used by every test server.
pub const MAX_FILE_SIZE: u64 = 64 * 1024;

pub mod routes {
    pub const SONGS: &str = "/api/v1/songs";

    pub fn song(id: &str) -> String {
        format!("/api/v1/songs/{id}")
    }

    pub fn album_art(id: &str) -> String {
        format!("/api/v1/songs/{id}/album-art")
    }
}

/// A running test server backed by a temporary SQLite database and asset root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub asset_root: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub headers: reqwest::header::HeaderMap,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let asset_root = dir.path().join("wwwroot");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: format!(
                    "sqlite://{}?mode=rwc",
                    dir.path().join("music.db").display()
                ),
                max_connections: 5,
                min_connections: 1,
            },
            storage: StorageConfig {
                asset_root: asset_root.clone(),
                album_art_dir: ALBUM_ART_DIR.to_string(),
                max_file_size: MAX_FILE_SIZE,
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
        };

        let db = music_server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");

        let files = FilesystemFileStore::new(asset_root.clone(), ALBUM_ART_DIR, MAX_FILE_SIZE)
            .await
            .expect("Failed to initialize file store");

        let state = AppState::new(app_config, db.clone(), Arc::new(files));
        let app = music_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            asset_root,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_bytes(&self, path: &str) -> (u16, Vec<u8>) {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        let status = res.status().as_u16();
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        (status, bytes)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Post a multipart form with a single part under `field`.
    pub async fn upload_field(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        file_bytes: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    pub async fn upload(&self, path: &str, file_name: &str, file_bytes: Vec<u8>) -> TestResponse {
        self.upload_field(path, "file", file_name, file_bytes).await
    }

    /// Create a song via the API and return its `id`.
    pub async fn create_song(&self, title: &str) -> String {
        let res = self
            .post(
                routes::SONGS,
                &serde_json::json!({
                    "title": title,
                    "artist": "Miles Davis",
                    "album": "Kind of Blue",
                    "genre": "Jazz",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_song failed: {}", res.text);
        res.id()
    }

    /// Filesystem location of a stored file given its public reference.
    pub fn file_path(&self, reference: &str) -> PathBuf {
        self.asset_root.join(reference.trim_start_matches('/'))
    }

    /// Number of files in the album-art directory, temp files excluded.
    pub fn stored_file_count(&self) -> usize {
        count_files(&self.asset_root.join(ALBUM_ART_DIR))
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            headers,
        }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

/// Bytes that look like a JPEG to anything sniffing the header.
pub fn fake_jpeg(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(len, 0xAB);
    bytes
}
