//! Integration tests for the Lost & Found backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::store::ItemStore;
use crate::{create_router, AppState};

const ADMIN_KEY: &str = "test-admin-key";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    store: Arc<Mutex<ItemStore>>,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (base_url, store) = spawn_server(&temp_dir).await;

        TestFixture {
            client: Client::new(),
            base_url,
            store,
            temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn report(&self, title: &str, category: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/items"))
            .json(&json!({
                "title": title,
                "category": category,
                "location": "Library",
                "date": "2025-03-14",
                "description": "Left on a study table",
                "finderName": "Sam",
                "finderContact": "sam@example.com"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["item"].clone()
    }

    async fn admin_post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("x-admin-key", ADMIN_KEY)
            .send()
            .await
            .unwrap()
    }

    async fn browse(&self, query: &str) -> Value {
        let resp = self
            .client
            .get(self.url(&format!("/api/items{}", query)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"].clone()
    }
}

/// Start a server over the database in `temp_dir`, loading whatever it holds.
async fn spawn_server(temp_dir: &TempDir) -> (String, Arc<Mutex<ItemStore>>) {
    let db_path = temp_dir.path().join("test.sqlite");

    let pool = init_database(&db_path).await.expect("Failed to init DB");
    let mut store = ItemStore::new(Repository::new(pool), "FBLA2025");
    store.load().await;

    let config = Config {
        admin_key: ADMIN_KEY.to_string(),
        db_path,
        storage_key: "FBLA2025".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        max_body_bytes: 1024 * 1024,
    };

    let store = Arc::new(Mutex::new(store));
    let state = AppState {
        store: store.clone(),
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (format!("http://{}", addr), store)
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_report_found_item() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/items"))
        .json(&json!({
            "title": "  Blue Backpack ",
            "category": "Bags",
            "location": "Gym",
            "date": "2025-03-01",
            "description": "Navy, with a keychain",
            "finderName": "Kai",
            "finderContact": "kai@example.com",
            "photoDataUrl": "data:image/png;base64,iVBORw0KGgo="
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["message"],
        "Thank you! Your item has been submitted for review."
    );
    let item = &body["data"]["item"];
    assert_eq!(item["title"], "Blue Backpack");
    assert_eq!(item["status"], "pending");
    assert!(item["id"].as_str().unwrap().starts_with("LF-"));
    assert!(item["createdAt"].as_i64().unwrap() > 0);
    assert_eq!(body["revisionId"], 1);

    let id = item["id"].as_str().unwrap();
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/items/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), 200);
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(
        get_body["data"]["photoDataUrl"],
        "data:image/png;base64,iVBORw0KGgo="
    );
}

#[tokio::test]
async fn test_report_missing_contact_is_rejected() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/items"))
        .json(&json!({
            "title": "Umbrella",
            "category": "Other",
            "location": "Entrance",
            "date": "2025-03-02",
            "description": "Black, folding",
            "finderName": "Jo"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Please fill out all required fields."
    );

    let stats: Value = fixture
        .client
        .get(fixture.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["data"]["total"], 0);
    assert_eq!(stats["revisionId"], 0);
}

#[tokio::test]
async fn test_browse_filters_and_sort() {
    let fixture = TestFixture::new().await;

    let a = fixture.report("Red Scarf", "Clothing").await;
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    let b = fixture.report("Blue Backpack", "Bags").await;
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    let c = fixture.report("Phone Charger", "Electronics").await;

    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();
    let c_id = c["id"].as_str().unwrap();

    fixture
        .admin_post(&format!("/api/admin/items/{}/approve", b_id))
        .await;
    fixture
        .admin_post(&format!("/api/admin/items/{}/approve", c_id))
        .await;
    fixture
        .admin_post(&format!("/api/admin/items/{}/claim", c_id))
        .await;

    let all = fixture.browse("").await;
    assert_eq!(ids(&all["items"]), vec![c_id, b_id, a_id]);
    assert_eq!(all["empty"], false);

    let oldest = fixture.browse("?sort=oldest").await;
    assert_eq!(ids(&oldest["items"]), vec![a_id, b_id, c_id]);

    let approved = fixture.browse("?status=approved").await;
    assert_eq!(ids(&approved["items"]), vec![b_id]);

    let query = fixture.browse("?q=BACK").await;
    assert_eq!(ids(&query["items"]), vec![b_id]);

    let by_category = fixture.browse("?category=Clothing").await;
    assert_eq!(ids(&by_category["items"]), vec![a_id]);

    let none = fixture.browse("?q=backpack&category=Clothing").await;
    assert_eq!(none["empty"], true);
    assert_eq!(none["total"], 0);
}

#[tokio::test]
async fn test_admin_requires_key() {
    let fixture = TestFixture::new().await;
    let item = fixture.report("Keys", "Keys").await;
    let id = item["id"].as_str().unwrap();

    let missing = fixture
        .client
        .get(fixture.url("/api/admin/items"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let wrong = fixture
        .client
        .post(fixture.url(&format!("/api/admin/items/{}/approve", id)))
        .header("x-admin-key", "guess")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    let bearer = fixture
        .client
        .get(fixture.url("/api/admin/items"))
        .header("Authorization", format!("Bearer {}", ADMIN_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(bearer.status(), 200);
    let lists: Value = bearer.json().await.unwrap();
    assert_eq!(ids(&lists["data"]["pending"]), vec![id]);
    assert!(lists["data"]["approved"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_unlock() {
    let fixture = TestFixture::new().await;

    let ok = fixture
        .client
        .post(fixture.url("/api/admin/unlock"))
        .json(&json!({ "key": ADMIN_KEY }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["data"]["unlocked"], true);
    assert_eq!(body["data"]["message"], "Admin controls unlocked.");

    let wrong = fixture
        .client
        .post(fixture.url("/api/admin/unlock"))
        .json(&json!({ "key": "FBLA2024" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);
    let body: Value = wrong.json().await.unwrap();
    assert_eq!(
        body["error"]["message"],
        "Incorrect key. Please check with site administrator."
    );
}

#[tokio::test]
async fn test_status_transitions() {
    let fixture = TestFixture::new().await;
    let item = fixture.report("Calculator", "Electronics").await;
    let id = item["id"].as_str().unwrap();

    // claim before approval is ignored
    let early: Value = fixture
        .admin_post(&format!("/api/admin/items/{}/claim", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(early["data"]["outcome"], "unchanged");
    assert_eq!(early["data"]["status"], "pending");

    let approved: Value = fixture
        .admin_post(&format!("/api/admin/items/{}/approve", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(approved["data"]["outcome"], "applied");
    assert_eq!(approved["data"]["status"], "approved");
    assert_eq!(approved["revisionId"], 2);

    let again: Value = fixture
        .admin_post(&format!("/api/admin/items/{}/approve", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(again["data"]["outcome"], "unchanged");
    assert_eq!(again["revisionId"], 2);

    let claimed: Value = fixture
        .admin_post(&format!("/api/admin/items/{}/claim", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(claimed["data"]["status"], "claimed");

    let unknown: Value = fixture
        .admin_post("/api/admin/items/LF-0000/approve")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unknown["success"], true);
    assert_eq!(unknown["data"]["outcome"], "notFound");

    let stats: Value = fixture
        .client
        .get(fixture.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(stats["data"]["pending"], 0);
    assert_eq!(stats["data"]["claimed"], 1);
}

#[tokio::test]
async fn test_remove_requires_confirmation() {
    let fixture = TestFixture::new().await;
    let item = fixture.report("Notebook", "Books").await;
    let id = item["id"].as_str().unwrap();

    let unconfirmed = fixture
        .client
        .delete(fixture.url(&format!("/api/admin/items/{}", id)))
        .header("x-admin-key", ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(unconfirmed.status(), 400);

    for expected in ["applied", "notFound"] {
        let resp = fixture
            .client
            .delete(fixture.url(&format!("/api/admin/items/{}?confirm=true", id)))
            .header("x-admin-key", ADMIN_KEY)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"]["outcome"], expected);
    }

    let gone = fixture
        .client
        .get(fixture.url(&format!("/api/items/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), 404);
    let body: Value = gone.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_claim_submission() {
    let fixture = TestFixture::new().await;

    let incomplete = fixture
        .client
        .post(fixture.url("/api/claims"))
        .json(&json!({ "itemId": "LF-1234", "name": "Jo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(incomplete.status(), 400);
    let body: Value = incomplete.json().await.unwrap();
    assert_eq!(body["error"]["message"], "Please fill in all required fields.");

    let accepted = fixture
        .client
        .post(fixture.url("/api/claims"))
        .json(&json!({
            "itemId": "LF-1234",
            "name": "Jo",
            "email": "jo@example.com",
            "relation": "owner",
            "details": "Initials J.K. inside the lid",
            "preferred": "email"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), 200);
    let body: Value = accepted.json().await.unwrap();
    assert_eq!(body["data"]["itemId"], "LF-1234");
    assert_eq!(body["data"]["reference"].as_str().unwrap().len(), 36);
    assert_eq!(body["data"]["preferred"], "email");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Your claim has been submitted."));
}

#[tokio::test]
async fn test_state_survives_restart() {
    let fixture = TestFixture::new().await;
    let item = fixture.report("Lunch box", "Other").await;
    let id = item["id"].as_str().unwrap();
    fixture
        .admin_post(&format!("/api/admin/items/{}/approve", id))
        .await;

    let (restarted, _) = spawn_server(&fixture.temp_dir).await;
    let resp: Value = fixture
        .client
        .get(format!("{}/api/items/{}", restarted, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["data"]["status"], "approved");
    assert_eq!(resp["revisionId"], 2);

    let revision: Value = fixture
        .client
        .get(format!("{}/api/revision", restarted))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(revision["data"]["revisionId"], 2);
}

#[tokio::test]
async fn test_report_rolled_back_when_save_fails() {
    let fixture = TestFixture::new().await;
    fixture.report("Charger", "Electronics").await;

    {
        let store = fixture.store.lock().await;
        sqlx::query("DROP TABLE kv_store")
            .execute(store.repository().pool())
            .await
            .unwrap();
    }

    let resp = fixture
        .client
        .post(fixture.url("/api/items"))
        .json(&json!({
            "title": "Keys",
            "category": "Accessories",
            "location": "Parking lot",
            "date": "2025-03-15",
            "description": "Ring with three keys",
            "finderName": "Sam",
            "finderContact": "sam@example.com"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "STORAGE_ERROR");

    let stats: Value = fixture
        .client
        .get(fixture.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(fixture.store.lock().await.len(), 1);
}
