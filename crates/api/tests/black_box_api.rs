use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use staffdir_api::{ApiConfig, HashCost};
use staffdir_auth::TokenConfig;
use staffdir_observability::LogFormat;

const SECRET: [u8; 32] = [0x5a; 32];

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            token: TokenConfig::new(SECRET.to_vec(), ChronoDuration::minutes(10)).unwrap(),
            hash_cost: HashCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            log_format: LogFormat::Pretty,
        };

        // Same router as prod, bound to an ephemeral port.
        let app = staffdir_api::app::build_app(&config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn register(&self, username: &str, password: &str, role: Option<&str>) -> reqwest::Response {
        let mut body = json!({ "username": username, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.client
            .post(self.url("/auth/register"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn token_for(&self, username: &str, password: &str, role: &str) -> String {
        let res = self.register(username, password, Some(role)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = self.login(username, password).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &[u8], sub: &str, roles: Value, expires_in: ChronoDuration) -> String {
    let now = Utc::now();
    let claims = json!({
        "sub": sub,
        "roles": roles,
        "iat": now.timestamp(),
        "exp": (now + expires_in).timestamp(),
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_login_and_manage_employees() {
    let srv = TestServer::spawn().await;

    let res = srv.register("admin", "adminpass", Some("ADMIN")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let user: Value = res.json().await.unwrap();
    assert_eq!(user["username"], "admin");
    assert_eq!(user["roles"], json!(["ADMIN"]));
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());

    let res = srv.login("admin", "adminpass").await;
    assert_eq!(res.status(), StatusCode::OK);
    let token = res.json::<Value>().await.unwrap()["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(token.split('.').count(), 3);

    let res = srv
        .client
        .post(srv.url("/employees"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Jane Doe", "email": "Jane@Example.com", "department": "Eng" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()[reqwest::header::LOCATION].to_str().unwrap().to_string();
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(location, format!("/employees/{id}"));
    assert_eq!(created["email"], "jane@example.com");

    let res = srv
        .client
        .get(srv.url("/employees"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Vec<Value> = res.json().await.unwrap();
    assert!(list.iter().any(|e| e["id"] == id.as_str()));

    let res = srv
        .client
        .put(srv.url(&format!("/employees/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "name": "Jane Smith", "email": "jane@example.com", "salary": 1000.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Jane Smith");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let res = srv
        .client
        .delete(srv.url(&format!("/employees/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .get(srv.url(&format!("/employees/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requests_without_token_are_forbidden() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/employees"))
        .json(&json!({ "name": "X", "email": "x@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv.client.get(srv.url("/auth/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn user_role_can_read_but_not_write() {
    let srv = TestServer::spawn().await;
    let admin = srv.token_for("admin", "adminpass", "ADMIN").await;
    let user = srv.token_for("alice", "alicepass", "USER").await;

    let res = srv
        .client
        .post(srv.url("/employees"))
        .bearer_auth(&user)
        .json(&json!({ "name": "Bob", "email": "bob@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let role_denied: Value = res.json().await.unwrap();

    // A role mismatch looks the same as having no token at all.
    let res = srv
        .client
        .post(srv.url("/employees"))
        .json(&json!({ "name": "Bob", "email": "bob@example.com" }))
        .send()
        .await
        .unwrap();
    let no_token: Value = res.json().await.unwrap();
    assert_eq!(role_denied, no_token);

    let res = srv
        .client
        .post(srv.url("/employees"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Bob", "email": "bob@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = res.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let res = srv
        .client
        .get(srv.url("/employees"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .get(srv.url(&format!("/employees/{id}")))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .delete(srv.url(&format!("/employees/{id}")))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn registration_defaults_and_conflicts() {
    let srv = TestServer::spawn().await;

    let res = srv.register("carol", "pw", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["roles"], json!(["USER"]));

    let res = srv.register("carol", "other", None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "username_taken");

    // The first registration still owns the account.
    assert_eq!(srv.login("carol", "pw").await.status(), StatusCode::OK);
    assert_eq!(srv.login("carol", "other").await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_validation() {
    let srv = TestServer::spawn().await;

    assert_eq!(srv.register("", "pw", None).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(srv.register("dave", "   ", None).await.status(), StatusCode::BAD_REQUEST);

    let res = srv.register("dave", "pw", Some("SUPERUSER")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_role");

    // Nothing was stored by the rejected attempts.
    assert_eq!(srv.register("dave", "pw", Some("ROLE_ADMIN")).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    srv.register("erin", "right", None).await;

    let wrong = srv.login("erin", "wrong").await;
    let missing = srv.login("nobody", "whatever").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong: Value = wrong.json().await.unwrap();
    let missing: Value = missing.json().await.unwrap();
    assert_eq!(wrong, missing);
}

#[tokio::test]
async fn whoami_reflects_token_claims() {
    let srv = TestServer::spawn().await;
    let token = srv.token_for("frank", "pw", "ADMIN").await;

    let res = srv
        .client
        .get(srv.url("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "frank");
    assert_eq!(body["roles"], json!(["ADMIN"]));
}

#[tokio::test]
async fn bad_tokens_are_forbidden() {
    let srv = TestServer::spawn().await;
    let token = srv.token_for("admin", "adminpass", "ADMIN").await;

    let foreign = mint_jwt(&[0x11; 32], "admin", json!(["ADMIN"]), ChronoDuration::minutes(5));
    let expired = mint_jwt(&SECRET, "admin", json!(["ADMIN"]), ChronoDuration::minutes(-5));
    let unknown_role = mint_jwt(&SECRET, "admin", json!(["ROOT"]), ChronoDuration::minutes(5));
    let ghost = mint_jwt(&SECRET, "ghost", json!(["ADMIN"]), ChronoDuration::minutes(5));

    // Flip the first signature character; it carries six full bits.
    let (head, sig) = token.rsplit_once('.').unwrap();
    let flipped = if sig.starts_with('A') { 'Q' } else { 'A' };
    let tampered = format!("{head}.{flipped}{}", &sig[1..]);

    for bad in [foreign, expired, unknown_role, ghost, tampered, "not-a-jwt".to_string()] {
        let res = srv
            .client
            .get(srv.url("/employees"))
            .bearer_auth(&bad)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "token {bad:?} was accepted");
    }

    // A correctly minted token for a live account passes.
    let minted = mint_jwt(&SECRET, "admin", json!(["ADMIN"]), ChronoDuration::minutes(5));
    let res = srv
        .client
        .get(srv.url("/employees"))
        .bearer_auth(&minted)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn employee_errors_map_to_status_codes() {
    let srv = TestServer::spawn().await;
    let token = srv.token_for("admin", "adminpass", "ADMIN").await;

    let create = |body: Value| {
        srv.client
            .post(srv.url("/employees"))
            .bearer_auth(&token)
            .json(&body)
            .send()
    };

    assert_eq!(
        create(json!({ "name": "A", "email": "a@example.com" })).await.unwrap().status(),
        StatusCode::CREATED
    );
    assert_eq!(
        create(json!({ "name": "B", "email": "A@EXAMPLE.com" })).await.unwrap().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        create(json!({ "name": " ", "email": "c@example.com" })).await.unwrap().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        create(json!({ "name": "D", "email": "not-an-email" })).await.unwrap().status(),
        StatusCode::BAD_REQUEST
    );

    let res = srv
        .client
        .get(srv.url("/employees/not-a-uuid"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let missing = uuid_like();
    for res in [
        srv.client.get(srv.url(&format!("/employees/{missing}"))).bearer_auth(&token).send().await.unwrap(),
        srv.client.delete(srv.url(&format!("/employees/{missing}"))).bearer_auth(&token).send().await.unwrap(),
        srv.client
            .put(srv.url(&format!("/employees/{missing}")))
            .bearer_auth(&token)
            .json(&json!({ "name": "Z", "email": "z@example.com" }))
            .send()
            .await
            .unwrap(),
    ] {
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

fn uuid_like() -> String {
    staffdir_core::EmployeeId::new().to_string()
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let srv = TestServer::spawn().await;
    let admin = srv.token_for("admin", "adminpass", "ADMIN").await;
    let user = srv.token_for("alice", "alicepass", "USER").await;

    let res = srv
        .client
        .post(srv.url("/auth/register"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"username\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].is_string());

    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .body("username=admin&password=adminpass")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let res = srv
        .client
        .post(srv.url("/employees"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "No Email" }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    // Authorization is decided before the body is looked at.
    let res = srv
        .client
        .post(srv.url("/employees"))
        .bearer_auth(&user)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
