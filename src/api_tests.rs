//! End-to-end checks through the full router against the in-memory store.

use axum::{
    body::Body,
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{app::build_app, auth::JwtKeys, state::AppState};

const FORM: &str = "application/x-www-form-urlencoded";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::fake();
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, String) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        form: Option<&str>,
    ) -> (StatusCode, String) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match form {
            Some(form) => {
                req = req.header(header::CONTENT_TYPE, FORM);
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        self.send(req.body(body).unwrap()).await
    }

    async fn json(&self, uri: &str, token: Option<&str>) -> Value {
        let (status, body) = self.call(Method::GET, uri, token, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        serde_json::from_str(&body).unwrap()
    }

    async fn sign_up(&self, username: &str, email: &str) -> String {
        let form = format!(
            "username={username}&password=Secur3Pass&confirmPassword=Secur3Pass\
             &Email={email}&Phone=5551234567&FullName=Jane+Doe&RoleName=Engineer"
        );
        let (status, token) = self
            .call(Method::POST, "/api/user/SignUp", None, Some(&form))
            .await;
        assert_eq!(status, StatusCode::OK, "{token}");
        token
    }

    async fn new_card(&self, token: &str) -> String {
        let (status, id) = self.call(Method::POST, "/api/card", Some(token), None).await;
        assert_eq!(status, StatusCode::OK, "{id}");
        id
    }
}

fn put_form(display_name: &str, is_main: bool) -> String {
    format!(
        "DisplayName={display_name}&RoleName=Engineer&BGColor=%23112233&TextColor=%23ffffff\
         &Email=jane%40example.com&PhoneNumber=5551234567&LinkedIn=janedoe&IsMain={is_main}"
    )
}

#[tokio::test]
async fn login_token_carries_user_id() {
    let app = TestApp::new();
    app.sign_up("jane_doe", "jane%40example.com").await;

    let (status, token) = app
        .call(
            Method::POST,
            "/api/user/login",
            None,
            Some("username=jane_doe&password=Secur3Pass"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let me = app.json("/api/user/me", Some(&token)).await;
    let claims = JwtKeys::from_ref(&app.state).verify(&token).unwrap();
    assert_eq!(me["id"], claims.sub.to_string());
    assert_eq!(me["userName"], "jane_doe");
    assert_eq!(me["cards"], Value::Array(vec![]));
    assert_eq!(me["mainCard"], Value::Null);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::new();
    app.sign_up("jane_doe", "jane%40example.com").await;

    let form = "username=someone_else&password=Secur3Pass&confirmPassword=Secur3Pass\
                &Email=JANE%40example.com&FullName=Jane+Doe&RoleName=Engineer";
    let (status, body) = app
        .call(Method::POST, "/api/user/signup", None, Some(form))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "email is already taken");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/user/login",
            None,
            Some("username=someone_else&password=Secur3Pass"),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_up_reports_all_validation_errors() {
    let app = TestApp::new();
    let form = "username=j&password=weak&confirmPassword=other&Email=nope&FullName=Jane&RoleName=Engineer";
    let (status, body) = app
        .call(Method::POST, "/api/user/SignUp", None, Some(form))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.lines().count(), 4, "{body}");
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let app = TestApp::new();
    app.sign_up("jane_doe", "jane%40example.com").await;

    let wrong_password = app
        .call(
            Method::POST,
            "/api/user/login",
            None,
            Some("username=jane_doe&password=Wrong1Pass"),
        )
        .await;
    let unknown_user = app
        .call(
            Method::POST,
            "/api/user/login",
            None,
            Some("username=nobody&password=Wrong1Pass"),
        )
        .await;
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);

    let (status, _) = app
        .call(Method::POST, "/api/user/login", None, Some("username=jane_doe"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_huge_form_is_answered_promptly() {
    let app = TestApp::new();
    let mut form = String::from("username=jane_doe&password=Secur3Pass");
    for i in 0..60_000 {
        form.push_str(&format!("&k{i}="));
    }

    let started = std::time::Instant::now();
    let (status, _) = app
        .call(Method::POST, "/api/user/login", None, Some(&form))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(
        started.elapsed() < std::time::Duration::from_secs(20),
        "took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn multipart_sign_up_is_accepted() {
    let app = TestApp::new();
    let boundary = "XBIZCARDX";
    let fields = [
        ("fullName", "Jane Doe"),
        ("roleName", "Engineer"),
        ("phoneNumber", "5551234567"),
        ("username", "jane_doe"),
        ("email", "jane@example.com"),
        ("password", "Secur3Pass"),
        ("confirmpassword", "Secur3Pass"),
    ];
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/user/signup")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, token) = app.send(req).await;
    assert_eq!(status, StatusCode::OK, "{token}");

    let me = app.json("/api/user/me", Some(&token)).await;
    assert_eq!(me["phoneNumber"], "5551234567");
}

#[tokio::test]
async fn first_card_becomes_main_and_second_does_not() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;

    let first = app.new_card(&token).await;
    let second = app.new_card(&token).await;

    let me = app.json("/api/user/me", Some(&token)).await;
    assert_eq!(me["mainCard"]["id"], first);
    assert_eq!(me["cards"].as_array().unwrap().len(), 2);
    assert_eq!(me["cards"][0]["id"], first);
    assert_eq!(me["cards"][1]["id"], second);

    let card = app.json(&format!("/api/card/{first}"), None).await;
    assert_eq!(card["displayName"], "Jane Doe");
    assert_eq!(card["roleName"], "Engineer");
    assert_eq!(card["textColor"], "#000000");
    assert_eq!(card["bgColor"], "#ffffff");
    assert_eq!(card["email"], "jane@example.com");
    assert_eq!(card["owner"]["userName"], "jane_doe");
}

#[tokio::test]
async fn deleting_main_card_clears_pointer() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;
    let first = app.new_card(&token).await;
    app.new_card(&token).await;

    let (status, body) = app
        .call(Method::DELETE, &format!("/api/card/{first}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, first);

    let me = app.json("/api/user/me", Some(&token)).await;
    assert_eq!(me["mainCard"], Value::Null);
    assert_eq!(me["cards"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(Method::GET, &format!("/api/card/{first}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .call(Method::GET, "/api/card/main/jane_doe", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn is_main_update_repoints_main_card() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;
    let first = app.new_card(&token).await;
    let second = app.new_card(&token).await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/card/{second}"),
            Some(&token),
            Some(&put_form("Jane+Work", true)),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, second);

    let cards = app.json("/api/card/cards", Some(&token)).await;
    let flags: Vec<(String, bool)> = cards
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["id"].as_str().unwrap().to_string(),
                c["isMain"].as_bool().unwrap(),
            )
        })
        .collect();
    assert_eq!(flags, vec![(first, false), (second.clone(), true)]);

    let main = app.json("/api/card/main/jane_doe", None).await;
    assert_eq!(main["id"], second);
    assert_eq!(main["displayName"], "Jane Work");
    assert_eq!(main["bgColor"], "#112233");
    assert_eq!(main["linkedIn"], "janedoe");
    assert_eq!(main["owner"]["fullName"], "Jane Doe");
}

#[tokio::test]
async fn main_card_lookup_by_username() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;

    let (status, _) = app
        .call(Method::GET, "/api/card/main/jane_doe", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .call(Method::GET, "/api/card/main/nobody", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = app.new_card(&token).await;
    let main = app.json("/api/card/main/jane_doe", None).await;
    assert_eq!(main["id"], id);
    assert_eq!(main["isMain"], true);
    assert_eq!(main["isOwner"], false);
    assert_eq!(main["owner"]["email"], "jane@example.com");
    assert_eq!(main["owner"]["roleName"], "Engineer");

    let as_owner = app.json("/api/card/main/jane_doe", Some(&token)).await;
    assert_eq!(as_owner["isOwner"], true);
}

#[tokio::test]
async fn non_owner_cannot_modify_card() {
    let app = TestApp::new();
    let owner = app.sign_up("jane_doe", "jane%40example.com").await;
    let intruder = app.sign_up("mallory", "mallory%40example.com").await;
    let card = app.new_card(&owner).await;
    let uri = format!("/api/card/{card}");

    let (status, _) = app
        .call(Method::PUT, &uri, Some(&intruder), Some(&put_form("Hijacked", true)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let read = app.json(&uri, Some(&intruder)).await;
    assert_eq!(read["displayName"], "Jane Doe");
    assert_eq!(read["isOwner"], false);
    let mallory = app.json("/api/user/me", Some(&intruder)).await;
    assert_eq!(mallory["mainCard"], Value::Null);
}

#[tokio::test]
async fn invalid_update_is_rejected_with_all_messages() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;
    let card = app.new_card(&token).await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/card/{card}"),
            Some(&token),
            Some("DisplayName=J&BGColor=white&TextColor=%23000"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.lines().count(), 2, "{body}");

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/card/not-a-card",
            Some(&token),
            Some(&put_form("Jane", false)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = TestApp::new();
    for (method, uri) in [
        (Method::GET, "/api/user/me"),
        (Method::GET, "/api/card/cards"),
        (Method::POST, "/api/card"),
        (Method::GET, "/api/user/avatar/jane@example.com"),
    ] {
        let (status, body) = app.call(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, r#"{"error":"Unauthorized"}"#);
    }

    let (status, _) = app
        .call(Method::GET, "/api/user/me", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn avatar_is_proxied() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;

    let avatar = app
        .json("/api/user/avatar/jane%40example.com", Some(&token))
        .await;
    assert_eq!(avatar["Success"], true);
    assert_eq!(avatar["Image"], "https://fake.local/jane@example.com.png");

    let (status, body) = app
        .call(Method::GET, "/api/user/avatar", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "email is missing");

    let (status, _) = app
        .call(Method::GET, "/api/user/avatar/not-an-email", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_account_removes_cards() {
    let app = TestApp::new();
    let token = app.sign_up("jane_doe", "jane%40example.com").await;
    let card = app.new_card(&token).await;

    let (status, _) = app
        .call(Method::DELETE, "/api/user/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::GET, &format!("/api/card/{card}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Method::GET, "/api/user/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
