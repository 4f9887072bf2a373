use std::{collections::BTreeMap, time::Duration};

use application::{router, Service};
use axum::{body::Body, Router};
use axum_extra::extract::cookie::{Cookie, SameSite};
use common::DateTime;
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use service::{
    command::{self, Command as _},
    domain::{
        user::{session, Identity, Session},
        Booking, CarService, Details,
    },
    infra::{postgres, Memory, Postgres},
    Config,
};
use tower::ServiceExt as _;

const SECRET: &str = "s3cr3t";

fn service<Db>(db: Db) -> Service<Db> {
    Service::new(Config::with_secret(SECRET), db)
}

fn app(db: Memory) -> Router {
    router(service(db))
}

/// [`Postgres`] store which fails every operation.
fn unreachable_store() -> Postgres {
    Postgres::new(&postgres::Config {
        host: Some("127.0.0.1".to_owned()),
        port: Some(1),
        user: Some("postgres".to_owned()),
        dbname: Some("postgres".to_owned()),
        ..postgres::Config::default()
    })
    .unwrap()
}

fn booking(email: &str, customer: &str) -> Booking {
    let details: Details =
        serde_json::from_value(json!({"customerName": customer})).unwrap();
    Booking::new(Some(email.parse().unwrap()), None, details)
}

/// Client-side cookie storage following `Set-Cookie` headers.
#[derive(Debug, Default)]
struct Jar(BTreeMap<String, String>);

impl Jar {
    fn absorb(&mut self, resp: &http::Response<Body>) {
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let cookie =
                Cookie::parse(value.to_str().unwrap().to_owned()).unwrap();
            let removed = cookie.value().is_empty()
                || cookie.max_age().is_some_and(|age| age.is_zero());
            if removed {
                drop(self.0.remove(cookie.name()));
            } else {
                drop(
                    self.0
                        .insert(cookie.name().to_owned(), cookie.value().to_owned()),
                );
            }
        }
    }

    fn header(&self) -> Option<String> {
        (!self.0.is_empty()).then(|| {
            self.0
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ")
        })
    }
}

fn request(
    method: Method,
    uri: &str,
    cookie: Option<String>,
    body: Option<Value>,
) -> Request<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> http::Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

async fn json_body(resp: http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, identity: Value) -> Jar {
    let resp = send(app, request(Method::POST, "/jwt", None, Some(identity))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mut jar = Jar::default();
    jar.absorb(&resp);
    jar
}

fn signed_cookie(session: &Session, secret: &str) -> String {
    let token = session
        .sign(&Config::with_secret(secret).jwt_encoding_key)
        .unwrap();
    format!("token={}", AsRef::<str>::as_ref(&token))
}

#[tokio::test]
async fn reports_liveness() {
    let resp = send(&app(Memory::new()), request(Method::GET, "/", None, None)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"My car management service is working");
}

#[tokio::test]
async fn issues_session_cookie_verifying_to_identity() {
    let app = app(Memory::new());
    let identity = json!({"email": "a@x.com", "name": "Alice"});

    let resp = send(
        &app,
        request(Method::POST, "/jwt", None, Some(identity.clone())),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    let cookie = Cookie::parse(set_cookie).unwrap();
    assert_eq!(cookie.name(), "token");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::None));
    assert_eq!(cookie.path(), Some("/"));

    assert_eq!(json_body(resp).await, json!({"success": true}));

    let session = service(Memory::new())
        .execute(command::AuthorizeUserSession {
            token: session::Token::from(cookie.value()),
        })
        .await
        .unwrap();
    assert_eq!(
        session.identity,
        serde_json::from_value::<Identity>(identity).unwrap(),
    );
    assert_eq!(
        session.expires_at.coerce::<()>() - session.issued_at.coerce(),
        Duration::from_secs(60 * 60),
    );
}

#[tokio::test]
async fn requires_only_non_empty_email_in_identity() {
    let app = app(Memory::new());

    for identity in [json!({"name": "Alice"}), json!({"email": ""})] {
        let resp =
            send(&app, request(Method::POST, "/jwt", None, Some(identity))).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(resp).await["code"], "INVALID_REQUEST");
    }

    let resp = send(
        &app,
        request(
            Method::POST,
            "/jwt",
            None,
            Some(json!({"email": "not-an-email"})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn gate_rejects_before_reaching_store() {
    let app = router(service(unreachable_store()));

    let resp = send(&app, request(Method::GET, "/bookings", None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(resp).await,
        json!({"code": "MISSING_TOKEN", "message": "Unauthorized access"}),
    );

    let resp = send(
        &app,
        request(Method::GET, "/bookings", Some("token=garbage".into()), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(resp).await,
        json!({"code": "INVALID_TOKEN", "message": "unauthorized access"}),
    );

    let jar = login(&app, json!({"email": "b@x.com"})).await;
    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(resp).await,
        json!({"code": "IDENTITY_MISMATCH", "message": "Forbidden access"}),
    );

    // Authorized requests do reach the store, which fails.
    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=b@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await["code"], "INTERNAL_SERVER_ERROR");
}

#[tokio::test]
async fn gate_rejects_tokenless_cookie() {
    let app = app(Memory::new());

    for cookie in ["token=", "other=value"] {
        let resp = send(
            &app,
            request(Method::GET, "/bookings", Some(cookie.into()), None),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "`{cookie}`");
    }
}

#[tokio::test]
async fn gate_rejects_foreign_and_expired_tokens() {
    let app = app(Memory::new());
    let identity = Identity::new("a@x.com".parse().unwrap());
    let hour = Duration::from_secs(60 * 60);

    let foreign = Session::new(identity.clone(), hour);
    let expired = Session::issued_at(identity, DateTime::now() - 2 * hour, hour);

    for cookie in [
        signed_cookie(&foreign, "another secret"),
        signed_cookie(&expired, SECRET),
    ] {
        let resp = send(
            &app,
            request(Method::GET, "/bookings", Some(cookie), None),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(resp).await["code"], "INVALID_TOKEN");
    }
}

#[tokio::test]
async fn lists_only_owned_bookings() {
    let (a1, b1, a2) = (
        booking("a@x.com", "Alice"),
        booking("b@x.com", "Bob"),
        booking("a@x.com", "Alice again"),
    );
    let app = app(Memory::with([], [a1.clone(), b1.clone(), a2.clone()]));
    let jar = login(&app, json!({"email": "a@x.com"})).await;

    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        serde_json::to_value([&a1, &a2]).unwrap(),
    );

    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=b@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp =
        send(&app, request(Method::GET, "/bookings", jar.header(), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        serde_json::to_value([&a1, &b1, &a2]).unwrap(),
    );
}

#[tokio::test]
async fn logout_revokes_session_cookie() {
    let app = app(Memory::new());
    let mut jar = login(&app, json!({"email": "a@x.com"})).await;

    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(
        &app,
        request(Method::POST, "/logout", jar.header(), Some(json!({}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removal = Cookie::parse(
        resp.headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned(),
    )
    .unwrap();
    assert_eq!(removal.name(), "token");
    assert_eq!(removal.value(), "");
    assert_eq!(removal.path(), Some("/"));
    assert_eq!(removal.http_only(), Some(true));
    assert_eq!(removal.secure(), Some(true));
    assert_eq!(removal.same_site(), Some(SameSite::None));
    jar.absorb(&resp);
    assert_eq!(json_body(resp).await, json!({"success": true}));

    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_cookie_still_clears_it() {
    let app = app(Memory::new());

    let resp = send(&app, request(Method::POST, "/logout", None, None)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn serves_car_services() {
    let service: CarService = serde_json::from_value(json!({
        "_id": "8b0c1a56-6f2f-4e43-9a0a-4f3f2d1c0b9e",
        "title": "Engine Repair",
        "service_id": "02",
        "img": "https://cars.example.org/2.jpg",
        "price": "150.00",
        "description": "Full engine diagnostics",
    }))
    .unwrap();
    let app = app(Memory::with([service.clone()], []));

    let resp = send(&app, request(Method::GET, "/services", None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        serde_json::to_value([&service]).unwrap(),
    );

    let resp = send(
        &app,
        request(
            Method::GET,
            "/services/8b0c1a56-6f2f-4e43-9a0a-4f3f2d1c0b9e",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({
            "_id": "8b0c1a56-6f2f-4e43-9a0a-4f3f2d1c0b9e",
            "title": "Engine Repair",
            "service_id": "02",
            "img": "https://cars.example.org/2.jpg",
            "price": "150.00",
        }),
    );

    let resp = send(
        &app,
        request(
            Method::GET,
            "/services/00000000-0000-0000-0000-000000000000",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, Value::Null);

    let resp =
        send(&app, request(Method::GET, "/services/nope", None, None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn manages_bookings() {
    let app = app(Memory::new());

    let resp = send(
        &app,
        request(
            Method::POST,
            "/bookings",
            None,
            Some(json!({
                "email": "a@x.com",
                "customerName": "Alice",
                "date": "2024-05-01",
                "price": 150,
            })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created = json_body(resp).await;
    assert_eq!(created["acknowledged"], true);
    let id = created["insertedId"].as_str().unwrap().to_owned();

    let jar = login(&app, json!({"email": "a@x.com"})).await;
    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(
        json_body(resp).await,
        json!([{
            "_id": id,
            "email": "a@x.com",
            "customerName": "Alice",
            "date": "2024-05-01",
            "price": 150,
        }]),
    );

    let patch = |status: &str| {
        request(
            Method::PATCH,
            &format!("/bookings/{id}"),
            None,
            Some(json!({"status": status})),
        )
    };
    let resp = send(&app, patch("confirm")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({"acknowledged": true, "matchedCount": 1, "modifiedCount": 1}),
    );
    let resp = send(&app, patch("confirm")).await;
    assert_eq!(
        json_body(resp).await,
        json!({"acknowledged": true, "matchedCount": 1, "modifiedCount": 0}),
    );

    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(json_body(resp).await[0]["status"], "confirm");

    let delete =
        || request(Method::DELETE, &format!("/bookings/{id}"), None, None);
    let resp = send(&app, delete()).await;
    assert_eq!(
        json_body(resp).await,
        json!({"acknowledged": true, "deletedCount": 1}),
    );
    let resp = send(&app, delete()).await;
    assert_eq!(
        json_body(resp).await,
        json!({"acknowledged": true, "deletedCount": 0}),
    );

    let resp = send(
        &app,
        request(Method::GET, "/bookings?email=a@x.com", jar.header(), None),
    )
    .await;
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn rejects_malformed_booking_requests() {
    let app = app(Memory::new());

    let resp = send(
        &app,
        request(
            Method::PATCH,
            "/bookings/not-an-id",
            None,
            Some(json!({"status": "confirm"})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
        &app,
        request(
            Method::PATCH,
            "/bookings/00000000-0000-0000-0000-000000000000",
            None,
            Some(json!({"status": ""})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["code"], "INVALID_REQUEST");
}
