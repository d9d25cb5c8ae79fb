use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(sweep_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = dropfront_api::app::build_app(sweep_secret.to_string());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Pull the `session_id` cookie out of a response's `Set-Cookie` headers.
fn session_cookie(res: &reqwest::Response) -> Option<String> {
    for value in res.headers().get_all(reqwest::header::SET_COOKIE) {
        let raw = value.to_str().ok()?;
        if let Some(rest) = raw.strip_prefix("session_id=") {
            let value = rest.split(';').next().unwrap_or(rest);
            return Some(format!("session_id={value}"));
        }
    }
    None
}

/// Seed a product with one variant; returns (product_id, variant_id).
async fn seed_product(
    client: &reqwest::Client,
    base_url: &str,
    secret: &str,
    price_cents: i64,
    stock: u32,
) -> (String, String) {
    let res = client
        .post(format!("{}/admin/products", base_url))
        .bearer_auth(secret)
        .json(&json!({
            "name": "Drop Tee",
            "base_price_cents": price_cents,
            "variants": [
                { "sku": "TEE-M", "size": "M", "color": "black", "stock": stock }
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    (
        body["id"].as_str().unwrap().to_string(),
        body["variants"][0]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_is_open() {
    let srv = TestServer::spawn("test-secret").await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_and_cron_require_the_sweep_secret() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/cron/cleanup-reservations", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/cron/cleanup-reservations", srv.base_url))
        .bearer_auth("wrong-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/cron/cleanup-reservations", srv.base_url))
        .bearer_auth("test-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["removed"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn cart_checkout_flow_with_discount() {
    let secret = "test-secret";
    let srv = TestServer::spawn(secret).await;
    let client = reqwest::Client::new();

    let (_, variant_id) = seed_product(&client, &srv.base_url, secret, 50_00, 10).await;

    let res = client
        .post(format!("{}/admin/discounts", srv.base_url))
        .bearer_auth(secret)
        .json(&json!({ "code": "welcome10", "type": "percentage", "value": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"].as_str().unwrap(), "WELCOME10");

    // First cart touch mints the session cookie.
    let res = client
        .post(format!("{}/cart/items", srv.base_url))
        .json(&json!({ "variant_id": variant_id, "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("session cookie not set");
    let cart: serde_json::Value = res.json().await.unwrap();
    assert_eq!(cart["items"][0]["quantity"].as_u64().unwrap(), 2);
    assert_eq!(cart["items"][0]["price_cents"].as_i64().unwrap(), 50_00);

    // Holds count against availability for everyone.
    let res = client
        .get(format!("{}/variants/{}", srv.base_url, variant_id))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["available"].as_u64().unwrap(), 8);

    let res = client
        .post(format!("{}/cart/discount", srv.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({ "code": "WELCOME10" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cart: serde_json::Value = res.json().await.unwrap();
    let totals = &cart["totals"];
    assert_eq!(totals["subtotal_cents"].as_i64().unwrap(), 100_00);
    assert_eq!(totals["discount_cents"].as_i64().unwrap(), 10_00);
    assert_eq!(totals["shipping_cents"].as_i64().unwrap(), 10_00);
    assert_eq!(totals["tax_cents"].as_i64().unwrap(), 7_20);
    assert_eq!(totals["total_cents"].as_i64().unwrap(), 107_20);

    let res = client
        .post(format!("{}/checkout", srv.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .json(&json!({
            "email": "ada@example.com",
            "payment_reference": "pi_test_123",
            "shipping_address": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "address": "1 Analytical Way",
                "city": "London",
                "state": "LDN",
                "zip_code": "NW1",
                "country": "UK",
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(order["status"].as_str().unwrap(), "paid");
    assert_eq!(order["totals"]["total_cents"].as_i64().unwrap(), 107_20);

    // Stock deducted for real, holds gone, cart emptied.
    let res = client
        .get(format!("{}/variants/{}", srv.base_url, variant_id))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["available"].as_u64().unwrap(), 8);

    let res = client
        .get(format!("{}/cart", srv.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = res.json().await.unwrap();
    assert!(cart["items"].as_array().unwrap().is_empty());

    // Confirmation-page lookup by order number.
    let number = order["order_number"].as_str().unwrap();
    let res = client
        .get(format!("{}/orders/number/{}", srv.base_url, number))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], order["id"]);
}

#[tokio::test]
async fn oversell_is_rejected_with_conflict() {
    let secret = "test-secret";
    let srv = TestServer::spawn(secret).await;
    let client = reqwest::Client::new();

    let (_, variant_id) = seed_product(&client, &srv.base_url, secret, 50_00, 3).await;

    let res = client
        .post(format!("{}/cart/items", srv.base_url))
        .json(&json!({ "variant_id": variant_id, "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "insufficient_inventory");
}

#[tokio::test]
async fn empty_cart_checkout_is_unprocessable() {
    let secret = "test-secret";
    let srv = TestServer::spawn(secret).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/checkout", srv.base_url))
        .json(&json!({
            "email": "ada@example.com",
            "payment_reference": "pi_test_123",
            "shipping_address": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "address": "1 Analytical Way",
                "city": "London",
                "state": "LDN",
                "zip_code": "NW1",
                "country": "UK",
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "cart_empty");
}

#[tokio::test]
async fn drop_lifecycle_over_http() {
    let secret = "test-secret";
    let srv = TestServer::spawn(secret).await;
    let client = reqwest::Client::new();

    let (product_id, _) = seed_product(&client, &srv.base_url, secret, 80_00, 5).await;

    let launch = chrono::Utc::now() + chrono::Duration::hours(2);
    let res = client
        .post(format!("{}/admin/drops", srv.base_url))
        .bearer_auth(secret)
        .json(&json!({
            "product_id": product_id,
            "launch_date": launch.to_rfc3339(),
            "early_access_rule": { "type": "previous_customer" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["status"].as_str().unwrap(), "scheduled");
    let drop_id = created["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/drops/upcoming", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["drops"].as_array().unwrap().len(), 1);
    assert!(!body["drops"][0]["countdown"]["is_live"].as_bool().unwrap());

    // Launch is in the future and there is no early-access window: denied.
    let res = client
        .get(format!("{}/drops/{}/access", srv.base_url, drop_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(!body["access"].as_bool().unwrap());

    // The sweep finds nothing to do this far out.
    let res = client
        .post(format!("{}/cron/activate-drops", srv.base_url))
        .bearer_auth(secret)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["activated"].as_u64().unwrap(), 0);
    assert_eq!(body["early_access"].as_u64().unwrap(), 0);
    assert_eq!(body["sold_out"].as_u64().unwrap(), 0);
}
