//! In-process stand-in for the marketplace backend.
//!
//! Speaks just enough of the real API for integration tests: JWT-ish bearer
//! tokens, per-user carts, the full order action table, shipper claiming,
//! and notifications. Every request is counted so tests can assert that a
//! call never left the client.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use food_delivery_client::{AppConfig, Client, Store};

pub const PASSWORD: &str = "123456";

#[derive(Clone)]
struct MockUser {
    id: i64,
    role: &'static str,
}

#[derive(Clone)]
struct MockFood {
    id: i64,
    name: &'static str,
    price: i64,
    available: bool,
}

#[derive(Clone)]
struct CartLine {
    id: i64,
    food_id: i64,
    quantity: i64,
    notes: Option<String>,
}

#[derive(Clone)]
struct OrderLine {
    food_id: i64,
    quantity: i64,
    notes: Option<String>,
}

#[derive(Clone)]
struct MockOrder {
    id: i64,
    customer: String,
    shipper: Option<String>,
    status: String,
    items: Vec<OrderLine>,
    delivery_address: String,
    delivery_phone: String,
    payment_method: String,
    notes: Option<String>,
    client_token: Option<String>,
    tracking: Vec<(String, String)>,
}

#[derive(Clone)]
struct MockNotification {
    id: i64,
    title: String,
    message: String,
    is_read: bool,
}

#[derive(Default)]
struct Inner {
    access: HashMap<String, String>,
    refresh: HashMap<String, String>,
    carts: HashMap<String, Vec<CartLine>>,
    orders: Vec<MockOrder>,
    notifications: HashMap<String, Vec<MockNotification>>,
    hits: HashMap<String, usize>,
    token_seq: u64,
    next_cart_id: i64,
    next_order_id: i64,
    next_notification_id: i64,
}

struct MockState {
    users: HashMap<&'static str, MockUser>,
    foods: Vec<MockFood>,
    inner: Mutex<Inner>,
}

type Shared = Arc<MockState>;

pub struct TestBackend {
    pub base_url: String,
    state: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState {
            users: HashMap::from([
                ("customer1", MockUser { id: 1, role: "customer" }),
                ("seller1", MockUser { id: 2, role: "seller" }),
                ("shipper1", MockUser { id: 3, role: "shipper" }),
                ("shipper2", MockUser { id: 4, role: "shipper" }),
            ]),
            foods: vec![
                MockFood { id: 1, name: "Pho Bo", price: 45000, available: true },
                MockFood { id: 2, name: "Banh Mi", price: 25000, available: true },
                MockFood { id: 3, name: "Bun Cha", price: 40000, available: false },
            ],
            inner: Mutex::new(Inner {
                next_cart_id: 100,
                next_order_id: 500,
                next_notification_id: 900,
                ..Inner::default()
            }),
        });

        let app = Router::new()
            .route("/api/auth/login/", post(login))
            .route("/api/auth/token/refresh/", post(refresh))
            .route("/api/auth/profile/", get(profile).put(update_profile))
            .route("/api/restaurants/foods/{food_id}/", get(food_detail))
            .route("/api/orders/cart/", get(cart_view))
            .route("/api/orders/cart/add/", post(cart_add))
            .route("/api/orders/cart/update/{item_id}/", put(cart_update))
            .route("/api/orders/cart/remove/{item_id}/", delete(cart_remove))
            .route("/api/orders/cart/clear/", delete(cart_clear))
            .route("/api/orders/orders/create/", post(order_create))
            .route("/api/orders/orders/my/", get(my_orders))
            .route("/api/orders/orders/{order_id}/", get(order_detail))
            .route("/api/orders/{order_id}/update-status/", post(update_status))
            .route("/api/orders/shipper/orders/available/", get(available_orders))
            .route("/api/orders/shipper/orders/{order_id}/accept/", post(accept_order))
            .route("/api/orders/shipper/orders/my/", get(shipper_orders))
            .route("/api/payments/available-methods/", get(payment_methods))
            .route("/api/notifications/", get(notifications))
            .route("/api/notifications/unread-count/", get(unread_count))
            .route("/api/notifications/{notification_id}/read/", post(mark_read))
            .route("/api/notifications/mark-all-read/", post(mark_all_read))
            .layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                record_hit,
            ))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr: SocketAddr = listener.local_addr().expect("mock backend addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            server,
        }
    }

    /// A fresh client with its own in-memory store, pointed at this backend.
    pub fn client(&self) -> Client {
        let config = AppConfig::new(&self.base_url)
            .with_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(40));
        Client::with_store(config, Store::memory()).expect("build client")
    }

    /// How many requests hit `key`, e.g. `"POST /api/orders/orders/create/"`.
    pub fn hits(&self, key: &str) -> usize {
        let inner = self.state.inner.lock().unwrap();
        inner.hits.get(key).copied().unwrap_or(0)
    }

    /// Invalidate every access token while keeping refresh tokens valid, as
    /// if they had all expired.
    pub fn expire_access_tokens(&self) {
        self.state.inner.lock().unwrap().access.clear();
    }

    /// Invalidate access and refresh tokens both; the next authenticated
    /// request cannot be repaired.
    pub fn revoke_all_tokens(&self) {
        let mut inner = self.state.inner.lock().unwrap();
        inner.access.clear();
        inner.refresh.clear();
    }

    pub fn order_status(&self, order_id: &str) -> Option<String> {
        let id: i64 = order_id.parse().ok()?;
        let inner = self.state.inner.lock().unwrap();
        inner
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.status.clone())
    }

    /// Drive an order straight to `status` server-side, bypassing the API.
    pub fn force_order_status(&self, order_id: &str, status: &str) {
        if let Ok(id) = order_id.parse::<i64>() {
            let mut inner = self.state.inner.lock().unwrap();
            if let Some(order) = inner.orders.iter_mut().find(|o| o.id == id) {
                order.status = status.to_string();
            }
        }
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record_hit(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let key = format!("{} {}", request.method(), request.uri().path());
    *state.inner.lock().unwrap().hits.entry(key).or_insert(0) += 1;
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authed(state: &MockState, headers: &HeaderMap) -> Result<(String, &'static str), Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let Some(token) = token else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Authentication credentials were not provided." })),
        )
            .into_response());
    };
    let inner = state.inner.lock().unwrap();
    match inner.access.get(token) {
        Some(username) => {
            let role = state
                .users
                .get(username.as_str())
                .map(|u| u.role)
                .unwrap_or("customer");
            Ok((username.clone(), role))
        }
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token is invalid or expired" })),
        )
            .into_response()),
    }
}

fn str_field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn money(amount: i64) -> String {
    format!("{amount}.00")
}

fn food_of(state: &MockState, food_id: i64) -> Option<MockFood> {
    state.foods.iter().find(|f| f.id == food_id).cloned()
}

fn cart_json(state: &MockState, lines: &[CartLine]) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .map(|line| {
            let food = food_of(state, line.food_id);
            let (name, price) = food
                .map(|f| (f.name.to_string(), f.price))
                .unwrap_or_default();
            json!({
                "id": line.id,
                "food": { "id": line.food_id, "name": name, "price": money(price) },
                "quantity": line.quantity,
                "notes": line.notes,
            })
        })
        .collect();
    // Totals on purpose say nothing useful; clients are expected to derive
    // their own from the items.
    json!({ "items": items, "total_items": 0, "total_amount": "0.00" })
}

fn order_json(state: &MockState, order: &MockOrder) -> Value {
    let mut subtotal = 0i64;
    let items: Vec<Value> = order
        .items
        .iter()
        .map(|line| {
            let food = food_of(state, line.food_id);
            let (name, price) = food
                .map(|f| (f.name.to_string(), f.price))
                .unwrap_or_default();
            subtotal += price * line.quantity;
            json!({
                "food": line.food_id,
                "food_name": name,
                "price": money(price),
                "quantity": line.quantity,
                "notes": line.notes,
            })
        })
        .collect();
    let delivery_fee = 15000i64;
    let tracking: Vec<Value> = order
        .tracking
        .iter()
        .map(|(status, message)| json!({ "status": status, "message": message }))
        .collect();
    json!({
        "id": order.id,
        "order_number": format!("FD{:04}", order.id),
        "client_token": order.client_token,
        "status": order.status,
        "payment_method": order.payment_method,
        "payment_status": "pending",
        "restaurant": 1,
        "restaurant_name": "Pho 24",
        "items": items,
        "subtotal": money(subtotal),
        "shipping_fee": money(delivery_fee),
        "total": money(subtotal + delivery_fee),
        "delivery_address": order.delivery_address,
        "delivery_phone": order.delivery_phone,
        "pickup_address": "88 Le Loi",
        "pickup_phone": "0900000099",
        "notes": order.notes,
        "shipper": order.shipper,
        "tracking": tracking,
        "created_at": Utc::now().to_rfc3339(),
    })
}

fn notify(inner: &mut Inner, username: &str, title: &str, message: String) {
    inner.next_notification_id += 1;
    let note = MockNotification {
        id: inner.next_notification_id,
        title: title.to_string(),
        message,
        is_read: false,
    };
    inner.notifications.entry(username.to_string()).or_default().push(note);
}

// (role, allowed source statuses, target status) per action.
fn action_rule(action: &str) -> Option<(&'static str, &'static [&'static str], &'static str)> {
    match action {
        "confirm" => Some(("seller", &["pending"], "confirmed")),
        "start_preparing" => Some(("seller", &["confirmed"], "preparing")),
        "mark_ready" => Some(("seller", &["preparing"], "ready")),
        "accept" => Some(("shipper", &["ready"], "assigned")),
        "pick_up" => Some(("shipper", &["assigned"], "picked_up")),
        "start_delivering" => Some(("shipper", &["picked_up"], "delivering")),
        "deliver" => Some(("shipper", &["delivering"], "delivered")),
        "complete" => Some(("customer", &["delivered"], "completed")),
        "cancel_by_user" => Some(("customer", &["pending"], "cancelled_by_user")),
        "cancel_by_seller" => {
            Some(("seller", &["pending", "confirmed", "preparing"], "cancelled_by_seller"))
        }
        "cancel_by_shipper" => {
            Some(("shipper", &["assigned", "picked_up"], "cancelled_by_shipper"))
        }
        "fail_delivery" => Some(("shipper", &["delivering"], "failed_delivery")),
        _ => None,
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = str_field(&body, "username");
    let password = str_field(&body, "password");
    if !state.users.contains_key(username.as_str()) || password != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let mut inner = state.inner.lock().unwrap();
    inner.token_seq += 1;
    let seq = inner.token_seq;
    let access = format!("access-{username}-{seq}");
    let refresh = format!("refresh-{username}-{seq}");
    inner.access.insert(access.clone(), username.clone());
    inner.refresh.insert(refresh.clone(), username);
    Json(json!({ "access": access, "refresh": refresh })).into_response()
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let token = str_field(&body, "refresh");
    let mut inner = state.inner.lock().unwrap();
    let Some(username) = inner.refresh.get(&token).cloned() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Refresh token is invalid" })),
        )
            .into_response();
    };
    inner.token_seq += 1;
    let access = format!("access-{username}-{}", inner.token_seq);
    inner.access.insert(access.clone(), username);
    Json(json!({ "access": access })).into_response()
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, role) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let id = state.users.get(username.as_str()).map(|u| u.id).unwrap_or(0);
    Json(json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": role,
        "phone_number": "0900000001",
        "address": "12 Nguyen Trai",
    }))
    .into_response()
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let (username, role) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let id = state.users.get(username.as_str()).map(|u| u.id).unwrap_or(0);
    Json(json!({
        "id": id,
        "username": username,
        "email": body.get("email").cloned().unwrap_or(Value::Null),
        "role": role,
        "phone_number": body.get("phone").cloned().unwrap_or(Value::Null),
        "address": body.get("address").cloned().unwrap_or(Value::Null),
    }))
    .into_response()
}

async fn food_detail(State(state): State<Shared>, Path(food_id): Path<i64>) -> Response {
    match food_of(&state, food_id) {
        Some(food) => Json(json!({
            "id": food.id,
            "name": food.name,
            "price": money(food.price),
            "image": null,
            "restaurant": 1,
            "is_available": food.available,
        }))
        .into_response(),
        None => error(StatusCode::NOT_FOUND, "Food not found"),
    }
}

async fn cart_view(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    let lines = inner.carts.get(&username).cloned().unwrap_or_default();
    Json(cart_json(&state, &lines)).into_response()
}

async fn cart_add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let food_id = body.get("food_id").and_then(Value::as_i64).unwrap_or(0);
    let quantity = body.get("quantity").and_then(Value::as_i64).unwrap_or(0);
    let notes = body.get("notes").and_then(Value::as_str).map(String::from);
    let Some(food) = food_of(&state, food_id) else {
        return error(StatusCode::NOT_FOUND, "Food not found");
    };
    if !food.available {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("{} is not available", food.name),
        );
    }
    if quantity < 1 {
        return error(StatusCode::BAD_REQUEST, "Quantity must be at least 1");
    }
    let mut inner = state.inner.lock().unwrap();
    inner.next_cart_id += 1;
    let next_id = inner.next_cart_id;
    let lines = inner.carts.entry(username).or_default();
    match lines.iter_mut().find(|l| l.food_id == food_id) {
        Some(line) => line.quantity += quantity,
        None => lines.push(CartLine {
            id: next_id,
            food_id,
            quantity,
            notes,
        }),
    }
    Json(json!({ "message": "Added to cart" })).into_response()
}

async fn cart_update(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let quantity = body.get("quantity").and_then(Value::as_i64).unwrap_or(0);
    if quantity < 1 {
        return error(StatusCode::BAD_REQUEST, "Quantity must be at least 1");
    }
    let mut inner = state.inner.lock().unwrap();
    let lines = inner.carts.entry(username).or_default();
    match lines.iter_mut().find(|l| l.id == item_id) {
        Some(line) => {
            line.quantity = quantity;
            if let Some(notes) = body.get("notes").and_then(Value::as_str) {
                line.notes = Some(notes.to_string());
            }
            Json(json!({ "message": "Cart updated" })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Cart item not found"),
    }
}

async fn cart_remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let mut inner = state.inner.lock().unwrap();
    let lines = inner.carts.entry(username).or_default();
    let before = lines.len();
    lines.retain(|l| l.id != item_id);
    if lines.len() == before {
        return error(StatusCode::NOT_FOUND, "Cart item not found");
    }
    Json(json!({ "message": "Removed from cart" })).into_response()
}

async fn cart_clear(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    state.inner.lock().unwrap().carts.remove(&username);
    Json(json!({ "message": "Cart cleared" })).into_response()
}

async fn order_create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let Some(raw_items) = body.get("items").and_then(Value::as_array) else {
        return error(StatusCode::BAD_REQUEST, "Order items are required");
    };
    if raw_items.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Order items are required");
    }
    let mut items = Vec::new();
    for raw in raw_items {
        let food_id = raw.get("food_id").and_then(Value::as_i64).unwrap_or(0);
        let quantity = raw.get("quantity").and_then(Value::as_i64).unwrap_or(0);
        let Some(food) = food_of(&state, food_id) else {
            return error(StatusCode::BAD_REQUEST, "Unknown food in order");
        };
        if !food.available {
            return error(
                StatusCode::BAD_REQUEST,
                &format!("{} is not available", food.name),
            );
        }
        items.push(OrderLine {
            food_id,
            quantity,
            notes: raw.get("notes").and_then(Value::as_str).map(String::from),
        });
    }

    let mut inner = state.inner.lock().unwrap();
    inner.next_order_id += 1;
    let order = MockOrder {
        id: inner.next_order_id,
        customer: username.clone(),
        shipper: None,
        status: "pending".to_string(),
        items,
        delivery_address: str_field(&body, "delivery_address"),
        delivery_phone: str_field(&body, "delivery_phone"),
        payment_method: str_field(&body, "payment_method"),
        notes: body.get("notes").and_then(Value::as_str).map(String::from),
        client_token: body
            .get("client_token")
            .and_then(Value::as_str)
            .map(String::from),
        tracking: vec![("pending".to_string(), "Order placed".to_string())],
    };
    let payload = order_json(&state, &order);
    let order_id = order.id;
    inner.orders.push(order);
    inner.carts.remove(&username);
    notify(
        &mut inner,
        "seller1",
        "New order",
        format!("Order #{order_id} is waiting for confirmation"),
    );
    Json(json!({ "message": "Order created successfully", "order": payload })).into_response()
}

async fn my_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    let orders: Vec<Value> = inner
        .orders
        .iter()
        .rev()
        .filter(|o| o.customer == username)
        .map(|o| order_json(&state, o))
        .collect();
    Json(Value::Array(orders)).into_response()
}

async fn order_detail(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
) -> Response {
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    let inner = state.inner.lock().unwrap();
    match inner.orders.iter().find(|o| o.id == order_id) {
        Some(order) => Json(order_json(&state, order)).into_response(),
        None => error(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn update_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let (username, role) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let action = str_field(&body, "action");
    let Some((required_role, from, to)) = action_rule(&action) else {
        return error(StatusCode::BAD_REQUEST, &format!("Unknown action {action}"));
    };
    if role != required_role {
        return error(
            StatusCode::FORBIDDEN,
            &format!("A {role} cannot perform {action}"),
        );
    }

    let mut inner = state.inner.lock().unwrap();
    let Some(index) = inner.orders.iter().position(|o| o.id == order_id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    let current = inner.orders[index].status.clone();
    if !from.contains(&current.as_str()) {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("Cannot {action} an order that is {current}"),
        );
    }
    if required_role == "customer" && inner.orders[index].customer != username {
        return error(StatusCode::FORBIDDEN, "Not your order");
    }
    if required_role == "shipper"
        && action != "accept"
        && inner.orders[index].shipper.as_deref() != Some(username.as_str())
    {
        return error(StatusCode::FORBIDDEN, "Order is assigned to another shipper");
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Status updated")
        .to_string();
    inner.orders[index].status = to.to_string();
    inner.orders[index]
        .tracking
        .push((to.to_string(), message.clone()));
    let customer = inner.orders[index].customer.clone();
    let payload = order_json(&state, &inner.orders[index]);
    notify(
        &mut inner,
        &customer,
        "Order update",
        format!("Order #{order_id} is now {to}"),
    );
    Json(json!({
        "success": true,
        "message": message,
        "order": payload,
        "transition": { "from": current, "to": to, "action": action },
    }))
    .into_response()
}

async fn available_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (_, role) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    if role != "shipper" {
        return error(StatusCode::FORBIDDEN, "Shipper account required");
    }
    let wanted = params
        .get("status")
        .cloned()
        .unwrap_or_else(|| "ready".to_string());
    let inner = state.inner.lock().unwrap();
    let orders: Vec<Value> = inner
        .orders
        .iter()
        .filter(|o| o.status == wanted && o.shipper.is_none())
        .map(|o| order_json(&state, o))
        .collect();
    Json(Value::Array(orders)).into_response()
}

async fn accept_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
) -> Response {
    let (username, role) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    if role != "shipper" {
        return error(StatusCode::FORBIDDEN, "Shipper account required");
    }
    let mut inner = state.inner.lock().unwrap();
    let Some(index) = inner.orders.iter().position(|o| o.id == order_id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    if inner.orders[index].status != "ready" || inner.orders[index].shipper.is_some() {
        return error(StatusCode::CONFLICT, "Order is no longer available");
    }
    inner.orders[index].shipper = Some(username);
    inner.orders[index].status = "assigned".to_string();
    inner.orders[index]
        .tracking
        .push(("assigned".to_string(), "Shipper accepted the order".to_string()));
    let payload = order_json(&state, &inner.orders[index]);
    Json(json!({ "success": true, "order": payload })).into_response()
}

async fn shipper_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, role) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    if role != "shipper" {
        return error(StatusCode::FORBIDDEN, "Shipper account required");
    }
    let inner = state.inner.lock().unwrap();
    let orders: Vec<Value> = inner
        .orders
        .iter()
        .rev()
        .filter(|o| o.shipper.as_deref() == Some(username.as_str()))
        .map(|o| order_json(&state, o))
        .collect();
    Json(Value::Array(orders)).into_response()
}

async fn payment_methods() -> Response {
    Json(json!({
        "success": true,
        "methods": [
            { "id": "cash", "name": "Cash on delivery" },
            { "id": "vnpay", "name": "VNPay" },
        ],
    }))
    .into_response()
}

async fn notifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    let notes: Vec<Value> = inner
        .notifications
        .get(&username)
        .map(|notes| {
            notes
                .iter()
                .rev()
                .map(|n| {
                    json!({
                        "id": n.id,
                        "title": n.title,
                        "message": n.message,
                        "is_read": n.is_read,
                        "created_at": Utc::now().to_rfc3339(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Json(Value::Array(notes)).into_response()
}

async fn unread_count(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let inner = state.inner.lock().unwrap();
    let count = inner
        .notifications
        .get(&username)
        .map(|notes| notes.iter().filter(|n| !n.is_read).count())
        .unwrap_or(0);
    Json(json!({ "unread_count": count })).into_response()
}

async fn mark_read(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(notification_id): Path<i64>,
) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let mut inner = state.inner.lock().unwrap();
    let found = inner
        .notifications
        .get_mut(&username)
        .and_then(|notes| notes.iter_mut().find(|n| n.id == notification_id));
    match found {
        Some(note) => {
            note.is_read = true;
            Json(json!({ "success": true })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Notification not found"),
    }
}

async fn mark_all_read(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (username, _) = match authed(&state, &headers) {
        Ok(who) => who,
        Err(resp) => return resp,
    };
    let mut inner = state.inner.lock().unwrap();
    if let Some(notes) = inner.notifications.get_mut(&username) {
        for note in notes.iter_mut() {
            note.is_read = true;
        }
    }
    Json(json!({ "success": true })).into_response()
}
