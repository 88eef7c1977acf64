//! Typed API client
//!
//! Thin reqwest wrapper over the server endpoints the store and poller
//! need. The bearer token is attached when present.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use shared::inventory::Deduction;
use shared::order::{ItemStatus, Order, OrderStatus, PaymentStatus};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Deduction response body
#[derive(Debug, Deserialize)]
pub struct DeductResponse {
    pub success: bool,
    pub deductions: Vec<Deduction>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Bulk order fetch (initial load and polling fallback)
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.execute(self.request(reqwest::Method::GET, "/api/orders"))
            .await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        self.execute(
            self.request(reqwest::Method::PATCH, &format!("/api/orders/{}/status", id))
                .json(&serde_json::json!({ "status": status })),
        )
        .await
    }

    pub async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> ClientResult<Order> {
        self.execute(
            self.request(reqwest::Method::PATCH, &format!("/api/orders/{}/payment", id))
                .json(&serde_json::json!({ "payment_status": payment_status })),
        )
        .await
    }

    pub async fn cancel_order(&self, id: &str, reason: Option<String>) -> ClientResult<Order> {
        self.execute(
            self.request(reqwest::Method::POST, &format!("/api/orders/{}/cancel", id))
                .json(&serde_json::json!({ "reason": reason })),
        )
        .await
    }

    /// Kitchen item-status update (may auto-advance the order)
    pub async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        item_status: ItemStatus,
    ) -> ClientResult<Order> {
        self.execute(
            self.request(
                reqwest::Method::PATCH,
                &format!("/api/orders/{}/items/{}/status", order_id, item_id),
            )
            .json(&serde_json::json!({ "item_status": item_status })),
        )
        .await
    }

    /// Complete one unit of a line item
    pub async fn complete_item_unit(&self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        self.execute(self.request(
            reqwest::Method::POST,
            &format!("/api/orders/{}/items/{}/complete-one", order_id, item_id),
        ))
        .await
    }

    /// Deduct inventory for a fulfilled order
    pub async fn deduct_inventory(&self, order_id: &str) -> ClientResult<DeductResponse> {
        self.execute(
            self.request(reqwest::Method::POST, "/api/inventory/deduct")
                .json(&serde_json::json!({ "orderId": order_id })),
        )
        .await
    }
}
