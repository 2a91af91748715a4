//! REST API client for the MEXC spot API

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::auth::{order_params, query_params, SignedRequest};
use super::messages::*;
use crate::common::errors::{ExchangeError, Result};
use crate::common::traits::ExchangeClient;
use crate::common::types::{MarketSnapshot, OrderRequest, OrderStatus, PlacedOrder};
use crate::config::types::{ApiCredentials, MexcConfig};

pub const BOOK_TICKER_PATH: &str = "/api/v3/ticker/bookTicker";
pub const ORDER_PATH: &str = "/api/v3/order";

/// REST API client for MEXC spot trading
#[derive(Debug, Clone)]
pub struct MexcRestClient {
    /// HTTP client for market data (short timeout)
    market_client: Client,
    /// HTTP client for order placement and queries
    order_client: Client,
    /// Base URL for the REST API
    base_url: String,
    /// Header name carrying the API key
    api_key_header: String,
    /// recvWindow sent with signed requests
    recv_window: u64,
    /// Optional API credentials for authenticated endpoints
    credentials: Option<ApiCredentials>,
}

impl MexcRestClient {
    /// Create a new REST client (unauthenticated) with default timeouts
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeouts(base_url, Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a new REST client with custom timeouts
    pub fn with_timeouts(
        base_url: &str,
        market_timeout: Duration,
        order_timeout: Duration,
    ) -> Result<Self> {
        let market_client = Client::builder().timeout(market_timeout).build()?;
        let order_client = Client::builder().timeout(order_timeout).build()?;

        Ok(Self {
            market_client,
            order_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key_header: "X-MEXC-APIKEY".to_string(),
            recv_window: 5000,
            credentials: None,
        })
    }

    /// Create a client from configuration, attaching credentials when present
    pub fn from_config(config: &MexcConfig) -> Result<Self> {
        let client = Self::with_timeouts(
            &config.rest_url,
            config.market_data_timeout(),
            config.order_timeout(),
        )?
        .with_api_key_header(&config.api_key_header)
        .with_recv_window(config.recv_window_ms);

        Ok(match config.credentials() {
            Some(creds) => client.with_credentials(creds),
            None => client,
        })
    }

    /// Set API credentials for authenticated requests
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the API key header name
    pub fn with_api_key_header(mut self, header: &str) -> Self {
        self.api_key_header = header.to_string();
        self
    }

    /// Override the recvWindow sent with signed requests
    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&ApiCredentials> {
        self.credentials
            .as_ref()
            .ok_or(ExchangeError::MissingCredentials)
    }

    /// Sign a parameter set and build the full request URL
    fn signed_url(&self, params: &[(&'static str, String)]) -> Result<String> {
        let creds = self.credentials()?;
        let signed = SignedRequest::new(params, &creds.api_secret)?;
        Ok(format!("{}{}?{}", self.base_url, ORDER_PATH, signed.query_string()))
    }

    /// Turn non-200 responses into errors carrying the raw body
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = body_or_read_error(response.text().await);
        Err(ExchangeError::Status {
            status: status.as_u16(),
            body,
        })
    }

    // ========================================================================
    // Public Endpoints (No Authentication Required)
    // ========================================================================

    /// Get best bid/ask for a symbol
    #[instrument(skip(self))]
    pub async fn get_book_ticker(&self, symbol: &str) -> Result<MarketSnapshot> {
        let url = format!("{}{}", self.base_url, BOOK_TICKER_PATH);
        debug!("Fetching book ticker from: {}", url);

        let response = self
            .market_client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let ticker: BookTickerResponse = response.json().await?;
        Ok(MarketSnapshot {
            symbol: ticker.symbol.unwrap_or_else(|| symbol.to_string()),
            bid: parse_decimal("bidPrice", &ticker.bid_price)?,
            ask: parse_decimal("askPrice", &ticker.ask_price)?,
            bid_qty: parse_decimal("bidQty", &ticker.bid_qty)?,
            ask_qty: parse_decimal("askQty", &ticker.ask_qty)?,
            fetched_at: chrono::Utc::now(),
        })
    }

    // ========================================================================
    // Signed Endpoints
    // ========================================================================

    /// Submit a limit order
    ///
    /// Parameters travel in the query string with an empty body, exactly as signed.
    #[instrument(skip(self, order), fields(symbol = %order.symbol, side = %order.side))]
    pub async fn new_order(&self, order: &OrderRequest) -> Result<PlacedOrder> {
        let params = order_params(order)?;
        let url = self.signed_url(&params)?;
        let creds = self.credentials()?;

        info!(
            "Submitting limit order: {} {} {} @ {}",
            order.side, order.quantity, order.symbol, order.price
        );

        let response = self
            .order_client
            .post(&url)
            .header(self.api_key_header.as_str(), &creds.api_key)
            .send()
            .await?;
        let response = match Self::check_status(response).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Order rejected by exchange: {}", e);
                return Err(e);
            }
        };

        let body = response.text().await?;
        let placed: NewOrderResponse = serde_json::from_str(&body)?;
        info!("Limit order accepted: {}", body);

        Ok(PlacedOrder {
            order_id: placed.order_id.to_string(),
            symbol: placed.symbol.unwrap_or_else(|| order.symbol.clone()),
        })
    }

    /// Query the status of an order
    #[instrument(skip(self))]
    pub async fn get_order(&self, symbol: &str, order_id: &str) -> Result<OrderStatus> {
        let params = query_params(
            symbol,
            order_id,
            chrono::Utc::now().timestamp_millis(),
            self.recv_window,
        );
        let url = self.signed_url(&params)?;
        let creds = self.credentials()?;

        let response = self
            .order_client
            .get(&url)
            .header(self.api_key_header.as_str(), &creds.api_key)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let order: QueryOrderResponse = response.json().await?;
        debug!("Order {} status: {}", order_id, order.status);
        Ok(order.status)
    }
}

/// Error body text, or why it could not be read
fn body_or_read_error<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<failed to read response body: {}>", e))
}

#[async_trait]
impl ExchangeClient for MexcRestClient {
    async fn book_ticker(&self, symbol: &str) -> Result<MarketSnapshot> {
        self.get_book_ticker(symbol).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder> {
        self.new_order(order).await
    }

    async fn query_order(&self, symbol: &str, order_id: &str) -> Result<OrderStatus> {
        self.get_order(symbol, order_id).await
    }

    fn name(&self) -> &'static str {
        "mexc"
    }
}
