//! HTTP implementation of the ordering [`Gateway`].

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName,
    HeaderValue, ORIGIN, USER_AGENT,
};
use roocart_core::{
    AddItemOutcome, ChallengeOutcome, ClearBasketOutcome, EgressReport, Gateway, GatewayError,
    Item, PaymentExecution, PaymentPlan, PaymentPlanOutcome,
};
use tracing::{debug, instrument, warn};

use crate::client::HttpClient;
use crate::error::FetchError;
use crate::graphql::{self, GraphqlRequest};
use crate::response::{self, EgressBody};

// ============================================================================
// Constants
// ============================================================================

/// Consumer API host for the UAE market.
pub const DEFAULT_STORE_URL: &str = "https://co-m.ae.deliveroo.com";

/// Echo service reporting the caller's public address.
pub const DEFAULT_EGRESS_URL: &str = "http://httpbin.org/ip";

/// Basket GraphQL endpoint.
const BASKET_PATH: &str = "/consumer/basket/graphql";

/// Checkout GraphQL endpoint.
const CHECKOUT_PATH: &str = "/checkout-api/graphql-query";

/// Status the web challenge uses to ask for a browser hand-off.
const MISDIRECTED_REQUEST: u16 = 421;

const APP_USER_AGENT: &str =
    "Deliveroo-OrderApp/3.256.0 (Android; Android 12; Pixel 5; Release; en_US; 85123)";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 18_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";

/// Static headers the Android app sends with every GraphQL call.
const APP_HEADERS: &[(&str, &str)] = &[
    ("x-roo-app-version", "3.256.0"),
    ("x-roo-rooblocks-version", "1.1.9"),
    ("apollographql-client-name", "com.deliveroo.orderapp-apollo-android"),
    ("apollographql-client-version", "3.252.0-84322"),
    ("x-roo-country", "ae"),
    ("x-roo-platform", "Android"),
    ("x-apollo-operation-type", "query"),
    ("x-apollo-operation-name", "get_menu_page"),
    ("x-roo-appsflyeruid", "1727956408971-4679142"),
];

// ============================================================================
// Credentials
// ============================================================================

/// Static account identity sent as headers.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    /// `Authorization` header value.
    pub authorization: String,
    /// `X-Roo-Guid` device identifier.
    pub roo_guid: String,
    /// `X-Roo-Sticky-Guid` install identifier.
    pub sticky_guid: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("authorization", &"<redacted>")
            .field("roo_guid", &self.roo_guid)
            .field("sticky_guid", &self.sticky_guid)
            .finish()
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
        name,
        reason: e.to_string(),
    })
}

/// Builds the header set shared by all GraphQL calls.
pub fn app_headers(credentials: &ApiCredentials) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_static(APP_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("multipart/mixed;deferSpec=20220824,application/json"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    for &(name, value) in APP_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    let mut authorization = header_value("Authorization", &credentials.authorization)?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(
        HeaderName::from_static("x-roo-guid"),
        header_value("X-Roo-Guid", &credentials.roo_guid)?,
    );
    headers.insert(
        HeaderName::from_static("x-roo-sticky-guid"),
        header_value("X-Roo-Sticky-Guid", &credentials.sticky_guid)?,
    );

    Ok(headers)
}

/// Headers for following a challenge link like a mobile browser would.
fn challenge_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ORIGIN, HeaderValue::from_static("null"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers
}

/// Maps a GraphQL endpoint status to the gateway error model.
///
/// Only `200` carries a payload worth decoding.
pub fn classify_status(status: StatusCode, body: &str) -> Result<(), GatewayError> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::TOO_MANY_REQUESTS => Err(GatewayError::RateLimited),
        StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
        StatusCode::UNPROCESSABLE_ENTITY => {
            Err(GatewayError::ValidationRejected(body.trim().to_string()))
        }
        other => Err(GatewayError::UnexpectedStatus(other.as_u16())),
    }
}

// ============================================================================
// HTTP Gateway
// ============================================================================

/// Gateway speaking to the consumer basket and checkout GraphQL APIs.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: HttpClient,
    headers: HeaderMap,
    branch_id: String,
    store_url: String,
    egress_url: String,
}

impl HttpGateway {
    /// Creates a gateway for one restaurant branch.
    pub fn new(
        http: HttpClient,
        credentials: &ApiCredentials,
        branch_id: impl Into<String>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            headers: app_headers(credentials)?,
            branch_id: branch_id.into(),
            store_url: DEFAULT_STORE_URL.to_string(),
            egress_url: DEFAULT_EGRESS_URL.to_string(),
        })
    }

    /// Overrides the API base URL.
    pub fn with_store_url(mut self, url: impl Into<String>) -> Self {
        self.store_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the egress echo URL.
    pub fn with_egress_url(mut self, url: impl Into<String>) -> Self {
        self.egress_url = url.into();
        self
    }

    /// Posts a GraphQL body and returns the text of a `200` response.
    async fn post_graphql(
        &self,
        path: &str,
        request: &GraphqlRequest,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.store_url, path);

        // Named operations replace the default operation-name header.
        let mut headers = self.headers.clone();
        if let Some(operation) = request.operation_name {
            headers.insert(
                HeaderName::from_static("x-apollo-operation-name"),
                HeaderValue::from_static(operation),
            );
        }

        let response = self.http.post_json(&url, headers, request).await?;
        let status = response.status();
        let body = response.text().await.map_err(FetchError::from)?;

        if let Err(err) = classify_status(status, &body) {
            warn!(status = %status, error = %err, "GraphQL call failed");
            return Err(err);
        }

        Ok(body)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self))]
    async fn check_egress(&self) -> Result<EgressReport, GatewayError> {
        let response = self.http.get(&self.egress_url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus(status.as_u16()));
        }

        let body: EgressBody = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        Ok(EgressReport {
            origin: body.origin,
        })
    }

    #[instrument(skip(self))]
    async fn clear_basket(&self) -> Result<ClearBasketOutcome, GatewayError> {
        debug!("Clearing basket");
        let body = self
            .post_graphql(BASKET_PATH, &graphql::clear_basket(&self.branch_id))
            .await?;
        response::parse_clear_basket(&body).map_err(|e| FetchError::from(e).into())
    }

    #[instrument(skip(self, item), fields(item_id = %item.id()))]
    async fn add_item(&self, item: &Item, force_new: bool) -> Result<AddItemOutcome, GatewayError> {
        debug!("Adding item to basket");
        let request = graphql::add_basket_item(&self.branch_id, item, force_new);
        let body = self.post_graphql(BASKET_PATH, &request).await?;
        response::parse_add_basket_item(&body).map_err(|e| FetchError::from(e).into())
    }

    #[instrument(skip(self))]
    async fn create_payment_plan(
        &self,
        checkout_id: &str,
    ) -> Result<PaymentPlanOutcome, GatewayError> {
        debug!("Creating payment plan");
        let request = graphql::create_payment_plan(checkout_id);
        let body = self.post_graphql(CHECKOUT_PATH, &request).await?;
        response::parse_payment_plan(&body).map_err(|e| FetchError::from(e).into())
    }

    #[instrument(skip(self, plan), fields(plan_id = %plan.id))]
    async fn execute_payment_plan(
        &self,
        plan: &PaymentPlan,
        checkout_id: &str,
    ) -> Result<PaymentExecution, GatewayError> {
        debug!("Executing payment plan");
        let request = graphql::execute_payment_plan(&plan.id, checkout_id);
        let body = self.post_graphql(CHECKOUT_PATH, &request).await?;
        response::parse_payment_execution(&body).map_err(|e| FetchError::from(e).into())
    }

    #[instrument(skip(self))]
    async fn follow_challenge(&self, url: &str) -> Result<ChallengeOutcome, GatewayError> {
        let response = self.http.post_empty(url, challenge_headers()).await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        debug!(status, url = %final_url, "Challenge response");

        if status == MISDIRECTED_REQUEST {
            Ok(ChallengeOutcome::RedirectRequired { url: final_url })
        } else {
            Ok(ChallengeOutcome::Completed {
                status,
                url: final_url,
            })
        }
    }
}
