use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExchangeQuery {
    pub base: Option<String>,
}

/// Upstream URL for the latest rates of a base currency. The key is a path
/// segment, so it must never appear in logs.
fn rates_url(base_url: &str, api_key: &str, base: &str) -> String {
    format!("{}/{}/latest/{}", base_url.trim_end_matches('/'), api_key, base)
}

/// Proxy to the upstream currency-exchange API.
///
/// A response from upstream is mirrored with its status and JSON body; a
/// transport failure collapses to an opaque 500.
#[instrument(skip_all)]
pub async fn exchange_rates(
    State(state): State<AppState>,
    Query(query): Query<ExchangeQuery>,
) -> Response {
    let Some(base) = query.base.as_deref().map(str::trim).filter(|b| !b.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Base currency is required" })),
        )
            .into_response();
    };

    let url = rates_url(
        &state.config.exchange.base_url,
        &state.config.exchange.api_key,
        base,
    );

    match state.http.get(&url).send().await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status().as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            match upstream.json::<serde_json::Value>().await {
                Ok(body) => (status, Json(body)).into_response(),
                Err(e) => {
                    error!(error = %e.without_url(), "exchange rate body was not json");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "message": "Something went wrong" })),
                    )
                        .into_response()
                }
            }
        }
        Err(e) => {
            error!(error = %e.without_url(), "exchange rate request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "No response received from the API" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_places_key_and_base_in_the_path() {
        assert_eq!(
            rates_url("https://v6.exchangerate-api.com/v6", "k3y", "USD"),
            "https://v6.exchangerate-api.com/v6/k3y/latest/USD"
        );
        // trailing slash on the configured base url is tolerated
        assert_eq!(
            rates_url("https://v6.exchangerate-api.com/v6/", "k3y", "EUR"),
            "https://v6.exchangerate-api.com/v6/k3y/latest/EUR"
        );
    }

    #[tokio::test]
    async fn missing_base_is_rejected_before_any_network_call() {
        let state = AppState::fake();
        let response =
            exchange_rates(State(state), Query(ExchangeQuery { base: None })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_base_is_rejected_too() {
        let state = AppState::fake();
        let response = exchange_rates(
            State(state),
            Query(ExchangeQuery {
                base: Some("  ".into()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_upstream_collapses_to_500() {
        // the fake state points the exchange client at a closed local port
        let state = AppState::fake();
        let response = exchange_rates(
            State(state),
            Query(ExchangeQuery {
                base: Some("USD".into()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
