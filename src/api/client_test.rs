#[cfg(test)]
mod tests {
    use crate::api::{ClientOption, HttpGet, HttpResponse, MockHttpGet, PollutionClient};
    use crate::error::{PollutionError, Result};
    use crate::models::{Coordinates, HistoricalPollutionQuery, PollutionQuery};
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const API_KEY: &str = "test_key";

    // Body shaped like the API's answer for lat=0 lon=10
    fn sample_body() -> String {
        json!({
            "coord": { "lat": 0, "lon": 10 },
            "list": [
                {
                    "dt": 1606482000,
                    "main": { "aqi": 1 },
                    "components": {
                        "co": 211.95, "no": 0.0, "no2": 0.18, "o3": 30.04,
                        "so2": 0.05, "pm2_5": 1.68, "pm10": 2.3, "nh3": 0.08
                    }
                },
                {
                    "dt": 1606485600,
                    "main": { "aqi": 3 },
                    "components": {
                        "co": 250.34, "no": 0.01, "no2": 0.3, "o3": 41.2,
                        "so2": 0.07, "pm2_5": 29.5, "pm10": 33.1, "nh3": 0.1
                    }
                }
            ]
        })
        .to_string()
    }

    fn location_query() -> Vec<Matcher> {
        vec![
            Matcher::UrlEncoded("appid".into(), API_KEY.into()),
            Matcher::UrlEncoded("lat".into(), "0".into()),
            Matcher::UrlEncoded("lon".into(), "10".into()),
        ]
    }

    fn client_for(server: &mockito::Server) -> PollutionClient {
        PollutionClient::builder(API_KEY)
            .base_url(server.url())
            .build()
            .unwrap()
    }

    fn mocked_client(mock: MockHttpGet) -> PollutionClient {
        PollutionClient::builder(API_KEY)
            .with_http_client(Some(Arc::new(mock)))
            .build()
            .unwrap()
    }

    // --- Construction ---

    #[test]
    fn test_new_with_empty_key_fails() {
        let result = PollutionClient::new("");
        assert!(matches!(result, Err(PollutionError::InvalidKey)));
    }

    #[test]
    fn test_new_with_key_and_no_options_succeeds() {
        let client = PollutionClient::new(API_KEY).unwrap();
        assert_eq!(client.base_url(), crate::api::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_custom_http_client_and_timeout() {
        let http = crate::api::default_http_client(Some(Duration::from_secs(1))).unwrap();
        let client = PollutionClient::builder(API_KEY)
            .option(Some(ClientOption::HttpClient(Arc::new(http))))
            .option(Some(ClientOption::BaseUrl("http://localhost:9".to_string())))
            .build();
        assert!(client.is_ok());

        let client = PollutionClient::builder(API_KEY)
            .option(Some(ClientOption::Timeout(Duration::from_secs(1))))
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_none_option_fails_construction() {
        let with_client = || Some(ClientOption::HttpClient(Arc::new(reqwest::Client::new())));
        let patterns: Vec<Vec<Option<ClientOption>>> = vec![
            vec![None],
            vec![None, None],
            vec![with_client(), None],
            vec![None, with_client()],
        ];

        for options in patterns {
            let builder = options
                .into_iter()
                .fold(PollutionClient::builder(API_KEY), |b, option| b.option(option));
            let result = builder.build();
            assert!(
                matches!(result, Err(PollutionError::InvalidOption)),
                "expected InvalidOption, got {:?}",
                result
            );
        }
    }

    #[test]
    fn test_none_http_client_fails_construction() {
        let result = PollutionClient::builder(API_KEY)
            .with_http_client(None)
            .build();
        assert!(matches!(result, Err(PollutionError::InvalidHttpClient)));
    }

    #[test]
    fn test_first_option_error_wins() {
        let result = PollutionClient::builder(API_KEY)
            .with_http_client(None)
            .option(None)
            .build();
        assert!(matches!(result, Err(PollutionError::InvalidHttpClient)));
    }

    #[test]
    fn test_empty_key_reported_before_option_errors() {
        let result = PollutionClient::builder("").option(None).build();
        assert!(matches!(result, Err(PollutionError::InvalidKey)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = PollutionClient::new("super-secret").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("super-secret"));
    }

    // --- Lookups against a mock server ---

    #[tokio::test]
    async fn test_current_success() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/air_pollution")
            .match_query(Matcher::AllOf(location_query()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sample_body())
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.current(&PollutionQuery::new(0.0, 10.0)).await?;

        m.assert_async().await;
        assert_eq!(result.location, Coordinates::new(0.0, 10.0));
        let timestamps: Vec<i64> = result.entries.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![1606482000, 1606485600]);
        assert_eq!(result.entries[0].air_quality_index, 1.0);
        assert_eq!(result.entries[1].components.pm2_5, 29.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_forecast_success() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/air_pollution/forecast")
            .match_query(Matcher::AllOf(location_query()))
            .with_status(200)
            .with_body(sample_body())
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.forecast(&PollutionQuery::new(0.0, 10.0)).await?;

        m.assert_async().await;
        assert_eq!(result.entries.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_historical_sends_range_verbatim() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mut matchers = location_query();
        matchers.push(Matcher::UrlEncoded("start".into(), "1606223802".into()));
        matchers.push(Matcher::UrlEncoded("end".into(), "1606482999".into()));
        let m = server
            .mock("GET", "/air_pollution/history")
            .match_query(Matcher::AllOf(matchers))
            .with_status(200)
            .with_body(sample_body())
            .create_async()
            .await;

        let client = client_for(&server);
        let query =
            HistoricalPollutionQuery::new(Coordinates::new(0.0, 10.0), 1606223802, 1606482999);
        let result = client.historical(&query).await?;

        m.assert_async().await;
        assert_eq!(result.entries.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_key_for_every_lookup() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"cod":401,"message":"Invalid API key."}"#;
        let mut mocks = Vec::new();
        for path in ["/air_pollution", "/air_pollution/forecast", "/air_pollution/history"] {
            mocks.push(
                server
                    .mock("GET", path)
                    .match_query(Matcher::Any)
                    .with_status(401)
                    .with_body(body)
                    .create_async()
                    .await,
            );
        }

        let client = client_for(&server);
        let query = PollutionQuery::new(0.0, 10.0);
        let historical = HistoricalPollutionQuery::new(query.location, 1, 2);

        assert!(matches!(client.current(&query).await, Err(PollutionError::InvalidKey)));
        assert!(matches!(client.forecast(&query).await, Err(PollutionError::InvalidKey)));
        assert!(matches!(
            client.historical(&historical).await,
            Err(PollutionError::InvalidKey)
        ));
        for m in mocks {
            m.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/air_pollution")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"coord": {"lat": 0, "lon": 10}, "list": [ {"dt": "#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.current(&PollutionQuery::new(0.0, 10.0)).await;
        assert!(matches!(result, Err(PollutionError::JsonParse(_))));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/air_pollution")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"list": {"dt": 1}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.current(&PollutionQuery::new(0.0, 10.0)).await;
        assert!(matches!(result, Err(PollutionError::JsonParse(_))));
    }

    #[tokio::test]
    async fn test_other_error_status_carries_api_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/air_pollution/forecast")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"cod":"400","message":"wrong latitude"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.forecast(&PollutionQuery::new(100.0, 10.0)).await;
        match result {
            Err(PollutionError::UnexpectedStatus { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "wrong latitude");
            },
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_passed_through() {
        // Nothing listens on the discard port.
        let client = PollutionClient::builder(API_KEY)
            .base_url("http://127.0.0.1:9")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let result = client.current(&PollutionQuery::new(0.0, 10.0)).await;
        assert!(matches!(result, Err(PollutionError::Http(_))));
    }

    // --- Lookups against a mocked transport ---

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let mut http = MockHttpGet::new();
        http.expect_get()
            .times(1)
            .returning(|_| Err(PollutionError::Transport("connection reset".to_string())));

        let client = mocked_client(http);
        let result = client.current(&PollutionQuery::new(0.0, 10.0)).await;
        match result {
            Err(PollutionError::Transport(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_urls_reach_transport_unchanged() {
        let mut http = MockHttpGet::new();
        http.expect_get()
            .withf(|url| {
                url == concat!(
                    "https://api.openweathermap.org/data/2.5/air_pollution/history",
                    "?appid=test_key&lat=52.5&lon=-0.125&start=1606223802&end=1606482999"
                )
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"list": []}"#)));

        let client = mocked_client(http);
        let query =
            HistoricalPollutionQuery::new(Coordinates::new(52.5, -0.125), 1606223802, 1606482999);
        let result = client.historical(&query).await.unwrap();
        assert!(result.entries.is_empty());
    }

    #[tokio::test]
    async fn test_each_call_returns_its_own_result() {
        let mut http = MockHttpGet::new();
        http.expect_get()
            .withf(|url| url.contains("/air_pollution/forecast?"))
            .returning(|_| Ok(HttpResponse::new(200, sample_body())));
        http.expect_get()
            .withf(|url| url.contains("/air_pollution?"))
            .returning(|_| Ok(HttpResponse::new(401, "")));

        let client = mocked_client(http);
        let query = PollutionQuery::new(0.0, 10.0);

        let shared = client.clone();
        let (forecast, current) =
            tokio::join!(client.forecast(&query), async move { shared.current(&query).await });

        assert_eq!(forecast.unwrap().entries.len(), 2);
        assert!(matches!(current, Err(PollutionError::InvalidKey)));
    }

    #[test]
    fn test_http_get_is_object_safe() {
        let http: Arc<dyn HttpGet> = Arc::new(reqwest::Client::new());
        let result = PollutionClient::builder(API_KEY)
            .with_http_client(Some(http))
            .build();
        assert!(result.is_ok());
    }
}

#[cfg(test)]
#[cfg(feature = "integration-tests")] // Hits the real API; requires OWM_API_KEY
mod live_tests {
    use crate::config::ClientConfig;
    use crate::models::{Coordinates, HistoricalPollutionQuery, PollutionQuery};

    fn live_client() -> crate::api::PollutionClient {
        ClientConfig::from_env()
            .and_then(ClientConfig::into_client)
            .expect("OWM_API_KEY must be set for integration tests")
    }

    #[tokio::test]
    async fn test_live_current() {
        let result = live_client()
            .current(&PollutionQuery::new(0.0, 10.0))
            .await
            .unwrap();
        assert!(!result.entries.is_empty());
    }

    #[tokio::test]
    async fn test_live_forecast() {
        let result = live_client()
            .forecast(&PollutionQuery::new(0.0, 10.0))
            .await
            .unwrap();
        assert!(!result.entries.is_empty());
    }

    #[tokio::test]
    async fn test_live_historical() {
        let query =
            HistoricalPollutionQuery::new(Coordinates::new(0.0, 10.0), 1606223802, 1606482999);
        let result = live_client().historical(&query).await.unwrap();
        assert!(!result.entries.is_empty());
        for entry in &result.entries {
            assert!((1..=5).contains(&(entry.air_quality_index as i64)));
            assert!((1606223802..=1606482999).contains(&entry.timestamp));
        }
    }
}
