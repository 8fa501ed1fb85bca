use rust_decimal_macros::dec;
use std::fs;
use std::time::Duration;
use tracing::info;

use fxform::controller::{FormController, FormInput};
use fxform::core::config::AppConfig;
use fxform::core::{FormError, FormState, ValidationError};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const ACCOUNTS: &str = r#"[
        {"id": "usd", "name": "Dollar Checking", "currency": "USD", "balance": 1000},
        {"id": "eur", "name": "Euro Savings", "currency": "EUR", "balance": 2000}
    ]"#;

    pub const RATES: &str = r#"{"USD-EUR": 0.85}"#;

    pub async fn create_bank_mock_server(rates_status: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNTS))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(rates_status).set_body_string(RATES))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            debounce_ms: 200
            sources:
              accounts:
                base_url: "{base_url}"
              rates:
                base_url: "{base_url}"
            "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn http_controller(config_file: &tempfile::NamedTempFile) -> FormController {
    let config = AppConfig::load_from_path(config_file.path()).expect("Failed to load config");
    assert_eq!(config.debounce(), Duration::from_millis(200));
    fxform::build_controller(&config)
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_bank_mock_server(200).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxform::run_command(
        fxform::AppCommand::Simulate {
            from: "usd".to_string(),
            to: "eur".to_string(),
            amount: "100".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_simulate_rejected_conversion_fails() {
    let mock_server = test_utils::create_bank_mock_server(200).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxform::run_command(
        fxform::AppCommand::Simulate {
            from: "usd".to_string(),
            to: "eur".to_string(),
            amount: "5000".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "No conversion was simulated");
    assert_eq!(
        err.downcast_ref::<FormError>(),
        Some(&FormError::Validation(ValidationError::InsufficientBalance))
    );
}

#[test_log::test(tokio::test)]
async fn test_http_sources_scenario() {
    let mock_server = test_utils::create_bank_mock_server(200).await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let mut controller = http_controller(&config_file);

    controller.initialize().await;
    assert!(!controller.state().loading);

    controller.set_from_account("usd");
    controller.set_to_account("eur");
    controller.set_amount("100");
    assert!(controller.settle_pending().await);

    let result = controller.state().result.clone().expect("Expected a result");
    info!(?result, "Simulated conversion");
    assert_eq!(result.from_amount, dec!(100));
    assert_eq!(result.to_amount, dec!(85));
    assert_eq!(result.rate, dec!(0.85));
    assert_eq!(result.fee, dec!(1));

    // Unknown destination
    controller.set_from_account("eur");
    controller.set_to_account("gbp");
    assert!(controller.settle_pending().await);
    assert_eq!(
        controller.state().error,
        Some(FormError::Validation(ValidationError::MissingAccount))
    );
    assert!(controller.state().result.is_none());
}

#[test_log::test(tokio::test)]
async fn test_rate_backend_failure_is_reported_in_state() {
    let mock_server = test_utils::create_bank_mock_server(503).await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let mut controller = http_controller(&config_file);

    controller.initialize().await;

    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.accounts.len(), 2);
    assert!(state.rates.is_empty());
    assert_eq!(
        state.error_message().as_deref(),
        Some("Failed to load exchange rates: HTTP error: 503 Service Unavailable for exchange rates")
    );
}

#[test_log::test(tokio::test)]
async fn test_event_loop_with_http_sources() {
    let mock_server = test_utils::create_bank_mock_server(200).await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let mut controller = http_controller(&config_file);
    controller.initialize().await;

    let (tx, rx) = tokio::sync::mpsc::channel(8);
    let (updates, watcher) = tokio::sync::watch::channel(FormState::new());

    let driver = async move {
        for input in [
            FormInput::FromAccount("usd".to_string()),
            FormInput::ToAccount("eur".to_string()),
            FormInput::Amount("2000".to_string()),
        ] {
            tx.send(input).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(400)).await;
        drop(tx);
    };
    tokio::join!(controller.run(rx, updates), driver);

    assert_eq!(controller.evaluations(), 1);
    let state = watcher.borrow().clone();
    assert_eq!(
        state.error,
        Some(FormError::Validation(ValidationError::InsufficientBalance))
    );
    assert!(state.result.is_none());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.yaml");
    let result = fxform::run_command(
        fxform::AppCommand::Accounts,
        Some(missing.to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
    assert!(fs::metadata(&missing).is_err());
}
