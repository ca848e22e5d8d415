#[cfg(test)]
mod integration_tests {
    use crate::handlers::accounts::{CreateAccountRequest, UpdateAccountRequest};
    use crate::handlers::auth::{LoginRequest, RegisterRequest};
    use crate::handlers::trading_daily_books::{
        CreateTradingDailyBookRequest, UpdateTradingDailyBookRequest,
    };
    use crate::handlers::trading_plans::{CreateTradingPlanRequest, UpdateTradingPlanRequest};
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{
        auth_header, create_test_user, setup_test_server, TEST_PASSWORD,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use model::entities::trading_daily_book::TradingResult;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_plan_request() -> CreateTradingPlanRequest {
        CreateTradingPlanRequest {
            day: "Monday".to_string(),
            account_balance: 10_000.0,
            daily_target: 200.0,
            required_lots: 1.33,
            rounded_lots: 1.3,
            risk_amount: 100.0,
            risk_percentage: 1.0,
            sl_pips: 15.0,
            tp_pips: 30.0,
            status: None,
            reason: None,
            plan_date: Some(date("2024-05-06")),
        }
    }

    async fn create_account_via_api(
        server: &TestServer,
        token: &str,
        name: &str,
        balance: f64,
    ) -> i32 {
        let request = CreateAccountRequest {
            name: name.to_string(),
            purpose: "Prop firm evaluation".to_string(),
            broker: "FTMO".to_string(),
            balance,
        };
        let (header_name, header_value) = auth_header(token);
        let response = server
            .post("/api/v1/accounts")
            .add_header(header_name, header_value)
            .json(&request)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    async fn create_book_via_api(
        server: &TestServer,
        token: &str,
        account_id: i32,
        entry_date: &str,
        ending_balance: f64,
    ) -> i32 {
        let request = CreateTradingDailyBookRequest {
            account_id,
            date: date(entry_date),
            ending_balance,
            withdraw: None,
            sentiment: None,
            summary: None,
            result: None,
            remarks: None,
        };
        let (header_name, header_value) = auth_header(token);
        let response = server
            .post("/api/v1/trading-daily-books")
            .add_header(header_name, header_value)
            .json(&request)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    async fn get_account_balance(server: &TestServer, token: &str, account_id: i32) -> f64 {
        let (header_name, header_value) = auth_header(token);
        let response = server
            .get(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["balance"].as_f64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_and_login_flow() {
        let (server, _state) = setup_test_server().await;

        // Register
        let register_request = RegisterRequest {
            username: "swingtrader".to_string(),
            email: "swing@example.com".to_string(),
            password: "a-long-enough-password".to_string(),
        };
        let response = server
            .post("/api/v1/auth/register")
            .json(&register_request)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["username"], "swingtrader");
        assert_eq!(body.data["email"], "swing@example.com");
        assert_eq!(body.data["is_active"], true);
        // The password hash never leaves the server
        assert!(body.data.get("password").is_none());
        assert!(body.data.get("password_hash").is_none());

        // Login
        let login_request = LoginRequest {
            email: "swing@example.com".to_string(),
            password: "a-long-enough-password".to_string(),
        };
        let response = server.post("/api/v1/auth/login").json(&login_request).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let token = body.data["access_token"].as_str().unwrap().to_string();
        assert_eq!(body.data["token_type"], "bearer");

        // The token resolves to the registered user
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get("/api/v1/users/me")
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["username"], "swingtrader");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_payload() {
        let (server, _state) = setup_test_server().await;

        let register_request = RegisterRequest {
            username: "shortpw".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let response = server
            .post("/api/v1/auth/register")
            .json(&register_request)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflict() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state, "daytrader").await;

        let register_request = RegisterRequest {
            username: "daytrader".to_string(),
            email: "other@example.com".to_string(),
            password: "a-long-enough-password".to_string(),
        };
        let response = server
            .post("/api/v1/auth/register")
            .json(&register_request)
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_wrong_password_unauthorized() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state, "daytrader").await;

        let login_request = LoginRequest {
            email: "daytrader@example.com".to_string(),
            password: "definitely-wrong".to_string(),
        };
        let response = server.post("/api/v1/auth/login").json(&login_request).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_correct_password_via_seeded_user() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state, "daytrader").await;

        let login_request = LoginRequest {
            email: "daytrader@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        };
        let response = server.post("/api/v1/auth/login").json(&login_request).await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (server, _state) = setup_test_server().await;

        // No token
        let response = server.get("/api/v1/accounts").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Garbage token
        let (header_name, header_value) = auth_header("garbage.token.value");
        let response = server
            .get("/api/v1/users/me")
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_and_list_accounts() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get("/api/v1/accounts")
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["id"].as_i64().unwrap() as i32, account_id);
        assert_eq!(body.data[0]["name"], "FTMO-1");
        assert_eq!(body.data[0]["balance"].as_f64().unwrap(), 1_000.0);
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get("/api/v1/accounts/99999")
            .add_header(header_name, header_value)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_account_ownership_isolation() {
        let (server, state) = setup_test_server().await;
        let (_user1, token1) = create_test_user(&state, "trader1").await;
        let (_user2, token2) = create_test_user(&state, "trader2").await;

        let account_id = create_account_via_api(&server, &token1, "FTMO-1", 1_000.0).await;

        // Another user cannot see the account; absent and not-owned look alike
        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .get(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Nor update it
        let update_request = UpdateAccountRequest {
            name: "Hijacked".to_string(),
            purpose: "None".to_string(),
            broker: "None".to_string(),
            balance: 0.0,
        };
        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .put(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Nor delete it
        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .delete(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Their own listing stays empty
        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .get("/api/v1/accounts")
            .add_header(header_name, header_value)
            .await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.data.is_empty());

        // The owner still sees it untouched
        assert_eq!(get_account_balance(&server, &token1, account_id).await, 1_000.0);
    }

    #[tokio::test]
    async fn test_update_account_full_overwrite() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;

        let update_request = UpdateAccountRequest {
            name: "FTMO-1 Phase 2".to_string(),
            purpose: "Verification phase".to_string(),
            broker: "FTMO".to_string(),
            balance: 1_250.0,
        };
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .put(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "FTMO-1 Phase 2");
        assert_eq!(body.data["purpose"], "Verification phase");
        assert_eq!(body.data["balance"].as_f64().unwrap(), 1_250.0);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .delete(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_trading_plan_defaults() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .post("/api/v1/trading-plans")
            .add_header(header_name, header_value)
            .json(&sample_plan_request())
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        // A new plan is pending until toggled
        assert_eq!(body.data["status"], false);
        assert_eq!(body.data["day"], "Monday");
        assert_eq!(body.data["risk_percentage"].as_f64().unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_toggle_plan_status_round_trip() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .post("/api/v1/trading-plans")
            .add_header(header_name, header_value)
            .json(&sample_plan_request())
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        let plan_id = body.data["id"].as_i64().unwrap();

        // Toggling twice returns the plan to its original state
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .patch(&format!("/api/v1/trading-plans/{}/toggle-status", plan_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["status"], true);

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .patch(&format!("/api/v1/trading-plans/{}/toggle-status", plan_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["status"], false);
    }

    #[tokio::test]
    async fn test_plan_ownership_isolation() {
        let (server, state) = setup_test_server().await;
        let (_user1, token1) = create_test_user(&state, "trader1").await;
        let (_user2, token2) = create_test_user(&state, "trader2").await;

        let (header_name, header_value) = auth_header(&token1);
        let response = server
            .post("/api/v1/trading-plans")
            .add_header(header_name, header_value)
            .json(&sample_plan_request())
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        let plan_id = body.data["id"].as_i64().unwrap();

        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .patch(&format!("/api/v1/trading-plans/{}/toggle-status", plan_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .get(&format!("/api/v1/trading-plans/{}", plan_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_trading_plan_full_overwrite() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .post("/api/v1/trading-plans")
            .add_header(header_name, header_value)
            .json(&sample_plan_request())
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        let plan_id = body.data["id"].as_i64().unwrap();

        let update_request = UpdateTradingPlanRequest {
            day: "Tuesday".to_string(),
            account_balance: 10_200.0,
            daily_target: 150.0,
            required_lots: 1.0,
            rounded_lots: 1.0,
            risk_amount: 51.0,
            risk_percentage: 0.5,
            sl_pips: 10.0,
            tp_pips: 20.0,
            status: true,
            reason: Some("Scaled risk down after a green Monday".to_string()),
            plan_date: date("2024-05-07"),
        };
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .put(&format!("/api/v1/trading-plans/{}", plan_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["day"], "Tuesday");
        assert_eq!(body.data["status"], true);
        assert_eq!(body.data["risk_amount"].as_f64().unwrap(), 51.0);
        assert_eq!(body.data["plan_date"], "2024-05-07");
    }

    #[tokio::test]
    async fn test_delete_trading_plan() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .post("/api/v1/trading-plans")
            .add_header(header_name, header_value)
            .json(&sample_plan_request())
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        let plan_id = body.data["id"].as_i64().unwrap();

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .delete(&format!("/api/v1/trading-plans/{}", plan_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get(&format!("/api/v1/trading-plans/{}", plan_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_book_stamps_starting_balance_and_propagates() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        // Account "FTMO-1" with balance 1000.00
        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;

        // Create a book entry ending at 1200.00
        let create_request = CreateTradingDailyBookRequest {
            account_id,
            date: date("2024-05-01"),
            ending_balance: 1_200.0,
            withdraw: None,
            sentiment: Some("Confident".to_string()),
            summary: None,
            result: Some(TradingResult::ProfitOverall),
            remarks: None,
        };
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .post("/api/v1/trading-daily-books")
            .add_header(header_name, header_value)
            .json(&create_request)
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        let book_id = body.data["id"].as_i64().unwrap();

        // starting_balance was stamped from the account before the write
        assert_eq!(body.data["starting_balance"].as_f64().unwrap(), 1_000.0);
        assert_eq!(body.data["ending_balance"].as_f64().unwrap(), 1_200.0);
        assert_eq!(body.data["withdraw"].as_f64().unwrap(), 0.0);
        assert_eq!(body.data["result"], "Profit Overall");

        // ...and the account's balance now mirrors the ending balance
        assert_eq!(get_account_balance(&server, &token, account_id).await, 1_200.0);

        // Update the same entry's ending balance to 1150.00
        let update_request = UpdateTradingDailyBookRequest {
            ending_balance: Some(1_150.0),
            ..Default::default()
        };
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .put(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();

        // starting_balance is never recomputed on update
        assert_eq!(body.data["starting_balance"].as_f64().unwrap(), 1_000.0);
        assert_eq!(body.data["ending_balance"].as_f64().unwrap(), 1_150.0);
        assert_eq!(get_account_balance(&server, &token, account_id).await, 1_150.0);
    }

    #[tokio::test]
    async fn test_create_book_rejects_unknown_or_foreign_account() {
        let (server, state) = setup_test_server().await;
        let (_user1, token1) = create_test_user(&state, "trader1").await;
        let (_user2, token2) = create_test_user(&state, "trader2").await;

        let foreign_account_id = create_account_via_api(&server, &token1, "FTMO-1", 1_000.0).await;

        // Unknown account id
        let create_request = CreateTradingDailyBookRequest {
            account_id: 99_999,
            date: date("2024-05-01"),
            ending_balance: 1_200.0,
            withdraw: None,
            sentiment: None,
            summary: None,
            result: None,
            remarks: None,
        };
        let (header_name, header_value) = auth_header(&token1);
        let response = server
            .post("/api/v1/trading-daily-books")
            .add_header(header_name, header_value)
            .json(&create_request)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Someone else's account looks exactly the same
        let create_request = CreateTradingDailyBookRequest {
            account_id: foreign_account_id,
            date: date("2024-05-01"),
            ending_balance: 1_200.0,
            withdraw: None,
            sentiment: None,
            summary: None,
            result: None,
            remarks: None,
        };
        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .post("/api/v1/trading-daily-books")
            .add_header(header_name, header_value)
            .json(&create_request)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // No balance was touched by the failed attempts
        assert_eq!(
            get_account_balance(&server, &token1, foreign_account_id).await,
            1_000.0
        );
    }

    #[tokio::test]
    async fn test_update_book_partial_fields_leave_balance_alone() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;
        let book_id = create_book_via_api(&server, &token, account_id, "2024-05-01", 1_200.0).await;

        // Patch only the sentiment
        let update_request = UpdateTradingDailyBookRequest {
            sentiment: Some("Anxious".to_string()),
            ..Default::default()
        };
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .put(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["sentiment"], "Anxious");
        // Everything else is untouched
        assert_eq!(body.data["ending_balance"].as_f64().unwrap(), 1_200.0);
        assert_eq!(body.data["starting_balance"].as_f64().unwrap(), 1_000.0);
        assert_eq!(get_account_balance(&server, &token, account_id).await, 1_200.0);
    }

    #[tokio::test]
    async fn test_update_book_reassign_account_propagates_to_new_account() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_a = create_account_via_api(&server, &token, "Account A", 1_000.0).await;
        let account_b = create_account_via_api(&server, &token, "Account B", 500.0).await;

        let book_id = create_book_via_api(&server, &token, account_a, "2024-05-01", 1_200.0).await;
        assert_eq!(get_account_balance(&server, &token, account_a).await, 1_200.0);

        // Move the entry to account B without touching the ending balance
        let update_request = UpdateTradingDailyBookRequest {
            account_id: Some(account_b),
            ..Default::default()
        };
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .put(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;
        response.assert_status(StatusCode::OK);

        // The new account received the entry's ending balance...
        assert_eq!(get_account_balance(&server, &token, account_b).await, 1_200.0);
        // ...and the old account keeps its prior value (no revert, no recompute)
        assert_eq!(get_account_balance(&server, &token, account_a).await, 1_200.0);
    }

    #[tokio::test]
    async fn test_update_book_reassign_to_foreign_account_fails() {
        let (server, state) = setup_test_server().await;
        let (_user1, token1) = create_test_user(&state, "trader1").await;
        let (_user2, token2) = create_test_user(&state, "trader2").await;

        let own_account = create_account_via_api(&server, &token1, "Mine", 1_000.0).await;
        let foreign_account = create_account_via_api(&server, &token2, "Theirs", 500.0).await;

        let book_id = create_book_via_api(&server, &token1, own_account, "2024-05-01", 1_200.0).await;

        let update_request = UpdateTradingDailyBookRequest {
            account_id: Some(foreign_account),
            ..Default::default()
        };
        let (header_name, header_value) = auth_header(&token1);
        let response = server
            .put(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Neither account's balance moved
        assert_eq!(get_account_balance(&server, &token1, own_account).await, 1_200.0);
        assert_eq!(get_account_balance(&server, &token2, foreign_account).await, 500.0);
    }

    #[tokio::test]
    async fn test_books_listed_date_descending() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;

        // Created out of order on purpose
        create_book_via_api(&server, &token, account_id, "2024-01-01", 1_010.0).await;
        create_book_via_api(&server, &token, account_id, "2024-03-01", 1_030.0).await;
        create_book_via_api(&server, &token, account_id, "2024-02-01", 1_020.0).await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get("/api/v1/trading-daily-books")
            .add_header(header_name, header_value)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        let dates: Vec<&str> = body
            .data
            .iter()
            .map(|b| b["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[tokio::test]
    async fn test_accounts_with_balance_projection() {
        let (server, state) = setup_test_server().await;
        let (_user1, token1) = create_test_user(&state, "trader1").await;
        let (_user2, token2) = create_test_user(&state, "trader2").await;

        create_account_via_api(&server, &token1, "FTMO-1", 1_000.0).await;
        create_account_via_api(&server, &token2, "Other", 999.0).await;

        let (header_name, header_value) = auth_header(&token1);
        let response = server
            .get("/api/v1/trading-daily-books/accounts")
            .add_header(header_name, header_value)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        // Only the caller's accounts, projected down to id/name/balance
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "FTMO-1");
        assert_eq!(body.data[0]["balance"].as_f64().unwrap(), 1_000.0);
        assert!(body.data[0].get("broker").is_none());
        assert!(body.data[0].get("purpose").is_none());
    }

    #[tokio::test]
    async fn test_delete_book_keeps_account_balance() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;
        let book_id = create_book_via_api(&server, &token, account_id, "2024-05-01", 1_200.0).await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .delete(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        // Deleting an entry does not undo the balance propagation
        assert_eq!(get_account_balance(&server, &token, account_id).await, 1_200.0);

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_account_cascades_books() {
        let (server, state) = setup_test_server().await;
        let (_user, token) = create_test_user(&state, "trader1").await;

        let account_id = create_account_via_api(&server, &token, "FTMO-1", 1_000.0).await;
        create_book_via_api(&server, &token, account_id, "2024-05-01", 1_200.0).await;
        create_book_via_api(&server, &token, account_id, "2024-05-02", 1_150.0).await;

        let (header_name, header_value) = auth_header(&token);
        let response = server
            .delete(&format!("/api/v1/accounts/{}", account_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        // The account's entries went with it
        let (header_name, header_value) = auth_header(&token);
        let response = server
            .get("/api/v1/trading-daily-books")
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_book_ownership_isolation() {
        let (server, state) = setup_test_server().await;
        let (_user1, token1) = create_test_user(&state, "trader1").await;
        let (_user2, token2) = create_test_user(&state, "trader2").await;

        let account_id = create_account_via_api(&server, &token1, "FTMO-1", 1_000.0).await;
        let book_id = create_book_via_api(&server, &token1, account_id, "2024-05-01", 1_200.0).await;

        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .get(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let update_request = UpdateTradingDailyBookRequest {
            ending_balance: Some(1.0),
            ..Default::default()
        };
        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .put(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .json(&update_request)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let (header_name, header_value) = auth_header(&token2);
        let response = server
            .delete(&format!("/api/v1/trading-daily-books/{}", book_id))
            .add_header(header_name, header_value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // The entry and balance are untouched
        assert_eq!(get_account_balance(&server, &token1, account_id).await, 1_200.0);
    }
}
