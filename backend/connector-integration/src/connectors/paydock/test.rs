#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::{
        collections::{HashMap, VecDeque},
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use common_enums::StandardErrorCode;
    use common_utils::{
        request::{Method, Request, RequestContent},
        types::MinorUnit,
        CustomResult,
    };
    use domain_types::{
        errors::{ApiClientError, ConnectorError},
        payment_method_data::Card,
        router_data::ConnectorAuthType,
        router_request_types::{CustomerDetails, GatewayOptions, PaymentAuthorization},
        router_response_types::Response,
        types::{ConnectorParams, Connectors},
    };
    use error_stack::report;
    use hyperswitch_masking::{Maskable, Secret};
    use interfaces::connector_types::{ConnectorTransport, PaymentGateway};
    use serde_json::{json, Value};

    use crate::{
        connectors::{paydock::authorization::IdentifierSet, Paydock},
        utils::ErrorCodeMapping,
    };

    const SANDBOX_URL: &str = "https://api-sandbox.paydock.com/v1/";
    const LIVE_URL: &str = "https://api.paydock.com/v1/";

    #[derive(Debug)]
    struct RecordedRequest {
        method: Method,
        url: String,
        headers: HashMap<String, (String, bool)>,
        body: Option<Value>,
        masked_body: Option<Value>,
    }

    impl RecordedRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).map(|(value, _)| value.as_str())
        }

        fn is_masked(&self, name: &str) -> bool {
            self.headers.get(name).is_some_and(|(_, masked)| *masked)
        }
    }

    type Reply = CustomResult<Result<Response, Response>, ApiClientError>;

    /// Records every request and answers with queued replies.
    #[derive(Default)]
    struct MockTransport {
        requests: Mutex<Vec<RecordedRequest>>,
        replies: Mutex<VecDeque<Reply>>,
    }

    impl MockTransport {
        fn replying(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into_iter().collect()),
            })
        }

        fn requests(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
            self.requests.lock().unwrap()
        }

        fn only_request(&self) -> RecordedRequest {
            let mut requests = self.requests();
            assert_eq!(requests.len(), 1, "expected exactly one outgoing request");
            requests.remove(0)
        }
    }

    #[async_trait]
    impl ConnectorTransport for MockTransport {
        async fn send(&self, request: Request) -> Reply {
            let headers = request
                .headers
                .iter()
                .map(|(name, value)| {
                    let masked = matches!(value, Maskable::Masked(_));
                    (name.clone(), (value.clone().into_inner(), masked))
                })
                .collect();
            let masked_body = request.body.as_ref().map(RequestContent::masked_json);
            let body = request.body.map(|content| match content {
                RequestContent::Json(payload) => serde_json::to_value(&payload).unwrap(),
            });
            self.requests.lock().unwrap().push(RecordedRequest {
                method: request.method,
                url: request.url,
                headers,
                body,
                masked_body,
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(report!(ApiClientError::UnexpectedServerResponse)))
        }
    }

    fn response(status_code: u16, body: &[u8]) -> Response {
        Response {
            headers: None,
            response: bytes::Bytes::copy_from_slice(body),
            status_code,
        }
    }

    fn ok(body: Value) -> Reply {
        Ok(Ok(response(201, &serde_json::to_vec(&body).unwrap())))
    }

    fn error_status(status_code: u16, body: &[u8]) -> Reply {
        Ok(Err(response(status_code, body)))
    }

    fn auth() -> ConnectorAuthType {
        ConnectorAuthType::BodyKey {
            api_key: Secret::new("sk_test_123".to_string()),
            key1: Secret::new("gw_default".to_string()),
        }
    }

    fn connectors() -> Connectors {
        Connectors {
            paydock: ConnectorParams {
                base_url: LIVE_URL.to_string(),
                secondary_base_url: Some(SANDBOX_URL.to_string()),
            },
        }
    }

    fn paydock(transport: &Arc<MockTransport>) -> Paydock {
        Paydock::new(auth(), connectors(), transport.clone(), true).unwrap()
    }

    fn card() -> Card {
        Card {
            card_number: Secret::new("4111111111111111".to_string()),
            card_exp_month: Secret::new("4".to_string()),
            card_exp_year: Secret::new("2030".to_string()),
            card_cvc: Some(Secret::new("123".to_string())),
            first_name: Some(Secret::new("Jane".to_string())),
            last_name: Some(Secret::new("Citizen".to_string())),
        }
    }

    fn charge_reply() -> Reply {
        ok(json!({
            "status": 201,
            "error": null,
            "resource": {
                "type": "charge",
                "data": {
                    "_id": "ch_1",
                    "external_id": "ext_1",
                    "reference": "ord_1",
                    "customer_id": "cus_1",
                    "customer": {
                        "_id": "cus_1",
                        "first_name": "Jane",
                        "last_name": "Citizen",
                        "email": "jane@example.com",
                        "payment_source": {
                            "_id": "ps_1",
                            "vault_token": "vt_1",
                            "gateway_id": "gw_default"
                        }
                    }
                }
            }
        }))
    }

    fn decode(token: &str) -> IdentifierSet {
        IdentifierSet::from_token(token).unwrap()
    }

    mod purchase {
        use super::*;

        #[tokio::test]
        async fn test_new_card_purchase_sends_inline_customer() {
            let transport = MockTransport::replying([charge_reply()]);
            let result = paydock(&transport)
                .purchase(
                    MinorUnit::new(1000),
                    PaymentAuthorization::Card(card()),
                    &GatewayOptions::default(),
                )
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.method, Method::Post);
            assert_eq!(request.url, "https://api-sandbox.paydock.com/v1/charges");
            assert_eq!(
                request.body.unwrap(),
                json!({
                    "amount": "10.00",
                    "currency": "AUD",
                    "customer": {
                        "first_name": "Jane",
                        "last_name": "Citizen",
                        "payment_source": {
                            "card_name": "Jane Citizen",
                            "card_number": "4111111111111111",
                            "card_ccv": "123",
                            "expire_month": "4",
                            "expire_year": "2030",
                            "gateway_id": "gw_default"
                        }
                    }
                })
            );

            assert!(result.success);
            assert!(result.test);
            assert_eq!(result.message, "201");
            assert_eq!(result.error_code, None);
            assert_eq!(
                result.authorization.as_deref(),
                Some("e=jane%40example.com&f=Jane&g=gw_default&h=ch_1&l=Citizen&s=ps_1&t=ord_1&u=cus_1&v=vt_1&x=ext_1")
            );
        }

        #[tokio::test]
        async fn test_card_details_are_masked_in_logged_body() {
            let transport = MockTransport::replying([charge_reply()]);
            paydock(&transport)
                .purchase(
                    MinorUnit::new(1000),
                    PaymentAuthorization::Card(card()),
                    &GatewayOptions::default(),
                )
                .await
                .unwrap();

            let request = transport.only_request();
            let logged = request.masked_body.unwrap().to_string();
            assert!(!logged.contains("4111111111111111"));
            assert!(!logged.contains("\"123\""));
        }

        #[tokio::test]
        async fn test_provider_headers() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                ip: Some("203.0.113.7".to_string()),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(500), "u=cus_1".into(), &options)
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.header("X-Accepts"), Some("application/json"));
            assert_eq!(request.header("X-Client-IP"), Some("203.0.113.7"));
            assert_eq!(request.header("Content-Type"), Some("application/json"));
            assert_eq!(request.header("X-User-Secret-Key"), Some("sk_test_123"));
            assert!(request.is_masked("X-User-Secret-Key"));
            assert!(request
                .header("User-Agent")
                .unwrap()
                .starts_with("connector-service/"));
        }

        #[tokio::test]
        async fn test_secret_key_option_overrides_configured_key() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                secret_key: Some(Secret::new("sk_other".to_string())),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(500), "u=cus_1".into(), &options)
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.header("X-User-Secret-Key"), Some("sk_other"));
            assert_eq!(request.header("X-Client-IP"), Some(""));
        }

        #[tokio::test]
        async fn test_payment_source_id_wins_over_customer_id() {
            let transport = MockTransport::replying([charge_reply()]);
            paydock(&transport)
                .purchase(
                    MinorUnit::new(1000),
                    "s=ps_1&u=cus_1&v=vt_1".into(),
                    &GatewayOptions::default(),
                )
                .await
                .unwrap();

            let body = transport.only_request().body.unwrap();
            assert_eq!(body["payment_source_id"], json!("ps_1"));
            assert!(body.get("customer").is_none());
            assert!(body.get("customer_id").is_none());
        }

        #[tokio::test]
        async fn test_customer_id_drops_inline_customer() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                reference: Some("ord_1".to_string()),
                description: Some("Order 1".to_string()),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(1000), "u=cus_1&v=vt_1".into(), &options)
                .await
                .unwrap();

            assert_eq!(
                transport.only_request().body.unwrap(),
                json!({
                    "amount": "10.00",
                    "currency": "AUD",
                    "reference": "ord_1",
                    "description": "Order 1",
                    "customer_id": "cus_1"
                })
            );
        }

        #[tokio::test]
        async fn test_vault_token_goes_under_payment_source() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                gateway_id: Some("gw_other".to_string()),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(250), "v=vt_1&e=jane%40example.com".into(), &options)
                .await
                .unwrap();

            assert_eq!(
                transport.only_request().body.unwrap(),
                json!({
                    "amount": "2.50",
                    "currency": "AUD",
                    "customer": {
                        "email": "jane@example.com",
                        "payment_source": {
                            "vault_token": "vt_1",
                            "gateway_id": "gw_other"
                        }
                    }
                })
            );
        }

        #[tokio::test]
        async fn test_customer_id_option_resolves_customer() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                customer_id: Some("cus_opt".to_string()),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(1000), "u=cus_tok&v=vt_1".into(), &options)
                .await
                .unwrap();

            let body = transport.only_request().body.unwrap();
            assert_eq!(body["customer_id"], json!("cus_opt"));
            assert!(body.get("customer").is_none());
        }

        #[tokio::test]
        async fn test_currency_option_and_decimals() {
            let transport = MockTransport::replying([charge_reply(), charge_reply()]);
            let gateway = paydock(&transport);

            let options = GatewayOptions {
                currency: Some("nzd".parse().unwrap()),
                ..GatewayOptions::default()
            };
            gateway
                .purchase(MinorUnit::new(1999), "u=cus_1".into(), &options)
                .await
                .unwrap();

            let options = GatewayOptions {
                currency: Some("JPY".parse().unwrap()),
                ..GatewayOptions::default()
            };
            gateway
                .purchase(MinorUnit::new(1999), "u=cus_1".into(), &options)
                .await
                .unwrap();

            let requests = transport.requests();
            let nzd = requests[0].body.as_ref().unwrap();
            assert_eq!(nzd["amount"], json!("19.99"));
            assert_eq!(nzd["currency"], json!("NZD"));
            let jpy = requests[1].body.as_ref().unwrap();
            assert_eq!(jpy["amount"], json!("1999"));
            assert_eq!(jpy["currency"], json!("JPY"));
        }

        #[tokio::test]
        async fn test_authorize_does_not_capture() {
            let transport = MockTransport::replying([charge_reply(), charge_reply()]);
            let gateway = paydock(&transport);
            let options = GatewayOptions {
                capture: Some(true),
                ..GatewayOptions::default()
            };
            gateway
                .authorize(MinorUnit::new(1000), "u=cus_1".into(), &options)
                .await
                .unwrap();
            gateway
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            let requests = transport.requests();
            assert_eq!(requests[0].body.as_ref().unwrap()["capture"], json!(false));
            assert!(requests[1].body.as_ref().unwrap().get("capture").is_none());
        }

        #[tokio::test]
        async fn test_malformed_token_fails_before_sending() {
            let transport = MockTransport::replying([]);
            let err = paydock(&transport)
                .purchase(MinorUnit::new(1000), "h=%zz".into(), &GatewayOptions::default())
                .await
                .unwrap_err();

            assert!(matches!(
                err.current_context(),
                ConnectorError::InvalidAuthorizationToken { .. }
            ));
            assert!(transport.requests().is_empty());
        }
    }

    mod customer_resolution {
        use super::*;

        #[tokio::test]
        async fn test_customer_from_replaces_token_contact_fields() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                customer_from: Some("f=Other&r=ref_other&e=other%40example.com".to_string()),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(1000), "v=vt_1&f=Token&l=Holder".into(), &options)
                .await
                .unwrap();

            let customer = transport.only_request().body.unwrap()["customer"].clone();
            assert_eq!(customer["first_name"], json!("Other"));
            assert_eq!(customer["reference"], json!("ref_other"));
            assert_eq!(customer["email"], json!("other@example.com"));
            // the primary token still supplies the payment source
            assert_eq!(customer["payment_source"]["vault_token"], json!("vt_1"));
            assert!(customer.get("last_name").is_none());
        }

        #[tokio::test]
        async fn test_options_customer_overrides_field_by_field() {
            let transport = MockTransport::replying([charge_reply()]);
            let options = GatewayOptions {
                customer: Some(CustomerDetails {
                    first_name: Some("Explicit".to_string()),
                    email: Some("explicit@example.com".parse().unwrap()),
                    phone: Some(Secret::new("+61400000000".to_string())),
                    ..CustomerDetails::default()
                }),
                ..GatewayOptions::default()
            };
            paydock(&transport)
                .purchase(MinorUnit::new(1000), PaymentAuthorization::Card(card()), &options)
                .await
                .unwrap();

            let customer = transport.only_request().body.unwrap()["customer"].clone();
            assert_eq!(customer["first_name"], json!("Explicit"));
            assert_eq!(customer["last_name"], json!("Citizen"));
            assert_eq!(customer["email"], json!("explicit@example.com"));
            assert_eq!(customer["phone"], json!("+61400000000"));
        }

        #[tokio::test]
        async fn test_malformed_customer_from_is_rejected() {
            let transport = MockTransport::replying([]);
            let options = GatewayOptions {
                customer_from: Some("u=%G1".to_string()),
                ..GatewayOptions::default()
            };
            let err = paydock(&transport)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &options)
                .await
                .unwrap_err();
            assert!(matches!(
                err.current_context(),
                ConnectorError::InvalidAuthorizationToken { .. }
            ));
            assert!(transport.requests().is_empty());
        }
    }

    mod capture_and_refund {
        use super::*;

        #[tokio::test]
        async fn test_capture_posts_amount_to_charge() {
            let transport = MockTransport::replying([charge_reply()]);
            let result = paydock(&transport)
                .capture(MinorUnit::new(1000), "h=ch_1&u=cus_1", &GatewayOptions::default())
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}charges/ch_1/capture"));
            assert_eq!(
                request.body.unwrap(),
                json!({ "amount": "10.00", "currency": "AUD" })
            );
            assert!(result.success);
        }

        #[tokio::test]
        async fn test_capture_without_charge_id_fails_before_sending() {
            let transport = MockTransport::replying([]);
            let err = paydock(&transport)
                .capture(MinorUnit::new(1000), "u=cus_1", &GatewayOptions::default())
                .await
                .unwrap_err();

            assert_eq!(
                err.current_context(),
                &ConnectorError::MissingRequiredField {
                    field_name: "charge_id"
                }
            );
            assert!(transport.requests().is_empty());
        }

        #[tokio::test]
        async fn test_refund_without_charge_id_is_still_sent() {
            let transport = MockTransport::replying([error_status(
                404,
                br#"{"status":404,"error":{"message":"Charge not found","code":"not_found"}}"#,
            )]);
            let result = paydock(&transport)
                .refund(MinorUnit::new(1000), "", &GatewayOptions::default())
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}charges//refunds"));
            assert!(!result.success);
            assert_eq!(result.message, "Charge not found");
            assert!(result.authorization.is_none());
        }

        #[tokio::test]
        async fn test_charge_id_is_encoded_as_one_path_segment() {
            let transport = MockTransport::replying([charge_reply()]);
            paydock(&transport)
                .capture(
                    MinorUnit::new(1000),
                    "h=x%2F..%2F..%2Fcustomers%3Fa",
                    &GatewayOptions::default(),
                )
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(
                request.url,
                format!("{SANDBOX_URL}charges/x%2F..%2F..%2Fcustomers%3Fa/capture")
            );
        }

        #[tokio::test]
        async fn test_refund_posts_to_charge_refunds() {
            let transport = MockTransport::replying([charge_reply()]);
            paydock(&transport)
                .refund(MinorUnit::new(300), "h=ch_1", &GatewayOptions::default())
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}charges/ch_1/refunds"));
            assert_eq!(request.body.unwrap()["amount"], json!("3.00"));
        }
    }

    mod store {
        use super::*;

        #[tokio::test]
        async fn test_store_without_customer_creates_payment_source() {
            let transport = MockTransport::replying([ok(json!({
                "status": 201,
                "resource": {
                    "type": "payment_source",
                    "data": { "vault_token": "vt_new", "type": "card" }
                }
            }))]);
            let result = paydock(&transport)
                .store(card(), &GatewayOptions::default())
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}vault/payment_sources"));
            assert_eq!(
                request.body.unwrap(),
                json!({
                    "card_name": "Jane Citizen",
                    "card_number": "4111111111111111",
                    "card_ccv": "123",
                    "expire_month": "4",
                    "expire_year": "2030"
                })
            );

            let identifiers = decode(result.authorization.as_deref().unwrap());
            assert_eq!(identifiers.vault_token.as_deref(), Some("vt_new"));
            assert_eq!(identifiers.first_name.as_deref(), Some("Jane"));
            assert_eq!(identifiers.last_name.as_deref(), Some("Citizen"));
        }

        #[tokio::test]
        async fn test_store_under_existing_customer() {
            let transport = MockTransport::replying([ok(json!({
                "status": 200,
                "resource": {
                    "type": "customer",
                    "data": {
                        "_id": "cus_1",
                        "payment_sources": [
                            { "_id": "ps_old", "vault_token": "vt_old" },
                            { "_id": "ps_new", "vault_token": "vt_new", "gateway_id": "gw_default" }
                        ]
                    }
                }
            }))]);
            let options = GatewayOptions {
                customer_id: Some("cus_1".to_string()),
                ..GatewayOptions::default()
            };
            let result = paydock(&transport).store(card(), &options).await.unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}customers/cus_1"));
            assert_eq!(
                request.body.unwrap(),
                json!({
                    "_id": "cus_1",
                    "first_name": "Jane",
                    "last_name": "Citizen",
                    "payment_source": {
                        "card_name": "Jane Citizen",
                        "card_number": "4111111111111111",
                        "card_ccv": "123",
                        "expire_month": "4",
                        "expire_year": "2030",
                        "gateway_id": "gw_default"
                    }
                })
            );

            let identifiers = decode(result.authorization.as_deref().unwrap());
            assert_eq!(identifiers.customer_id.as_deref(), Some("cus_1"));
            assert_eq!(identifiers.payment_source_id.as_deref(), Some("ps_new"));
            assert_eq!(identifiers.vault_token.as_deref(), Some("vt_new"));
        }

        #[tokio::test]
        async fn test_store_under_new_customer() {
            let transport = MockTransport::replying([ok(json!({
                "status": 201,
                "resource": { "type": "customer", "data": { "_id": "cus_new" } }
            }))]);
            let options = GatewayOptions {
                customer: Some(CustomerDetails {
                    reference: Some("crm_7".to_string()),
                    ..CustomerDetails::default()
                }),
                ..GatewayOptions::default()
            };
            paydock(&transport).store(card(), &options).await.unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}customers"));
            let body = request.body.unwrap();
            assert!(body.get("_id").is_none());
            assert_eq!(body["reference"], json!("crm_7"));
            assert_eq!(body["payment_source"]["gateway_id"], json!("gw_default"));
        }

        #[tokio::test]
        async fn test_unstore_deletes_vault_token() {
            let transport = MockTransport::replying([ok(json!({
                "status": 200,
                "resource": { "type": "vault_token", "data": { "vault_token": "vt_1" } }
            }))]);
            let result = paydock(&transport)
                .unstore("u=cus_1&v=vt_1", &GatewayOptions::default())
                .await
                .unwrap()
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.method, Method::Delete);
            assert_eq!(request.url, format!("{SANDBOX_URL}vault-tokens/vt_1"));
            assert!(request.body.is_none());
            assert_eq!(request.header("Content-Type"), None);
            assert!(result.success);
            assert!(result.authorization.is_none());
        }

        #[tokio::test]
        async fn test_vault_token_with_slash_stays_in_its_segment() {
            let transport = MockTransport::replying([ok(json!({ "status": 200 }))]);
            paydock(&transport)
                .unstore("v=vt%2F1", &GatewayOptions::default())
                .await
                .unwrap();

            let request = transport.only_request();
            assert_eq!(request.url, format!("{SANDBOX_URL}vault-tokens/vt%2F1"));
        }

        #[tokio::test]
        async fn test_unstore_without_vault_token_does_nothing() {
            let transport = MockTransport::replying([]);
            let result = paydock(&transport)
                .unstore("u=cus_1&s=ps_1", &GatewayOptions::default())
                .await
                .unwrap();

            assert!(result.is_none());
            assert!(transport.requests().is_empty());
        }
    }

    mod failures {
        use super::*;

        fn declined() -> Reply {
            error_status(
                402,
                br#"{"status":402,"error":{"message":"Card was declined","code":"card_declined","decline_code":"insufficient_funds"}}"#,
            )
        }

        #[tokio::test]
        async fn test_decline_code_is_looked_up_first() {
            let transport = MockTransport::replying([declined()]);
            let mapping = ErrorCodeMapping::from_iter([
                ("insufficient_funds", StandardErrorCode::CardDeclined),
                ("card_declined", StandardErrorCode::ProcessingError),
            ]);
            let result = paydock(&transport)
                .with_error_codes(mapping)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.message, "Card was declined");
            assert_eq!(result.error_code, Some(StandardErrorCode::CardDeclined));
            assert_eq!(result.raw_response["error"]["code"], json!("card_declined"));
            assert!(result.authorization.is_none());
        }

        #[tokio::test]
        async fn test_unknown_decline_code_falls_back_to_code() {
            let transport = MockTransport::replying([declined()]);
            let mapping =
                ErrorCodeMapping::from_iter([("card_declined", StandardErrorCode::CardDeclined)]);
            let result = paydock(&transport)
                .with_error_codes(mapping)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert_eq!(result.error_code, Some(StandardErrorCode::CardDeclined));
        }

        #[tokio::test]
        async fn test_empty_mapping_yields_no_error_code() {
            let transport = MockTransport::replying([declined()]);
            let result = paydock(&transport)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.error_code, None);
        }

        #[tokio::test]
        async fn test_failed_status_without_error_uses_processing_error() {
            let transport = MockTransport::replying([ok(json!({ "status": 301 }))]);
            let mapping =
                ErrorCodeMapping::from_iter([("processing_error", StandardErrorCode::ProcessingError)]);
            let result = paydock(&transport)
                .with_error_codes(mapping)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.message, "No error details");
            assert_eq!(result.error_code, Some(StandardErrorCode::ProcessingError));
        }

        #[tokio::test]
        async fn test_non_json_body_becomes_generic_failure() {
            let transport =
                MockTransport::replying([error_status(502, b"<html>Bad gateway</html>")]);
            let result = paydock(&transport)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert!(!result.success);
            assert!(result
                .message
                .starts_with("Invalid response received from the PayDock API."));
            assert!(result.message.contains("\"<html>Bad gateway</html>\""));
            assert_eq!(
                result.raw_response["error"]["message"],
                json!(result.message)
            );
            assert!(result.authorization.is_none());
        }

        #[tokio::test]
        async fn test_non_json_success_body_is_a_failure_too() {
            let transport = MockTransport::replying([Ok(Ok(response(200, b"OK")))]);
            let result = paydock(&transport)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert!(!result.success);
            assert!(result.message.contains("\"OK\""));
        }

        #[tokio::test]
        async fn test_transport_error_is_a_failure_without_error_code() {
            let transport = MockTransport::replying([Err(report!(
                ApiClientError::RequestTimeoutReceived
            ))]);
            let mapping =
                ErrorCodeMapping::from_iter([("processing_error", StandardErrorCode::ProcessingError)]);
            let result = paydock(&transport)
                .with_error_codes(mapping)
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert!(!result.success);
            assert_eq!(result.raw_response, Value::Null);
            assert_eq!(result.error_code, None);
            assert!(result.authorization.is_none());
            assert!(result.test);
        }
    }

    mod connector {
        use interfaces::api::ConnectorCommon;

        use super::*;

        #[test]
        fn test_connector_common() {
            let transport = MockTransport::replying([]);
            let gateway = paydock(&transport);
            assert_eq!(gateway.id(), "paydock");
            let about = gateway.get_connector_about().unwrap();
            assert_eq!(about.display_name, "PayDock");
            assert_eq!(about.homepage, "https://paydock.com/");
            assert_eq!(about.supported_countries, ["AU", "NZ", "GB", "US", "CA"]);
            assert_eq!(
                about.supported_card_types,
                ["visa", "master", "american_express"]
            );
            assert_eq!(gateway.base_url(&connectors()), SANDBOX_URL);

            let header = gateway.get_auth_header(&auth()).unwrap();
            assert_eq!(header.len(), 1);
            assert_eq!(header[0].0, "X-User-Secret-Key");

            let err = gateway
                .get_auth_header(&ConnectorAuthType::HeaderKey {
                    api_key: Secret::new("sk".to_string()),
                })
                .unwrap_err();
            assert_eq!(err.current_context(), &ConnectorError::FailedToObtainAuthType);
        }

        #[test]
        fn test_new_requires_body_key() {
            let transport = MockTransport::replying([]);
            let err = Paydock::new(ConnectorAuthType::NoKey, connectors(), transport, true)
                .err()
                .unwrap();
            assert_eq!(err.current_context(), &ConnectorError::FailedToObtainAuthType);
        }

        #[tokio::test]
        async fn test_live_mode_uses_live_url() {
            let transport = MockTransport::replying([charge_reply()]);
            let gateway = Paydock::new(auth(), connectors(), transport.clone(), false).unwrap();
            let result = gateway
                .purchase(MinorUnit::new(1000), "u=cus_1".into(), &GatewayOptions::default())
                .await
                .unwrap();

            assert_eq!(transport.only_request().url, format!("{LIVE_URL}charges"));
            assert!(!result.test);
            assert!(!gateway.is_test());
        }
    }

    mod response {
        use crate::connectors::paydock::transformers::PaydockResponse;

        use super::*;

        fn parse(body: Value) -> PaydockResponse {
            serde_json::from_value(body).unwrap()
        }

        #[test]
        fn test_success_boundary() {
            assert!(parse(json!({ "status": 200 })).is_success());
            assert!(parse(json!({ "status": 300 })).is_success());
            assert!(!parse(json!({ "status": 199 })).is_success());
            assert!(!parse(json!({ "status": 301 })).is_success());
            assert!(!parse(json!({})).is_success());
        }

        #[test]
        fn test_status_accepts_any_number() {
            let float = parse(json!({ "status": 200.0 }));
            assert!(float.is_success());
            assert_eq!(float.message(), "200.0");

            let text = parse(json!({ "status": "201" }));
            assert!(text.is_success());
            assert_eq!(text.message(), "201");

            assert!(parse(json!({ "status": 300.0 })).is_success());
            assert!(!parse(json!({ "status": 300.5 })).is_success());
            assert!(!parse(json!({ "status": "created" })).is_success());
            assert!(!parse(json!({ "status": true })).is_success());
        }

        #[test]
        fn test_error_object_fails_regardless_of_status() {
            let response = parse(json!({ "status": 200, "error": { "message": "nope" } }));
            assert!(!response.is_success());
            assert_eq!(response.message(), "nope");
            assert!(parse(json!({ "status": 200, "error": null })).is_success());
        }

        #[test]
        fn test_last_payment_source_is_the_current_one() {
            let response = parse(json!({
                "status": 200,
                "resource": {
                    "type": "customer",
                    "data": {
                        "_id": "cus_9",
                        "payment_sources": [
                            { "_id": "ps_A", "vault_token": "vt_A" },
                            { "_id": "ps_B", "vault_token": "vt_B" }
                        ]
                    }
                }
            }));
            let identifiers = decode(&response.authorization(None).unwrap());
            assert_eq!(identifiers.customer_id.as_deref(), Some("cus_9"));
            assert_eq!(identifiers.payment_source_id.as_deref(), Some("ps_B"));
            assert_eq!(identifiers.vault_token.as_deref(), Some("vt_B"));
        }

        #[test]
        fn test_customer_id_prefers_customer_object() {
            let response = parse(json!({
                "status": 201,
                "resource": {
                    "type": "charge",
                    "data": {
                        "_id": "ch_1",
                        "customer_id": "cus_from_charge",
                        "customer": { "customer_id": "cus_field", "_id": "cus_object" }
                    }
                }
            }));
            let identifiers = decode(&response.authorization(None).unwrap());
            assert_eq!(identifiers.charge_id.as_deref(), Some("ch_1"));
            assert_eq!(identifiers.customer_id.as_deref(), Some("cus_object"));
        }

        #[test]
        fn test_response_names_override_card_names() {
            let response = parse(json!({
                "status": 201,
                "resource": {
                    "type": "customer",
                    "data": { "_id": "cus_1", "first_name": "Janet" }
                }
            }));
            let card = card();
            let identifiers = decode(&response.authorization(Some(&card)).unwrap());
            assert_eq!(identifiers.first_name.as_deref(), Some("Janet"));
            assert_eq!(identifiers.last_name.as_deref(), Some("Citizen"));
        }

        #[test]
        fn test_nothing_reusable_is_absent() {
            let unknown = parse(json!({
                "status": 200,
                "resource": { "type": "notification", "data": { "_id": "n_1" } }
            }));
            assert!(unknown.authorization(None).is_none());

            let failed = parse(json!({
                "status": 400,
                "resource": { "type": "charge", "data": { "_id": "ch_1" } }
            }));
            assert!(failed.authorization(None).is_none());

            let unexpected = parse(json!({
                "status": 200,
                "resource": { "type": "charge", "data": "ch_1" }
            }));
            assert!(unexpected.authorization(None).is_none());
        }

        #[test]
        fn test_mismatched_customer_keeps_charge_id() {
            let response = parse(json!({
                "status": 201,
                "resource": {
                    "type": "charge",
                    "data": { "_id": "ch_1", "customer_id": "cus_1", "customer": "cus_1" }
                }
            }));
            let token = response.authorization(None).unwrap();
            assert!(token.contains("h=ch_1"));
            let identifiers = decode(&token);
            assert_eq!(identifiers.charge_id.as_deref(), Some("ch_1"));
            assert_eq!(identifiers.customer_id.as_deref(), Some("cus_1"));
            assert_eq!(identifiers.vault_token, None);
        }

        #[test]
        fn test_numeric_identifiers_are_kept_as_text() {
            let response = parse(json!({
                "status": 201,
                "resource": {
                    "type": "charge",
                    "data": { "_id": 42, "reference": 1001, "external_id": ["x"] }
                }
            }));
            let identifiers = decode(&response.authorization(None).unwrap());
            assert_eq!(identifiers.charge_id.as_deref(), Some("42"));
            assert_eq!(identifiers.charge_reference.as_deref(), Some("1001"));
            assert_eq!(identifiers.external_id, None);
        }

        #[test]
        fn test_payment_source_entries_that_are_not_objects_are_skipped() {
            let response = parse(json!({
                "status": 200,
                "resource": {
                    "type": "customer",
                    "data": {
                        "_id": "cus_9",
                        "payment_sources": [
                            { "_id": "ps_A", "vault_token": "vt_A" },
                            "ps_B",
                            null
                        ]
                    }
                }
            }));
            let identifiers = decode(&response.authorization(None).unwrap());
            assert_eq!(identifiers.customer_id.as_deref(), Some("cus_9"));
            assert_eq!(identifiers.payment_source_id.as_deref(), Some("ps_A"));
            assert_eq!(identifiers.vault_token.as_deref(), Some("vt_A"));
        }
    }
}
