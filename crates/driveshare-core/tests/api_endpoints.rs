//! Integration tests for the typed endpoint layer.

use chrono::NaiveDate;
use driveshare_core::api::types::{
    AvailabilitySearch, BookingReply, BookingRole, BookingStatus, NewBooking, NewListing,
    Registration, SecurityQuestion,
};
use driveshare_core::api::{DriveShareClient, INCOMPLETE_REGISTRATION, SECURITY_QUESTION_PROMPTS};
use driveshare_core::client::{ClientErrorKind, WriteOutcome};
use serde_json::json;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn api_for(server: &MockServer) -> DriveShareClient {
    DriveShareClient::new(format!("{}/", server.uri())).expect("build client")
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

#[tokio::test]
async fn create_booking_decodes_receipt() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/create-booking"))
        .and(body_json(json!({
            "listing_id": 7,
            "start_date": "2024-06-01",
            "end_date": "2024-06-05"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"RequestID": 42, "Status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = NewBooking {
        listing_id: 7,
        start_date: date("2024-06-01"),
        end_date: date("2024-06-05"),
    };
    let receipt = api_for(&server)
        .create_booking(&booking)
        .await
        .expect("transport ok")
        .into_result()
        .expect("2xx expected");

    assert_eq!(receipt.request_id, 42);
    assert_eq!(receipt.status, BookingStatus::Pending);
}

#[tokio::test]
async fn search_sends_the_documented_shape() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search-available-cars"))
        .and(body_json(json!({
            "pickup_location": "Lisbon",
            "from_date": "2024-06-01",
            "to_date": "2024-06-05"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "ListingID": 12,
            "OwnerID": 3,
            "Model": "Corolla",
            "Year": 2019,
            "Mileage": 53000,
            "PickUpLocation": "Lisbon",
            "RentalPricing": 45.0,
            "availability": [
                {"start_date": "2024-05-20", "end_date": "2024-07-01"}
            ]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let query = AvailabilitySearch {
        pickup_location: "Lisbon".to_string(),
        from_date: date("2024-06-01"),
        to_date: date("2024-06-05"),
    };
    let listings = api_for(&server)
        .search_available_cars(&query)
        .await
        .expect("transport ok")
        .into_result()
        .expect("2xx expected");

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].model, "Corolla");
    assert_eq!(listings[0].owner_id, Some(3));
}

#[tokio::test]
async fn respond_to_booking_forwards_the_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/respond-to-booking"))
        .and(body_json(json!({"booking_id": 9, "response": "accept"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = api_for(&server)
        .respond_to_booking(9, BookingReply::Accept)
        .await
        .expect("transport ok");
    assert!(outcome.is_success());
}

#[tokio::test]
async fn cancel_booking_puts_the_id_in_the_path() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cancel-booking/31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = api_for(&server)
        .cancel_booking(31)
        .await
        .expect("transport ok");
    assert!(outcome.is_success());
}

#[tokio::test]
async fn fetch_bookings_decodes_backend_casing() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fetch-bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "RequestID": 5,
            "Status": "Pending",
            "Role": "requestee",
            "StartDate": "2024-06-01",
            "EndDate": "2024-06-05"
        }])))
        .mount(&server)
        .await;

    let response = api_for(&server).fetch_bookings().await.expect("transport ok");
    let bookings = response.data.expect("2xx expected");
    assert_eq!(bookings[0].status, BookingStatus::Pending);
    assert_eq!(bookings[0].role, BookingRole::Requestee);
    assert!(bookings[0].awaits_decision());
}

#[tokio::test]
async fn my_cars_on_server_error_keeps_get_semantics() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/my-cars"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = api_for(&server).my_cars().await.expect("transport ok");
    assert_eq!(response.status, 500);
    assert!(response.data.is_none());
}

#[tokio::test]
async fn incomplete_registration_makes_no_network_call() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let registration = Registration {
        email: "user@example.com".to_string(),
        password: String::new(),
        security_questions: SECURITY_QUESTION_PROMPTS
            .iter()
            .map(|prompt| SecurityQuestion {
                question: (*prompt).to_string(),
                answer: "answer".to_string(),
            })
            .collect(),
    };

    let err = api_for(&server)
        .register(&registration)
        .await
        .expect_err("empty password must be rejected locally");
    assert_eq!(err.kind, ClientErrorKind::Validation);
    assert_eq!(err.message, INCOMPLETE_REGISTRATION);
}

#[tokio::test]
async fn complete_registration_posts_the_form() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"registered": true})))
        .expect(1)
        .mount(&server)
        .await;

    let registration = Registration {
        email: "user@example.com".to_string(),
        password: "hunter2".to_string(),
        security_questions: SECURITY_QUESTION_PROMPTS
            .iter()
            .map(|prompt| SecurityQuestion {
                question: (*prompt).to_string(),
                answer: "answer".to_string(),
            })
            .collect(),
    };

    let outcome = api_for(&server)
        .register(&registration)
        .await
        .expect("transport ok");
    assert!(outcome.is_success());
}

#[tokio::test]
async fn create_listing_round_trips_the_listing() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/create-listing"))
        .and(body_json(json!({
            "model": "Model 3",
            "year": 2022,
            "mileage": 12000,
            "pickup_location": "Porto",
            "rental_pricing": 80.0,
            "availability": [
                {"start_date": "2024-07-01", "end_date": "2024-07-15"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ListingID": 99,
            "OwnerID": 4,
            "Model": "Model 3",
            "Year": 2022,
            "Mileage": 12000,
            "PickUpLocation": "Porto",
            "RentalPricing": 80.0,
            "availability": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = NewListing {
        model: "Model 3".to_string(),
        year: 2022,
        mileage: 12000,
        pickup_location: "Porto".to_string(),
        rental_pricing: 80.0,
        availability: vec![driveshare_core::api::types::AvailabilityRange {
            start_date: date("2024-07-01"),
            end_date: date("2024-07-15"),
        }],
    };

    let created = api_for(&server)
        .create_listing(&listing)
        .await
        .expect("transport ok")
        .into_result()
        .expect("2xx expected");
    assert_eq!(created.listing_id, 99);
}

#[tokio::test]
async fn start_conversation_decodes_the_descriptor() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-conversation"))
        .and(body_json(json!({"owner_id": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 17})))
        .expect(1)
        .mount(&server)
        .await;

    let conversation = api_for(&server)
        .start_conversation(3)
        .await
        .expect("transport ok")
        .into_result()
        .expect("2xx expected");
    assert_eq!(conversation.id, 17);
}

#[tokio::test]
async fn mismatched_success_body_is_a_parse_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/create-booking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let booking = NewBooking {
        listing_id: 1,
        start_date: date("2024-06-01"),
        end_date: date("2024-06-02"),
    };
    let err = api_for(&server)
        .create_booking(&booking)
        .await
        .expect_err("shape mismatch must surface as a parse error");
    assert_eq!(err.kind, ClientErrorKind::Parse);
}

#[tokio::test]
async fn rejected_booking_surfaces_as_value() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/create-booking"))
        .respond_with(ResponseTemplate::new(409).set_body_string("car is not available"))
        .mount(&server)
        .await;

    let booking = NewBooking {
        listing_id: 1,
        start_date: date("2024-06-01"),
        end_date: date("2024-06-02"),
    };
    let outcome = api_for(&server)
        .create_booking(&booking)
        .await
        .expect("HTTP rejection must not use the failure channel");

    match outcome {
        WriteOutcome::HttpError(rejection) => {
            assert_eq!(rejection.status, 409);
            assert_eq!(rejection.body.as_deref(), Some("car is not available"));
        }
        WriteOutcome::Success(receipt) => panic!("expected rejection, got {receipt:?}"),
    }
}
