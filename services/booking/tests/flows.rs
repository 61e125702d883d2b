//! Booking and skin assessment flows against a stub backend

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use booking::{
    BookingFlow, BookingPrefill, Sensitivity, SkinConcern, SkinTestFlow, SkinType, WizardError,
};
use chrono::{Days, Local, NaiveDate, NaiveTime};
use common::PortalConfig;
use gateway::{ApiClient, AppRoute, NavigationLog, NoticeLevel, NoticeLog, Role, SessionManager};
use serde_json::{Value, json};

struct Harness {
    client: ApiClient,
    notices: NoticeLog,
    navigation: NavigationLog,
}

fn harness(base_url: &str) -> Harness {
    let notices = NoticeLog::new();
    let navigation = NavigationLog::new();
    let client = ApiClient::new(
        PortalConfig::with_base_url(base_url).expect("valid base url"),
        SessionManager::in_memory(),
        Arc::new(notices.clone()),
        Arc::new(navigation.clone()),
    );

    Harness {
        client,
        notices,
        navigation,
    }
}

async fn spawn_backend() -> String {
    let router = Router::new()
        .route(
            "/api/services",
            get(|| async {
                Json(json!([
                    { "id": 5, "name": "Hydrating Facial", "price": 120.0, "durationMinutes": 60 },
                    { "id": 7, "name": "Chemical Peel", "price": 180.0, "durationMinutes": 45 }
                ]))
            }),
        )
        .route(
            "/api/therapists",
            get(|| async {
                Json(json!([
                    { "id": 2, "firstName": "Lan", "lastName": "Pham", "serviceIds": [5] },
                    { "id": 3, "firstName": "Mai", "lastName": "Tran", "serviceIds": [7] },
                    { "id": 4, "firstName": "Hoa", "lastName": "Le" }
                ]))
            }),
        )
        .route("/api/bookings", post(create_booking))
        .route(
            "/api/skin-test",
            post(|Json(body): Json<Value>| async move {
                if body["sensitivity"] != 3 {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Bad sensitivity" })));
                }
                (
                    StatusCode::OK,
                    Json(json!([
                        { "id": 9, "name": "Calming Facial", "price": 95.0, "description": "For redness" }
                    ])),
                )
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub backend");
    });
    format!("http://{}/api", addr)
}

async fn create_booking(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["notes"] == "conflict" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Time slot unavailable" })),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 31,
            "customerId": body["customerId"],
            "serviceId": body["serviceId"],
            "therapistId": body["therapistId"],
            "appointmentTime": body["appointmentTime"],
            "status": body["status"],
            "amount": body["amount"],
            "isPaid": body["isPaid"]
        })),
    )
}

fn next_week() -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    (today, today + Days::new(7))
}

fn two_pm() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).expect("valid time")
}

#[tokio::test]
async fn test_booking_end_to_end() {
    let base = spawn_backend().await;
    let h = harness(&base);
    h.client
        .session()
        .set_session("jwt", Role::User, "4")
        .expect("session");

    let mut flow = BookingFlow::start(h.client.clone(), None).expect("flow");
    assert!(flow.load_catalog().await);
    assert_eq!(flow.wizard().current_step(), 1);

    assert!(!flow.next());
    assert_eq!(flow.wizard().current_step(), 1);
    assert_eq!(
        h.notices.last(),
        Some((NoticeLevel::Error, "Please complete this step".to_string()))
    );

    flow.draft_mut().expect("draft").service_id = 5;
    assert!(flow.next());
    assert_eq!(flow.wizard().current_step(), 2);

    let (today, date) = next_week();
    let draft = flow.draft_mut().expect("draft");
    draft.set_date(date, today).expect("future date");
    draft.set_time_slot(two_pm()).expect("slot");
    assert!(flow.next());
    assert_eq!(flow.wizard().current_step(), 3);

    let booking = flow.submit().await.expect("booking accepted").clone();

    assert_eq!(booking.id, 31);
    assert_eq!(booking.service_id, 5);
    assert_eq!(booking.customer_id, Some(4));
    assert_eq!(booking.amount, Some(120.0));
    assert_eq!(booking.appointment_time, date.and_time(two_pm()));
    assert!(!booking.is_paid);

    assert!(flow.wizard().is_complete());
    assert_eq!(flow.wizard().confirmation(), Some(&booking));
    assert_eq!(flow.draft_mut().err(), Some(WizardError::AlreadyComplete));
    assert_eq!(h.navigation.last(), Some("/dashboard/bookings".to_string()));
    assert_eq!(
        h.notices.last(),
        Some((
            NoticeLevel::Success,
            "Booking confirmed! Thank you for choosing us.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_rejected_booking_keeps_draft() {
    let base = spawn_backend().await;
    let h = harness(&base);

    let mut flow = BookingFlow::start(h.client.clone(), None).expect("flow");
    let (today, date) = next_week();
    let draft = flow.draft_mut().expect("draft");
    draft.service_id = 7;
    draft.set_date(date, today).expect("future date");
    draft.set_time_slot(two_pm()).expect("slot");
    draft.notes = "conflict".to_string();
    assert!(flow.next());
    assert!(flow.next());

    let err = flow.submit().await.expect_err("slot taken");

    assert_eq!(
        err,
        WizardError::Submission {
            message: "Time slot unavailable".to_string(),
            status: 409
        }
    );
    assert_eq!(flow.wizard().current_step(), 3);
    assert!(!flow.wizard().is_complete());
    assert_eq!(flow.wizard().draft().notes, "conflict");
    assert_eq!(h.notices.errors(), vec!["Time slot unavailable".to_string()]);
    assert!(h.navigation.routes().is_empty());

    flow.draft_mut().expect("draft").notes = "First visit".to_string();
    let booking = flow.submit().await.expect("retry accepted");
    assert_eq!(booking.customer_id, None);
    assert_eq!(booking.amount, None);
}

#[tokio::test]
async fn test_booking_prefilled_from_link() {
    let base = spawn_backend().await;
    let h = harness(&base);

    let route = AppRoute::parse("/booking?service=5");
    let mut flow =
        BookingFlow::start(h.client.clone(), BookingPrefill::from_route(&route)).expect("flow");
    flow.load_catalog().await;

    assert_eq!(flow.wizard().draft().service_id, 5);
    assert_eq!(
        flow.selected_service().map(|s| s.name.as_str()),
        Some("Hydrating Facial")
    );
    let therapists: Vec<u64> = flow.available_therapists().iter().map(|t| t.id).collect();
    assert_eq!(therapists, vec![2, 4]);

    assert!(flow.next());
    assert_eq!(flow.wizard().current_step(), 2);

    let err = flow.submit().await.expect_err("not on the review step");
    assert_eq!(err, WizardError::NotAtFinalStep { step: 2, total: 3 });
    assert_eq!(
        h.notices.last(),
        Some((
            NoticeLevel::Error,
            "Submission is only possible from step 3, current step is 2".to_string()
        ))
    );
    assert!(h.navigation.routes().is_empty());
}

#[tokio::test]
async fn test_booking_cannot_be_submitted_twice() {
    let base = spawn_backend().await;
    let h = harness(&base);

    let mut flow = BookingFlow::start(h.client.clone(), None).expect("flow");
    let (today, date) = next_week();
    let draft = flow.draft_mut().expect("draft");
    draft.service_id = 5;
    draft.set_date(date, today).expect("future date");
    draft.set_time_slot(two_pm()).expect("slot");

    let err = flow.submit().await.expect_err("still on step 1");
    assert_eq!(err, WizardError::NotAtFinalStep { step: 1, total: 3 });
    assert_eq!(
        h.notices.last(),
        Some((
            NoticeLevel::Error,
            "Submission is only possible from step 3, current step is 1".to_string()
        ))
    );

    assert!(flow.next());
    assert!(flow.next());
    flow.submit().await.expect("booking accepted");

    let err = flow.submit().await.expect_err("already booked");
    assert_eq!(err, WizardError::AlreadyComplete);
    assert_eq!(
        h.notices.last(),
        Some((
            NoticeLevel::Error,
            "The wizard is already complete".to_string()
        ))
    );
    assert_eq!(h.navigation.routes(), vec!["/dashboard/bookings".to_string()]);
}

#[tokio::test]
async fn test_skin_test_recommendations() {
    let base = spawn_backend().await;
    let h = harness(&base);

    let mut flow = SkinTestFlow::start(h.client.clone()).expect("flow");

    assert!(!flow.next());
    assert_eq!(
        h.notices.last(),
        Some((
            NoticeLevel::Error,
            "Please answer the question to continue".to_string()
        ))
    );

    flow.draft_mut().expect("draft").skin_type = Some(SkinType::Sensitive);
    assert!(flow.next());
    flow.draft_mut()
        .expect("draft")
        .toggle_concern(SkinConcern::Redness);
    assert!(flow.next());
    flow.draft_mut().expect("draft").sensitivity = Some(Sensitivity::High);
    assert!(flow.next());
    assert_eq!(flow.wizard().current_step(), 4);
    assert!(!flow.next());

    let names: Vec<String> = flow
        .submit()
        .await
        .expect("assessment accepted")
        .iter()
        .map(|s| s.name.clone())
        .collect();

    assert_eq!(names, vec!["Calming Facial".to_string()]);
    assert_eq!(flow.recommendations().len(), 1);
    assert!(flow.wizard().is_complete());
    assert_eq!(h.navigation.last(), Some("/services".to_string()));

    let err = flow.submit().await.expect_err("already answered");
    assert_eq!(err, WizardError::AlreadyComplete);
    assert_eq!(
        h.notices.last(),
        Some((
            NoticeLevel::Error,
            "The wizard is already complete".to_string()
        ))
    );
    assert_eq!(h.navigation.routes(), vec!["/services".to_string()]);
}

#[tokio::test]
async fn test_skin_test_failure_is_retryable() {
    let base = spawn_backend().await;
    let h = harness(&base);

    let mut flow = SkinTestFlow::start(h.client.clone()).expect("flow");
    let draft = flow.draft_mut().expect("draft");
    draft.skin_type = Some(SkinType::Dry);
    draft.toggle_concern(SkinConcern::Dryness);
    draft.sensitivity = Some(Sensitivity::Low);
    for _ in 0..3 {
        assert!(flow.next());
    }

    let err = flow.submit().await.expect_err("backend rejects");
    assert_eq!(err.to_string(), "Bad sensitivity");
    assert_eq!(flow.wizard().current_step(), 4);
    assert!(flow.recommendations().is_empty());

    flow.draft_mut().expect("draft").sensitivity = Some(Sensitivity::High);
    flow.submit().await.expect("retry accepted");
    assert!(flow.wizard().is_complete());
}
