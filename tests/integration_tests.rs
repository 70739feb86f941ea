// tests/integration_tests.rs
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use wazn::config::AppConfig;
use wazn::errors::WaznError;
use wazn::models::{AnalysisRequest, Outcome};
use wazn::panel::{AnalyzerPanel, ANALYZE_LABEL};
use wazn::render::{View, CONNECTION_ERROR_PREFIX, SERVICE_ERROR_FALLBACK};
use wazn::runner;
use wazn::service::{AnalysisService, HttpAnalysisService};

const SCENARIO_A: &str = "على قدر أهل العزم تأتي العزائم";
const SCENARIO_B: &str = "كلام عشوائي لا معنى له";

/// Stand-in for the analysis service, keyed on the exact submitted text.
async fn analyze(body: web::Json<Value>) -> HttpResponse {
    let text = body.get("text").and_then(Value::as_str).unwrap_or_default();
    match text {
        SCENARIO_A => HttpResponse::Ok().json(json!({
            "ok": true,
            "matched": true,
            "weight": "الطويل",
            "confidence": 0.94,
            "closest_example": "..."
        })),
        SCENARIO_B => HttpResponse::Ok().json(json!({
            "ok": true,
            "matched": false,
            "similarity": 0.12,
            "message": "لا يوجد تطابق قوي"
        })),
        "بوابة" => HttpResponse::BadGateway()
            .content_type("text/html")
            .body("<html>bad gateway</html>"),
        "مشوه" => HttpResponse::Ok().body("not json at all"),
        "فارغ" => HttpResponse::UnprocessableEntity().json(json!({ "ok": false })),
        "بلا قوائم" => HttpResponse::Ok().json(json!({
            "ok": true,
            "matched": false,
            "similarity": 0.2,
            "message": "غير مطابق للأوزان المدعومة حالياً",
            "candidates": null,
            "supported": null
        })),
        _ => HttpResponse::Ok().json(json!({
            "ok": false,
            "error": "no_examples",
            "message": "لا توجد أمثلة في قاعدة البيانات."
        })),
    }
}

fn spawn_service() -> std::io::Result<AppConfig> {
    let server = HttpServer::new(|| App::new().route("/api/analyze", web::post().to(analyze)))
        .workers(1)
        .bind(("127.0.0.1", 0))?;
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    Ok(AppConfig {
        api_base: format!("http://{}", addr),
        ..AppConfig::default()
    })
}

fn unreachable_config() -> AppConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    AppConfig {
        api_base: format!("http://127.0.0.1:{}", port),
        ..AppConfig::default()
    }
}

#[actix_web::test]
async fn test_scenario_a_matched() {
    let config = spawn_service().unwrap();
    let panel = AnalyzerPanel::new(HttpAnalysisService::from_config(&config).unwrap());
    panel.set_input(&format!("  {}  ", SCENARIO_A));

    let view = panel.analyze().await.unwrap();
    let text = view.to_string();

    assert_eq!(view.outcome(), Some(Outcome::Matched));
    assert!(text.contains("الطويل"));
    assert!(text.contains("0.94"));
    assert!(!text.contains(SERVICE_ERROR_FALLBACK));
    assert!(!text.contains(CONNECTION_ERROR_PREFIX));
    assert!(panel.trigger().is_ready());
}

#[actix_web::test]
async fn test_scenario_b_unmatched() {
    let config = spawn_service().unwrap();
    let panel = AnalyzerPanel::new(HttpAnalysisService::from_config(&config).unwrap());
    panel.set_input(SCENARIO_B);

    let view = panel.analyze().await.unwrap();
    let text = view.to_string();

    match &view {
        View::Unmatched { scores, message, .. } => {
            assert_eq!(scores[0].field.key(), "similarity");
            assert_eq!(scores[0].value.to_string(), "0.12");
            assert_eq!(message.as_deref(), Some("لا يوجد تطابق قوي"));
        }
        other => panic!("expected unmatched view, got {:?}", other),
    }
    assert!(text.contains("0.12"));
    assert!(text.contains("لا يوجد تطابق قوي"));
}

#[actix_web::test]
async fn test_scenario_c_connection_failure() {
    let panel = AnalyzerPanel::new(HttpAnalysisService::from_config(&unreachable_config()).unwrap());
    panel.set_input(SCENARIO_A);

    let view = panel.analyze().await.unwrap();

    assert!(view.is_connection_error());
    assert!(view.to_string().starts_with(CONNECTION_ERROR_PREFIX));
    assert!(view.to_string().contains("HTTP request failed"));

    let trigger = panel.trigger();
    assert!(trigger.enabled);
    assert_eq!(trigger.label, ANALYZE_LABEL);
}

#[actix_web::test]
async fn test_service_error_is_decoded_whatever_the_status() {
    let config = spawn_service().unwrap();
    let service = HttpAnalysisService::from_config(&config).unwrap();

    let reported = service
        .analyze(&AnalysisRequest::new("بيت مجهول").unwrap())
        .await
        .unwrap();
    assert_eq!(reported.outcome(), Outcome::ServiceError);
    assert_eq!(reported.error.as_deref(), Some("no_examples"));

    let bare = service
        .analyze(&AnalysisRequest::new("فارغ").unwrap())
        .await
        .unwrap();
    assert_eq!(bare.outcome(), Outcome::ServiceError);

    let panel = AnalyzerPanel::new(service);
    panel.set_input("فارغ");
    let view = panel.analyze().await.unwrap();
    assert!(view.to_string().contains(SERVICE_ERROR_FALLBACK));
}

#[actix_web::test]
async fn test_null_lists_render_as_unmatched() {
    let config = spawn_service().unwrap();
    let panel = AnalyzerPanel::new(HttpAnalysisService::from_config(&config).unwrap());
    panel.set_input("بلا قوائم");

    let view = panel.analyze().await.unwrap();

    assert_eq!(view.outcome(), Some(Outcome::Unmatched));
    assert!(!view.to_string().contains(CONNECTION_ERROR_PREFIX));
    assert!(view.to_string().contains("0.2"));
}

#[actix_web::test]
async fn test_bad_bodies_are_transport_errors() {
    let config = spawn_service().unwrap();
    let service = HttpAnalysisService::from_config(&config).unwrap();

    let gateway = service.analyze(&AnalysisRequest::new("بوابة").unwrap()).await;
    match gateway {
        Err(WaznError::ApiError { status, body }) => {
            assert_eq!(status, 502);
            assert!(body.contains("bad gateway"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }

    let garbled = service.analyze(&AnalysisRequest::new("مشوه").unwrap()).await;
    assert!(matches!(garbled, Err(WaznError::JsonParse(_))));

    let panel = AnalyzerPanel::new(service);
    panel.set_input("مشوه");
    let view = panel.analyze().await.unwrap();
    assert!(view.is_connection_error());
    assert!(panel.trigger().is_ready());
}

#[actix_web::test]
async fn test_batch_against_service() {
    let config = spawn_service().unwrap();
    let service = HttpAnalysisService::from_config(&config).unwrap();
    let lines: Vec<String> = [SCENARIO_A, "", SCENARIO_B, "مشوه"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let report = runner::run_batch(&service, &lines, 2).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.matched, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.transport_errors, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["entries"][0]["view"]["kind"], "matched");
    assert_eq!(json["entries"][1]["view"]["kind"], "unmatched");
    assert_eq!(json["entries"][2]["view"]["kind"], "connection_error");
}
