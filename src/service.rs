use actix_web::{error::ErrorInternalServerError, http::StatusCode, post, web, HttpResponse};
use log::error;
use serde::Deserialize;
use serde_json::json;

use crate::{error::Error, location::Geolocation, manager::TowerManager};

#[derive(Debug, Deserialize)]
struct CoverageRequest {
    latitude: f64,
    longitude: f64,
}

impl Geolocation for CoverageRequest {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn error_response(status: StatusCode, reason: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": {
            "errors": [{
                "domain": "coverage",
                "reason": reason,
                "message": message,
            }],
            "code": status.as_u16(),
            "message": status.canonical_reason().unwrap_or_default(),
        }
    }))
}

#[post("/v1/coverage")]
pub async fn service(
    data: web::Json<CoverageRequest>,
    manager: web::Data<TowerManager>,
) -> actix_web::Result<HttpResponse> {
    let data = data.into_inner();

    match manager.location_coverage(&data) {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(e @ Error::Configuration(_)) => Ok(error_response(
            StatusCode::BAD_REQUEST,
            "invalidLocation",
            e.to_string(),
        )),
        Err(e @ Error::UnboundedExpansion { .. }) => Ok(error_response(
            StatusCode::NOT_FOUND,
            "notFound",
            e.to_string(),
        )),
        Err(e) => {
            error!("coverage lookup at ({}, {}) failed: {e}", data.latitude, data.longitude);
            Err(ErrorInternalServerError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::Value;

    use super::*;
    use crate::{
        manager::Settings,
        model::fixture,
        region::Reduction,
    };

    fn app_data(settings: Settings) -> web::Data<TowerManager> {
        let dataset = fixture(&[
            (20801, 48.80, 2.30, [true, true, true]),
            (20810, 48.85, 2.35, [true, false, true]),
        ]);
        web::Data::new(TowerManager::new(dataset, settings).unwrap())
    }

    #[actix_web::test]
    async fn coverage() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(Settings::default()))
                .service(service),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/v1/coverage")
            .set_json(json!({"latitude": 48.85, "longitude": 2.35}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({
                "Orange": {"2G": true, "3G": true, "4G": true},
                "SFR": {"2G": true, "3G": false, "4G": true},
            })
        );
    }

    #[actix_web::test]
    async fn bad_location() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(Settings::default()))
                .service(service),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/v1/coverage")
            .set_json(json!({"latitude": 148.0, "longitude": 2.35}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["errors"][0]["reason"], "invalidLocation");
    }

    #[actix_web::test]
    async fn not_found() {
        let settings = Settings {
            reduction: Reduction {
                required_operators: Some(3),
                max_radius: 5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let app = test::init_service(App::new().app_data(app_data(settings)).service(service)).await;
        let req = test::TestRequest::post()
            .uri("/v1/coverage")
            .set_json(json!({"latitude": 48.85, "longitude": 2.35}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
