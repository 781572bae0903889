//! HTTP routes.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, web};
use log::error;

use crate::error::RateError;
use crate::service::RateService;

impl ResponseError for RateError {
    fn status_code(&self) -> StatusCode {
        match self {
            RateError::NotFound(_) => StatusCode::NOT_FOUND,
            RateError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            RateError::NotFound(reason) => reason.clone(),
            RateError::Store(e) => {
                error!("Rate store failure: {:#}", e);
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(body)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/exchange-rates", web::get().to(all_rates))
            .route(
                "/get-exchange-rates-for/{currency}",
                web::get().to(rates_for_currency),
            )
            .route(
                "/currency-exchange/from/{from}/to/{to}",
                web::get().to(pair_rate),
            ),
    );
}

async fn all_rates(service: web::Data<RateService>) -> Result<HttpResponse, RateError> {
    let rates = service.get_all().await?;
    Ok(HttpResponse::Ok().json(rates))
}

async fn rates_for_currency(
    service: web::Data<RateService>,
    currency: web::Path<String>,
) -> Result<HttpResponse, RateError> {
    let rates = service.get_all_relative_to(&currency).await?;
    Ok(HttpResponse::Ok().json(rates))
}

async fn pair_rate(
    service: web::Data<RateService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, RateError> {
    let (from, to) = path.into_inner();
    let rate = service.get_cross_rate(&from, &to).await?;
    Ok(HttpResponse::Ok().json(rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange_rate::{ExchangeRate, FromToRate, NewExchangeRate};
    use crate::resolver::ResolutionStrategy;
    use crate::store::{MemoryRateStore, RateStore};
    use actix_web::{App, test};
    use async_trait::async_trait;
    use std::sync::Arc;

    fn rate(r030: i32, txt: &str, rate: f64, cc: &str) -> NewExchangeRate {
        NewExchangeRate {
            r030,
            txt: txt.to_string(),
            rate,
            cc: cc.to_string(),
            exchangedate: "24.07.2023".to_string(),
        }
    }

    async fn data(store: Arc<dyn RateStore>) -> web::Data<RateService> {
        web::Data::new(RateService::new(store, "UAH", ResolutionStrategy::Latest, 61))
    }

    async fn seeded() -> web::Data<RateService> {
        let store = MemoryRateStore::new();
        store
            .save_all(&[
                rate(36, "Австралійський долар", 24.629, "AUD"),
                rate(124, "Канадський долар", 27.7255, "CAD"),
                rate(840, "Долар США", 36.5686, "USD"),
                rate(978, "Євро", 40.6643, "EUR"),
            ])
            .await
            .unwrap();
        data(Arc::new(store)).await
    }

    #[actix_web::test]
    async fn test_get_all_exchange_rates() {
        let app = test::init_service(App::new().app_data(seeded().await).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/exchange-rates").to_request();

        let rates: Vec<ExchangeRate> = test::call_and_read_body_json(&app, req).await;

        let codes: Vec<&str> = rates.iter().map(|r| r.cc.as_str()).collect();
        assert_eq!(codes, vec!["EUR", "USD", "CAD", "AUD"]);
        assert_eq!(rates[3].txt, "Австралійський долар");
    }

    #[actix_web::test]
    async fn test_empty_store_is_404() {
        let service = data(Arc::new(MemoryRateStore::new())).await;
        let app = test::init_service(App::new().app_data(service).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/exchange-rates").to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        assert_eq!(std::str::from_utf8(&body).unwrap(), "No exchange rates found");
    }

    #[actix_web::test]
    async fn test_pair_rate() {
        let app = test::init_service(App::new().app_data(seeded().await).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/currency-exchange/from/USD/to/EUR")
            .to_request();

        let rate: FromToRate = test::call_and_read_body_json(&app, req).await;

        assert_eq!(rate.from, "USD");
        assert_eq!(rate.to, "EUR");
        assert!((rate.rate - 36.5686 / 40.6643).abs() < 1e-4);
    }

    #[actix_web::test]
    async fn test_pair_rate_same_unknown_code() {
        let app = test::init_service(App::new().app_data(seeded().await).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/currency-exchange/from/XYZ/to/XYZ")
            .to_request();

        let rate: FromToRate = test::call_and_read_body_json(&app, req).await;

        assert_eq!(rate.rate, 1.0);
    }

    #[actix_web::test]
    async fn test_rates_for_nonexistent_currency() {
        let app = test::init_service(App::new().app_data(seeded().await).configure(configure)).await;

        for uri in [
            "/api/get-exchange-rates-for/XYZ",
            "/api/currency-exchange/from/XYZ/to/USD",
            "/api/currency-exchange/from/UAH/to/XYZ",
            "/get-exchange-rates-for/INVALID",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_rates_for_currency() {
        let app = test::init_service(App::new().app_data(seeded().await).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/get-exchange-rates-for/USD")
            .to_request();

        let rates: Vec<ExchangeRate> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(rates.len(), 4);
        assert_eq!(rates[0].cc, "EUR");
        assert_eq!(rates[0].rate, 36.5686 / 40.6643);
        assert_eq!(rates[1].rate, 1.0);
    }

    struct BrokenStore;

    #[async_trait]
    impl RateStore for BrokenStore {
        async fn find_all(&self, _limit: i64) -> anyhow::Result<Vec<ExchangeRate>> {
            anyhow::bail!("connection refused")
        }

        async fn find_latest_by_code(&self, _code: &str) -> anyhow::Result<Option<ExchangeRate>> {
            anyhow::bail!("connection refused")
        }

        async fn find_distinct_first_by_code(
            &self,
            _code: &str,
        ) -> anyhow::Result<Option<ExchangeRate>> {
            anyhow::bail!("connection refused")
        }

        async fn save_all(&self, _batch: &[NewExchangeRate]) -> anyhow::Result<u64> {
            anyhow::bail!("connection refused")
        }
    }

    #[actix_web::test]
    async fn test_store_failure_is_500() {
        let service = data(Arc::new(BrokenStore)).await;
        let app = test::init_service(App::new().app_data(service).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/currency-exchange/from/USD/to/EUR")
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
