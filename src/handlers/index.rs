use actix_web::HttpResponse;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the embedded landing page.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn test_index_serves_upload_form() {
        let app = test::init_service(App::new().route("/", web::get().to(index))).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert!(response.status().is_success());
        let body = test::read_body(response).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("name=\"audio\""));
        assert!(html.contains("/analyze"));
    }
}
