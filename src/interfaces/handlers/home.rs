use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "message": "Portfolio API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health"
    }))
}
