//! Backend Server
//!
//! Wires configuration, the Postgres directory, and the Redis session
//! registry into an actix-web server exposing the auth routes.

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;
use warden_auth::UserRepository;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let config = warden_auth::Config::from_env().map_err(std::io::Error::other)?;
    let store = warden_auth::RedisStore::from_env().map_err(std::io::Error::other)?;
    let client = warden_auth::db().await.map_err(std::io::Error::other)?;
    client.migrate().await.map_err(std::io::Error::other)?;
    log::info!("loaded {:?}", config);
    let warden = web::Data::new(warden_auth::Warden::new(config, client.clone(), store));
    let client = web::Data::new(client);
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:8888"));
    log::info!("starting server on {}", addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(warden.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/auth")
                    .route("/register",        web::post().to(warden_auth::register))
                    .route("/login",           web::post().to(warden_auth::login))
                    .route("/token",           web::post().to(warden_auth::token))
                    .route("/refresh-token",   web::post().to(warden_auth::refresh))
                    .route("/change-password", web::post().to(warden_auth::change_password)),
            )
    })
    .bind(addr)?
    .run()
    .await
}
