//! Auth Backend Binary
//!
//! Serves login, token refresh, and password change on BIND_ADDR
//! (e.g. 0.0.0.0:8888).

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    warden_core::log();
    warden_server::run().await
}
