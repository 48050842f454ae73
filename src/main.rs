use smartstatic::build::build_http_server;
use smartstatic::config::HttpServer;
use smartstatic::server::start_server;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "config.yaml".to_string());
    let config = HttpServer::load_from_file(&path).expect("Failed to load configuration");
    let server = build_http_server(config).expect("Failed to build mounts");
    if let Err(err) = start_server(server).await {
        log::error!("[server] {err}");
        std::process::exit(1);
    }
}
