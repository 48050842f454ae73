use std::convert::Infallible;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::build::http_server::BuiltHttpServer;
use crate::handler::handle_request;

pub async fn start_server(server: BuiltHttpServer) -> std::io::Result<()> {
    let listener = TcpListener::bind(&server.bind).await?;
    log::info!("[server] listening on {}", server.bind);
    let server = Arc::new(server);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                log::warn!("[server] accept failed: {err}");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server = Arc::clone(&server);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let server = Arc::clone(&server);
                async move { Ok::<_, Infallible>(handle_request(&server, req).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                log::debug!("[server] connection from {peer} ended: {err}");
            }
        });
    }
}
