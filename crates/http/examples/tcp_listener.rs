//! Accepts TCP connections on port 42069 and prints the request head of each.
//!
//! Try it with `curl http://localhost:42069/coffee`.

use http_head_parser::connection::HttpConnection;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = PORT, "start listening");
    let tcp_listener = match TcpListener::bind(("127.0.0.1", PORT)).await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        info!(%remote_addr, "accepted connection");

        tokio::spawn(async move {
            let (reader, _writer) = tcp_stream.into_split();
            let mut connection = HttpConnection::new(reader);

            match connection.read_request().await {
                Ok(Some(request)) => {
                    if let Some(line) = request.request_line() {
                        println!("Request line:");
                        println!("- Method: {}", line.method());
                        println!("- Target: {}", String::from_utf8_lossy(line.target_bytes()));
                        println!("- Version: {}", line.version());
                    }
                    println!("Headers:");
                    for (name, value) in request.headers().iter() {
                        println!("- {name}: {}", String::from_utf8_lossy(value));
                    }
                }
                Ok(None) => info!(%remote_addr, "connection closed without a request"),
                Err(e) => error!(%remote_addr, cause = %e, "failed to parse request"),
            }

            info!(%remote_addr, "connection closed");
        });
    }
}
