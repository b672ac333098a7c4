use std::net::SocketAddr;

use axum::ServiceExt;
use axum::extract::Request;
use pageloom::server::NegotiateLayer;
use pageloom::server::create_app;
use tower::Layer;

use crate::{ServeArgs, commands};

pub async fn run(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let prepared = commands::prepare(&args.config_file)?;

    println!(
        "Resolved {} routes from {}",
        prepared.table.routes.len(),
        args.config_file.display()
    );

    let app = create_app(&prepared.table, prepared.handlers, &prepared.config.site)?;

    // Negotiation wraps the whole router so the stream-prefix rewrite
    // happens before routing.
    let service = NegotiateLayer.layer(app);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    let display_host = if args.bind == "0.0.0.0" {
        "localhost"
    } else {
        &args.bind
    };
    println!("\nServing {} at http://{}:{}", prepared.config.site.name, display_host, args.port);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(service),
    )
    .await?;

    Ok(())
}
