use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rpcprims_peer::{Server, ServerConfig};

use crate::cmd::{Context, ServeArgs};
use crate::demo;
use crate::exit::{rpc_error, CliError, CliResult, SUCCESS};
use crate::output::print_listening;

pub fn run(args: ServeArgs, ctx: &Context) -> CliResult<i32> {
    let config = ServerConfig::default().with_frame_config(ctx.frame.clone());
    let server = Server::bind(args.addr.as_str(), demo::registry())
        .map_err(|err| rpc_error("bind failed", err))?
        .with_config(config);
    let addr = server.local_addr().to_string();

    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(Arc::clone(&stop), addr.clone())?;

    print_listening(&addr, &server.registry().names(), ctx.format);
    tracing::info!(%addr, "serving demo procedures");

    server
        .run_until(&stop)
        .map_err(|err| rpc_error("accept failed", err))?;
    Ok(SUCCESS)
}

/// Ctrl-C sets `stop` and opens one connection to wake the blocking accept.
fn install_ctrlc_handler(stop: Arc<AtomicBool>, addr: String) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(&addr);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
