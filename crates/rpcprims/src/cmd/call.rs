use rpcprims_peer::{Client, ClientConfig};

use crate::cmd::{CallArgs, Context};
use crate::exit::{rpc_error, CliError, CliResult, SUCCESS, USAGE};
use crate::json::parse_args;
use crate::output::print_results;

pub fn run(args: CallArgs, ctx: &Context) -> CliResult<i32> {
    let values = parse_args(&args.args, args.typed).map_err(|msg| CliError::new(USAGE, msg))?;

    let config = ClientConfig::default().with_frame_config(ctx.frame.clone());
    let client = Client::with_config(args.addr.as_str(), config);

    tracing::debug!(procedure = %args.name, args = values.len(), "calling");
    let results = client
        .call_values(&args.name, values)
        .map_err(|err| rpc_error(&format!("call to '{}' failed", args.name), err))?;

    print_results(&args.name, &results, ctx.format);
    Ok(SUCCESS)
}
