mod cmd;
mod demo;
mod exit;
mod json;
mod logging;
mod output;

use clap::Parser;
use rpcprims_frame::FrameConfig;

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rpcprims", version, about = "Minimal RPC over TCP")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    /// Maximum frame payload in bytes, for both requests and responses.
    #[arg(long, value_name = "BYTES", env = "RPCPRIMS_MAX_PAYLOAD", global = true)]
    max_payload: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn context(&self) -> Context {
        let mut frame = FrameConfig::default();
        if let Some(max) = self.max_payload {
            frame = frame.with_max_payload_size(max);
        }
        Context {
            format: self.format.unwrap_or_else(OutputFormat::default_for_stdout),
            frame,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = cli.context();
    let result = cmd::run(cli.command, &ctx);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use rpcprims_frame::DEFAULT_MAX_PAYLOAD;

    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["rpcprims", "serve", "127.0.0.1:0"])
            .expect("serve args should parse");
        match cli.command {
            Command::Serve(args) => assert_eq!(args.addr, "127.0.0.1:0"),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_with_args() {
        let cli = Cli::try_parse_from([
            "rpcprims",
            "--format",
            "json",
            "call",
            "127.0.0.1:3212",
            "addOne",
            "--args",
            "[5]",
        ])
        .expect("call args should parse");

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Command::Call(args) => {
                assert_eq!(args.name, "addOne");
                assert_eq!(args.args, "[5]");
                assert!(!args.typed);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn call_args_default_to_empty_array() {
        let cli = Cli::try_parse_from(["rpcprims", "call", "127.0.0.1:1", "ping"])
            .expect("call args should parse");
        match cli.command {
            Command::Call(args) => assert_eq!(args.args, "[]"),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn call_requires_procedure_name() {
        let err = Cli::try_parse_from(["rpcprims", "call", "127.0.0.1:1"])
            .expect_err("missing name should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn max_payload_flows_into_frame_config() {
        let cli = Cli::try_parse_from([
            "rpcprims",
            "--max-payload",
            "4096",
            "version",
        ])
        .expect("version args should parse");
        assert_eq!(cli.context().frame.max_payload_size, 4096);

        let cli = Cli::try_parse_from(["rpcprims", "version", "--extended"])
            .expect("version args should parse");
        if std::env::var_os("RPCPRIMS_MAX_PAYLOAD").is_none() {
            assert_eq!(cli.context().frame.max_payload_size, DEFAULT_MAX_PAYLOAD);
        }
    }
}
