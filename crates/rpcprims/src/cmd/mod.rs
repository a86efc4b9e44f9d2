use clap::{Args, Subcommand};
use rpcprims_frame::FrameConfig;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod call;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the built-in demo procedures (addOne, add, echo, lookupUser).
    Serve(ServeArgs),
    /// Call a remote procedure once and print its results.
    Call(CallArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub frame: FrameConfig,
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, ctx),
        Command::Call(args) => call::run(args, ctx),
        Command::Version(args) => version::run(args, ctx),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (e.g. 127.0.0.1:3212; port 0 picks a free port).
    pub addr: String,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Server address.
    pub addr: String,
    /// Procedure name.
    pub name: String,
    /// Arguments as a JSON array, e.g. '[5]' or '[{"name":"x"}]'.
    #[arg(long, value_name = "JSON", default_value = "[]")]
    pub args: String,
    /// Read --args in tagged form, e.g. '[{"uint":5},"absent"]'.
    #[arg(long)]
    pub typed: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
