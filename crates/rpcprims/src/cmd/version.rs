use serde::Serialize;

use crate::cmd::{Context, VersionArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    profile: &'static str,
    rustc: &'static str,
    git_hash: &'static str,
    features: Vec<&'static str>,
}

impl VersionInfo {
    fn collect() -> Self {
        let mut features = vec!["cli"];
        if cfg!(feature = "peer") {
            features.push("peer");
        }
        if cfg!(feature = "async") {
            features.push("async");
        }
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            target: option_env!("RPCPRIMS_BUILD_TARGET").unwrap_or("unknown"),
            profile: option_env!("RPCPRIMS_BUILD_PROFILE").unwrap_or("unknown"),
            rustc: option_env!("RUSTC_VERSION").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            features,
        }
    }
}

pub fn run(args: VersionArgs, ctx: &Context) -> CliResult<i32> {
    let info = VersionInfo::collect();

    if ctx.format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(SUCCESS);
    }

    if !args.extended {
        println!("{} {}", info.name, info.version);
        return Ok(SUCCESS);
    }

    println!("name: {}", info.name);
    println!("version: {}", info.version);
    println!("target: {}", info.target);
    println!("profile: {}", info.profile);
    println!("rustc: {}", info.rustc);
    println!("git_hash: {}", info.git_hash);
    println!("features: {}", info.features.join(", "));
    println!("wire: u32 big-endian length prefix, tagged envelope");

    Ok(SUCCESS)
}
