mod cli;

use std::io;

use clap::Parser;
use cli::{Opts, OptsCmd, make_web_opts};
use duct::cmd;
use snafu::{FromString, ResultExt, Snafu, Whatever};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tutordash_core::access::AccessProfile;
use tutordash_core::{LoginError, RoleResolver};
use tutordash_web_ui::{Server, WebUiServerError};

pub const LOG_TARGET: &str = "tutordash::cli";

type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("WebUI Server error: {source}"))]
    WebUiServer { source: WebUiServerError },
    #[snafu(display("Login error: {source}"))]
    Login { source: LoginError },
    #[snafu(display("Miscellaneous error: {source}"))]
    Whatever { source: Whatever },
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[snafu::report]
#[tokio::main]
async fn main() -> CliResult<()> {
    init_logging().context(WhateverSnafu)?;

    let opts = Opts::parse();
    let v = handle_cmd(opts).await?;
    if !v.is_null() {
        println!("{}", serde_json::to_string_pretty(&v).expect("Can't fail"));
    }
    Ok(())
}

async fn handle_cmd(opts: Opts) -> CliResult<serde_json::Value> {
    let resolver = RoleResolver::default();

    Ok(match opts.cmd {
        OptsCmd::WebUi(ref web_opts) => {
            let server = Server::init(make_web_opts(web_opts))
                .await
                .context(WebUiServerSnafu)?;
            let addr = server.addr().context(WebUiServerSnafu)?;
            info!(target: LOG_TARGET, %addr, production = web_opts.production, "Dashboard ready");

            if !web_opts.skip_xdg_open {
                if cmd!("xdg-open", format!("http://{addr}")).run().is_err() {
                    warn!(target: LOG_TARGET, "Failed to open browser");
                };
            }

            server.run().await.context(WebUiServerSnafu)?;

            serde_json::Value::Null
        }
        OptsCmd::ResolveRole { role } => {
            let resolved = resolver.resolve(&role).context(LoginSnafu)?;
            let profile = AccessProfile::for_token(&resolver, &resolved.token)
                .ok_or_else(|| Whatever::without_source("Token has no profile".to_string()))
                .context(WhateverSnafu)?;

            serde_json::json!({
                "role": resolved.role,
                "token": resolved.token,
                "permissions": profile.permissions,
                "class_ids": profile.classes.to_wire(),
            })
        }
        OptsCmd::Roles => serde_json::Value::Array(
            resolver
                .entries()
                .map(|(role, token)| {
                    serde_json::json!({
                        "role": role,
                        "label": role.label(),
                        "token": token,
                    })
                })
                .collect(),
        ),
    })
}

pub fn init_logging() -> WhateverResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| Whatever::without_source("Failed to initialize logging".to_string()))?;

    Ok(())
}
