use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

/// Command line options of the tutor dashboard
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    #[command(subcommand)]
    pub cmd: OptsCmd,
}

#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// Start the dashboard web UI
    WebUi(WebUiOpts),

    /// Resolve a role to its mock token and access profile
    ResolveRole {
        /// One of `teacher`, `administrator`, `dpo`
        role: String,
    },

    /// List the role to token table
    Roles,
}

#[derive(Debug, Args)]
pub struct WebUiOpts {
    #[arg(long)]
    pub skip_xdg_open: bool,

    /// Listen address
    #[arg(long, short, default_value = "[::1]:0", env = "TUTORDASH_LISTEN")]
    pub listen: String,

    /// Set SO_REUSEPORT
    #[arg(long, env = "TUTORDASH_REUSEPORT")]
    pub reuseport: bool,

    /// Cors origin settings
    #[arg(long, env = "TUTORDASH_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Root directory of the assets dir
    #[arg(long, env = "TUTORDASH_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Production deployment: mark session cookies `Secure`
    #[arg(long, env = "TUTORDASH_PRODUCTION")]
    pub production: bool,

    /// Base URL of the class data API; built-in demo data when unset
    #[arg(long, env = "TUTORDASH_DATA_API_URL")]
    pub data_api_url: Option<Url>,
}

pub fn make_web_opts(opts: &WebUiOpts) -> tutordash_web_ui::Opts {
    tutordash_web_ui::Opts::builder()
        .listen(opts.listen.clone())
        .maybe_cors_origin(opts.cors_origin.clone())
        .maybe_assets_dir(opts.assets_dir.clone())
        .reuseport(opts.reuseport)
        .production(opts.production)
        .maybe_data_api_url(opts.data_api_url.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Opts::command().debug_assert();
    }

    #[test]
    fn web_ui_defaults() {
        let opts = Opts::try_parse_from(["tutordash", "web-ui", "--skip-xdg-open"]).unwrap();
        let OptsCmd::WebUi(web) = opts.cmd else {
            panic!("expected web-ui command");
        };

        assert_eq!(web.listen, "[::1]:0");
        assert!(!web.production);
        assert!(web.data_api_url.is_none());
        assert!(web.skip_xdg_open);
    }

    #[test]
    fn data_api_url_must_be_a_url() {
        assert!(
            Opts::try_parse_from(["tutordash", "web-ui", "--data-api-url", "not a url"]).is_err()
        );
        let opts = Opts::try_parse_from([
            "tutordash",
            "web-ui",
            "--data-api-url",
            "http://localhost:8000/",
        ])
        .unwrap();
        let OptsCmd::WebUi(web) = opts.cmd else {
            panic!("expected web-ui command");
        };
        assert_eq!(
            web.data_api_url.map(|u| u.to_string()),
            Some("http://localhost:8000/".to_owned())
        );
    }
}
