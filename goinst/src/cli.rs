use std::path::PathBuf;

use clap::Parser;

/// Go install command line tools, in an isolated Go workspace
#[derive(Parser, Debug)]
#[command(name = "goinst")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "goinst [OPTIONS] <go/package/name>")]
pub struct Cli {
    /// Go package to install, e.g. github.com/user/repo/cmd/tool
    #[arg(value_name = "go/package/name")]
    pub package: Option<String>,

    /// Directory the built binaries are copied into (default: $GOINST_BIN_DIR or /usr/local/bin)
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Go toolchain program used for the fetch (default: $GOINST_GO or go)
    #[arg(long, value_name = "PROGRAM")]
    pub go: Option<String>,

    /// Link $GOPATH/bin into the workspace instead of isolating fully (requires GOPATH)
    #[arg(long, default_value = "false")]
    pub share_host_bin: bool,
}
