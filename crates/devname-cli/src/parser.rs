//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use devname_core::DeviceClass;

/// Resolve hardware model identifiers to display names.
#[derive(Debug, Parser)]
#[command(name = "devname", version, about)]
pub struct Cli {
    /// Directory for the cached table and metadata.
    #[arg(long, global = true, env = "DEVNAME_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Remote endpoint serving the table document.
    #[arg(long, global = true, env = "DEVNAME_REMOTE_URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve an identifier (the host's when omitted) to a display name.
    Resolve {
        /// Raw identifier, e.g. "iPhone10,3". Defaults to the host identifier.
        identifier: Option<String>,

        /// Leave out the parenthesized variant label.
        #[arg(long)]
        no_type: bool,

        /// Device-class hint used for simulator identifiers.
        #[arg(long, value_enum, default_value_t = DeviceClassArg::Unspecified)]
        class: DeviceClassArg,

        /// Treat an "arm" identifier prefix as a simulator marker.
        #[arg(long)]
        arm_simulator: bool,
    },

    /// Check the remote endpoint for a newer table.
    Refresh {
        /// Ignore the cool-down window.
        #[arg(long)]
        force: bool,
    },

    /// Print the resolved cache locations.
    Paths,

    /// Summarize the cached table and revalidation metadata.
    Show,
}

/// Device-class hint as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceClassArg {
    Unspecified,
    Phone,
    Tablet,
    Tv,
    CarDisplay,
    Desktop,
}

impl From<DeviceClassArg> for DeviceClass {
    fn from(arg: DeviceClassArg) -> Self {
        match arg {
            DeviceClassArg::Unspecified => Self::Unspecified,
            DeviceClassArg::Phone => Self::Phone,
            DeviceClassArg::Tablet => Self::Tablet,
            DeviceClassArg::Tv => Self::Tv,
            DeviceClassArg::CarDisplay => Self::CarDisplay,
            DeviceClassArg::Desktop => Self::Desktop,
        }
    }
}
