use std::net::IpAddr;
use std::num::NonZeroUsize;

use clap::Parser;
use raid5_rs::retention::disk::DiskSpec;

#[derive(Parser, Debug)]
#[command(
    name = "raid5d",
    version,
    about = "Serve a degraded RAID-5 array as a read-only network block device"
)]
pub struct Cli {
    /// TCP port to accept NBD clients on.
    pub port: u16,

    /// Member disks in array order. `MISSING` marks the one to rebuild from parity.
    #[arg(required = true, num_args = 2.., value_name = "DISK")]
    pub disks: Vec<DiskSpec>,

    #[arg(long, env = "RAID5D_BLOCK_SIZE", default_value = "131072")]
    pub block_size: NonZeroUsize,

    #[arg(long, env = "RAID5D_CACHE_SLOTS", default_value = "80")]
    pub cache_slots: NonZeroUsize,

    /// Size announced to clients. Defaults to the array capacity less one block.
    #[arg(long, env = "RAID5D_EXPORT_SIZE")]
    pub export_size: Option<u64>,

    #[arg(long, env = "RAID5D_LISTEN", default_value = "0.0.0.0")]
    pub listen: IpAddr,

    /// Delay between bind and accept retries.
    #[arg(long, env = "RAID5D_RETRY_MS", default_value_t = 1000)]
    pub retry_ms: u64,

    /// Stay attached to the terminal instead of daemonizing.
    #[arg(long)]
    pub foreground: bool,
}

/// Parses the command line, exiting with status 1 on bad arguments.
pub fn parse() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}
