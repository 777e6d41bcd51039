use clap::Parser;

use covasim_dash::dashboard::{self, DashboardArgs};
use covasim_dash::log;
use covasim_dash::options::Options;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = DashboardArgs::parse();
    log::set_verbosity(f64::from(args.verbose));

    // No engine is wired in here: embedders supply one through
    // `dashboard::run`; the standalone binary prints the request it builds.
    let mut options = Options::default();
    dashboard::run(&args, &mut options, None)?;
    Ok(())
}
