//! Evaluate a saved classifier checkpoint on the test split.
//!
//! ```text
//! eval_cls --exp-name pn_eval --model pointnet --model-path outputs/pn/models/model.t7
//! ```

use anyhow::Context;
use clap::Parser;

use neural_pcls::cli::ClsArgs;
use neural_pcls::logging::init_logging;
use neural_pcls::run::{backup_sources, run};
use pcls_io::{Experiment, RunLog};

fn main() -> anyhow::Result<()> {
    let config = ClsArgs::parse().into_config().with_eval(true);

    let experiment = Experiment::create(&config.output_root, &config.exp_name)?;
    let run_log = RunLog::open(experiment.run_log_path())
        .with_context(|| format!("opening {}", experiment.run_log_path().display()))?;
    init_logging(run_log)?;
    experiment.backup_sources(&backup_sources())?;

    run(&config, &experiment)?;
    Ok(())
}
