use goose::config::GooseConfiguration;
use gumdrop::Options;

use order_load::config::WorkloadOptions;
use order_load::WorkloadError;

#[tokio::main]
async fn main() -> Result<(), WorkloadError> {
    let options = WorkloadOptions::parse_args_default_or_exit();
    let workload = options.workload_config()?;
    let configuration = options.goose_configuration()?;

    // Goose only prints its own help when it parses the command line itself.
    if configuration.help {
        println!("{}", GooseConfiguration::usage());
        return Ok(());
    }

    let _goose_metrics = order_load::build_attack(workload, configuration)?
        .execute()
        .await?;

    Ok(())
}
