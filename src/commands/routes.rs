use crate::{RoutesArgs, commands};

pub async fn run(args: &RoutesArgs) -> Result<(), anyhow::Error> {
    let prepared = commands::prepare(&args.config_file)?;
    println!("{}", serde_json::to_string_pretty(&prepared.table.manifest)?);
    Ok(())
}
