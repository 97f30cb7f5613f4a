use std::path::Path;
use zipdeploy::{FunctionConfig, ZipdeployConfig};

/// Write a starter zipdeploy.toml.
pub fn init(function: Option<String>, bucket: Option<String>) -> anyhow::Result<()> {
    let config = ZipdeployConfig {
        function: FunctionConfig {
            name: function,
            bucket,
        },
        ..Default::default()
    };

    let path = config.write_new(Path::new("."))?;
    println!("Created {}", path.display());

    println!();
    println!("Next steps:");
    println!();
    if config.function.name.is_none() || config.function.bucket.is_none() {
        println!("  1. Set [function].name and [function].bucket in zipdeploy.toml");
    } else {
        println!("  1. Review zipdeploy.toml");
    }
    println!();
    println!("  2. Check your AWS setup:");
    println!("     zipdeploy doctor");
    println!();
    println!("  3. Deploy:");
    println!("     zipdeploy deploy");

    Ok(())
}
