use std::path::Path;
use std::process::{Command, Stdio};
use zipdeploy::cloud::{AwsClient, CheckResult};
use zipdeploy::{CONFIG_FILE_NAME, ZipdeployConfig};

pub async fn doctor() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let loaded = ZipdeployConfig::load(project_dir);

    let (config, config_check) = match loaded {
        Ok(config) if project_dir.join(CONFIG_FILE_NAME).exists() => {
            (config, CheckResult::ok("Found"))
        }
        Ok(config) => (config, CheckResult::fail("Not found — run: zipdeploy init")),
        Err(e) => (ZipdeployConfig::default(), CheckResult::fail(&e.to_string())),
    };

    let client = AwsClient::new(config.aws.profile.clone(), config.aws.region.clone());
    let mut report = client.doctor().await;
    report.config_file = config_check;
    report.installer = check_installer(&config.package.installer);

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}

fn check_installer(program: &str) -> CheckResult {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout);
            CheckResult::ok(version.trim())
        }
        Ok(out) => CheckResult::fail(&format!("`{program} --version` exited with {}", out.status)),
        Err(e) => CheckResult::fail(&format!("`{program}` not runnable: {e}")),
    }
}
