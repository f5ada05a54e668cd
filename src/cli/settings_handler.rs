//! CLI handler for `--verify`, `--no-verify` and `--default-region`.

use awswitch::config;

use super::SettingsArgs;

pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    let path = config::config_path();
    let mut cfg = config::load_or_init(&path)?;

    let message = if args.no_verify {
        cfg.auto_gimme_aws_creds = false;
        "Disabled automatic credentials with gimme-aws-creds".to_string()
    } else if args.verify {
        cfg.auto_gimme_aws_creds = true;
        "Enabled automatic credentials with gimme-aws-creds".to_string()
    } else if let Some(region) = args.default_region {
        let message = format!("Set default region to {region}");
        cfg.default_region = region;
        message
    } else {
        return Ok(());
    };

    config::save(&path, &cfg)?;
    println!("{message}");
    Ok(())
}
