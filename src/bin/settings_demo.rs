use refresh_identity::settings::*;

// $ cargo run --bin settings_demo -- --settings=settings/dev.toml
// $ IDENTITY__TOKEN__ACCESS_LIFETIME_SECS=60 cargo run --bin settings_demo
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let project_settings = parse_settings(cli.settings.as_deref())?;
    println!("Loaded settings: {:?}", project_settings);

    let is_err = parse_settings(Some("")).is_err();
    println!("Error on invalid path: {:?}", is_err);

    Ok(())
}
