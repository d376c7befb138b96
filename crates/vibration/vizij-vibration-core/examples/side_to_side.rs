//! Run a vibration against a fixture scene and print the report as JSON.
//!
//! Usage: `cargo run -p vizij-vibration-core --example side_to_side -- [scene] [config]`
//! (defaults: `cube`, `cube-default`; names come from `fixtures/manifest.json`).

use anyhow::{Context, Result};
use vizij_test_fixtures::{configs, scenes};
use vizij_vibration_core::{create_keyframes, MemoryScene, VibrationConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scene_name = args.next().unwrap_or_else(|| "cube".to_string());
    let config_name = args.next().unwrap_or_else(|| "cube-default".to_string());

    println!("Scene {}", scenes::path(&scene_name)?.display());
    let mut scene = MemoryScene::from_json_str(&scenes::json(&scene_name)?)
        .with_context(|| format!("loading scene '{scene_name}'"))?;
    let config: VibrationConfig = configs::load(&config_name)?;

    let ranges = config.ranges()?;
    println!(
        "Vibration #1 {}  Vibration #2 {}  Destination {}",
        ranges.vib1, ranges.vib2, ranges.dest
    );

    let report = create_keyframes(&mut scene, &config)
        .with_context(|| format!("running '{config_name}' on '{scene_name}'"))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
