use vizij_test_fixtures::{configs, scenes};
use vizij_vibration_core::{
    create_keyframes, EditMode, HostOp, Interpolation, MemoryScene, Property, VibrationConfig,
    VibrationError,
};

fn rig() -> (MemoryScene, VibrationConfig) {
    let scene = MemoryScene::from_json_str(&scenes::json("rig").expect("rig fixture"))
        .expect("rig parses");
    let config: VibrationConfig = configs::load("rig-forearm").expect("config fixture");
    (scene, config)
}

fn part_x(scene: &MemoryScene, part: &str, frame: i64) -> f32 {
    scene
        .key_at("Rig", Some(part), Property::RotationEuler, frame)
        .unwrap_or_else(|| panic!("no {part} rotation key at {frame}"))
        .value[0]
}

#[test]
fn named_part_follows_the_schedule() {
    let (mut scene, config) = rig();
    create_keyframes(&mut scene, &config).expect("run succeeds");

    // forearm rotation is 2 * frame; stay_on = 2 -> vib1, vib1, vib2, vib2, ...
    assert_eq!(part_x(&scene, "forearm", 101), 602.0);
    assert_eq!(part_x(&scene, "forearm", 102), 604.0);
    assert_eq!(part_x(&scene, "forearm", 103), 1004.0);
    assert_eq!(part_x(&scene, "forearm", 104), 1006.0);
    assert_eq!(part_x(&scene, "forearm", 105), 610.0);
}

#[test]
fn unselected_part_and_masked_channels_are_keyed_but_not_copied() {
    let (mut scene, config) = rig();
    create_keyframes(&mut scene, &config).expect("run succeeds");

    // upper_arm was never written: it holds its evaluated value (first source key).
    assert_eq!(part_x(&scene, "upper_arm", 102), 301.0);
    let upper = scene
        .key_at("Rig", Some("upper_arm"), Property::RotationEuler, 102)
        .unwrap();
    assert_eq!(upper.interpolation, Interpolation::Constant);

    // Entity location is masked off: no copy of 302 at frame 102.
    let root = scene.key_at("Rig", None, Property::Location, 102).unwrap();
    assert_eq!(root.value, vec![0.0, 301.0, 0.0]);

    let part_writes: Vec<&str> = scene
        .ops()
        .iter()
        .filter_map(|op| match op {
            HostOp::Write {
                part: Some(part), ..
            } => Some(part.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(part_writes.len(), 100);
    assert!(part_writes.iter().all(|p| *p == "forearm"));
}

#[test]
fn report_counts_keys_and_preparation() {
    let (mut scene, config) = rig();
    let report = create_keyframes(&mut scene, &config).expect("run succeeds");
    // Rig location + 2 parts x (rotation_euler, location) per keyed frame.
    assert_eq!(report.keys_inserted, 2 * 5 + 100 * 5);
    assert_eq!(report.keys_made_constant, 100 * 5);
    assert!(report.preparation.switched_to_pose_position);
}

#[test]
fn rig_context_is_restored() {
    let (mut scene, config) = rig();
    create_keyframes(&mut scene, &config).expect("run succeeds");

    assert_eq!(scene.current_frame, 7);
    assert_eq!(scene.mode, EditMode::Edit);
    assert_eq!(scene.active_entity.as_deref(), Some("Camera"));
    assert!(!scene.auto_keying);
    let rig = scene.entity("Rig").unwrap();
    assert_eq!(rig.layers, vec![true, false, false, true]);
    // Pose position is left switched on.
    assert!(!rig.rest_position);
}

#[test]
fn missing_part_is_fatal_after_walls() {
    let (mut scene, mut config) = rig();
    config.part = "tail".into();
    let err = create_keyframes(&mut scene, &config).unwrap_err();
    assert_eq!(
        err,
        VibrationError::UnknownPart {
            entity: "Rig".into(),
            part: "tail".into()
        }
    );
    assert!(!err.is_precondition());

    // Walls were written before the loop failed and are left in place.
    assert!(scene.key_at("Rig", None, Property::Location, 101).is_some());
    assert!(scene.key_at("Rig", None, Property::Location, 200).is_some());
    assert!(scene.key_at("Rig", None, Property::Location, 102).is_none());
    assert_eq!(scene.current_frame, 7);
    assert_eq!(scene.entity("Rig").unwrap().layers, vec![true, false, false, true]);
}

#[test]
fn part_names_match_exactly() {
    let (mut scene, mut config) = rig();
    config.part = " forearm".into();
    let err = create_keyframes(&mut scene, &config).unwrap_err();
    assert_eq!(
        err,
        VibrationError::UnknownPart {
            entity: "Rig".into(),
            part: " forearm".into()
        }
    );
}

#[test]
fn part_name_is_ignored_for_entities_without_parts() {
    let mut scene = MemoryScene::from_json_str(&scenes::json("cube").unwrap()).unwrap();
    let mut config: VibrationConfig = configs::load("cube-default").unwrap();
    config.part = "forearm".into();
    let report = create_keyframes(&mut scene, &config).expect("run succeeds");
    assert_eq!(report.written.len(), 100);
}
