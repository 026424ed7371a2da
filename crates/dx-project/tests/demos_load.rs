use std::path::Path;

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demos_load_and_validate() {
    for name in ["cooling_coil.yaml"] {
        let project = dx_project::load_yaml(&demo(name))
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        dx_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn coil_names_are_upper_cased_and_resolved() {
    let project = dx_project::load_yaml(&demo("cooling_coil.yaml")).unwrap();
    let coil = dx_project::build_coil(&project, "coolingCoil").unwrap();

    assert_eq!(coil.name(), "COOLINGCOIL");
    assert_eq!(coil.performance().name(), "PERFORMANCEOBJECTNAME");
    assert_eq!(coil.availability_schedule(), Some("AVAILSCHEDULE"));
    assert_eq!(coil.performance().mode_count(), 1);

    let (_, mode) = coil.performance().modes().next().unwrap();
    assert_eq!(mode.speed_count(), 2);
    assert!(mode.condenser().evaporative().is_some());
}

#[test]
fn coil_lookup_is_case_insensitive() {
    let project = dx_project::load_yaml(&demo("cooling_coil.yaml")).unwrap();
    let coil = dx_project::build_coil(&project, "COOLINGCOIL").unwrap();
    assert_eq!(coil.name(), "COOLINGCOIL");
}
