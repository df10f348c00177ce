use approx::assert_abs_diff_eq;
use giftbox_engine::config::SceneConfig;
use giftbox_engine::ecs::SceneWorld;
use giftbox_engine::events::SceneEvent;
use glam::Vec3;

fn scene() -> SceneWorld {
    SceneWorld::new(SceneConfig { seed: Some(11), ..Default::default() })
}

#[test]
fn grid_has_27_cells_and_only_the_hero_is_visible() {
    let mut scene = scene();
    let cells = scene.cells();
    assert_eq!(cells.len(), 27);
    let visible: Vec<_> = cells.iter().filter(|cell| cell.visible).collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].label, "B2-2");
    assert!(visible[0].hero);
    assert!(visible[0].label_visible);
    assert!(cells.iter().filter(|cell| !cell.hero).all(|cell| !cell.label_visible));
    assert_eq!(scene.hero_entity(), Some(visible[0].entity));
}

#[test]
fn hero_sits_on_the_anchor_and_the_grid_shifts_with_it() {
    let mut scene = scene();
    let hero = scene.cell("B2-2").expect("hero cell");
    assert_eq!(hero.translation, Vec3::new(0.0, -8.0, 0.0));
    assert_abs_diff_eq!(hero.label_translation.y, -7.3, epsilon = 1e-5);
    assert_eq!(scene.anchor(), hero.translation);

    let corner = scene.cell("C1-1").expect("C1-1");
    assert_eq!(corner.translation, Vec3::new(-2.5, -5.5, 2.5));
    let far_corner = scene.cell("A3-3").expect("A3-3");
    assert_eq!(far_corner.translation, Vec3::new(2.5, -10.5, -2.5));
    let above = scene.cell("B1-2").expect("B1-2");
    assert_eq!(above.translation, Vec3::new(0.0, -5.5, 0.0));
}

#[test]
fn labels_are_unique() {
    let mut scene = scene();
    let mut labels: Vec<String> = scene.cells().into_iter().map(|cell| cell.label).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), 27);
}

#[test]
fn reveal_cell_shows_known_cells_only() {
    let mut scene = scene();
    assert!(scene.reveal_cell("C2-2"));
    let cell = scene.cell("C2-2").expect("C2-2");
    assert!(cell.visible && cell.label_visible);
    assert_eq!(scene.drain_events(), vec![SceneEvent::CellRevealed { label: "C2-2".to_string() }]);

    assert!(!scene.reveal_cell("Z9-9"));
    assert!(scene.drain_events().is_empty());
    assert_eq!(scene.cells().iter().filter(|cell| cell.visible).count(), 2);
}

#[test]
fn reveal_all_shows_every_cell() {
    let mut scene = scene();
    assert_eq!(scene.reveal_all(), 27);
    assert!(scene.cells().iter().all(|cell| cell.visible && cell.label_visible));
}

#[test]
fn rebuilding_the_grid_hides_revealed_cells_again() {
    let mut scene = scene();
    scene.reveal_all();
    assert_eq!(scene.build_grid(), 27);
    let cells = scene.cells();
    assert_eq!(cells.len(), 27);
    assert_eq!(cells.iter().filter(|cell| cell.visible).count(), 1);
}

#[test]
fn custom_anchor_moves_the_hero() {
    let mut config = SceneConfig::default();
    config.grid.anchor = Vec3::new(1.0, -4.0, 2.0);
    let mut scene = SceneWorld::new(config);
    assert_eq!(scene.anchor(), Vec3::new(1.0, -4.0, 2.0));
    let neighbour = scene.cell("B2-1").expect("B2-1");
    assert_eq!(neighbour.translation, Vec3::new(-2.5, -4.0, 0.0));
}

#[test]
fn unknown_hero_label_falls_back_to_the_default_hero() {
    let mut config = SceneConfig::default();
    config.grid.hero_label = "Z9-9".to_string();
    let mut scene = SceneWorld::new(config);
    let visible: Vec<_> = scene.cells().into_iter().filter(|cell| cell.visible).collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].label, "B2-2");
    assert_eq!(visible[0].translation, Vec3::new(0.0, -8.0, 0.0));
    assert_eq!(scene.hero_entity(), Some(visible[0].entity));
}
