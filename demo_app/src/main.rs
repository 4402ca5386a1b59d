//! Tower defence scene demo
//!
//! Builds the tower defence scene (skybox, battleship and the four elemental
//! towers mounted on it), walks it the way a renderer would each frame, then
//! sinks the battleship and shows that its towers go down with it.
//!
//! Usage: `tower_demo [config.toml|config.ron]`

use scene_engine::foundation::logging;
use scene_engine::prelude::*;

/// Scene handles the demo keeps hold of between steps
struct TowerScene {
    sky_box: SceneRef,
    battleship: SceneRef,
    towers: Vec<SceneRef>,
}

fn load_config() -> Result<EngineConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn build_scene(
    scene: &mut Scene,
    meshes: &mut AssetStore<Mesh>,
    materials: &mut AssetStore<Material>,
) -> Result<TowerScene, SceneError> {
    let cube = meshes.insert(Mesh::new("cube", "Assets/Models/cube.obj"));
    let hull = meshes.insert(Mesh::new("battleship", "Assets/Models/Battleship_TB.obj"));
    let sky = materials.insert(Material::new("sky_box"));
    let steel = materials.insert(Material::new("battleship").with_color(0.6, 0.6, 0.65));

    let sky_box = scene.spawn(cube, sky);
    scene.add_tag(sky_box, "sky")?;

    let battleship = scene.spawn_entity(
        hull,
        steel,
        None,
        Transform::from_position(Vec3::new(0.0, 0.0, 5.0)).with_uniform_scale(3.0),
    )?;
    scene.add_tag(battleship, "ship")?;

    let towers = [
        ("lightning", "Assets/Models/LightningTower.obj", (0.9, 0.9, 0.2), -4.0),
        ("air", "Assets/Models/AirTower.obj", (0.8, 0.9, 1.0), -8.0),
        ("water", "Assets/Models/WaterTower.obj", (0.2, 0.4, 0.9), 4.0),
        ("fire", "Assets/Models/FireTower.obj", (0.9, 0.3, 0.1), 8.0),
    ];

    let mut handles = Vec::with_capacity(towers.len());
    for (name, source, (r, g, b), x) in towers {
        let mesh = meshes.insert(Mesh::new(format!("{name}_tower"), source));
        let material = materials.insert(Material::new(name).with_color(r, g, b));

        let tower = scene.spawn_child(battleship, mesh, material, Transform::identity())?;
        scene.set_world_position(tower, Vec3::new(x, 0.0, 5.0))?;
        scene.set_world_rotation(tower, Quat::identity())?;
        scene.add_tag(tower, "tower")?;
        scene.add_tag(tower, name)?;
        handles.push(tower);
    }

    Ok(TowerScene {
        sky_box,
        battleship,
        towers: handles,
    })
}

fn log_frame(scene: &Scene) {
    let list = RenderList::extract(scene);
    log::info!(
        "Frame: {} entities ({} top-level), {} draws in {} batches",
        scene.entity_count(),
        scene.top_level_count(),
        list.item_count(),
        list.batch_count()
    );

    for item in list.items() {
        log::debug!(
            "  draw {} at ({:.2}, {:.2}, {:.2})",
            item.entity,
            item.world[(0, 3)],
            item.world[(1, 3)],
            item.world[(2, 3)]
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log.level);

    log::info!("Starting tower demo");

    let mut meshes = AssetStore::new();
    let mut materials = AssetStore::new();
    let mut scene = Scene::with_config(config.scene.clone());

    let handles = build_scene(&mut scene, &mut meshes, &mut materials)?;
    log::info!(
        "Loaded {} meshes and {} materials into {}",
        meshes.len(),
        materials.len(),
        scene.id()
    );
    log_frame(&scene);

    let towers = scene.entities_with_tag("tower");
    log::info!("{} towers on the battleship", towers.len());

    // One tower is knocked off the ship before it sinks
    if let Some(&survivor) = handles.towers.first() {
        scene.remove_child(handles.battleship, survivor)?;
        log::info!("{} detached; now top-level", survivor);
    }

    let sunk = handles.battleship.destroy(&mut scene);
    log::info!("Battleship sunk, {} entities destroyed", sunk);

    for tower in &handles.towers {
        log::info!(
            "Tower {} {}",
            tower,
            if tower.is_alive(&scene) { "survived" } else { "went down" }
        );
    }

    // Stale handles are rejected, never aliased
    if scene.resolve(handles.battleship).is_none() {
        log::info!("Battleship handle {} is stale", handles.battleship);
    }
    log::info!("Sky box still present: {}", handles.sky_box.is_alive(&scene));

    log_frame(&scene);
    log::info!("Tower demo finished");
    Ok(())
}
