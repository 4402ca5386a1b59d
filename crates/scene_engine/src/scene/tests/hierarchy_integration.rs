//! Parent/child ownership, cascading destroy and world transforms

use crate::assets::{AssetStore, Material, MaterialHandle, Mesh, MeshHandle};
use crate::foundation::math::constants::HALF_PI;
use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::scene::{Scene, SceneError, SceneRef, Transform};
use approx::assert_relative_eq;

struct Fixture {
    scene: Scene,
    mesh: MeshHandle,
    material: MaterialHandle,
}

impl Fixture {
    fn new() -> Self {
        let mut meshes = AssetStore::new();
        let mut materials = AssetStore::new();
        Self {
            scene: Scene::new(),
            mesh: meshes.insert(Mesh::new("tower", "Assets/Models/AirTower.obj")),
            material: materials.insert(Material::new("tower")),
        }
    }

    fn root(&mut self) -> SceneRef {
        self.scene.spawn(self.mesh, self.material)
    }

    fn child_of(&mut self, parent: SceneRef) -> SceneRef {
        self.scene
            .spawn_child(parent, self.mesh, self.material, Transform::identity())
            .unwrap()
    }
}

#[test]
fn test_three_level_cascade_scenario() {
    let mut f = Fixture::new();
    let a = f.root();
    let b = f.child_of(a);
    let c = f.child_of(b);

    assert_eq!(f.scene.entity_count(), 3);
    assert_eq!(f.scene.entities().count(), 3);
    assert_eq!(f.scene.top_level_count(), 1);

    assert_eq!(f.scene.destroy_entity(a), 3);

    assert_eq!(f.scene.entity_count(), 0);
    assert_eq!(f.scene.entities().count(), 0);
    assert_eq!(f.scene.top_level_count(), 0);
    for handle in [a, b, c] {
        assert!(f.scene.resolve(handle).is_none());
    }
}

#[test]
fn test_cascade_shrinks_lists_by_subtree_size() {
    let mut f = Fixture::new();
    let keep = f.root();
    let doomed = f.root();
    let d1 = f.child_of(doomed);
    let d2 = f.child_of(doomed);
    let d1a = f.child_of(d1);
    let kept_child = f.child_of(keep);

    assert_eq!(f.scene.entity_count(), 6);
    assert_eq!(f.scene.entities().count(), 6);
    assert_eq!(f.scene.top_level_count(), 2);

    assert_eq!(f.scene.destroy_entity(doomed), 4);

    assert_eq!(f.scene.entity_count(), 2);
    let remaining: Vec<SceneRef> = f.scene.entities().map(|(handle, _)| handle).collect();
    assert_eq!(remaining, vec![keep, kept_child]);
    assert_eq!(f.scene.top_level(), &[keep]);
    for handle in [doomed, d1, d2, d1a] {
        assert!(!f.scene.contains(handle));
    }
    assert!(f.scene.contains(keep));
    assert!(f.scene.contains(kept_child));
    assert_eq!(f.scene.free_slot_count(), 4);
}

#[test]
fn test_destroying_one_child_keeps_siblings_and_parent() {
    let mut f = Fixture::new();
    let parent = f.root();
    let first = f.child_of(parent);
    let second = f.child_of(parent);
    let third = f.child_of(parent);

    assert_eq!(f.scene.destroy_entity(second), 1);

    assert!(f.scene.contains(parent));
    assert!(f.scene.contains(first));
    assert!(f.scene.contains(third));
    assert_eq!(f.scene.resolve(parent).unwrap().children(), &[first, third]);
    assert_eq!(f.scene.top_level(), &[parent]);
}

#[test]
fn test_add_child_then_remove_child() {
    let mut f = Fixture::new();
    let p = f.root();
    let c = f.root();
    assert_eq!(f.scene.top_level(), &[p, c]);

    f.scene.add_child(p, c).unwrap();
    assert_eq!(f.scene.resolve(p).unwrap().children(), &[c]);
    assert_eq!(f.scene.resolve(c).unwrap().parent(), Some(p));
    assert!(!f.scene.top_level().contains(&c));

    assert_eq!(f.scene.remove_child(p, c), Ok(true));
    assert!(f.scene.resolve(p).unwrap().children().is_empty());
    assert!(f.scene.resolve(c).unwrap().is_top_level());
    assert!(f.scene.top_level().contains(&c));
    assert_eq!(f.scene.entity_count(), 2);
}

#[test]
fn test_remove_child_of_wrong_parent_is_noop() {
    let mut f = Fixture::new();
    let p = f.root();
    let other = f.root();
    let c = f.child_of(p);

    assert_eq!(f.scene.remove_child(other, c), Ok(false));
    assert_eq!(f.scene.resolve(c).unwrap().parent(), Some(p));
    assert_eq!(f.scene.top_level(), &[p, other]);
}

#[test]
fn test_add_child_rejects_second_parent() {
    let mut f = Fixture::new();
    let p1 = f.root();
    let p2 = f.root();
    let c = f.child_of(p1);

    assert_eq!(
        f.scene.add_child(p2, c),
        Err(SceneError::AlreadyParented { child: c, parent: p1 })
    );
    // Re-attaching to the current parent is fine and does not duplicate
    assert_eq!(f.scene.add_child(p1, c), Ok(()));
    assert_eq!(f.scene.resolve(p1).unwrap().children(), &[c]);

    // Explicit detach, then attach elsewhere
    f.scene.remove_child(p1, c).unwrap();
    f.scene.add_child(p2, c).unwrap();
    assert_eq!(f.scene.resolve(c).unwrap().parent(), Some(p2));
    assert!(!f.scene.top_level().contains(&c));
}

#[test]
fn test_add_child_rejects_cycles() {
    let mut f = Fixture::new();
    let root = f.root();
    let mid = f.child_of(root);
    let leaf = f.child_of(mid);

    assert_eq!(
        f.scene.add_child(root, root),
        Err(SceneError::CyclicHierarchy { parent: root, child: root })
    );
    assert_eq!(
        f.scene.add_child(leaf, root),
        Err(SceneError::CyclicHierarchy { parent: leaf, child: root })
    );
    assert_eq!(f.scene.top_level(), &[root]);
}

#[test]
fn test_hierarchy_ops_reject_stale_handles() {
    let mut f = Fixture::new();
    let p = f.root();
    let gone = f.root();
    f.scene.destroy_entity(gone);

    assert_eq!(f.scene.add_child(p, gone), Err(SceneError::InvalidHandle(gone)));
    assert_eq!(f.scene.add_child(gone, p), Err(SceneError::InvalidHandle(gone)));
    assert_eq!(f.scene.remove_child(p, gone), Err(SceneError::InvalidHandle(gone)));
    assert!(f.scene.resolve(p).unwrap().children().is_empty());
}

#[test]
fn test_reparented_subtree_is_destroyed_with_new_parent() {
    let mut f = Fixture::new();
    let old_parent = f.root();
    let new_parent = f.root();
    let child = f.child_of(old_parent);
    let grandchild = f.child_of(child);

    f.scene.remove_child(old_parent, child).unwrap();
    f.scene.add_child(new_parent, child).unwrap();

    assert_eq!(f.scene.destroy_entity(new_parent), 3);
    assert!(!f.scene.contains(grandchild));
    assert!(f.scene.contains(old_parent));
    assert_eq!(f.scene.top_level(), &[old_parent]);
}

#[test]
fn test_moved_subtree_leaves_entity_list_by_its_size() {
    let mut f = Fixture::new();
    let keep = f.root();
    let a = f.root();
    let b = f.child_of(a);
    let c = f.child_of(b);
    let d = f.root();
    assert_eq!(f.scene.entities().count(), 5);

    f.scene.remove_child(a, b).unwrap();
    f.scene.add_child(d, b).unwrap();
    assert_eq!(f.scene.destroy_entity(d), 3);

    assert_eq!(f.scene.entities().count(), 2);
    assert_eq!(f.scene.entity_count(), 2);
    assert_eq!(f.scene.top_level(), &[keep, a]);
    assert!(!f.scene.contains(c));

    // Lowest freed slot is handed out next
    let next = f.root();
    assert_eq!(next.index(), 2);
}

#[test]
fn test_self_destroy_routes_through_scene() {
    let mut f = Fixture::new();
    let parent = f.root();
    let child = f.child_of(parent);

    let own_handle = f.scene.resolve(child).unwrap().handle();
    assert_eq!(own_handle.destroy(&mut f.scene), 1);

    assert!(!child.is_alive(&f.scene));
    assert!(f.scene.resolve(parent).unwrap().children().is_empty());
}

#[test]
fn test_world_matrix_composes_parent_chain() {
    let mut f = Fixture::new();
    let parent = f
        .scene
        .spawn_entity(
            f.mesh,
            f.material,
            None,
            Transform::from_parts(
                Vec3::new(10.0, 0.0, 0.0),
                Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI),
                Vec3::new(2.0, 2.0, 2.0),
            ),
        )
        .unwrap();
    let child = f
        .scene
        .spawn_child(parent, f.mesh, f.material, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
        .unwrap();

    // Child offset (1,0,0) is scaled to (2,0,0), rotated to (0,0,-2), then moved by (10,0,0)
    let position = f.scene.world_position(child).unwrap();
    assert_relative_eq!(position, Vec3::new(10.0, 0.0, -2.0), epsilon = 1e-5);

    let expected = f.scene.resolve(parent).unwrap().transform().to_matrix()
        * f.scene.resolve(child).unwrap().transform().to_matrix();
    assert_relative_eq!(f.scene.world_matrix(child).unwrap(), expected, epsilon = 1e-5);
}

#[test]
fn test_world_matrix_follows_reparenting() {
    let mut f = Fixture::new();
    let mover = f
        .scene
        .spawn_entity(f.mesh, f.material, None, Transform::from_position(Vec3::new(0.0, 5.0, 0.0)))
        .unwrap();
    let thing = f
        .scene
        .spawn_entity(f.mesh, f.material, None, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
        .unwrap();

    assert_relative_eq!(
        f.scene.world_matrix(thing).unwrap(),
        Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0))
    );

    f.scene.add_child(mover, thing).unwrap();
    assert_relative_eq!(
        f.scene.world_position(thing).unwrap(),
        Vec3::new(1.0, 5.0, 0.0),
        epsilon = 1e-6
    );
}

#[test]
fn test_set_world_position_under_parent() {
    let mut f = Fixture::new();
    let parent = f
        .scene
        .spawn_entity(
            f.mesh,
            f.material,
            None,
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0)).with_uniform_scale(3.0),
        )
        .unwrap();
    let child = f.child_of(parent);

    f.scene.set_world_position(child, Vec3::new(-4.0, 0.0, 5.0)).unwrap();

    assert_relative_eq!(
        f.scene.world_position(child).unwrap(),
        Vec3::new(-4.0, 0.0, 5.0),
        epsilon = 1e-5
    );
    assert_relative_eq!(
        f.scene.resolve(child).unwrap().transform().position,
        Vec3::new(-4.0 / 3.0, 0.0, 0.0),
        epsilon = 1e-5
    );
}

#[test]
fn test_set_world_position_with_degenerate_parent() {
    let mut f = Fixture::new();
    let flat = f
        .scene
        .spawn_entity(
            f.mesh,
            f.material,
            None,
            Transform::identity().with_scale(Vec3::new(1.0, 0.0, 1.0)),
        )
        .unwrap();
    let child = f.child_of(flat);

    assert_eq!(
        f.scene.set_world_position(child, Vec3::new(1.0, 1.0, 1.0)),
        Err(SceneError::DegenerateTransform(child))
    );
    // Zero scale still composes to a finite matrix
    let world = f.scene.world_matrix(child).unwrap();
    assert!(world.iter().all(|v| v.is_finite()));
}

#[test]
fn test_set_world_rotation_under_rotated_parent() {
    let mut f = Fixture::new();
    let parent = f
        .scene
        .spawn_entity(
            f.mesh,
            f.material,
            None,
            Transform::identity().with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI)),
        )
        .unwrap();
    let child = f.child_of(parent);

    // Child inherits the parent rotation until told otherwise
    assert_relative_eq!(
        f.scene.world_rotation(child).unwrap(),
        Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI),
        epsilon = 1e-6
    );

    f.scene.set_world_rotation(child, Quat::identity()).unwrap();

    assert_relative_eq!(f.scene.world_rotation(child).unwrap(), Quat::identity(), epsilon = 1e-6);
    assert_relative_eq!(
        f.scene.resolve(child).unwrap().transform().rotation,
        Quat::from_axis_angle(&Vec3::y_axis(), -HALF_PI),
        epsilon = 1e-6
    );
}

#[test]
fn test_set_world_rotation_on_top_level_is_local() {
    let mut f = Fixture::new();
    let root = f.root();
    let turned = Quat::from_euler_angles(0.0, HALF_PI, 0.0);

    f.scene.set_world_rotation(root, turned).unwrap();
    assert_relative_eq!(f.scene.resolve(root).unwrap().transform().rotation, turned, epsilon = 1e-6);

    f.scene.destroy_entity(root);
    assert_eq!(f.scene.set_world_rotation(root, turned), Err(SceneError::InvalidHandle(root)));
    assert!(f.scene.world_rotation(root).is_none());
}
