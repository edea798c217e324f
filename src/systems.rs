//! # Systems
//!
//! Built-in systems, run by the application runner after every [crate::Application::update].

use crate::ComputedVisibility;
use crate::LocalTransform;
use crate::Node;
use crate::Scene;
use crate::Visibility;
use crate::WorldTransform;

/// Runs all of the built-in systems.
pub fn run(scene: &Scene) {
    compute_visibility(scene);
    compute_world_transform(scene);
}

/// Computes the visibility for all of the nodes in the scene.
pub fn compute_visibility(scene: &Scene) {
    let mut pending: Vec<(Node, ComputedVisibility)> = scene
        .get_root_nodes()
        .map(|node| (node, ComputedVisibility::Visible))
        .collect();

    while let Some((node, parent_visibility)) = pending.pop() {
        let visibility = match scene.get::<Visibility>(node) {
            Some(Visibility::Visible) => ComputedVisibility::Visible,
            Some(Visibility::Invisible) => ComputedVisibility::Invisible,
            Some(Visibility::Inherit) | None => parent_visibility,
        };

        scene.set_or_add(node, visibility);

        for child in scene.get_children(node).unwrap_or(&[]) {
            pending.push((*child, visibility));
        }
    }
}

/// Computes the world transform for all of the nodes in the scene with a [LocalTransform]
/// component. Nodes without one pass their parent's transform on to their children.
pub fn compute_world_transform(scene: &Scene) {
    let mut pending: Vec<(Node, WorldTransform)> = scene
        .get_root_nodes()
        .map(|node| (node, WorldTransform::IDENTITY))
        .collect();

    while let Some((node, parent_transform)) = pending.pop() {
        let transform = match scene.get::<LocalTransform>(node) {
            Some(local) => {
                let transform = WorldTransform::new(parent_transform.matrix * local.matrix());
                scene.set_or_add(node, transform);
                transform
            }
            None => {
                scene.remove::<WorldTransform>(node);
                parent_transform
            }
        };

        for child in scene.get_children(node).unwrap_or(&[]) {
            pending.push((*child, transform));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::ops::Deref;

    use glam::Quat;
    use glam::Vec3;

    use super::*;
    use crate::ComponentEvent;

    fn chain(scene: &mut Scene) -> (Node, Node, Node) {
        let root = scene.spawn();
        let child = scene.spawn();
        let grandchild = scene.spawn();
        scene.set_parent(child, root).unwrap();
        scene.set_parent(grandchild, child).unwrap();
        (root, child, grandchild)
    }

    #[test]
    fn compute_visibility_without_components_returns_visible() {
        let mut scene = Scene::new();
        let (root, child, grandchild) = chain(&mut scene);

        compute_visibility(&scene);

        for node in [root, child, grandchild] {
            assert_eq!(
                scene.get::<ComputedVisibility>(node),
                Some(ComputedVisibility::Visible)
            );
        }
    }

    #[test]
    fn compute_visibility_invisible_parent_hides_inheriting_children() {
        let mut scene = Scene::new();
        let (root, child, grandchild) = chain(&mut scene);
        scene.add(root, Visibility::Invisible);
        scene.add(child, Visibility::Inherit);

        compute_visibility(&scene);

        assert_eq!(
            scene.get::<ComputedVisibility>(child),
            Some(ComputedVisibility::Invisible)
        );
        assert_eq!(
            scene.get::<ComputedVisibility>(grandchild),
            Some(ComputedVisibility::Invisible)
        );
    }

    #[test]
    fn compute_visibility_visible_child_overrides_invisible_parent() {
        let mut scene = Scene::new();
        let (root, child, grandchild) = chain(&mut scene);
        scene.add(root, Visibility::Invisible);
        scene.add(child, Visibility::Visible);

        compute_visibility(&scene);

        assert_eq!(
            scene.get::<ComputedVisibility>(root),
            Some(ComputedVisibility::Invisible)
        );
        assert_eq!(
            scene.get::<ComputedVisibility>(child),
            Some(ComputedVisibility::Visible)
        );
        assert_eq!(
            scene.get::<ComputedVisibility>(grandchild),
            Some(ComputedVisibility::Visible)
        );
    }

    #[test]
    fn compute_visibility_unchanged_events_returns_empty() {
        let mut scene = Scene::new();
        let (root, _, _) = chain(&mut scene);
        scene.add(root, Visibility::Visible);
        compute_visibility(&scene);
        scene.clear_events();

        compute_visibility(&scene);

        assert_eq!(scene.events::<ComputedVisibility>().deref(), &[]);
    }

    #[test]
    fn compute_visibility_change_events_returns_modified() {
        let mut scene = Scene::new();
        let root = scene.spawn();
        scene.add(root, Visibility::Visible);
        compute_visibility(&scene);
        scene.clear_events();

        scene.set(root, Visibility::Invisible);
        compute_visibility(&scene);

        assert_eq!(
            scene.events::<ComputedVisibility>().deref(),
            &[ComponentEvent::Modified(root)]
        );
    }

    #[test]
    fn compute_world_transform_composes_parent_transforms() {
        let mut scene = Scene::new();
        let (root, child, grandchild) = chain(&mut scene);
        scene.add(
            root,
            LocalTransform::new(
                Vec3::new(10.0, 0.0, 0.0),
                Quat::from_rotation_z(FRAC_PI_2),
                Vec3::ONE,
            ),
        );
        scene.add(child, LocalTransform::from_position(Vec3::X));
        scene.add(grandchild, LocalTransform::from_scale(Vec3::splat(2.0)));

        compute_world_transform(&scene);

        let child_position = scene.get::<WorldTransform>(child).unwrap().position();
        assert!(child_position.abs_diff_eq(Vec3::new(10.0, 1.0, 0.0), 1e-5));

        let grandchild_point = scene
            .get::<WorldTransform>(grandchild)
            .unwrap()
            .transform_point(Vec3::X);
        assert!(grandchild_point.abs_diff_eq(Vec3::new(10.0, 3.0, 0.0), 1e-5));
    }

    #[test]
    fn compute_world_transform_passes_through_nodes_without_local_transform() {
        let mut scene = Scene::new();
        let (root, child, grandchild) = chain(&mut scene);
        scene.add(root, LocalTransform::from_position(Vec3::Y));
        scene.add(grandchild, LocalTransform::from_position(Vec3::X));

        compute_world_transform(&scene);

        assert_eq!(scene.get::<WorldTransform>(child), None);
        let position = scene.get::<WorldTransform>(grandchild).unwrap().position();
        assert!(position.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn compute_world_transform_removed_local_transform_removes_world_transform() {
        let mut scene = Scene::new();
        let root = scene.spawn();
        scene.add(root, LocalTransform::IDENTITY);
        compute_world_transform(&scene);

        scene.remove::<LocalTransform>(root);
        compute_world_transform(&scene);

        assert_eq!(scene.get::<WorldTransform>(root), None);
    }

    #[test]
    fn run_handles_deep_hierarchies() {
        let mut scene = Scene::new();
        let root = scene.spawn();
        scene.add(root, Visibility::Invisible);
        let mut parent = root;
        for _ in 0..2_000 {
            let node = scene.spawn();
            scene.add(node, LocalTransform::from_position(Vec3::X));
            scene.set_parent(node, parent).unwrap();
            parent = node;
        }

        run(&scene);

        assert_eq!(
            scene.get::<ComputedVisibility>(parent),
            Some(ComputedVisibility::Invisible)
        );
        let position = scene.get::<WorldTransform>(parent).unwrap().position();
        assert!(position.abs_diff_eq(Vec3::new(2_000.0, 0.0, 0.0), 1e-2));
    }
}
