//! # Neighbourhood Scene
//!
//! Builds the demo scene: a ground plane, an instanced grid of houses with a
//! roof on each, and gizmos for the point and spot lights. Also applies the
//! inspector edits and drives the gizmo animation every frame.
//!
//! ## Layout
//!
//! ```text
//! neighbourhood (plane)
//! ├── point light gizmo
//! └── spot light gizmos [2]
//! houses (instanced cube)         instances: house transforms
//! roofs (instanced pyramid)       instances: roof transforms
//! ```
//!
//! House transforms are parented to the ground plane's transform, and each
//! roof transform to its house, so moving the plane or a single house carries
//! the roofs along. The two instanced objects stay top-level: their own
//! matrix is `mainObjectModel` and must not include the plane a second time.

use cgmath::{Matrix4, Vector3};

use crate::config::{DemoConfig, GridConfig};
use crate::error::SceneResult;
use crate::gfx::lighting::{LightState, SPOT_LIGHT_COUNT};
use crate::gfx::rendering::{InstanceBufferId, MeshHandle, ShaderHandle};
use crate::gfx::scene::{ObjectId, Renderable, Scene, Transform, TransformId};

/// Meshes, shaders and instance buffers the host loaded for the demo
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAssets {
    pub plane: MeshHandle,
    pub cube: MeshHandle,
    pub pyramid: MeshHandle,
    /// One mesh per weapon, in switch order
    pub guns: Vec<MeshHandle>,

    pub textured_shader: ShaderHandle,
    pub light_shader: ShaderHandle,
    pub basic_shader: ShaderHandle,
    pub gun_shader: ShaderHandle,

    pub house_instances: InstanceBufferId,
    pub roof_instances: InstanceBufferId,
}

/// Values the inspector panel edits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InspectorState {
    pub chosen_building: i32,
    /// Added to the chosen house's local position whenever it changes
    pub building_offset: Vector3<f32>,
    pub neighbourhood_position: Vector3<f32>,
    pub houses_position: Vector3<f32>,
    pub clear_color: [f32; 4],
}

impl Default for InspectorState {
    fn default() -> Self {
        Self {
            chosen_building: 0,
            building_offset: Vector3::new(0.0, 0.0, 0.0),
            neighbourhood_position: Vector3::new(0.0, 0.0, 0.0),
            houses_position: Vector3::new(0.0, 0.0, 0.0),
            clear_color: [0.22, 0.22, 0.22, 1.0],
        }
    }
}

/// Handles into the scene built by [`Neighbourhood::build`]
#[derive(Debug, Clone)]
pub struct Neighbourhood {
    pub root: ObjectId,
    pub houses: ObjectId,
    pub roofs: ObjectId,
    pub point_gizmo: ObjectId,
    pub spot_gizmos: [ObjectId; SPOT_LIGHT_COUNT],
    house_transforms: Vec<TransformId>,
    applied: InspectorState,
    gizmo_spin: f32,
    orbit_radius: f32,
}

impl Neighbourhood {
    /// Adds the neighbourhood to `scene`
    pub fn build(scene: &mut Scene, assets: &SceneAssets, config: &DemoConfig) -> SceneResult<Self> {
        let grid = &config.grid;

        let root = scene.add_object(
            "neighbourhood",
            Some(Renderable::new(assets.plane, assets.textured_shader)),
        );
        let root_transform = scene[root].transform_id();

        let mut house_transforms = Vec::with_capacity(grid.house_count());
        let mut roof_transforms = Vec::with_capacity(grid.house_count());

        for row in 0..grid.rows {
            for column in 0..grid.columns {
                let mut house = Transform::new();
                house.set_world_matrix(house_placement(grid, row, column));
                let house = scene.graph_mut().insert(house);
                scene.graph_mut().set_parent(house, root_transform)?;

                let roof = scene
                    .graph_mut()
                    .insert(Transform::from_position(grid.roof_offset));
                scene.graph_mut().set_parent(roof, house)?;

                house_transforms.push(house);
                roof_transforms.push(roof);
            }
        }

        let houses = scene.add_instanced_object(
            "houses",
            Renderable::new(assets.cube, assets.light_shader),
            assets.house_instances,
            house_transforms.clone(),
        )?;
        let roofs = scene.add_instanced_object(
            "roofs",
            Renderable::new(assets.pyramid, assets.light_shader),
            assets.roof_instances,
            roof_transforms,
        )?;

        let gizmo_scale = Vector3::new(config.gizmo_scale, config.gizmo_scale, config.gizmo_scale);
        let add_gizmo = |scene: &mut Scene, name: &str, mesh: MeshHandle| -> SceneResult<ObjectId> {
            let gizmo = scene.add_object(name, Some(Renderable::new(mesh, assets.basic_shader)));
            scene.transform_mut(gizmo).set_local_scale(gizmo_scale);
            scene.add_child(root, gizmo)?;
            Ok(gizmo)
        };

        let point_gizmo = add_gizmo(scene, "point_light", assets.cube)?;
        let spot_gizmos = [
            add_gizmo(scene, "spot_light_0", assets.pyramid)?,
            add_gizmo(scene, "spot_light_1", assets.pyramid)?,
        ];

        log::info!(
            "built neighbourhood: {}x{} houses, {} transforms",
            grid.rows,
            grid.columns,
            scene.graph().len()
        );

        Ok(Self {
            root,
            houses,
            roofs,
            point_gizmo,
            spot_gizmos,
            house_transforms,
            applied: InspectorState::default(),
            gizmo_spin: config.gizmo_spin,
            orbit_radius: config.orbit_radius,
        })
    }

    /// Top-level objects in update and draw order
    pub fn roots(&self) -> [ObjectId; 3] {
        [self.root, self.houses, self.roofs]
    }

    pub fn house_count(&self) -> usize {
        self.house_transforms.len()
    }

    /// Transform of house `index`, if it exists
    pub fn house(&self, index: usize) -> Option<TransformId> {
        self.house_transforms.get(index).copied()
    }

    /// Clamps an inspector building index into the house range
    pub fn clamp_building(&self, index: i32) -> usize {
        let last = self.house_transforms.len().saturating_sub(1);
        let clamped = index.clamp(0, last as i32) as usize;
        if clamped as i64 != index as i64 {
            log::warn!("building index {} out of range, using {}", index, clamped);
        }
        clamped
    }

    /// Applies whatever changed in `inspector` since the previous call
    pub fn apply_inspector(&mut self, scene: &mut Scene, inspector: &InspectorState) {
        if inspector.building_offset != self.applied.building_offset {
            if let Some(house) = self.house(self.clamp_building(inspector.chosen_building)) {
                let transform = &mut scene.graph_mut()[house];
                let position = transform.local_position();
                transform.set_local_position(position + inspector.building_offset);
            }
        }

        if inspector.neighbourhood_position != self.applied.neighbourhood_position {
            scene
                .transform_mut(self.root)
                .set_local_position(inspector.neighbourhood_position);
        }

        if inspector.houses_position != self.applied.houses_position {
            scene
                .transform_mut(self.houses)
                .set_local_position(inspector.houses_position);
        }

        self.applied = *inspector;
    }

    /// Moves the light gizmos for time `time` (seconds).
    ///
    /// The point light orbits in the XY plane and follows its gizmo; the spot
    /// gizmos follow the spot light parameters.
    pub fn animate_gizmos(&self, scene: &mut Scene, lights: &mut LightState, time: f32) {
        let spin = self.gizmo_spin * time;
        let radius = self.orbit_radius;
        let position = Vector3::new(
            radius * time.sin(),
            radius + radius * time.cos(),
            0.0,
        );

        let point = scene.transform_mut(self.point_gizmo);
        let roll = point.local_rotation().z;
        point.set_local_rotation(Vector3::new(spin, spin, roll));
        point.set_local_position(position);
        lights.point_light.position = position;

        for (gizmo, spot) in self.spot_gizmos.iter().zip(lights.spot_lights.iter()) {
            let transform = scene.transform_mut(*gizmo);
            transform.set_local_position(spot.position);
            transform.set_local_rotation(spot.direction);
        }
    }
}

/// World placement of the house at (`row`, `column`)
fn house_placement(grid: &GridConfig, row: u32, column: u32) -> Matrix4<f32> {
    let offset = Vector3::new(
        (column + 1) as f32 * grid.spacing,
        grid.house_height,
        row as f32 * grid.spacing,
    );
    Matrix4::from_translation(grid.origin + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::recording::RecordingBackend;
    use cgmath::Zero;

    fn assets() -> SceneAssets {
        SceneAssets {
            plane: MeshHandle(0),
            cube: MeshHandle(1),
            pyramid: MeshHandle(2),
            guns: vec![MeshHandle(3)],
            textured_shader: ShaderHandle(0),
            light_shader: ShaderHandle(1),
            basic_shader: ShaderHandle(2),
            gun_shader: ShaderHandle(3),
            house_instances: InstanceBufferId(0),
            roof_instances: InstanceBufferId(1),
        }
    }

    fn small() -> (Scene, Neighbourhood, RecordingBackend) {
        let config = DemoConfig::default().with_grid(GridConfig::default().with_size(2, 3));
        let mut scene = Scene::new();
        let neighbourhood = Neighbourhood::build(&mut scene, &assets(), &config).unwrap();
        let mut backend = RecordingBackend::new();
        update(&mut scene, &neighbourhood, &mut backend);
        (scene, neighbourhood, backend)
    }

    fn update(
        scene: &mut Scene,
        neighbourhood: &Neighbourhood,
        backend: &mut RecordingBackend,
    ) -> usize {
        neighbourhood
            .roots()
            .iter()
            .map(|root| scene.update(*root, backend))
            .sum()
    }

    fn origin_of(scene: &Scene, id: TransformId) -> Vector3<f32> {
        scene.graph()[id].transform_point(Vector3::zero())
    }

    #[test]
    fn test_grid_layout() {
        let (scene, neighbourhood, _) = small();
        assert_eq!(neighbourhood.house_count(), 6);

        // Row 1, column 2
        let house = neighbourhood.house(5).unwrap();
        assert_eq!(origin_of(&scene, house), Vector3::new(-391.0, 1.5, -397.0));

        let roof = scene.graph().children(house)[0];
        assert_eq!(origin_of(&scene, roof), Vector3::new(-391.0, 3.5, -397.0));
    }

    #[test]
    fn test_first_update_uploads_both_groups() {
        let (mut scene, neighbourhood, mut backend) = small();
        assert_eq!(backend.uploads().len(), 2);
        assert_eq!(update(&mut scene, &neighbourhood, &mut backend), 0);

        backend.calls.clear();
        // plane + three gizmos, then houses and roofs
        assert_eq!(scene.draw(neighbourhood.root, &mut backend), 4);
        assert_eq!(scene.draw(neighbourhood.houses, &mut backend), 1);
        assert_eq!(scene.draw(neighbourhood.roofs, &mut backend), 1);
    }

    #[test]
    fn test_building_offset_moves_house_and_roof() {
        let (mut scene, mut neighbourhood, mut backend) = small();
        let house = neighbourhood.house(1).unwrap();
        let before = origin_of(&scene, house);

        let inspector = InspectorState {
            chosen_building: 1,
            building_offset: Vector3::new(0.0, 1.0, 0.0),
            ..InspectorState::default()
        };
        neighbourhood.apply_inspector(&mut scene, &inspector);
        // Unchanged values are not applied twice
        neighbourhood.apply_inspector(&mut scene, &inspector);

        assert_eq!(update(&mut scene, &neighbourhood, &mut backend), 2);
        assert_eq!(origin_of(&scene, house), before + Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_building_index_is_clamped() {
        let (mut scene, mut neighbourhood, mut backend) = small();
        let last = neighbourhood.house(5).unwrap();
        let before = origin_of(&scene, last);

        let inspector = InspectorState {
            chosen_building: 99,
            building_offset: Vector3::new(1.0, 0.0, 0.0),
            ..InspectorState::default()
        };
        neighbourhood.apply_inspector(&mut scene, &inspector);
        update(&mut scene, &neighbourhood, &mut backend);

        assert_eq!(origin_of(&scene, last), before + Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(neighbourhood.clamp_building(-3), 0);
    }

    /// What the light shader sees for an instance: group matrix times instance matrix
    fn drawn_origin(scene: &Scene, group: ObjectId, instance: TransformId) -> Vector3<f32> {
        let model = scene.world_matrix(group) * scene.graph().world_matrix(instance);
        (model * Vector3::<f32>::zero().extend(1.0)).truncate()
    }

    #[test]
    fn test_neighbourhood_position_moves_instances_once() {
        let (mut scene, mut neighbourhood, mut backend) = small();
        let house = neighbourhood.house(0).unwrap();
        let roof = scene.graph().children(house)[0];
        let house_before = drawn_origin(&scene, neighbourhood.houses, house);
        let roof_before = drawn_origin(&scene, neighbourhood.roofs, roof);

        let inspector = InspectorState {
            neighbourhood_position: Vector3::new(0.0, 0.0, 5.0),
            ..InspectorState::default()
        };
        neighbourhood.apply_inspector(&mut scene, &inspector);
        assert_eq!(update(&mut scene, &neighbourhood, &mut backend), 2);

        let shift = Vector3::new(0.0, 0.0, 5.0);
        assert_eq!(
            scene.world_matrix(neighbourhood.houses),
            &Matrix4::from_scale(1.0)
        );
        assert_eq!(
            drawn_origin(&scene, neighbourhood.houses, house),
            house_before + shift
        );
        assert_eq!(
            drawn_origin(&scene, neighbourhood.roofs, roof),
            roof_before + shift
        );
        assert_eq!(
            scene.world_matrix(neighbourhood.root),
            &Matrix4::from_translation(shift)
        );
    }

    #[test]
    fn test_houses_position_moves_group_matrix_only() {
        let (mut scene, mut neighbourhood, mut backend) = small();
        let inspector = InspectorState {
            houses_position: Vector3::new(2.0, 0.0, 0.0),
            ..InspectorState::default()
        };
        neighbourhood.apply_inspector(&mut scene, &inspector);

        // Instances hang off the plane, so nothing is re-uploaded
        assert_eq!(update(&mut scene, &neighbourhood, &mut backend), 0);
        let group = scene.transform(neighbourhood.houses).transform_point(Vector3::zero());
        assert_eq!(group, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_point_gizmo_orbit_feeds_light() {
        let (mut scene, neighbourhood, _) = small();
        let mut lights = LightState::default();
        lights.spot_lights[1].position = Vector3::new(1.0, 2.0, 3.0);

        neighbourhood.animate_gizmos(&mut scene, &mut lights, 0.0);
        assert_eq!(lights.point_light.position, Vector3::new(0.0, 20.0, 0.0));

        neighbourhood.animate_gizmos(&mut scene, &mut lights, 2.0);
        let point = scene.transform(neighbourhood.point_gizmo);
        assert_eq!(point.local_rotation(), Vector3::new(30.0, 30.0, 0.0));
        assert_eq!(point.local_position(), lights.point_light.position);
        assert_eq!(point.local_scale(), Vector3::new(0.2, 0.2, 0.2));

        let spot = scene.transform(neighbourhood.spot_gizmos[1]);
        assert_eq!(spot.local_position(), Vector3::new(1.0, 2.0, 3.0));
    }
}
