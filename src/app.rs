//! Per-frame orchestration of the neighbourhood demo
//!
//! [`NeighbourhoodApp`] owns the scene, the weapons, the lights and the
//! inspector values. The host owns the window, the ImGui context and the GPU;
//! it forwards window events here and calls [`NeighbourhoodApp::frame`] once
//! per redraw with something that implements both rendering traits.

use cgmath::{Matrix4, Vector3};
use winit::event::WindowEvent;

use crate::config::DemoConfig;
use crate::error::AppError;
use crate::gfx::lighting::{LightManager, LightState};
use crate::gfx::rendering::{InstanceUpload, RenderBackend};
use crate::gfx::scene::{Renderable, Scene, Transform};
use crate::gun::GunManager;
use crate::input::{self, GunCommand};
use crate::neighbourhood::{InspectorState, Neighbourhood, SceneAssets};

/// Counters for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// World matrices recomputed during the frame
    pub transforms_recomputed: u64,
    pub draw_calls: u32,
    /// Instance buffers rewritten during the frame
    pub instance_uploads: usize,
}

pub struct NeighbourhoodApp {
    config: DemoConfig,
    scene: Scene,
    neighbourhood: Neighbourhood,
    guns: GunManager,
    lights: LightManager,
    inspector: InspectorState,
}

impl NeighbourhoodApp {
    /// Builds the scene, registers one weapon per gun mesh and hooks the
    /// shaders up to the light manager
    pub fn new(config: DemoConfig, assets: &SceneAssets) -> Result<Self, AppError> {
        // Houses and roofs plus a handful of structural nodes
        let mut scene = Scene::with_capacity(config.grid.house_count() * 2 + 16);
        let neighbourhood = Neighbourhood::build(&mut scene, assets, &config)?;

        let mut guns = GunManager::from_config(&config.gun);
        for (i, mesh) in assets.guns.iter().enumerate() {
            let mut rest = Transform::from_position(config.gun.rest_position);
            let rotation = config.gun.rest_rotation;
            rest.set_local_rotation(Vector3::new(
                rotation.x,
                rotation.y,
                config.gun.recoil.rest_rotation(),
            ));

            let object = scene.add_object_with_transform(
                &format!("gun_{}", i),
                rest,
                Some(Renderable::new(*mesh, assets.gun_shader)),
            );
            guns.add_gun(&scene, object, config.gun.capacity, config.gun.recoil)?;
        }

        let mut lights = LightManager::new(LightState::default());
        lights.add_shader(assets.light_shader);
        lights.add_shader(assets.textured_shader);
        lights.add_shader(assets.gun_shader);
        lights.add_gizmo_shader(assets.basic_shader);

        log::info!(
            "neighbourhood ready: {} objects, {} weapons",
            scene.object_count(),
            guns.gun_count()
        );

        Ok(Self {
            config,
            scene,
            neighbourhood,
            guns,
            lights,
            inspector: InspectorState::default(),
        })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn neighbourhood(&self) -> &Neighbourhood {
        &self.neighbourhood
    }

    pub fn guns(&self) -> &GunManager {
        &self.guns
    }

    pub fn lights(&self) -> &LightState {
        &self.lights.state
    }

    pub fn inspector_mut(&mut self) -> &mut InspectorState {
        &mut self.inspector
    }

    /// Everything the debug panels edit, borrowed at once
    pub fn ui_state(&mut self) -> (&mut InspectorState, &mut LightState, &GunManager) {
        (&mut self.inspector, &mut self.lights.state, &self.guns)
    }

    /// Sets the camera for the next frame
    pub fn set_camera(&mut self, view_projection: Matrix4<f32>, view_position: Vector3<f32>) {
        self.lights.state.view_projection = view_projection;
        self.lights.state.view_position = view_position;
    }

    pub fn handle(&mut self, command: GunCommand) {
        command.apply(&mut self.guns, &mut self.scene);
    }

    /// Routes weapon bindings from a window event.
    ///
    /// Returns true when the event produced a command.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let command = match event {
            WindowEvent::KeyboardInput { event, .. } => input::command_for_key_event(event),
            WindowEvent::MouseInput { state, button, .. } => {
                input::command_for_mouse(*button, *state)
            }
            _ => None,
        };

        match command {
            Some(command) => {
                self.handle(command);
                true
            }
            None => false,
        }
    }

    /// Runs one frame: inspector edits, gizmo animation, light upload, weapon
    /// update, scene update, scene draw and finally the weapon draw
    pub fn frame<B>(&mut self, backend: &mut B, time: f32, delta_time: f32) -> FrameStats
    where
        B: RenderBackend + InstanceUpload,
    {
        let recomputed_before = self.scene.graph().recompute_count();

        self.neighbourhood
            .apply_inspector(&mut self.scene, &self.inspector);
        self.lights.state.offset = self.inspector.building_offset;
        self.lights.state.chosen_instance = self
            .neighbourhood
            .clamp_building(self.inspector.chosen_building) as i32;

        self.neighbourhood
            .animate_gizmos(&mut self.scene, &mut self.lights.state, time);
        self.lights.update(backend);

        self.guns.update(&mut self.scene, delta_time);

        let roots = self.neighbourhood.roots();
        let mut instance_uploads = 0;
        for root in roots {
            instance_uploads += self.scene.update(root, backend);
        }
        let mut draw_calls = 0;
        for root in roots {
            draw_calls += self.scene.draw(root, backend);
        }
        draw_calls += self.guns.draw(&self.scene, backend);

        FrameStats {
            transforms_recomputed: self.scene.graph().recompute_count() - recomputed_before,
            draw_calls,
            instance_uploads,
        }
    }
}
