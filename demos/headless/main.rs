//! Headless run of the neighbourhood demo
//!
//! Drives the frame loop without a window. Draw calls and uniforms are only
//! counted; instance matrices go to real wgpu buffers when an adapter is
//! available.
//!
//! ```text
//! NEIGHBOURHOOD_ROWS=50 NEIGHBOURHOOD_COLUMNS=50 NEIGHBOURHOOD_FRAMES=600 \
//!     RUST_LOG=info cargo run --example headless
//! ```

use anyhow::{Context, Result};
use cgmath::{Matrix4, Vector3};
use neighbourhood::gfx::rendering::{
    InstanceBufferId, InstanceBuffers, InstanceUpload, MeshHandle, RenderBackend, ShaderHandle,
};
use neighbourhood::input::GunCommand;
use neighbourhood::neighbourhood::SceneAssets;
use neighbourhood::{DemoConfig, NeighbourhoodApp};

struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: InstanceBuffers,
}

/// Counts what a real renderer would submit
#[derive(Default)]
struct CountingBackend {
    program_switches: u64,
    uniforms: u64,
    draws: u64,
    instanced_draws: u64,
    uploaded_matrices: u64,
    gpu: Option<Gpu>,
}

impl RenderBackend for CountingBackend {
    fn use_program(&mut self, _shader: ShaderHandle) {
        self.program_switches += 1;
    }

    fn set_mat4(&mut self, _shader: ShaderHandle, _name: &str, _value: &Matrix4<f32>) {
        self.uniforms += 1;
    }

    fn set_vec3(&mut self, _shader: ShaderHandle, _name: &str, _value: Vector3<f32>) {
        self.uniforms += 1;
    }

    fn set_float(&mut self, _shader: ShaderHandle, _name: &str, _value: f32) {
        self.uniforms += 1;
    }

    fn set_bool(&mut self, _shader: ShaderHandle, _name: &str, _value: bool) {
        self.uniforms += 1;
    }

    fn set_int(&mut self, _shader: ShaderHandle, _name: &str, _value: i32) {
        self.uniforms += 1;
    }

    fn draw_mesh(&mut self, _mesh: MeshHandle, _shader: ShaderHandle) {
        self.draws += 1;
    }

    fn draw_mesh_instanced(&mut self, _mesh: MeshHandle, _shader: ShaderHandle, _count: u32) {
        self.instanced_draws += 1;
    }
}

impl InstanceUpload for CountingBackend {
    fn upload_instances(&mut self, buffer: InstanceBufferId, matrices: &[Matrix4<f32>]) {
        self.uploaded_matrices += matrices.len() as u64;
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.buffers
                .writer(&gpu.device, &gpu.queue)
                .upload_instances(buffer, matrices);
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

async fn request_gpu(houses: usize) -> Result<Gpu> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("no graphics adapter")?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Headless Device"),
            required_features: wgpu::Features::default(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to open device")?;

    let mut buffers = InstanceBuffers::new();
    buffers.create(&device, houses);
    buffers.create(&device, houses);

    Ok(Gpu {
        device,
        queue,
        buffers,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let mut config = DemoConfig::default();
    config.grid.rows = env_or("NEIGHBOURHOOD_ROWS", config.grid.rows)?;
    config.grid.columns = env_or("NEIGHBOURHOOD_COLUMNS", config.grid.columns)?;
    let frames: u32 = env_or("NEIGHBOURHOOD_FRAMES", 240)?;

    let assets = SceneAssets {
        plane: MeshHandle(0),
        cube: MeshHandle(1),
        pyramid: MeshHandle(2),
        guns: vec![MeshHandle(3), MeshHandle(4)],
        textured_shader: ShaderHandle(0),
        light_shader: ShaderHandle(1),
        basic_shader: ShaderHandle(2),
        gun_shader: ShaderHandle(3),
        house_instances: InstanceBufferId(0),
        roof_instances: InstanceBufferId(1),
    };

    let mut backend = CountingBackend::default();
    match pollster::block_on(request_gpu(config.grid.house_count())) {
        Ok(gpu) => backend.gpu = Some(gpu),
        Err(err) => log::warn!("running without GPU buffers: {:#}", err),
    }

    let mut app = NeighbourhoodApp::new(config, &assets)?;
    app.set_camera(
        cgmath::perspective(cgmath::Deg(45.0), 1280.0 / 720.0, 0.1, 100.0),
        Vector3::new(0.0, 2.0, 10.0),
    );

    let delta_time = 1.0 / 60.0;
    let mut recomputed = 0;
    let mut uploads = 0;

    for frame in 0..frames {
        // Fire every half second, reload when empty, swap weapons every 4s
        if frame % 30 == 0 {
            if app.guns().ammo() == Some(0) {
                app.handle(GunCommand::Reload);
            }
            app.handle(GunCommand::Shoot);
        }
        if frame % 240 == 120 {
            app.handle(GunCommand::Switch(((frame / 240) % 2) as i64));
        }
        if frame == 60 {
            app.inspector_mut().building_offset = Vector3::new(0.0, 3.0, 0.0);
        }

        let stats = app.frame(&mut backend, frame as f32 * delta_time, delta_time);
        recomputed += stats.transforms_recomputed;
        uploads += stats.instance_uploads;
    }

    log::info!(
        "{} frames: {} transforms recomputed, {} instance uploads ({} matrices)",
        frames,
        recomputed,
        uploads,
        backend.uploaded_matrices
    );
    log::info!(
        "{} draws, {} instanced draws, {} program switches, {} uniforms",
        backend.draws,
        backend.instanced_draws,
        backend.program_switches,
        backend.uniforms
    );
    println!(
        "ammo left: {:?}, weapon {:?}",
        app.guns().ammo(),
        app.guns().chosen()
    );

    Ok(())
}
