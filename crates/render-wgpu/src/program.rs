use glyphometer_shader::{CompiledShader, LinkedProgram};
use std::borrow::Cow;

/// Errors raised while turning linked programs into GPU objects.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("device rejected {what}: {log}")]
    Device { what: String, log: String },
    #[error("program '{program}' has no {stage} entry point")]
    MissingEntryPoint {
        program: String,
        stage: &'static str,
    },
    #[error("no usable GPU adapter")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
}

/// Run `create` inside a validation error scope.
///
/// Returns the device's diagnostic text if anything created inside the scope
/// was rejected.
pub(crate) fn validated<T>(
    device: &wgpu::Device,
    what: impl Into<String>,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(err) => Err(RenderError::Device {
            what: what.into(),
            log: err.to_string(),
        }),
    }
}

/// GPU shader modules for one linked program.
pub struct GpuProgram {
    label: String,
    vertex: wgpu::ShaderModule,
    vertex_entry: String,
    fragment: wgpu::ShaderModule,
    fragment_entry: String,
}

impl GpuProgram {
    pub fn new(device: &wgpu::Device, program: &LinkedProgram) -> Result<Self, RenderError> {
        let label = program.label().to_owned();
        let vertex_entry = entry_point(program, program.vertex(), "vertex")?;
        let fragment_entry = entry_point(program, program.fragment(), "fragment")?;

        let (vertex, fragment) = validated(device, format!("shader modules of '{label}'"), || {
            (
                module(device, &format!("{label} vertex"), program.vertex()),
                module(device, &format!("{label} fragment"), program.fragment()),
            )
        })?;

        tracing::debug!(program = %label, "created GPU shader modules");
        Ok(Self {
            label,
            vertex,
            vertex_entry,
            fragment,
            fragment_entry,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_state<'a>(
        &'a self,
        buffers: &'a [wgpu::VertexBufferLayout<'a>],
    ) -> wgpu::VertexState<'a> {
        wgpu::VertexState {
            module: &self.vertex,
            entry_point: Some(&self.vertex_entry),
            compilation_options: Default::default(),
            buffers,
        }
    }

    pub fn fragment_state<'a>(
        &'a self,
        targets: &'a [Option<wgpu::ColorTargetState>],
    ) -> wgpu::FragmentState<'a> {
        wgpu::FragmentState {
            module: &self.fragment,
            entry_point: Some(&self.fragment_entry),
            compilation_options: Default::default(),
            targets,
        }
    }
}

fn entry_point(
    program: &LinkedProgram,
    shader: &CompiledShader,
    stage: &'static str,
) -> Result<String, RenderError> {
    shader
        .entry_point()
        .map(str::to_owned)
        .ok_or_else(|| RenderError::MissingEntryPoint {
            program: program.label().to_owned(),
            stage,
        })
}

fn module(device: &wgpu::Device, label: &str, shader: &CompiledShader) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Naga(Cow::Owned(shader.module().clone())),
    })
}
