use crate::compile::{CompiledShader, Stage};
use naga::{Binding, Handle, Module, ScalarKind, Type, TypeInner};
use std::fmt::Write as _;

/// A user-defined value passed between stages at a fixed location.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceSlot {
    pub location: u32,
    pub name: Option<String>,
    pub ty: TypeInner,
}

impl InterfaceSlot {
    /// Short type name such as `vec4<f32>`.
    pub fn type_name(&self) -> String {
        describe(&self.ty)
    }
}

/// A vertex and a fragment stage whose interfaces match.
#[derive(Debug)]
pub struct LinkedProgram {
    label: String,
    vertex: CompiledShader,
    fragment: CompiledShader,
    varyings: Vec<InterfaceSlot>,
}

impl LinkedProgram {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    /// Values the fragment stage reads from the vertex stage, by location.
    pub fn varyings(&self) -> &[InterfaceSlot] {
        &self.varyings
    }

    /// Vertex attributes the vertex stage consumes, by location.
    pub fn vertex_inputs(&self) -> Vec<InterfaceSlot> {
        stage_io(self.vertex.module(), Stage::Vertex)
            .map(|io| io.inputs)
            .unwrap_or_default()
    }
}

struct StageIo {
    inputs: Vec<InterfaceSlot>,
    outputs: Vec<InterfaceSlot>,
}

/// Match the fragment stage's inputs against the vertex stage's outputs.
///
/// Returns the linker log on rejection.
pub(crate) fn link(
    label: String,
    vertex: CompiledShader,
    fragment: CompiledShader,
) -> Result<LinkedProgram, String> {
    let mut log = String::new();

    let vs = stage_io(vertex.module(), Stage::Vertex);
    let fs = stage_io(fragment.module(), Stage::Fragment);
    if vs.is_none() {
        let _ = writeln!(log, "no vertex entry point in '{}'", vertex.path().display());
    }
    if fs.is_none() {
        let _ = writeln!(
            log,
            "no fragment entry point in '{}'",
            fragment.path().display()
        );
    }
    let (Some(vs), Some(fs)) = (vs, fs) else {
        return Err(log);
    };

    let mut varyings = Vec::with_capacity(fs.inputs.len());
    for input in fs.inputs {
        let name = input.name.as_deref().unwrap_or("<unnamed>");
        match vs.outputs.iter().find(|o| o.location == input.location) {
            None => {
                let _ = writeln!(
                    log,
                    "fragment input '{name}' at location {} is not written by the vertex stage",
                    input.location
                );
            }
            Some(output) if output.ty != input.ty => {
                let _ = writeln!(
                    log,
                    "type mismatch at location {}: vertex writes {}, fragment reads '{name}' as {}",
                    input.location,
                    output.type_name(),
                    input.type_name()
                );
            }
            Some(_) => varyings.push(input),
        }
    }

    if !log.is_empty() {
        return Err(log);
    }

    varyings.sort_by_key(|slot| slot.location);
    tracing::debug!(
        program = %label,
        varyings = varyings.len(),
        "linked shader program"
    );
    Ok(LinkedProgram {
        label,
        vertex,
        fragment,
        varyings,
    })
}

fn stage_io(module: &Module, stage: Stage) -> Option<StageIo> {
    let naga_stage = stage.naga();
    let entry = module.entry_points.iter().find(|ep| ep.stage == naga_stage)?;

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        collect(module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect(module, None, result.ty, result.binding.as_ref(), &mut outputs);
    }

    Some(StageIo { inputs, outputs })
}

/// Flatten location-bound values, descending into binding-less structs.
fn collect(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<InterfaceSlot>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(InterfaceSlot {
            location: *location,
            name: name.map(str::to_owned),
            ty: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect(
                        module,
                        member.name.as_deref(),
                        member.ty,
                        member.binding.as_ref(),
                        out,
                    );
                }
            }
        }
    }
}

fn describe(inner: &TypeInner) -> String {
    match *inner {
        TypeInner::Scalar(scalar) => scalar_name(scalar),
        TypeInner::Vector { size, scalar } => {
            format!("vec{}<{}>", size as u8, scalar_name(scalar))
        }
        TypeInner::Matrix {
            columns,
            rows,
            scalar,
        } => format!("mat{}x{}<{}>", columns as u8, rows as u8, scalar_name(scalar)),
        ref other => format!("{other:?}"),
    }
}

fn scalar_name(scalar: naga::Scalar) -> String {
    let prefix = match scalar.kind {
        ScalarKind::Sint => "i",
        ScalarKind::Uint => "u",
        ScalarKind::Float => "f",
        ScalarKind::Bool => return "bool".to_owned(),
        _ => "abstract",
    };
    format!("{prefix}{}", u32::from(scalar.width) * 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile_stage;
    use naga::valid::{Capabilities, ValidationFlags, Validator};
    use std::path::Path;

    fn compile(stage: Stage, source: &str) -> CompiledShader {
        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        let name = match stage {
            Stage::Vertex => "test.vert",
            Stage::Fragment => "test.frag",
        };
        compile_stage(&mut validator, stage, Path::new(name), source).unwrap()
    }

    const VERTEX: &str = "#version 450
layout(location = 0) in vec3 position;
layout(location = 0) out vec4 v_color;
void main() {
    v_color = vec4(position, 1.0);
    gl_Position = vec4(position, 1.0);
}
";

    #[test]
    fn matching_interface_links() {
        let fragment = "#version 450
layout(location = 0) in vec4 v_color;
layout(location = 0) out vec4 out_color;
void main() {
    out_color = v_color;
}
";
        let program = link(
            "test".into(),
            compile(Stage::Vertex, VERTEX),
            compile(Stage::Fragment, fragment),
        )
        .unwrap();
        assert_eq!(program.label(), "test");
        assert_eq!(program.varyings().len(), 1);
        assert_eq!(program.varyings()[0].location, 0);
        assert_eq!(program.varyings()[0].type_name(), "vec4<f32>");
        let inputs = program.vertex_inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].type_name(), "vec3<f32>");
    }

    #[test]
    fn unwritten_location_is_rejected() {
        let fragment = "#version 450
layout(location = 1) in vec2 v_uv;
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(v_uv, 0.0, 1.0);
}
";
        let log = link(
            "test".into(),
            compile(Stage::Vertex, VERTEX),
            compile(Stage::Fragment, fragment),
        )
        .unwrap_err();
        assert!(log.contains("location 1"), "{log}");
        assert!(log.contains("not written"), "{log}");
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let fragment = "#version 450
layout(location = 0) in vec3 v_color;
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(v_color, 1.0);
}
";
        let log = link(
            "test".into(),
            compile(Stage::Vertex, VERTEX),
            compile(Stage::Fragment, fragment),
        )
        .unwrap_err();
        assert!(log.contains("type mismatch"), "{log}");
        assert!(log.contains("vec4<f32>"), "{log}");
        assert!(log.contains("vec3<f32>"), "{log}");
    }

    #[test]
    fn swapped_stages_have_no_entry_points() {
        let fragment = "#version 450
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(1.0);
}
";
        let log = link(
            "test".into(),
            compile(Stage::Fragment, fragment),
            compile(Stage::Vertex, VERTEX),
        )
        .unwrap_err();
        assert!(log.contains("no vertex entry point"), "{log}");
        assert!(log.contains("no fragment entry point"), "{log}");
    }
}
