//! WGSL for instanced rounded boxes.
//!
//! One instance per element. The vertex stage expands a unit quad to the
//! element's size (plus one pixel for the anti-aliased rim), rotates it about
//! the centre and maps logical pixels to clip space. The fragment stage
//! evaluates a rounded-box distance field for coverage.

pub(crate) const SHAPES_WGSL: &str = r#"
struct Uniforms {
    viewport: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct InstanceInput {
    @location(0) center: vec2<f32>,
    @location(1) half_size: f32,
    @location(2) rotation: f32,
    @location(3) color: vec4<f32>,
    @location(4) corner: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) half_size: f32,
    @location(3) radius: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    instance: InstanceInput,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let extent = instance.half_size + 1.0;
    let local = quad_vertices[vertex_index] * extent;

    // y points down, so a positive angle turns clockwise on screen
    let c = cos(instance.rotation);
    let s = sin(instance.rotation);
    let rotated = vec2<f32>(local.x * c - local.y * s, local.x * s + local.y * c);
    let pixel = instance.center + rotated;

    let ndc = vec2<f32>(
        pixel.x / uniforms.viewport.x * 2.0 - 1.0,
        1.0 - pixel.y / uniforms.viewport.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.local = local;
    out.color = instance.color;
    out.half_size = instance.half_size;
    out.radius = instance.corner * instance.half_size * 2.0;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let q = abs(in.local) - vec2<f32>(in.half_size - in.radius);
    let dist = length(max(q, vec2<f32>(0.0))) + min(max(q.x, q.y), 0.0) - in.radius;
    let alpha = clamp(0.5 - dist, 0.0, 1.0) * in.color.a;
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn shader_validates() {
        validate_wgsl(SHAPES_WGSL).unwrap();
    }

    #[test]
    fn shader_has_entry_points() {
        assert!(SHAPES_WGSL.contains("fn vs_main"));
        assert!(SHAPES_WGSL.contains("fn fs_main"));
    }
}
