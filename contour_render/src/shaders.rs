// Copyright 2026 the Contour Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bundled GLSL sources.

use crate::program::ShaderSource;

/// The line shader.
///
/// Layout attributes: `a_pos`, `a_data`. Paint attributes: `a_color`,
/// `a_opacity`, `a_gapwidth`, `a_offset`, `a_blur`.
pub const LINE_SHADER: ShaderSource = ShaderSource {
    name: "line",
    vertex: LINE_VERTEX,
    fragment: LINE_FRAGMENT,
};

const LINE_VERTEX: &str = r"// 1 / 63, undoing the extrusion quantization.
#define scale 0.015873016

attribute vec2 a_pos;
attribute vec4 a_data;

attribute vec4 a_color;
attribute float a_opacity;
attribute float a_gapwidth;
attribute float a_offset;
attribute float a_blur;

uniform mat4 u_matrix;
uniform mediump float u_ratio;
uniform mediump float u_width;
uniform vec2 u_gl_units_to_pixels;

varying vec2 v_normal;
varying vec2 v_width2;
varying float v_gamma_scale;
varying vec4 v_color;
varying float v_opacity;
varying float v_blur;

void main() {
    v_color = a_color;
    v_opacity = a_opacity;
    v_blur = a_blur;

    vec2 a_extrude = a_data.xy - 128.0;
    float a_direction = mod(a_data.z, 4.0) - 1.0;

    vec2 pos = floor(a_pos * 0.5);

    // The low bit of y marks the +normal side.
    mediump vec2 normal = a_pos - 2.0 * pos;
    v_normal = vec2(normal.x, normal.y * 2.0 - 1.0);

    float ANTIALIASING = 1.0 / DEVICE_PIXEL_RATIO / 2.0;

    float halfwidth = u_width / 2.0;
    float inset = a_gapwidth + (a_gapwidth > 0.0 ? ANTIALIASING : 0.0);
    float outset = a_gapwidth + halfwidth * (a_gapwidth > 0.0 ? 2.0 : 1.0) + ANTIALIASING;

    mediump vec2 dist = outset * a_extrude * scale;

    mediump float u = 0.5 * a_direction;
    mediump float t = 1.0 - abs(u);
    mediump vec2 offset2 = a_offset * a_extrude * scale * normal.y * mat2(t, -u, u, t);

    vec4 projected_extrude = u_matrix * vec4(dist / u_ratio, 0.0, 0.0);
    gl_Position = u_matrix * vec4(pos + offset2 / u_ratio, 0.0, 1.0) + projected_extrude;

    float extrude_length_without_perspective = length(dist);
    float extrude_length_with_perspective = length(projected_extrude.xy / gl_Position.w * u_gl_units_to_pixels);
    v_gamma_scale = extrude_length_without_perspective / extrude_length_with_perspective;

    v_width2 = vec2(outset, inset);
}
";

const LINE_FRAGMENT: &str = r"precision mediump float;

varying vec2 v_normal;
varying vec2 v_width2;
varying float v_gamma_scale;
varying vec4 v_color;
varying float v_opacity;
varying float v_blur;

void main() {
    // Distance of this fragment from the line center, in pixels.
    float dist = length(v_normal) * v_width2.s;

    // Fade out the edges, using the blur or the antialiasing width.
    float blur2 = (v_blur + 1.0 / DEVICE_PIXEL_RATIO) * v_gamma_scale;
    float alpha = clamp(min(dist - (v_width2.t - blur2), v_width2.s - dist) / blur2, 0.0, 1.0);

    gl_FragColor = v_color * (alpha * v_opacity);

#ifdef OVERDRAW_INSPECTOR
    gl_FragColor = vec4(1.0);
#endif
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::OVERDRAW_MARKER;

    #[test]
    fn line_fragment_supports_overdraw_inspection() {
        assert!(LINE_SHADER.fragment.contains(OVERDRAW_MARKER));
    }

    #[test]
    fn line_shader_declares_every_attribute() {
        for name in ["a_pos", "a_data", "a_color", "a_opacity", "a_gapwidth", "a_offset", "a_blur"] {
            assert!(LINE_SHADER.vertex.contains(name), "missing {name}");
        }
    }
}
