//! Clip rectangle projection into framebuffer space

use crate::ScissorRect;

/// Project a UI-space clip rectangle `[left, top, right, bottom]` into
/// framebuffer pixels (top-left origin).
pub fn project_clip_rect(
    clip_rect: [f32; 4],
    display_pos: [f32; 2],
    framebuffer_scale: [f32; 2],
) -> [f32; 4] {
    [
        (clip_rect[0] - display_pos[0]) * framebuffer_scale[0],
        (clip_rect[1] - display_pos[1]) * framebuffer_scale[1],
        (clip_rect[2] - display_pos[0]) * framebuffer_scale[0],
        (clip_rect[3] - display_pos[1]) * framebuffer_scale[1],
    ]
}

/// Whether a projected clip rectangle touches the framebuffer at all.
///
/// Left/top are compared strictly against the size while right/bottom are
/// compared inclusively against zero, so a rectangle ending exactly on the
/// left or top edge still counts as visible.
pub fn is_visible(clip: [f32; 4], framebuffer: [f32; 2]) -> bool {
    clip[0] < framebuffer[0] && clip[1] < framebuffer[1] && clip[2] >= 0.0 && clip[3] >= 0.0
}

/// Convert a projected clip rectangle into a scissor rectangle with the
/// bottom-left origin the graphics API expects.
pub fn scissor_rect(clip: [f32; 4], framebuffer_height: f32) -> ScissorRect {
    ScissorRect::new(
        clip[0] as i32,
        (framebuffer_height - clip[3]) as i32,
        (clip[2] - clip[0]) as i32,
        (clip[3] - clip[1]) as i32,
    )
}
