//! Borrowed per-frame view over Dear ImGui draw data

use dear_imgui_rs::TextureId;
use dear_imgui_rs::internal::RawWrapper;
use dear_imgui_rs::render::{DrawCmd, DrawData, DrawIdx, DrawVert};
use std::fmt;

/// A callback embedded in a draw list
pub enum UserCallback<'a> {
    /// Callback registered through Dear ImGui's draw list API. It already
    /// captures the raw draw list and command it belongs to.
    Native(Box<dyn Fn() + 'a>),
    /// Callback that renders with the segment it was recorded in
    Segment(Box<dyn Fn(&DrawListView<'_>) + 'a>),
}

impl fmt::Debug for UserCallback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserCallback::Native(_) => f.write_str("UserCallback::Native"),
            UserCallback::Segment(_) => f.write_str("UserCallback::Segment"),
        }
    }
}

/// One command of a draw list
#[derive(Debug)]
pub enum DrawCommand<'a> {
    /// Draw `count` indices starting at `idx_offset`
    Elements {
        count: usize,
        /// UI-space `[left, top, right, bottom]`
        clip_rect: [f32; 4],
        texture_id: TextureId,
        vtx_offset: usize,
        idx_offset: usize,
    },
    /// The sentinel callback asking the renderer to restore its baseline state
    ResetRenderState,
    Callback(UserCallback<'a>),
}

/// One draw list segment: shared vertex/index buffers plus its commands
#[derive(Debug)]
pub struct DrawListView<'a> {
    pub vtx_buffer: &'a [DrawVert],
    pub idx_buffer: &'a [DrawIdx],
    pub commands: Vec<DrawCommand<'a>>,
}

impl<'a> DrawListView<'a> {
    pub fn new(vtx_buffer: &'a [DrawVert], idx_buffer: &'a [DrawIdx]) -> Self {
        Self {
            vtx_buffer,
            idx_buffer,
            commands: Vec::new(),
        }
    }

    /// Append an elements command that continues right after the previous one
    pub fn push_elements(&mut self, count: usize, clip_rect: [f32; 4], texture_id: TextureId) {
        let idx_offset = self
            .commands
            .iter()
            .map(|cmd| match cmd {
                DrawCommand::Elements { count, .. } => *count,
                _ => 0,
            })
            .sum();
        self.commands.push(DrawCommand::Elements {
            count,
            clip_rect,
            texture_id,
            vtx_offset: 0,
            idx_offset,
        });
    }

    pub fn push_reset_render_state(&mut self) {
        self.commands.push(DrawCommand::ResetRenderState);
    }

    pub fn push_callback(&mut self, callback: impl Fn(&DrawListView<'_>) + 'a) {
        self.commands
            .push(DrawCommand::Callback(UserCallback::Segment(Box::new(callback))));
    }
}

/// One frame of UI geometry. Valid for the frame it was built in only.
#[derive(Debug)]
pub struct FrameDrawData<'a> {
    /// Top-left of the UI display rectangle
    pub display_pos: [f32; 2],
    pub display_size: [f32; 2],
    pub framebuffer_scale: [f32; 2],
    pub draw_lists: Vec<DrawListView<'a>>,
}

impl<'a> FrameDrawData<'a> {
    pub fn new(display_size: [f32; 2]) -> Self {
        Self {
            display_pos: [0.0, 0.0],
            display_size,
            framebuffer_scale: [1.0, 1.0],
            draw_lists: Vec::new(),
        }
    }

    /// Display size in framebuffer pixels
    pub fn framebuffer_size(&self) -> [f32; 2] {
        [
            self.display_size[0] * self.framebuffer_scale[0],
            self.display_size[1] * self.framebuffer_scale[1],
        ]
    }

    /// Build the view from Dear ImGui's draw data
    pub fn from_draw_data(draw_data: &'a DrawData) -> Self {
        let draw_lists = draw_data
            .draw_lists()
            .map(|draw_list| {
                let raw_list: *const dear_imgui_rs::sys::ImDrawList =
                    unsafe { RawWrapper::raw(draw_list) as *const _ };
                let commands = draw_list
                    .commands()
                    .map(|cmd| match cmd {
                        DrawCmd::Elements {
                            count,
                            cmd_params,
                            raw_cmd,
                        } => {
                            // Resolve through ImGui so managed textures report the id
                            // the renderer wrote back during texture updates.
                            let tex_id = unsafe {
                                let mut cmd_copy = *raw_cmd;
                                dear_imgui_rs::sys::ImDrawCmd_GetTexID(&mut cmd_copy)
                            } as u64;
                            DrawCommand::Elements {
                                count,
                                clip_rect: cmd_params.clip_rect,
                                texture_id: TextureId::new(tex_id as _),
                                vtx_offset: cmd_params.vtx_offset,
                                idx_offset: cmd_params.idx_offset,
                            }
                        }
                        DrawCmd::ResetRenderState => DrawCommand::ResetRenderState,
                        DrawCmd::RawCallback { callback, raw_cmd } => {
                            DrawCommand::Callback(UserCallback::Native(Box::new(move || unsafe {
                                callback(raw_list, raw_cmd)
                            })))
                        }
                    })
                    .collect();
                DrawListView {
                    vtx_buffer: draw_list.vtx_buffer(),
                    idx_buffer: draw_list.idx_buffer(),
                    commands,
                }
            })
            .collect();

        Self {
            display_pos: draw_data.display_pos(),
            display_size: draw_data.display_size(),
            framebuffer_scale: draw_data.framebuffer_scale(),
            draw_lists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_elements_partition_the_index_buffer() {
        let mut list = DrawListView::new(&[], &[]);
        list.push_elements(6, [0.0; 4], TextureId::null());
        list.push_reset_render_state();
        list.push_elements(3, [0.0; 4], TextureId::null());
        list.push_elements(9, [0.0; 4], TextureId::null());

        let offsets: Vec<usize> = list
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Elements { idx_offset, .. } => Some(*idx_offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, vec![0, 6, 9]);
    }

    #[test]
    fn framebuffer_size_applies_scale() {
        let mut frame = FrameDrawData::new([640.0, 360.0]);
        frame.framebuffer_scale = [2.0, 1.5];
        assert_eq!(frame.framebuffer_size(), [1280.0, 540.0]);
    }
}
