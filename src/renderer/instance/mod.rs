use std::mem::size_of;

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{vec3, Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::{entity::Camera, scene::DrawList};

const CUBE_VERTICES: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];
#[rustfmt::skip]
const CUBE_INDICES: [u16; 36] = [
    4, 5, 6, 4, 6, 7, // +z
    1, 0, 3, 1, 3, 2, // -z
    5, 1, 2, 5, 2, 6, // +x
    0, 4, 7, 0, 7, 3, // -x
    7, 6, 2, 7, 2, 3, // +y
    0, 1, 5, 0, 5, 4, // -y
];

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Uniforms {
    view_proj: Mat4,
    light_dir: Vec4,
}

impl Uniforms {
    fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection(),
            light_dir: vec3(-1., 0.5, -4.).normalize().extend(0.),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Instance {
    model: Mat4,
    color: Vec4,
}

/// Approximate sRGB to linear conversion for colours authored as hex.
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    vec3(color.x.powf(2.2), color.y.powf(2.2), color.z.powf(2.2))
}

struct Instances(Vec<Instance>);

impl Instances {
    fn new(draw_list: &DrawList, linear: bool) -> Self {
        let instances = draw_list
            .iter()
            .map(|drawable| {
                let color = if linear {
                    srgb_to_linear(drawable.visual.color)
                } else {
                    drawable.visual.color
                };
                Instance {
                    model: drawable.transform.to_matrix(),
                    color: color.extend(1.),
                }
            })
            .collect::<Vec<_>>();

        Self(instances)
    }

    fn as_slice(&self) -> &[Instance] {
        Vec::as_slice(&self.0)
    }
}

/// Draws every drawable in a [`DrawList`] as an instanced unit cube.
pub struct InstanceRenderer {
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    linear_colors: bool,
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

impl InstanceRenderer {
    pub fn capacity(&self) -> usize {
        self.instance_capacity
    }

    pub fn update(&mut self, queue: &wgpu::Queue, draw_list: &DrawList, camera: &Camera) {
        let instances = Instances::new(draw_list, self.linear_colors);
        let instances = &instances.as_slice()[..instances.0.len().min(self.instance_capacity)];
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;

        queue.write_buffer(&self.uniform_buffer, 0, bytes_of(&Uniforms::new(camera)));
    }

    pub fn draw<'rpass>(&'rpass self, rpass: &mut impl wgpu::util::RenderEncoder<'rpass>) {
        if self.instance_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..(CUBE_INDICES.len() as _), 0, 0..self.instance_count);
    }
}

pub struct InstanceRendererBuilder {
    capacity: usize,
    color_format: Option<wgpu::TextureFormat>,
    depth_format: Option<wgpu::TextureFormat>,
    linear_colors: bool,
}

impl InstanceRendererBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            color_format: None,
            depth_format: None,
            linear_colors: false,
        }
    }

    pub fn color_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = Some(format);
        self
    }

    pub fn depth_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Convert sRGB colours to linear before upload, for sRGB render targets.
    pub fn linear_colors(mut self, linear: bool) -> Self {
        self.linear_colors = linear;
        self
    }

    pub fn build(self, device: &wgpu::Device) -> anyhow::Result<InstanceRenderer> {
        use anyhow::Context;

        let color_format = self.color_format.context("No color format provided")?;
        let depth_format = self.depth_format.context("No depth format provided")?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: cast_slice(&CUBE_VERTICES[..]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: cast_slice(&CUBE_INDICES[..]),
            usage: wgpu::BufferUsages::INDEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Instance Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Instance>() as _),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Uniforms>() as _),
                    },
                    count: None,
                },
            ],
        });

        let shader_module = device.create_shader_module(&wgpu::include_wgsl!("instance.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Instance Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<[f32; 3]>() as _,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[color_format.into()],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (size_of::<Instance>() * self.capacity) as _,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Uniform Buffer"),
            size: size_of::<Uniforms>() as _,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Instance Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: instance_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Ok(InstanceRenderer {
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            instance_capacity: self.capacity,
            instance_count: 0,
            linear_colors: self.linear_colors,
            bind_group,
            render_pipeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{entity::Visual, scene::SceneRenderer};

    #[test]
    fn instance_layout_matches_shader() {
        assert_eq!(size_of::<Instance>(), 80);
        assert_eq!(size_of::<Uniforms>(), 80);
    }

    #[test]
    fn cube_indices_stay_in_bounds() {
        assert!(CUBE_INDICES
            .iter()
            .all(|&i| (i as usize) < CUBE_VERTICES.len()));
    }

    #[test]
    fn instances_mirror_draw_list() {
        let mut list = DrawList::with_capacity(4);
        list.register_drawable(&Visual::from_hex(0xffffff)).unwrap();
        list.register_drawable(&Visual::from_hex(0x000000)).unwrap();

        let instances = Instances::new(&list, true);
        assert_eq!(instances.as_slice().len(), 2);
        for instance in instances.as_slice() {
            assert_eq!(instance.model, Mat4::IDENTITY);
            assert_relative_eq!(instance.color.w, 1.);
        }
    }
}
