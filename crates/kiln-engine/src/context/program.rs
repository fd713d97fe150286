use std::borrow::Cow;

use crate::buffer::{RecordKind, VertexRecord};

use super::{ShaderAttributes, WgpuContext};

/// WGSL for [`VertexRgba`](crate::buffer::VertexRgba) geometry already in clip space.
pub const FLAT_COLOR_WGSL: &str = include_str!("shaders/flat.wgsl");

/// Everything needed to build a [`ShaderProgram`].
#[derive(Debug, Clone)]
pub struct ShaderProgramDesc<'a> {
    pub label: &'a str,
    pub source: Cow<'a, str>,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub color_format: wgpu::TextureFormat,
    pub topology: wgpu::PrimitiveTopology,
    pub strip_index_format: Option<wgpu::IndexFormat>,
    pub front_face: wgpu::FrontFace,
    pub cull_mode: Option<wgpu::Face>,
    /// Premultiplied-alpha blending when `true`, replace otherwise.
    pub blend: bool,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
}

impl<'a> ShaderProgramDesc<'a> {
    pub fn new(label: &'a str, source: impl Into<Cow<'a, str>>) -> Self {
        Self {
            label,
            source: source.into(),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            color_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            blend: true,
            bind_group_layouts: &[],
        }
    }

    /// The built-in flat-color program.
    pub fn flat_color(color_format: wgpu::TextureFormat) -> Self {
        Self {
            color_format,
            ..Self::new("kiln flat color", FLAT_COLOR_WGSL)
        }
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

/// A render pipeline built for exactly one vertex record layout.
///
/// Binding a buffer of that layout through a [`WgpuContext`] sets the pipeline.
#[derive(Debug)]
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    vertex_kind: RecordKind,
    topology: wgpu::PrimitiveTopology,
}

impl ShaderProgram {
    pub fn new<V: VertexRecord>(device: &wgpu::Device, desc: &ShaderProgramDesc<'_>) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.clone()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: desc.bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(desc.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[V::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(desc.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: desc.blend.then(premul_alpha_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: desc.strip_index_format,
                front_face: desc.front_face,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("shader program {:?} built for {:?}", desc.label, V::KIND);

        Self {
            pipeline,
            vertex_kind: V::KIND,
            topology: desc.topology,
        }
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn vertex_kind(&self) -> RecordKind {
        self.vertex_kind
    }

    #[inline]
    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }
}

impl<'a, 'p> ShaderAttributes<WgpuContext<'a, 'p>> for ShaderProgram {
    fn bind_attributes<T: VertexRecord>(&self, ctx: &mut WgpuContext<'a, 'p>) {
        if T::KIND != self.vertex_kind {
            log::warn!(
                "{:?} records bound to a program built for {:?}",
                T::KIND,
                self.vertex_kind
            );
        }
        ctx.set_pipeline(&self.pipeline, self.topology);
    }

    fn unbind_attributes<T: VertexRecord>(&self, ctx: &mut WgpuContext<'a, 'p>) {
        ctx.clear_pipeline();
    }
}
