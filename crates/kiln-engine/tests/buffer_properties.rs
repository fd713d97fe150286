use glam::Vec3;
use kiln_engine::buffer::{Buffer, Usage, Vertex};
use kiln_engine::context::{GpuCall, RecordedBuffer, RecordingContext, RecordingShader};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

type TestBuffer = Buffer<Vertex, RecordedBuffer>;

#[derive(Debug, Clone)]
enum Op {
    New(bool),
    Clone(u8),
    Drop(u8),
    Assign(u8, u8),
    Push(u8),
    Clear(u8),
    Bind(u8),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        let a = u8::arbitrary(g);
        let b = u8::arbitrary(g);
        match u8::arbitrary(g) % 7 {
            0 => Op::New(bool::arbitrary(g)),
            1 => Op::Clone(a),
            2 => Op::Drop(a),
            3 => Op::Assign(a, b),
            4 => Op::Push(a),
            5 => Op::Clear(a),
            _ => Op::Bind(a),
        }
    }
}

fn pick(handles: &[TestBuffer], i: u8) -> Option<usize> {
    (!handles.is_empty()).then(|| i as usize % handles.len())
}

fn counts_match(handles: &[TestBuffer]) -> bool {
    handles.iter().all(|h| {
        let aliases = handles.iter().filter(|o| o.shares_storage_with(h)).count();
        h.use_count() == aliases
    })
}

#[quickcheck]
fn use_count_tracks_live_handles(ops: Vec<Op>) -> bool {
    let mut ctx = RecordingContext::new();
    let mut handles: Vec<TestBuffer> = vec![TestBuffer::new(Usage::Dynamic)];

    for op in ops {
        match op {
            Op::New(is_static) => {
                let usage = if is_static { Usage::Static } else { Usage::Dynamic };
                handles.push(TestBuffer::new(usage));
            }
            Op::Clone(i) => {
                if let Some(i) = pick(&handles, i) {
                    let alias = handles[i].clone();
                    handles.push(alias);
                }
            }
            Op::Drop(i) => {
                if let Some(i) = pick(&handles, i) {
                    handles.swap_remove(i);
                }
            }
            Op::Assign(i, j) => {
                if let (Some(i), Some(j)) = (pick(&handles, i), pick(&handles, j)) {
                    handles[i] = handles[j].clone();
                }
            }
            Op::Push(i) => {
                if let Some(i) = pick(&handles, i) {
                    handles[i].add(Vec3::splat(i as f32));
                }
            }
            Op::Clear(i) => {
                if let Some(i) = pick(&handles, i) {
                    handles[i].clear();
                }
            }
            Op::Bind(i) => {
                if let Some(i) = pick(&handles, i) {
                    handles[i].bind(&mut ctx, &RecordingShader, false);
                }
            }
        }

        if !counts_match(&handles) {
            return false;
        }
    }

    drop(handles);

    // Every GPU buffer ever created is released exactly once.
    let mut created: Vec<u32> = ctx
        .calls()
        .iter()
        .filter_map(|c| match c {
            GpuCall::CreateBuffer { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    let mut released = ctx.released();
    created.sort_unstable();
    released.sort_unstable();
    created == released
}

#[quickcheck]
fn dynamic_upload_mirrors_storage(rounds: Vec<Vec<(i8, i8, i8)>>) -> bool {
    let mut ctx = RecordingContext::new();
    let mut buf = TestBuffer::new(Usage::Dynamic);
    let mut high_water = 0;

    for round in rounds {
        if round.is_empty() {
            buf.clear();
        }
        buf.extend(
            round
                .iter()
                .map(|&(x, y, z)| Vertex::new(Vec3::new(x.into(), y.into(), z.into()))),
        );
        buf.bind(&mut ctx, &RecordingShader, false);
        high_water = high_water.max(buf.len());

        let storage = buf.storage().to_vec();
        let bytes: &[u8] = bytemuck::cast_slice(&storage);
        let Some(handle) = buf.gpu_handle() else { return false };

        if buf.allocated_size() < buf.len() || buf.allocated_size() != high_water {
            return false;
        }
        if handle.size() < bytes.len() as u64 || handle.contents()[..bytes.len()] != *bytes {
            return false;
        }
    }
    true
}

#[quickcheck]
fn static_buffer_never_reuploads(first: Vec<(i8, i8)>, later: Vec<(i8, i8)>, force: bool) -> bool {
    let mut ctx = RecordingContext::new();
    let mut buf = TestBuffer::new(Usage::Static);
    let to_vertex = |&(x, y): &(i8, i8)| Vertex::new(Vec3::new(x.into(), y.into(), 0.0));

    // An empty static buffer allocates nothing, so it would upload again.
    buf.add(Vec3::ZERO);
    buf.extend(first.iter().map(to_vertex));
    buf.bind(&mut ctx, &RecordingShader, false);
    let size = buf.allocated_size();
    let writes = ctx.write_count();

    buf.extend(later.iter().map(to_vertex));
    buf.request_upload();
    buf.bind(&mut ctx, &RecordingShader, force);

    buf.allocated_size() == size && ctx.write_count() == writes && ctx.create_count() == 1
}
