use bytemuck::{Pod, Zeroable};

use super::surface_context::SurfaceContext;

/// Growable GPU buffer rebuilt from a CPU-side vec every frame. Used for the
/// per-frame vertex and index streams.
pub struct VertexCtx<V: Pod> {
    pub verts: Vec<V>,     // CPU-side cache (keeps allocation)
    pub capacity: u32,     // how many elements fit in `buf`
    pub count: u32,        // elements actually in use this frame
    pub buf: wgpu::Buffer, // GPU buffer
    label: &'static str,
    usage: wgpu::BufferUsages,
}

impl<V: Pod> VertexCtx<V> {
    /// Vertex stream with an initial capacity (in elements, not bytes).
    pub fn new(sc: &SurfaceContext, initial_cap: u32) -> Self {
        Self::with_usage(sc, initial_cap, "dynamic-vertex-buffer", wgpu::BufferUsages::VERTEX)
    }

    /// Index stream with an initial capacity (in elements, not bytes).
    pub fn index(sc: &SurfaceContext, initial_cap: u32) -> Self {
        Self::with_usage(sc, initial_cap, "dynamic-index-buffer", wgpu::BufferUsages::INDEX)
    }

    fn with_usage(sc: &SurfaceContext, initial_cap: u32, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        let initial_cap = initial_cap.max(4);
        let buf = Self::create_buf(sc, initial_cap, label, usage);
        Self {
            verts: Vec::with_capacity(initial_cap as usize),
            capacity: initial_cap,
            count: 0,
            buf,
            label,
            usage,
        }
    }

    #[inline]
    fn create_buf(sc: &SurfaceContext, cap: u32, label: &str, usage: wgpu::BufferUsages) -> wgpu::Buffer {
        let byte_cap = cap as u64 * std::mem::size_of::<V>() as u64;
        sc.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: byte_cap.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT),
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Grow GPU buffer if `self.verts` no longer fits.
    fn ensure_capacity(&mut self, sc: &SurfaceContext) {
        let needed = self.verts.len() as u32;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buf = Self::create_buf(sc, self.capacity, self.label, self.usage);
            log::debug!("{} grown to {} elements", self.label, self.capacity);
        }
    }

    /// Rebuild verts **and** upload them in one shot.
    pub fn sync<F>(&mut self, sc: &SurfaceContext, rebuild: F)
    where
        F: FnOnce(&mut Vec<V>),
    {
        self.verts.clear();
        rebuild(&mut self.verts); // fill CPU vec
        self.count = self.verts.len() as u32;

        // uploads must be a multiple of 4 bytes
        while (self.verts.len() * std::mem::size_of::<V>()) as u64 % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            self.verts.push(V::zeroed());
        }

        self.ensure_capacity(sc); // maybe realloc GPU
        if !self.verts.is_empty() {
            sc.queue
                .write_buffer(&self.buf, 0, bytemuck::cast_slice(&self.verts));
        }
    }
}
